use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const MAX_OP_WIDTH: usize = 40;

/// ANSI colour for each audited operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "lock" => Colour::Yellow,
        "unlock" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51), // orange
        _ => Colour::White,
    }
}

/// One printable line per entry, without trailing newline.
fn format_entry(entry: &LogEntry, id_w: usize, date_w: usize) -> String {
    let date = chrono::DateTime::parse_from_rfc3339(&entry.date)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| entry.date.clone());

    let target = if entry.target.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.target)
    };

    // pad on the visible width, before colour codes are added
    let visible = entry.operation.chars().count() + target.chars().count();
    let padding = " ".repeat(MAX_OP_WIDTH.saturating_sub(visible));

    let op = color_for_operation(&entry.operation).paint(entry.operation.as_str());

    format!(
        "{:>id_w$}: {:<date_w$} | {}{}{} => {}",
        entry.id, date, op, target, padding, entry.message
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");
        for entry in &entries {
            println!("{}", format_entry(entry, id_w, date_w));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_line_keeps_operation_target_and_message() {
        let entry = LogEntry {
            id: 7,
            date: "2024-03-01T10:00:00+01:00".into(),
            operation: "lock".into(),
            target: "lock".into(),
            message: "alice 2024-03-01".into(),
        };

        let line = format_entry(&entry, 2, 25);
        assert!(line.starts_with(" 7: 2024-03-01T10:00:00+01:00"));
        assert!(line.contains(&Colour::Yellow.paint("lock").to_string()));
        assert!(line.contains(" (lock)"));
        assert!(line.ends_with("=> alice 2024-03-01"));
    }
}
