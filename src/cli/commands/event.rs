use super::{Scope, emit, record_from};
use crate::cli::parser::{EventCmd, EventRecordArgs};
use crate::config::Config;
use crate::core::facade::Ledger;
use crate::core::input::RecordInput;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

fn record_input(args: &EventRecordArgs) -> RecordInput {
    match &args.record {
        Some(text) => RecordInput::Text(text.clone()),
        None => record_from(&[
            ("user_id", args.user.as_ref()),
            ("event_date", args.date.as_ref()),
            ("user_name", args.name.as_ref()),
            ("reason", args.reason.as_ref()),
            ("hours", args.hours.as_ref()),
        ])
        .into(),
    }
}

pub fn handle(cmd: &EventCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let ledger = Ledger::from_pool(&pool);

    let out = match cmd {
        EventCmd::List {
            user,
            date,
            from,
            to,
        } => match (user, date, from, to) {
            (Some(u), _, Some(f), Some(t)) => ledger.list_events_by_user_and_date_range(u, f, t),
            (Some(u), _, _, _) => ledger.list_events_by_user(u),
            (None, Some(d), _, _) => ledger.list_events_by_date(d),
            _ => ledger.list_all_events(),
        },
        EventCmd::Get {
            user_id,
            event_date,
        } => ledger.get_event(user_id, event_date),
        EventCmd::Add(args) => ledger.create_event(record_input(args)),
        EventCmd::Del(scope) => match scope.scope() {
            Some(Scope::Key(u, d)) => ledger.delete_event(u, d),
            Some(Scope::User(u)) => ledger.delete_all_events_by_user(u),
            Some(Scope::Date(d)) => ledger.delete_all_events_by_date(d),
            None => return Ok(()),
        },
    };

    emit(&out)
}
