use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::fs;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    // Write config file (skipped in test mode)
    if !cli.test {
        let path = Config::config_file();
        if path.exists() {
            warning(format!("Overwriting {}", path.display()));
        }
        cfg.save_to(&path)?;
        success(format!("Config file: {}", path.display()));
    }

    let db_path = expand_tilde(&cfg.database);
    if let Some(dir) = db_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let pool = DbPool::new(&cfg.database)?;
    ttlog(&pool.conn, "init", "database", &cfg.database)?;

    success(format!("Database:    {}", db_path.display()));
    info("Ledger tables are ready.");
    Ok(())
}
