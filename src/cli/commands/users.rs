use super::emit;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::facade::Ledger;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let ledger = Ledger::from_pool(&pool);

    match cmd {
        Commands::Users => emit(&ledger.list_users()),
        Commands::User { user_id } => emit(&ledger.user_exists(user_id)),
        _ => Ok(()),
    }
}
