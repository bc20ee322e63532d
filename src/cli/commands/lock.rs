use super::{Scope, emit, record_from};
use crate::cli::parser::LockCmd;
use crate::config::Config;
use crate::core::facade::Ledger;
use crate::core::input::RecordInput;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &LockCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let ledger = Ledger::from_pool(&pool);

    let out = match cmd {
        LockCmd::List { user, date } => match (user, date) {
            (Some(u), _) => ledger.list_locks_by_user(u),
            (None, Some(d)) => ledger.list_locks_by_date(d),
            (None, None) => ledger.list_all_locks(),
        },
        LockCmd::Get {
            user_id,
            event_date,
        } => ledger.get_lock(user_id, event_date),
        LockCmd::Status {
            user_id,
            event_date,
        } => ledger.is_locked(user_id, event_date),
        LockCmd::Add {
            user_id,
            event_date,
            record,
        } => {
            let input = match record {
                Some(text) => RecordInput::Text(text.clone()),
                None => record_from(&[
                    ("user_id", user_id.as_ref()),
                    ("event_date", event_date.as_ref()),
                ])
                .into(),
            };
            ledger.create_lock(input)
        }
        LockCmd::Del(scope) => match scope.scope() {
            Some(Scope::Key(u, d)) => ledger.delete_lock(u, d),
            Some(Scope::User(u)) => ledger.delete_all_locks_by_user(u),
            Some(Scope::Date(d)) => ledger.delete_all_locks_by_date(d),
            None => return Ok(()),
        },
    };

    emit(&out)
}
