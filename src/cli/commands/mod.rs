pub mod event;
pub mod init;
pub mod lock;
pub mod log;
pub mod users;

use crate::cli::parser::ScopeArgs;
use crate::errors::AppResult;
use serde_json::{Map, Value};

/// What a `del` command targets.
pub(crate) enum Scope<'a> {
    Key(&'a str, &'a str),
    User(&'a str),
    Date(&'a str),
}

impl ScopeArgs {
    /// clap's `scope` group guarantees exactly one branch is set.
    pub(crate) fn scope(&self) -> Option<Scope<'_>> {
        match (
            self.user_id.as_deref(),
            self.event_date.as_deref(),
            self.all_user.as_deref(),
            self.all_date.as_deref(),
        ) {
            (Some(u), Some(d), _, _) => Some(Scope::Key(u, d)),
            (_, _, Some(u), _) => Some(Scope::User(u)),
            (_, _, _, Some(d)) => Some(Scope::Date(d)),
            _ => None,
        }
    }
}

/// Build a structured record from optional CLI fields; unset fields are left out.
pub(crate) fn record_from(fields: &[(&str, Option<&String>)]) -> Value {
    let mut map = Map::new();
    for (key, value) in fields {
        if let Some(v) = value {
            map.insert((*key).to_string(), Value::String((*v).clone()));
        }
    }
    Value::Object(map)
}

/// Print a facade payload on stdout.
pub(crate) fn emit(value: &Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
