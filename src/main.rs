//! hourledger main entrypoint.

use hourledger::run;
use hourledger::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
