//! Path utilities: expand a leading `~` in configured database paths.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("/tmp/ledger.sqlite"), PathBuf::from("/tmp/ledger.sqlite"));
        assert_eq!(expand_tilde(":memory:"), PathBuf::from(":memory:"));
    }

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x.sqlite"), home.join("x.sqlite"));
        }
    }
}
