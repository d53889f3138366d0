mod cli;
mod tui;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellexpand_leaves_plain_paths() {
        assert_eq!(shellexpand("/tmp/out.csv"), "/tmp/out.csv");
        assert_eq!(shellexpand("out.csv"), "out.csv");
    }

    #[test]
    fn test_shellexpand_home_prefix() {
        let expanded = shellexpand("~/out.csv");
        assert!(expanded.ends_with("/out.csv"));
        assert!(!expanded.starts_with('~'));
    }
}
