use std::path::{Path, PathBuf};

use va_config::PROJECT_DIR;
use va_store::service::REPORTS_DIR;

const CONFIG_FILE: &str = "config.toml";

/// Walk upwards from `start` to the nearest analytica project: a directory
/// whose `.analytica` holds a `config.toml` from `vana init` or a report
/// store. A bare `.analytica` directory is passed over.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| is_project(dir)).map(Path::to_path_buf)
}

fn is_project(dir: &Path) -> bool {
    let project_dir = dir.join(PROJECT_DIR);
    project_dir.join(CONFIG_FILE).is_file() || project_dir.join(REPORTS_DIR).is_dir()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::find_project_root;

    fn init_project(root: &Path) {
        std::fs::create_dir_all(root.join(".analytica")).expect(".analytica should create");
        std::fs::write(root.join(".analytica/config.toml"), "").expect("config should write");
    }

    #[test]
    fn finds_an_initialized_project_from_a_nested_dir() {
        let temp = TempDir::new().expect("tempdir should create");
        init_project(temp.path());
        std::fs::create_dir_all(temp.path().join("decks/2026")).expect("nested dirs should create");

        assert_eq!(find_project_root(temp.path()).as_deref(), Some(temp.path()));
        assert_eq!(
            find_project_root(&temp.path().join("decks/2026")).as_deref(),
            Some(temp.path())
        );
    }

    #[test]
    fn a_report_store_marks_a_project_without_config() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join(".analytica/reports")).expect("store should create");

        assert_eq!(find_project_root(temp.path()).as_deref(), Some(temp.path()));
    }

    #[test]
    fn bare_project_dir_is_skipped_for_the_enclosing_project() {
        let temp = TempDir::new().expect("tempdir should create");
        init_project(temp.path());
        let inner = temp.path().join("fund-ii");
        std::fs::create_dir_all(inner.join(".analytica")).expect("bare dir should create");

        assert_eq!(find_project_root(&inner).as_deref(), Some(temp.path()));
    }

    #[test]
    fn plain_file_named_like_the_project_dir_does_not_count() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::write(temp.path().join(".analytica"), "").expect("file should write");

        assert!(find_project_root(temp.path()).is_none());
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join("a/b/c")).expect("nested dirs should create");

        assert!(find_project_root(&temp.path().join("a/b/c")).is_none());
    }
}
