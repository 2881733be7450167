//! Python file discovery
//!
//! Walks the project with `.gitignore` support, keeps `.py` files and drops
//! anything matching the configured ignore patterns.

use crate::config::QualityConfig;
use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions treated as Python source
const PYTHON_EXTENSIONS: &[&str] = &["py"];

fn is_python_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PYTHON_EXTENSIONS.contains(&ext))
}

/// Collect Python files under `root`, sorted by path.
///
/// A single-file `root` yields itself when it is a `.py` file. Ignore
/// patterns are matched against the path relative to `root`.
pub fn collect_python_files(root: &Path, config: &QualityConfig) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(if is_python_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let ignore = config.ignore_matcher()?;
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_python_file(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if ignore.is_match(relative) {
            debug!("Ignoring {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, "x = 1\n").expect("write file");
    }

    #[test]
    fn test_collects_only_python_files_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "b.py");
        touch(dir.path(), "a.py");
        touch(dir.path(), "pkg/mod.py");
        touch(dir.path(), "README.md");
        touch(dir.path(), "script.pyc");

        let files = collect_python_files(dir.path(), &QualityConfig::default()).expect("collect");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).expect("under root").to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("b.py"),
                PathBuf::from("pkg").join("mod.py"),
            ]
        );
    }

    #[test]
    fn test_default_ignores_skip_virtualenvs() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "app.py");
        touch(dir.path(), "venv/lib/site.py");
        touch(dir.path(), "__pycache__/cached.py");

        let files = collect_python_files(dir.path(), &QualityConfig::default()).expect("collect");
        assert_eq!(files, vec![dir.path().join("app.py")]);
    }

    #[test]
    fn test_custom_ignore_glob() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "app.py");
        touch(dir.path(), "test_app.py");

        let config = QualityConfig {
            ignore_patterns: vec!["test_*.py".to_string()],
            ..QualityConfig::default()
        };
        let files = collect_python_files(dir.path(), &config).expect("collect");
        assert_eq!(files, vec![dir.path().join("app.py")]);
    }

    #[test]
    fn test_multi_wildcard_ignore_glob() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "tests/unit/fixture_a.py");
        touch(dir.path(), "tests/unit/test_a.py");
        touch(dir.path(), "pkg/my_generated_code.py");

        let config = QualityConfig {
            ignore_patterns: vec!["tests/*/fixture_*.py".to_string(), "*generated*".to_string()],
            ..QualityConfig::default()
        };
        let files = collect_python_files(dir.path(), &config).expect("collect");
        assert_eq!(files, vec![dir.path().join("tests").join("unit").join("test_a.py")]);
    }

    #[test]
    fn test_respects_gitignore() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "app.py");
        touch(dir.path(), "build/generated.py");
        fs::write(dir.path().join(".gitignore"), "build/\n").expect("write gitignore");

        let files = collect_python_files(dir.path(), &QualityConfig::default()).expect("collect");
        assert_eq!(files, vec![dir.path().join("app.py")]);
    }

    #[test]
    fn test_single_file_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "one.py");
        touch(dir.path(), "notes.txt");

        let one = dir.path().join("one.py");
        let files = collect_python_files(&one, &QualityConfig::default()).expect("collect");
        assert_eq!(files, vec![one]);

        let notes = dir.path().join("notes.txt");
        let files = collect_python_files(&notes, &QualityConfig::default()).expect("collect");
        assert!(files.is_empty());
    }
}
