use crate::error::{Result, YearmapError};
use crate::git::GitCli;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_OUTPUT_DIR: &str = "yearly_heatmaps";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    pub root: PathBuf,
    pub path: PathBuf,
    pub created: bool,
}

/// Repository top level as reported by git, or `cwd` if git cannot tell.
pub fn resolve_root(git: &GitCli, cwd: &Path) -> PathBuf {
    match git.show_toplevel(cwd) {
        Ok(root) => root,
        Err(e) => {
            warn!(error = %e, fallback = %cwd.display(), "could not locate repository root");
            cwd.to_path_buf()
        }
    }
}

/// Make sure `<root>/<dir_name>` exists.
///
/// Calling it again for an existing directory reports `created = false`.
pub fn ensure_output_dir(
    git: &GitCli,
    repo_root: Option<&Path>,
    cwd: &Path,
    dir_name: &Path,
) -> Result<OutputDir> {
    let root = match repo_root {
        Some(root) => root.to_path_buf(),
        None => resolve_root(git, cwd),
    };
    let path = root.join(dir_name);

    if path.is_dir() {
        debug!(path = %path.display(), "output directory already present");
        return Ok(OutputDir {
            root,
            path,
            created: false,
        });
    }

    std::fs::create_dir_all(&path).map_err(|source| YearmapError::OutputDirUnavailable {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "created output directory");

    Ok(OutputDir {
        root,
        path,
        created: true,
    })
}

pub fn image_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("{year}.png"))
}

pub fn write_image(dir: &Path, year: i32, png: &[u8]) -> Result<PathBuf> {
    let path = image_path(dir, year);
    std::fs::write(&path, png)?;
    info!(path = %path.display(), bytes = png.len(), "wrote heatmap");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_git() -> GitCli {
        GitCli::new("yearmap-no-such-git-binary")
    }

    #[test]
    fn creates_then_reuses_directory() {
        let root = tempdir().unwrap();
        let git = no_git();
        let name = Path::new(DEFAULT_OUTPUT_DIR);

        let first = ensure_output_dir(&git, Some(root.path()), root.path(), name).unwrap();
        assert!(first.created);
        assert!(first.path.is_dir());

        let second = ensure_output_dir(&git, Some(root.path()), root.path(), name).unwrap();
        assert!(!second.created);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn nested_directories_are_created() {
        let root = tempdir().unwrap();
        let out = ensure_output_dir(&no_git(), Some(root.path()), root.path(), Path::new("a/b/c")).unwrap();
        assert!(out.created);
        assert!(root.path().join("a/b/c").is_dir());
    }

    #[test]
    fn falls_back_to_cwd_without_git() {
        let cwd = tempdir().unwrap();
        let out = ensure_output_dir(&no_git(), None, cwd.path(), Path::new(DEFAULT_OUTPUT_DIR)).unwrap();
        assert_eq!(out.root, cwd.path());
        assert_eq!(out.path, cwd.path().join(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn blocked_path_is_output_dir_unavailable() {
        let root = tempdir().unwrap();
        std::fs::write(root.path().join("taken"), b"file").unwrap();
        let err = ensure_output_dir(&no_git(), Some(root.path()), root.path(), Path::new("taken/sub")).unwrap_err();
        assert!(matches!(err, YearmapError::OutputDirUnavailable { .. }));
    }

    #[test]
    fn writes_year_file() {
        let dir = tempdir().unwrap();
        let path = write_image(dir.path(), 2025, b"png").unwrap();
        assert_eq!(path, dir.path().join("2025.png"));
        assert_eq!(std::fs::read(path).unwrap(), b"png");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let err = write_image(&dir.path().join("missing"), 2025, b"png").unwrap_err();
        assert!(matches!(err, YearmapError::Io(_)));
    }
}
