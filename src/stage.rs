use crate::git::GitCli;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub path: PathBuf,
    pub staged: bool,
}

/// `git add` each path. Failures are logged and reported, never returned.
pub fn stage_files(git: &GitCli, repo_root: &Path, paths: &[PathBuf]) -> Vec<StageOutcome> {
    paths
        .iter()
        .map(|path| {
            let staged = match git.add(repo_root, path) {
                Ok(()) => {
                    info!(path = %path.display(), "staged heatmap");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "staging failed, leaving file unstaged");
                    false
                }
            };
            StageOutcome {
                path: path.clone(),
                staged,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn failures_do_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let git = GitCli::new("yearmap-no-such-git-binary");
        let paths = vec![dir.path().join("2024.png"), dir.path().join("2025.png")];
        let outcomes = stage_files(&git, dir.path(), &paths);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.staged));
        assert_eq!(outcomes[1].path, paths[1]);
    }
}
