use crate::error::{Result, YearmapError};
use crate::git::log::parse_log_output;
use chrono::{DateTime, FixedOffset};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::rc::Rc;
use tracing::debug;

/// Thin wrapper around the `git` command line.
///
/// Every invocation runs as `git -C <dir> ...`; the process working
/// directory is never touched.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl GitCli {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
        }
    }

    fn run(&self, dir: &Path, args: &[&OsStr]) -> std::io::Result<Output> {
        debug!(dir = %dir.display(), ?args, "running git");
        Command::new(&self.program).arg("-C").arg(dir).args(args).output()
    }

    /// Raw commit timestamps for the full history of `repo`, newest first.
    ///
    /// `--date=default` overrides any `log.date` setting so the output always
    /// matches [`GIT_DATE_FORMAT`](crate::git::GIT_DATE_FORMAT).
    pub fn commit_timestamps(&self, repo: &Path) -> Result<Vec<DateTime<FixedOffset>>> {
        let unavailable = |message: String| YearmapError::SourceUnavailable {
            repo: repo.to_path_buf(),
            message,
        };

        let output = self
            .run(
                repo,
                &[
                    OsStr::new("log"),
                    OsStr::new("--date=default"),
                    OsStr::new("--pretty=format:%cd"),
                ],
            )
            .map_err(|e| unavailable(format!("failed to run {}: {e}", self.program.to_string_lossy())))?;

        if !output.status.success() {
            return Err(unavailable(stderr_text(&output)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stamps = parse_log_output(&stdout)?;
        debug!(repo = %repo.display(), commits = stamps.len(), "read commit history");
        Ok(stamps)
    }

    /// `git rev-parse --show-toplevel` as seen from `dir`.
    pub fn show_toplevel(&self, dir: &Path) -> Result<PathBuf> {
        let output = self.run(dir, &[OsStr::new("rev-parse"), OsStr::new("--show-toplevel")])?;
        if !output.status.success() {
            return Err(YearmapError::SourceUnavailable {
                repo: dir.to_path_buf(),
                message: stderr_text(&output),
            });
        }

        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if top.is_empty() {
            return Err(YearmapError::Parse(
                "git rev-parse --show-toplevel printed nothing".to_string(),
            ));
        }
        Ok(PathBuf::from(top))
    }

    /// `git add -- <path>` inside `repo`.
    pub fn add(&self, repo: &Path, path: &Path) -> Result<()> {
        let staging_failed = |message: String| YearmapError::StagingFailed {
            path: path.to_path_buf(),
            message,
        };

        let output = self
            .run(repo, &[OsStr::new("add"), OsStr::new("--"), path.as_os_str()])
            .map_err(|e| staging_failed(e.to_string()))?;

        if !output.status.success() {
            return Err(staging_failed(stderr_text(&output)));
        }
        Ok(())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

fn stderr_text(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if text.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        text
    }
}

/// Commit history memoized per repository path for the lifetime of the run.
pub struct CommitHistory<'a> {
    git: &'a GitCli,
    memo: RefCell<HashMap<PathBuf, Rc<[DateTime<FixedOffset>]>>>,
}

impl<'a> CommitHistory<'a> {
    pub fn new(git: &'a GitCli) -> Self {
        Self {
            git,
            memo: RefCell::new(HashMap::new()),
        }
    }

    pub fn fetch(&self, repo: &Path) -> Result<Rc<[DateTime<FixedOffset>]>> {
        let key = std::fs::canonicalize(repo).unwrap_or_else(|_| repo.to_path_buf());

        if let Some(hit) = self.memo.borrow().get(&key) {
            debug!(repo = %key.display(), "commit history served from memo");
            return Ok(Rc::clone(hit));
        }

        let stamps: Rc<[DateTime<FixedOffset>]> = self.git.commit_timestamps(repo)?.into();
        self.memo.borrow_mut().insert(key, Rc::clone(&stamps));
        Ok(stamps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_program_is_source_unavailable() {
        let dir = tempdir().unwrap();
        let git = GitCli::new("yearmap-no-such-git-binary");
        let err = git.commit_timestamps(dir.path()).unwrap_err();
        match err {
            YearmapError::SourceUnavailable { repo, message } => {
                assert_eq!(repo, dir.path());
                assert!(message.contains("yearmap-no-such-git-binary"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_fetch_is_not_memoized() {
        let dir = tempdir().unwrap();
        let git = GitCli::new("yearmap-no-such-git-binary");
        let history = CommitHistory::new(&git);
        assert!(history.fetch(dir.path()).is_err());
        assert!(history.memo.borrow().is_empty());
    }

    #[test]
    fn staging_with_missing_program_fails_softly() {
        let dir = tempdir().unwrap();
        let git = GitCli::new("yearmap-no-such-git-binary");
        let err = git.add(dir.path(), Path::new("x.png")).unwrap_err();
        assert!(matches!(err, YearmapError::StagingFailed { .. }));
    }
}
