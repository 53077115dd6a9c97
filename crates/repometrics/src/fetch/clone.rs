use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::tool::run_tool;

/// Result of a successful clone request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// A fresh shallow clone was made.
    Cloned(PathBuf),
    /// The target directory already existed; nothing was run.
    AlreadyPresent(PathBuf),
}

impl CloneOutcome {
    pub fn path(&self) -> &Path {
        match self {
            CloneOutcome::Cloned(path) | CloneOutcome::AlreadyPresent(path) => path,
        }
    }

    pub fn already_present(&self) -> bool {
        matches!(self, CloneOutcome::AlreadyPresent(_))
    }
}

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("refusing to clone into unsafe directory name {0:?}")]
    InvalidName(String),

    #[error("could not create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git could not be started: {0}")]
    Spawn(String),

    #[error("git clone exited with status {code:?}: {stderr}")]
    Git { code: Option<i32>, stderr: String },
}

/// Materializes a repository checkout on disk.
#[async_trait]
pub trait Cloner: Send + Sync {
    /// Clone `clone_url` into a directory called `name`.
    async fn clone_repo(&self, clone_url: &str, name: &str) -> Result<CloneOutcome, CloneError>;
}

/// Shallow clones with the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCloner {
    clone_dir: PathBuf,
    git: String,
}

impl GitCloner {
    pub fn new(clone_dir: impl Into<PathBuf>) -> Self {
        Self {
            clone_dir: clone_dir.into(),
            git: "git".to_string(),
        }
    }

    /// Use a different `git` executable.
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    pub fn clone_dir(&self) -> &Path {
        &self.clone_dir
    }

    /// Where a repository called `name` is checked out.
    pub fn target_path(&self, name: &str) -> Result<PathBuf, CloneError> {
        let unsafe_name = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.contains('\0');
        if unsafe_name {
            return Err(CloneError::InvalidName(name.to_string()));
        }
        Ok(self.clone_dir.join(name))
    }
}

#[async_trait]
impl Cloner for GitCloner {
    async fn clone_repo(&self, clone_url: &str, name: &str) -> Result<CloneOutcome, CloneError> {
        let target = self.target_path(name)?;
        if target.exists() {
            debug!(path = %target.display(), "checkout already present, skipping clone");
            return Ok(CloneOutcome::AlreadyPresent(target));
        }

        tokio::fs::create_dir_all(&self.clone_dir)
            .await
            .map_err(|source| CloneError::Io {
                path: self.clone_dir.display().to_string(),
                source,
            })?;

        let args: Vec<OsString> = vec![
            "clone".into(),
            "--depth=1".into(),
            clone_url.into(),
            target.clone().into_os_string(),
        ];
        let output = run_tool(&self.git, args).await;

        if let Some(error) = output.error {
            return Err(CloneError::Spawn(error));
        }
        if !output.success {
            return Err(CloneError::Git {
                code: output.return_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(CloneOutcome::Cloned(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_path_rejects_traversal() {
        let cloner = GitCloner::new("projects");
        assert_eq!(
            cloner.target_path("requests").expect("safe name"),
            PathBuf::from("projects/requests")
        );
        for bad in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(cloner.target_path(bad), Err(CloneError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn existing_directory_is_not_cloned_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("flask")).expect("mkdir");

        // A git binary that does not exist proves nothing is spawned.
        let cloner = GitCloner::new(dir.path()).with_git("repometrics-missing-git");
        let outcome = cloner
            .clone_repo("https://github.com/pallets/flask.git", "flask")
            .await
            .expect("existing checkout is reused");

        assert!(outcome.already_present());
        assert_eq!(outcome.path(), dir.path().join("flask"));
    }

    #[tokio::test]
    async fn missing_git_is_a_spawn_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cloner =
            GitCloner::new(dir.path().join("checkouts")).with_git("repometrics-missing-git");

        let err = cloner
            .clone_repo("https://github.com/pallets/flask.git", "flask")
            .await
            .expect_err("spawn should fail");
        assert!(matches!(err, CloneError::Spawn(_)));
        assert!(dir.path().join("checkouts").is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clone_is_shallow_into_the_named_directory() {
        use crate::tool::fake_tool;

        let tools = tempfile::tempdir().expect("tempdir");
        let (git, log) = fake_tool::install(tools.path(), "git", "exit 0");
        let checkouts = tempfile::tempdir().expect("tempdir");
        let cloner = GitCloner::new(checkouts.path()).with_git(git);

        let outcome = cloner
            .clone_repo("https://github.com/pallets/flask.git", "flask")
            .await
            .expect("clone succeeds");

        let target = checkouts.path().join("flask");
        assert_eq!(outcome, CloneOutcome::Cloned(target.clone()));
        assert_eq!(
            fake_tool::recorded_args(&log),
            vec![
                "clone".to_string(),
                "--depth=1".to_string(),
                "https://github.com/pallets/flask.git".to_string(),
                target.display().to_string(),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_git_reports_status_and_stderr() {
        let dir = tempfile::tempdir().expect("tempdir");
        // `false` ignores its arguments and exits 1.
        let cloner = GitCloner::new(dir.path()).with_git("false");

        let err = cloner
            .clone_repo("https://example.invalid/repo.git", "repo")
            .await
            .expect_err("clone should fail");
        match err {
            CloneError::Git { code, .. } => assert_eq!(code, Some(1)),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
