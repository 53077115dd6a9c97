//! Locating Python sources and staging them for multimetric.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::PipelineError;

/// Suffix appended to a project name to form its staging directory.
pub const ANALYSIS_SUFFIX: &str = "_analysis";

/// The Python sources of one project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    /// Directory name under the projects root.
    pub name: String,
    pub path: PathBuf,
    /// Every `.py` file below `path`, sorted.
    pub python_files: Vec<PathBuf>,
}

/// List the `.py` files of every sub-directory of `projects_dir`.
///
/// Projects come back sorted by name. Unreadable entries below a project are
/// skipped; an unreadable `projects_dir` is an error.
pub fn collect_python_files(projects_dir: &Path) -> Result<Vec<ProjectFiles>, PipelineError> {
    let entries = std::fs::read_dir(projects_dir).map_err(|e| PipelineError::io(projects_dir, e))?;

    let mut projects = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(projects_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let mut python_files: Vec<PathBuf> = WalkDir::new(&path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "py"))
            .map(walkdir::DirEntry::into_path)
            .collect();
        python_files.sort();

        projects.push(ProjectFiles {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            python_files,
        });
    }

    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

/// Copy a project's Python files flat into `<analysis_dir>/<name>_analysis`.
///
/// Files sharing a name overwrite each other, so the staged set can be
/// smaller than `project.python_files`. Returns the staged paths, sorted.
pub fn stage_analysis_dir(
    project: &ProjectFiles,
    analysis_dir: &Path,
) -> Result<Vec<PathBuf>, PipelineError> {
    let target = analysis_dir.join(format!("{}{ANALYSIS_SUFFIX}", project.name));
    std::fs::create_dir_all(&target).map_err(|e| PipelineError::io(&target, e))?;

    let mut staged = Vec::with_capacity(project.python_files.len());
    for source in &project.python_files {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let dest = target.join(file_name);
        std::fs::copy(source, &dest).map_err(|e| PipelineError::io(source, e))?;
        staged.push(dest);
    }

    staged.sort();
    staged.dedup();
    debug!(
        project = %project.name,
        target = %target.display(),
        files = staged.len(),
        "staged python files"
    );
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, contents).expect("write");
    }

    #[test]
    fn collects_python_files_recursively() {
        let root = tempfile::tempdir().expect("tempdir");
        touch(&root.path().join("beta/setup.py"), "");
        touch(&root.path().join("beta/pkg/core.py"), "");
        touch(&root.path().join("beta/README.md"), "");
        touch(&root.path().join("alpha/main.py"), "");
        touch(&root.path().join("stray.py"), "");

        let projects = collect_python_files(root.path()).expect("collect");

        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(projects[0].python_files.len(), 1);
        assert_eq!(
            projects[1].python_files,
            vec![
                root.path().join("beta/pkg/core.py"),
                root.path().join("beta/setup.py")
            ]
        );
    }

    #[test]
    fn staging_flattens_and_is_repeatable() {
        let root = tempfile::tempdir().expect("tempdir");
        let analysis = tempfile::tempdir().expect("tempdir");
        touch(&root.path().join("proj/a.py"), "a = 1\n");
        touch(&root.path().join("proj/sub/b.py"), "b = 2\n");
        touch(&root.path().join("proj/other/a.py"), "a = 3\n");

        let projects = collect_python_files(root.path()).expect("collect");
        let staged = stage_analysis_dir(&projects[0], analysis.path()).expect("stage");

        let dir = analysis.path().join("proj_analysis");
        assert_eq!(staged, vec![dir.join("a.py"), dir.join("b.py")]);
        assert!(dir.join("b.py").is_file());

        let again = stage_analysis_dir(&projects[0], analysis.path()).expect("restage");
        assert_eq!(again, staged);
    }

    #[test]
    fn missing_projects_dir_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let err = collect_python_files(&root.path().join("nope")).expect_err("should fail");
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
