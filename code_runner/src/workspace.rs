//! Per-request scratch directory.
//!
//! A [`Workspace`] lives at `{root}/grading_{request_id}_{pid}_{seq}` and is
//! removed when it is destroyed or dropped, whichever comes first, unless it
//! was created with `retain` set (debugging). The `{pid}_{seq}` part keeps
//! overlapping executions of the same request apart, within one process and
//! across processes sharing a root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};
use util::identifier::validate_identifier;
use util::paths;

use crate::error::RunnerError;

static NEXT_RUN: AtomicU64 = AtomicU64::new(0);

fn next_run() -> String {
    format!("{}_{}", std::process::id(), NEXT_RUN.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    retain: bool,
    destroyed: bool,
}

impl Workspace {
    /// Creates a fresh, private workspace for `request_id` under `root`.
    ///
    /// Every call gets its own directory, even for the same `request_id`.
    pub fn create(root: &Path, request_id: &str, retain: bool) -> Result<Self, RunnerError> {
        validate_identifier("request id", request_id).map_err(RunnerError::Configuration)?;
        Self::create_at(paths::workspace_dir(root, request_id, &next_run()), retain)
    }

    /// A directory already at `path` can only be left over from a crashed
    /// process whose pid was reused, so it is removed.
    fn create_at(path: PathBuf, retain: bool) -> Result<Self, RunnerError> {
        if path.exists() {
            warn!(path = %path.display(), "Removing stale workspace");
            remove_tree(&path)?;
        }
        create_private_dir_all(&path)?;
        debug!(path = %path.display(), "Created workspace");

        Ok(Self {
            root: path,
            retain,
            destroyed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `{class_name}.java`.
    pub fn write_source(&mut self, class_name: &str, contents: &str) -> Result<PathBuf, RunnerError> {
        validate_identifier("class name", class_name).map_err(RunnerError::Configuration)?;
        self.write(paths::source_path(&self.root, class_name), contents)
    }

    /// Writes a debug log next to `file` (`{file}_{suffix}.txt`).
    pub fn write_debug_log(&mut self, file: &Path, suffix: &str, contents: &str) -> Result<PathBuf, RunnerError> {
        self.write(paths::debug_log_path(file, suffix), contents)
    }

    fn write(&self, path: PathBuf, contents: &str) -> Result<PathBuf, RunnerError> {
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Removes the workspace path from tool output so messages show bare file names.
    pub fn strip_path(&self, text: &str) -> String {
        text.replace(&self.root.display().to_string(), "")
    }

    /// Removes the workspace from disk, unless it is retained.
    pub fn destroy(mut self) -> io::Result<()> {
        self.destroyed = true;
        if self.retain {
            info!(path = %self.root.display(), "Keeping workspace (nocleanup)");
            return Ok(());
        }
        remove_tree(&self.root)?;
        debug!(path = %self.root.display(), "Removed workspace");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.destroyed || self.retain {
            return;
        }
        if let Err(e) = remove_tree(&self.root) {
            warn!(path = %self.root.display(), error = %e, "Failed to remove workspace");
        }
    }
}

fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn create_private_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_write_destroy() {
        let tmp = tempdir().unwrap();
        let mut ws = Workspace::create(tmp.path(), "42_7", false).unwrap();
        let path = ws.path().to_path_buf();
        assert!(path.is_dir());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("grading_42_7_"));

        let file = ws.write_source("Foo", "class Foo {}").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "class Foo {}");

        ws.destroy().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_workspace() {
        let tmp = tempdir().unwrap();
        let path = {
            let mut ws = Workspace::create(tmp.path(), "dropped", false).unwrap();
            ws.write_source("Ab", "").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_retained_workspace_survives() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::create(tmp.path(), "kept", true).unwrap();
        let path = ws.path().to_path_buf();
        ws.destroy().unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_stale_directory_is_replaced() {
        let tmp = tempdir().unwrap();
        let stale = paths::workspace_dir(tmp.path(), "again", "1_0");
        fs::create_dir_all(stale.join("nested")).unwrap();
        fs::write(stale.join("nested").join("old.class"), "x").unwrap();

        let ws = Workspace::create_at(stale.clone(), false).unwrap();
        assert_eq!(ws.path(), stale.as_path());
        assert!(!ws.path().join("nested").exists());
    }

    #[test]
    fn test_same_request_gets_separate_workspaces() {
        let tmp = tempdir().unwrap();
        let mut first = Workspace::create(tmp.path(), "31_2", false).unwrap();
        first.write_source("Calc", "class Calc {}").unwrap();

        let second = Workspace::create(tmp.path(), "31_2", false).unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first.path().join("Calc.java").is_file());

        let first_path = first.path().to_path_buf();
        second.destroy().unwrap();
        assert!(first_path.join("Calc.java").is_file());
        first.destroy().unwrap();
        assert!(!first_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_workspace_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempdir().unwrap();
        let ws = Workspace::create(tmp.path(), "private", false).unwrap();
        let mode = fs::metadata(ws.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_bad_request_id_is_rejected() {
        let tmp = tempdir().unwrap();
        let err = Workspace::create(tmp.path(), "../../etc", false).unwrap_err();
        assert!(matches!(err, RunnerError::Configuration(_)));
    }

    #[test]
    fn test_source_names_cannot_escape() {
        let tmp = tempdir().unwrap();
        let mut ws = Workspace::create(tmp.path(), "src", false).unwrap();
        let file = ws.write_source("Calc", "class Calc {}").unwrap();
        assert_eq!(file, ws.path().join("Calc.java"));
        assert!(ws.write_source("../Calc", "").is_err());
        assert!(ws.write_source("", "").is_err());
    }

    #[test]
    fn test_strip_path() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::create(tmp.path(), "strip", false).unwrap();
        let msg = format!("{}/Foo.java:3: error: oops", ws.path().display());
        assert_eq!(ws.strip_path(&msg), "/Foo.java:3: error: oops");
    }
}
