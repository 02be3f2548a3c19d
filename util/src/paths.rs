use std::path::{Path, PathBuf};

/// Resolve a possibly relative root against the current working directory.
pub fn absolute_root<P: AsRef<Path>>(root: P) -> PathBuf {
    let p = root.as_ref();
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Name prefix shared by every workspace of a request: grading_{request_id}_
pub fn workspace_prefix(request_id: &str) -> String {
    format!("grading_{request_id}_")
}

/// Workspace of one execution of a request: {root}/grading_{request_id}_{run}
///
/// `run` tells apart executions of the same request that overlap in time.
pub fn workspace_dir<P: AsRef<Path>>(root: P, request_id: &str, run: &str) -> PathBuf {
    absolute_root(root).join(format!("{}{run}", workspace_prefix(request_id)))
}

/// Java source file for a class inside a workspace: {workspace}/{class_name}.java
pub fn source_path<P: AsRef<Path>>(workspace: P, class_name: &str) -> PathBuf {
    workspace.as_ref().join(format!("{class_name}.java"))
}

/// Debug log written next to a source file: {file}_{suffix}.txt
pub fn debug_log_path<P: AsRef<Path>>(file: P, suffix: &str) -> PathBuf {
    let mut name = file.as_ref().as_os_str().to_owned();
    name.push(format!("_{suffix}.txt"));
    PathBuf::from(name)
}
