use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::execution_config::ExecutionConfig;
use crate::paths;

/// Writes an executable `#!/bin/sh` script and returns its path.
///
/// Used to stand in for `javac`, `java` and `checkstyle` in tests.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod script");
    }

    path
}

/// A config whose toolchain is made of fake scripts living in `tools_dir`
/// and whose workspaces are created under `workspace_root`.
///
/// `javac` prints nothing, `java` prints a passing three-test JUnit run and
/// `checkstyle` reports no findings. Overwrite any script with
/// [`write_script`] to change its behaviour.
pub fn fake_toolchain_config(tools_dir: &Path, workspace_root: &Path) -> ExecutionConfig {
    let javac = write_script(tools_dir, "javac", "exit 0");
    let java = write_script(
        tools_dir,
        "java",
        "printf 'JUnit version 4.13.2\\n...\\nTime: 0.01\\n\\nOK (3 tests)\\n'",
    );
    let checkstyle = write_script(
        tools_dir,
        "checkstyle",
        "echo 'Starting audit...'; echo 'Audit done.'",
    );

    let mut cfg = ExecutionConfig::default_config();
    cfg.toolchain.javac = javac.display().to_string();
    cfg.toolchain.java = java.display().to_string();
    cfg.toolchain.checkstyle = checkstyle.display().to_string();
    cfg.limits.timeout_secs = 5;
    cfg.limits.poll_interval_ms = 50;
    cfg.workspace_root = workspace_root.to_path_buf();
    cfg
}

/// Workspaces of `request_id` currently on disk under `root`.
pub fn workspaces_of(root: &Path, request_id: &str) -> Vec<PathBuf> {
    let prefix = paths::workspace_prefix(request_id);
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .map(|entry| entry.path())
        .collect();
    found.sort();
    found
}

/// The one workspace of `request_id` left on disk (see `debug.nocleanup`).
pub fn retained_workspace(root: &Path, request_id: &str) -> PathBuf {
    let mut found = workspaces_of(root, request_id);
    assert_eq!(found.len(), 1, "expected exactly one workspace for {request_id}: {found:?}");
    found.remove(0)
}
