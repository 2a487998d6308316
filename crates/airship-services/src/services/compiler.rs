//! How to launch the Airship TypeScript compiler for a workspace
//!
//! Only the command line is decided here; supervising the process is left
//! to the caller.

use airship_config::CommandConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const COMPILER_PROGRAM: &str = "utsc";
pub const DEV_COMPILER_PROGRAM: &str = "utsc-dev";

#[cfg(windows)]
const LOCAL_INSTALL_NAME: &str = "utsc.cmd";
#[cfg(not(windows))]
const LOCAL_INSTALL_NAME: &str = "utsc";

/// The compiler installed in the workspace's node_modules
pub fn local_install_path(workspace: &Path) -> PathBuf {
    workspace
        .join("node_modules")
        .join(".bin")
        .join(LOCAL_INSTALL_NAME)
}

/// A workspace can be compiled when it carries its own compiler install
pub fn is_compilable_workspace(workspace: &Path) -> bool {
    local_install_path(workspace).is_file()
}

/// Program, arguments and working directory of one compiler run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub local_install: bool,
}

impl CompilerInvocation {
    /// Development mode always runs `utsc-dev` from PATH. Otherwise the local
    /// install wins over a global `utsc`.
    pub fn for_workspace(workspace: &Path, command: &CommandConfig) -> Self {
        let local = local_install_path(workspace);
        let (program, local_install) = if command.development {
            (PathBuf::from(DEV_COMPILER_PROGRAM), false)
        } else if local.is_file() {
            (local, true)
        } else {
            (PathBuf::from(COMPILER_PROGRAM), false)
        };

        debug!(
            program = %program.display(),
            local_install,
            development = command.development,
            "Selected compiler"
        );

        Self {
            program,
            args: command.parameters.clone(),
            working_dir: workspace.to_path_buf(),
            local_install,
        }
    }

    /// Shell-style rendering for log output
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airship_test_support::TestWorkspace;
    use pretty_assertions::assert_eq;

    fn local_install(workspace: &TestWorkspace) {
        workspace.create_file(&format!("node_modules/.bin/{}", LOCAL_INSTALL_NAME), "");
    }

    #[test]
    fn test_prefers_local_install() {
        let workspace = TestWorkspace::new();
        local_install(&workspace);

        let invocation = CompilerInvocation::for_workspace(workspace.path(), &CommandConfig::default());

        assert!(invocation.local_install);
        assert_eq!(invocation.program, local_install_path(workspace.path()));
        assert_eq!(invocation.args, vec!["build", "--watch", "--writeOnlyChanged"]);
        assert_eq!(invocation.working_dir, workspace.path());
    }

    #[test]
    fn test_falls_back_to_global_compiler() {
        let workspace = TestWorkspace::new();

        let invocation = CompilerInvocation::for_workspace(workspace.path(), &CommandConfig::default());

        assert!(!invocation.local_install);
        assert_eq!(invocation.program, PathBuf::from("utsc"));
        assert!(!is_compilable_workspace(workspace.path()));
    }

    #[test]
    fn test_development_mode_ignores_local_install() {
        let workspace = TestWorkspace::new();
        local_install(&workspace);
        let command = CommandConfig {
            parameters: vec!["build".to_string()],
            development: true,
        };

        let invocation = CompilerInvocation::for_workspace(workspace.path(), &command);

        assert_eq!(invocation.program, PathBuf::from("utsc-dev"));
        assert_eq!(invocation.display_command(), "utsc-dev build");
        assert!(is_compilable_workspace(workspace.path()));
    }
}
