use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Manages a temporary Airship project for a test scenario.
/// Cleans up automatically when dropped.
pub struct TestWorkspace {
    pub temp_dir: TempDir,
    root: PathBuf,
}

impl TestWorkspace {
    /// Creates a new empty workspace.
    ///
    /// The root is canonicalized so paths returned by the resolver compare
    /// equal to paths built here, even when the temp directory is a symlink.
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let root = fs::canonicalize(temp_dir.path()).expect("Failed to canonicalize temp dir");
        Self { temp_dir, root }
    }

    /// Returns the root path of the workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with content within the workspace.
    /// Automatically creates parent directories.
    pub fn create_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent dirs for '{}': {}", rel_path, e)
            });
        }
        fs::write(&file_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", file_path.display(), e));
    }

    /// Creates a directory within the workspace.
    pub fn create_directory(&self, rel_path: &str) {
        let dir_path = self.path().join(rel_path);
        fs::create_dir_all(&dir_path).unwrap_or_else(|e| {
            panic!("Failed to create directory '{}': {}", dir_path.display(), e)
        });
    }

    /// Reads a file from the workspace.
    pub fn read_file(&self, rel_path: &str) -> String {
        let file_path = self.path().join(rel_path);
        fs::read_to_string(&file_path)
            .unwrap_or_else(|e| panic!("Failed to read file '{}': {}", file_path.display(), e))
    }

    /// Check if a file exists in the workspace.
    pub fn file_exists(&self, rel_path: &str) -> bool {
        self.path().join(rel_path).exists()
    }

    /// Get the absolute path to a file in the workspace.
    pub fn absolute_path(&self, rel_path: &str) -> PathBuf {
        self.path().join(rel_path)
    }

    /// Write a tsconfig-style JSON document at `rel_path`.
    pub fn create_json(&self, rel_path: &str, value: &Value) {
        self.create_file(
            rel_path,
            &serde_json::to_string_pretty(value).expect("Failed to serialize json"),
        );
    }

    /// Create a tsconfig.json at the workspace root.
    pub fn create_tsconfig(&self, value: &Value) {
        self.create_json("tsconfig.json", value);
    }

    /// Create the layout of a typical Airship game project:
    /// `rootDir: "src"`, `outDir: "out"` and the Shared/Client/Server folders.
    pub fn setup_airship_project(&self) {
        self.create_tsconfig(&serde_json::json!({
            "compilerOptions": {
                "rootDir": "src",
                "outDir": "out",
                "strict": true
            },
            "include": ["src/**/*"]
        }));
        for dir in ["src/Shared", "src/Client", "src/Server"] {
            self.create_directory(dir);
        }
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
