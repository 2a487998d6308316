//! Source-to-output path translation
//!
//! Replicates where the TypeScript compiler writes the output of a source
//! file: the file's path relative to the root directory that contains it is
//! re-rooted under `outDir` and its extension rewritten per the emit table.

use crate::emit::{self, SourceKind};
use airship_foundation::paths::{is_parent_relative, normalize_path, relative_path, resolve_against};
use airship_foundation::{AirshipError, AirshipResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Ordered, non-empty list of declared root directories
///
/// Order is the tie-break when roots overlap: the first root containing a
/// file is the one its output path is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRoots(Vec<PathBuf>);

impl SourceRoots {
    /// `None` when no roots are given
    pub fn new<I, P>(roots: I) -> Option<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
        if roots.is_empty() {
            None
        } else {
            Some(Self(roots))
        }
    }

    /// Combine `rootDirs` and `rootDir`
    ///
    /// `rootDirs` entries come first in their declared order; `rootDir` is
    /// appended unless it is already listed.
    pub fn from_options(root_dir: Option<&Path>, root_dirs: Option<&[PathBuf]>) -> Option<Self> {
        let mut roots: Vec<PathBuf> = root_dirs.map(<[PathBuf]>::to_vec).unwrap_or_default();
        if let Some(root_dir) = root_dir {
            if !roots.iter().any(|r| r == root_dir) {
                roots.push(root_dir.to_path_buf());
            }
        }
        Self::new(roots)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

}

/// Where the compiler writes the output for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    /// Emitted implementation (or copied asset)
    pub implementation: PathBuf,
    /// Emitted declaration file, when declaration emit is on and the source
    /// is compiled code
    pub declaration: Option<PathBuf>,
}

/// Maps source files to compiled-output files
///
/// Holds only immutable construction parameters; every method is a pure
/// function of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTranslator {
    base_path: PathBuf,
    out_dir: PathBuf,
    declaration_extension: Option<String>,
    declaration_emit: bool,
    declaration_dir: Option<PathBuf>,
}

impl PathTranslator {
    /// Create a translator
    ///
    /// # Arguments
    ///
    /// * `base_path` - Directory relative roots and `out_dir` are resolved against
    /// * `out_dir` - Output directory
    /// * `declaration_extension` - Replaces the emit table's declaration
    ///   extension (e.g. `".d.ts"`) when set
    /// * `declaration_emit` - Whether declaration files are produced
    pub fn new(
        base_path: impl AsRef<Path>,
        out_dir: impl AsRef<Path>,
        declaration_extension: Option<String>,
        declaration_emit: bool,
    ) -> Self {
        let base_path = normalize_path(base_path.as_ref());
        let out_dir = resolve_against(&base_path, out_dir.as_ref());
        let declaration_extension = declaration_extension.map(|ext| {
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        });

        Self {
            base_path,
            out_dir,
            declaration_extension,
            declaration_emit,
            declaration_dir: None,
        }
    }

    /// Write declaration files under `dir` instead of next to the implementation
    pub fn with_declaration_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.declaration_dir = Some(resolve_against(&self.base_path, dir.as_ref()));
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Whether `file_path` lies inside one of `roots`
    ///
    /// Unknown roots mean the file is not recognized as source.
    pub fn is_in_source_root(&self, file_path: &Path, roots: Option<&SourceRoots>) -> bool {
        roots.is_some_and(|roots| self.matching_root(file_path, roots).is_some())
    }

    /// First root containing `file_path`, with the path relative to it
    ///
    /// A root directory is not inside itself: only entries beneath it match.
    pub fn matching_root(&self, file_path: &Path, roots: &SourceRoots) -> Option<(PathBuf, PathBuf)> {
        roots.iter().find_map(|root| {
            let root = resolve_against(&self.base_path, root);
            let relative = relative_path(&root, file_path)?;
            if relative.as_os_str().is_empty() || is_parent_relative(&relative) {
                None
            } else {
                Some((root, relative))
            }
        })
    }

    /// Compute the output location of `file_path`
    ///
    /// Fails with `NoMatchingRoot` rather than inventing a path when the file
    /// is outside every root.
    pub fn get_output_path(&self, file_path: &Path, roots: &SourceRoots) -> AirshipResult<OutputPaths> {
        let (root, relative) = self
            .matching_root(file_path, roots)
            .ok_or_else(|| AirshipError::no_matching_root(normalize_path(file_path)))?;

        let file_name = relative
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AirshipError::no_matching_root(normalize_path(file_path)))?;
        let relative_dir = relative.parent().unwrap_or_else(|| Path::new(""));

        let paths = match emit::classify(file_name) {
            SourceKind::Code { stem, rule } => {
                let implementation = self
                    .out_dir
                    .join(relative_dir)
                    .join(format!("{}{}", stem, rule.implementation));
                let declaration = self.declaration_emit.then(|| {
                    let extension = self
                        .declaration_extension
                        .as_deref()
                        .unwrap_or(rule.declaration);
                    self.declaration_dir
                        .as_deref()
                        .unwrap_or(&self.out_dir)
                        .join(relative_dir)
                        .join(format!("{}{}", stem, extension))
                });
                OutputPaths {
                    implementation,
                    declaration,
                }
            }
            SourceKind::Declaration | SourceKind::Asset => OutputPaths {
                implementation: self.out_dir.join(&relative),
                declaration: None,
            },
        };

        trace!(
            source = %file_path.display(),
            root = %root.display(),
            output = %paths.implementation.display(),
            "Translated source path"
        );

        Ok(paths)
    }

    /// Source files that could have produced `output_path`, in root order
    ///
    /// Candidates are not checked against the filesystem. Outputs outside
    /// the output (and declaration) directory have no candidates.
    pub fn get_input_paths(&self, output_path: &Path, roots: &SourceRoots) -> Vec<PathBuf> {
        let relative = [Some(self.out_dir.as_path()), self.declaration_dir.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|dir| relative_path(dir, output_path))
            .find(|rel| !is_parent_relative(rel));

        let Some(relative) = relative else {
            return Vec::new();
        };
        let Some(file_name) = relative.file_name().and_then(|name| name.to_str()) else {
            return Vec::new();
        };
        let relative_dir = relative.parent().unwrap_or_else(|| Path::new(""));

        let names: Vec<String> = match emit::source_candidates(file_name) {
            Some((stem, extensions)) => extensions
                .into_iter()
                .map(|ext| format!("{}{}", stem, ext))
                .collect(),
            None => vec![file_name.to_string()],
        };

        roots
            .iter()
            .map(|root| resolve_against(&self.base_path, root))
            .flat_map(|root| {
                names
                    .iter()
                    .map(move |name| root.join(relative_dir).join(name))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
