//! Locating the compiled output of a source file
//!
//! Backs the "open output" commands: the editor build lands in the
//! configuration's `outDir`, published server and client builds under
//! `TypeScript~/dist` next to the tsconfig.json.

use airship_foundation::{AirshipError, AirshipResult};
use airship_lang_typescript::{
    BuildConfiguration, ConfigurationResolver, OutputPaths, PathTranslator,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Published builds live in `<configDir>/TypeScript~/dist/<target>`
const PUBLISHED_DIST_DIR: [&str; 2] = ["TypeScript~", "dist"];

/// Which build to look in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    /// Output of the editor's watch compiler (`outDir`)
    Editor,
    Server,
    Client,
}

impl OutputTarget {
    fn out_dir(self, config: &BuildConfiguration) -> AirshipResult<PathBuf> {
        let out_dir = config.require_out_dir()?;
        let published = |name: &str| {
            PUBLISHED_DIST_DIR
                .iter()
                .fold(config.base_path().to_path_buf(), |dir, part| dir.join(part))
                .join(name)
        };
        Ok(match self {
            Self::Editor => out_dir.to_path_buf(),
            Self::Server => published("server"),
            Self::Client => published("client"),
        })
    }

    /// Published builds keep declarations next to the implementation;
    /// only the editor build honours `declarationDir`.
    fn translator(self, config: &BuildConfiguration) -> AirshipResult<PathTranslator> {
        let out_dir = self.out_dir(config)?;
        Ok(match self {
            Self::Editor => config.path_translator_into(&out_dir),
            Self::Server | Self::Client => {
                PathTranslator::new(config.base_path(), &out_dir, None, config.declaration)
            }
        })
    }
}

/// A located output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLocation {
    pub source: PathBuf,
    pub target: OutputTarget,
    pub config_file_path: PathBuf,
    /// The implementation is known to exist; the declaration is not checked
    pub outputs: OutputPaths,
}

/// Finds the compiled output of source files
#[derive(Debug, Clone, Default)]
pub struct OutputLocator {
    resolver: ConfigurationResolver,
}

impl OutputLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: ConfigurationResolver) -> Self {
        Self { resolver }
    }

    /// Output file produced from `file` for `target`
    ///
    /// # Errors
    ///
    /// * `ConfigNotFound` / `ConfigParse` / extends errors from resolution
    /// * `MissingRequiredOption` when `outDir` or every root is unset
    /// * `NoMatchingRoot` when `file` is outside every root
    /// * `OutputNotFound` when the compiler has not produced the file yet
    pub fn locate(&self, file: &Path, target: OutputTarget) -> AirshipResult<OutputLocation> {
        let config = self.resolver.resolve(file)?;
        let translator = target.translator(&config)?;
        let roots = config.require_source_roots()?;
        let outputs = translator.get_output_path(file, &roots)?;

        if !outputs.implementation.exists() {
            warn!(
                source = %file.display(),
                output = %outputs.implementation.display(),
                "Output file does not exist"
            );
            return Err(AirshipError::output_not_found(&outputs.implementation));
        }

        debug!(
            source = %file.display(),
            output = %outputs.implementation.display(),
            target = ?target,
            "Located output"
        );

        Ok(OutputLocation {
            source: file.to_path_buf(),
            target,
            config_file_path: config.config_file_path,
            outputs,
        })
    }

    /// Whether `file` is inside a declared root of its configuration
    ///
    /// Any failure (no tsconfig, unreadable file, no roots) counts as "no".
    pub fn is_path_in_src(&self, file: &Path) -> bool {
        match self.resolver.resolve(file) {
            // Membership only depends on the base path, any output directory will do
            Ok(config) => config
                .path_translator_into(config.base_path())
                .is_in_source_root(file, config.source_roots().as_ref()),
            Err(e) => {
                debug!(file = %file.display(), error = %e, "Not treating file as source");
                false
            }
        }
    }
}
