//! TypeScript project model for Airship
//!
//! Two stages, each returning `AirshipResult`:
//!
//! 1. [`ConfigurationResolver::resolve`] finds the tsconfig.json governing a
//!    file and merges its extends chain into a [`BuildConfiguration`].
//! 2. [`PathTranslator`] maps the file into the configuration's output
//!    directory, or answers whether it is inside a declared root at all.
//!
//! ```rust,no_run
//! use airship_lang_typescript::ConfigurationResolver;
//! use std::path::Path;
//!
//! # fn main() -> airship_foundation::AirshipResult<()> {
//! let file = Path::new("/proj/src/Shared/Foo.ts");
//! let config = ConfigurationResolver::new().resolve(file)?;
//! let output = config
//!     .path_translator()?
//!     .get_output_path(file, &config.require_source_roots()?)?;
//! println!("{}", output.implementation.display());
//! # Ok(())
//! # }
//! ```

pub mod emit;
pub mod resolver;
pub mod translator;
pub mod tsconfig;

pub use resolver::{ConfigCache, ConfigurationResolver};
pub use translator::{OutputPaths, PathTranslator, SourceRoots};
pub use tsconfig::{BuildConfiguration, TSCONFIG_FILE_NAME};
