//! TypeScript Configuration Parser
//!
//! Parses tsconfig.json files, follows their `extends` chains and produces a
//! [`BuildConfiguration`] with every path-valued compiler option made
//! absolute.

use crate::translator::{PathTranslator, SourceRoots};
use airship_foundation::paths::{normalize_path, normalize_separators, resolve_against};
use airship_foundation::{AirshipError, AirshipResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Name of the configuration file searched for in ancestor directories
pub const TSCONFIG_FILE_NAME: &str = "tsconfig.json";

/// Represents a parsed tsconfig.json file
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TsConfig {
    /// Base configuration(s) to inherit from
    pub extends: Option<Extends>,

    #[serde(rename = "compilerOptions")]
    pub compiler_options: Option<CompilerOptions>,
}

/// `"extends": "./base.json"` or, since TypeScript 5.0, a list where later
/// entries override earlier ones
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Extends {
    Single(String),
    Many(Vec<String>),
}

impl Extends {
    fn into_references(self) -> Vec<String> {
        match self {
            Extends::Single(reference) => vec![reference],
            Extends::Many(references) => references,
        }
    }
}

/// The compiler options that decide where output is written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompilerOptions {
    pub root_dir: Option<String>,
    pub root_dirs: Option<Vec<String>>,
    pub out_dir: Option<String>,
    pub declaration: Option<bool>,
    pub declaration_dir: Option<String>,
    /// `composite` turns declaration emit on unless `declaration` says otherwise
    pub composite: Option<bool>,
}

/// Options merged across an extends chain, paths already absolute
#[derive(Debug, Clone, Default)]
struct LayeredOptions {
    root_dir: Option<PathBuf>,
    root_dirs: Option<Vec<PathBuf>>,
    out_dir: Option<PathBuf>,
    declaration: Option<bool>,
    declaration_dir: Option<PathBuf>,
    composite: Option<bool>,
}

impl LayeredOptions {
    /// Paths are relative to the configuration file that declares them.
    fn from_compiler_options(options: CompilerOptions, config_dir: &Path) -> Self {
        let resolve = |p: String| resolve_against(config_dir, Path::new(&p));
        Self {
            root_dir: options.root_dir.map(resolve),
            root_dirs: options
                .root_dirs
                .map(|dirs| dirs.into_iter().map(resolve).collect()),
            out_dir: options.out_dir.map(resolve),
            declaration: options.declaration,
            declaration_dir: options.declaration_dir.map(resolve),
            composite: options.composite,
        }
    }

    /// Fields present in `child` replace ours; absent ones fall through.
    fn override_with(&mut self, child: LayeredOptions) {
        if child.root_dir.is_some() {
            self.root_dir = child.root_dir;
        }
        if child.root_dirs.is_some() {
            self.root_dirs = child.root_dirs;
        }
        if child.out_dir.is_some() {
            self.out_dir = child.out_dir;
        }
        if child.declaration.is_some() {
            self.declaration = child.declaration;
        }
        if child.declaration_dir.is_some() {
            self.declaration_dir = child.declaration_dir;
        }
        if child.composite.is_some() {
            self.composite = child.composite;
        }
    }
}

/// Fully merged configuration governing a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    /// The tsconfig.json found by the upward search (not an extended parent)
    pub config_file_path: PathBuf,
    pub root_dir: Option<PathBuf>,
    /// Declaration order is significant: the first matching root wins
    pub root_dirs: Option<Vec<PathBuf>>,
    pub out_dir: Option<PathBuf>,
    /// Whether declaration files are emitted next to the implementation
    pub declaration: bool,
    pub declaration_dir: Option<PathBuf>,
    /// Every configuration file read to build this one, found file first
    pub source_files: Vec<PathBuf>,
}

impl BuildConfiguration {
    /// Directory of the found configuration file; relative paths are based here.
    pub fn base_path(&self) -> &Path {
        self.config_file_path
            .parent()
            .unwrap_or_else(|| Path::new("/"))
    }

    /// Declared roots in order, or `None` when neither option is set
    pub fn source_roots(&self) -> Option<SourceRoots> {
        SourceRoots::from_options(self.root_dir.as_deref(), self.root_dirs.as_deref())
    }

    pub fn require_out_dir(&self) -> AirshipResult<&Path> {
        self.out_dir
            .as_deref()
            .ok_or_else(|| AirshipError::missing_option("outDir", &self.config_file_path))
    }

    pub fn require_source_roots(&self) -> AirshipResult<SourceRoots> {
        self.source_roots().ok_or_else(|| {
            AirshipError::missing_option("rootDir or rootDirs", &self.config_file_path)
        })
    }

    /// Translator writing into this configuration's `outDir`
    pub fn path_translator(&self) -> AirshipResult<PathTranslator> {
        let out_dir = self.require_out_dir()?;
        Ok(self.path_translator_into(out_dir))
    }

    /// Translator for an alternative output directory, honouring `declarationDir`
    pub fn path_translator_into(&self, out_dir: &Path) -> PathTranslator {
        let translator = PathTranslator::new(self.base_path(), out_dir, None, self.declaration);
        match &self.declaration_dir {
            Some(dir) => translator.with_declaration_dir(dir),
            None => translator,
        }
    }
}

impl TsConfig {
    /// Parse a tsconfig.json file
    ///
    /// Comments and trailing commas are accepted, as they are by `tsc`.
    pub fn from_file(path: &Path) -> AirshipResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| AirshipError::io_at(path, e))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| AirshipError::config_parse(path, format!("invalid UTF-8: {}", e)))?;
        Self::from_str_at(&content, path)
    }

    /// Parse tsconfig content read from `path`; a leading byte order mark is ignored.
    pub fn from_str_at(content: &str, path: &Path) -> AirshipResult<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let content = sanitize_jsonc(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|e| AirshipError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
            source: Some(e),
        })
    }

    /// Load a tsconfig.json and merge everything it extends
    pub fn load_and_merge(path: &Path) -> AirshipResult<BuildConfiguration> {
        let config_file_path = normalize_path(path);
        let mut ancestry = Vec::new();
        let mut source_files = Vec::new();

        let options = Self::load_layer(&config_file_path, &mut ancestry, &mut source_files)?;

        debug!(
            config = %config_file_path.display(),
            files = source_files.len(),
            "Resolved tsconfig"
        );

        Ok(BuildConfiguration {
            config_file_path,
            root_dir: options.root_dir,
            root_dirs: options.root_dirs,
            out_dir: options.out_dir,
            declaration: options
                .declaration
                .unwrap_or(options.composite.unwrap_or(false)),
            declaration_dir: options.declaration_dir,
            source_files,
        })
    }

    /// `ancestry` holds the configuration files currently being loaded, from
    /// the found file down to `path`'s referrer. Siblings of an extends list
    /// may share a parent; only a file extending one of its own ancestors is
    /// a cycle.
    fn load_layer(
        path: &Path,
        ancestry: &mut Vec<PathBuf>,
        source_files: &mut Vec<PathBuf>,
    ) -> AirshipResult<LayeredOptions> {
        let identity = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if ancestry.contains(&identity) {
            let mut chain = ancestry.clone();
            chain.push(identity);
            return Err(AirshipError::CircularExtends { chain });
        }
        ancestry.push(identity);

        let config = Self::from_file(path)?;
        if !source_files.iter().any(|f| f == path) {
            source_files.push(path.to_path_buf());
        }
        let config_dir = path.parent().unwrap_or_else(|| Path::new("/"));

        let mut merged = LayeredOptions::default();
        for reference in config.extends.map(Extends::into_references).unwrap_or_default() {
            let parent_path = resolve_extends(config_dir, &reference).ok_or_else(|| {
                AirshipError::ExtendsNotFound {
                    reference: reference.clone(),
                    from: path.to_path_buf(),
                }
            })?;
            trace!(from = %path.display(), extends = %parent_path.display(), "Following extends");

            let parent = Self::load_layer(&parent_path, ancestry, source_files)?;
            merged.override_with(parent);
        }

        if let Some(options) = config.compiler_options {
            merged.override_with(LayeredOptions::from_compiler_options(options, config_dir));
        }

        ancestry.pop();
        Ok(merged)
    }
}

/// Locate the file an `extends` reference points to
///
/// Relative and absolute references resolve against the referring file's
/// directory, adding `.json` when the literal path does not exist. Bare
/// references are package lookups through `node_modules` directories,
/// searched upward; a package directory resolves to its tsconfig.json.
fn resolve_extends(config_dir: &Path, reference: &str) -> Option<PathBuf> {
    let normalized = normalize_separators(Path::new(reference));
    let is_relative = reference.starts_with("./")
        || reference.starts_with("../")
        || reference.starts_with(".\\")
        || reference.starts_with("..\\");

    if is_relative || normalized.is_absolute() {
        let candidate = resolve_against(config_dir, &normalized);
        return existing_config_file(&candidate);
    }

    for dir in config_dir.ancestors() {
        let candidate = dir.join("node_modules").join(&normalized);
        if let Some(found) = existing_config_file(&candidate) {
            return Some(found);
        }
        let in_package = candidate.join(TSCONFIG_FILE_NAME);
        if in_package.is_file() {
            return Some(in_package);
        }
    }

    None
}

fn existing_config_file(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    if candidate.extension().map_or(true, |ext| ext != "json") {
        let mut with_ext = candidate.as_os_str().to_owned();
        with_ext.push(".json");
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    None
}

/// Reduce JSON-with-comments to plain JSON
///
/// Removes `//` and `/* */` comments and commas directly before `}` or `]`.
/// Removed commas become spaces and comment newlines are kept, so parse
/// errors still point at the right line.
pub(crate) fn sanitize_jsonc(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;
    // Position in `result` of a comma not yet followed by a value
    let mut pending_comma: Option<usize> = None;

    while let Some(ch) = chars.next() {
        if in_string {
            result.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ',' => {
                pending_comma = Some(result.len());
                result.push(ch);
            }
            '}' | ']' => {
                if let Some(idx) = pending_comma.take() {
                    result.replace_range(idx..idx + 1, " ");
                }
                result.push(ch);
            }
            c if c.is_whitespace() => result.push(c),
            _ => {
                pending_comma = None;
                in_string = ch == '"';
                result.push(ch);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn create_file(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn canonical(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap()
    }

    #[test]
    fn test_parse_tsconfig_with_byte_order_mark() {
        let config = TsConfig::from_str_at(
            "\u{feff}{ \"compilerOptions\": { \"outDir\": \"out\" } }",
            Path::new("/p/tsconfig.json"),
        )
        .unwrap();

        assert_eq!(config.compiler_options.unwrap().out_dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tsconfig.json");
        std::fs::write(&path, b"{\"compilerOptions\":{\"outDir\":\"o\xff\"}}").unwrap();

        match TsConfig::load_and_merge(&path) {
            Err(err @ AirshipError::ConfigParse { .. }) => {
                assert_eq!(err.error_code(), "E2001");
                assert!(err.to_string().contains("tsconfig.json"));
            }
            other => panic!("expected ConfigParse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tsconfig_with_output_options() {
        let config_json = r#"{
            // Airship projects compile src into out
            "compilerOptions": {
                "rootDirs": ["src/Client", "src/Server"],
                "outDir": "out",
                "declaration": true, /* emitted for packages */
            },
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = TsConfig::from_file(temp_file.path()).unwrap();
        let options = config.compiler_options.unwrap();

        assert_eq!(
            options.root_dirs,
            Some(vec!["src/Client".to_string(), "src/Server".to_string()])
        );
        assert_eq!(options.out_dir.as_deref(), Some("out"));
        assert_eq!(options.declaration, Some(true));
        assert!(config.extends.is_none());
    }

    #[test]
    fn test_malformed_config_reports_path() {
        let path = Path::new("/proj/tsconfig.json");
        let err = TsConfig::from_str_at(r#"{ "compilerOptions": { "outDir": } }"#, path)
            .unwrap_err();

        match err {
            AirshipError::ConfigParse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_option_type_is_a_parse_error() {
        let err = TsConfig::from_str_at(
            r#"{ "compilerOptions": { "rootDirs": "src" } }"#,
            Path::new("/p/tsconfig.json"),
        )
        .unwrap_err();
        assert!(matches!(err, AirshipError::ConfigParse { .. }));
    }

    #[test]
    fn test_empty_file_is_an_empty_config() {
        let config = TsConfig::from_str_at("  // nothing yet\n", Path::new("/p/tsconfig.json"))
            .unwrap();
        assert!(config.compiler_options.is_none());
    }

    #[test]
    fn test_paths_resolve_relative_to_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());
        create_file(
            &root.join("tsconfig.json"),
            r#"{ "compilerOptions": { "rootDir": "./src", "outDir": "out/../dist" } }"#,
        );

        let resolved = TsConfig::load_and_merge(&root.join("tsconfig.json")).unwrap();

        assert_eq!(resolved.root_dir, Some(root.join("src")));
        assert_eq!(resolved.out_dir, Some(root.join("dist")));
        assert!(!resolved.declaration);
        assert_eq!(resolved.source_files, vec![root.join("tsconfig.json")]);
    }

    #[test]
    fn test_extends_and_merge() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());

        create_file(
            &root.join("base.json"),
            r#"{ "compilerOptions": { "outDir": "dist", "rootDir": "src" } }"#,
        );
        create_file(
            &root.join("tsconfig.json"),
            r#"{ "extends": "./base.json", "compilerOptions": { "outDir": "build" } }"#,
        );

        let resolved = TsConfig::load_and_merge(&root.join("tsconfig.json")).unwrap();

        // outDir from the child, rootDir inherited
        assert_eq!(resolved.out_dir, Some(root.join("build")));
        assert_eq!(resolved.root_dir, Some(root.join("src")));
        assert_eq!(resolved.config_file_path, root.join("tsconfig.json"));
        assert_eq!(
            resolved.source_files,
            vec![root.join("tsconfig.json"), root.join("base.json")]
        );
    }

    #[test]
    fn test_extends_nested_relative_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());

        // /config/base.json declares rootDir relative to itself
        create_file(
            &root.join("config/base.json"),
            r#"{ "compilerOptions": { "rootDir": "../shared-src", "declaration": true } }"#,
        );
        // extension omitted on purpose
        create_file(
            &root.join("app/tsconfig.json"),
            r#"{ "extends": "../config/base", "compilerOptions": { "outDir": "out" } }"#,
        );

        let resolved = TsConfig::load_and_merge(&root.join("app/tsconfig.json")).unwrap();

        assert_eq!(resolved.root_dir, Some(root.join("shared-src")));
        assert_eq!(resolved.out_dir, Some(root.join("app/out")));
        assert!(resolved.declaration);
        assert_eq!(resolved.base_path(), root.join("app"));
    }

    #[test]
    fn test_extends_list_later_entries_win() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());

        create_file(
            &root.join("a.json"),
            r#"{ "compilerOptions": { "outDir": "from-a", "rootDir": "src-a" } }"#,
        );
        create_file(&root.join("b.json"), r#"{ "compilerOptions": { "outDir": "from-b" } }"#);
        create_file(
            &root.join("tsconfig.json"),
            r#"{ "extends": ["./a.json", "./b.json"] }"#,
        );

        let resolved = TsConfig::load_and_merge(&root.join("tsconfig.json")).unwrap();
        assert_eq!(resolved.out_dir, Some(root.join("from-b")));
        assert_eq!(resolved.root_dir, Some(root.join("src-a")));
    }

    #[test]
    fn test_shared_parent_is_not_a_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());

        create_file(&root.join("common.json"), r#"{ "compilerOptions": { "outDir": "out" } }"#);
        create_file(&root.join("a.json"), r#"{ "extends": "./common.json" }"#);
        create_file(&root.join("b.json"), r#"{ "extends": "./common.json" }"#);
        create_file(
            &root.join("tsconfig.json"),
            r#"{ "extends": ["./a.json", "./b.json"] }"#,
        );

        let resolved = TsConfig::load_and_merge(&root.join("tsconfig.json")).unwrap();
        assert_eq!(resolved.out_dir, Some(root.join("out")));
        assert_eq!(resolved.source_files.len(), 4);
    }

    #[test]
    fn test_extends_from_node_modules_package() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());

        create_file(
            &root.join("node_modules/@easy-games/compiler-types/tsconfig.json"),
            r#"{ "compilerOptions": { "declaration": true } }"#,
        );
        create_file(
            &root.join("game/tsconfig.json"),
            r#"{ "extends": "@easy-games/compiler-types", "compilerOptions": { "outDir": "out" } }"#,
        );

        let resolved = TsConfig::load_and_merge(&root.join("game/tsconfig.json")).unwrap();
        assert!(resolved.declaration);
    }

    #[test]
    fn test_composite_implies_declaration() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());
        create_file(&root.join("tsconfig.json"), r#"{ "compilerOptions": { "composite": true } }"#);

        let resolved = TsConfig::load_and_merge(&root.join("tsconfig.json")).unwrap();
        assert!(resolved.declaration);
    }

    #[test]
    fn test_missing_extended_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonical(temp_dir.path());
        create_file(&root.join("tsconfig.json"), r#"{ "extends": "./missing.json" }"#);

        let err = TsConfig::load_and_merge(&root.join("tsconfig.json")).unwrap_err();
        match err {
            AirshipError::ExtendsNotFound { reference, .. } => {
                assert_eq!(reference, "./missing.json")
            }
            other => panic!("expected ExtendsNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_circular_extends() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        create_file(&root.join("a.json"), r#"{ "extends": "./b.json" }"#);
        create_file(&root.join("b.json"), r#"{ "extends": "./a.json" }"#);

        let result = TsConfig::load_and_merge(&root.join("a.json"));
        match result {
            Err(AirshipError::CircularExtends { chain }) => assert_eq!(chain.len(), 3),
            other => panic!("expected CircularExtends, got {:?}", other),
        }
    }

    #[test]
    fn test_self_extension_is_circular() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("tsconfig.json"), r#"{ "extends": "./tsconfig.json" }"#);

        let result = TsConfig::load_and_merge(&root.join("tsconfig.json"));
        assert!(matches!(result, Err(AirshipError::CircularExtends { .. })));
    }

    #[test]
    fn test_sanitize_keeps_comment_markers_inside_strings() {
        let input = r#"{ "outDir": "out//dist", "x": "/* no */", }"#;
        let value: serde_json::Value = serde_json::from_str(&sanitize_jsonc(input)).unwrap();
        assert_eq!(value["outDir"], "out//dist");
        assert_eq!(value["x"], "/* no */");
    }

    #[test]
    fn test_sanitize_escaped_quotes() {
        let input = r#"{ "a": "say \"hi\" // not a comment", "b": [1, 2,], }"#;
        let value: serde_json::Value = serde_json::from_str(&sanitize_jsonc(input)).unwrap();
        assert_eq!(value["a"], "say \"hi\" // not a comment");
        assert_eq!(value["b"], serde_json::json!([1, 2]));
    }
}
