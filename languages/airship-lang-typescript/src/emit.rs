//! File-name rules of the TypeScript emitter
//!
//! Which extension an emitted file gets depends only on the source file
//! name, so the mapping is a fixed table rather than configuration.

/// One row of the emit table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitRule {
    /// Source extension, including the leading dot
    pub source: &'static str,
    /// Extension of the emitted implementation file
    pub implementation: &'static str,
    /// Extension of the emitted declaration file
    pub declaration: &'static str,
}

/// Source extension → emitted extensions
pub const EMIT_TABLE: &[EmitRule] = &[
    EmitRule {
        source: ".ts",
        implementation: ".js",
        declaration: ".d.ts",
    },
    EmitRule {
        source: ".tsx",
        implementation: ".js",
        declaration: ".d.ts",
    },
    EmitRule {
        source: ".mts",
        implementation: ".mjs",
        declaration: ".d.mts",
    },
    EmitRule {
        source: ".cts",
        implementation: ".cjs",
        declaration: ".d.cts",
    },
];

/// Declaration inputs are never compiled; they keep their name.
const DECLARATION_EXTENSIONS: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

/// How the emitter treats a given file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind<'a> {
    /// Compiled source; `stem` is the file name without its source extension
    Code { stem: &'a str, rule: &'static EmitRule },
    /// Hand-written declaration file (`foo.d.ts`, `styles.d.css.ts`)
    Declaration,
    /// Anything else (json, lua, images); copied unchanged
    Asset,
}

/// Classify a file by name.
pub fn classify(file_name: &str) -> SourceKind<'_> {
    if is_declaration_file(file_name) {
        return SourceKind::Declaration;
    }

    EMIT_TABLE
        .iter()
        .find_map(|rule| {
            file_name
                .strip_suffix(rule.source)
                .filter(|stem| !stem.is_empty())
                .map(|stem| SourceKind::Code { stem, rule })
        })
        .unwrap_or(SourceKind::Asset)
}

fn is_declaration_file(file_name: &str) -> bool {
    if DECLARATION_EXTENSIONS
        .iter()
        .any(|ext| file_name.len() > ext.len() && file_name.ends_with(ext))
    {
        return true;
    }

    // Arbitrary-extension declarations: `name.d.<ext>.ts`
    file_name
        .strip_suffix(".ts")
        .and_then(|rest| rest.rsplit_once('.'))
        .is_some_and(|(head, _)| head.len() > 2 && head.ends_with(".d"))
}

/// Source extensions that can produce an output file with the given name.
///
/// Returns `(stem, candidate source extensions)`, or `None` when the name is
/// not an emitted implementation or declaration file.
pub fn source_candidates(output_name: &str) -> Option<(&str, Vec<&'static str>)> {
    // Longest suffixes first so `.d.ts` wins over `.ts`
    for rule in EMIT_TABLE {
        if let Some(stem) = output_name
            .strip_suffix(rule.declaration)
            .filter(|s| !s.is_empty())
        {
            return Some((stem, sources_where(|r| r.declaration == rule.declaration)));
        }
    }

    for rule in EMIT_TABLE {
        if let Some(stem) = output_name
            .strip_suffix(rule.implementation)
            .filter(|s| !s.is_empty())
        {
            return Some((
                stem,
                sources_where(|r| r.implementation == rule.implementation),
            ));
        }
    }

    None
}

fn sources_where(pred: impl Fn(&EmitRule) -> bool) -> Vec<&'static str> {
    EMIT_TABLE
        .iter()
        .filter(|r| pred(r))
        .map(|r| r.source)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_code_files() {
        match classify("Foo.ts") {
            SourceKind::Code { stem, rule } => {
                assert_eq!(stem, "Foo");
                assert_eq!(rule.implementation, ".js");
            }
            other => panic!("expected code, got {:?}", other),
        }
        match classify("Server.Module.mts") {
            SourceKind::Code { stem, rule } => {
                assert_eq!(stem, "Server.Module");
                assert_eq!(rule.declaration, ".d.mts");
            }
            other => panic!("expected code, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_declarations_and_assets() {
        assert_eq!(classify("Globals.d.ts"), SourceKind::Declaration);
        assert_eq!(classify("styles.d.css.ts"), SourceKind::Declaration);
        assert_eq!(classify("config.json"), SourceKind::Asset);
        assert_eq!(classify("Bootstrap.lua"), SourceKind::Asset);
        // A bare extension is not a source file
        assert_eq!(classify(".ts"), SourceKind::Asset);
    }

    #[test]
    fn test_source_candidates() {
        assert_eq!(source_candidates("Foo.js"), Some(("Foo", vec![".ts", ".tsx"])));
        assert_eq!(source_candidates("Foo.d.ts"), Some(("Foo", vec![".ts", ".tsx"])));
        assert_eq!(source_candidates("Foo.cjs"), Some(("Foo", vec![".cts"])));
        assert_eq!(source_candidates("Foo.json"), None);
    }
}
