//! New-component scaffolding

use super::nicify::nicify_variable_name;
use airship_foundation::{AirshipError, AirshipResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

static COMPONENT_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").unwrap());

/// Base class of the generated component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Component,
    Singleton,
}

impl ComponentKind {
    pub fn base_class(self) -> &'static str {
        match self {
            Self::Component => "AirshipBehaviour",
            Self::Singleton => "AirshipSingleton",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComponent {
    pub path: PathBuf,
    pub class_name: String,
    /// Name shown in the inspector
    pub display_name: String,
    pub kind: ComponentKind,
}

/// Where components go when no directory is given
pub fn default_component_dir(workspace: &Path) -> PathBuf {
    workspace.join("src").join("Shared")
}

/// Names become both a file name and a class name, so path separators are
/// rejected and at least one letter or digit is required.
pub fn validate_component_name(name: &str) -> AirshipResult<()> {
    if COMPONENT_NAME_PATTERN.is_match(name) && name.chars().any(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(AirshipError::InvalidComponentName {
            name: name.to_string(),
        })
    }
}

/// Write `<dir>/<name>.ts` containing an empty component class
///
/// `dir` is created if missing. An existing file is never overwritten.
pub fn create_component(dir: &Path, name: &str, kind: ComponentKind) -> AirshipResult<CreatedComponent> {
    validate_component_name(name)?;

    fs::create_dir_all(dir).map_err(|e| AirshipError::io_at(dir, e))?;
    let path = dir.join(format!("{}.ts", name));
    let class_name = pascal_case(name);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(AirshipError::AlreadyExists { path })
        }
        Err(e) => return Err(AirshipError::io_at(&path, e)),
    };
    file.write_all(render_component(&class_name, kind).as_bytes())
        .map_err(|e| AirshipError::io_at(&path, e))?;

    info!(path = %path.display(), class = %class_name, "Created component");

    Ok(CreatedComponent {
        display_name: nicify_variable_name(&class_name),
        path,
        class_name,
        kind,
    })
}

/// `spinner-component` → `SpinnerComponent`; the rest of each word is kept as is.
fn pascal_case(name: &str) -> String {
    WORD_PATTERN
        .find_iter(name)
        .map(|word| {
            let mut chars = word.as_str().chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn render_component(class_name: &str, kind: ComponentKind) -> String {
    format!(
        "export default class {} extends {} {{\n\
         \toverride Start(): void {{\n\
         \t\t\n\
         \t}}\n\
         \n\
         \toverride OnDestroy(): void {{}}\n\
         }}\n",
        class_name,
        kind.base_class()
    )
}
