//! CLI command handling for the airship tool

mod compile;

use airship_config::{logging, AppConfig};
use airship_foundation::paths::resolve_against;
use airship_foundation::{AirshipError, AirshipResult, ErrorReport};
use airship_lang_typescript::ConfigurationResolver;
use airship_services::{
    create_component, default_component_dir, ComponentKind, CompilerInvocation, OutputLocator,
    OutputTarget,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, Instrument};

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "airship")]
#[command(about = "Tooling for Airship TypeScript projects")]
#[command(version)]
pub struct Cli {
    /// Workspace directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Output format (pretty or compact)
    #[arg(long, global = true, default_value = "pretty", value_parser = ["pretty", "compact"])]
    pub format: String,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the merged compiler options governing a file
    Resolve {
        /// Source file (does not have to exist)
        file: PathBuf,
    },
    /// Check whether a file lies inside the project's source roots
    InSrc { file: PathBuf },
    /// Find the compiled output of a source file
    Output {
        file: PathBuf,

        /// Which build to look in
        #[arg(long, default_value = "editor", value_parser = ["editor", "server", "client"])]
        target: String,
    },
    /// Create a new component script
    ///
    /// Examples:
    ///   airship create-component SpinnerComponent
    ///   airship create-component GameManager --singleton --dir src/Server
    CreateComponent {
        /// Component name; letters, digits, '.', '_' and '-' only
        name: String,

        /// Directory to create the script in (defaults to src/Shared)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Extend AirshipSingleton instead of AirshipBehaviour
        #[arg(long)]
        singleton: bool,
    },
    /// Run the TypeScript compiler for the workspace until it exits or Ctrl-C
    Compile,
}

pub async fn run() {
    let cli = Cli::parse();

    let workspace = match workspace_dir(cli.workspace.as_deref()) {
        Ok(dir) => dir,
        Err(e) => fail(&e, &cli.format),
    };

    let config = match AppConfig::load(&workspace) {
        Ok(config) => config,
        Err(e) => {
            logging::initialize(&AppConfig::default().logging);
            fail(&e, &cli.format);
        }
    };
    logging::initialize(&config.logging);
    debug!(workspace = %workspace.display(), "Loaded configuration");

    let result = match cli.command {
        Commands::Resolve { file } => {
            let file = resolve_against(&workspace, &file);
            let span = logging::command_span("resolve", Some(file.as_path()));
            span.in_scope(|| handle_resolve(&file))
        }
        Commands::InSrc { file } => {
            let file = resolve_against(&workspace, &file);
            let span = logging::command_span("in-src", Some(file.as_path()));
            span.in_scope(|| Ok(handle_in_src(&file)))
        }
        Commands::Output { file, target } => {
            let file = resolve_against(&workspace, &file);
            let span = logging::command_span("output", Some(file.as_path()));
            span.in_scope(|| handle_output(&file, &target, &config))
        }
        Commands::CreateComponent {
            name,
            dir,
            singleton,
        } => {
            let dir = dir
                .map(|dir| resolve_against(&workspace, &dir))
                .unwrap_or_else(|| default_component_dir(&workspace));
            let kind = if singleton {
                ComponentKind::Singleton
            } else {
                ComponentKind::Component
            };
            let span = logging::command_span("create-component", Some(dir.as_path()));
            span.in_scope(|| handle_create_component(&dir, &name, kind))
        }
        Commands::Compile => {
            let invocation = CompilerInvocation::for_workspace(&workspace, &config.command);
            let span = logging::command_span("compile", Some(workspace.as_path()));
            match compile::supervise(&invocation).instrument(span).await {
                Ok(0) => return,
                Ok(code) => process::exit(code),
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(value) => output_result(&value, &cli.format),
        Err(e) => fail(&e, &cli.format),
    }
}

fn workspace_dir(workspace: Option<&Path>) -> AirshipResult<PathBuf> {
    let cwd = std::env::current_dir().map_err(AirshipError::from)?;
    Ok(match workspace {
        Some(dir) => resolve_against(&cwd, dir),
        None => cwd,
    })
}

fn handle_resolve(file: &Path) -> AirshipResult<serde_json::Value> {
    let config = ConfigurationResolver::new().resolve(file)?;
    let roots: Vec<PathBuf> = config
        .source_roots()
        .map(|roots| roots.iter().map(Path::to_path_buf).collect())
        .unwrap_or_default();

    let mut value = to_json(&config)?;
    value["sourceRoots"] = to_json(&roots)?;
    Ok(value)
}

fn handle_in_src(file: &Path) -> serde_json::Value {
    serde_json::json!({
        "file": file.display().to_string(),
        "inSrc": OutputLocator::new().is_path_in_src(file),
    })
}

fn handle_output(file: &Path, target: &str, config: &AppConfig) -> AirshipResult<serde_json::Value> {
    let target = match target {
        "server" => OutputTarget::Server,
        "client" => OutputTarget::Client,
        _ => OutputTarget::Editor,
    };
    let location = OutputLocator::new().locate(file, target)?;

    let mut value = to_json(&location)?;
    value["openToSide"] = serde_json::Value::Bool(config.output.open_to_side);
    Ok(value)
}

fn handle_create_component(
    dir: &Path,
    name: &str,
    kind: ComponentKind,
) -> AirshipResult<serde_json::Value> {
    let created = create_component(dir, name, kind)?;
    to_json(&created)
}

fn to_json<T: serde::Serialize>(value: &T) -> AirshipResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AirshipError::config(format!("Failed to serialize output: {}", e)))
}

/// Output result to stdout based on format
fn output_result(result: &serde_json::Value, format: &str) {
    let output = match format {
        "compact" => serde_json::to_string(result).unwrap_or_else(|_| "{}".to_string()),
        _ => serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string()),
    };
    println!("{}", output);
}

/// Output error report to stderr based on format and exit
fn fail(error: &AirshipError, format: &str) -> ! {
    let report = ErrorReport::from(error);
    let error_json = serde_json::to_value(&report).unwrap_or(serde_json::json!({
        "code": &report.code,
        "message": &report.message,
    }));

    let output = match format {
        "compact" => serde_json::to_string(&error_json).unwrap_or_else(|_| report.to_string()),
        _ => serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| report.to_string()),
    };
    eprintln!("{}", output);
    process::exit(1);
}
