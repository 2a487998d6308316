pub mod services;

// Re-export commonly used types at crate root for convenience
pub use services::{
    create_component, default_component_dir, is_compilable_workspace, nicify_variable_name, CompilerInvocation,
    ComponentKind, CreatedComponent, OutputLocation, OutputLocator, OutputTarget,
};
