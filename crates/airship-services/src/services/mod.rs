//! Services behind the editor commands

pub mod compiler;
pub mod nicify;
pub mod output;
pub mod scaffold;

pub use compiler::{is_compilable_workspace, CompilerInvocation};
pub use nicify::nicify_variable_name;
pub use output::{OutputLocation, OutputLocator, OutputTarget};
pub use scaffold::{
    create_component, default_component_dir, validate_component_name, ComponentKind,
    CreatedComponent,
};
