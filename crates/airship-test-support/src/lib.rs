//! Test support utilities and fixtures for Airship integration tests

pub mod workspace;

pub use workspace::TestWorkspace;
