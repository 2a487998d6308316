//! Foundation Layer - error taxonomy and path helpers shared by every Airship crate
//!
//! - [`error`]: the `AirshipError` taxonomy and the serializable `ErrorReport`
//! - [`paths`]: separator-agnostic normalization and relative-path arithmetic

pub mod error;
pub mod paths;

pub use error::*;
