// Shared primitives and error types
pub mod primitives;
pub mod error;

pub use primitives::*;
pub use error::*;
