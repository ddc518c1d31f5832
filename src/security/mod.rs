//! Security utilities for asset path traversal prevention.
//!
//! - [`sanitize_asset_path`] - Validates relative paths, blocks `..` and absolute paths
//! - [`validate_path_within_base`] - Prevents symlink-based escapes from the asset root

mod error;
mod path;

pub use error::PathTraversalError;
pub use path::{sanitize_asset_path, validate_path_within_base};
