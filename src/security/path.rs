//! Asset path sanitization and base directory validation.
//!
//! Asset paths arrive from clients (URL segments, edit requests) and from the
//! catalog. Two checks guard every filesystem access:
//!
//! 1. [`sanitize_asset_path`] rejects lexically unsafe paths (`..`, absolute
//!    paths, null bytes) and normalizes away `.` components.
//! 2. [`validate_path_within_base`] canonicalizes the joined path, resolving
//!    symlinks, and verifies the result is still under the asset root.

use std::path::{Component, Path, PathBuf};

use super::error::PathTraversalError;

/// Validates and normalizes a relative asset path.
///
/// # Examples
///
/// ```
/// use notecraft::security::sanitize_asset_path;
///
/// assert!(sanitize_asset_path("2025/01/31/abc.png").is_ok());
/// assert!(sanitize_asset_path("./2025/abc.png").is_ok());
/// assert!(sanitize_asset_path("../etc/passwd").is_err());
/// assert!(sanitize_asset_path("/etc/passwd").is_err());
/// assert!(sanitize_asset_path("").is_err());
/// ```
pub fn sanitize_asset_path(path: &str) -> Result<PathBuf, PathTraversalError> {
    if path.is_empty() {
        return Err(PathTraversalError::EmptyPath);
    }
    if path.contains('\0') {
        return Err(PathTraversalError::NullByte);
    }

    let path = Path::new(path);
    if path.is_absolute() {
        return Err(PathTraversalError::AbsolutePath);
    }

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => normalized.push(name),
            Component::CurDir => {},
            Component::ParentDir => return Err(PathTraversalError::ParentComponent),
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathTraversalError::AbsolutePath);
            },
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(PathTraversalError::EmptyPath);
    }

    Ok(normalized)
}

/// Validate that a path stays within a base directory after canonicalization.
///
/// For files that do not exist yet, the parent directory is canonicalized
/// instead and the file name re-appended; if the parent does not exist either,
/// the joined path is returned unchanged (any read will fail with not-found).
///
/// # Errors
///
/// Returns [`PathTraversalError::EscapesBaseDirectory`] if the canonical path
/// is not under the canonical base, or if canonicalization fails.
pub fn validate_path_within_base(
    base_dir: &Path,
    file_path: &Path,
) -> Result<PathBuf, PathTraversalError> {
    let full_path = base_dir.join(file_path);

    let canonical = if full_path.exists() {
        full_path
            .canonicalize()
            .map_err(|_| PathTraversalError::EscapesBaseDirectory)?
    } else {
        let parent = full_path.parent().ok_or(PathTraversalError::EmptyPath)?;
        let filename = full_path.file_name().ok_or(PathTraversalError::EmptyPath)?;

        if parent.exists() {
            parent
                .canonicalize()
                .map_err(|_| PathTraversalError::EscapesBaseDirectory)?
                .join(filename)
        } else {
            full_path
        }
    };

    let canonical_base = base_dir
        .canonicalize()
        .map_err(|_| PathTraversalError::EscapesBaseDirectory)?;

    // A non-existent parent leaves `canonical` uncanonicalized; compare
    // against the raw base too so such paths are not spuriously rejected.
    if !canonical.starts_with(&canonical_base) && !canonical.starts_with(base_dir) {
        return Err(PathTraversalError::EscapesBaseDirectory);
    }

    Ok(canonical)
}
