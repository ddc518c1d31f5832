//! Rejection reasons for asset paths.

/// Why an asset path was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathTraversalError {
    #[error("asset path contains a NUL byte")]
    NullByte,
    /// Empty, or nothing left after dropping `.` segments.
    #[error("asset path is empty")]
    EmptyPath,
    /// Leading `/` or a Windows drive prefix.
    #[error("absolute asset paths are not allowed")]
    AbsolutePath,
    #[error("asset path contains '..'")]
    ParentComponent,
    /// Canonical path (symlinks resolved) lies outside the asset root.
    #[error("asset path resolves outside the asset root")]
    EscapesBaseDirectory,
}
