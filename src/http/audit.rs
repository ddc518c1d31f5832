//! Security audit logging for HTTP events.
//!
//! Audit events go to the `audit` tracing target so they can be filtered or
//! routed separately (`RUST_LOG=audit=info`).

use tracing::warn;

/// Security-relevant events worth alerting on.
#[derive(Debug, Clone)]
pub(crate) enum AuditEvent {
    /// A request tried to read outside the asset root.
    PathTraversalBlocked { route: &'static str, path: String },
    /// The image model did not answer in time.
    GenerationTimeout {
        route: &'static str,
        timeout_secs: u64,
    },
}

/// Log a security audit event with structured fields.
pub(crate) fn log_audit_event(event: AuditEvent) {
    match event {
        AuditEvent::PathTraversalBlocked { route, path } => {
            warn!(
                target: "audit",
                event_type = "path_traversal_blocked",
                route,
                %path,
                "Path traversal attempt blocked"
            );
        },
        AuditEvent::GenerationTimeout {
            route,
            timeout_secs,
        } => {
            warn!(
                target: "audit",
                event_type = "generation_timeout",
                route,
                timeout_secs,
                "Image generation timed out"
            );
        },
    }
}
