//! Terminal output helpers for CLI commands.

/// Width of error box separators.
const ERROR_BOX_WIDTH: usize = 60;

/// Print an error box: a title between `=` separators, then the detail lines
/// indented.
///
/// ```text
/// ============================================================
/// Invalid configuration
/// ============================================================
///
///   - generation.timeout_secs cannot be 0
///   - server.host cannot be empty
/// ```
pub fn print_error_box(title: &str, details: &[String]) {
    eprintln!("\n{}", "=".repeat(ERROR_BOX_WIDTH));
    eprintln!("{title}");
    eprintln!("{}", "=".repeat(ERROR_BOX_WIDTH));

    if !details.is_empty() {
        eprintln!();
        for detail in details {
            eprintln!("  {detail}");
        }
    }
}

/// Print configuration warnings, if any.
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
