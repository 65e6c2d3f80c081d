//! User-Friendly Error Formatting
//!
//! Produces boxed, human-readable error reports with troubleshooting hints
//! for the handful of failure categories an operator can actually act on.

use std::fmt::Write;

/// Format error for user consumption.
///
/// Classifies the error message by substring and routes it to a
/// category-specific body, then appends the raw technical detail and a
/// help footer.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    let error_msg = error.to_string();

    if error_msg.contains("pipe") || error_msg.contains("IPC") {
        format_ipc_error(&mut output, &error_msg);
    } else if error_msg.contains("config") || error_msg.contains("yaml") {
        format_config_error(&mut output, &error_msg);
    } else if error_msg.contains("database") || error_msg.contains("sqlite") {
        format_store_error(&mut output, &error_msg);
    } else if error_msg.contains("image") {
        format_image_error(&mut output, &error_msg);
    } else {
        format_generic_error(&mut output, &error_msg);
    }

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: suyan-host -vvv"
    )
    .ok();
    writeln!(&mut output, "  - Report issues: https://github.com/suyan-ime/suyan-host/issues").ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_ipc_error(output: &mut String, _error: &str) {
    writeln!(output, "Input Method Pipe Error").ok();
    writeln!(output).ok();
    writeln!(
        output,
        "Could not talk to the SuYan input engine over its named pipe."
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. The host process is not running").ok();
    writeln!(output, "     → Restart suyan-host, then reselect the input method").ok();
    writeln!(output).ok();
    writeln!(output, "  2. A stale pipe handle from a crashed session").ok();
    writeln!(output, "     → The TSF shim will retry once; restarting the app fixes it").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Another instance already owns the pipe name").ok();
    writeln!(output, "     → Only one suyan-host instance may run per user session").ok();
}

fn format_config_error(output: &mut String, _error: &str) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with config.yaml.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Invalid YAML syntax").ok();
    writeln!(output, "     → Check indentation and quoting").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Out-of-range values").ok();
    writeln!(output, "     → page_size, max_age_days and max_count must be positive").ok();
    writeln!(output).ok();
    writeln!(output, "  3. File missing").ok();
    writeln!(output, "     → Defaults are used automatically; delete the file to reset it").ok();
}

fn format_store_error(output: &mut String, _error: &str) {
    writeln!(output, "Clipboard History Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not read or write the clipboard history database.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Database file is locked by another process").ok();
    writeln!(output, "     → Only one suyan-host instance may open clipboard.db").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Disk full or permission denied in the data directory").ok();
}

fn format_image_error(output: &mut String, _error: &str) {
    writeln!(output, "Clipboard Image Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not decode, encode, or thumbnail a clipboard image.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Source image uses an unsupported bit depth or format").ok();
    writeln!(output, "  2. Image data was truncated before it reached the store").ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Unexpected Error").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
    writeln!(output).ok();
    writeln!(output, "Troubleshooting:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Restart suyan-host").ok();
    writeln!(output, "  2. Re-run with --verbose for more context").ok();
}
