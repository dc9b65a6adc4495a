//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` for output shown only with `--verbose`
//! - `ProgressLine` for single-line progress display with multiple counters
//!
//! Everything goes to stderr so stdout stays clean for trace reports and JSON.
//!
//! # Example
//!
//! ```ignore
//! log!("links"; "checking {} files", count);
//!
//! let progress = ProgressLine::new("links", &[("files", 42)]);
//! progress.inc("files");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;
use std::{
    fmt,
    io::{Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress line count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
#[allow(clippy::cast_possible_truncation)] // Safe: bars count is always small
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut out = stderr().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        // Progress line has no trailing newline: overwrite it, then redraw below
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(out, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let style = match module_lower {
        "trace" => Style::new().bright_blue(),
        "links" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "config" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    };
    format!("[{module}]").paint(style.bold())
}

// ============================================================================
// Styling
// ============================================================================

/// Terminal styling that honors `--color` and TTY detection.
///
/// Goes through `if_supports_color`, so `--color never` (and a non-terminal
/// stream under `auto`) yields plain text.
pub trait Paint: fmt::Display + Sized {
    /// Style text bound for stderr (logs, reports, diagnostics).
    fn paint(&self, style: Style) -> String {
        self.paint_for(Stream::Stderr, style)
    }

    /// Style text bound for `stream`.
    fn paint_for(&self, stream: Stream, style: Style) -> String {
        self.if_supports_color(stream, |text| text.style(style))
            .to_string()
    }
}

impl<T: fmt::Display> Paint for T {}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[links] files(42/69)`
///
/// All counters update in place on the same line. Uses `try_lock` to avoid
/// blocking worker threads - if display is busy, the update is skipped
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
    lock: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a new progress display under `module`.
    ///
    /// Only includes counters with total > 0.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let progress = Self::hidden(module, items);
        BAR_COUNT.store(1, Ordering::SeqCst);
        progress.display(false);
        progress
    }

    fn hidden(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|(name, total)| Counter {
                name: *name,
                total: *total,
                current: AtomicUsize::new(0),
            })
            .collect();

        Self {
            module,
            counters,
            lock: Mutex::new(()),
        }
    }

    /// Increment the counter with the given name.
    ///
    /// Non-blocking: if display lock is held, skips refresh.
    #[inline]
    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(1, Ordering::Relaxed);
            if self.lock.try_lock().is_some() {
                self.display(false);
            }
        }
    }

    fn render(&self) -> String {
        self.counters
            .iter()
            .map(|counter| {
                let current = counter.current.load(Ordering::Relaxed);
                format!("{}({}/{})", counter.name, current, counter.total)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn display(&self, newline: bool) {
        let prefix = colorize_prefix(self.module, self.module);
        let line = self.render();

        let mut out = stderr().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if newline {
            writeln!(out, "{prefix} {line}").ok();
        } else {
            write!(out, "{prefix} {line}").ok();
        }
        out.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);
        {
            let _guard = self.lock.lock(); // Wait for any pending display
            self.display(true);
        }
        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        let mut out = stderr().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_render_skips_empty_counters() {
        let progress = ProgressLine::hidden("links", &[("files", 3), ("skipped", 0)]);
        progress.inc("files");
        progress.inc("files");
        progress.inc("unknown");
        assert_eq!(progress.render(), "files(2/3)");
        std::mem::forget(progress);
    }

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("trace", "trace"), "[trace]");
        assert_eq!(colorize_prefix("Warning", "warning"), "[Warning]");
    }

    #[test]
    fn test_paint_plain_when_color_disabled() {
        owo_colors::set_override(false);
        let style = Style::new().red().bold();
        assert_eq!("✗".paint(style), "✗");
        assert_eq!(format!("({})", 42).paint_for(Stream::Stdout, style), "(42)");
        assert_eq!(String::from("dim").paint(Style::new().dimmed()), "dim");
    }
}
