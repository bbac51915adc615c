//! Window progress method name constants.

/// Opens a progress session.
pub const PROGRESS_START: &str = "window/progressStart";
/// Updates the message and/or percentage of an open session.
pub const PROGRESS_REPORT: &str = "window/progressReport";
/// Closes a progress session.
pub const PROGRESS_DONE: &str = "window/progressDone";

/// All progress notification methods, in lifecycle order.
pub const ALL: [&str; 3] = [PROGRESS_START, PROGRESS_REPORT, PROGRESS_DONE];

/// Check whether a method name belongs to the progress notifications.
pub fn is_progress_method(method: &str) -> bool {
    ALL.contains(&method)
}
