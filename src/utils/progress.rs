//! Incremental progress output for long enumerations.
//!
//! Lines are rewritten in place on stderr:
//! `message [done/total, H:MM:SS remaining]`, or `message [done]` when the
//! total is not known.

use std::io::Write;

use chrono::{TimeDelta, Utc};

/// Format a duration as `H:MM:SS`.
pub fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// Estimate time left from elapsed time and completed work.
///
/// No estimate before one second has passed or before anything is done.
pub fn estimate_remaining(elapsed: TimeDelta, done: usize, total: usize) -> Option<TimeDelta> {
    if done == 0 || elapsed < TimeDelta::seconds(1) {
        return None;
    }
    let left = total.saturating_sub(done) as i64;
    let millis = elapsed.num_milliseconds().saturating_mul(left) / done as i64;
    Some(TimeDelta::milliseconds(millis))
}

/// Build a progress line.
pub fn status_line(label: &str, done: usize, total: Option<usize>, elapsed: TimeDelta) -> String {
    match total {
        None => format!("{label} [{done}]"),
        Some(total) => match estimate_remaining(elapsed, done, total) {
            Some(remaining) => format!(
                "{label} [{done}/{total}, {} remaining]",
                format_duration(remaining)
            ),
            None => format!("{label} [{done}/{total}]"),
        },
    }
}

/// Progress reporter bound to one phase.
pub struct Progress {
    message: String,
    total: Option<usize>,
    done: usize,
    started: chrono::DateTime<Utc>,
    enabled: bool,
}

impl Progress {
    /// Progress with a known total.
    pub fn new(message: impl Into<String>, total: usize, enabled: bool) -> Self {
        Self::build(message.into(), Some(total), enabled)
    }

    /// Progress counting work without a known total.
    pub fn counting(message: impl Into<String>, enabled: bool) -> Self {
        Self::build(message.into(), None, enabled)
    }

    fn build(message: String, total: Option<usize>, enabled: bool) -> Self {
        Self {
            message,
            total,
            done: 0,
            started: Utc::now(),
            enabled,
        }
    }

    /// Record `count` more units of work.
    pub fn advance(&mut self, count: usize) {
        self.done += count;
        self.render();
    }

    /// Print the final state and move to a new line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.render();
            eprintln!();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }
        let elapsed = Utc::now() - self.started;
        let line = status_line(&self.message, self.done, self.total, elapsed);
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{line}");
        let _ = stderr.flush();
    }
}
