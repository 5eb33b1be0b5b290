//! Progress bar display for installations

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use rescat::installer::{InstallState, Observer};

/// Progress display for an install batch
///
/// One bar over the plan; advances when a resource reaches a terminal
/// state and shows the resource currently being fetched or written.
#[derive(Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total resource count
    pub fn new(total: usize) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        Self { bar }
    }

    fn update(&self, id: &str, state: &InstallState) {
        match state {
            InstallState::Fetching | InstallState::Writing => {
                self.bar.set_message(format!("{} {}", state.label(), truncate(id)));
            }
            // Rollback revisits resources already counted
            InstallState::RolledBack => {}
            state if state.is_terminal() => self.bar.inc(1),
            _ => {}
        }
    }

    /// Installer observer feeding this display
    pub fn observer(&self) -> Observer {
        let display = self.clone();
        Arc::new(move |id: &str, state: &InstallState| display.update(id, state))
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Truncate long identifiers for display
fn truncate(id: &str) -> String {
    const MAX: usize = 50;
    let count = id.chars().count();
    if count > MAX {
        let tail: String = id.chars().skip(count - (MAX - 3)).collect();
        format!("...{tail}")
    } else {
        id.to_string()
    }
}
