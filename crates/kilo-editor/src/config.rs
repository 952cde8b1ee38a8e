//! Editor configuration.
//!
//! | Field             | Default | Meaning                                    |
//! |-------------------|---------|--------------------------------------------|
//! | `tab_stop`        | 8       | Display width of a tab stop (at least 1)   |
//! | `quit_times`      | 3       | Extra Ctrl-Q presses to quit a dirty file  |
//! | `message_timeout` | 5 s     | How long a status message stays visible    |

use std::time::Duration;

pub const DEFAULT_TAB_STOP: usize = 8;
pub const DEFAULT_QUIT_TIMES: usize = 3;
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for one editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub tab_stop: usize,
    pub quit_times: usize,
    pub message_timeout: Duration,
}

impl EditorConfig {
    /// Override the tab stop. Zero is raised to 1.
    #[must_use]
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.max(1);
        self
    }

    /// Override the number of confirming Ctrl-Q presses.
    #[must_use]
    pub const fn with_quit_times(mut self, quit_times: usize) -> Self {
        self.quit_times = quit_times;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: DEFAULT_QUIT_TIMES,
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EditorConfig::default();
        assert_eq!(c.tab_stop, 8);
        assert_eq!(c.quit_times, 3);
        assert_eq!(c.message_timeout, Duration::from_secs(5));
    }

    #[test]
    fn tab_stop_is_clamped() {
        assert_eq!(EditorConfig::default().with_tab_stop(0).tab_stop, 1);
        assert_eq!(EditorConfig::default().with_tab_stop(4).tab_stop, 4);
    }

    #[test]
    fn quit_times_override() {
        assert_eq!(EditorConfig::default().with_quit_times(0).quit_times, 0);
    }
}
