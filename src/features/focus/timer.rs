//! Countdown timing for focus cycles.
//!
//! Provides the focus/break countdown plus duration parsing/formatting.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::config::FocusConfig;
use crate::error::FocusdeskError;

/// Which half of a Pomodoro cycle is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Work interval, backed by a server-side session.
    Focus,
    /// Rest interval, not tracked server-side.
    Break,
}

impl Mode {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::Break => "Break",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lengths of the two halves of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDurations {
    focus_seconds: i64,
    break_seconds: i64,
}

impl CycleDurations {
    /// Default focus length (25 minutes).
    pub const DEFAULT_FOCUS_SECONDS: i64 = 25 * 60;
    /// Default break length (5 minutes).
    pub const DEFAULT_BREAK_SECONDS: i64 = 5 * 60;

    /// Build from explicit durations.
    ///
    /// # Errors
    ///
    /// Returns `UserInput` if either duration is shorter than one second.
    pub fn new(focus: Duration, rest: Duration) -> Result<Self, FocusdeskError> {
        let focus_seconds = focus.num_seconds();
        let break_seconds = rest.num_seconds();
        if focus_seconds < 1 || break_seconds < 1 {
            return Err(FocusdeskError::UserInput(
                "Focus and break durations must be at least one second".to_string(),
            ));
        }
        Ok(Self {
            focus_seconds,
            break_seconds,
        })
    }

    /// Build from the `focus` config section.
    ///
    /// # Errors
    ///
    /// Returns `UserInput` if a configured length is zero.
    pub fn from_config(config: &FocusConfig) -> Result<Self, FocusdeskError> {
        Self::new(
            Duration::minutes(i64::from(config.focus_minutes)),
            Duration::minutes(i64::from(config.break_minutes)),
        )
    }

    /// Length of a half-cycle in seconds.
    #[must_use]
    pub const fn seconds_for(&self, mode: Mode) -> i64 {
        match mode {
            Mode::Focus => self.focus_seconds,
            Mode::Break => self.break_seconds,
        }
    }
}

impl Default for CycleDurations {
    fn default() -> Self {
        Self {
            focus_seconds: Self::DEFAULT_FOCUS_SECONDS,
            break_seconds: Self::DEFAULT_BREAK_SECONDS,
        }
    }
}

/// Countdown for one half-cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    mode: Mode,
    remaining_seconds: i64,
}

impl Countdown {
    /// A full countdown for `mode`.
    #[must_use]
    pub const fn new(mode: Mode, durations: &CycleDurations) -> Self {
        Self {
            mode,
            remaining_seconds: durations.seconds_for(mode),
        }
    }

    /// Count down by one second.
    ///
    /// Returns true when this tick brought the countdown to zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Which half-cycle this is.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds
    }
}

/// Client-side timer state as seen from outside the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current half-cycle.
    pub mode: Mode,
    /// Seconds left in it.
    pub remaining_seconds: i64,
    /// Whether the countdown is stopped.
    pub paused: bool,
}

/// Format a duration as MM:SS.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().abs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Parse a duration string like "25m", "1h30m", "90s".
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    // A bare number means minutes
    if let Ok(minutes) = s.parse::<i64>() {
        return Duration::try_minutes(minutes);
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if !current_num.is_empty() {
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        }
    }

    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let durations = CycleDurations::default();
        assert_eq!(durations.seconds_for(Mode::Focus), 1500);
        assert_eq!(durations.seconds_for(Mode::Break), 300);
    }

    #[test]
    fn test_durations_from_config() {
        let config = FocusConfig {
            focus_minutes: 50,
            break_minutes: 10,
            ..FocusConfig::default()
        };
        let durations = CycleDurations::from_config(&config).unwrap();
        assert_eq!(durations.seconds_for(Mode::Focus), 3000);
        assert_eq!(durations.seconds_for(Mode::Break), 600);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = FocusConfig {
            focus_minutes: 0,
            ..FocusConfig::default()
        };
        assert!(CycleDurations::from_config(&config).is_err());
    }

    #[test]
    fn test_countdown_tick_completes_at_zero() {
        let durations = CycleDurations::new(Duration::seconds(3), Duration::seconds(1)).unwrap();
        let mut countdown = Countdown::new(Mode::Focus, &durations);

        assert!(!countdown.tick());
        assert!(!countdown.tick());
        assert!(countdown.tick());
        assert_eq!(countdown.remaining_seconds(), 0);
    }

    #[test]
    fn test_countdown_tick_stays_at_zero() {
        let durations = CycleDurations::new(Duration::seconds(1), Duration::seconds(1)).unwrap();
        let mut countdown = Countdown::new(Mode::Break, &durations);

        assert!(countdown.tick());
        assert!(countdown.tick());
        assert_eq!(countdown.remaining_seconds(), 0);
        assert_eq!(countdown.mode(), Mode::Break);
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration("25"), Some(Duration::minutes(25)));
        assert_eq!(parse_duration("25m"), Some(Duration::minutes(25)));
    }

    #[test]
    fn test_parse_duration_mixed() {
        assert_eq!(parse_duration("1h"), Some(Duration::hours(1)));
        assert_eq!(parse_duration("2h30m"), Some(Duration::minutes(150)));
        assert_eq!(parse_duration("1m30s"), Some(Duration::seconds(90)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("abc").is_none());
        assert!(parse_duration("5x").is_none());
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert!(parse_duration("99999999999999999").is_none());
        assert!(parse_duration("9999999999999999h").is_none());
        assert!(parse_duration("9223372036854775807s1s").is_none());
        assert_eq!(parse_duration("0"), Some(Duration::zero()));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(25)), "25 minutes");
        assert_eq!(format_duration(Duration::minutes(1)), "1 minute");
        assert_eq!(format_duration(Duration::minutes(90)), "1 hour, 30 minutes");
        assert_eq!(format_duration(Duration::seconds(45)), "45 seconds");
    }

    #[test]
    fn test_format_duration_mmss() {
        assert_eq!(format_duration_mmss(Duration::minutes(25)), "25:00");
        assert_eq!(format_duration_mmss(Duration::seconds(90)), "01:30");
        assert_eq!(format_duration_mmss(Duration::seconds(0)), "00:00");
    }

    #[test]
    fn test_render_progress_bar() {
        let bar = render_progress_bar(0.5, 10);
        assert!(bar.contains("█████"));
        assert!(bar.contains("░░░░░"));
        assert_eq!(render_progress_bar(1.5, 4), "[████]");
    }
}
