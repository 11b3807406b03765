//! Progress monitoring for a running search

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Whether to draw a progress bar on the terminal
    pub show_progress_bar: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            show_progress_bar: true,
        }
    }
}

/// Tracks attempts, rounds and throughput across the whole search
#[derive(Debug)]
pub struct SearchMonitor {
    attempts: AtomicU64,
    matches: AtomicU64,
    round: AtomicU64,
    start: Instant,
    show_progress_bar: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl SearchMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            attempts: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            round: AtomicU64::new(0),
            start: Instant::now(),
            show_progress_bar: config.show_progress_bar,
            bar: Mutex::new(None),
        }
    }

    /// Start a new round; `combinations` sizes the progress bar when it is
    /// known and small enough to display
    pub fn begin_round(&self, round: u32, combinations: Option<u128>) {
        self.round.store(round as u64, Ordering::SeqCst);

        if !self.show_progress_bar {
            return;
        }

        let bar = match combinations.and_then(|n| u64::try_from(n).ok()) {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{spinner:.green} round {prefix} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        bar.set_prefix(round.to_string());

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            *slot = Some(bar);
        }
    }

    /// Record one collected verifier result
    pub fn record_attempt(&self) {
        let total = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.inc(1);
                if total % 64 == 0 {
                    bar.set_message(utils::format_rate(self.rate()));
                }
            }
        }
    }

    /// Record the successful candidate
    pub fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::SeqCst);
    }

    /// Tear down the progress bar with a final message
    pub fn finish(&self, msg: &str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_with_message(msg.to_string());
            }
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn matches(&self) -> u64 {
        self.matches.load(Ordering::SeqCst)
    }

    /// The round currently being enumerated
    pub fn round(&self) -> u64 {
        self.round.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Attempts per second since the search started
    pub fn rate(&self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.attempts() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Formatting helpers for progress output
pub mod utils {
    use std::time::Duration;

    /// Format duration in human-readable form
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Format large numbers with commas
    pub fn format_number(num: u64) -> String {
        let num_str = num.to_string();
        let mut result = String::new();

        for (i, c) in num_str.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    /// Format rate with appropriate units
    pub fn format_rate(rate: f64) -> String {
        if rate >= 1_000_000.0 {
            format!("{:.1}M/s", rate / 1_000_000.0)
        } else if rate >= 1_000.0 {
            format!("{:.1}K/s", rate / 1_000.0)
        } else {
            format!("{:.0}/s", rate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn quiet_monitor() -> SearchMonitor {
        SearchMonitor::new(MonitorConfig {
            show_progress_bar: false,
        })
    }

    #[test]
    fn test_attempt_tracking() {
        let monitor = quiet_monitor();
        assert_eq!(monitor.attempts(), 0);

        monitor.begin_round(0, Some(100));
        monitor.record_attempt();
        monitor.record_attempt();
        assert_eq!(monitor.attempts(), 2);
        assert_eq!(monitor.matches(), 0);

        monitor.record_match();
        assert_eq!(monitor.matches(), 1);
    }

    #[test]
    fn test_rate_is_positive_after_work() {
        let monitor = quiet_monitor();
        thread::sleep(Duration::from_millis(10));
        monitor.record_attempt();
        assert!(monitor.rate() > 0.0);
    }

    #[test]
    fn test_utils() {
        assert_eq!(utils::format_duration(Duration::from_secs(3661)), "1h 1m 1s");
        assert_eq!(utils::format_duration(Duration::from_secs(61)), "1m 1s");
        assert_eq!(utils::format_duration(Duration::from_secs(1)), "1s");

        assert_eq!(utils::format_number(1234567), "1,234,567");
        assert_eq!(utils::format_number(123), "123");

        assert_eq!(utils::format_rate(1_500_000.0), "1.5M/s");
        assert_eq!(utils::format_rate(1500.0), "1.5K/s");
        assert_eq!(utils::format_rate(150.0), "150/s");
    }
}
