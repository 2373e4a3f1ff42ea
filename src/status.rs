use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Timestamped user-facing messages, newest first.
pub struct StatusLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl StatusLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, message: &str) {
        self.push_at(Local::now(), message);
    }

    pub fn push_at(&mut self, at: DateTime<Local>, message: &str) {
        log::info!("{message}");
        let stamp = at.format("%Y-%m-%dT%H:%M:%S%.6f");
        self.entries.push_front(format!("{stamp}: {message}"));
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn newest_entry_comes_first_with_iso_stamp() {
        let mut log = StatusLog::with_capacity(10);
        let t = Local.with_ymd_and_hms(2023, 2, 27, 16, 57, 7).unwrap();
        log.push_at(t, "Starting collection...");
        log.push_at(t, "Data collection completed.");
        let entries: Vec<&str> = log.entries().collect();
        assert_eq!(
            entries,
            vec![
                "2023-02-27T16:57:07.000000: Data collection completed.",
                "2023-02-27T16:57:07.000000: Starting collection...",
            ]
        );
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = StatusLog::with_capacity(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.entries().count(), 2);
        assert!(log.latest().unwrap().ends_with(": c"));
        assert!(log.entries().last().unwrap().ends_with(": b"));
    }
}
