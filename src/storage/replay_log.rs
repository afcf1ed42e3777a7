// src/storage/replay_log.rs
// Plain-text log of every answer given, kept for recovery and auditing.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::scheduler::spaced::{Quality, ReviewState};
use crate::scheduler::waterfall::{Outcome, StackKind};

pub struct ReviewLogger {
    log_path: PathBuf,
}

impl ReviewLogger {
    /// Creates a logger writing to `reviews.log` inside `directory`.
    pub fn new(directory: &Path) -> Result<Self, std::io::Error> {
        fs::create_dir_all(directory)?;
        Ok(ReviewLogger { log_path: directory.join("reviews.log") })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Logs a Waterfall answer and the stack the word landed in.
    pub fn log_waterfall(
        &self,
        now: DateTime<Utc>,
        word: &str,
        outcome: Outcome,
        landed: StackKind,
    ) -> Result<(), std::io::Error> {
        self.append(now, word, &format!("{:?}", outcome), &format!("{:?}", landed))
    }

    /// Logs a graded review with the resulting schedule.
    pub fn log_review(
        &self,
        now: DateTime<Utc>,
        word: &str,
        quality: Quality,
        state: &ReviewState,
    ) -> Result<(), std::io::Error> {
        let detail = format!("ivl={} ef={:.2} reps={}", state.interval, state.ease_factor, state.repetitions);
        self.append(now, word, &format!("q{}", quality.value()), &detail)
    }

    /// Format: timestamp_iso,word,event,detail
    fn append(&self, now: DateTime<Utc>, word: &str, event: &str, detail: &str) -> Result<(), std::io::Error> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let log_entry = format!("{},{},{},{}\n", now.to_rfc3339(), word.replace(',', " "), event, detail);
        file.write_all(log_entry.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ReviewLogger::new(&dir.path().join("history")).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();

        logger.log_waterfall(now, "terse", Outcome::Know, StackKind::Known).unwrap();
        let state = ReviewState::new(now);
        logger.log_review(now, "wry, dry", Quality::new(4), &state).unwrap();

        let contents = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2026-02-03T04:05:06+00:00,terse,Know,Known");
        assert!(lines[1].starts_with("2026-02-03T04:05:06+00:00,wry  dry,q4,ivl=1 ef=2.50"));
    }
}
