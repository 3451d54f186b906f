//! # Bounded Trace Stream
//!
//! The user-facing log console. Distinct from `tracing` output: these
//! lines are a read model rendered by the front-end, capped to the most
//! recent entries.

use smallvec::SmallVec;
use std::sync::Mutex;

/// Lines retained by the buffer; the oldest entry is evicted on overflow.
pub const LOG_CAPACITY: usize = 8;

/// Append-only (from the consumer's perspective) line buffer.
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: Mutex<SmallVec<[String; LOG_CAPACITY]>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line, evicting the oldest when the buffer is full.
    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock().unwrap();
        lines.push(line.into());
        while lines.len() > LOG_CAPACITY {
            lines.remove(0);
        }
    }

    /// Append several lines under a single lock.
    pub fn extend<I>(&self, new_lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut lines = self.lines.lock().unwrap();
        for line in new_lines {
            lines.push(line.into());
        }
        while lines.len() > LOG_CAPACITY {
            lines.remove(0);
        }
    }

    /// Clone out the retained lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().unwrap().to_vec()
    }

    /// Retained lines starting with `tag` (e.g. `"[MONITOR]"`).
    pub fn count_tagged(&self, tag: &str) -> usize {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.starts_with(tag))
            .count()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
