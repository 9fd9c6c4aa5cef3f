use crate::set::{Access, Outcome};

/// Counters for one logical cache (data or instruction)
///
/// Zeroed when the cache is built and only ever incremented by it. Copied back words are kept in
/// two parts: those written while handling references, and those found dirty by the latest flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reporter {
    accesses: u64,
    misses: u64,
    replaces: u64,
    words_fetched: u64,
    words_copied: u64,
    words_flushed: u64,
}

impl Reporter {
    /// Counts an access, and a miss or replace if the outcome was one
    pub(crate) fn record(&mut self, outcome: Outcome) {
        self.accesses += 1;
        match outcome {
            Outcome::CompulsoryMiss => self.misses += 1,
            Outcome::ConflictMiss => {
                self.misses += 1;
                self.replaces += 1;
            }
            Outcome::Hit | Outcome::WriteAround => {}
        }
    }

    pub(crate) fn add_traffic(&mut self, access: &Access) {
        self.words_fetched += access.words_fetched;
        self.words_copied += access.words_written;
    }

    pub(crate) fn set_flushed(&mut self, words: u64) {
        self.words_flushed = words;
    }

    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn replaces(&self) -> u64 {
        self.replaces
    }

    /// Demand fetch, in words
    pub fn words_fetched(&self) -> u64 {
        self.words_fetched
    }

    /// Copies back, in words, including the latest flush
    pub fn words_copied(&self) -> u64 {
        self.words_copied + self.words_flushed
    }

    /// Misses over accesses rounded to 4 decimal places, 0 when nothing was accessed
    ///
    /// # Examples
    ///
    /// ```
    /// use policycache::reporter::Reporter;
    /// assert_eq!(Reporter::default().miss_rate(), 0.0);
    /// ```
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        let rate = self.misses as f64 / self.accesses as f64;
        (rate * 10_000.0).round() / 10_000.0
    }

    pub fn hit_rate(&self) -> f64 {
        1.0 - self.miss_rate()
    }
}
