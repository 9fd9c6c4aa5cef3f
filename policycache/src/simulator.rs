use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::cache::{Cache, Reference};
use crate::config::CacheConfig;
use crate::error::ConfigurationError;
use crate::reporter::Reporter;

/// The simulator feeds references to a cache in order, and collects the results
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly. Call finish once the trace is exhausted to flush dirty blocks
pub struct Simulator {
    cache: Cache,
    skipped: u64,
    simulation_time: Duration,
}

/// The result of a simulation. Can be serialised to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub settings: CacheConfig,
    pub instruction: Statistics,
    pub data: Statistics,
    /// References dropped because their address wasn't valid hexadecimal
    pub skipped: u64,
}

/// A snapshot of one reporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub accesses: u64,
    pub misses: u64,
    pub replaces: u64,
    pub miss_rate: f64,
    pub hit_rate: f64,
    pub demand_fetch: u64,
    pub copies_back: u64,
}

impl From<&Reporter> for Statistics {
    fn from(reporter: &Reporter) -> Self {
        Self {
            accesses: reporter.accesses(),
            misses: reporter.misses(),
            replaces: reporter.replaces(),
            miss_rate: reporter.miss_rate(),
            hit_rate: reporter.hit_rate(),
            demand_fetch: reporter.words_fetched(),
            copies_back: reporter.words_copied(),
        }
    }
}

impl Simulator {

    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, from a trace header or parsed from JSON
    ///
    /// returns: Result<Simulator, ConfigurationError>
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            cache: Cache::new(config)?,
            skipped: 0,
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Feeds every reference to the cache, in order
    ///
    /// References with malformed addresses are skipped, the cache has already logged them
    pub fn simulate<'a>(&mut self, references: impl IntoIterator<Item = &'a Reference>) {
        let start = Instant::now();
        for reference in references {
            if self.cache.handle(reference).is_err() {
                self.skipped += 1;
            }
        }
        let end = Instant::now();
        self.simulation_time += end - start;
    }

    /// Flushes the cache and snapshots both reporters
    pub fn finish(&mut self) -> SimulationResult {
        self.cache.flush();
        SimulationResult {
            settings: self.cache.config().clone(),
            instruction: Statistics::from(self.cache.instruction_reporter()),
            data: Statistics::from(self.cache.data_reporter()),
            skipped: self.skipped,
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }
}
