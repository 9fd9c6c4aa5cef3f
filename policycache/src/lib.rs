//! # PolicyCache
//!
//! PolicyCache is a library for simulating a set-associative CPU cache over a trace of memory
//! references, to count hits, misses and memory bus traffic
//!
//! It models LRU replacement, write back or write through hits, write allocate or no write
//! allocate misses, and unified or split instruction and data caches. Only tags are modelled,
//! never memory contents
//!
//! Every cache owns all of its state, so sweeps over many configurations can run them in parallel

/// Bytes in a word, the unit bus traffic is counted in
pub const WORD_SIZE: u64 = 4;

/// Address width used when a configuration doesn't give one
pub const DEFAULT_ADDRESS_WIDTH: u32 = 32;

/// Contains the cache, which routes references to its banks of sets and keeps the reporters
pub mod cache;

/// Contains the configuration types, which can be read from JSON or from a trace header
pub mod config;

/// Contains the configuration and address errors
pub mod error;

/// Contains the geometry of a bank of sets, and address decoding
pub mod geometry;

/// Contains helpers for opening traces and configurations
pub mod io;

/// Contains the text report
pub mod report;

/// Contains the per cache counters
pub mod reporter;

/// Contains the LRU set and the write policy logic
pub mod set;

/// Contains the simulator used to run a trace through a cache
pub mod simulator;

/// Contains the trace file parser
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
