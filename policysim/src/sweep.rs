use std::thread;
use clap::ValueEnum;
use policycache::cache::Reference;
use policycache::config::{CacheConfig, Organization};
use policycache::error::ConfigurationError;
use policycache::simulator::{SimulationResult, Simulator};

/// The configuration parameter a sweep varies
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    BlockSize,
    Associativity,
    /// Cache size, applied to both banks of a split cache
    Size,
}

pub struct SweepRow {
    pub value: u64,
    pub result: Result<SimulationResult, ConfigurationError>,
}

/// Copies the base configuration with one parameter replaced
pub fn configure(base: &CacheConfig, dimension: Dimension, value: u64) -> CacheConfig {
    let mut config = base.clone();
    match dimension {
        Dimension::BlockSize => config.block_size = value,
        Dimension::Associativity => config.associativity = value,
        Dimension::Size => {
            config.data_size = value;
            if config.organization == Organization::Split {
                config.instruction_size = Some(value);
            }
        }
    }
    config
}

/// Runs the trace once per value, each on its own cache and thread
///
/// Caches share nothing, so the only thing the threads have in common is the borrowed trace
pub fn run_sweep(base: &CacheConfig, dimension: Dimension, values: &[u64], references: &[Reference]) -> Result<Vec<SweepRow>, String> {
    thread::scope(|scope| {
        let handles: Vec<_> = values.iter()
            .map(|&value| {
                let config = configure(base, dimension, value);
                scope.spawn(move || {
                    let result = Simulator::new(&config).map(|mut simulator| {
                        simulator.simulate(references);
                        simulator.finish()
                    });
                    SweepRow { value, result }
                })
            })
            .collect();
        handles.into_iter()
            .map(|handle| handle.join().map_err(|_| "A sweep worker panicked".to_string()))
            .collect()
    })
}

/// Renders one row per value. Invalid configurations get a row of their own rather than failing
/// the sweep
pub fn render_table(dimension: Dimension, rows: &[SweepRow]) -> String {
    let label = match dimension {
        Dimension::BlockSize => "block size",
        Dimension::Associativity => "assoc",
        Dimension::Size => "size",
    };
    let mut out = String::new();
    out.push_str(&format!("{label:>10} {:>8} {:>8} {:>12} {:>12}\n", "I-miss", "D-miss", "fetch", "copies"));
    for row in rows {
        match &row.result {
            Ok(result) => {
                out.push_str(&format!(
                    "{:>10} {:>8.4} {:>8.4} {:>12} {:>12}\n",
                    row.value,
                    result.instruction.miss_rate,
                    result.data.miss_rate,
                    result.instruction.demand_fetch + result.data.demand_fetch,
                    result.instruction.copies_back + result.data.copies_back,
                ));
            }
            Err(e) => {
                out.push_str(&format!("{:>10} invalid configuration: {e}\n", row.value));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use policycache::cache::ReferenceKind;
    use policycache::config::{WriteHitPolicy, WriteMissPolicy};
    use super::*;

    fn base() -> CacheConfig {
        CacheConfig {
            block_size: 4,
            organization: Organization::Unified,
            associativity: 1,
            write_hit_policy: WriteHitPolicy::WriteBack,
            write_miss_policy: WriteMissPolicy::WriteAllocate,
            data_size: 4,
            instruction_size: None,
            address_width: 32,
        }
    }

    #[test]
    fn associativity_sweep_removes_thrashing() {
        let references: Vec<Reference> = ["0", "4", "0", "4", "0", "4"].iter()
            .map(|address| Reference::new(ReferenceKind::DataRead, *address))
            .collect();
        let mut config = base();
        config.data_size = 8;
        let rows = run_sweep(&config, Dimension::Associativity, &[1, 2], &references).unwrap();
        let misses: Vec<u64> = rows.iter().map(|row| row.result.as_ref().unwrap().data.misses).collect();
        // Direct mapped with two sets keeps both blocks, as does one 2-way set
        assert_eq!(misses, vec![2, 2]);

        let rows = run_sweep(&base(), Dimension::Size, &[4, 8], &references).unwrap();
        let misses: Vec<u64> = rows.iter().map(|row| row.result.as_ref().unwrap().data.misses).collect();
        assert_eq!(misses, vec![6, 2]);
    }

    #[test]
    fn invalid_values_get_their_own_row() {
        let rows = run_sweep(&base(), Dimension::BlockSize, &[4, 6], &[]).unwrap();
        assert!(rows[0].result.is_ok());
        assert_eq!(rows[1].result.as_ref().unwrap_err(), &ConfigurationError::BlockSizeNotPowerOfTwo(6));
        let table = render_table(Dimension::BlockSize, &rows);
        assert!(table.contains("6 invalid configuration: block size 6 is not a power of two"), "{table}");
    }

    #[test]
    fn size_sweep_resizes_both_split_banks() {
        let mut config = base();
        config.organization = Organization::Split;
        config.instruction_size = Some(4);
        let sized = configure(&config, Dimension::Size, 64);
        assert_eq!((sized.data_size, sized.instruction_size), (64, Some(64)));
    }
}
