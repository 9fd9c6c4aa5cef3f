use crate::config::{CacheConfig, Organization, WriteHitPolicy, WriteMissPolicy};
use crate::simulator::Statistics;

/// Renders the cache settings block
pub fn settings(config: &CacheConfig) -> String {
    let mut out = String::from("***CACHE SETTINGS***\n");
    match config.organization {
        Organization::Unified => {
            out.push_str("Unified I- D-cache\n");
            out.push_str(&format!("Size: {}\n", config.data_size));
        }
        Organization::Split => {
            out.push_str("Split I- D-cache\n");
            out.push_str(&format!("I-cache size: {}\n", config.instruction_size.unwrap_or(0)));
            out.push_str(&format!("D-cache size: {}\n", config.data_size));
        }
    }
    out.push_str(&format!("Associativity: {}\n", config.associativity));
    out.push_str(&format!("Block size: {}\n", config.block_size));
    out.push_str(match config.write_hit_policy {
        WriteHitPolicy::WriteBack => "Write policy: WRITE BACK\n",
        WriteHitPolicy::WriteThrough => "Write policy: WRITE THROUGH\n",
    });
    out.push_str(match config.write_miss_policy {
        WriteMissPolicy::WriteAllocate => "Allocation policy: WRITE ALLOCATE\n",
        WriteMissPolicy::NoWriteAllocate => "Allocation policy: WRITE NO ALLOCATE\n",
    });
    out
}

/// Renders the hit and miss counters of one logical cache
///
/// With no accesses both rates print as zero
///
/// # Examples
///
/// ```
/// use policycache::report::statistics;
/// use policycache::simulator::Statistics;
/// let stats = Statistics { accesses: 4, misses: 1, replaces: 0, miss_rate: 0.25, hit_rate: 0.75, demand_fetch: 4, copies_back: 0 };
/// assert_eq!(statistics("DATA", &stats), "DATA\naccesses: 4\nmisses: 1\nmiss rate: 0.2500 (hit rate 0.7500)\nreplace: 0\n");
/// ```
pub fn statistics(title: &str, stats: &Statistics) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("accesses: {}\n", stats.accesses));
    out.push_str(&format!("misses: {}\n", stats.misses));
    if stats.accesses != 0 {
        out.push_str(&format!("miss rate: {:.4} (hit rate {:.4})\n", stats.miss_rate, stats.hit_rate));
    } else {
        out.push_str("miss rate: 0.0000 (hit rate 0.0000)\n");
    }
    out.push_str(&format!("replace: {}\n", stats.replaces));
    out
}

/// Renders memory bus traffic, in words
pub fn traffic(demand_fetch: u64, copies_back: u64) -> String {
    format!("TRAFFIC (in words)\ndemand fetch: {demand_fetch}\ncopies back: {copies_back}\n")
}

/// Renders the whole report. Bus traffic of a split cache's two banks is added together
pub fn full_report(config: &CacheConfig, instruction: &Statistics, data: &Statistics) -> String {
    let mut out = settings(config);
    out.push('\n');
    out.push_str("***CACHE STATISTICS***\n");
    out.push_str(&statistics("INSTRUCTIONS", instruction));
    out.push_str(&statistics("DATA", data));
    out.push('\n');
    out.push_str(&traffic(
        data.demand_fetch + instruction.demand_fetch,
        data.copies_back + instruction.copies_back,
    ));
    out
}

