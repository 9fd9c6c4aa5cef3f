use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::DEFAULT_ADDRESS_WIDTH;

lazy_static! {
    static ref POLICY_LINE: Regex = Regex::new(
        r"^\s*(?P<block>\d+)\s*-\s*(?P<split>[01])\s*-\s*(?P<assoc>\d+)\s*-\s*(?P<hit>wb|wt)\s*-\s*(?P<miss>wa|nw)\s*$"
    ).unwrap();
    static ref SPLIT_SIZES: Regex = Regex::new(r"^\s*(?P<instruction>\d+)\s*-\s*(?P<data>\d+)\s*$").unwrap();
    static ref UNIFIED_SIZE: Regex = Regex::new(r"^\s*(?P<size>\d+)\s*$").unwrap();
}

/// A full cache configuration: geometry inputs and the write policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub block_size: u64,
    pub organization: Organization,
    pub associativity: u64,
    pub write_hit_policy: WriteHitPolicy,
    pub write_miss_policy: WriteMissPolicy,
    /// Size of the unified cache, or of the D-cache when split
    pub data_size: u64,
    /// Size of the I-cache, only meaningful when split
    #[serde(default)]
    pub instruction_size: Option<u64>,
    #[serde(default = "default_address_width")]
    pub address_width: u32,
}

fn default_address_width() -> u32 {
    DEFAULT_ADDRESS_WIDTH
}

/// Whether instructions and data share one bank of sets
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Organization {
    #[serde(alias = "unified")]
    Unified,
    #[serde(alias = "split")]
    Split,
}

/// What a write hit does - write back (defer with a dirty flag) or write through
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteHitPolicy {
    #[serde(alias = "wb")]
    WriteBack,
    #[serde(alias = "wt")]
    WriteThrough,
}

/// What a write miss does - bring the block in, or bypass the cache
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteMissPolicy {
    #[serde(alias = "wa")]
    WriteAllocate,
    #[serde(alias = "nw")]
    NoWriteAllocate,
}

/// The first header line of a trace, before sizes are known
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PolicyLine {
    pub block_size: u64,
    pub organization: Organization,
    pub associativity: u64,
    pub write_hit_policy: WriteHitPolicy,
    pub write_miss_policy: WriteMissPolicy,
}

impl FromStr for PolicyLine {
    type Err = String;

    /// Parses `<block size> - <0|1> - <associativity> - <wb|wt> - <wa|nw>`, 1 meaning split
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let captures = POLICY_LINE.captures(line)
            .ok_or_else(|| format!("Couldn't parse the configuration line \"{line}\""))?;
        let number = |name: &str| captures[name].parse::<u64>()
            .map_err(|e| format!("Couldn't parse the {name} field of \"{line}\": {e}"));
        Ok(Self {
            block_size: number("block")?,
            organization: if &captures["split"] == "1" { Organization::Split } else { Organization::Unified },
            associativity: number("assoc")?,
            write_hit_policy: if &captures["hit"] == "wb" { WriteHitPolicy::WriteBack } else { WriteHitPolicy::WriteThrough },
            write_miss_policy: if &captures["miss"] == "wa" { WriteMissPolicy::WriteAllocate } else { WriteMissPolicy::NoWriteAllocate },
        })
    }
}

impl PolicyLine {
    /// Completes the configuration with the sizes line that follows the policy line
    ///
    /// Split caches list the I-cache size first: `<instruction> - <data>`
    pub fn with_sizes(self, line: &str) -> Result<CacheConfig, String> {
        let (data_size, instruction_size) = match self.organization {
            Organization::Unified => {
                let captures = UNIFIED_SIZE.captures(line)
                    .ok_or_else(|| format!("Expected a single cache size, got \"{line}\""))?;
                let size = captures["size"].parse::<u64>().map_err(|e| format!("Couldn't parse the cache size: {e}"))?;
                (size, None)
            }
            Organization::Split => {
                let captures = SPLIT_SIZES.captures(line)
                    .ok_or_else(|| format!("Expected \"<I-cache size> - <D-cache size>\", got \"{line}\""))?;
                let instruction = captures["instruction"].parse::<u64>().map_err(|e| format!("Couldn't parse the I-cache size: {e}"))?;
                let data = captures["data"].parse::<u64>().map_err(|e| format!("Couldn't parse the D-cache size: {e}"))?;
                (data, Some(instruction))
            }
        };
        Ok(CacheConfig {
            block_size: self.block_size,
            organization: self.organization,
            associativity: self.associativity,
            write_hit_policy: self.write_hit_policy,
            write_miss_policy: self.write_miss_policy,
            data_size,
            instruction_size,
            address_width: DEFAULT_ADDRESS_WIDTH,
        })
    }
}
