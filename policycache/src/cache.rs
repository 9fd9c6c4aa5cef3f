use std::fmt;
use log::{debug, trace, warn};
use crate::config::{CacheConfig, Organization};
use crate::error::{AddressDecodeError, Bank, ConfigurationError};
use crate::geometry::{DecodedAddress, Geometry};
use crate::reporter::Reporter;
use crate::set::{Access, Outcome, Set};

/// The kind of a memory reference, numbered as in trace files
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    DataRead,
    DataWrite,
    InstructionRead,
}

impl TryFrom<u8> for ReferenceKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReferenceKind::DataRead),
            1 => Ok(ReferenceKind::DataWrite),
            2 => Ok(ReferenceKind::InstructionRead),
            other => Err(format!("Unknown reference kind {other}, expected 0, 1 or 2")),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::DataRead => write!(f, "data-read"),
            ReferenceKind::DataWrite => write!(f, "data-write"),
            ReferenceKind::InstructionRead => write!(f, "instruction-read"),
        }
    }
}

/// A reference as it comes out of a trace, with the address still in hexadecimal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub address: String,
}

impl Reference {
    pub fn new(kind: ReferenceKind, address: impl Into<String>) -> Self {
        Self { kind, address: address.into() }
    }
}

/// One array of sets sharing a geometry
#[derive(Debug, Clone)]
pub struct SetBank {
    geometry: Geometry,
    sets: Vec<Set>,
}

impl SetBank {
    fn new(geometry: Geometry) -> Self {
        let sets = (0..geometry.num_sets())
            .map(|_| Set::new(geometry.associativity() as usize, geometry.words_per_block()))
            .collect();
        Self { geometry, sets }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    fn set_mut(&mut self, decoded: &DecodedAddress) -> &mut Set {
        // The index is masked by the geometry, so it is always in range
        &mut self.sets[decoded.set_index as usize]
    }

    fn drain(&self) -> u64 {
        self.sets.iter()
            .enumerate()
            .map(|(index, set)| {
                for tag in set.dirty_tags() {
                    trace!("flushing dirty tag {tag} in set {index}");
                }
                set.drain()
            })
            .sum()
    }
}

/// The banks a cache routes references to. Chosen once when the cache is built
///
/// A unified cache sends every reference to one bank. A split cache sends instruction reads to
/// their own bank, with its own geometry, and everything else to the data bank
#[derive(Debug, Clone)]
pub enum Banks {
    Unified(SetBank),
    Split { data: SetBank, instruction: SetBank },
}

impl Banks {
    fn data(&self) -> &SetBank {
        match self {
            Banks::Unified(bank) => bank,
            Banks::Split { data, .. } => data,
        }
    }
}

/// A set-associative cache with LRU replacement and configurable write policies
///
/// The cache owns its sets and the two reporters, so independent caches share nothing and can be
/// run side by side
#[derive(Debug, Clone)]
pub struct Cache {
    config: CacheConfig,
    banks: Banks,
    data: Reporter,
    instruction: Reporter,
}

impl Cache {
    /// Builds a cache, validating the geometry of every bank
    ///
    /// # Arguments
    ///
    /// * `config`: The cache configuration, usually from a trace header or a JSON file
    ///
    /// returns: Result<Cache, ConfigurationError>
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigurationError> {
        let geometry = |bank, size| Geometry::new(bank, size, config.block_size, config.associativity, config.address_width);
        let banks = match config.organization {
            Organization::Unified => Banks::Unified(SetBank::new(geometry(Bank::Data, config.data_size)?)),
            Organization::Split => {
                let instruction_size = config.instruction_size.ok_or(ConfigurationError::MissingInstructionSize)?;
                Banks::Split {
                    data: SetBank::new(geometry(Bank::Data, config.data_size)?),
                    instruction: SetBank::new(geometry(Bank::Instruction, instruction_size)?),
                }
            }
        };
        debug!("built cache {config:?}");
        Ok(Self {
            config: config.clone(),
            banks,
            data: Reporter::default(),
            instruction: Reporter::default(),
        })
    }

    /// Handles a reference with a hexadecimal address
    ///
    /// A reference whose address doesn't parse is dropped with a warning, and no counter changes.
    /// The error is still returned so callers can keep count
    pub fn handle(&mut self, reference: &Reference) -> Result<Outcome, AddressDecodeError> {
        let geometry = match (&self.banks, reference.kind) {
            (Banks::Split { instruction, .. }, ReferenceKind::InstructionRead) => instruction.geometry,
            (banks, _) => banks.data().geometry,
        };
        match geometry.decode_hex(&reference.address) {
            Ok(decoded) => Ok(self.dispatch(reference.kind, &decoded)),
            Err(e) => {
                warn!("skipping {} reference: {e}", reference.kind);
                Err(e)
            }
        }
    }

    /// Handles a reference with an integer address
    pub fn access(&mut self, kind: ReferenceKind, address: u64) -> Outcome {
        let decoded = match (&self.banks, kind) {
            (Banks::Split { instruction, .. }, ReferenceKind::InstructionRead) => instruction.geometry.decode(address),
            (banks, _) => banks.data().geometry.decode(address),
        };
        self.dispatch(kind, &decoded)
    }

    fn dispatch(&mut self, kind: ReferenceKind, decoded: &DecodedAddress) -> Outcome {
        let (hit, miss) = (self.config.write_hit_policy, self.config.write_miss_policy);
        let access = match (&mut self.banks, kind) {
            (banks, ReferenceKind::DataWrite) => {
                let access = Self::data_bank_mut(banks).set_mut(decoded).write(hit, miss, decoded.tag);
                self.data.record(access.outcome);
                self.data.add_traffic(&access);
                access
            }
            (Banks::Split { instruction, .. }, ReferenceKind::InstructionRead) => {
                let access = instruction.set_mut(decoded).read(decoded.tag);
                self.instruction.record(access.outcome);
                self.instruction.add_traffic(&access);
                access
            }
            (banks, kind) => {
                let access = Self::data_bank_mut(banks).set_mut(decoded).read(decoded.tag);
                // Hits and misses are kept per kind, but a unified cache has one bus
                match kind {
                    ReferenceKind::InstructionRead => self.instruction.record(access.outcome),
                    _ => self.data.record(access.outcome),
                }
                self.data.add_traffic(&access);
                access
            }
        };
        Self::trace_access(kind, decoded, &access);
        access.outcome
    }

    fn data_bank_mut(banks: &mut Banks) -> &mut SetBank {
        match banks {
            Banks::Unified(bank) => bank,
            Banks::Split { data, .. } => data,
        }
    }

    fn trace_access(kind: ReferenceKind, decoded: &DecodedAddress, access: &Access) {
        trace!(
            "{kind} set #{} tag #{}: {:?}, fetched {}, written {}",
            decoded.set_index, decoded.tag, access.outcome, access.words_fetched, access.words_written
        );
    }

    /// Counts the words every dirty block would copy back at the end of a run
    ///
    /// Dirty flags are left as they are, and the count replaces that of any earlier flush, so
    /// flushing twice in a row reports the same totals
    pub fn flush(&mut self) {
        let (data, instruction) = match &self.banks {
            Banks::Unified(bank) => (bank.drain(), 0),
            Banks::Split { data, instruction } => (data.drain(), instruction.drain()),
        };
        debug!("flushed {data} dirty data words and {instruction} dirty instruction words");
        self.data.set_flushed(data);
        self.instruction.set_flushed(instruction);
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn banks(&self) -> &Banks {
        &self.banks
    }

    /// The bank data references go to, which is the only bank when unified
    pub fn data_bank(&self) -> &SetBank {
        self.banks.data()
    }

    pub fn instruction_bank(&self) -> Option<&SetBank> {
        match &self.banks {
            Banks::Unified(_) => None,
            Banks::Split { instruction, .. } => Some(instruction),
        }
    }

    pub fn data_reporter(&self) -> &Reporter {
        &self.data
    }

    pub fn instruction_reporter(&self) -> &Reporter {
        &self.instruction
    }
}
