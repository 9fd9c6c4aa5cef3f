use crate::cache::{Cache, Reference, ReferenceKind};
use crate::config::{CacheConfig, Organization, WriteHitPolicy, WriteMissPolicy};
use crate::error::{Bank, ConfigurationError, DecodeFailure};
use crate::set::Outcome;
use crate::DEFAULT_ADDRESS_WIDTH;

use ReferenceKind::{DataRead, DataWrite, InstructionRead};

fn unified(block_size: u64, associativity: u64, size: u64, hit: WriteHitPolicy, miss: WriteMissPolicy) -> CacheConfig {
    CacheConfig {
        block_size,
        organization: Organization::Unified,
        associativity,
        write_hit_policy: hit,
        write_miss_policy: miss,
        data_size: size,
        instruction_size: None,
        address_width: DEFAULT_ADDRESS_WIDTH,
    }
}

fn split(block_size: u64, associativity: u64, instruction_size: u64, data_size: u64) -> CacheConfig {
    CacheConfig {
        organization: Organization::Split,
        instruction_size: Some(instruction_size),
        ..unified(block_size, associativity, data_size, WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate)
    }
}

#[test]
fn unified_instruction_and_data_reads_share_sets() {
    let config = unified(16, 2, 256, WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate);
    let mut cache = Cache::new(&config).unwrap();
    assert_eq!(cache.access(InstructionRead, 0x1230), Outcome::CompulsoryMiss);
    assert_eq!(cache.access(DataRead, 0x1234), Outcome::Hit);

    let instruction = cache.instruction_reporter();
    assert_eq!((instruction.accesses(), instruction.misses()), (1, 1));
    assert_eq!(instruction.words_fetched(), 0);

    let data = cache.data_reporter();
    assert_eq!((data.accesses(), data.misses()), (1, 0));
    // One block of four words fetched, once, on the shared bus
    assert_eq!(data.words_fetched(), 4);
    assert!(cache.instruction_bank().is_none());
}

#[test]
fn split_instruction_reads_use_their_own_bank_and_bus() {
    let mut cache = Cache::new(&split(8, 1, 64, 32)).unwrap();
    assert_eq!(cache.data_bank().geometry().num_sets(), 4);
    assert_eq!(cache.instruction_bank().map(|b| b.geometry().num_sets()), Some(8));

    assert_eq!(cache.access(InstructionRead, 0x40), Outcome::CompulsoryMiss);
    assert_eq!(cache.access(DataRead, 0x40), Outcome::CompulsoryMiss);
    assert_eq!(cache.access(InstructionRead, 0x44), Outcome::Hit);

    let instruction = cache.instruction_reporter();
    assert_eq!((instruction.accesses(), instruction.misses(), instruction.words_fetched()), (2, 1, 2));
    let data = cache.data_reporter();
    assert_eq!((data.accesses(), data.misses(), data.words_fetched()), (1, 1, 2));
}

#[test]
fn split_writes_go_to_the_data_bank() {
    let mut cache = Cache::new(&split(4, 1, 16, 16)).unwrap();
    cache.access(DataWrite, 0x0);
    assert_eq!(cache.access(InstructionRead, 0x0), Outcome::CompulsoryMiss);
    assert_eq!(cache.access(DataRead, 0x0), Outcome::Hit);
    cache.flush();
    assert_eq!(cache.data_reporter().words_copied(), 1);
    assert_eq!(cache.instruction_reporter().words_copied(), 0);
}

#[test]
fn conflict_misses_count_replaces() {
    let config = unified(4, 1, 4, WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate);
    let mut cache = Cache::new(&config).unwrap();
    for address in [0x0, 0x4, 0x0, 0x4, 0x0] {
        cache.access(DataRead, address);
    }
    let data = cache.data_reporter();
    assert_eq!((data.accesses(), data.misses(), data.replaces()), (5, 5, 4));
    assert_eq!(data.miss_rate(), 1.0);
    assert_eq!(data.hit_rate(), 0.0);
}

#[test]
fn no_write_allocate_miss_is_not_a_miss_or_replace() {
    let config = unified(4, 1, 4, WriteHitPolicy::WriteBack, WriteMissPolicy::NoWriteAllocate);
    let mut cache = Cache::new(&config).unwrap();
    cache.access(DataRead, 0x0);
    assert_eq!(cache.access(DataWrite, 0x10), Outcome::WriteAround);
    assert_eq!(cache.data_bank().sets()[0].tags().collect::<Vec<_>>(), vec![0]);
    let data = cache.data_reporter();
    assert_eq!((data.accesses(), data.misses(), data.replaces()), (2, 1, 0));
    assert_eq!((data.words_fetched(), data.words_copied()), (1, 1));
}

#[test]
fn write_back_copies_only_on_eviction_or_flush() {
    let config = unified(8, 1, 8, WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate);
    let mut cache = Cache::new(&config).unwrap();
    cache.access(DataWrite, 0x0);
    cache.access(DataWrite, 0x4);
    assert_eq!(cache.data_reporter().words_copied(), 0);
    cache.access(DataRead, 0x8);
    assert_eq!(cache.data_reporter().words_copied(), 2);
    cache.access(DataWrite, 0x8);
    cache.flush();
    assert_eq!(cache.data_reporter().words_copied(), 4);
}

#[test]
fn flush_is_repeatable() {
    let config = unified(16, 2, 128, WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate);
    let mut cache = Cache::new(&config).unwrap();
    for address in [0x0, 0x40, 0x80, 0x100] {
        cache.access(DataWrite, address);
    }
    cache.flush();
    let first = cache.data_reporter().clone();
    cache.flush();
    assert_eq!(cache.data_reporter(), &first);

    // A write in between changes what the next flush finds
    cache.access(DataWrite, 0x10);
    cache.flush();
    assert_eq!(cache.data_reporter().words_copied(), first.words_copied() + 4);
}

#[test]
fn malformed_addresses_are_skipped() {
    let config = unified(4, 1, 16, WriteHitPolicy::WriteThrough, WriteMissPolicy::WriteAllocate);
    let mut cache = Cache::new(&config).unwrap();
    let error = cache.handle(&Reference::new(DataWrite, "12g4")).unwrap_err();
    assert_eq!(error.text, "12g4");
    assert_eq!(error.reason, DecodeFailure::InvalidDigit('g'));
    assert_eq!(cache.data_reporter(), &Default::default());
    // Signs and bare prefixes aren't addresses either
    for (text, reason) in [("+1a", DecodeFailure::InvalidDigit('+')), ("0x", DecodeFailure::Empty), ("", DecodeFailure::Empty)] {
        let error = cache.handle(&Reference::new(DataRead, text)).unwrap_err();
        assert_eq!(error.reason, reason, "{text:?}");
    }
    let error = cache.handle(&Reference::new(DataRead, "1ffffffffffffffff")).unwrap_err();
    assert_eq!(error.reason, DecodeFailure::Overflow);
    assert_eq!(cache.data_reporter(), &Default::default());
    assert_eq!(cache.handle(&Reference::new(DataRead, "0x10")), Ok(Outcome::CompulsoryMiss));
    assert_eq!(cache.handle(&Reference::new(DataRead, "10")), Ok(Outcome::Hit));
}

#[test]
fn rejects_invalid_geometry() {
    let base = unified(16, 2, 1024, WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate);
    let error = |config: CacheConfig| Cache::new(&config).unwrap_err();

    assert_eq!(error(CacheConfig { block_size: 12, ..base.clone() }), ConfigurationError::BlockSizeNotPowerOfTwo(12));
    assert_eq!(error(CacheConfig { block_size: 2, ..base.clone() }), ConfigurationError::BlockSmallerThanWord(2));
    assert_eq!(error(CacheConfig { associativity: 0, ..base.clone() }), ConfigurationError::ZeroAssociativity);
    assert_eq!(
        error(CacheConfig { associativity: 3, data_size: 16 * 3 * 3, ..base.clone() }),
        ConfigurationError::SetCountNotPowerOfTwo { bank: Bank::Data, sets: 3 }
    );
    assert_eq!(error(CacheConfig { data_size: 16, ..base.clone() }), ConfigurationError::NoSets { bank: Bank::Data, size: 16 });
    assert_eq!(
        error(CacheConfig { address_width: 8, ..base.clone() }),
        ConfigurationError::AddressTooNarrow { offset_bits: 4, index_bits: 5, address_width: 8 }
    );
    assert_eq!(
        error(CacheConfig { organization: Organization::Split, ..base.clone() }),
        ConfigurationError::MissingInstructionSize
    );
    assert_eq!(
        error(CacheConfig { instruction_size: Some(96), ..split(16, 2, 96, 1024) }),
        ConfigurationError::SetCountNotPowerOfTwo { bank: Bank::Instruction, sets: 3 }
    );
}

#[test]
fn zero_accesses_read_as_zero_miss_rate() {
    let cache = Cache::new(&split(16, 4, 1024, 1024)).unwrap();
    assert_eq!(cache.instruction_reporter().miss_rate(), 0.0);
    assert_eq!(cache.data_reporter().hit_rate(), 1.0);
}
