use crate::config::{WriteHitPolicy, WriteMissPolicy};

/// How a single reference was resolved by a set
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    /// Missed, and the set still had a free slot
    CompulsoryMiss,
    /// Missed in a full set, so the least recently used block was replaced
    ConflictMiss,
    /// A no-write-allocate write miss. Bus traffic only, the set isn't touched and it is not
    /// counted as a miss or a replace
    WriteAround,
}

/// The result of a set operation, with the bus traffic it caused in words
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Access {
    pub outcome: Outcome,
    pub words_fetched: u64,
    pub words_written: u64,
}

impl Access {
    fn hit() -> Self {
        Self { outcome: Outcome::Hit, words_fetched: 0, words_written: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    tag: u64,
    dirty: bool,
}

/// An LRU ordered set of blocks for one cache index
///
/// Blocks live in a fixed arena of slots which is filled once and never shrinks. Recency is kept
/// separately as a list of slot indices, most recently used first, so promoting a block is a
/// rotation of a few indices rather than moving the block itself
///
/// Lookup is a linear scan over the ways, as hardware would check all of them at once
#[derive(Debug, Clone)]
pub struct Set {
    slots: Vec<Block>,
    // order[0] is the most recently used slot, order.last() the least
    order: Vec<usize>,
    associativity: usize,
    words_per_block: u64,
}

impl Set {
    pub fn new(associativity: usize, words_per_block: u64) -> Self {
        Self {
            slots: Vec::with_capacity(associativity),
            order: Vec::with_capacity(associativity),
            associativity,
            words_per_block,
        }
    }

    /// Finds the recency position of a tag, 0 being the most recently used
    pub fn lookup(&self, tag: u64) -> Option<usize> {
        self.order.iter().position(|&slot| self.slots[slot].tag == tag)
    }

    /// Moves the block at a recency position to the front, and returns its slot
    fn promote(&mut self, position: usize) -> usize {
        self.order[..=position].rotate_right(1);
        self.order[0]
    }

    /// Reads a tag. A hit is promoted, a miss is admitted clean
    pub fn read(&mut self, tag: u64) -> Access {
        match self.lookup(tag) {
            Some(position) => {
                self.promote(position);
                Access::hit()
            }
            None => self.fill(tag),
        }
    }

    /// Brings a block into the set at the most recently used position
    ///
    /// With spare capacity this is a compulsory miss. Otherwise the least recently used block is
    /// replaced in its slot, copying it back first if it is dirty. A tag that is already resident
    /// is promoted and counts as a hit
    pub fn admit(&mut self, tag: u64) -> Access {
        match self.lookup(tag) {
            Some(position) => {
                self.promote(position);
                Access::hit()
            }
            None => self.fill(tag),
        }
    }

    /// Admits a tag known to be absent
    fn fill(&mut self, tag: u64) -> Access {
        if self.slots.len() < self.associativity {
            self.slots.push(Block { tag, dirty: false });
            self.order.insert(0, self.slots.len() - 1);
            return Access {
                outcome: Outcome::CompulsoryMiss,
                words_fetched: self.words_per_block,
                words_written: 0,
            };
        }
        let victim_position = self.order.len() - 1;
        let slot = self.promote(victim_position);
        let victim = std::mem::replace(&mut self.slots[slot], Block { tag, dirty: false });
        Access {
            outcome: Outcome::ConflictMiss,
            words_fetched: self.words_per_block,
            words_written: if victim.dirty { self.words_per_block } else { 0 },
        }
    }

    /// Writes a tag, following the write hit and write miss policies
    ///
    /// | hit policy    | case           | effect                                           |
    /// |---------------|----------------|--------------------------------------------------|
    /// | write back    | hit            | dirty, promoted, no traffic                      |
    /// | write back    | miss, allocate | admitted dirty, traffic from the admission       |
    /// | write through | hit            | promoted, one word written                       |
    /// | write through | miss, allocate | admitted clean, block fetched, one word written  |
    /// | either        | miss, around   | set untouched, one word written                  |
    pub fn write(&mut self, hit_policy: WriteHitPolicy, miss_policy: WriteMissPolicy, tag: u64) -> Access {
        if let Some(position) = self.lookup(tag) {
            let slot = self.promote(position);
            return match hit_policy {
                WriteHitPolicy::WriteBack => {
                    self.slots[slot].dirty = true;
                    Access::hit()
                }
                WriteHitPolicy::WriteThrough => Access { words_written: 1, ..Access::hit() },
            };
        }
        match (hit_policy, miss_policy) {
            (_, WriteMissPolicy::NoWriteAllocate) => Access {
                outcome: Outcome::WriteAround,
                words_fetched: 0,
                words_written: 1,
            },
            (WriteHitPolicy::WriteBack, WriteMissPolicy::WriteAllocate) => {
                let access = self.fill(tag);
                let slot = self.order[0];
                self.slots[slot].dirty = true;
                access
            }
            (WriteHitPolicy::WriteThrough, WriteMissPolicy::WriteAllocate) => {
                let access = self.fill(tag);
                // Nothing is ever dirty under write through, so the admission never copies back
                debug_assert_eq!(access.words_written, 0);
                Access { words_written: 1, ..access }
            }
        }
    }

    /// Words that would be copied back if every dirty block were flushed now
    ///
    /// Doesn't touch the dirty flags, draining twice gives the same answer
    pub fn drain(&self) -> u64 {
        self.slots.iter().filter(|block| block.dirty).count() as u64 * self.words_per_block
    }

    /// Resident tags, most recently used first
    pub fn tags(&self) -> impl Iterator<Item = u64> + '_ {
        self.order.iter().map(|&slot| self.slots[slot].tag)
    }

    /// Resident dirty tags, most recently used first
    pub fn dirty_tags(&self) -> impl Iterator<Item = u64> + '_ {
        self.order.iter().map(|&slot| self.slots[slot]).filter(|block| block.dirty).map(|block| block.tag)
    }

    pub fn is_dirty(&self, tag: u64) -> bool {
        self.lookup(tag).map_or(false, |position| self.slots[self.order[position]].dirty)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.associativity
    }
}
