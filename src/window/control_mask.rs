//! Per-manager authority set.
//!
//! Identities whose slot fits in a machine word live in a bitset; anything
//! beyond that falls back to an ordered set with the same semantics.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use super::WindowKey;

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone)]
pub struct ControlMask<Id: WindowKey> {
    bits: u64,
    overflow: BTreeSet<usize>,
    _marker: PhantomData<Id>,
}

impl<Id: WindowKey> Default for ControlMask<Id> {
    fn default() -> Self {
        Self {
            bits: 0,
            overflow: BTreeSet::new(),
            _marker: PhantomData,
        }
    }
}

impl<Id: WindowKey> ControlMask<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Id) {
        let slot = id.slot();
        if slot < WORD_BITS {
            self.bits |= 1u64 << slot;
        } else {
            self.overflow.insert(slot);
        }
    }

    pub fn remove(&mut self, id: Id) {
        let slot = id.slot();
        if slot < WORD_BITS {
            self.bits &= !(1u64 << slot);
        } else {
            self.overflow.remove(&slot);
        }
    }

    pub fn contains(&self, id: Id) -> bool {
        let slot = id.slot();
        if slot < WORD_BITS {
            self.bits & (1u64 << slot) != 0
        } else {
            self.overflow.contains(&slot)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0 && self.overflow.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize + self.overflow.len()
    }

    pub fn clear(&mut self) {
        self.bits = 0;
        self.overflow.clear();
    }
}
