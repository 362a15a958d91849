//! Ref-counted, deduplicating style storage
//!
//! Cells reference styles through a 16-bit id instead of carrying the
//! full style, so a screen with millions of cells usually holds only a
//! handful of live styles. The set deduplicates on insert by hashing the
//! canonical packed form, counts references per entry, and reclaims a
//! slot once its count drops to zero.
//!
//! Capacity is fixed at construction: a [`Layout`] computes the entry
//! arena and probe table sizes up front and the set never reallocates
//! afterwards. Id 0 is reserved for the default style, which is never
//! ref-counted.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::core::style::Style;
use crate::error::{Error, Result};

/// Identifier for an interned style
pub type StyleId = u16;

/// The reserved id of the all-default style
pub const DEFAULT_STYLE_ID: StyleId = 0;

/// Sizing plan for a [`StyleSet`]'s fixed backing storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Maximum number of live styles, excluding the reserved default
    pub capacity: usize,
    /// Probe table length; a power of two at most half full
    pub table_capacity: usize,
}

impl Layout {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, StyleId::MAX as usize - 1);
        Self {
            capacity,
            table_capacity: (capacity * 2).next_power_of_two(),
        }
    }

    /// Total backing storage in bytes for diagnostics and budgeting
    pub fn byte_size(&self) -> usize {
        (self.capacity + 1) * std::mem::size_of::<Entry>()
            + self.table_capacity * std::mem::size_of::<StyleId>()
    }

    /// Required base alignment of the backing storage
    pub fn base_align(&self) -> usize {
        std::mem::align_of::<Entry>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Entry {
    style: Style,
    ref_count: u16,
}

/// Fixed-capacity ref-counted hash set of styles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSet {
    layout: Layout,
    /// Entry arena; index 0 is the reserved default slot
    entries: Box<[Entry]>,
    /// Open-addressed probe table of entry ids; 0 marks an empty slot
    table: Box<[StyleId]>,
    /// Reusable entry ids, popped on insert
    free: Vec<StyleId>,
    len: usize,
}

impl StyleSet {
    pub fn new(layout: Layout) -> Self {
        let free = (1..=layout.capacity as StyleId).rev().collect();
        Self {
            layout,
            entries: vec![Entry::default(); layout.capacity + 1].into_boxed_slice(),
            table: vec![DEFAULT_STYLE_ID; layout.table_capacity].into_boxed_slice(),
            free,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Layout::new(capacity))
    }

    /// Number of live styles, excluding the reserved default
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.layout.capacity
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Intern a style, returning its id.
    ///
    /// A repeated `add` of an equal style returns the same id and bumps
    /// its reference count. The default style always maps to
    /// [`DEFAULT_STYLE_ID`] without touching any count.
    pub fn add(&mut self, style: &Style) -> Result<StyleId> {
        if style.is_default() {
            return Ok(DEFAULT_STYLE_ID);
        }

        let mask = self.layout.table_capacity - 1;
        let mut index = hash_style(style) as usize & mask;
        loop {
            let id = self.table[index];
            if id == DEFAULT_STYLE_ID {
                break;
            }
            if self.entries[id as usize].style == *style {
                let count = &mut self.entries[id as usize].ref_count;
                *count = count.saturating_add(1);
                return Ok(id);
            }
            index = (index + 1) & mask;
        }

        let id = self.free.pop().ok_or(Error::OutOfStyleCapacity)?;
        self.entries[id as usize] = Entry {
            style: *style,
            ref_count: 1,
        };
        self.table[index] = id;
        self.len += 1;
        Ok(id)
    }

    /// Increment the reference count of an already-interned id.
    ///
    /// Used when a cell copies the cursor's interned style. Id 0 is
    /// ignored.
    pub fn retain(&mut self, id: StyleId) {
        if id == DEFAULT_STYLE_ID {
            return;
        }
        let count = &mut self.entries[id as usize].ref_count;
        debug_assert!(*count > 0, "retain of dead style id {id}");
        *count = count.saturating_add(1);
    }

    /// Drop one reference. At zero the slot becomes reusable.
    pub fn release(&mut self, id: StyleId) {
        if id == DEFAULT_STYLE_ID {
            return;
        }
        let entry = &mut self.entries[id as usize];
        debug_assert!(entry.ref_count > 0, "release of dead style id {id}");
        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            self.remove_from_table(id);
            self.free.push(id);
            self.len -= 1;
        }
    }

    /// Look up a style by id. Id validity is a caller precondition.
    pub fn get(&self, id: StyleId) -> Style {
        self.entries[id as usize].style
    }

    /// Current reference count of an id, for tests and diagnostics
    pub fn ref_count(&self, id: StyleId) -> u16 {
        self.entries[id as usize].ref_count
    }

    /// Whether the set currently contains an equal style
    pub fn contains(&self, style: &Style) -> bool {
        self.lookup(style).is_some()
    }

    fn lookup(&self, style: &Style) -> Option<StyleId> {
        let mask = self.layout.table_capacity - 1;
        let mut index = hash_style(style) as usize & mask;
        loop {
            let id = self.table[index];
            if id == DEFAULT_STYLE_ID {
                return None;
            }
            if self.entries[id as usize].style == *style {
                return Some(id);
            }
            index = (index + 1) & mask;
        }
    }

    /// Remove an id from the probe table, then rehash the remainder of
    /// its collision cluster so later lookups never cross a hole.
    fn remove_from_table(&mut self, id: StyleId) {
        let mask = self.layout.table_capacity - 1;
        let mut index = hash_style(&self.entries[id as usize].style) as usize & mask;
        while self.table[index] != id {
            index = (index + 1) & mask;
        }
        self.table[index] = DEFAULT_STYLE_ID;

        let mut next = (index + 1) & mask;
        while self.table[next] != DEFAULT_STYLE_ID {
            let moved = self.table[next];
            self.table[next] = DEFAULT_STYLE_ID;
            self.reinsert(moved);
            next = (next + 1) & mask;
        }
    }

    fn reinsert(&mut self, id: StyleId) {
        let mask = self.layout.table_capacity - 1;
        let mut index = hash_style(&self.entries[id as usize].style) as usize & mask;
        while self.table[index] != DEFAULT_STYLE_ID {
            index = (index + 1) & mask;
        }
        self.table[index] = id;
    }
}

/// 64-bit hash over the packed style bytes
fn hash_style(style: &Style) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(&style.packed());
    hasher.finish()
}
