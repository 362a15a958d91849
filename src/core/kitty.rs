//! Kitty keyboard protocol flag stack
//!
//! The kitty keyboard protocol manages its reporting flags through a
//! small stack so nested programs can push their own configuration and
//! pop back to the outer one on exit (`CSI > flags u` / `CSI < n u`).
//! The `CSI = flags ; mode u` form edits the top frame in place.

use bitflags::bitflags;

bitflags! {
    /// Progressive-enhancement flags of the kitty keyboard protocol
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KittyKeyFlags: u8 {
        const DISAMBIGUATE = 1;
        const REPORT_EVENT_TYPES = 1 << 1;
        const REPORT_ALTERNATE_KEYS = 1 << 2;
        const REPORT_ALL_AS_ESCAPES = 1 << 3;
        const REPORT_ASSOCIATED_TEXT = 1 << 4;
    }
}

/// How `set` combines the requested flags with the top frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KittySetOp {
    /// Replace the frame
    Set,
    /// Bitwise OR into the frame
    Or,
    /// Bitwise AND with the complement (clear the given flags)
    Not,
}

/// Maximum stack depth; pushing beyond it evicts the oldest frame
const MAX_DEPTH: usize = 8;

/// LIFO stack of kitty keyboard flag frames. There is always at least
/// one frame; popping the last one leaves a default frame behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KittyKeyboardStack {
    frames: Vec<KittyKeyFlags>,
}

impl KittyKeyboardStack {
    pub fn new() -> Self {
        Self {
            frames: vec![KittyKeyFlags::empty()],
        }
    }

    /// The flags currently in effect
    pub fn current(&self) -> KittyKeyFlags {
        *self.frames.last().unwrap()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, flags: KittyKeyFlags) {
        if self.frames.len() == MAX_DEPTH {
            self.frames.remove(0);
        }
        self.frames.push(flags);
    }

    /// Pop up to `n` frames
    pub fn pop(&mut self, n: usize) {
        let keep = self.frames.len().saturating_sub(n);
        self.frames.truncate(keep);
        if self.frames.is_empty() {
            self.frames.push(KittyKeyFlags::empty());
        }
    }

    /// Mutate the top frame
    pub fn set(&mut self, op: KittySetOp, flags: KittyKeyFlags) {
        let top = self.frames.last_mut().unwrap();
        match op {
            KittySetOp::Set => *top = flags,
            KittySetOp::Or => *top |= flags,
            KittySetOp::Not => *top &= !flags,
        }
    }

    pub fn reset(&mut self) {
        self.frames.clear();
        self.frames.push(KittyKeyFlags::empty());
    }
}

impl Default for KittyKeyboardStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let stack = KittyKeyboardStack::new();
        assert_eq!(stack.current(), KittyKeyFlags::empty());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = KittyKeyboardStack::new();
        stack.push(KittyKeyFlags::DISAMBIGUATE);
        assert_eq!(stack.current(), KittyKeyFlags::DISAMBIGUATE);

        stack.push(KittyKeyFlags::DISAMBIGUATE | KittyKeyFlags::REPORT_EVENT_TYPES);
        assert_eq!(stack.depth(), 3);

        stack.pop(1);
        assert_eq!(stack.current(), KittyKeyFlags::DISAMBIGUATE);
    }

    #[test]
    fn test_pop_past_bottom_leaves_default() {
        let mut stack = KittyKeyboardStack::new();
        stack.push(KittyKeyFlags::all());
        stack.pop(10);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current(), KittyKeyFlags::empty());
    }

    #[test]
    fn test_push_evicts_oldest_at_max_depth() {
        let mut stack = KittyKeyboardStack::new();
        for _ in 0..10 {
            stack.push(KittyKeyFlags::DISAMBIGUATE);
        }
        assert_eq!(stack.depth(), 8);
        assert_eq!(stack.current(), KittyKeyFlags::DISAMBIGUATE);
    }

    #[test]
    fn test_set_ops() {
        let mut stack = KittyKeyboardStack::new();
        stack.set(KittySetOp::Set, KittyKeyFlags::DISAMBIGUATE);
        assert_eq!(stack.current(), KittyKeyFlags::DISAMBIGUATE);

        stack.set(KittySetOp::Or, KittyKeyFlags::REPORT_EVENT_TYPES);
        assert_eq!(
            stack.current(),
            KittyKeyFlags::DISAMBIGUATE | KittyKeyFlags::REPORT_EVENT_TYPES
        );

        stack.set(KittySetOp::Not, KittyKeyFlags::DISAMBIGUATE);
        assert_eq!(stack.current(), KittyKeyFlags::REPORT_EVENT_TYPES);
    }

    #[test]
    fn test_set_only_touches_top() {
        let mut stack = KittyKeyboardStack::new();
        stack.push(KittyKeyFlags::DISAMBIGUATE);
        stack.set(KittySetOp::Set, KittyKeyFlags::REPORT_ALTERNATE_KEYS);
        stack.pop(1);
        assert_eq!(stack.current(), KittyKeyFlags::empty());
    }
}
