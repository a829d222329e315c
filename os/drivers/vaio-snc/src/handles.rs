//! Capability handle table.
//!
//! Newer firmware publishes its features as numbered capabilities. Which
//! capability sits at which of the 16 handle offsets differs between models
//! and BIOS revisions, so the table is probed fresh on every attach and only
//! read afterwards.

use alloc::string::String;
use core::fmt::Write;

/// Vendor-assigned feature identifier. Zero means "no capability".
pub type CapabilityCode = u16;

/// Position at which a capability was found during the probe sweep.
pub type HandleOffset = u8;

/// Number of probed offsets.
pub const HANDLE_SLOTS: usize = 16;

/// Added to the offset to form the probe argument.
pub const PROBE_BASE: u32 = 0x20;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandleTable {
    slots: [CapabilityCode; HANDLE_SLOTS],
}

impl HandleTable {
    /// Sweep all offsets, calling `probe(PROBE_BASE + offset)` for each.
    ///
    /// Offsets whose probe fails or answers zero stay empty.
    pub fn discover<E>(mut probe: impl FnMut(u32) -> Result<u32, E>) -> Self {
        let mut slots = [0; HANDLE_SLOTS];
        for (offset, slot) in (0u32..).zip(slots.iter_mut()) {
            if let Ok(code) = probe(PROBE_BASE + offset) {
                #[allow(clippy::cast_possible_truncation)]
                let code = code as CapabilityCode;
                *slot = code;
            }
        }
        Self { slots }
    }

    /// First offset holding `capability`. Zero never matches.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn find(&self, capability: CapabilityCode) -> Option<HandleOffset> {
        if capability == 0 {
            return None;
        }
        self.slots
            .iter()
            .position(|&c| c == capability)
            .map(|i| i as HandleOffset)
    }

    #[must_use]
    pub fn capability_at(&self, offset: HandleOffset) -> Option<CapabilityCode> {
        self.slots
            .get(usize::from(offset))
            .copied()
            .filter(|&c| c != 0)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, capability: CapabilityCode) -> bool {
        self.find(capability).is_some()
    }

    /// Present entries in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (HandleOffset, CapabilityCode)> + '_ {
        (0..).zip(self.slots.iter().copied()).filter(|&(_, c)| c != 0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|&c| c == 0)
    }

    /// All slots, empty ones included, as `0x%04x ` words.
    #[must_use]
    pub fn listing(&self) -> String {
        let mut s = String::with_capacity(HANDLE_SLOTS * 7);
        for c in self.slots {
            let _ = write!(s, "{c:#06x} ");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(u32, u32)]) -> HandleTable {
        HandleTable::discover(|arg| {
            entries
                .iter()
                .find(|&&(o, _)| PROBE_BASE + o == arg)
                .map(|&(_, c)| c)
                .ok_or(())
        })
    }

    #[test]
    fn rfkill_at_offset_three() {
        let t = table(&[(3, 0x0124)]);
        assert_eq!(t.find(0x0124), Some(3));
        assert_eq!(t.find(0x0135), None);
        assert_eq!(t.capability_at(3), Some(0x0124));
        assert_eq!(t.capability_at(4), None);
        assert_eq!(t.capability_at(200), None);
    }

    #[test]
    fn zero_never_matches() {
        let t = table(&[(0, 0x0100)]);
        // fifteen empty slots hold zero, still no match
        assert_eq!(t.find(0), None);
    }

    #[test]
    fn duplicates_resolve_to_first_offset() {
        let t = table(&[(9, 0x0100), (2, 0x0100)]);
        assert_eq!(t.find(0x0100), Some(2));
    }

    #[test]
    fn iter_skips_empty_slots() {
        let t = table(&[(5, 0x0137), (1, 0x0100)]);
        let v: alloc::vec::Vec<_> = t.iter().collect();
        assert_eq!(v, [(1, 0x0100), (5, 0x0137)]);
    }

    #[test]
    fn listing_shows_every_slot() {
        let t = table(&[(0, 0x0100)]);
        let s = t.listing();
        assert!(s.starts_with("0x0100 0x0000 "));
        assert_eq!(s.split_whitespace().count(), HANDLE_SLOTS);
    }
}
