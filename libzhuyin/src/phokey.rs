//! Phonetic syllable slots and their packed 16-bit dictionary key.
//!
//! A syllable has four slots: initial (5 bits), medial (2), final (4) and
//! tone (3). The packed key puts the initial in the most significant bits.
//! The back-quote initial (24) packs differently: `(24 << 9) | medial`.

use serde::{Deserialize, Serialize};

use crate::layout::{KeyMapping, Slot};

/// Initial value for the back-quote key, packed as a special case.
pub const BACK_QUOTE_INITIAL: u8 = 24;

/// Bit widths of the initial, medial, final and tone slots.
pub const SLOT_WIDTHS: [u32; 4] = [5, 2, 4, 3];

/// The four component slots of one syllable. Zero means empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneticSlots {
    slots: [u8; 4],
}

impl PhoneticSlots {
    pub fn new(initial: u8, medial: u8, final_: u8, tone: u8) -> Self {
        Self {
            slots: [initial, medial, final_, tone],
        }
    }

    pub fn get(&self, slot: Slot) -> u8 {
        self.slots[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, value: u8) {
        self.slots[slot.index()] = value;
    }

    /// Store a key mapping, overwriting the slot it targets.
    pub fn apply(&mut self, mapping: KeyMapping) {
        self.set(mapping.slot, mapping.value);
    }

    pub fn initial(&self) -> u8 {
        self.slots[0]
    }

    pub fn medial(&self) -> u8 {
        self.slots[1]
    }

    pub fn final_(&self) -> u8 {
        self.slots[2]
    }

    pub fn tone(&self) -> u8 {
        self.slots[3]
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|&v| v == 0)
    }

    pub fn as_array(&self) -> [u8; 4] {
        self.slots
    }

    /// Clear the last non-empty slot, scanning tone to initial.
    /// Returns the slot that was cleared.
    pub fn clear_last(&mut self) -> Option<Slot> {
        let slot = Slot::ALL
            .iter()
            .rev()
            .copied()
            .find(|s| self.slots[s.index()] != 0)?;
        self.slots[slot.index()] = 0;
        Some(slot)
    }

    pub fn clear(&mut self) {
        self.slots = [0; 4];
    }

    /// Pack the slots into a dictionary key.
    ///
    /// Values wider than their slot are masked so they cannot bleed into the
    /// neighbouring field.
    pub fn to_key(&self) -> u16 {
        if self.initial() == BACK_QUOTE_INITIAL {
            return (u16::from(BACK_QUOTE_INITIAL) << 9) | u16::from(self.medial());
        }
        let mut key = u16::from(self.initial()) & mask(SLOT_WIDTHS[0]);
        for i in 1..4 {
            key = (key << SLOT_WIDTHS[i]) | (u16::from(self.slots[i]) & mask(SLOT_WIDTHS[i]));
        }
        key
    }

    /// Unpack a dictionary key into slots.
    pub fn from_key(key: u16) -> Self {
        let tone = (key & 0x7) as u8;
        let final_ = ((key >> 3) & 0xF) as u8;
        let medial = ((key >> 7) & 0x3) as u8;
        let initial = (key >> 9) as u8;
        Self::new(initial, medial, final_, tone)
    }
}

fn mask(width: u32) -> u16 {
    (1u16 << width) - 1
}

/// Pack slot values into a dictionary key.
pub fn pho2key(slots: &PhoneticSlots) -> u16 {
    slots.to_key()
}

/// Unpack a dictionary key.
pub fn key_to_slots(key: u16) -> PhoneticSlots {
    PhoneticSlots::from_key(key)
}
