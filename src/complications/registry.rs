//! Complication slot ids and accepted payload kinds

use super::{PayloadKind, Slot};

pub const BACKGROUND_COMPLICATION_ID: i32 = 0;
pub const RANGE_COMPLICATION_ID: i32 = 1;
pub const TEXT_COMPLICATION_ID: i32 = 2;

/// Ids of every slot, in registration order
pub const COMPLICATION_IDS: [i32; 3] = [
    BACKGROUND_COMPLICATION_ID,
    RANGE_COMPLICATION_ID,
    TEXT_COMPLICATION_ID,
];

const BACKGROUND_KINDS: [PayloadKind; 1] = [PayloadKind::LargeImage];
const RANGE_KINDS: [PayloadKind; 1] = [PayloadKind::RangedValue];
const TEXT_KINDS: [PayloadKind; 2] = [PayloadKind::ShortText, PayloadKind::LongText];

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Background, Slot::Range, Slot::TopText];

    /// Stable id the host uses for this slot
    pub const fn id(self) -> i32 {
        match self {
            Slot::Background => BACKGROUND_COMPLICATION_ID,
            Slot::Range => RANGE_COMPLICATION_ID,
            Slot::TopText => TEXT_COMPLICATION_ID,
        }
    }

    /// Payload kinds a provider for this slot may deliver
    pub const fn supported_kinds(self) -> &'static [PayloadKind] {
        match self {
            Slot::Background => &BACKGROUND_KINDS,
            Slot::Range => &RANGE_KINDS,
            Slot::TopText => &TEXT_KINDS,
        }
    }

    /// Resolve an inbound update id back to its slot
    pub const fn from_id(id: i32) -> Option<Slot> {
        match id {
            BACKGROUND_COMPLICATION_ID => Some(Slot::Background),
            RANGE_COMPLICATION_ID => Some(Slot::Range),
            TEXT_COMPLICATION_ID => Some(Slot::TopText),
            _ => None,
        }
    }

    pub fn accepts(self, kind: PayloadKind) -> bool {
        self.supported_kinds().contains(&kind)
    }
}

/// Id for a slot location
pub const fn slot_id(slot: Slot) -> i32 {
    slot.id()
}

/// Every slot id the face subscribes to
pub const fn slot_ids() -> &'static [i32] {
    &COMPLICATION_IDS
}

/// Payload kinds accepted at a slot location
pub const fn supported_payload_kinds(slot: Slot) -> &'static [PayloadKind] {
    slot.supported_kinds()
}
