//! The party being assembled, in pick order

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::InvalidAction;
use crate::variant::Variant;

pub const PARTY_SIZE: usize = 3;

/// A pick, frozen at the variant that was on screen when it was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionSlot {
    pub generation: usize,
    pub grid_index: usize,
    pub species_id: u16,
    pub variant: Variant,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionRoster {
    slots: Vec<SelectionSlot>,
}

impl SelectionRoster {
    /// Appends `slot` and returns the new length.
    pub fn push(&mut self, slot: SelectionSlot) -> Result<usize, InvalidAction> {
        if self.is_full() {
            return Err(InvalidAction::RosterFull);
        }
        if self.contains(slot.generation, slot.grid_index) {
            return Err(InvalidAction::DuplicatePick);
        }
        self.slots.push(slot);
        Ok(self.slots.len())
    }

    pub fn pop(&mut self) -> Result<SelectionSlot, InvalidAction> {
        self.slots.pop().ok_or(InvalidAction::RosterEmpty)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= PARTY_SIZE
    }

    /// Dedupe is by grid position; the variant doesn't matter.
    pub fn contains(&self, generation: usize, grid_index: usize) -> bool {
        self.position_of(generation, grid_index).is_some()
    }

    pub fn position_of(&self, generation: usize, grid_index: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.generation == generation && slot.grid_index == grid_index)
    }

    pub fn slots(&self) -> &[SelectionSlot] {
        &self.slots
    }
}
