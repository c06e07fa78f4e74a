//! Single in-flight asset request, guarded by monotonically increasing tickets

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::species::Species;
use crate::variant::Variant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct LoadTicket(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PendingLoad {
    pub ticket: LoadTicket,
    pub species_id: u16,
    pub variant: Variant,
}

/// What the effect handler needs to fetch one preview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetRequest {
    pub species_id: u16,
    pub variant: Variant,
    pub sprite_key: String,
    /// Form name as used in remote sprite paths, if this form has one.
    pub form_slug: Option<String>,
}

impl AssetRequest {
    pub fn for_species(species: &Species, variant: Variant) -> Self {
        Self {
            species_id: species.id,
            variant,
            sprite_key: species.sprite_key(variant),
            form_slug: species.form_name(variant.form_index).map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetLoadGuard {
    generation: u64,
    pending: Option<PendingLoad>,
    loaded: BTreeSet<u16>,
}

impl AssetLoadGuard {
    /// Issues a fresh ticket, superseding whatever was pending.
    pub fn begin(&mut self, species_id: u16, variant: Variant) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        if let Some(previous) = self.pending.replace(PendingLoad {
            ticket,
            species_id,
            variant,
        }) {
            debug!(ticket = previous.ticket.0, "superseded asset load");
        }
        ticket
    }

    pub fn cancel(&mut self) -> Option<PendingLoad> {
        self.pending.take()
    }

    /// Accepts a completion only for the current ticket.
    pub fn complete(&mut self, ticket: LoadTicket) -> Option<PendingLoad> {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale asset load");
            return None;
        }
        let pending = self.pending.take()?;
        self.loaded.insert(pending.species_id);
        Some(pending)
    }

    /// Clears the pending slot if `ticket` is current. The species is not
    /// marked loaded.
    pub fn fail(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale asset failure");
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.ticket == ticket)
    }

    pub fn is_loaded(&self, species_id: u16) -> bool {
        self.loaded.contains(&species_id)
    }

    pub fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }
}
