use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetRequest, LoadTicket};
use crate::species::Species;
use crate::variant::Variant;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadAssets {
        ticket: LoadTicket,
        request: AssetRequest,
    },
    CancelAssets,
    PlayCry {
        species_id: u16,
    },
    PlaySound(Sound),
    SubmitParty {
        party: Vec<Starter>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Sound {
    Select,
    Error,
    Sparkle,
}

/// A submitted party member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Starter {
    pub species_id: u16,
    pub name: String,
    pub shiny: bool,
    pub form_index: u8,
    pub female: bool,
}

impl Starter {
    pub fn new(species: &Species, variant: Variant) -> Self {
        Self {
            species_id: species.id,
            name: species.name.clone(),
            shiny: variant.shiny,
            form_index: variant.form_index,
            female: variant.female,
        }
    }
}
