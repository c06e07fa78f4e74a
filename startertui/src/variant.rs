//! Variant cursor and resolution against the unlock state

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dex::SaveData;
use crate::species::Species;
use crate::unlock::{CycleFlags, DexUnlockTree};

/// One point in the (shiny, form, gender) space of a species.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
pub struct Variant {
    pub shiny: bool,
    pub form_index: u8,
    pub female: bool,
}

/// A partial variant. `None` keeps whatever the cursor currently holds.
///
/// Also used as the filter for default-entry lookups, where `None` matches
/// any value on that axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VariantRequest {
    pub shiny: Option<bool>,
    pub form_index: Option<u8>,
    pub female: Option<bool>,
}

impl VariantRequest {
    pub const ANY: Self = Self {
        shiny: None,
        form_index: None,
        female: None,
    };

    pub fn exact(variant: Variant) -> Self {
        Self {
            shiny: Some(variant.shiny),
            form_index: Some(variant.form_index),
            female: Some(variant.female),
        }
    }

    pub fn shiny(shiny: bool) -> Self {
        Self {
            shiny: Some(shiny),
            ..Self::ANY
        }
    }

    pub fn form(form_index: u8) -> Self {
        Self {
            form_index: Some(form_index),
            ..Self::ANY
        }
    }

    pub fn female(female: bool) -> Self {
        Self {
            female: Some(female),
            ..Self::ANY
        }
    }

    pub fn apply_to(&self, cursor: &mut Variant) {
        if let Some(shiny) = self.shiny {
            cursor.shiny = shiny;
        }
        if let Some(form_index) = self.form_index {
            cursor.form_index = form_index;
        }
        if let Some(female) = self.female {
            cursor.female = female;
        }
    }

    pub fn matches(&self, variant: Variant) -> bool {
        self.shiny.map_or(true, |shiny| shiny == variant.shiny)
            && self
                .form_index
                .map_or(true, |form_index| form_index == variant.form_index)
            && self.female.map_or(true, |female| female == variant.female)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    pub variant: Variant,
    pub flags: CycleFlags,
}

/// Moves `cursor` according to `request` and returns the variant that can
/// actually be shown.
///
/// An uncaught combination snaps to the species' default unlocked variant
/// (the default matching the request first, then the overall default), and
/// the cursor follows so the cycle flags describe what is on screen.
pub fn resolve(
    save: &impl SaveData,
    species: &Species,
    tree: Option<&DexUnlockTree>,
    cursor: &mut Variant,
    request: VariantRequest,
) -> Resolution {
    request.apply_to(cursor);

    let default_entry = save
        .default_dex_entry(species, request)
        .or_else(|| save.default_dex_entry(species, VariantRequest::ANY));
    let entry = save.dex_entry(species, *cursor);

    if !entry.caught {
        if let Some(default_entry) = default_entry {
            *cursor = default_entry.variant();
        }
    }

    let variant = *cursor;
    let flags = tree
        .map(|tree| CycleFlags::at(tree, species, variant))
        .unwrap_or_default();
    Resolution { variant, flags }
}
