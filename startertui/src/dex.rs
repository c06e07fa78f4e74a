//! Save-data queries the selection screen needs, plus the in-memory records

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::species::Species;
use crate::unlock::DexUnlockTree;
use crate::variant::{Variant, VariantRequest};

/// A caught (or not) record for one variant of a species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DexEntry {
    pub caught: bool,
    #[serde(default)]
    pub shiny: bool,
    #[serde(default)]
    pub form_index: u8,
    #[serde(default)]
    pub female: bool,
}

impl DexEntry {
    pub fn uncaught(variant: Variant) -> Self {
        Self {
            caught: false,
            shiny: variant.shiny,
            form_index: variant.form_index,
            female: variant.female,
        }
    }

    pub fn variant(&self) -> Variant {
        Variant {
            shiny: self.shiny,
            form_index: self.form_index,
            female: self.female,
        }
    }
}

pub trait SaveData {
    /// First caught entry whose variant matches every defined axis of `request`.
    fn default_dex_entry(&self, species: &Species, request: VariantRequest) -> Option<DexEntry>;

    /// The record for exactly `variant`; uncaught when nothing was recorded.
    fn dex_entry(&self, species: &Species, variant: Variant) -> DexEntry;

    /// `None` when the species has never been recorded at all.
    fn starter_unlock_tree(&self, species: &Species) -> Option<DexUnlockTree>;
}

/// Unlock records keyed by species id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, JsonSchema)]
pub struct DexRecords {
    #[serde(default)]
    entries: BTreeMap<u16, Vec<DexEntry>>,
}

impl DexRecords {
    /// Stores `entry`, replacing any earlier record for the same variant.
    pub fn record(&mut self, species_id: u16, entry: DexEntry) {
        let entries = self.entries.entry(species_id).or_default();
        match entries
            .iter_mut()
            .find(|existing| existing.variant() == entry.variant())
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    pub fn entries(&self, species_id: u16) -> &[DexEntry] {
        self.entries
            .get(&species_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_records(&self, species_id: u16) -> bool {
        !self.entries(species_id).is_empty()
    }

    pub fn species_recorded(&self) -> usize {
        self.recorded_ids().count()
    }

    pub fn recorded_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(id, _)| *id)
    }
}

/// Loaded records go through `record`, so a later entry for the same variant wins.
impl<'de> Deserialize<'de> for DexRecords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawRecords {
            #[serde(default)]
            entries: BTreeMap<u16, Vec<DexEntry>>,
        }

        let raw = RawRecords::deserialize(deserializer)?;
        let mut records = DexRecords::default();
        for (species_id, entries) in raw.entries {
            for entry in entries {
                records.record(species_id, entry);
            }
        }
        Ok(records)
    }
}

/// Records that name a form or gender the species doesn't have are ignored.
fn fits_species(species: &Species, variant: Variant) -> bool {
    (variant.form_index as usize) < species.form_count()
        && !(variant.female && species.is_genderless())
}

impl SaveData for DexRecords {
    fn default_dex_entry(&self, species: &Species, request: VariantRequest) -> Option<DexEntry> {
        self.entries(species.id)
            .iter()
            .filter(|entry| entry.caught)
            .filter(|entry| fits_species(species, entry.variant()))
            .filter(|entry| request.matches(entry.variant()))
            .min_by_key(|entry| entry.variant())
            .copied()
    }

    fn dex_entry(&self, species: &Species, variant: Variant) -> DexEntry {
        self.entries(species.id)
            .iter()
            .find(|entry| entry.variant() == variant && fits_species(species, variant))
            .copied()
            .unwrap_or_else(|| DexEntry::uncaught(variant))
    }

    fn starter_unlock_tree(&self, species: &Species) -> Option<DexUnlockTree> {
        if !self.has_records(species.id) {
            return None;
        }
        Some(DexUnlockTree::build(species, |variant| {
            self.dex_entry(species, variant)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn castform() -> Species {
        Species {
            id: 351,
            name: "castform".into(),
            generation: 3,
            forms: vec!["".into(), "sunny".into(), "rainy".into(), "snowy".into()],
            male_percent: Some(50.0),
            evolves_from: None,
        }
    }

    fn entry(caught: bool, shiny: bool, form_index: u8, female: bool) -> DexEntry {
        DexEntry {
            caught,
            shiny,
            form_index,
            female,
        }
    }

    #[test]
    fn record_replaces_same_variant() {
        let mut dex = DexRecords::default();
        dex.record(351, entry(false, false, 1, false));
        dex.record(351, entry(true, false, 1, false));

        assert_eq!(dex.entries(351), &[entry(true, false, 1, false)]);
    }

    #[test]
    fn default_entry_prefers_lowest_matching_variant() {
        let species = castform();
        let mut dex = DexRecords::default();
        dex.record(351, entry(true, true, 2, false));
        dex.record(351, entry(true, false, 3, true));
        dex.record(351, entry(false, false, 0, false));

        assert_eq!(
            dex.default_dex_entry(&species, VariantRequest::ANY),
            Some(entry(true, false, 3, true))
        );
        assert_eq!(
            dex.default_dex_entry(&species, VariantRequest::shiny(true)),
            Some(entry(true, true, 2, false))
        );
        assert_eq!(dex.default_dex_entry(&species, VariantRequest::form(0)), None);
    }

    #[test]
    fn entries_outside_the_species_are_ignored() {
        let species = castform();
        let mut dex = DexRecords::default();
        dex.record(351, entry(true, false, 9, false));

        assert_eq!(dex.default_dex_entry(&species, VariantRequest::ANY), None);
        let lookup = Variant {
            form_index: 9,
            ..Variant::default()
        };
        assert!(!dex.dex_entry(&species, lookup).caught);
    }

    #[test]
    fn unlock_tree_absent_without_records() {
        let species = castform();
        let mut dex = DexRecords::default();
        assert!(dex.starter_unlock_tree(&species).is_none());

        dex.record(351, entry(true, false, 1, false));
        dex.record(351, entry(true, false, 1, true));
        let tree = dex.starter_unlock_tree(&species).expect("tree");
        assert_eq!(tree.unlocked_count(), 2);
    }

    #[test]
    fn records_load_from_ron() {
        let text = r#"(
            entries: {
                1: [(caught: true), (caught: true, shiny: true)],
            },
        )"#;
        let dex: DexRecords = ron::from_str(text).expect("parse");

        assert_eq!(dex.entries(1).len(), 2);
        assert!(dex.entries(1)[1].shiny);
        assert_eq!(dex.species_recorded(), 1);
    }

    #[test]
    fn duplicate_ron_records_keep_the_later_one() {
        let species = Species {
            id: 1,
            name: "bulbasaur".into(),
            generation: 1,
            forms: Vec::new(),
            male_percent: Some(87.5),
            evolves_from: None,
        };
        let dex: DexRecords =
            ron::from_str("(entries: {1: [(caught: false), (caught: true)]})").expect("parse");

        assert_eq!(dex.entries(1), &[entry(true, false, 0, false)]);
        assert!(dex.dex_entry(&species, Variant::default()).caught);
        let tree = dex.starter_unlock_tree(&species).expect("tree");
        assert_eq!(tree.unlocked_count(), 1);

        let mut cursor = Variant::default();
        let resolution =
            crate::variant::resolve(&dex, &species, Some(&tree), &mut cursor, VariantRequest::ANY);
        assert!(dex.dex_entry(&species, resolution.variant).caught);
    }
}
