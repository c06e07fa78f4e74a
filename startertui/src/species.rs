//! Species reference data and the generation roster shown on the grid

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cursor::GENERATION_COUNT;
use crate::variant::Variant;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Species {
    pub id: u16,
    pub name: String,
    pub generation: u8,
    #[serde(default)]
    pub forms: Vec<String>,
    /// Percentage of males; `None` means genderless.
    #[serde(default)]
    pub male_percent: Option<f32>,
    #[serde(default)]
    pub evolves_from: Option<u16>,
}

impl Species {
    pub fn is_genderless(&self) -> bool {
        self.male_percent.is_none()
    }

    pub fn has_alternate_forms(&self) -> bool {
        self.forms.len() > 1
    }

    /// Number of values on the form axis; formless species still have one.
    pub fn form_count(&self) -> usize {
        self.forms.len().max(1)
    }

    pub fn form_name(&self, form_index: u8) -> Option<&str> {
        self.forms
            .get(form_index as usize)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn display_name(&self) -> String {
        format_name(&self.name).to_uppercase()
    }

    pub fn icon_key(&self, variant: Variant) -> String {
        let mut key = format!("pkmn_icon__{:03}", self.id);
        if let Some(form) = self.form_name(variant.form_index) {
            key.push('-');
            key.push_str(form);
        }
        if variant.female && !self.is_genderless() {
            key.push_str("-f");
        }
        key
    }

    pub fn sprite_key(&self, variant: Variant) -> String {
        let mut key = String::from("pkmn__");
        if variant.shiny {
            key.push_str("shiny__");
        }
        key.push_str(&self.id.to_string());
        if let Some(form) = self.form_name(variant.form_index) {
            key.push('-');
            key.push_str(form);
        }
        if variant.female && !self.is_genderless() {
            key.push_str("-f");
        }
        key
    }
}

/// Base species grouped into the five generations, in dex order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesCatalog {
    generations: Vec<Vec<Species>>,
}

impl SpeciesCatalog {
    /// Keeps only species without a pre-evolution, grouped by generation.
    pub fn from_species(species: impl IntoIterator<Item = Species>) -> Self {
        let mut generations = vec![Vec::new(); GENERATION_COUNT];
        for entry in species {
            if entry.evolves_from.is_some() {
                continue;
            }
            match (entry.generation as usize)
                .checked_sub(1)
                .and_then(|gen| generations.get_mut(gen))
            {
                Some(group) => group.push(entry),
                None => warn!(
                    species = entry.id,
                    generation = entry.generation,
                    "skipping species outside the starter generations"
                ),
            }
        }
        for group in &mut generations {
            group.sort_by_key(|species| species.id);
        }
        Self { generations }
    }

    pub fn generation(&self, generation: usize) -> &[Species] {
        self.generations
            .get(generation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn species_count(&self, generation: usize) -> usize {
        self.generation(generation).len()
    }

    pub fn species_at(&self, generation: usize, index: usize) -> Option<&Species> {
        self.generation(generation).get(index)
    }

    pub fn find(&self, id: u16) -> Option<&Species> {
        self.generations
            .iter()
            .flatten()
            .find(|species| species.id == id)
    }
}

pub fn format_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str();
                    format!("{}{}", first.to_ascii_uppercase(), rest)
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn roman_numeral(generation: usize) -> &'static str {
    match generation {
        0 => "I",
        1 => "II",
        2 => "III",
        3 => "IV",
        4 => "V",
        _ => "?",
    }
}
