//! Selection state machine: cursor, roster, variant detail and the pending
//! asset load, driven one input at a time.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetLoadGuard, AssetRequest, LoadTicket};
use crate::cursor::{CursorMove, Direction, NavCursor};
use crate::dex::SaveData;
use crate::effect::{Effect, Sound, Starter};
use crate::error::InvalidAction;
use crate::roster::{SelectionRoster, SelectionSlot};
use crate::species::{Species, SpeciesCatalog};
use crate::sprite::SpriteData;
use crate::unlock::{CycleFlags, UnlockAxis};
use crate::variant::{self, Variant, VariantRequest};

pub const PROMPT_TEXT: &str = "Begin with these POKéMON?";

/// The hovered species and the variant shown for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesDetail {
    pub generation: usize,
    pub grid_index: usize,
    pub species_id: u16,
    /// At least one variant has been caught.
    pub unlocked: bool,
    pub cursor: Variant,
    pub resolved: Variant,
    pub flags: CycleFlags,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PreviewSprite {
    pub species_id: u16,
    pub variant: Variant,
    /// `None` when the load finished without an image (offline, missing sprite).
    pub sprite: Option<SpriteData>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PromptChoice {
    #[default]
    Yes,
    No,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfirmPrompt {
    pub choice: PromptChoice,
}

impl ConfirmPrompt {
    pub fn toggle(&mut self) {
        self.choice = match self.choice {
            PromptChoice::Yes => PromptChoice::No,
            PromptChoice::No => PromptChoice::Yes,
        };
    }
}

/// Outcome of an accepted input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
    pub changed: bool,
    pub effects: Vec<Effect>,
    pub cue: Option<Sound>,
}

impl Step {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moved(effects: Vec<Effect>) -> Self {
        Self {
            changed: true,
            effects,
            cue: Some(Sound::Select),
        }
    }

    fn with_cue(mut self, cue: Sound) -> Self {
        self.cue = Some(cue);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionController {
    nav: NavCursor,
    roster: SelectionRoster,
    detail: Option<SpeciesDetail>,
    assets: AssetLoadGuard,
    preview: Option<PreviewSprite>,
    prompt: Option<ConfirmPrompt>,
    completed: bool,
}

impl SelectionController {
    pub fn nav(&self) -> NavCursor {
        self.nav
    }

    pub fn roster(&self) -> &SelectionRoster {
        &self.roster
    }

    pub fn detail(&self) -> Option<&SpeciesDetail> {
        self.detail.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewSprite> {
        self.preview.as_ref()
    }

    pub fn prompt(&self) -> Option<&ConfirmPrompt> {
        self.prompt.as_ref()
    }

    pub fn assets(&self) -> &AssetLoadGuard {
        &self.assets
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn navigate(
        &mut self,
        direction: Direction,
        catalog: &SpeciesCatalog,
        save: &impl SaveData,
    ) -> Result<Step, InvalidAction> {
        if self.completed {
            return Ok(Step::idle());
        }
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.toggle();
            return Ok(Step::moved(Vec::new()));
        }

        let effects = match self
            .nav
            .step(direction, |generation| catalog.species_count(generation))?
        {
            CursorMove::Generation(_) => Vec::new(),
            CursorMove::EnterGrid { generation, index }
            | CursorMove::Species { generation, index } => {
                self.focus_species(generation, index, catalog, save)
            }
            CursorMove::LeaveGrid { .. } => self.clear_detail(),
        };
        Ok(Step::moved(effects))
    }

    /// Starts the hovered species on its default unlocked variant.
    fn focus_species(
        &mut self,
        generation: usize,
        index: usize,
        catalog: &SpeciesCatalog,
        save: &impl SaveData,
    ) -> Vec<Effect> {
        let Some(species) = catalog.species_at(generation, index) else {
            return self.clear_detail();
        };
        let default_entry = save.default_dex_entry(species, VariantRequest::ANY);
        let start = default_entry
            .map(|entry| entry.variant())
            .unwrap_or_default();

        self.detail = Some(SpeciesDetail {
            generation,
            grid_index: index,
            species_id: species.id,
            unlocked: default_entry.is_some(),
            cursor: start,
            resolved: start,
            flags: CycleFlags::default(),
        });
        self.apply_variant(species, save, VariantRequest::exact(start))
    }

    /// Re-resolves the detail variant and supersedes the pending load.
    fn apply_variant(
        &mut self,
        species: &Species,
        save: &impl SaveData,
        request: VariantRequest,
    ) -> Vec<Effect> {
        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        let tree = if detail.unlocked {
            save.starter_unlock_tree(species)
        } else {
            None
        };
        let resolution = variant::resolve(save, species, tree.as_ref(), &mut detail.cursor, request);
        detail.resolved = resolution.variant;
        detail.flags = resolution.flags;
        self.preview = None;

        if tree.is_some() {
            let ticket = self.assets.begin(species.id, resolution.variant);
            vec![Effect::LoadAssets {
                ticket,
                request: AssetRequest::for_species(species, resolution.variant),
            }]
        } else {
            self.cancel_pending()
        }
    }

    fn clear_detail(&mut self) -> Vec<Effect> {
        self.detail = None;
        self.preview = None;
        self.cancel_pending()
    }

    fn cancel_pending(&mut self) -> Vec<Effect> {
        match self.assets.cancel() {
            Some(_) => vec![Effect::CancelAssets],
            None => Vec::new(),
        }
    }

    pub fn cycle(
        &mut self,
        axis: UnlockAxis,
        catalog: &SpeciesCatalog,
        save: &impl SaveData,
    ) -> Result<Step, InvalidAction> {
        if self.completed || self.prompt.is_some() {
            return Ok(Step::idle());
        }
        let detail = self
            .detail
            .filter(|detail| detail.unlocked && detail.flags.allows(axis))
            .ok_or(InvalidAction::AxisLocked(axis))?;
        let species = catalog
            .species_at(detail.generation, detail.grid_index)
            .ok_or(InvalidAction::AxisLocked(axis))?;

        let current = detail.resolved;
        let request = match axis {
            UnlockAxis::Shiny => VariantRequest::shiny(!current.shiny),
            UnlockAxis::Form => VariantRequest::form(next_unlocked_form(species, save, current)),
            UnlockAxis::Gender => VariantRequest::female(!current.female),
        };
        let effects = self.apply_variant(species, save, request);

        let shiny = self.detail.is_some_and(|detail| detail.resolved.shiny);
        let cue = if shiny { Sound::Sparkle } else { Sound::Select };
        Ok(Step::moved(effects).with_cue(cue))
    }

    pub fn add_current(&mut self, catalog: &SpeciesCatalog) -> Result<Step, InvalidAction> {
        if self.completed || self.prompt.is_some() {
            return Ok(Step::idle());
        }
        let Some((generation, index)) = self.nav.species() else {
            return Ok(Step::idle());
        };
        if self.roster.is_full() {
            return Err(InvalidAction::RosterFull);
        }
        let detail = self
            .detail
            .filter(|detail| {
                detail.unlocked && detail.generation == generation && detail.grid_index == index
            })
            .ok_or(InvalidAction::NotUnlocked)?;
        if catalog.species_at(generation, index).is_none() {
            return Err(InvalidAction::NotUnlocked);
        }

        self.roster.push(SelectionSlot {
            generation,
            grid_index: index,
            species_id: detail.species_id,
            variant: detail.resolved,
        })?;

        let mut effects = Vec::new();
        if self.assets.is_loaded(detail.species_id) {
            effects.push(Effect::PlayCry {
                species_id: detail.species_id,
            });
        }
        if self.roster.is_full() {
            self.prompt = Some(ConfirmPrompt::default());
        }
        Ok(Step::moved(effects))
    }

    pub fn remove_last(&mut self) -> Result<Step, InvalidAction> {
        if self.completed || self.prompt.is_some() {
            return Ok(Step::idle());
        }
        self.roster.pop()?;
        Ok(Step::moved(Vec::new()))
    }

    /// Select in the grid, or answer the prompt.
    pub fn confirm(&mut self, catalog: &SpeciesCatalog) -> Result<Step, InvalidAction> {
        if self.completed {
            return Ok(Step::idle());
        }
        match self.prompt.map(|prompt| prompt.choice) {
            Some(PromptChoice::Yes) => Ok(self.submit(catalog)),
            Some(PromptChoice::No) => Ok(self.decline()),
            None => self.add_current(catalog),
        }
    }

    pub fn cancel(&mut self) -> Result<Step, InvalidAction> {
        if self.completed {
            return Ok(Step::idle());
        }
        if self.prompt.is_some() {
            return Ok(self.decline());
        }
        self.remove_last()
    }

    /// Closes the prompt and drops only the last pick.
    fn decline(&mut self) -> Step {
        self.prompt = None;
        self.roster.pop().ok();
        Step::moved(Vec::new())
    }

    fn submit(&mut self, catalog: &SpeciesCatalog) -> Step {
        self.prompt = None;
        self.completed = true;
        let party = self
            .roster
            .slots()
            .iter()
            .filter_map(|slot| {
                catalog
                    .find(slot.species_id)
                    .map(|species| Starter::new(species, slot.variant))
            })
            .collect();

        let mut effects = self.cancel_pending();
        effects.push(Effect::SubmitParty { party });
        Step::moved(effects)
    }

    /// Applies a finished load if it is still the current one.
    pub fn complete_assets(&mut self, ticket: LoadTicket, sprite: Option<SpriteData>) -> bool {
        let Some(done) = self.assets.complete(ticket) else {
            return false;
        };
        self.preview = Some(PreviewSprite {
            species_id: done.species_id,
            variant: done.variant,
            sprite,
        });
        true
    }

    pub fn fail_assets(&mut self, ticket: LoadTicket) -> bool {
        self.assets.fail(ticket)
    }

    pub fn instruction_lines(&self) -> Vec<String> {
        let mut lines = vec!["Arrow Keys/WASD: Move".to_string()];
        if self.nav.in_grid() {
            lines.push("Z/Space/Enter: Select".to_string());
        }
        if !self.roster.is_empty() {
            lines.push("X/Backspace/Esc: Undo".to_string());
        }
        if let Some(flags) = self
            .detail
            .filter(|detail| detail.unlocked)
            .map(|detail| detail.flags)
        {
            if flags.shiny {
                lines.push("R: Cycle Shiny".to_string());
            }
            if flags.form {
                lines.push("F: Cycle Form".to_string());
            }
            if flags.gender {
                lines.push("G: Cycle Gender".to_string());
            }
        }
        if lines.len() >= 4 {
            let fourth = lines.remove(3);
            lines[2] = format!("{}   {}", lines[2], fourth);
        }
        lines
    }
}

/// Next form (wrapping) with anything caught under the current shiny value.
fn next_unlocked_form(species: &Species, save: &impl SaveData, current: Variant) -> u8 {
    let forms = species.form_count();
    let tree = save.starter_unlock_tree(species);
    let shiny_tree = tree
        .as_ref()
        .and_then(|tree| tree.child(UnlockAxis::Shiny, UnlockAxis::Shiny.key(current)));

    (1..=forms)
        .map(|offset| ((current.form_index as usize + offset) % forms) as u8)
        .find(|&form| {
            shiny_tree
                .and_then(|node| node.child(UnlockAxis::Form, form))
                .is_some_and(|node| node.unlocked_count() > 0)
        })
        .unwrap_or(current.form_index)
}
