use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::controller::SelectionController;
use crate::dex::{DexRecords, SaveData};
use crate::error::InvalidAction;
use crate::species::{Species, SpeciesCatalog};
use crate::variant::VariantRequest;

/// How many ticks a rejected-input flash stays on screen.
pub const FLASH_TICKS: u8 = 8;
pub const TICK_MS: u64 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Flash {
    pub reason: InvalidAction,
    pub ticks: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub catalog: SpeciesCatalog,
    pub dex: DexRecords,
    pub select: SelectionController,
    pub message: Option<String>,
    pub flash: Option<Flash>,
    #[serde(default)]
    pub muted: bool,
    pub tick: u64,
}

impl AppState {
    pub fn new(catalog: SpeciesCatalog, dex: DexRecords) -> Self {
        Self {
            terminal_size: (0, 0),
            catalog,
            dex,
            select: SelectionController::default(),
            message: None,
            flash: None,
            muted: false,
            tick: 0,
        }
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Same test the controller uses before a species can be picked.
    pub fn is_unlocked(&self, species: &Species) -> bool {
        self.dex
            .default_dex_entry(species, VariantRequest::ANY)
            .is_some()
    }

    pub fn hovered_species(&self) -> Option<&Species> {
        let (generation, index) = self.select.nav().species()?;
        self.catalog.species_at(generation, index)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let mut sections = vec![
            DebugSection::new("Screen")
                .entry("cursor", ron_string(&self.select.nav()))
                .entry("message", ron_string(&self.message))
                .entry("flash", ron_string(&self.flash))
                .entry("muted", ron_string(&self.muted)),
            DebugSection::new("Party")
                .entry("slots", ron_string(&self.select.roster().slots()))
                .entry("prompt", ron_string(&self.select.prompt()))
                .entry("completed", ron_string(&self.select.is_completed())),
        ];

        if let (Some(detail), Some(species)) = (self.select.detail(), self.hovered_species()) {
            sections.push(
                DebugSection::new("Detail")
                    .entry("species", ron_string(&detail.species_id))
                    .entry("icon", species.icon_key(detail.resolved))
                    .entry("sprite", species.sprite_key(detail.resolved))
                    .entry("unlocked", ron_string(&detail.unlocked))
                    .entry("cursor", ron_string(&detail.cursor))
                    .entry("resolved", ron_string(&detail.resolved))
                    .entry("flags", ron_string(&detail.flags)),
            );
        }

        sections.push(
            DebugSection::new("Assets")
                .entry("pending", ron_string(&self.select.assets().pending()))
                .entry(
                    "preview",
                    ron_string(&self.select.preview().map(|p| (p.species_id, p.variant))),
                ),
        );

        sections
    }
}
