use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assets::LoadTicket;
use crate::cursor::Direction;
use crate::sprite::SpriteData;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,
    UiTerminalResize(u16, u16),
    Tick,

    // Selection input
    Move(Direction),
    Confirm,
    Cancel,
    CycleShiny,
    CycleForm,
    CycleGender,

    // Asset loading
    AssetsDidLoad {
        ticket: LoadTicket,
        species_id: u16,
        sprite: Option<SpriteData>,
    },
    AssetsDidError {
        ticket: LoadTicket,
        error: String,
    },
    CryDidPlay(u16),
    CryDidError(String),

    // Party output
    PartyDidSave(String),
    PartyDidError(String),

    Quit,
}
