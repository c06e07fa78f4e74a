use tracing::debug;
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::controller::{SelectionController, Step};
use crate::effect::{Effect, Sound};
use crate::error::InvalidAction;
use crate::state::{AppState, Flash, FLASH_TICKS};
use crate::unlock::UnlockAxis;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.select = SelectionController::default();
            state.flash = None;
            state.message = None;
            DispatchResult::changed()
        }
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        Action::Tick => tick(state),

        Action::Move(direction) => {
            let AppState {
                catalog,
                dex,
                select,
                ..
            } = state;
            let result = select.navigate(direction, catalog, dex);
            settle(state, result)
        }
        Action::Confirm => {
            let result = state.select.confirm(&state.catalog);
            settle(state, result)
        }
        Action::Cancel => {
            let result = state.select.cancel();
            settle(state, result)
        }
        Action::CycleShiny => cycle(state, UnlockAxis::Shiny),
        Action::CycleForm => cycle(state, UnlockAxis::Form),
        Action::CycleGender => cycle(state, UnlockAxis::Gender),

        Action::AssetsDidLoad {
            ticket,
            species_id,
            sprite,
        } => {
            if state.select.complete_assets(ticket, sprite) {
                debug!(species = species_id, ticket = ticket.0, "preview ready");
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        Action::AssetsDidError { ticket, error } => {
            if state.select.fail_assets(ticket) {
                state.message = Some(format!("Preview error: {}", error));
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        Action::CryDidPlay(_) => DispatchResult::unchanged(),
        Action::CryDidError(error) => {
            debug!(%error, "cry playback failed");
            DispatchResult::unchanged()
        }
        Action::PartyDidSave(path) => {
            state.message = Some(format!("Party saved to {}", path));
            DispatchResult::changed()
        }
        Action::PartyDidError(error) => {
            state.message = Some(format!("Save failed: {}", error));
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn cycle(state: &mut AppState, axis: UnlockAxis) -> DispatchResult<Effect> {
    let AppState {
        catalog,
        dex,
        select,
        ..
    } = state;
    let result = select.cycle(axis, catalog, dex);
    settle(state, result)
}

/// Turns a controller outcome into effects plus the matching audio cue.
fn settle(state: &mut AppState, result: Result<Step, InvalidAction>) -> DispatchResult<Effect> {
    match result {
        Ok(step) if !step.changed => DispatchResult::unchanged(),
        Ok(Step {
            mut effects, cue, ..
        }) => {
            state.flash = None;
            if state.muted {
                effects.retain(|effect| !matches!(effect, Effect::PlayCry { .. }));
            } else {
                effects.extend(cue.map(Effect::PlaySound));
            }
            DispatchResult::changed_with_many(effects)
        }
        Err(reason) => {
            debug!(%reason, "input rejected");
            state.flash = Some(Flash {
                reason,
                ticks: FLASH_TICKS,
            });
            if state.muted {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with(Effect::PlaySound(Sound::Error))
            }
        }
    }
}

fn tick(state: &mut AppState) -> DispatchResult<Effect> {
    state.tick = state.tick.wrapping_add(1);
    match state.flash.as_mut() {
        Some(flash) if flash.ticks > 1 => {
            flash.ticks -= 1;
            DispatchResult::unchanged()
        }
        Some(_) => {
            state.flash = None;
            DispatchResult::changed()
        }
        None => DispatchResult::unchanged(),
    }
}
