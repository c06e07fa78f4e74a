//! Selection flows driven through EffectStoreTestHarness
//!
//! Actions go through the real reducer; async completions are simulated
//! with complete_action the way the runtime would deliver them.

use pretty_assertions::assert_eq;
use startertui::{
    action::Action,
    assets::LoadTicket,
    cursor::Direction,
    dex::{DexEntry, DexRecords},
    effect::{Effect, Sound, Starter},
    error::InvalidAction,
    reducer::reducer,
    species::{Species, SpeciesCatalog},
    sprite::SpriteData,
    state::AppState,
    ui::{StarterSelectProps, StarterSelectScreen},
};
use tui_dispatch::testing::*;
use tui_dispatch::{Component, NumericComponentId};

fn species(id: u16, name: &str) -> Species {
    Species {
        id,
        name: name.into(),
        generation: 1,
        forms: Vec::new(),
        male_percent: Some(87.5),
        evolves_from: None,
    }
}

/// Four caught species in the first generation, plus one uncaught.
fn state() -> AppState {
    let catalog = SpeciesCatalog::from_species([
        species(1, "bulbasaur"),
        species(4, "charmander"),
        species(7, "squirtle"),
        species(10, "caterpie"),
        species(16, "pidgey"),
    ]);
    let mut dex = DexRecords::default();
    for id in [1, 4, 7, 10] {
        dex.record(
            id,
            DexEntry {
                caught: true,
                ..DexEntry::default()
            },
        );
    }
    dex.record(
        1,
        DexEntry {
            caught: true,
            shiny: true,
            ..DexEntry::default()
        },
    );
    AppState::new(catalog, dex)
}

fn load_ticket(effects: &[Effect]) -> LoadTicket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadAssets { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("load effect")
}

fn tiny_sprite() -> SpriteData {
    SpriteData {
        width: 1,
        height: 1,
        pixels: vec![[255, 0, 0, 255]],
    }
}

// ============================================================================
// Picking and confirming
// ============================================================================

#[test]
fn third_pick_opens_prompt_and_yes_submits_once() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_all([
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Move(Direction::Right),
        Action::Confirm,
    ]);
    harness.assert_state(|s| s.select.roster().is_full());
    harness.assert_state(|s| s.select.prompt().is_some());
    harness.drain_effects();

    harness.dispatch_collect(Action::Confirm);
    harness.assert_state(|s| s.select.is_completed());
    harness.assert_state(|s| s.select.prompt().is_none());

    let effects = harness.drain_effects();
    let party = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitParty { party } => Some(party.clone()),
            _ => None,
        })
        .expect("submit effect");
    assert_eq!(
        party.iter().map(|starter| starter.species_id).collect::<Vec<_>>(),
        vec![1, 4, 7]
    );
    assert_eq!(
        party[0],
        Starter {
            species_id: 1,
            name: "bulbasaur".into(),
            shiny: false,
            form_index: 0,
            female: false,
        }
    );

    // Completed screens ignore further input.
    let results = harness.dispatch_all([Action::Confirm, Action::Cancel]);
    assert_eq!(results, vec![false, false]);
    harness.drain_effects().effects_empty();
}

#[test]
fn declining_drops_only_the_last_pick() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_all([
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Move(Direction::Right),
        Action::Confirm,
    ]);
    harness.dispatch_collect(Action::Move(Direction::Down));
    harness.dispatch_collect(Action::Confirm);

    harness.assert_state(|s| s.select.prompt().is_none());
    harness.assert_state(|s| s.select.roster().len() == 2);
    harness.assert_state(|s| !s.select.is_completed());
    harness.assert_state(|s| s.select.roster().contains(0, 1));
    harness.assert_state(|s| !s.select.roster().contains(0, 2));
}

#[test]
fn cancel_on_prompt_declines() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_all([
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Move(Direction::Right),
        Action::Confirm,
        Action::Cancel,
    ]);

    harness.assert_state(|s| s.select.prompt().is_none());
    harness.assert_state(|s| s.select.roster().len() == 2);
}

#[test]
fn duplicate_pick_flashes_and_plays_error() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_all([Action::Move(Direction::Right), Action::Confirm]);
    harness.drain_effects();

    harness.dispatch_collect(Action::Confirm);
    harness.assert_state(|s| s.select.roster().len() == 1);
    harness.assert_state(|s| {
        s.flash.map(|flash| flash.reason) == Some(InvalidAction::DuplicatePick)
    });

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::PlaySound(Sound::Error)));
}

#[test]
fn uncaught_species_cannot_be_picked() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    // Pidgey sits at index 4 and has no records.
    harness.dispatch_all([
        Action::Move(Direction::Right),
        Action::Move(Direction::Right),
        Action::Move(Direction::Right),
        Action::Move(Direction::Right),
        Action::Move(Direction::Right),
    ]);
    harness.assert_state(|s| s.select.detail().is_some_and(|detail| !detail.unlocked));

    harness.dispatch_collect(Action::Confirm);
    harness.assert_state(|s| s.select.roster().is_empty());
    harness.assert_state(|s| {
        s.flash.map(|flash| flash.reason) == Some(InvalidAction::NotUnlocked)
    });
}

#[test]
fn undo_with_empty_party_is_rejected() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_collect(Action::Cancel);
    harness.assert_state(|s| {
        s.flash.map(|flash| flash.reason) == Some(InvalidAction::RosterEmpty)
    });
}

// ============================================================================
// Asset loading
// ============================================================================

#[test]
fn stale_sprite_load_is_discarded() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_collect(Action::Move(Direction::Right));
    let first = load_ticket(&harness.drain_effects());
    harness.dispatch_collect(Action::Move(Direction::Right));
    let second = load_ticket(&harness.drain_effects());
    assert!(second > first);

    harness.complete_action(Action::AssetsDidLoad {
        ticket: first,
        species_id: 1,
        sprite: Some(tiny_sprite()),
    });
    harness.complete_action(Action::AssetsDidLoad {
        ticket: second,
        species_id: 4,
        sprite: Some(tiny_sprite()),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 2);
    assert_eq!(changed, 1, "only the current load applies");
    harness.assert_state(|s| s.select.preview().is_some_and(|p| p.species_id == 4));
    harness.assert_state(|s| s.select.assets().pending().is_none());
}

#[test]
fn leaving_grid_cancels_pending_load() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_collect(Action::Move(Direction::Right));
    let ticket = load_ticket(&harness.drain_effects());
    harness.dispatch_collect(Action::Move(Direction::Left));

    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::CancelAssets));
    harness.assert_state(|s| s.select.detail().is_none());

    harness.complete_action(Action::AssetsDidLoad {
        ticket,
        species_id: 1,
        sprite: None,
    });
    let (changed, _) = harness.process_emitted();
    assert_eq!(changed, 0);
}

#[test]
fn pick_after_load_plays_cry() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_collect(Action::Move(Direction::Right));
    let ticket = load_ticket(&harness.drain_effects());
    harness.complete_action(Action::AssetsDidLoad {
        ticket,
        species_id: 1,
        sprite: Some(tiny_sprite()),
    });
    harness.process_emitted();

    harness.dispatch_collect(Action::Confirm);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::PlayCry { species_id: 1 }));
    effects.effects_none_match(|e| matches!(e, Effect::PlaySound(Sound::Error)));
}

#[test]
fn shiny_cycle_requests_new_sprite_and_sparkles() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_collect(Action::Move(Direction::Right));
    harness.drain_effects();

    harness.dispatch_collect(Action::CycleShiny);
    harness.assert_state(|s| s.select.detail().is_some_and(|d| d.resolved.shiny));

    let effects = harness.drain_effects();
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadAssets { request, .. } if request.variant.shiny),
    );
    effects.effects_none_match(|e| matches!(e, Effect::PlaySound(Sound::Select)));
    effects.effects_none_match(|e| matches!(e, Effect::PlaySound(Sound::Error)));
}

#[test]
fn gender_cycle_without_female_record_is_rejected() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);

    harness.dispatch_collect(Action::Move(Direction::Right));
    harness.drain_effects();

    harness.dispatch_collect(Action::CycleGender);
    harness.assert_state(|s| s.flash.is_some());
    harness.assert_state(|s| s.select.detail().is_some_and(|d| !d.resolved.female));
    harness
        .drain_effects()
        .effects_all_match(|e| matches!(e, Effect::PlaySound(Sound::Error)));
}

// ============================================================================
// Keyboard through the screen component
// ============================================================================

#[test]
fn keys_drive_the_selection() {
    let mut harness = EffectStoreTestHarness::new(state(), reducer);
    let mut screen = StarterSelectScreen;

    let actions = harness.send_keys::<NumericComponentId, _, _>("d z", |state, event| {
        screen
            .handle_event(&event.kind, StarterSelectProps { state })
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(2);
    actions.assert_first(Action::Move(Direction::Right));

    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.select.roster().contains(0, 0));
}
