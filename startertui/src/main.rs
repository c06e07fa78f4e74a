use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use startertui::action::Action;
use startertui::api::{self, ApiConfig};
use startertui::assets::AssetRequest;
use startertui::audio;
use startertui::data;
use startertui::effect::Effect;
use startertui::reducer::reducer;
use startertui::sprite;
use startertui::state::{AppState, TICK_MS};
use startertui::ui;

const ASSET_TASK: &str = "species_assets";
const SPRITE_MAX_WIDTH: u32 = 28;
const SPRITE_MAX_HEIGHT: u32 = 28;

#[derive(Parser, Debug)]
#[command(name = "startertui")]
#[command(about = "Pick a starting party of three POKéMON")]
struct Args {
    /// RON species list (defaults to the bundled list)
    #[arg(long)]
    species: Option<PathBuf>,

    /// RON unlock records (defaults to <data dir>/startertui/dex.ron, then demo records)
    #[arg(long)]
    dex: Option<PathBuf>,

    /// Where to write the chosen party as JSON
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only use sprites and cries that are already cached
    #[arg(long)]
    offline: bool,

    /// Disable sound cues and cries
    #[arg(long)]
    mute: bool,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        species,
        dex,
        out,
        offline,
        mute,
        debug: debug_args,
    } = Args::parse();

    api::configure(ApiConfig {
        offline,
        cache_dir: None,
    });
    let out = out.unwrap_or_else(data::default_party_path);

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            let catalog = data::load_catalog(species.as_deref())
                .await
                .map_err(io::Error::other)?;
            let dex = data::load_dex(dex.as_deref())
                .await
                .map_err(io::Error::other)?;
            data::check_records(&catalog, &dex);
            Ok::<AppState, io::Error>(AppState::new(catalog, dex).with_muted(mute))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, out).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    out: PathBuf,
) -> io::Result<DebugRunOutput<AppState>> {
    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            |frame, area, state, render_ctx: RenderContext| {
                ui::render(frame, area, state, render_ctx);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit | Action::PartyDidSave(_)),
            move |effect, ctx| handle_effect(effect, ctx, &out),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, out: &Path) {
    match effect {
        Effect::LoadAssets { ticket, request } => {
            // Same key for every load, so a newer load aborts the older task.
            ctx.tasks().spawn(TaskKey::new(ASSET_TASK), async move {
                let species_id = request.species_id;
                match load_sprite(&request).await {
                    Ok(sprite) => Action::AssetsDidLoad {
                        ticket,
                        species_id,
                        sprite,
                    },
                    Err(error) => Action::AssetsDidError { ticket, error },
                }
            });
        }
        Effect::CancelAssets => {
            ctx.tasks().cancel(&TaskKey::new(ASSET_TASK));
        }
        Effect::PlayCry { species_id } => {
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                match api::fetch_bytes(&api::cry_url(species_id)).await {
                    Ok(bytes) => {
                        match tokio::task::spawn_blocking(move || audio::play_ogg(bytes)).await {
                            Ok(Ok(())) => Action::CryDidPlay(species_id),
                            Ok(Err(error)) => Action::CryDidError(error),
                            Err(error) => Action::CryDidError(error.to_string()),
                        }
                    }
                    Err(error) => Action::CryDidError(format!("{species_id}: {error}")),
                }
            });
        }
        Effect::PlaySound(sound) => {
            audio::play_sound(sound);
        }
        Effect::SubmitParty { party } => {
            let out = out.to_path_buf();
            ctx.tasks().spawn(TaskKey::new("submit_party"), async move {
                match data::save_party(&out, &party).await {
                    Ok(()) => {
                        info!(path = %out.display(), members = party.len(), "party saved");
                        Action::PartyDidSave(out.display().to_string())
                    }
                    Err(error) => Action::PartyDidError(error.to_string()),
                }
            });
        }
    }
}

/// Fetches and decodes the preview. Offline misses still count as loaded,
/// just without an image.
async fn load_sprite(request: &AssetRequest) -> Result<Option<sprite::SpriteData>, String> {
    let bytes = match api::fetch_sprite(request).await {
        Ok(bytes) => bytes,
        Err(_) if api::is_offline() => return Ok(None),
        Err(error) => return Err(error),
    };
    sprite::decode_sprite(&bytes, SPRITE_MAX_WIDTH, SPRITE_MAX_HEIGHT)
        .map(Some)
        .map_err(|error| error.to_string())
}
