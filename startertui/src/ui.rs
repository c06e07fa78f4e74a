use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{block::Title, Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventKind, EventOutcome, RenderContext};
use tui_dispatch_components::centered_rect;

use crate::action::Action;
use crate::controller::{PromptChoice, PROMPT_TEXT};
use crate::cursor::{Direction, NavCursor, GENERATION_COUNT, GRID_COLUMNS};
use crate::roster::PARTY_SIZE;
use crate::species::{format_name, roman_numeral, Species};
use crate::state::AppState;
use crate::variant::Variant;

const BG_BASE: Color = Color::Rgb(24, 36, 26);
const BG_PANEL: Color = Color::Rgb(34, 58, 38);
const BG_PANEL_ALT: Color = Color::Rgb(28, 48, 32);
const TEXT_MAIN: Color = Color::Rgb(228, 236, 214);
const TEXT_DIM: Color = Color::Rgb(172, 186, 160);
const TEXT_LOCKED: Color = Color::Rgb(96, 110, 92);
const ACCENT_GREEN: Color = Color::Rgb(104, 204, 120);
const ACCENT_GOLD: Color = Color::Rgb(222, 196, 120);
const ACCENT_RED: Color = Color::Rgb(220, 96, 96);
const HIGHLIGHT_BG: Color = ACCENT_GREEN;
const HIGHLIGHT_TEXT: Color = Color::Rgb(16, 26, 18);
const BORDER_ACCENT: Color = Color::Rgb(74, 98, 82);

const DETAIL_WIDTH: u16 = 32;

pub struct StarterSelectProps<'a> {
    pub state: &'a AppState,
}

/// The whole selection screen: detail panel, generation list, species grid,
/// party slots and the confirmation modal.
#[derive(Default)]
pub struct StarterSelectScreen;

impl Component<Action> for StarterSelectScreen {
    type Props<'a> = StarterSelectProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        match event {
            EventKind::Key(key) => map_key(*key, props.state),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: StarterSelectProps<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let block = panel_block(" CHOOSE YOUR STARTERS ", BG_PANEL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Length(DETAIL_WIDTH), Constraint::Min(20)])
            .split(inner);
        render_detail(frame, columns[0], state);

        let rows = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Min(7),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(1),
            ])
            .split(columns[1]);

        let grid_columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Length(8), Constraint::Min(10)])
            .split(rows[0]);
        render_generations(frame, grid_columns[0], state);
        render_grid(frame, grid_columns[1], state);
        render_party(frame, rows[1], state);
        render_instructions(frame, rows[2], state);
        render_status(frame, rows[3], state);

        if let Some(prompt) = state.select.prompt() {
            render_prompt(frame, area, prompt.choice);
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, _ctx: RenderContext) {
    StarterSelectScreen.render(frame, area, StarterSelectProps { state });
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    match event {
        EventKind::Resize(width, height) => {
            EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        _ => {
            let action = StarterSelectScreen
                .handle_event(event, StarterSelectProps { state })
                .into_iter()
                .next();
            EventOutcome::from(action)
        }
    }
}

fn map_key(key: KeyEvent, state: &AppState) -> Option<Action> {
    if state.select.is_completed() {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Action::Move(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Action::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Action::Move(Direction::Right))
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('z') | KeyCode::Char('Z') => {
            Some(Action::Confirm)
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(Action::Cancel)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::CycleShiny),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Action::CycleForm),
        KeyCode::Char('g') | KeyCode::Char('G') => Some(Action::CycleGender),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        _ => None,
    }
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("Detail", BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (Some(detail), Some(species)) = (state.select.detail(), state.hovered_species()) else {
        let hint = Paragraph::new("Pick a generation, then move right.")
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        return;
    };

    let layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(inner);

    let name_style = if detail.unlocked {
        Style::default()
            .fg(ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_LOCKED)
    };
    let mut header = vec![
        Line::from(Span::styled(
            format!("No.{:03} {}", species.id, species.display_name()),
            name_style,
        )),
    ];
    if detail.unlocked {
        header.push(variant_line(species, detail.resolved));
    } else {
        header.push(Line::from(Span::styled(
            "Not yet caught",
            Style::default().fg(TEXT_LOCKED),
        )));
    }
    frame.render_widget(
        Paragraph::new(Text::from(header)).alignment(Alignment::Center),
        layout[0],
    );

    let sprite_area = layout[1];
    let preview = state
        .select
        .preview()
        .filter(|preview| preview.species_id == detail.species_id);
    match preview {
        Some(preview) => match preview.sprite.as_ref() {
            Some(sprite) => {
                let rows = sprite.rows().min(sprite_area.height);
                let cols = (sprite.width as u16).min(sprite_area.width);
                let offset_x = sprite_area.x + sprite_area.width.saturating_sub(cols) / 2;
                let offset_y = sprite_area.y + sprite_area.height.saturating_sub(rows) / 2;
                frame.render_widget(
                    Paragraph::new(Text::from(sprite.to_lines())),
                    Rect::new(offset_x, offset_y, cols, rows),
                );
            }
            None => centered_note(frame, sprite_area, &species.sprite_key(preview.variant)),
        },
        None if state.select.assets().pending().is_some() => {
            centered_note(frame, sprite_area, "[Loading...]")
        }
        None if !detail.unlocked => centered_note(frame, sprite_area, "???"),
        None => {}
    }
}

fn variant_line(species: &Species, variant: Variant) -> Line<'static> {
    let mut spans = Vec::new();
    if variant.shiny {
        spans.push(Span::styled(
            "★ Shiny ",
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if species.has_alternate_forms() {
        let form = species
            .form_name(variant.form_index)
            .map(format_name)
            .unwrap_or_else(|| "Normal".to_string());
        spans.push(Span::styled(
            format!("{form} "),
            Style::default().fg(TEXT_MAIN),
        ));
    }
    if !species.is_genderless() {
        let (symbol, color) = if variant.female {
            ("♀", Color::Rgb(232, 120, 160))
        } else {
            ("♂", Color::Rgb(112, 160, 232))
        };
        spans.push(Span::styled(symbol, Style::default().fg(color)));
    }
    Line::from(spans)
}

fn centered_note(frame: &mut Frame, area: Rect, text: &str) {
    let note = Paragraph::new(text.to_string())
        .style(Style::default().fg(TEXT_DIM))
        .alignment(Alignment::Center);
    let y = area.y + area.height / 2;
    frame.render_widget(note, Rect::new(area.x, y, area.width, area.height.min(1)));
}

fn render_generations(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("Gen", BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let nav = state.select.nav();
    let lines: Vec<Line> = (0..GENERATION_COUNT)
        .map(|generation| {
            let label = format!(" {:<4}", roman_numeral(generation));
            match nav {
                NavCursor::GenList {
                    generation: current,
                    ..
                } if current == generation => menu_line(&label, true),
                NavCursor::SpeciesGrid {
                    generation: current,
                    ..
                } if current == generation => Line::from(Span::styled(
                    label,
                    Style::default()
                        .fg(ACCENT_GREEN)
                        .add_modifier(Modifier::BOLD),
                )),
                _ => {
                    let color = if state.catalog.species_count(generation) == 0 {
                        TEXT_LOCKED
                    } else {
                        TEXT_MAIN
                    };
                    Line::from(Span::styled(label, Style::default().fg(color)))
                }
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState) {
    let nav = state.select.nav();
    let generation = nav.generation();
    let title = format!("Generation {}", roman_numeral(generation));
    let block = panel_block(title, BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hovered = nav.species().map(|(_, index)| index);
    let roster = state.select.roster();
    let species = state.catalog.generation(generation);

    let lines: Vec<Line> = species
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(row, chunk)| {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(column, entry)| {
                    let index = row * GRID_COLUMNS + column;
                    let label = format!("{:>4}", format!("{:03}", entry.id));
                    let unlocked = state.is_unlocked(entry);
                    let style = if hovered == Some(index) {
                        Style::default()
                            .fg(HIGHLIGHT_TEXT)
                            .bg(HIGHLIGHT_BG)
                            .add_modifier(Modifier::BOLD)
                    } else if roster.contains(generation, index) {
                        Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
                    } else if unlocked {
                        Style::default().fg(TEXT_MAIN)
                    } else {
                        Style::default().fg(TEXT_LOCKED)
                    };
                    Span::styled(format!("{label} "), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    if lines.is_empty() {
        centered_note(frame, inner, "No POKéMON here");
        return;
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_party(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block("Party", BG_PANEL_ALT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slots = state.select.roster().slots();
    let mut spans = Vec::new();
    for position in 0..PARTY_SIZE {
        let label = match slots.get(position) {
            Some(slot) => {
                let name = state
                    .catalog
                    .find(slot.species_id)
                    .map(Species::display_name)
                    .unwrap_or_else(|| format!("#{}", slot.species_id));
                let star = if slot.variant.shiny { "★" } else { "" };
                Span::styled(
                    format!("{}. {name}{star}   ", position + 1),
                    Style::default().fg(TEXT_MAIN),
                )
            }
            None => Span::styled(
                format!("{}. ---   ", position + 1),
                Style::default().fg(TEXT_DIM),
            ),
        };
        spans.push(label);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_instructions(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = state
        .select
        .instruction_lines()
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(TEXT_DIM))))
        .collect();
    lines.push(Line::from(Span::styled(
        "Q: Quit",
        Style::default().fg(TEXT_DIM),
    )));
    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(flash) = state.flash {
        Line::from(Span::styled(
            flash.reason.to_string(),
            Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(message) = state.message.as_ref() {
        Line::from(Span::styled(message.clone(), Style::default().fg(ACCENT_GOLD)))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_prompt(frame: &mut Frame, area: Rect, choice: PromptChoice) {
    let modal_area = centered_rect(40, 7, area);
    frame.render_widget(Clear, modal_area);
    let block = panel_block(" CONFIRM ", BG_PANEL);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let lines = vec![
        Line::from(Span::styled(
            PROMPT_TEXT,
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        menu_line("  Yes  ", choice == PromptChoice::Yes),
        menu_line("  No   ", choice == PromptChoice::No),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        inner,
    );
}

fn panel_block<'a, T>(title: T, bg: Color) -> Block<'a>
where
    T: Into<Title<'a>>,
{
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .style(Style::default().bg(bg).fg(TEXT_MAIN))
        .border_style(Style::default().fg(BORDER_ACCENT))
}

fn menu_line(label: &str, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(HIGHLIGHT_TEXT)
            .bg(HIGHLIGHT_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    Line::from(Span::styled(label.to_string(), style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesCatalog;
    use crate::dex::DexRecords;
    use crossterm::event::KeyModifiers;
    use tui_dispatch::testing::*;

    fn state() -> AppState {
        AppState::new(SpeciesCatalog::default(), DexRecords::default())
    }

    fn actions_for(event: EventKind, state: &AppState) -> Vec<Action> {
        StarterSelectScreen
            .handle_event(&event, StarterSelectProps { state })
            .into_iter()
            .collect()
    }

    #[test]
    fn wasd_and_arrows_move() {
        let state = state();
        let actions = actions_for(EventKind::Key(key("a")), &state);
        actions.assert_first(Action::Move(Direction::Left));

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        let actions = actions_for(EventKind::Key(up), &state);
        actions.assert_count(1);
        actions.assert_first(Action::Move(Direction::Up));
    }

    #[test]
    fn select_undo_and_cycle_keys() {
        let state = state();
        actions_for(EventKind::Key(key("z")), &state).assert_first(Action::Confirm);
        actions_for(EventKind::Key(key("x")), &state).assert_first(Action::Cancel);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        actions_for(EventKind::Key(esc), &state).assert_first(Action::Cancel);
        actions_for(EventKind::Key(key("r")), &state).assert_first(Action::CycleShiny);
        actions_for(EventKind::Key(key("f")), &state).assert_first(Action::CycleForm);
        actions_for(EventKind::Key(key("g")), &state).assert_first(Action::CycleGender);
    }

    #[test]
    fn unknown_key_is_ignored() {
        let state = state();
        actions_for(EventKind::Key(key("k")), &state).assert_count(0);
    }
}
