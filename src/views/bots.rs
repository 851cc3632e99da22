use std::collections::HashMap;

use iocraft::prelude::*;

use crate::app::ViewKind;
use crate::color::ColorDepth;
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::help_overlay::{HelpOverlay, HelpOverlayBuildConfig, RenderedHelpOverlay};
use crate::components::table::{
    self, Cell, Column, RenderedTable, Row, ScrollableTable, TableBuildConfig,
};
use crate::components::text_input::{EditOutcome, RenderedTextInput, TextInput, apply_edit_key};
use crate::config::keybindings::{BuiltinAction, MergedBindings, ViewContext, key_event_to_string};
use crate::engine::{Command, CommandTracker, EngineHandle, Event, Request};
use crate::filter::filter_bots;
use crate::score::classify;
use crate::theme::ResolvedTheme;
use crate::types::Bot;
use crate::views::{
    CHROME_ROWS, default_theme, drain_events, new_event_channel, resolve_command, run_command,
};

// ---------------------------------------------------------------------------
// Bot gallery columns
// ---------------------------------------------------------------------------

fn bot_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Bot", 0.24),
        Column::new("id", "ID", 0.12),
        Column::fixed("status", "Status", 10),
        Column::fixed("pass_rate", "Pass Rate", 11).right(),
        Column::fixed("convs", "Conversations", 15).right(),
        Column::fixed("last_qa", "Last QA", 12),
        Column::new("channel", "Channel", 0.12),
        Column::new("team", "Team", 0.14),
        Column::new("tags", "Tags", 0.20),
    ]
}

fn bot_to_row(bot: &Bot, theme: &ResolvedTheme) -> Row {
    let mut row = HashMap::new();
    row.insert("name".to_owned(), Cell::bold(bot.name.clone(), Some(theme.text_primary)));
    row.insert("id".to_owned(), Cell::colored(bot.id.clone(), theme.text_faint));
    row.insert(
        "status".to_owned(),
        Cell::colored(bot.status.as_str(), theme.status_color(bot.status)),
    );
    row.insert(
        "pass_rate".to_owned(),
        Cell::colored(bot.pass_rate_display(), theme.band_color(classify(bot.pass_rate))),
    );
    row.insert("convs".to_owned(), Cell::plain(bot.conv_count_display()));
    row.insert(
        "last_qa".to_owned(),
        Cell::colored(bot.last_qa_display(), theme.text_secondary),
    );
    row.insert("channel".to_owned(), Cell::plain(bot.channel.clone()));
    row.insert("team".to_owned(), Cell::plain(bot.team.clone()));
    row.insert(
        "tags".to_owned(),
        Cell::colored(bot.tags.join(", "), theme.text_accent),
    );
    row
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
}

// ---------------------------------------------------------------------------
// BotsView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct BotsViewProps<'a> {
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub keybindings: Option<&'a MergedBindings>,
    pub color_depth: ColorDepth,
    pub width: u16,
    pub height: u16,
    pub should_exit: Option<State<bool>>,
    pub switch_view: Option<State<bool>>,
    pub switch_view_back: Option<State<bool>>,
    /// Set to a bot id to open the conversation list scoped to it.
    pub open_conversations: Option<State<Option<String>>>,
    /// Search text given on the command line.
    pub initial_search: Option<String>,
    pub is_active: bool,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn BotsView<'a>(props: &BotsViewProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let theme = props.theme.cloned().unwrap_or_else(default_theme);
    let depth = props.color_depth;
    let should_exit = props.should_exit;
    let switch_view = props.switch_view;
    let switch_view_back = props.switch_view_back;
    let open_conversations = props.open_conversations;
    let is_active = props.is_active;

    let mut bots = hooks.use_state(Vec::<Bot>::new);
    let mut loading = hooks.use_state(|| true);
    let mut load_error = hooks.use_state(|| Option::<String>::None);
    let mut requested = hooks.use_state(|| false);
    let mut cursor = hooks.use_state(|| 0usize);
    let mut scroll_offset = hooks.use_state(|| 0usize);
    let mut input_mode = hooks.use_state(|| InputMode::Normal);
    let initial_search = props.initial_search.clone().unwrap_or_default();
    let mut search_query = hooks.use_state(move || initial_search);
    let mut help_visible = hooks.use_state(|| false);
    let mut tracker = hooks.use_state(CommandTracker::new);

    let event_channel = hooks.use_state(new_event_channel);
    let (event_tx, event_rx_arc) = event_channel.read().clone();
    let engine: Option<EngineHandle> = props.engine.cloned();

    if !requested.get()
        && let Some(ref eng) = engine
    {
        eng.send(Request::ListBots {
            reply_tx: event_tx.clone(),
        });
        requested.set(true);
    }

    {
        let rx_for_poll = event_rx_arc.clone();
        hooks.use_future(async move {
            loop {
                smol::Timer::after(std::time::Duration::from_millis(100)).await;
                for evt in drain_events(&rx_for_poll) {
                    if resolve_command(&mut tracker, &evt) {
                        continue;
                    }
                    match evt {
                        Event::BotsListed { bots: listed } => {
                            bots.set(listed);
                            loading.set(false);
                        }
                        Event::FetchError { context, message } => {
                            load_error.set(Some(format!("{context}: {message}")));
                            loading.set(false);
                        }
                        _ => {}
                    }
                }
            }
        });
    }

    let search_q = search_query.read().clone();
    let bots_ref = bots.read();
    let filtered = filter_bots(&bots_ref, &search_q);
    let visible_ids: Vec<String> = filtered.iter().map(|&i| bots_ref[i].id.clone()).collect();
    let total_rows = visible_ids.len();
    let current_mode = input_mode.get();
    let input_rows: u16 = if current_mode == InputMode::Search { 2 } else { 0 };
    let visible_rows = props.height.saturating_sub(CHROME_ROWS + input_rows).max(1) as usize;

    let keybindings = props.keybindings.cloned();
    let event_tx_kb = event_tx.clone();
    let engine_kb = engine.clone();
    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                if !is_active {
                    return;
                }
                if help_visible.get() {
                    if matches!(code, KeyCode::Char('?') | KeyCode::Esc) {
                        help_visible.set(false);
                    }
                    return;
                }

                match input_mode.get() {
                    InputMode::Search => {
                        if modifiers.contains(KeyModifiers::CONTROL) {
                            return;
                        }
                        let mut q = search_query.read().clone();
                        match apply_edit_key(&mut q, code, false) {
                            EditOutcome::Done => {
                                input_mode.set(InputMode::Normal);
                                q.clear();
                            }
                            EditOutcome::Submit => input_mode.set(InputMode::Normal),
                            EditOutcome::Editing => {}
                        }
                        search_query.set(q);
                        cursor.set(0);
                        scroll_offset.set(0);
                    }
                    InputMode::Normal => {
                        let Some(key_str) = key_event_to_string(code, modifiers, kind) else {
                            return;
                        };
                        let Some(action) = keybindings
                            .as_ref()
                            .and_then(|kb| kb.resolve(&key_str, ViewContext::Bots))
                        else {
                            return;
                        };
                        if let Some((c, s)) = table::navigate(
                            action,
                            cursor.get(),
                            scroll_offset.get(),
                            total_rows,
                            visible_rows,
                        ) {
                            cursor.set(c);
                            scroll_offset.set(s);
                            return;
                        }
                        let current_id = visible_ids.get(cursor.get()).cloned();
                        match action {
                            BuiltinAction::Quit => {
                                if let Some(mut exit) = should_exit {
                                    exit.set(true);
                                }
                            }
                            BuiltinAction::SwitchView => {
                                if let Some(mut sv) = switch_view {
                                    sv.set(true);
                                }
                            }
                            BuiltinAction::SwitchViewBack => {
                                if let Some(mut sv) = switch_view_back {
                                    sv.set(true);
                                }
                            }
                            BuiltinAction::ToggleHelp => help_visible.set(true),
                            BuiltinAction::Search => input_mode.set(InputMode::Search),
                            BuiltinAction::ViewConversations => {
                                if let Some(id) = current_id
                                    && let Some(mut open) = open_conversations
                                {
                                    open.set(Some(id));
                                }
                            }
                            BuiltinAction::RunEvaluation => {
                                if let Some(bot_id) = current_id {
                                    run_command(
                                        engine_kb.as_ref(),
                                        &mut tracker,
                                        Command::EvaluateBot { bot_id },
                                        &event_tx_kb,
                                    );
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
    });

    if !is_active {
        return element! {
            View(flex_direction: FlexDirection::Column)
        }
        .into_any();
    }

    let cursor_idx = table::clamp_cursor(cursor.get(), total_rows);
    let rows: Vec<Row> = filtered
        .iter()
        .map(|&i| bot_to_row(&bots_ref[i], &theme))
        .collect();
    let columns = bot_columns();
    let rendered_table = RenderedTable::build(&TableBuildConfig {
        columns: &columns,
        rows: &rows,
        cursor: cursor_idx,
        scroll_offset: scroll_offset.get(),
        visible_rows,
        row_height: 1,
        total_width: props.width.saturating_sub(2),
        depth,
        selected_bg: Some(theme.bg_selected),
        header_color: Some(theme.text_secondary),
        border_color: Some(theme.border_faint),
        empty_message: if loading.get() {
            Some("Loading bots...")
        } else {
            Some("No bots found")
        },
    });

    let rendered_text_input = (current_mode == InputMode::Search).then(|| {
        RenderedTextInput::build(
            "/",
            &search_q,
            depth,
            Some(theme.text_primary),
            Some(theme.text_secondary),
            Some(theme.border_faint),
        )
    });

    let all_count = bots_ref.len();
    let context_text = if let Some(err) = load_error.read().as_ref() {
        format!("Error: {err}")
    } else {
        let pos = if total_rows > 0 { cursor_idx + 1 } else { 0 };
        if search_q.is_empty() {
            format!("Bot {pos}/{all_count}")
        } else {
            format!("Bot {pos}/{total_rows} (filtered from {all_count})  /{search_q}")
        }
    };
    let tracker_ref = tracker.read();
    let rendered_footer = RenderedFooter::build(
        ViewKind::Bots,
        context_text,
        tracker_ref.latest(),
        depth,
        &theme,
    );

    let rendered_help = if help_visible.get() {
        props.keybindings.map(|kb| {
            RenderedHelpOverlay::build(&HelpOverlayBuildConfig {
                bindings: kb,
                context: ViewContext::Bots,
                depth,
                title_color: Some(theme.text_primary),
                key_color: Some(theme.text_success),
                desc_color: Some(theme.text_secondary),
                border_color: Some(theme.border_primary),
                bg_color: None,
            })
        })
    } else {
        None
    };

    let width = u32::from(props.width);
    let height = u32::from(props.height);

    element! {
        View(flex_direction: FlexDirection::Column, width, height) {
            View(
                flex_grow: 1.0,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::Hidden,
                padding_left: 1,
            ) {
                ScrollableTable(table: rendered_table)
            }
            TextInput(input: rendered_text_input)
            Footer(footer: rendered_footer)
            HelpOverlay(overlay: rendered_help, width: props.width, height: props.height)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::repository::{MockRepository, Repository};

    #[test]
    fn pass_rate_cell_uses_score_bands() {
        let repo = MockRepository::embedded().unwrap();
        let theme = default_theme();
        let support = repo.bot("bot_123").unwrap();
        let row = bot_to_row(support, &theme);
        assert_eq!(row["pass_rate"].text, "78%");
        assert_eq!(row["pass_rate"].color, Some(theme.text_warning));
    }

    #[test]
    fn never_evaluated_bot_shows_placeholders() {
        let repo = MockRepository::embedded().unwrap();
        let theme = default_theme();
        let onboarding = repo.bot("bot_789").unwrap();
        let row = bot_to_row(onboarding, &theme);
        assert_eq!(row["pass_rate"].text, "n/a");
        assert_eq!(row["last_qa"].text, "\u{2014}");
        let faint: Option<Color> = Some(theme.text_faint);
        assert_eq!(row["pass_rate"].color, faint);
    }

    #[test]
    fn every_column_has_a_cell() {
        let repo = MockRepository::embedded().unwrap();
        let theme = default_theme();
        let row = bot_to_row(&repo.list_bots()[0], &theme);
        for col in bot_columns() {
            assert!(row.contains_key(&col.id), "missing cell for {}", col.id);
        }
    }
}
