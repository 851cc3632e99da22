use std::collections::HashMap;

use iocraft::prelude::*;

use crate::actions::clipboard;
use crate::app::ViewKind;
use crate::color::ColorDepth;
use crate::components::drawer::{
    Drawer, DrawerContent, DrawerState, RenderedDrawer, build_drawer_lines,
};
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::help_overlay::{HelpOverlay, HelpOverlayBuildConfig, RenderedHelpOverlay};
use crate::components::label_chips::LabelWindow;
use crate::components::lines_view::max_scroll;
use crate::components::popover::{Popover, PopoverKind, RenderedPopover};
use crate::components::tab_bar::{RenderedTabBar, Tab, TabBar, TabBarBuildConfig};
use crate::components::table::{
    self, Cell, Column, RenderedTable, Row, ScrollableTable, TableBuildConfig, checkbox,
    compute_column_widths,
};
use crate::components::text_input::{EditOutcome, RenderedTextInput, TextInput, apply_edit_key};
use crate::components::truncate::{clip_lines, truncate};
use crate::config::keybindings::{BuiltinAction, MergedBindings, ViewContext, key_event_to_string};
use crate::config::types::ExportConfig;
use crate::engine::{Command, CommandStatus, CommandTracker, EngineHandle, Event, Request};
use crate::filter::{ConversationFilter, QuickFilter, QuickFilterSet, filter_conversations};
use crate::repository::BotDirectory;
use crate::score::classify;
use crate::selection::SelectionSet;
use crate::theme::ResolvedTheme;
use crate::types::{Bot, Conversation, CsReview};
use crate::views::{
    CHROME_ROWS, default_theme, drain_events, new_event_channel, resolve_command, run_command,
};

const SEEK_STEP_SECS: i64 = 5;

// ---------------------------------------------------------------------------
// Conversation table columns
// ---------------------------------------------------------------------------

fn conversation_columns(all_selected: bool) -> Vec<Column> {
    vec![
        Column::fixed("select", checkbox(all_selected), 4),
        Column::fixed("id", "ID", 10),
        Column::new("bot", "Bot", 0.16),
        Column::fixed("date", "Date", 17),
        Column::fixed("score", "Score", 6).right(),
        Column::new("answer", "QA Answer", 0.46),
        Column::fixed("review", "CS Review", 11),
        Column::fixed("policy", "Policy", 7),
        Column::new("labels", "Labels", 0.22),
    ]
}

struct RowLayout {
    answer_width: usize,
    answer_lines: usize,
    labels_width: usize,
    label_max: usize,
}

fn conversation_to_row(
    conv: &Conversation,
    bot_name: &str,
    selected: bool,
    layout: &RowLayout,
    theme: &ResolvedTheme,
) -> Row {
    let mut row = HashMap::new();
    row.insert(
        "select".to_owned(),
        Cell::colored(checkbox(selected), theme.text_accent),
    );
    row.insert("id".to_owned(), Cell::colored(conv.id.clone(), theme.text_secondary));
    row.insert("bot".to_owned(), Cell::plain(bot_name));
    row.insert("date".to_owned(), Cell::colored(conv.date.clone(), theme.text_faint));
    row.insert(
        "score".to_owned(),
        Cell::bold(conv.score_display(), Some(theme.band_color(classify(conv.score)))),
    );
    let clipped = clip_lines(&conv.qa_answer, layout.answer_width, layout.answer_lines);
    row.insert("answer".to_owned(), Cell::plain(clipped.joined()));
    row.insert(
        "review".to_owned(),
        Cell::colored(
            conv.cs_review.map_or("\u{2014}", CsReview::label),
            theme.review_color(conv.cs_review),
        ),
    );
    row.insert(
        "policy".to_owned(),
        Cell::colored(
            if conv.policy_pass { "Pass" } else { "Fail" },
            theme.policy_color(conv.policy_pass),
        ),
    );
    let labels = LabelWindow::split(&conv.labels, layout.label_max).to_text(false);
    row.insert(
        "labels".to_owned(),
        Cell::colored(truncate(&labels, layout.labels_width), theme.text_accent),
    );
    row
}

/// Ids a bulk action applies to: the checked rows, else the row under the cursor.
fn action_targets(selection: &SelectionSet, current: Option<&Conversation>) -> Vec<String> {
    if selection.is_empty() {
        current.map(|c| vec![c.id.clone()]).unwrap_or_default()
    } else {
        selection.ids()
    }
}

fn update_drawer(drawer: &mut State<Option<DrawerState>>, f: impl FnOnce(&mut DrawerState)) {
    let mut d = drawer.read().clone();
    if let Some(state) = d.as_mut() {
        f(state);
    }
    drawer.set(d);
}

fn copy_status(text: &str, what: &str) -> CommandStatus {
    match clipboard::copy_to_clipboard(text) {
        Ok(()) => CommandStatus::Succeeded(format!("Copied {what}")),
        Err(e) => {
            tracing::warn!("copy failed: {e}");
            CommandStatus::Failed(format!("Copy failed: {e}"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
    Notes,
}

// ---------------------------------------------------------------------------
// ConversationsView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct ConversationsViewProps<'a> {
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub keybindings: Option<&'a MergedBindings>,
    pub color_depth: ColorDepth,
    pub width: u16,
    pub height: u16,
    pub should_exit: Option<State<bool>>,
    pub switch_view: Option<State<bool>>,
    pub switch_view_back: Option<State<bool>>,
    /// Bot the list is scoped to; shared with the gallery.
    pub bot_scope: Option<State<Option<String>>>,
    pub initial_filters: Option<&'a [QuickFilter]>,
    pub initial_search: Option<String>,
    pub export_options: ExportConfig,
    pub table_label_max: usize,
    pub drawer_label_max: usize,
    pub qa_answer_lines: usize,
    pub drawer_width_pct: f64,
    pub is_active: bool,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn ConversationsView<'a>(
    props: &ConversationsViewProps<'a>,
    mut hooks: Hooks,
) -> impl Into<AnyElement<'a>> {
    let theme = props.theme.cloned().unwrap_or_else(default_theme);
    let depth = props.color_depth;
    let should_exit = props.should_exit;
    let switch_view = props.switch_view;
    let switch_view_back = props.switch_view_back;
    let bot_scope = props.bot_scope;
    let export_options = props.export_options;
    let is_active = props.is_active;
    let answer_lines = props.qa_answer_lines.clamp(1, 2);
    let drawer_pct = if props.drawer_width_pct > 0.0 {
        props.drawer_width_pct
    } else {
        0.45
    };

    let mut conversations = hooks.use_state(Vec::<Conversation>::new);
    let mut bots = hooks.use_state(Vec::<Bot>::new);
    let mut loading = hooks.use_state(|| true);
    let mut requested = hooks.use_state(|| false);
    let mut cursor = hooks.use_state(|| 0usize);
    let mut scroll_offset = hooks.use_state(|| 0usize);
    let initial_scope = bot_scope.and_then(|s| s.read().clone());
    let mut shown_scope = hooks.use_state(move || initial_scope);
    let mut input_mode = hooks.use_state(|| InputMode::Normal);
    let initial_search = props.initial_search.clone().unwrap_or_default();
    let mut search_query = hooks.use_state(move || initial_search);
    let initial_quick: QuickFilterSet = props
        .initial_filters
        .unwrap_or(&[])
        .iter()
        .copied()
        .collect();
    let mut quick = hooks.use_state(move || initial_quick);
    let mut selection = hooks.use_state(SelectionSet::new);
    let mut drawer = hooks.use_state(|| Option::<DrawerState>::None);
    let mut popover = hooks.use_state(|| Option::<PopoverKind>::None);
    let mut help_visible = hooks.use_state(|| false);
    let mut tracker = hooks.use_state(CommandTracker::new);
    let mut flash = hooks.use_state(|| Option::<CommandStatus>::None);
    let mut last_error = hooks.use_state(|| Option::<String>::None);

    let event_channel = hooks.use_state(new_event_channel);
    let (event_tx, event_rx_arc) = event_channel.read().clone();
    let engine: Option<EngineHandle> = props.engine.cloned();

    // The table is filtered locally, so the whole list is fetched once.
    if !requested.get()
        && let Some(ref eng) = engine
    {
        eng.send(Request::ListBots {
            reply_tx: event_tx.clone(),
        });
        eng.send(Request::ListConversations {
            filter: ConversationFilter::default(),
            reply_tx: event_tx.clone(),
        });
        requested.set(true);
    }

    // Engine replies.
    {
        let rx_for_poll = event_rx_arc.clone();
        hooks.use_future(async move {
            loop {
                smol::Timer::after(std::time::Duration::from_millis(100)).await;
                for evt in drain_events(&rx_for_poll) {
                    if resolve_command(&mut tracker, &evt) {
                        flash.set(None);
                        continue;
                    }
                    match evt {
                        Event::ConversationsListed { conversations: listed } => {
                            conversations.set(listed);
                            loading.set(false);
                        }
                        Event::BotsListed { bots: listed } => bots.set(listed),
                        Event::DetailFetched {
                            conversation_id,
                            detail,
                        } => {
                            let open_id = drawer.read().as_ref().map(|d| d.conversation_id.clone());
                            if open_id.as_deref() == Some(conversation_id.as_str()) {
                                update_drawer(&mut drawer, |d| d.detail = Some(detail));
                            }
                        }
                        Event::FetchError { context, message } => {
                            tracing::warn!("{context}: {message}");
                            last_error.set(Some(format!("{context}: {message}")));
                            loading.set(false);
                        }
                        _ => {}
                    }
                }
            }
        });
    }

    // Audio playback clock.
    hooks.use_future(async move {
        loop {
            smol::Timer::after(std::time::Duration::from_secs(1)).await;
            if drawer.read().as_ref().is_some_and(|d| d.playing) {
                update_drawer(&mut drawer, DrawerState::tick);
            }
        }
    });

    let scope_id: Option<String> = bot_scope.and_then(|s| s.read().clone());
    let scope_changed = *shown_scope.read() != scope_id;
    if scope_changed {
        shown_scope.set(scope_id.clone());
        cursor.set(0);
        scroll_offset.set(0);
    }
    let (cursor_pos, scroll_pos) = if scope_changed {
        (0, 0)
    } else {
        (cursor.get(), scroll_offset.get())
    };
    let search_q = search_query.read().clone();
    let filter = ConversationFilter {
        query: search_q.clone(),
        quick: quick.read().clone(),
        bot_id: scope_id.clone(),
    };
    let conversations_ref = conversations.read();
    let bots_ref = bots.read();
    let filtered = filter_conversations(&conversations_ref, &*bots_ref, &filter);
    let visible: Vec<Conversation> = filtered
        .iter()
        .map(|&i| conversations_ref[i].clone())
        .collect();
    let total_rows = visible.len();
    let cursor_idx = table::clamp_cursor(cursor_pos, total_rows);

    let current_mode = input_mode.get();
    let has_selection = !selection.read().is_empty();
    let drawer_open = drawer.read().is_some();
    let input_rows: u16 = if current_mode == InputMode::Normal { 0 } else { 2 };
    let bar_rows: u16 = 1 + u16::from(has_selection);
    #[allow(clippy::cast_possible_truncation)]
    let row_height = answer_lines as u16;
    let body_height = props.height.saturating_sub(CHROME_ROWS + input_rows + bar_rows);
    let visible_rows = (body_height / row_height).max(1) as usize;
    let scroll_idx = table::clamp_scroll(scroll_pos, cursor_idx, total_rows, visible_rows);
    let drawer_visible_lines = props
        .height
        .saturating_sub(CHROME_ROWS + input_rows + 2)
        .max(1) as usize;

    // Layout: table on the left, drawer on the right when open.
    let (table_width, drawer_width) = if drawer_open {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let dw = (f64::from(props.width) * drawer_pct).round() as u16;
        (props.width.saturating_sub(dw), dw)
    } else {
        (props.width, 0)
    };
    let table_width = table_width.saturating_sub(2);

    let hint = |action: BuiltinAction, ctx: ViewContext, label: &str| {
        props
            .keybindings
            .and_then(|kb| kb.key_for(action, ctx))
            .map(|k| format!("{k} {label}"))
    };
    let drawer_snapshot = drawer.read().clone();
    let drawer_lines = drawer_snapshot
        .as_ref()
        .and_then(|state| {
            let conv = conversations_ref.iter().find(|c| c.id == state.conversation_id)?;
            let action_hint: Vec<String> = [
                hint(BuiltinAction::PlayPause, ViewContext::Drawer, "play"),
                hint(BuiltinAction::RunEvaluation, ViewContext::Drawer, "run eval"),
                hint(BuiltinAction::CreateTicket, ViewContext::Drawer, "ticket"),
                hint(BuiltinAction::Export, ViewContext::Drawer, "export"),
                hint(BuiltinAction::Approve, ViewContext::Drawer, "approve"),
                hint(BuiltinAction::MarkNeedFix, ViewContext::Drawer, "need fix"),
                hint(BuiltinAction::EditText, ViewContext::Drawer, "notes"),
                hint(BuiltinAction::SaveReview, ViewContext::Drawer, "save"),
            ]
            .into_iter()
            .flatten()
            .collect();
            Some(build_drawer_lines(
                &DrawerContent {
                    conversation: conv,
                    bot_name: bots_ref.bot_name(&conv.bot_id),
                    state,
                    label_max: props.drawer_label_max.max(1),
                    width: usize::from(drawer_width.saturating_sub(4)),
                    action_hint: action_hint.join("  "),
                },
                &theme,
            ))
        })
        .unwrap_or_default();
    let drawer_scroll_max = max_scroll(drawer_lines.len(), drawer_visible_lines);

    let keybindings = props.keybindings.cloned();
    let event_tx_kb = event_tx.clone();
    let engine_kb = engine.clone();
    let visible_kb = visible.clone();
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

                let current = visible_kb.get(cursor_idx);
                let engine = engine_kb.as_ref();
                let event_tx = &event_tx_kb;
                let mut issue = move |command: Command| {
                    flash.set(None);
                    run_command(engine, &mut tracker, command, event_tx);
                };

                // Popover: only closing and copying.
                let open_popover = popover.read().clone();
                if let Some(kind) = open_popover {
                    match code {
                        KeyCode::Char('y') => {
                            if let Some(conv) = current {
                                let status = match kind {
                                    PopoverKind::QaAnswer => {
                                        copy_status(&conv.qa_answer, "QA answer")
                                    }
                                    PopoverKind::Labels => {
                                        copy_status(&conv.labels.join(", "), "labels")
                                    }
                                };
                                flash.set(Some(status));
                            }
                        }
                        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | 'e' | '+') => {
                            popover.set(None);
                        }
                        _ => {}
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
                    InputMode::Notes => {
                        if modifiers.contains(KeyModifiers::CONTROL) {
                            return;
                        }
                        let mut outcome = EditOutcome::Editing;
                        update_drawer(&mut drawer, |d| {
                            outcome = apply_edit_key(&mut d.notes, code, true);
                        });
                        if outcome != EditOutcome::Editing {
                            input_mode.set(InputMode::Normal);
                        }
                    }
                    InputMode::Normal => {
                        let Some(key_str) = key_event_to_string(code, modifiers, kind) else {
                            return;
                        };
                        let Some(kb) = keybindings.as_ref() else {
                            return;
                        };

                        // Drawer keys take over while it is open.
                        let open_drawer = drawer.read().clone();
                        if let Some(state) = open_drawer {
                            let Some(action) = kb.resolve(&key_str, ViewContext::Drawer) else {
                                return;
                            };
                            let open_conv = visible_kb
                                .iter()
                                .find(|c| c.id == state.conversation_id)
                                .or(current);
                            match action {
                                BuiltinAction::Quit => {
                                    if let Some(mut exit) = should_exit {
                                        exit.set(true);
                                    }
                                }
                                BuiltinAction::ToggleHelp => help_visible.set(true),
                                BuiltinAction::CloseDrawer => drawer.set(None),
                                BuiltinAction::MoveDown => update_drawer(&mut drawer, |d| {
                                    d.scroll = (d.scroll + 1).min(drawer_scroll_max);
                                }),
                                BuiltinAction::MoveUp => {
                                    update_drawer(&mut drawer, |d| {
                                        d.scroll = d.scroll.saturating_sub(1);
                                    });
                                }
                                BuiltinAction::PageDown => {
                                    update_drawer(&mut drawer, |d| {
                                        d.scroll = (d.scroll + drawer_visible_lines)
                                            .min(drawer_scroll_max);
                                    });
                                }
                                BuiltinAction::PageUp => update_drawer(&mut drawer, |d| {
                                    d.scroll = d.scroll.saturating_sub(drawer_visible_lines);
                                }),
                                BuiltinAction::First => {
                                    update_drawer(&mut drawer, |d| d.scroll = 0);
                                }
                                BuiltinAction::Last => {
                                    update_drawer(&mut drawer, |d| d.scroll = drawer_scroll_max);
                                }
                                BuiltinAction::PlayPause => {
                                    update_drawer(&mut drawer, DrawerState::toggle_play);
                                }
                                BuiltinAction::SeekBack => {
                                    update_drawer(&mut drawer, |d| d.seek(-SEEK_STEP_SECS));
                                }
                                BuiltinAction::SeekForward => {
                                    update_drawer(&mut drawer, |d| d.seek(SEEK_STEP_SECS));
                                }
                                BuiltinAction::Approve => {
                                    update_drawer(&mut drawer, |d| {
                                        d.set_verdict(CsReview::Approved);
                                    });
                                }
                                BuiltinAction::MarkNeedFix => {
                                    update_drawer(&mut drawer, |d| {
                                        d.set_verdict(CsReview::NeedFix);
                                    });
                                }
                                BuiltinAction::EditText => input_mode.set(InputMode::Notes),
                                BuiltinAction::SaveReview => issue(Command::SaveReview {
                                    conversation_id: state.conversation_id.clone(),
                                    verdict: state.verdict,
                                    notes: state.notes.clone(),
                                }),
                                BuiltinAction::ExpandLabels => {
                                    update_drawer(&mut drawer, |d| {
                                        d.labels_expanded = !d.labels_expanded;
                                    });
                                }
                                BuiltinAction::CopyAnswer => {
                                    if let Some(conv) = open_conv {
                                        flash.set(Some(copy_status(&conv.qa_answer, "QA answer")));
                                    }
                                }
                                BuiltinAction::RunEvaluation => issue(Command::RunEvaluation {
                                    conversation_ids: vec![state.conversation_id.clone()],
                                }),
                                BuiltinAction::CreateTicket => issue(Command::CreateTicket {
                                    conversation_id: state.conversation_id.clone(),
                                }),
                                BuiltinAction::Export => issue(Command::Export {
                                    conversation_ids: vec![state.conversation_id.clone()],
                                    options: export_options,
                                }),
                                _ => {}
                            }
                            return;
                        }

                        let Some(action) = kb.resolve(&key_str, ViewContext::Conversations) else {
                            return;
                        };
                        if let Some((c, s)) = table::navigate(
                            action,
                            cursor_idx,
                            scroll_idx,
                            total_rows,
                            visible_rows,
                        ) {
                            cursor.set(c);
                            scroll_offset.set(s);
                            return;
                        }
                        let mut toggle_quick = move |f: QuickFilter| {
                            let mut q = quick.read().clone();
                            q.toggle(f);
                            quick.set(q);
                            cursor.set(0);
                            scroll_offset.set(0);
                        };
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
                            BuiltinAction::FilterPolicyFail => {
                                toggle_quick(QuickFilter::PolicyFail);
                            }
                            BuiltinAction::FilterScoreLow => toggle_quick(QuickFilter::ScoreLow),
                            BuiltinAction::FilterNeedFix => toggle_quick(QuickFilter::NeedFix),
                            BuiltinAction::ClearBotScope => {
                                if let Some(mut scope) = bot_scope {
                                    scope.set(None);
                                }
                                cursor.set(0);
                                scroll_offset.set(0);
                            }
                            BuiltinAction::ToggleSelect => {
                                if let Some(conv) = current {
                                    let mut sel = selection.read().clone();
                                    sel.toggle(&conv.id);
                                    selection.set(sel);
                                }
                            }
                            BuiltinAction::ToggleSelectAll => {
                                let mut sel = selection.read().clone();
                                sel.toggle_all(visible_kb.iter().map(|c| c.id.as_str()));
                                selection.set(sel);
                            }
                            BuiltinAction::OpenDetail => {
                                if let Some(conv) = current {
                                    drawer.set(Some(DrawerState::open(conv)));
                                    if let Some(eng) = engine {
                                        eng.send(Request::FetchDetail {
                                            conversation_id: conv.id.clone(),
                                            reply_tx: event_tx.clone(),
                                        });
                                    }
                                }
                            }
                            BuiltinAction::ExpandAnswer => {
                                if current.is_some() {
                                    popover.set(Some(PopoverKind::QaAnswer));
                                }
                            }
                            BuiltinAction::ExpandLabels => {
                                if current.is_some_and(|c| !c.labels.is_empty()) {
                                    popover.set(Some(PopoverKind::Labels));
                                }
                            }
                            BuiltinAction::CopyAnswer => {
                                if let Some(conv) = current {
                                    flash.set(Some(copy_status(&conv.qa_answer, "QA answer")));
                                }
                            }
                            BuiltinAction::RunEvaluation => {
                                let ids = action_targets(&selection.read(), current);
                                if !ids.is_empty() {
                                    issue(Command::RunEvaluation { conversation_ids: ids });
                                }
                            }
                            BuiltinAction::Export => {
                                let ids = action_targets(&selection.read(), current);
                                if !ids.is_empty() {
                                    issue(Command::Export {
                                        conversation_ids: ids,
                                        options: export_options,
                                    });
                                }
                            }
                            BuiltinAction::CreateTicket => {
                                if let Some(conv) = current {
                                    issue(Command::CreateTicket {
                                        conversation_id: conv.id.clone(),
                                    });
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

    let selection_ref = selection.read();
    let columns = conversation_columns(selection_ref.all_selected(total_rows));
    let widths = compute_column_widths(&columns, table_width);
    let width_of = |id: &str| {
        columns
            .iter()
            .position(|c| c.id == id)
            .map_or(10, |i| usize::from(widths[i]).saturating_sub(1))
    };
    let layout = RowLayout {
        answer_width: width_of("answer"),
        answer_lines,
        labels_width: width_of("labels"),
        label_max: props.table_label_max.max(1),
    };
    let rows: Vec<Row> = visible
        .iter()
        .map(|conv| {
            conversation_to_row(
                conv,
                bots_ref.bot_name(&conv.bot_id),
                selection_ref.contains(&conv.id),
                &layout,
                &theme,
            )
        })
        .collect();

    let rendered_table = RenderedTable::build(&TableBuildConfig {
        columns: &columns,
        rows: &rows,
        cursor: cursor_idx,
        scroll_offset: scroll_idx,
        visible_rows,
        row_height,
        total_width: table_width,
        depth,
        selected_bg: Some(theme.bg_selected),
        header_color: Some(theme.text_secondary),
        border_color: Some(theme.border_faint),
        empty_message: if loading.get() {
            Some("Loading conversations...")
        } else {
            Some("No conversations found")
        },
    });

    // Quick filter chips, plus the bot scope when set.
    let quick_ref = quick.read();
    let mut chips: Vec<Tab> = QuickFilter::ALL
        .iter()
        .enumerate()
        .map(|(i, f)| Tab::new(format!("{} {}", i + 1, f.label()), quick_ref.is_active(*f)))
        .collect();
    if let Some(id) = &scope_id {
        chips.push(Tab::new(format!("Bot: {}", bots_ref.bot_name(id)), true));
    }
    let rendered_chips = RenderedTabBar::build(&TabBarBuildConfig {
        title: Some("Filters"),
        tabs: &chips,
        depth,
        title_color: Some(theme.text_secondary),
        active_fg: Some(theme.text_inverted),
        active_bg: Some(theme.bg_chip),
        inactive_color: Some(theme.text_faint),
        border_color: None,
        border: false,
    });

    let action_bar = has_selection.then(|| {
        let actions: Vec<String> = [
            hint(BuiltinAction::RunEvaluation, ViewContext::Conversations, "Run evaluation"),
            hint(BuiltinAction::Export, ViewContext::Conversations, "Export"),
            hint(BuiltinAction::ToggleSelectAll, ViewContext::Conversations, "Toggle all"),
        ]
        .into_iter()
        .flatten()
        .collect();
        format!(" {} selected   {}", selection_ref.len(), actions.join("   "))
    });

    let rendered_drawer = drawer_snapshot.as_ref().map(|state| {
        RenderedDrawer::build(
            &format!("Conversation {}", state.conversation_id),
            &drawer_lines,
            state.scroll.min(drawer_scroll_max),
            drawer_visible_lines,
            drawer_width,
            depth,
            &theme,
        )
    });

    let rendered_popover = popover.read().as_ref().and_then(|kind| {
        visible.get(cursor_idx).map(|conv| {
            let text = match kind {
                PopoverKind::QaAnswer => conv.qa_answer.clone(),
                PopoverKind::Labels => conv.labels.join(", "),
            };
            RenderedPopover::build(
                kind.title(),
                &text,
                "y copy  Esc close",
                props.width,
                depth,
                &theme,
            )
        })
    });

    let rendered_text_input = match current_mode {
        InputMode::Search => Some(RenderedTextInput::build(
            "/",
            &search_q,
            depth,
            Some(theme.text_primary),
            Some(theme.text_secondary),
            Some(theme.border_faint),
        )),
        InputMode::Notes => Some(RenderedTextInput::build(
            "Notes (Esc to finish):",
            drawer_snapshot.as_ref().map_or("", |d| d.notes.as_str()),
            depth,
            Some(theme.text_primary),
            Some(theme.text_secondary),
            Some(theme.border_faint),
        )),
        InputMode::Normal => None,
    };

    let all_count = conversations_ref.len();
    let context_text = if let Some(err) = last_error.read().as_ref() {
        format!("Error: {err}")
    } else {
        let pos = if total_rows > 0 { cursor_idx + 1 } else { 0 };
        let mut text = if total_rows == all_count {
            format!("Conversation {pos}/{all_count}")
        } else {
            format!("Conversation {pos}/{total_rows} (filtered from {all_count})")
        };
        if !search_q.is_empty() {
            text.push_str(&format!("  /{search_q}"));
        }
        text
    };
    let tracker_ref = tracker.read();
    let flash_ref = flash.read();
    let status = flash_ref.as_ref().or_else(|| tracker_ref.latest());
    let rendered_footer = RenderedFooter::build(
        ViewKind::Conversations,
        context_text,
        status,
        depth,
        &theme,
    );

    let rendered_help = if help_visible.get() {
        props.keybindings.map(|kb| {
            RenderedHelpOverlay::build(&HelpOverlayBuildConfig {
                bindings: kb,
                context: if drawer_open {
                    ViewContext::Drawer
                } else {
                    ViewContext::Conversations
                },
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
    let bar_fg = theme.text_primary.to_crossterm_color(depth);
    let bar_bg = theme.bg_selected.to_crossterm_color(depth);

    element! {
        View(flex_direction: FlexDirection::Column, width, height) {
            TabBar(tab_bar: rendered_chips)
            #(action_bar.map(|text| element! {
                View(background_color: bar_bg) {
                    Text(content: text, color: bar_fg, weight: Weight::Bold, wrap: TextWrap::NoWrap)
                }
            }))
            View(flex_grow: 1.0, flex_direction: FlexDirection::Row, overflow: Overflow::Hidden) {
                View(flex_grow: 1.0, flex_direction: FlexDirection::Column, padding_left: 1) {
                    ScrollableTable(table: rendered_table)
                }
                Drawer(drawer: rendered_drawer)
            }
            TextInput(input: rendered_text_input)
            Footer(footer: rendered_footer)
            Popover(popover: rendered_popover, width: props.width, height: props.height)
            HelpOverlay(overlay: rendered_help, width: props.width, height: props.height)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockRepository, Repository};

    fn layout() -> RowLayout {
        RowLayout {
            answer_width: 20,
            answer_lines: 2,
            labels_width: 20,
            label_max: 2,
        }
    }

    #[test]
    fn row_clips_answer_but_keeps_source() {
        let repo = MockRepository::embedded().unwrap();
        let conv = repo.conversation("2c81e5a4").unwrap();
        let theme = default_theme();
        let row = conversation_to_row(conv, "Customer Support Bot", false, &layout(), &theme);
        let answer = &row["answer"].text;
        assert!(answer.lines().count() <= 2);
        assert_ne!(answer, &conv.qa_answer);
        assert_eq!(row["labels"].text, "pii policy +1");
        assert_eq!(row["policy"].text, "Fail");
        assert_eq!(row["select"].text, "[ ]");
    }

    #[test]
    fn score_cell_is_colored_by_band() {
        let repo = MockRepository::embedded().unwrap();
        let conv = repo.conversation("2c81e5a4").unwrap();
        let theme = default_theme();
        let row = conversation_to_row(conv, "x", true, &layout(), &theme);
        assert_eq!(row["score"].text, "45");
        assert_eq!(row["score"].color, Some(theme.text_error));
        assert_eq!(row["select"].text, "[x]");
    }

    #[test]
    fn actions_target_selection_before_cursor() {
        let repo = MockRepository::embedded().unwrap();
        let current = repo.conversation("9f7a2b3c");
        let mut sel = SelectionSet::new();
        assert_eq!(action_targets(&sel, current), vec!["9f7a2b3c".to_owned()]);
        sel.toggle("8e93f4c2");
        sel.toggle("2c81e5a4");
        assert_eq!(
            action_targets(&sel, current),
            vec!["8e93f4c2".to_owned(), "2c81e5a4".to_owned()]
        );
        assert!(action_targets(&SelectionSet::new(), None).is_empty());
    }

    #[test]
    fn header_checkbox_reflects_selection() {
        assert_eq!(conversation_columns(true)[0].header, "[x]");
        assert_eq!(conversation_columns(false)[0].header, "[ ]");
    }
}
