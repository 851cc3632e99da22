use std::collections::HashMap;

use iocraft::prelude::*;

use crate::app::ViewKind;
use crate::color::ColorDepth;
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::help_overlay::{HelpOverlay, HelpOverlayBuildConfig, RenderedHelpOverlay};
use crate::components::lines_view::{LinesView, RenderedLines, StyledLine, StyledSpan};
use crate::components::table::{
    Cell, Column, RenderedTable, Row, ScrollableTable, TableBuildConfig, checkbox,
};
use crate::config::keybindings::{BuiltinAction, MergedBindings, ViewContext, key_event_to_string};
use crate::config::types::{AccountConfig, ExportConfig, RolePermissions};
use crate::engine::{Command, CommandTracker, EngineHandle};
use crate::prompt::LAST_UPDATED;
use crate::theme::ResolvedTheme;
use crate::views::{default_theme, drain_events, new_event_channel, resolve_command, run_command};

const EXPORT_OPTION_COUNT: usize = 3;

/// `(label, enabled)` for each default export switch, in display order.
fn export_switches(options: &ExportConfig) -> [(&'static str, bool); EXPORT_OPTION_COUNT] {
    [
        ("Include timestamps", options.include_timestamps),
        ("Include labels", options.include_labels),
        ("Include QA answers", options.include_qa_answers),
    ]
}

fn toggle_export(options: &mut ExportConfig, index: usize) {
    match index {
        0 => options.include_timestamps = !options.include_timestamps,
        1 => options.include_labels = !options.include_labels,
        2 => options.include_qa_answers = !options.include_qa_answers,
        _ => {}
    }
}

fn sheets_lines(
    account: Option<&str>,
    options: &ExportConfig,
    cursor: usize,
    disconnect_key: Option<&str>,
    theme: &ResolvedTheme,
) -> Vec<StyledLine> {
    let mut lines = vec![StyledLine::single(StyledSpan::bold(
        "Google Sheets Integration",
        theme.text_primary,
    ))];
    let mut account_line = match account {
        Some(email) => StyledLine::field(
            "Connected account",
            email,
            theme.text_secondary,
            theme.text_success,
        ),
        None => StyledLine::field(
            "Connected account",
            "not connected",
            theme.text_secondary,
            theme.text_faint,
        ),
    };
    if account.is_some()
        && let Some(key) = disconnect_key
    {
        account_line.push(StyledSpan::text(format!("   {key} Disconnect"), theme.text_faint));
    }
    lines.push(account_line);
    lines.push(StyledLine::blank());
    lines.push(StyledLine::single(StyledSpan::text(
        "Default export options",
        theme.text_secondary,
    )));
    for (i, (label, enabled)) in export_switches(options).into_iter().enumerate() {
        let marker = if i == cursor { "\u{25b8} " } else { "  " };
        let fg = if enabled {
            theme.text_success
        } else {
            theme.text_faint
        };
        lines.push(StyledLine::from_spans(vec![
            StyledSpan::text(marker, theme.text_accent),
            StyledSpan::text(format!("{} ", checkbox(enabled)), fg),
            StyledSpan::plain(label),
        ]));
    }
    lines
}

fn history_lines(history_key: Option<&str>, theme: &ResolvedTheme) -> Vec<StyledLine> {
    let mut current = StyledLine::field(
        "Current",
        "EVAL_PROMPT_v1",
        theme.text_secondary,
        theme.text_primary,
    );
    current.push(StyledSpan::text(format!("  updated {LAST_UPDATED}"), theme.text_faint));
    let mut lines = vec![
        StyledLine::single(StyledSpan::bold("Version History", theme.text_primary)),
        current,
    ];
    if let Some(key) = history_key {
        lines.push(StyledLine::single(StyledSpan::text(
            format!("{key} View full history"),
            theme.text_faint,
        )));
    }
    lines
}

fn permission_mark(allowed: bool) -> &'static str {
    if allowed { "\u{2713}" } else { "\u{2717}" }
}

fn permission_columns() -> Vec<Column> {
    vec![
        Column::new("role", "Role", 0.4),
        Column::new("edit_rules", "Edit Rules", 0.2),
        Column::new("run_eval", "Run Eval", 0.2),
        Column::new("export", "Export", 0.2),
    ]
}

fn permission_row(perm: &RolePermissions, theme: &ResolvedTheme) -> Row {
    let flag = |allowed: bool| {
        Cell::colored(
            permission_mark(allowed),
            if allowed {
                theme.text_success
            } else {
                theme.text_error
            },
        )
    };
    let mut row = HashMap::new();
    row.insert("role".to_owned(), Cell::bold(perm.role.clone(), Some(theme.text_primary)));
    row.insert("edit_rules".to_owned(), flag(perm.edit_rules));
    row.insert("run_eval".to_owned(), flag(perm.run_eval));
    row.insert("export".to_owned(), flag(perm.export));
    row
}

// ---------------------------------------------------------------------------
// SettingsView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct SettingsViewProps<'a> {
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub keybindings: Option<&'a MergedBindings>,
    pub color_depth: ColorDepth,
    pub width: u16,
    pub height: u16,
    pub should_exit: Option<State<bool>>,
    pub switch_view: Option<State<bool>>,
    pub switch_view_back: Option<State<bool>>,
    pub account: Option<&'a AccountConfig>,
    pub permissions: Vec<RolePermissions>,
    /// Session export options, shared with the conversation list.
    pub export_options: Option<State<ExportConfig>>,
    pub is_active: bool,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn SettingsView<'a>(
    props: &SettingsViewProps<'a>,
    mut hooks: Hooks,
) -> impl Into<AnyElement<'a>> {
    let theme = props.theme.cloned().unwrap_or_else(default_theme);
    let depth = props.color_depth;
    let should_exit = props.should_exit;
    let switch_view = props.switch_view;
    let switch_view_back = props.switch_view_back;
    let export_options = props.export_options;
    let is_active = props.is_active;
    let account: Option<String> = props.account.and_then(|a| a.sheets_account.clone());

    let mut cursor = hooks.use_state(|| 0usize);
    let mut help_visible = hooks.use_state(|| false);
    let mut tracker = hooks.use_state(CommandTracker::new);

    let event_channel = hooks.use_state(new_event_channel);
    let (event_tx, event_rx_arc) = event_channel.read().clone();
    let engine: Option<EngineHandle> = props.engine.cloned();

    {
        let rx_for_poll = event_rx_arc.clone();
        hooks.use_future(async move {
            loop {
                smol::Timer::after(std::time::Duration::from_millis(100)).await;
                for evt in drain_events(&rx_for_poll) {
                    resolve_command(&mut tracker, &evt);
                }
            }
        });
    }

    let keybindings = props.keybindings.cloned();
    let account_kb = account.clone();
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
                let Some(key_str) = key_event_to_string(code, modifiers, kind) else {
                    return;
                };
                let Some(action) = keybindings
                    .as_ref()
                    .and_then(|kb| kb.resolve(&key_str, ViewContext::Settings))
                else {
                    return;
                };
                let mut issue = |command: Command| {
                    run_command(engine.as_ref(), &mut tracker, command, &event_tx);
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
                    BuiltinAction::MoveDown => {
                        cursor.set((cursor.get() + 1).min(EXPORT_OPTION_COUNT - 1));
                    }
                    BuiltinAction::MoveUp => cursor.set(cursor.get().saturating_sub(1)),
                    BuiltinAction::First => cursor.set(0),
                    BuiltinAction::Last => cursor.set(EXPORT_OPTION_COUNT - 1),
                    BuiltinAction::ToggleItem => {
                        if let Some(mut shared) = export_options {
                            let mut options = shared.get();
                            toggle_export(&mut options, cursor.get());
                            tracing::debug!(?options, "export options changed");
                            shared.set(options);
                        }
                    }
                    BuiltinAction::Disconnect => {
                        if let Some(account) = account_kb.clone() {
                            issue(Command::DisconnectSheets { account });
                        }
                    }
                    BuiltinAction::ViewHistory => issue(Command::ViewHistory),
                    _ => {}
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

    let key_for = |action: BuiltinAction| {
        props
            .keybindings
            .and_then(|kb| kb.key_for(action, ViewContext::Settings))
    };
    let options = export_options.map(|s| s.get()).unwrap_or_default();
    let sheets = sheets_lines(
        account.as_deref(),
        &options,
        cursor.get(),
        key_for(BuiltinAction::Disconnect),
        &theme,
    );
    let sheets_height = sheets.len();
    let rendered_sheets = RenderedLines::build(&sheets, 0, sheets_height, depth);

    let history = history_lines(key_for(BuiltinAction::ViewHistory), &theme);
    let history_height = history.len();
    let rendered_history = RenderedLines::build(&history, 0, history_height, depth);

    let permissions = &props.permissions;
    let columns = permission_columns();
    let rows: Vec<Row> = permissions.iter().map(|p| permission_row(p, &theme)).collect();
    let table_width = props.width.saturating_sub(4).min(72);
    let rendered_permissions = RenderedTable::build(&TableBuildConfig {
        columns: &columns,
        rows: &rows,
        cursor: usize::MAX,
        scroll_offset: 0,
        visible_rows: rows.len().max(1),
        row_height: 1,
        total_width: table_width,
        depth,
        selected_bg: None,
        header_color: Some(theme.text_secondary),
        border_color: Some(theme.border_faint),
        empty_message: Some("No roles configured"),
    });

    let tracker_ref = tracker.read();
    let rendered_footer = RenderedFooter::build(
        ViewKind::Settings,
        format!("{} roles", permissions.len()),
        tracker_ref.latest(),
        depth,
        &theme,
    );

    let rendered_help = if help_visible.get() {
        props.keybindings.map(|kb| {
            RenderedHelpOverlay::build(&HelpOverlayBuildConfig {
                bindings: kb,
                context: ViewContext::Settings,
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
    let section_border = theme.border_faint.to_crossterm_color(depth);
    let title_fg = theme.text_primary.to_crossterm_color(depth);

    element! {
        View(flex_direction: FlexDirection::Column, width, height) {
            View(
                flex_grow: 1.0,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::Hidden,
                padding_left: 1,
            ) {
                LinesView(lines: rendered_sheets)
                View(
                    margin_top: 1,
                    flex_direction: FlexDirection::Column,
                    border_style: BorderStyle::Single,
                    border_edges: Edges::Top,
                    border_color: section_border,
                ) {
                    Text(content: "User Permissions", color: title_fg, weight: Weight::Bold)
                    ScrollableTable(table: rendered_permissions)
                }
                View(
                    margin_top: 1,
                    flex_direction: FlexDirection::Column,
                    border_style: BorderStyle::Single,
                    border_edges: Edges::Top,
                    border_color: section_border,
                ) {
                    LinesView(lines: rendered_history)
                }
            }
            Footer(footer: rendered_footer)
            HelpOverlay(overlay: rendered_help, width: props.width, height: props.height)
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::default_permissions;

    #[test]
    fn export_switches_toggle_independently() {
        let mut options = ExportConfig::default();
        toggle_export(&mut options, 1);
        assert_eq!(
            export_switches(&options).map(|(_, on)| on),
            [true, false, true]
        );
        toggle_export(&mut options, 1);
        toggle_export(&mut options, 7);
        assert_eq!(options, ExportConfig::default());
    }

    #[test]
    fn viewer_row_denies_everything() {
        let theme = default_theme();
        let perms = default_permissions();
        let viewer = perms.iter().find(|p| p.role == "Viewer").unwrap();
        let row = permission_row(viewer, &theme);
        for col in ["edit_rules", "run_eval", "export"] {
            assert_eq!(row[col].text, "\u{2717}");
            assert_eq!(row[col].color, Some(theme.text_error));
        }
        let member = perms.iter().find(|p| p.role == "QA Member").unwrap();
        let row = permission_row(member, &theme);
        assert_eq!(row["edit_rules"].text, "\u{2717}");
        assert_eq!(row["run_eval"].text, "\u{2713}");
    }

    #[test]
    fn disconnected_account_hides_disconnect_hint() {
        let theme = default_theme();
        let options = ExportConfig::default();
        let connected = sheets_lines(Some("workspace@example.com"), &options, 0, Some("D"), &theme);
        assert_eq!(
            connected[1].plain_text(),
            "Connected account: workspace@example.com   D Disconnect"
        );
        let none = sheets_lines(None, &options, 0, Some("D"), &theme);
        assert_eq!(none[1].plain_text(), "Connected account: not connected");
        assert_eq!(none[3].plain_text(), "Default export options");
        assert_eq!(none[4].plain_text(), "\u{25b8} [x] Include timestamps");
    }
}
