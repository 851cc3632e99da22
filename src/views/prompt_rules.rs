use iocraft::prelude::*;

use crate::app::ViewKind;
use crate::color::{Color as AppColor, ColorDepth};
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::help_overlay::{HelpOverlay, HelpOverlayBuildConfig, RenderedHelpOverlay};
use crate::components::lines_view::{LinesView, RenderedLines, StyledLine, StyledSpan, max_scroll};
use crate::components::popover::{Popover, RenderedPopover};
use crate::components::tab_bar::{RenderedTabBar, TabBar, TabBarBuildConfig, exclusive_tabs};
use crate::components::table::checkbox;
use crate::components::text_input::{EditOutcome, RenderedTextInput, TextInput, apply_edit_key};
use crate::config::keybindings::{BuiltinAction, MergedBindings, ViewContext, key_event_to_string};
use crate::engine::{Command, CommandTracker, EngineHandle};
use crate::prompt::{self, LAST_UPDATED, PromptSettings};
use crate::theme::ResolvedTheme;
use crate::views::{
    CHROME_ROWS, default_theme, drain_events, new_event_channel, resolve_command, run_command,
};

const TAB_TITLES: [&str; 3] = ["Prompt Template", "Global Rules", "User Overrides"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Template,
    Rules,
    Overrides,
}

impl Tab {
    const ALL: [Tab; 3] = [Self::Template, Self::Rules, Self::Overrides];

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn cycle(self, forward: bool) -> Self {
        let n = Self::ALL.len();
        let i = self.index();
        Self::ALL[if forward { (i + 1) % n } else { (i + n - 1) % n }]
    }
}

// ---------------------------------------------------------------------------
// Tab content
// ---------------------------------------------------------------------------

fn text_block(text: &str, fg: AppColor) -> impl Iterator<Item = StyledLine> + '_ {
    text.lines()
        .map(move |l| StyledLine::single(StyledSpan::text(format!("  {l}"), fg)))
}

fn template_lines(settings: &PromptSettings, theme: &ResolvedTheme) -> Vec<StyledLine> {
    let vars = prompt::template_variables(settings.default_prompt());
    let mut lines = vec![
        StyledLine::single(StyledSpan::bold("Default Evaluation Prompt", theme.text_primary)),
        StyledLine::single(
            StyledSpan::text(
                "Read-only. Used unless a custom prompt is enabled.",
                theme.text_faint,
            )
            .italic(),
        ),
        StyledLine::blank(),
    ];
    let mut var_line = StyledLine::single(StyledSpan::text("Variables: ", theme.text_secondary));
    for name in vars {
        var_line.push(StyledSpan::text(format!("{{{{{name}}}}} "), theme.text_accent));
    }
    lines.push(var_line);
    lines.push(StyledLine::blank());
    lines.extend(text_block(settings.default_prompt(), theme.text_secondary));
    lines
}

fn rule_lines(settings: &PromptSettings, cursor: usize, theme: &ResolvedTheme) -> Vec<StyledLine> {
    let mut lines = vec![
        StyledLine::single(StyledSpan::bold("Global Rules", theme.text_primary)),
        StyledLine::single(
            StyledSpan::text(
                "Policy checks applied to every evaluation.",
                theme.text_faint,
            )
            .italic(),
        ),
        StyledLine::blank(),
    ];
    for (i, rule) in settings.rules.iter().enumerate() {
        let marker = if i == cursor { "\u{25b8} " } else { "  " };
        let state_fg = if rule.enabled {
            theme.text_success
        } else {
            theme.text_faint
        };
        lines.push(StyledLine::from_spans(vec![
            StyledSpan::text(marker, theme.text_accent),
            StyledSpan::text(format!("{} ", checkbox(rule.enabled)), state_fg),
            StyledSpan::bold(rule.label.clone(), theme.text_primary),
        ]));
        if !rule.description.is_empty() {
            lines.push(StyledLine::single(StyledSpan::text(
                format!("      {}", rule.description),
                theme.text_secondary,
            )));
        }
    }
    lines
}

fn override_lines(
    settings: &PromptSettings,
    owner: &str,
    theme: &ResolvedTheme,
) -> Vec<StyledLine> {
    let (switch, switch_fg) = if settings.use_custom {
        ("[on]", theme.text_success)
    } else {
        ("[off]", theme.text_faint)
    };
    let mut lines = vec![
        StyledLine::single(StyledSpan::bold("User Overrides", theme.text_primary)),
        StyledLine::blank(),
        StyledLine::from_spans(vec![
            StyledSpan::text("Use custom prompt: ", theme.text_secondary),
            StyledSpan::bold(switch, switch_fg),
        ]),
        StyledLine::field("Owner", owner, theme.text_secondary, theme.text_primary),
        StyledLine::field("Last updated", LAST_UPDATED, theme.text_secondary, theme.text_primary),
        StyledLine::blank(),
    ];
    if settings.use_custom {
        let modified = settings.custom_prompt != settings.default_prompt();
        lines.push(StyledLine::from_spans(vec![
            StyledSpan::bold("Custom prompt", theme.text_primary),
            StyledSpan::text(
                if modified { "  (modified)" } else { "  (same as default)" },
                theme.text_faint,
            ),
        ]));
        lines.extend(text_block(&settings.custom_prompt, theme.text_primary));
    } else {
        lines.push(StyledLine::single(
            StyledSpan::text(
                "Custom prompt disabled; evaluations use the default template.",
                theme.text_faint,
            )
            .italic(),
        ));
    }
    lines
}

fn tab_lines(
    tab: Tab,
    settings: &PromptSettings,
    rule_cursor: usize,
    owner: &str,
    theme: &ResolvedTheme,
) -> Vec<StyledLine> {
    match tab {
        Tab::Template => template_lines(settings, theme),
        Tab::Rules => rule_lines(settings, rule_cursor, theme),
        Tab::Overrides => override_lines(settings, owner, theme),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    EditPrompt,
}

// ---------------------------------------------------------------------------
// PromptRulesView component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct PromptRulesViewProps<'a> {
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub keybindings: Option<&'a MergedBindings>,
    pub color_depth: ColorDepth,
    pub width: u16,
    pub height: u16,
    pub should_exit: Option<State<bool>>,
    pub switch_view: Option<State<bool>>,
    pub switch_view_back: Option<State<bool>>,
    /// Template and rules the session starts from.
    pub settings: Option<PromptSettings>,
    pub owner: String,
    pub is_active: bool,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn PromptRulesView<'a>(
    props: &PromptRulesViewProps<'a>,
    mut hooks: Hooks,
) -> impl Into<AnyElement<'a>> {
    let theme = props.theme.cloned().unwrap_or_else(default_theme);
    let depth = props.color_depth;
    let should_exit = props.should_exit;
    let switch_view = props.switch_view;
    let switch_view_back = props.switch_view_back;
    let is_active = props.is_active;

    let initial = props.settings.clone().unwrap_or_default();
    let mut settings = hooks.use_state(move || initial);
    let mut tab = hooks.use_state(|| Tab::Template);
    let mut rule_cursor = hooks.use_state(|| 0usize);
    let mut scroll = hooks.use_state(|| 0usize);
    let mut input_mode = hooks.use_state(|| InputMode::Normal);
    let mut preview = hooks.use_state(|| Option::<String>::None);
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

    let current_tab = tab.get();
    let current_mode = input_mode.get();
    let input_rows: u16 = if current_mode == InputMode::EditPrompt { 2 } else { 0 };
    let visible_lines = props.height.saturating_sub(CHROME_ROWS + input_rows + 2).max(1) as usize;
    let settings_snapshot = settings.read().clone();
    let lines = tab_lines(
        current_tab,
        &settings_snapshot,
        rule_cursor.get(),
        &props.owner,
        &theme,
    );
    let scroll_max = max_scroll(lines.len(), visible_lines);
    let rule_count = settings_snapshot.rules.len();

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
                if preview.read().is_some() {
                    if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | 'p')) {
                        preview.set(None);
                    }
                    return;
                }

                let mut issue = |command: Command| {
                    run_command(engine_kb.as_ref(), &mut tracker, command, &event_tx_kb);
                };
                let mut update = move |f: &dyn Fn(&mut PromptSettings)| {
                    let mut s = settings.read().clone();
                    f(&mut s);
                    settings.set(s);
                };

                match input_mode.get() {
                    InputMode::EditPrompt => {
                        if modifiers.contains(KeyModifiers::CONTROL) {
                            return;
                        }
                        let mut s = settings.read().clone();
                        let outcome = apply_edit_key(&mut s.custom_prompt, code, true);
                        if outcome != EditOutcome::Editing {
                            input_mode.set(InputMode::Normal);
                        }
                        settings.set(s);
                    }
                    InputMode::Normal => {
                        let Some(key_str) = key_event_to_string(code, modifiers, kind) else {
                            return;
                        };
                        let Some(action) = keybindings
                            .as_ref()
                            .and_then(|kb| kb.resolve(&key_str, ViewContext::PromptRules))
                        else {
                            return;
                        };
                        let on_rules = tab.get() == Tab::Rules;
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
                            BuiltinAction::NextTab | BuiltinAction::PrevTab => {
                                tab.set(tab.get().cycle(action == BuiltinAction::NextTab));
                                scroll.set(0);
                            }
                            BuiltinAction::MoveDown if on_rules => {
                                let last_rule = rule_count.saturating_sub(1);
                                rule_cursor.set((rule_cursor.get() + 1).min(last_rule));
                            }
                            BuiltinAction::MoveUp if on_rules => {
                                rule_cursor.set(rule_cursor.get().saturating_sub(1));
                            }
                            BuiltinAction::First if on_rules => rule_cursor.set(0),
                            BuiltinAction::Last if on_rules => {
                                rule_cursor.set(rule_count.saturating_sub(1));
                            }
                            BuiltinAction::MoveDown => {
                                scroll.set((scroll.get() + 1).min(scroll_max));
                            }
                            BuiltinAction::MoveUp => scroll.set(scroll.get().saturating_sub(1)),
                            BuiltinAction::PageDown => {
                                scroll.set((scroll.get() + visible_lines).min(scroll_max));
                            }
                            BuiltinAction::PageUp => {
                                scroll.set(scroll.get().saturating_sub(visible_lines));
                            }
                            BuiltinAction::First => scroll.set(0),
                            BuiltinAction::Last => scroll.set(scroll_max),
                            BuiltinAction::ToggleItem if on_rules => {
                                let idx = rule_cursor.get();
                                update(&|s: &mut PromptSettings| {
                                    if let Some(id) = s.rules.get(idx).map(|r| r.id.clone()) {
                                        s.toggle_rule(&id);
                                    }
                                });
                            }
                            BuiltinAction::ToggleItem | BuiltinAction::ToggleCustomPrompt
                                if action == BuiltinAction::ToggleCustomPrompt
                                    || tab.get() == Tab::Overrides =>
                            {
                                update(&|s: &mut PromptSettings| s.use_custom = !s.use_custom);
                                tab.set(Tab::Overrides);
                            }
                            BuiltinAction::ResetCustomPrompt => {
                                update(&PromptSettings::reset_custom);
                            }
                            BuiltinAction::EditText => {
                                if settings.read().use_custom {
                                    tab.set(Tab::Overrides);
                                    input_mode.set(InputMode::EditPrompt);
                                }
                            }
                            BuiltinAction::SaveChanges => {
                                let s = settings.read().clone();
                                issue(Command::SaveRules {
                                    enabled_rules: s
                                        .enabled_rule_ids()
                                        .into_iter()
                                        .map(str::to_owned)
                                        .collect(),
                                    use_custom_prompt: s.use_custom,
                                });
                            }
                            BuiltinAction::Preview => {
                                let rendered = prompt::render_template(
                                    settings.read().effective_prompt(),
                                    &prompt::preview_variables(),
                                );
                                preview.set(Some(rendered));
                                issue(Command::PreviewPrompt);
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

    let tabs = exclusive_tabs(TAB_TITLES, current_tab.index());
    let rendered_tabs = RenderedTabBar::build(&TabBarBuildConfig {
        title: None,
        tabs: &tabs,
        depth,
        title_color: Some(theme.text_secondary),
        active_fg: Some(theme.text_inverted),
        active_bg: Some(theme.bg_chip),
        inactive_color: Some(theme.text_faint),
        border_color: Some(theme.border_faint),
        border: false,
    });
    let rendered_lines = RenderedLines::build(
        &lines,
        scroll.get().min(scroll_max),
        visible_lines,
        depth,
    );

    let rendered_text_input = (current_mode == InputMode::EditPrompt).then(|| {
        RenderedTextInput::build(
            "Custom prompt (Esc to finish):",
            &settings_snapshot.custom_prompt,
            depth,
            Some(theme.text_primary),
            Some(theme.text_secondary),
            Some(theme.border_faint),
        )
    });

    let rendered_preview = preview.read().as_ref().map(|text| {
        RenderedPopover::build("Prompt Preview", text, "Esc close", props.width, depth, &theme)
    });

    let enabled = settings_snapshot.enabled_rule_ids().len();
    let context_text = format!(
        "{enabled}/{rule_count} rules enabled  Custom prompt {}",
        if settings_snapshot.use_custom { "on" } else { "off" }
    );
    let tracker_ref = tracker.read();
    let rendered_footer = RenderedFooter::build(
        ViewKind::PromptRules,
        context_text,
        tracker_ref.latest(),
        depth,
        &theme,
    );

    let rendered_help = if help_visible.get() {
        props.keybindings.map(|kb| {
            RenderedHelpOverlay::build(&HelpOverlayBuildConfig {
                bindings: kb,
                context: ViewContext::PromptRules,
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
            TabBar(tab_bar: rendered_tabs)
            View(
                flex_grow: 1.0,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::Hidden,
                padding_left: 1,
                border_style: BorderStyle::Single,
                border_edges: Edges::Top,
                border_color: theme.border_faint.to_crossterm_color(depth),
            ) {
                LinesView(lines: rendered_lines)
            }
            TextInput(input: rendered_text_input)
            Footer(footer: rendered_footer)
            Popover(popover: rendered_preview, width: props.width, height: props.height)
            HelpOverlay(overlay: rendered_help, width: props.width, height: props.height)
        }
    }
    .into_any()
}
