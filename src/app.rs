use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::components::tab_bar::{RenderedTabBar, Tab, TabBar, TabBarBuildConfig};
use crate::config::keybindings::MergedBindings;
use crate::config::types::{AppConfig, ExportConfig, View as ConfigView};
use crate::engine::EngineHandle;
use crate::theme::ResolvedTheme;
use crate::views::bots::BotsView;
use crate::views::conversations::ConversationsView;
use crate::views::default_theme;
use crate::views::prompt_rules::PromptRulesView;
use crate::views::settings::SettingsView;

/// Rows taken by the app header above every view.
const HEADER_ROWS: u16 = 1;

// ---------------------------------------------------------------------------
// View kind enum (public for the footer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ViewKind {
    Bots,
    Conversations,
    PromptRules,
    Settings,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Bots,
        ViewKind::Conversations,
        ViewKind::PromptRules,
        ViewKind::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Bots => "Bots",
            Self::Conversations => "Conversations",
            Self::PromptRules => "Prompt & Rules",
            Self::Settings => "Settings",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl From<ConfigView> for ViewKind {
    fn from(view: ConfigView) -> Self {
        match view {
            ConfigView::Bots => Self::Bots,
            ConfigView::Conversations => Self::Conversations,
            ConfigView::PromptRules => Self::PromptRules,
            ConfigView::Settings => Self::Settings,
        }
    }
}

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub config: Option<&'a AppConfig>,
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
    pub keybindings: Option<&'a MergedBindings>,
    pub color_depth: ColorDepth,
    /// Overrides `defaults.view` from the config.
    pub initial_view: Option<ViewKind>,
    /// Open the conversation list scoped to this bot.
    pub initial_bot: Option<String>,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let should_exit = hooks.use_state(|| false);

    let config = props.config;
    let theme = props.theme;
    let keybindings = props.keybindings;
    let depth = props.color_depth;

    let initial_bot = props.initial_bot.clone();
    let initial_view = if initial_bot.is_some() {
        ViewKind::Conversations
    } else {
        props
            .initial_view
            .or_else(|| config.map(|c| c.defaults.view.into()))
            .unwrap_or(ViewKind::Bots)
    };
    let mut active_view = hooks.use_state(move || initial_view);

    // Bot the conversation list is scoped to.
    let bot_scope = hooks.use_state(move || initial_bot);
    // Set by the gallery to jump to a bot's conversations.
    let mut open_conversations = hooks.use_state(|| Option::<String>::None);
    let initial_export = config.map(|c| c.export).unwrap_or_default();
    let export_options = hooks.use_state(move || initial_export);

    let requested_bot = open_conversations.read().clone();
    if let Some(bot_id) = requested_bot {
        open_conversations.set(None);
        let mut scope = bot_scope;
        tracing::debug!(%bot_id, "opening conversations for bot");
        scope.set(Some(bot_id));
        active_view.set(ViewKind::Conversations);
    }

    // Switch-view signal: when a child view sets this to true, we cycle forward.
    let mut switch_signal = hooks.use_state(|| false);
    if switch_signal.get() {
        switch_signal.set(false);
        active_view.set(active_view.get().next());
    }

    // Switch-view-back signal: cycle views in reverse order.
    let mut switch_back_signal = hooks.use_state(|| false);
    if switch_back_signal.get() {
        switch_back_signal.set(false);
        active_view.set(active_view.get().prev());
    }

    // Exit handling.
    if should_exit.get() {
        system.exit();
    }

    let active = active_view.get();
    let body_height = height.saturating_sub(HEADER_ROWS);

    let defaults = config.map(|c| &c.defaults);
    let table_label_max = defaults.map_or(2, |d| d.table_label_max);
    let drawer_label_max = defaults.map_or(5, |d| d.drawer_label_max);
    let qa_answer_lines = defaults.map_or(2, |d| d.qa_answer_lines);
    let drawer_width_pct = defaults.map_or(0.45, |d| d.preview.width);
    let initial_filters = defaults.map(|d| d.quick_filters.as_slice());
    let prompt_settings = config.map(|c| c.evaluation.prompt_settings()).unwrap_or_default();
    let permissions = config.map(AppConfig::permissions).unwrap_or_default();
    let account = config.map(|c| &c.account);
    let owner = account.map_or_else(|| "You".to_owned(), |a| a.owner.clone());
    let session_export: ExportConfig = export_options.get();

    let header_theme = theme.cloned().unwrap_or_else(default_theme);
    let header_tabs: Vec<Tab> = ViewKind::ALL
        .iter()
        .map(|v| Tab::new(v.label(), *v == active))
        .collect();
    let header = RenderedTabBar::build(&TabBarBuildConfig {
        title: Some("Agent Auto QA"),
        tabs: &header_tabs,
        depth,
        title_color: Some(header_theme.text_primary),
        active_fg: Some(header_theme.text_inverted),
        active_bg: Some(header_theme.bg_chip),
        inactive_color: Some(header_theme.text_faint),
        border_color: None,
        border: false,
    });

    element! {
        View(
            width: u32::from(width),
            height: u32::from(height),
            flex_direction: FlexDirection::Column,
        ) {
            TabBar(tab_bar: header)
            View(
                display: if active == ViewKind::Bots { Display::Flex } else { Display::None },
                flex_grow: 1.0,
            ) {
                BotsView(
                    engine: props.engine,
                    theme,
                    keybindings,
                    color_depth: depth,
                    width,
                    height: body_height,
                    should_exit,
                    switch_view: switch_signal,
                    switch_view_back: switch_back_signal,
                    open_conversations,
                    is_active: active == ViewKind::Bots,
                )
            }
            View(
                display: if active == ViewKind::Conversations {
                    Display::Flex
                } else {
                    Display::None
                },
                flex_grow: 1.0,
            ) {
                ConversationsView(
                    engine: props.engine,
                    theme,
                    keybindings,
                    color_depth: depth,
                    width,
                    height: body_height,
                    should_exit,
                    switch_view: switch_signal,
                    switch_view_back: switch_back_signal,
                    bot_scope,
                    initial_filters,
                    export_options: session_export,
                    table_label_max,
                    drawer_label_max,
                    qa_answer_lines,
                    drawer_width_pct,
                    is_active: active == ViewKind::Conversations,
                )
            }
            View(
                display: if active == ViewKind::PromptRules {
                    Display::Flex
                } else {
                    Display::None
                },
                flex_grow: 1.0,
            ) {
                PromptRulesView(
                    engine: props.engine,
                    theme,
                    keybindings,
                    color_depth: depth,
                    width,
                    height: body_height,
                    should_exit,
                    switch_view: switch_signal,
                    switch_view_back: switch_back_signal,
                    settings: prompt_settings,
                    owner,
                    is_active: active == ViewKind::PromptRules,
                )
            }
            View(
                display: if active == ViewKind::Settings { Display::Flex } else { Display::None },
                flex_grow: 1.0,
            ) {
                SettingsView(
                    engine: props.engine,
                    theme,
                    keybindings,
                    color_depth: depth,
                    width,
                    height: body_height,
                    should_exit,
                    switch_view: switch_signal,
                    switch_view_back: switch_back_signal,
                    account,
                    permissions,
                    export_options,
                    is_active: active == ViewKind::Settings,
                )
            }
        }
    }
}
