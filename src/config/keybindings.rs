use serde::Deserialize;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// A single key binding: maps a key chord to a built-in action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Keybinding {
    pub key: String,
    pub builtin: String,
    pub name: Option<String>,
}

/// Keybinding overrides from the config file, one list per context.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub universal: Vec<Keybinding>,
    pub bots: Vec<Keybinding>,
    pub conversations: Vec<Keybinding>,
    pub prompt_rules: Vec<Keybinding>,
    pub settings: Vec<Keybinding>,
    pub drawer: Vec<Keybinding>,
}

/// View-independent action identifier used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAction {
    // Universal
    MoveDown,
    MoveUp,
    First,
    Last,
    PageDown,
    PageUp,
    Search,
    SwitchView,
    SwitchViewBack,
    ToggleHelp,
    Quit,
    // Conversations
    ToggleSelect,
    ToggleSelectAll,
    FilterPolicyFail,
    FilterScoreLow,
    FilterNeedFix,
    OpenDetail,
    ExpandAnswer,
    ExpandLabels,
    CopyAnswer,
    RunEvaluation,
    Export,
    CreateTicket,
    ClearBotScope,
    // Bots
    ViewConversations,
    // Prompt & Rules
    NextTab,
    PrevTab,
    ToggleItem,
    ToggleCustomPrompt,
    ResetCustomPrompt,
    EditText,
    SaveChanges,
    Preview,
    // Settings
    Disconnect,
    ViewHistory,
    // Drawer
    PlayPause,
    SeekBack,
    SeekForward,
    Approve,
    MarkNeedFix,
    SaveReview,
    CloseDrawer,
}

impl BuiltinAction {
    /// Parse a builtin action name from the config string.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "move_down" => Self::MoveDown,
            "move_up" => Self::MoveUp,
            "first" => Self::First,
            "last" => Self::Last,
            "page_down" => Self::PageDown,
            "page_up" => Self::PageUp,
            "search" => Self::Search,
            "switch_view" => Self::SwitchView,
            "switch_view_back" => Self::SwitchViewBack,
            "toggle_help" => Self::ToggleHelp,
            "quit" => Self::Quit,
            "toggle_select" => Self::ToggleSelect,
            "toggle_select_all" => Self::ToggleSelectAll,
            "filter_policy_fail" => Self::FilterPolicyFail,
            "filter_score_low" => Self::FilterScoreLow,
            "filter_need_fix" => Self::FilterNeedFix,
            "open_detail" => Self::OpenDetail,
            "expand_answer" => Self::ExpandAnswer,
            "expand_labels" => Self::ExpandLabels,
            "copy_answer" => Self::CopyAnswer,
            "run_evaluation" => Self::RunEvaluation,
            "export" => Self::Export,
            "create_ticket" => Self::CreateTicket,
            "clear_bot_scope" => Self::ClearBotScope,
            "view_conversations" => Self::ViewConversations,
            "next_tab" => Self::NextTab,
            "prev_tab" => Self::PrevTab,
            "toggle_item" => Self::ToggleItem,
            "toggle_custom_prompt" => Self::ToggleCustomPrompt,
            "reset_custom_prompt" => Self::ResetCustomPrompt,
            "edit_text" => Self::EditText,
            "save_changes" => Self::SaveChanges,
            "preview" => Self::Preview,
            "disconnect" => Self::Disconnect,
            "view_history" => Self::ViewHistory,
            "play_pause" => Self::PlayPause,
            "seek_back" => Self::SeekBack,
            "seek_forward" => Self::SeekForward,
            "approve" => Self::Approve,
            "mark_need_fix" => Self::MarkNeedFix,
            "save_review" => Self::SaveReview,
            "close_drawer" => Self::CloseDrawer,
            _ => return None,
        })
    }

    /// Human-readable description of this action (for help overlay).
    pub fn description(self) -> &'static str {
        match self {
            Self::MoveDown => "Move cursor down",
            Self::MoveUp => "Move cursor up",
            Self::First => "Jump to first item",
            Self::Last => "Jump to last item",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::Search => "Search",
            Self::SwitchView => "Next view",
            Self::SwitchViewBack => "Previous view",
            Self::ToggleHelp => "Toggle help overlay",
            Self::Quit => "Quit",
            Self::ToggleSelect => "Select / deselect row",
            Self::ToggleSelectAll => "Select all / clear",
            Self::FilterPolicyFail => "Filter: policy failed",
            Self::FilterScoreLow => "Filter: score below 75",
            Self::FilterNeedFix => "Filter: need fix",
            Self::OpenDetail => "Open conversation detail",
            Self::ExpandAnswer => "Show full QA answer",
            Self::ExpandLabels => "Show all labels",
            Self::CopyAnswer => "Copy QA answer",
            Self::RunEvaluation => "Run evaluation",
            Self::Export => "Export to Google Sheets",
            Self::CreateTicket => "Create ticket",
            Self::ClearBotScope => "Show all bots",
            Self::ViewConversations => "View conversations",
            Self::NextTab => "Next tab",
            Self::PrevTab => "Previous tab",
            Self::ToggleItem => "Toggle switch",
            Self::ToggleCustomPrompt => "Use custom prompt",
            Self::ResetCustomPrompt => "Reset custom prompt",
            Self::EditText => "Edit text",
            Self::SaveChanges => "Save changes",
            Self::Preview => "Preview",
            Self::Disconnect => "Disconnect account",
            Self::ViewHistory => "View full history",
            Self::PlayPause => "Play / pause audio",
            Self::SeekBack => "Seek back 5s",
            Self::SeekForward => "Seek forward 5s",
            Self::Approve => "Approve",
            Self::MarkNeedFix => "Need fix",
            Self::SaveReview => "Save review",
            Self::CloseDrawer => "Close detail",
        }
    }
}

// ---------------------------------------------------------------------------
// Key string conversion
// ---------------------------------------------------------------------------

use iocraft::prelude::{KeyCode, KeyEventKind, KeyModifiers};

/// Convert a key event to the canonical key string used in config files.
///
/// Examples: `"j"`, `"G"`, `"ctrl+c"`, `"enter"`, `"space"`, `"backtab"`.
pub fn key_event_to_string(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<String> {
    if kind == KeyEventKind::Release {
        return None;
    }

    let base = match code {
        KeyCode::Char(' ') => "space".to_owned(),
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
            c.to_ascii_lowercase().to_string()
        }
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Tab => "tab".to_owned(),
        KeyCode::BackTab => "backtab".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::PageUp => "pageup".to_owned(),
        KeyCode::PageDown => "pagedown".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    // Shift is carried by the char itself ('G' vs 'g').
    let mut prefix = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("alt+");
    }

    Some(format!("{prefix}{base}"))
}

// ---------------------------------------------------------------------------
// Default keybindings
// ---------------------------------------------------------------------------

fn kb(key: &str, builtin: &str, name: &str) -> Keybinding {
    Keybinding {
        key: key.to_owned(),
        builtin: builtin.to_owned(),
        name: Some(name.to_owned()),
    }
}

pub fn default_universal() -> Vec<Keybinding> {
    vec![
        kb("j", "move_down", "Move cursor down"),
        kb("down", "move_down", "Move cursor down"),
        kb("k", "move_up", "Move cursor up"),
        kb("up", "move_up", "Move cursor up"),
        kb("g", "first", "Jump to first item"),
        kb("home", "first", "Jump to first item"),
        kb("G", "last", "Jump to last item"),
        kb("end", "last", "Jump to last item"),
        kb("ctrl+d", "page_down", "Page down"),
        kb("pagedown", "page_down", "Page down"),
        kb("ctrl+u", "page_up", "Page up"),
        kb("pageup", "page_up", "Page up"),
        kb("/", "search", "Search"),
        kb("tab", "switch_view", "Next view"),
        kb("backtab", "switch_view_back", "Previous view"),
        kb("?", "toggle_help", "Toggle help"),
        kb("q", "quit", "Quit"),
        kb("ctrl+c", "quit", "Quit"),
    ]
}

pub fn default_bots() -> Vec<Keybinding> {
    vec![
        kb("enter", "view_conversations", "View conversations"),
        kb("r", "run_evaluation", "Run evaluation"),
    ]
}

pub fn default_conversations() -> Vec<Keybinding> {
    vec![
        kb("space", "toggle_select", "Select row"),
        kb("a", "toggle_select_all", "Select all / clear"),
        kb("1", "filter_policy_fail", "Filter: policy failed"),
        kb("2", "filter_score_low", "Filter: score < 75"),
        kb("3", "filter_need_fix", "Filter: need fix"),
        kb("enter", "open_detail", "Open detail"),
        kb("e", "expand_answer", "Show full QA answer"),
        kb("+", "expand_labels", "Show all labels"),
        kb("y", "copy_answer", "Copy QA answer"),
        kb("r", "run_evaluation", "Run evaluation"),
        kb("x", "export", "Export to Google Sheets"),
        kb("t", "create_ticket", "Create ticket"),
        kb("c", "clear_bot_scope", "Show all bots"),
    ]
}

pub fn default_prompt_rules() -> Vec<Keybinding> {
    vec![
        kb("l", "next_tab", "Next tab"),
        kb("right", "next_tab", "Next tab"),
        kb("h", "prev_tab", "Previous tab"),
        kb("left", "prev_tab", "Previous tab"),
        kb("space", "toggle_item", "Toggle rule"),
        kb("u", "toggle_custom_prompt", "Use custom prompt"),
        kb("R", "reset_custom_prompt", "Reset to default"),
        kb("e", "edit_text", "Edit custom prompt"),
        kb("s", "save_changes", "Save changes"),
        kb("p", "preview", "Preview"),
    ]
}

pub fn default_settings() -> Vec<Keybinding> {
    vec![
        kb("space", "toggle_item", "Toggle export option"),
        kb("D", "disconnect", "Disconnect account"),
        kb("H", "view_history", "View full history"),
    ]
}

pub fn default_drawer() -> Vec<Keybinding> {
    vec![
        kb("space", "play_pause", "Play / pause"),
        kb("left", "seek_back", "Seek back 5s"),
        kb("right", "seek_forward", "Seek forward 5s"),
        kb("a", "approve", "Approve"),
        kb("f", "mark_need_fix", "Need fix"),
        kb("e", "edit_text", "Edit review notes"),
        kb("s", "save_review", "Save review"),
        kb("y", "copy_answer", "Copy QA answer"),
        kb("+", "expand_labels", "Show all labels"),
        kb("r", "run_evaluation", "Run evaluation"),
        kb("t", "create_ticket", "Create ticket"),
        kb("x", "export", "Export to Google Sheets"),
        kb("esc", "close_drawer", "Close"),
    ]
}

// ---------------------------------------------------------------------------
// Merged keybinding set
// ---------------------------------------------------------------------------

/// View context for keybinding resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewContext {
    Bots,
    Conversations,
    PromptRules,
    Settings,
    Drawer,
}

impl ViewContext {
    fn label(self) -> &'static str {
        match self {
            Self::Bots => "Bots",
            Self::Conversations => "Conversations",
            Self::PromptRules => "Prompt & Rules",
            Self::Settings => "Settings",
            Self::Drawer => "Detail",
        }
    }
}

/// Defaults merged with user overrides. An override replaces the default
/// bound to the same key.
#[derive(Debug, Clone)]
pub struct MergedBindings {
    pub universal: Vec<Keybinding>,
    pub bots: Vec<Keybinding>,
    pub conversations: Vec<Keybinding>,
    pub prompt_rules: Vec<Keybinding>,
    pub settings: Vec<Keybinding>,
    pub drawer: Vec<Keybinding>,
}

impl MergedBindings {
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        Self {
            universal: merge_lists(&default_universal(), &config.universal),
            bots: merge_lists(&default_bots(), &config.bots),
            conversations: merge_lists(&default_conversations(), &config.conversations),
            prompt_rules: merge_lists(&default_prompt_rules(), &config.prompt_rules),
            settings: merge_lists(&default_settings(), &config.settings),
            drawer: merge_lists(&default_drawer(), &config.drawer),
        }
    }

    fn context_list(&self, context: ViewContext) -> &[Keybinding] {
        match context {
            ViewContext::Bots => &self.bots,
            ViewContext::Conversations => &self.conversations,
            ViewContext::PromptRules => &self.prompt_rules,
            ViewContext::Settings => &self.settings,
            ViewContext::Drawer => &self.drawer,
        }
    }

    /// Context-specific bindings win over universal ones.
    pub fn resolve(&self, key: &str, context: ViewContext) -> Option<BuiltinAction> {
        find_binding(self.context_list(context), key).or_else(|| find_binding(&self.universal, key))
    }

    /// `(group label, bindings)` pairs for the help overlay, universal first.
    pub fn all_for_context(&self, context: ViewContext) -> Vec<(&'static str, &[Keybinding])> {
        vec![
            ("Universal", self.universal.as_slice()),
            (context.label(), self.context_list(context)),
        ]
    }

    /// First key bound to `action` in the context (or universally), for hints.
    pub fn key_for(&self, action: BuiltinAction, context: ViewContext) -> Option<&str> {
        self.context_list(context)
            .iter()
            .chain(&self.universal)
            .find(|b| BuiltinAction::from_name(&b.builtin) == Some(action))
            .map(|b| b.key.as_str())
    }
}

fn merge_lists(defaults: &[Keybinding], overrides: &[Keybinding]) -> Vec<Keybinding> {
    let override_keys: std::collections::HashSet<&str> =
        overrides.iter().map(|b| b.key.as_str()).collect();

    let mut result: Vec<Keybinding> = defaults
        .iter()
        .filter(|b| !override_keys.contains(b.key.as_str()))
        .cloned()
        .collect();

    result.extend(overrides.iter().cloned());
    result
}

fn find_binding(bindings: &[Keybinding], key: &str) -> Option<BuiltinAction> {
    bindings
        .iter()
        .filter(|b| b.key == key)
        .find_map(|b| BuiltinAction::from_name(&b.builtin))
}
