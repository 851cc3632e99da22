use qa_board::config::keybindings::{
    BuiltinAction, Keybinding, KeybindingsConfig, MergedBindings, ViewContext,
    default_conversations, default_drawer, default_universal, key_event_to_string,
};

use iocraft::prelude::{KeyCode, KeyEventKind, KeyModifiers};

fn binding(key: &str, builtin: &str) -> Keybinding {
    Keybinding {
        key: key.to_owned(),
        builtin: builtin.to_owned(),
        name: None,
    }
}

// ---------------------------------------------------------------------------
// Rebinding
// ---------------------------------------------------------------------------

#[test]
fn override_replaces_default_on_same_key() {
    let config = KeybindingsConfig {
        conversations: vec![binding("e", "copy_answer")],
        ..Default::default()
    };
    let merged = MergedBindings::from_config(&config);
    assert_eq!(
        merged.resolve("e", ViewContext::Conversations),
        Some(BuiltinAction::CopyAnswer)
    );
    // The old binding for "y" is untouched.
    assert_eq!(
        merged.resolve("y", ViewContext::Conversations),
        Some(BuiltinAction::CopyAnswer)
    );
}

#[test]
fn override_adds_new_key() {
    let config = KeybindingsConfig {
        drawer: vec![binding("p", "play_pause")],
        ..Default::default()
    };
    let merged = MergedBindings::from_config(&config);
    assert_eq!(
        merged.resolve("p", ViewContext::Drawer),
        Some(BuiltinAction::PlayPause)
    );
    assert_eq!(
        merged.resolve("space", ViewContext::Drawer),
        Some(BuiltinAction::PlayPause)
    );
}

#[test]
fn unknown_builtin_name_does_not_resolve() {
    let config = KeybindingsConfig {
        bots: vec![binding("z", "launch_rockets")],
        ..Default::default()
    };
    let merged = MergedBindings::from_config(&config);
    assert_eq!(merged.resolve("z", ViewContext::Bots), None);
}

#[test]
fn universal_override_applies_everywhere() {
    let config = KeybindingsConfig {
        universal: vec![binding("x", "quit")],
        ..Default::default()
    };
    let merged = MergedBindings::from_config(&config);
    assert_eq!(merged.resolve("x", ViewContext::Bots), Some(BuiltinAction::Quit));
    assert_eq!(
        merged.resolve("x", ViewContext::Settings),
        Some(BuiltinAction::Quit)
    );
    // The conversation context binds "x" itself, which wins.
    assert_eq!(
        merged.resolve("x", ViewContext::Conversations),
        Some(BuiltinAction::Export)
    );
}

// ---------------------------------------------------------------------------
// Context precedence
// ---------------------------------------------------------------------------

#[test]
fn context_binding_wins_over_universal() {
    let merged = MergedBindings::from_config(&KeybindingsConfig::default());
    // "enter" opens the drawer in the list but drills into a bot in the gallery.
    assert_eq!(
        merged.resolve("enter", ViewContext::Conversations),
        Some(BuiltinAction::OpenDetail)
    );
    assert_eq!(
        merged.resolve("enter", ViewContext::Bots),
        Some(BuiltinAction::ViewConversations)
    );
    // "space" means different things per context.
    assert_eq!(
        merged.resolve("space", ViewContext::Conversations),
        Some(BuiltinAction::ToggleSelect)
    );
    assert_eq!(
        merged.resolve("space", ViewContext::Drawer),
        Some(BuiltinAction::PlayPause)
    );
    assert_eq!(
        merged.resolve("space", ViewContext::PromptRules),
        Some(BuiltinAction::ToggleItem)
    );
}

#[test]
fn universal_keys_resolve_in_every_context() {
    let merged = MergedBindings::from_config(&KeybindingsConfig::default());
    for ctx in [
        ViewContext::Bots,
        ViewContext::Conversations,
        ViewContext::PromptRules,
        ViewContext::Settings,
        ViewContext::Drawer,
    ] {
        assert_eq!(merged.resolve("j", ctx), Some(BuiltinAction::MoveDown));
        assert_eq!(merged.resolve("?", ctx), Some(BuiltinAction::ToggleHelp));
        assert_eq!(merged.resolve("ctrl+c", ctx), Some(BuiltinAction::Quit));
    }
}

#[test]
fn quick_filter_digits() {
    let merged = MergedBindings::from_config(&KeybindingsConfig::default());
    let ctx = ViewContext::Conversations;
    assert_eq!(merged.resolve("1", ctx), Some(BuiltinAction::FilterPolicyFail));
    assert_eq!(merged.resolve("2", ctx), Some(BuiltinAction::FilterScoreLow));
    assert_eq!(merged.resolve("3", ctx), Some(BuiltinAction::FilterNeedFix));
}

#[test]
fn key_for_finds_first_binding() {
    let merged = MergedBindings::from_config(&KeybindingsConfig::default());
    assert_eq!(
        merged.key_for(BuiltinAction::MoveDown, ViewContext::Bots),
        Some("j")
    );
    assert_eq!(
        merged.key_for(BuiltinAction::SaveReview, ViewContext::Drawer),
        Some("s")
    );
    assert_eq!(
        merged.key_for(BuiltinAction::SaveReview, ViewContext::Bots),
        None
    );
}

#[test]
fn help_groups_put_universal_first() {
    let merged = MergedBindings::from_config(&KeybindingsConfig::default());
    let groups = merged.all_for_context(ViewContext::Drawer);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, "Universal");
    assert_eq!(groups[1].0, "Detail");
    assert_eq!(groups[1].1.len(), default_drawer().len());
}

#[test]
fn every_default_names_a_known_action() {
    for kb in default_universal()
        .iter()
        .chain(&default_conversations())
        .chain(&default_drawer())
    {
        assert!(
            BuiltinAction::from_name(&kb.builtin).is_some(),
            "unknown builtin {}",
            kb.builtin
        );
        assert!(kb.name.is_some());
    }
}

// ---------------------------------------------------------------------------
// Key event conversion
// ---------------------------------------------------------------------------

#[test]
fn key_strings() {
    let press = KeyEventKind::Press;
    let none = KeyModifiers::NONE;
    assert_eq!(
        key_event_to_string(KeyCode::Char('j'), none, press).as_deref(),
        Some("j")
    );
    assert_eq!(
        key_event_to_string(KeyCode::Char('G'), KeyModifiers::SHIFT, press).as_deref(),
        Some("G")
    );
    assert_eq!(
        key_event_to_string(KeyCode::Char(' '), none, press).as_deref(),
        Some("space")
    );
    assert_eq!(
        key_event_to_string(KeyCode::Char('C'), KeyModifiers::CONTROL, press).as_deref(),
        Some("ctrl+c")
    );
    assert_eq!(
        key_event_to_string(KeyCode::Char('x'), KeyModifiers::ALT, press).as_deref(),
        Some("alt+x")
    );
    assert_eq!(
        key_event_to_string(KeyCode::BackTab, KeyModifiers::SHIFT, press).as_deref(),
        Some("backtab")
    );
    assert_eq!(
        key_event_to_string(KeyCode::F(5), none, press).as_deref(),
        Some("f5")
    );
}

#[test]
fn release_events_are_ignored() {
    assert_eq!(
        key_event_to_string(KeyCode::Char('j'), KeyModifiers::NONE, KeyEventKind::Release),
        None
    );
}

#[test]
fn unsupported_keys_are_ignored() {
    assert_eq!(
        key_event_to_string(KeyCode::Insert, KeyModifiers::NONE, KeyEventKind::Press),
        None
    );
}
