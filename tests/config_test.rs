use std::path::Path;

use qa_board::config::loader::{find_repo_local_config, load_config, merge_configs};
use qa_board::config::types::{AppConfig, View};
use qa_board::filter::QuickFilter;

#[test]
fn empty_config_uses_defaults() {
    let config: AppConfig = toml::from_str("").unwrap();
    assert_eq!(config.defaults.view, View::Bots);
    assert_eq!(config.defaults.table_label_max, 2);
    assert_eq!(config.defaults.drawer_label_max, 5);
    assert_eq!(config.defaults.qa_answer_lines, 2);
    assert!(config.defaults.quick_filters.is_empty());
    assert!((config.defaults.preview.width - 0.45).abs() < f64::EPSILON);
    assert!(config.data.fixture.is_none());
    assert!(!config.data.fail_commands);
    assert!(config.export.include_timestamps);
    assert!(config.export.include_labels);
    assert!(config.export.include_qa_answers);
    assert_eq!(
        config.account.sheets_account.as_deref(),
        Some("workspace@example.com")
    );
    assert_eq!(config.account.owner, "You");
}

#[test]
fn parse_unknown_keys_ignored() {
    let toml = r#"
unknown_top_level = "should be ignored"

[defaults]
view = "settings"
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.defaults.view, View::Settings);
}

#[test]
fn parse_defaults() {
    let toml = r#"
[defaults]
view = "conversations"
table_label_max = 3
qa_answer_lines = 1
quick_filters = ["policy-fail", "need-fix"]

[defaults.preview]
width = 0.6
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.defaults.view, View::Conversations);
    assert_eq!(config.defaults.table_label_max, 3);
    assert_eq!(config.defaults.qa_answer_lines, 1);
    assert_eq!(
        config.defaults.quick_filters,
        vec![QuickFilter::PolicyFail, QuickFilter::NeedFix]
    );
    assert!((config.defaults.preview.width - 0.6).abs() < f64::EPSILON);
}

#[test]
fn unknown_quick_filter_is_rejected() {
    let toml = r#"
[defaults]
quick_filters = ["score-high"]
"#;
    assert!(toml::from_str::<AppConfig>(toml).is_err());
}

#[test]
fn parse_export_and_account() {
    let toml = r#"
[export]
include_labels = false

[account]
sheets_account = "qa@example.org"
owner = "Dana"
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert!(config.export.include_timestamps);
    assert!(!config.export.include_labels);
    assert_eq!(config.account.sheets_account.as_deref(), Some("qa@example.org"));
    assert_eq!(config.account.owner, "Dana");
}

#[test]
fn permissions_default_to_four_roles() {
    let config = AppConfig::default();
    let roles: Vec<String> = config.permissions().into_iter().map(|p| p.role).collect();
    assert_eq!(roles, ["Admin", "QA Lead", "QA Member", "Viewer"]);
}

#[test]
fn configured_permissions_replace_defaults() {
    let toml = r#"
[[permissions]]
role = "Auditor"
export = true
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    let perms = config.permissions();
    assert_eq!(perms.len(), 1);
    assert_eq!(perms[0].role, "Auditor");
    assert!(perms[0].export);
    assert!(!perms[0].edit_rules);
    assert!(!perms[0].run_eval);
}

#[test]
fn evaluation_rules_and_prompt_override() {
    let toml = r#"
[evaluation]
default_prompt = "Score {{CONVERSATION_TEXT}}"

[[evaluation.rules]]
id = "tone"
label = "Polite Tone"
enabled = false
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    let settings = config.evaluation.prompt_settings();
    assert_eq!(settings.default_prompt(), "Score {{CONVERSATION_TEXT}}");
    assert_eq!(settings.rules.len(), 1);
    assert!(settings.enabled_rule_ids().is_empty());
    assert!(!settings.use_custom);
}

#[test]
fn evaluation_defaults_to_builtin_prompt_and_rules() {
    let settings = AppConfig::default().evaluation.prompt_settings();
    assert!(settings.default_prompt().contains("EVAL_PROMPT_v1"));
    assert_eq!(
        settings.enabled_rule_ids(),
        vec!["greeting", "auth", "pii", "endcall"]
    );
}

#[test]
fn parse_keybinding_overrides() {
    let toml = r#"
[[keybindings.conversations]]
key = "o"
builtin = "open_detail"
name = "Open"
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.keybindings.conversations.len(), 1);
    assert_eq!(config.keybindings.conversations[0].key, "o");
    assert_eq!(config.keybindings.conversations[0].builtin, "open_detail");
}

#[test]
fn load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[data]\nfail_commands = true\n\n[defaults]\nview = \"prompt_rules\"\n",
    )
    .unwrap();
    let config = load_config(Some(&path)).unwrap();
    assert!(config.data.fail_commands);
    assert_eq!(config.defaults.view, View::PromptRules);
}

#[test]
fn load_missing_explicit_path_errors() {
    let err = load_config(Some(Path::new("/nonexistent/qa-board.toml"))).unwrap_err();
    assert!(format!("{err:#}").contains("reading"));
}

#[test]
fn load_malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[defaults\nview = ").unwrap();
    let err = load_config(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("bad.toml"));
}

#[test]
fn repo_local_config_found_below_git_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir(root.join(".git")).unwrap();
    std::fs::write(root.join(".qa-board.toml"), "").unwrap();
    let nested = root.join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    assert_eq!(
        find_repo_local_config(&nested),
        Some(root.join(".qa-board.toml"))
    );
}

#[test]
fn repo_local_search_stops_at_git_root() {
    let dir = tempfile::tempdir().unwrap();
    let outer = dir.path();
    std::fs::write(outer.join(".qa-board.toml"), "").unwrap();
    let repo = outer.join("repo");
    std::fs::create_dir_all(repo.join(".git")).unwrap();

    assert_eq!(find_repo_local_config(&repo), None);
}

#[test]
fn merge_prefers_local_but_keeps_global_fallbacks() {
    let global: AppConfig = toml::from_str(
        r#"
[data]
fixture = "/data/global.json"

[[permissions]]
role = "Global Role"
"#,
    )
    .unwrap();
    let local: AppConfig = toml::from_str(
        r#"
[defaults]
view = "settings"
"#,
    )
    .unwrap();
    let merged = merge_configs(global, local);
    assert_eq!(merged.defaults.view, View::Settings);
    assert_eq!(
        merged.data.fixture.as_deref(),
        Some(Path::new("/data/global.json"))
    );
    assert_eq!(merged.permissions()[0].role, "Global Role");
}

#[test]
fn merge_keeps_global_failure_injection() {
    let global: AppConfig = toml::from_str("[data]\nfail_commands = true\n").unwrap();
    let local: AppConfig = toml::from_str("[defaults]\nview = \"settings\"\n").unwrap();
    let merged = merge_configs(global, local);
    assert!(merged.data.fail_commands);
    assert_eq!(merged.defaults.view, View::Settings);
}
