use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Default evaluation template
// ---------------------------------------------------------------------------

pub const DEFAULT_PROMPT: &str = r#"name: EVAL_PROMPT_v1
system: |
  You are a QA reviewer scoring a bot/customer conversation. Never invent facts.
  Score against the summarized rubric; keep wording short and useful for Sales.

context:
  bot_system_prompt: "{{BOT_SYSTEM_PROMPT}}"
  kb_snippets: {{KB_SNIPPETS}}

input:
  conversation_text: {{CONVERSATION_TEXT}}

rubric:
  - policy: greeting/auth/PII/end
  - score_aspects: intent, slots, flow, solution, tone

output_json:
  score_total: 0..100
  policy_pass: true|false
  qa_answer: short # 1-2 sentences, valuable for Sales
  labels: ["ASR","NLU","KB","Rule","UX"]
  cs_recommend: short"#;

/// Date shown next to the override owner.
pub const LAST_UPDATED: &str = "2025-09-29";

// ---------------------------------------------------------------------------
// Template placeholders
// ---------------------------------------------------------------------------

/// Iterate `(start, end, name)` for every `{{NAME}}` occurrence.
fn placeholders(template: &str) -> impl Iterator<Item = (usize, usize, &str)> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        loop {
            let open = cursor + template[cursor..].find("{{")?;
            let close = open + 2 + template[open + 2..].find("}}")?;
            cursor = open + 2;
            let name = &template[open + 2..close];
            if is_placeholder_name(name) {
                cursor = close + 2;
                return Some((open, close + 2, name));
            }
        }
    })
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Distinct placeholder names in order of first appearance.
pub fn template_variables(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for (_, _, name) in placeholders(template) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Substitute known placeholders; unknown ones are left as written.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for (start, end, name) in placeholders(template) {
        if let Some(value) = vars.get(name) {
            out.push_str(&template[last..start]);
            out.push_str(value);
            last = end;
        }
    }
    out.push_str(&template[last..]);
    out
}

/// Sample values substituted into the template for a preview.
pub fn preview_variables() -> HashMap<String, String> {
    [
        (
            "BOT_SYSTEM_PROMPT",
            "You are the virtual assistant of an insurance company.",
        ),
        (
            "KB_SNIPPETS",
            r#"["Car insurance quotes need vehicle type and year."]"#,
        ),
        (
            "CONVERSATION_TEXT",
            "user: Hi, I'd like to ask about car insurance.\n    \
             bot: Hello! Which kind of vehicle are you interested in?",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

// ---------------------------------------------------------------------------
// Global rules
// ---------------------------------------------------------------------------

/// A policy check applied to every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Rule {
    fn new(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            description: description.to_owned(),
            enabled: true,
        }
    }
}

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "greeting",
            "Greeting Required",
            "Bot must greet user at conversation start",
        ),
        Rule::new(
            "auth",
            "Authentication Check",
            "Verify user identity before sensitive operations",
        ),
        Rule::new(
            "pii",
            "PII Masking",
            "Personal information must be masked in logs",
        ),
        Rule::new(
            "endcall",
            "Proper End Call",
            "Conversation must end with appropriate closing",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Session state for the Prompt & Rules view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSettings {
    default_prompt: String,
    pub custom_prompt: String,
    pub use_custom: bool,
    pub rules: Vec<Rule>,
}

impl PromptSettings {
    /// Seed the custom editor with the default template.
    pub fn new(default_prompt: String, rules: Vec<Rule>) -> Self {
        Self {
            custom_prompt: default_prompt.clone(),
            default_prompt,
            use_custom: false,
            rules,
        }
    }

    pub fn default_prompt(&self) -> &str {
        &self.default_prompt
    }

    /// Flip one rule. Returns its new state, or `None` for an unknown id.
    pub fn toggle_rule(&mut self, id: &str) -> Option<bool> {
        let rule = self.rules.iter_mut().find(|r| r.id == id)?;
        rule.enabled = !rule.enabled;
        Some(rule.enabled)
    }

    pub fn reset_custom(&mut self) {
        self.custom_prompt.clone_from(&self.default_prompt);
    }

    /// The template evaluations would run with.
    pub fn effective_prompt(&self) -> &str {
        if self.use_custom {
            &self.custom_prompt
        } else {
            &self.default_prompt
        }
    }

    pub fn enabled_rule_ids(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.id.as_str())
            .collect()
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT.to_owned(), default_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_variables_in_order() {
        assert_eq!(
            template_variables(DEFAULT_PROMPT),
            vec!["BOT_SYSTEM_PROMPT", "KB_SNIPPETS", "CONVERSATION_TEXT"]
        );
    }

    #[test]
    fn variables_are_deduplicated() {
        let tpl = "{{A}} {{B}} {{A}} {{ not one }} {{}}";
        assert_eq!(template_variables(tpl), vec!["A", "B"]);
    }

    #[test]
    fn render_replaces_known_and_keeps_unknown() {
        let vars: HashMap<String, String> =
            [("NAME".to_owned(), "Ada".to_owned())].into_iter().collect();
        assert_eq!(
            render_template("hi {{NAME}}, see {{OTHER}}", &vars),
            "hi Ada, see {{OTHER}}"
        );
    }

    #[test]
    fn render_handles_unterminated_braces() {
        let vars = HashMap::new();
        assert_eq!(render_template("a {{OPEN", &vars), "a {{OPEN");
    }

    #[test]
    fn toggle_rule_flips_only_that_rule() {
        let mut settings = PromptSettings::default();
        assert_eq!(settings.toggle_rule("pii"), Some(false));
        assert_eq!(settings.enabled_rule_ids(), vec!["greeting", "auth", "endcall"]);
        assert_eq!(settings.toggle_rule("pii"), Some(true));
        assert_eq!(settings.toggle_rule("unknown"), None);
    }

    #[test]
    fn effective_prompt_follows_custom_switch() {
        let mut settings = PromptSettings::default();
        settings.custom_prompt.push_str("\nextra");
        assert_eq!(settings.effective_prompt(), DEFAULT_PROMPT);
        settings.use_custom = true;
        assert!(settings.effective_prompt().ends_with("extra"));
        settings.reset_custom();
        assert_eq!(settings.effective_prompt(), DEFAULT_PROMPT);
    }

    #[test]
    fn preview_fills_every_default_placeholder() {
        let rendered = render_template(DEFAULT_PROMPT, &preview_variables());
        assert!(template_variables(&rendered).is_empty());
        assert!(rendered.contains("insurance company"));
    }
}
