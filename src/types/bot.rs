use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bot-specific enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStatus {
    Active,
    Inactive,
    Testing,
}

impl BotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Bot domain type
// ---------------------------------------------------------------------------

/// A configured conversational agent under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "lastQA")]
    pub last_qa: Option<NaiveDate>,
    /// Percentage in `0..=100`.
    #[serde(default)]
    pub pass_rate: Option<u8>,
    #[serde(default)]
    pub conv_count: u64,
    pub channel: String,
    pub team: String,
    pub status: BotStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Bot {
    /// `"2025-09-29"` or an em placeholder when the bot was never evaluated.
    pub fn last_qa_display(&self) -> String {
        self.last_qa
            .map_or_else(|| "\u{2014}".to_owned(), |d| d.format("%Y-%m-%d").to_string())
    }

    pub fn pass_rate_display(&self) -> String {
        self.pass_rate
            .map_or_else(|| "n/a".to_owned(), |r| format!("{r}%"))
    }

    /// Conversation count with thousands separators (`8,456`).
    pub fn conv_count_display(&self) -> String {
        group_thousands(self.conv_count)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(8456), "8,456");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn deserializes_camel_case_fixture_shape() {
        let json = r#"{
            "id": "bot_789",
            "name": "Onboarding Bot",
            "lastQA": null,
            "passRate": null,
            "convCount": 0,
            "channel": "mobile",
            "team": "Product",
            "status": "testing",
            "tags": ["onboarding", "new"]
        }"#;
        let bot: Bot = serde_json::from_str(json).unwrap();
        assert_eq!(bot.status, BotStatus::Testing);
        assert!(bot.last_qa.is_none());
        assert_eq!(bot.last_qa_display(), "\u{2014}");
        assert_eq!(bot.pass_rate_display(), "n/a");
    }

    #[test]
    fn last_qa_parses_as_date() {
        let json = r#"{
            "id": "bot_1", "name": "B", "lastQA": "2025-09-29", "passRate": 78,
            "convCount": 2341, "channel": "web", "team": "Support", "status": "active"
        }"#;
        let bot: Bot = serde_json::from_str(json).unwrap();
        assert_eq!(bot.last_qa_display(), "2025-09-29");
        assert_eq!(bot.pass_rate_display(), "78%");
        assert_eq!(bot.conv_count_display(), "2,341");
        assert!(bot.tags.is_empty());
    }
}
