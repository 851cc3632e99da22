use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conversation-specific enums
// ---------------------------------------------------------------------------

/// Human reviewer's disposition on a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsReview {
    Approved,
    NeedFix,
    ToReview,
}

impl CsReview {
    pub fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::NeedFix => "Need Fix",
            Self::ToReview => "To Review",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::NeedFix => "need_fix",
            Self::ToReview => "to_review",
        }
    }
}

impl fmt::Display for CsReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Bot => "BOT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Warning,
    Error,
}

impl ViolationSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Conversation domain types
// ---------------------------------------------------------------------------

/// One recorded session between a bot and a user.
///
/// Only the bot id is stored; the display name is resolved through the
/// repository so it cannot drift from the bot record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub bot_id: String,
    /// Display string as recorded, e.g. `"2025-09-29 14:23"`.
    pub date: String,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub qa_answer: String,
    #[serde(default)]
    pub cs_review: Option<CsReview>,
    pub policy_pass: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Conversation {
    pub fn score_display(&self) -> String {
        self.score
            .map_or_else(|| "\u{2014}".to_owned(), |s| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Speaker,
    pub text: String,
    /// Offset into the recording, `"mm:ss"`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub offset_secs: u32,
    pub kind: String,
    pub severity: ViolationSeverity,
}

/// Drawer data fetched on demand for a single conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
    #[serde(default)]
    pub transcript: Vec<TranscriptTurn>,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

fn default_duration() -> u32 {
    180
}

impl Default for ConversationDetail {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            transcript: Vec::new(),
            violations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_bot_name_field_is_ignored() {
        let json = r#"{
            "id": "9f7a2b3c",
            "botId": "bot_123",
            "botName": "Stale Name",
            "date": "2025-09-29 14:23",
            "score": 62,
            "qaAnswer": "Missing authentication",
            "csReview": "need_fix",
            "policyPass": false,
            "labels": ["auth"]
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.bot_id, "bot_123");
        assert_eq!(conv.cs_review, Some(CsReview::NeedFix));
    }

    #[test]
    fn absent_score_and_review() {
        let json = r#"{
            "id": "x", "botId": "b", "date": "d", "score": null,
            "qaAnswer": "", "csReview": null, "policyPass": true
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert!(conv.score.is_none());
        assert!(conv.cs_review.is_none());
        assert_eq!(conv.score_display(), "\u{2014}");
    }

    #[test]
    fn detail_defaults_to_three_minutes() {
        let detail: ConversationDetail = serde_json::from_str("{}").unwrap();
        assert_eq!(detail.duration_secs, 180);
        assert_eq!(detail, ConversationDetail::default());
    }
}
