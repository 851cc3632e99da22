use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::BotDirectory;
use crate::types::{Bot, Conversation, CsReview};

// ---------------------------------------------------------------------------
// Quick filters
// ---------------------------------------------------------------------------

/// A predefined predicate over conversations, toggled on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    PolicyFail,
    ScoreLow,
    NeedFix,
}

/// Scores strictly below this are considered low.
pub const LOW_SCORE_THRESHOLD: u8 = 75;

impl QuickFilter {
    pub const ALL: [QuickFilter; 3] = [Self::PolicyFail, Self::ScoreLow, Self::NeedFix];

    pub fn id(self) -> &'static str {
        match self {
            Self::PolicyFail => "policy-fail",
            Self::ScoreLow => "score-low",
            Self::NeedFix => "need-fix",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PolicyFail => "Policy: Fail",
            Self::ScoreLow => "Score < 75",
            Self::NeedFix => "Need Fix",
        }
    }

    pub fn matches(self, conv: &Conversation) -> bool {
        match self {
            Self::PolicyFail => !conv.policy_pass,
            Self::ScoreLow => conv.score.is_some_and(|s| s < LOW_SCORE_THRESHOLD),
            Self::NeedFix => conv.cs_review == Some(CsReview::NeedFix),
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown quick filter \"{0}\" (expected one of: policy-fail, score-low, need-fix)")]
pub struct QuickFilterParseError(pub String);

impl FromStr for QuickFilter {
    type Err = QuickFilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| QuickFilterParseError(s.to_owned()))
    }
}

/// The set of currently active quick filters.
///
/// Results do not depend on activation order; the order is kept only so the
/// chip bar renders stably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickFilterSet {
    active: IndexSet<QuickFilter>,
}

impl QuickFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate if inactive, deactivate if active.
    pub fn toggle(&mut self, filter: QuickFilter) {
        if !self.active.shift_remove(&filter) {
            self.active.insert(filter);
        }
    }

    pub fn is_active(&self, filter: QuickFilter) -> bool {
        self.active.contains(&filter)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = QuickFilter> + '_ {
        self.active.iter().copied()
    }

    /// True when every active filter accepts the conversation.
    pub fn matches(&self, conv: &Conversation) -> bool {
        self.active.iter().all(|f| f.matches(conv))
    }
}

impl FromIterator<QuickFilter> for QuickFilterSet {
    fn from_iter<I: IntoIterator<Item = QuickFilter>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversation filter
// ---------------------------------------------------------------------------

/// Everything that narrows the conversation list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    /// Free-text query; empty matches everything.
    pub query: String,
    pub quick: QuickFilterSet,
    /// Restrict to one bot (the gallery's "View Conversations" link).
    pub bot_id: Option<String>,
}

impl ConversationFilter {
    pub fn for_bot(bot_id: impl Into<String>) -> Self {
        Self {
            bot_id: Some(bot_id.into()),
            ..Self::default()
        }
    }

    /// Test one conversation. `bot_name` is the resolved display name.
    pub fn matches(&self, conv: &Conversation, bot_name: &str) -> bool {
        if let Some(bot_id) = &self.bot_id
            && conv.bot_id != *bot_id
        {
            return false;
        }
        text_matches(&self.query, conv, bot_name) && self.quick.matches(conv)
    }
}

fn text_matches(query: &str, conv: &Conversation, bot_name: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let lower = query.to_lowercase();
    [conv.id.as_str(), bot_name, conv.qa_answer.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(&lower))
}

/// Filter conversations, preserving input order.
/// Returns indices of matching conversations.
pub fn filter_conversations<D>(
    conversations: &[Conversation],
    directory: &D,
    filter: &ConversationFilter,
) -> Vec<usize>
where
    D: BotDirectory + ?Sized,
{
    conversations
        .iter()
        .enumerate()
        .filter(|(_, conv)| filter.matches(conv, directory.bot_name(&conv.bot_id)))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Bot gallery search
// ---------------------------------------------------------------------------

/// Filter bots by case-insensitive substring on name, id, or any tag.
/// Returns indices of matching bots.
pub fn filter_bots(bots: &[Bot], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..bots.len()).collect();
    }
    let lower = query.to_lowercase();
    bots.iter()
        .enumerate()
        .filter(|(_, bot)| {
            bot.name.to_lowercase().contains(&lower)
                || bot.id.to_lowercase().contains(&lower)
                || bot.tags.iter().any(|t| t.to_lowercase().contains(&lower))
        })
        .map(|(i, _)| i)
        .collect()
}
