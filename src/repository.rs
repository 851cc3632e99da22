use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::filter::{self, ConversationFilter};
use crate::types::{Bot, Conversation, ConversationDetail};

/// Sample data compiled into the binary.
const EMBEDDED_FIXTURE: &str = include_str!("../fixtures/mock_data.json");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("reading data file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing data fixture")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id \"{id}\"")]
    DuplicateId { kind: &'static str, id: String },
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Resolves a bot id to its display name.
pub trait BotDirectory {
    /// Display name for `bot_id`, or the id itself when no bot matches.
    fn bot_name<'a>(&'a self, bot_id: &'a str) -> &'a str;
}

impl BotDirectory for HashMap<String, String> {
    fn bot_name<'a>(&'a self, bot_id: &'a str) -> &'a str {
        self.get(bot_id).map_or(bot_id, String::as_str)
    }
}

impl BotDirectory for [Bot] {
    fn bot_name<'a>(&'a self, bot_id: &'a str) -> &'a str {
        self.iter()
            .find(|b| b.id == bot_id)
            .map_or(bot_id, |b| b.name.as_str())
    }
}

impl BotDirectory for Vec<Bot> {
    fn bot_name<'a>(&'a self, bot_id: &'a str) -> &'a str {
        self.as_slice().bot_name(bot_id)
    }
}

/// Read access to bots, conversations and drawer details.
pub trait Repository: BotDirectory + Send + Sync {
    fn list_bots(&self) -> &[Bot];

    /// Conversations passing `filter`, in stored order.
    fn list_conversations(&self, filter: &ConversationFilter) -> Vec<Conversation>;

    fn bot(&self, id: &str) -> Option<&Bot>;

    fn conversation(&self, id: &str) -> Option<&Conversation>;

    /// Drawer content for one conversation.
    fn detail(&self, conversation_id: &str) -> Option<ConversationDetail>;
}

// ---------------------------------------------------------------------------
// MockRepository
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    bots: Vec<Bot>,
    conversations: Vec<Conversation>,
    #[serde(default)]
    sample_detail: ConversationDetail,
}

/// In-memory repository backed by a JSON fixture.
///
/// Every conversation shares the same sample detail.
#[derive(Debug, Clone)]
pub struct MockRepository {
    bots: Vec<Bot>,
    conversations: Vec<Conversation>,
    sample_detail: ConversationDetail,
    bot_index: HashMap<String, usize>,
}

impl MockRepository {
    /// The sample data set shipped with the binary.
    pub fn embedded() -> Result<Self, RepositoryError> {
        Self::from_json(EMBEDDED_FIXTURE)
    }

    pub fn from_path(path: &Path) -> Result<Self, RepositoryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RepositoryError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RepositoryError> {
        let fixture: Fixture = serde_json::from_str(raw)?;
        Self::new(fixture.bots, fixture.conversations, fixture.sample_detail)
    }

    pub fn new(
        bots: Vec<Bot>,
        conversations: Vec<Conversation>,
        sample_detail: ConversationDetail,
    ) -> Result<Self, RepositoryError> {
        let mut bot_index = HashMap::with_capacity(bots.len());
        for (i, bot) in bots.iter().enumerate() {
            if bot_index.insert(bot.id.clone(), i).is_some() {
                return Err(RepositoryError::DuplicateId {
                    kind: "bot",
                    id: bot.id.clone(),
                });
            }
        }

        let mut seen = std::collections::HashSet::with_capacity(conversations.len());
        for conv in &conversations {
            if !seen.insert(conv.id.as_str()) {
                return Err(RepositoryError::DuplicateId {
                    kind: "conversation",
                    id: conv.id.clone(),
                });
            }
            if !bot_index.contains_key(&conv.bot_id) {
                tracing::warn!(
                    conversation = %conv.id,
                    bot_id = %conv.bot_id,
                    "conversation references an unknown bot"
                );
            }
        }

        tracing::info!(
            bots = bots.len(),
            conversations = conversations.len(),
            "loaded mock data"
        );

        Ok(Self {
            bots,
            conversations,
            sample_detail,
            bot_index,
        })
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }
}

impl BotDirectory for MockRepository {
    fn bot_name<'a>(&'a self, bot_id: &'a str) -> &'a str {
        self.bot(bot_id).map_or(bot_id, |b| b.name.as_str())
    }
}

impl Repository for MockRepository {
    fn list_bots(&self) -> &[Bot] {
        &self.bots
    }

    fn list_conversations(&self, filter: &ConversationFilter) -> Vec<Conversation> {
        filter::filter_conversations(&self.conversations, self, filter)
            .into_iter()
            .map(|i| self.conversations[i].clone())
            .collect()
    }

    fn bot(&self, id: &str) -> Option<&Bot> {
        self.bot_index.get(id).map(|&i| &self.bots[i])
    }

    fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn detail(&self, conversation_id: &str) -> Option<ConversationDetail> {
        self.conversation(conversation_id)
            .map(|_| self.sample_detail.clone())
    }
}
