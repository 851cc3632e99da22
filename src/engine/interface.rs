use std::sync::mpsc::Sender;

use crate::engine::command::{Command, Ticket};
use crate::filter::ConversationFilter;
use crate::types::{Bot, Conversation, ConversationDetail};

/// Handle to the backend engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking.
    pub fn send(&self, req: Request) {
        // If the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }
}

/// A backend the UI can talk to.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// All operations the UI layer can send to the engine.
pub enum Request {
    ListBots {
        reply_tx: Sender<Event>,
    },
    ListConversations {
        filter: ConversationFilter,
        reply_tx: Sender<Event>,
    },
    FetchDetail {
        conversation_id: String,
        reply_tx: Sender<Event>,
    },
    /// Fire an action. The engine answers with `CommandSucceeded` or
    /// `CommandFailed` carrying the same ticket.
    Run {
        ticket: Ticket,
        command: Command,
        reply_tx: Sender<Event>,
    },
    Shutdown,
}

/// All events the engine can push back to UI views.
#[derive(Debug)]
pub enum Event {
    BotsListed {
        bots: Vec<Bot>,
    },
    ConversationsListed {
        conversations: Vec<Conversation>,
    },
    DetailFetched {
        conversation_id: String,
        detail: ConversationDetail,
    },
    FetchError {
        context: String,
        message: String,
    },
    CommandSucceeded {
        ticket: Ticket,
        message: String,
    },
    CommandFailed {
        ticket: Ticket,
        message: String,
    },
}
