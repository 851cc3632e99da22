use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::repository::Repository;

use super::command::{Command, Ticket};
use super::interface::{Engine, EngineHandle, Event, Request};

/// Serves the repository in-process and acknowledges every command.
///
/// Nothing is sent anywhere: commands are logged and answered after the
/// configured latency.
pub struct MockEngine {
    repo: Arc<dyn Repository>,
    fail_commands: bool,
    latency: Duration,
}

impl MockEngine {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self {
            repo,
            fail_commands: false,
            latency: Duration::ZERO,
        }
    }

    /// Reject every command with a generic failure.
    pub fn failing(mut self, fail: bool) -> Self {
        self.fail_commands = fail;
        self
    }

    /// Delay command acknowledgments.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Engine for MockEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("mock engine: failed to start runtime: {e}");
                    return;
                }
            };
            rt.block_on(self.run_loop(rx));
        });
        EngineHandle::new(tx)
    }
}

impl MockEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        tracing::debug!("mock engine started");
        while let Some(req) = rx.recv().await {
            match req {
                Request::ListBots { reply_tx } => {
                    let _ = reply_tx.send(Event::BotsListed {
                        bots: self.repo.list_bots().to_vec(),
                    });
                }
                Request::ListConversations { filter, reply_tx } => {
                    tracing::debug!(?filter, "list conversations");
                    let _ = reply_tx.send(Event::ConversationsListed {
                        conversations: self.repo.list_conversations(&filter),
                    });
                }
                Request::FetchDetail {
                    conversation_id,
                    reply_tx,
                } => {
                    let event = match self.repo.detail(&conversation_id) {
                        Some(detail) => Event::DetailFetched {
                            conversation_id,
                            detail,
                        },
                        None => Event::FetchError {
                            context: format!("conversation {conversation_id}"),
                            message: "not found".to_owned(),
                        },
                    };
                    let _ = reply_tx.send(event);
                }
                Request::Run {
                    ticket,
                    command,
                    reply_tx,
                } => {
                    tracing::debug!(%ticket, command = command.name(), "run command");
                    let fail = self.fail_commands;
                    let latency = self.latency;
                    tokio::spawn(acknowledge(ticket, command, fail, latency, reply_tx));
                }
                Request::Shutdown => break,
            }
        }
        tracing::debug!("mock engine stopped");
    }
}

async fn acknowledge(
    ticket: Ticket,
    command: Command,
    fail: bool,
    latency: Duration,
    reply_tx: Sender<Event>,
) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    let event = if fail {
        tracing::warn!(%ticket, command = command.name(), "command failed");
        Event::CommandFailed {
            ticket,
            message: format!("could not {}", command.name()),
        }
    } else {
        Event::CommandSucceeded {
            ticket,
            message: command.success_message(),
        }
    };
    let _ = reply_tx.send(event);
}
