use std::fmt;

use indexmap::IndexMap;

use crate::config::types::ExportConfig;
use crate::engine::Event;
use crate::types::CsReview;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Identifies one issued command so its outcome can be matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An action handed to an external collaborator (evaluator, ticketing,
/// sheet export). The mock backend only acknowledges them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RunEvaluation {
        conversation_ids: Vec<String>,
    },
    EvaluateBot {
        bot_id: String,
    },
    CreateTicket {
        conversation_id: String,
    },
    Export {
        conversation_ids: Vec<String>,
        options: ExportConfig,
    },
    SaveReview {
        conversation_id: String,
        verdict: Option<CsReview>,
        notes: String,
    },
    SaveRules {
        enabled_rules: Vec<String>,
        use_custom_prompt: bool,
    },
    PreviewPrompt,
    DisconnectSheets {
        account: String,
    },
    ViewHistory,
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

impl Command {
    /// Status line shown while the command is pending.
    pub fn progress_message(&self) -> String {
        match self {
            Self::RunEvaluation { .. } | Self::EvaluateBot { .. } => {
                "Running evaluation...".to_owned()
            }
            Self::CreateTicket { .. } => "Creating ticket...".to_owned(),
            Self::Export { .. } => "Exporting to Google Sheets...".to_owned(),
            Self::SaveReview { .. } => "Saving review...".to_owned(),
            Self::SaveRules { .. } => "Saving changes...".to_owned(),
            Self::PreviewPrompt => "Rendering preview...".to_owned(),
            Self::DisconnectSheets { .. } => "Disconnecting...".to_owned(),
            Self::ViewHistory => "Loading history...".to_owned(),
        }
    }

    /// Acknowledgment shown once the command succeeds.
    pub fn success_message(&self) -> String {
        match self {
            Self::RunEvaluation { conversation_ids } => format!(
                "Evaluation queued for {}",
                plural(conversation_ids.len(), "conversation")
            ),
            Self::EvaluateBot { bot_id } => format!("Evaluation queued for {bot_id}"),
            Self::CreateTicket { conversation_id } => {
                format!("Ticket created for {conversation_id}")
            }
            Self::Export {
                conversation_ids, ..
            } => format!(
                "Exported {} to Google Sheets",
                plural(conversation_ids.len(), "conversation")
            ),
            Self::SaveReview { .. } => "Review saved".to_owned(),
            Self::SaveRules { .. } => "Changes saved".to_owned(),
            Self::PreviewPrompt => "Preview ready".to_owned(),
            Self::DisconnectSheets { account } => format!("Disconnected {account}"),
            Self::ViewHistory => "No earlier versions".to_owned(),
        }
    }

    /// Short name used in failure acknowledgments and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RunEvaluation { .. } | Self::EvaluateBot { .. } => "run evaluation",
            Self::CreateTicket { .. } => "create ticket",
            Self::Export { .. } => "export",
            Self::SaveReview { .. } => "save review",
            Self::SaveRules { .. } => "save changes",
            Self::PreviewPrompt => "preview",
            Self::DisconnectSheets { .. } => "disconnect",
            Self::ViewHistory => "view history",
        }
    }
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Pending(String),
    Succeeded(String),
    Failed(String),
}

impl CommandStatus {
    pub fn message(&self) -> &str {
        match self {
            Self::Pending(m) | Self::Succeeded(m) | Self::Failed(m) => m,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Hands out tickets and records what happened to each one.
#[derive(Debug, Clone, Default)]
pub struct CommandTracker {
    next: u64,
    entries: IndexMap<Ticket, CommandStatus>,
}

impl CommandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a ticket for `command` and mark it pending.
    ///
    /// Settled entries are dropped first; the new ticket becomes the latest.
    pub fn issue(&mut self, command: &Command) -> Ticket {
        self.entries.retain(|_, status| status.is_pending());
        self.next += 1;
        let ticket = Ticket(self.next);
        self.entries
            .insert(ticket, CommandStatus::Pending(command.progress_message()));
        ticket
    }

    /// Apply a command outcome. Returns false for other events and for
    /// tickets this tracker never issued.
    pub fn resolve(&mut self, event: &Event) -> bool {
        let (ticket, status) = match event {
            Event::CommandSucceeded { ticket, message } => {
                (*ticket, CommandStatus::Succeeded(message.clone()))
            }
            Event::CommandFailed { ticket, message } => {
                (*ticket, CommandStatus::Failed(format!("Failed: {message}")))
            }
            _ => return false,
        };
        match self.entries.get_mut(&ticket) {
            Some(entry) => {
                *entry = status;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, ticket: Ticket) -> Option<&CommandStatus> {
        self.entries.get(&ticket)
    }

    /// Most recently issued command's status, for the status bar.
    pub fn latest(&self) -> Option<&CommandStatus> {
        self.entries.last().map(|(_, s)| s)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_pending()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(n: usize) -> Command {
        Command::RunEvaluation {
            conversation_ids: (0..n).map(|i| i.to_string()).collect(),
        }
    }

    #[test]
    fn issue_marks_pending_with_progress_message() {
        let mut tracker = CommandTracker::new();
        let t = tracker.issue(&eval(2));
        assert_eq!(
            tracker.status(t),
            Some(&CommandStatus::Pending("Running evaluation...".to_owned()))
        );
        assert_eq!(tracker.pending_count(), 1);
    }

    #[test]
    fn tickets_are_distinct() {
        let mut tracker = CommandTracker::new();
        let a = tracker.issue(&eval(1));
        let b = tracker.issue(&eval(1));
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_success_and_failure() {
        let mut tracker = CommandTracker::new();
        let ok = tracker.issue(&eval(1));
        let bad = tracker.issue(&Command::PreviewPrompt);
        assert!(tracker.resolve(&Event::CommandSucceeded {
            ticket: ok,
            message: "done".to_owned(),
        }));
        assert!(tracker.resolve(&Event::CommandFailed {
            ticket: bad,
            message: "service unavailable".to_owned(),
        }));
        assert_eq!(tracker.status(ok), Some(&CommandStatus::Succeeded("done".to_owned())));
        assert_eq!(
            tracker.latest().map(CommandStatus::message),
            Some("Failed: service unavailable")
        );
        assert_eq!(tracker.pending_count(), 0);
    }

    #[test]
    fn settled_commands_are_dropped_on_next_issue() {
        let mut tracker = CommandTracker::new();
        let tickets: Vec<Ticket> = (0..5).map(|_| tracker.issue(&eval(1))).collect();
        for &ticket in &tickets[..4] {
            tracker.resolve(&Event::CommandSucceeded {
                ticket,
                message: "done".to_owned(),
            });
        }
        let next = tracker.issue(&Command::PreviewPrompt);
        assert_eq!(tracker.entries.len(), 2);
        assert!(tracker.status(tickets[0]).is_none());
        assert!(tracker.status(tickets[4]).is_some_and(CommandStatus::is_pending));
        assert_eq!(
            tracker.latest().map(CommandStatus::message),
            Some("Rendering preview...")
        );
        assert!(tracker.status(next).is_some());
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let mut tracker = CommandTracker::new();
        assert!(!tracker.resolve(&Event::CommandSucceeded {
            ticket: Ticket(99),
            message: String::new(),
        }));
    }

    #[test]
    fn messages_pluralize() {
        assert_eq!(eval(1).success_message(), "Evaluation queued for 1 conversation");
        assert_eq!(eval(3).success_message(), "Evaluation queued for 3 conversations");
    }
}
