use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use qa_board::config::types::ExportConfig;
use qa_board::engine::{Command, CommandTracker, Engine, EngineHandle, Event, MockEngine, Request};
use qa_board::filter::{ConversationFilter, QuickFilter};
use qa_board::repository::MockRepository;

const TIMEOUT: Duration = Duration::from_secs(2);

fn start(failing: bool) -> EngineHandle {
    let repo = MockRepository::embedded().unwrap();
    MockEngine::new(Arc::new(repo)).failing(failing).start()
}

fn next(rx: &Receiver<Event>) -> Event {
    rx.recv_timeout(TIMEOUT).expect("engine did not answer")
}

#[test]
fn list_bots_returns_sample_bots() {
    let engine = start(false);
    let (tx, rx) = channel();
    engine.send(Request::ListBots { reply_tx: tx });
    match next(&rx) {
        Event::BotsListed { bots } => {
            assert_eq!(bots.len(), 6);
            assert_eq!(bots[0].id, "bot_123");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn list_conversations_applies_filter() {
    let engine = start(false);
    let (tx, rx) = channel();
    engine.send(Request::ListConversations {
        filter: ConversationFilter {
            quick: [QuickFilter::NeedFix].into_iter().collect(),
            ..Default::default()
        },
        reply_tx: tx,
    });
    match next(&rx) {
        Event::ConversationsListed { conversations } => {
            let ids: Vec<&str> = conversations.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, ["9f7a2b3c", "8e93f4c2", "2c81e5a4"]);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn fetch_detail_for_known_and_unknown_ids() {
    let engine = start(false);
    let (tx, rx) = channel();
    engine.send(Request::FetchDetail {
        conversation_id: "7b21c5d4".to_owned(),
        reply_tx: tx.clone(),
    });
    match next(&rx) {
        Event::DetailFetched {
            conversation_id,
            detail,
        } => {
            assert_eq!(conversation_id, "7b21c5d4");
            assert!(!detail.transcript.is_empty());
            assert!(detail.duration_secs > 0);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    engine.send(Request::FetchDetail {
        conversation_id: "nope".to_owned(),
        reply_tx: tx,
    });
    match next(&rx) {
        Event::FetchError { context, .. } => assert!(context.contains("nope")),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn commands_are_acknowledged_with_their_ticket() {
    let engine = start(false);
    let (tx, rx) = channel();
    let mut tracker = CommandTracker::new();
    let command = Command::RunEvaluation {
        conversation_ids: vec!["9f7a2b3c".to_owned(), "2c81e5a4".to_owned()],
    };
    let ticket = tracker.issue(&command);
    assert_eq!(tracker.pending_count(), 1);

    engine.send(Request::Run {
        ticket,
        command,
        reply_tx: tx,
    });
    let event = next(&rx);
    match &event {
        Event::CommandSucceeded { ticket: t, message } => {
            assert_eq!(*t, ticket);
            assert_eq!(message, "Evaluation queued for 2 conversations");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(tracker.resolve(&event));
    assert_eq!(tracker.pending_count(), 0);
}

#[test]
fn failing_engine_rejects_commands() {
    let engine = start(true);
    let (tx, rx) = channel();
    let mut tracker = CommandTracker::new();
    let command = Command::Export {
        conversation_ids: vec!["9f7a2b3c".to_owned()],
        options: ExportConfig::default(),
    };
    let ticket = tracker.issue(&command);
    engine.send(Request::Run {
        ticket,
        command,
        reply_tx: tx,
    });
    let event = next(&rx);
    match &event {
        Event::CommandFailed { ticket: t, message } => {
            assert_eq!(*t, ticket);
            assert!(message.contains("export"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(tracker.resolve(&event));
    let status = tracker.status(ticket).unwrap();
    assert!(!status.is_pending());
}

#[test]
fn latency_delays_acknowledgment_without_blocking_reads() {
    let repo = MockRepository::embedded().unwrap();
    let engine = MockEngine::new(Arc::new(repo))
        .with_latency(Duration::from_millis(200))
        .start();
    let (tx, rx) = channel();
    let mut tracker = CommandTracker::new();
    let command = Command::ViewHistory;
    let ticket = tracker.issue(&command);
    engine.send(Request::Run {
        ticket,
        command,
        reply_tx: tx.clone(),
    });
    engine.send(Request::ListBots { reply_tx: tx });

    assert!(matches!(next(&rx), Event::BotsListed { .. }));
    assert!(matches!(
        next(&rx),
        Event::CommandSucceeded { ticket: t, .. } if t == ticket
    ));
}

#[test]
fn shutdown_stops_the_engine() {
    let engine = start(false);
    engine.send(Request::Shutdown);
    let (tx, rx) = channel();
    engine.send(Request::ListBots { reply_tx: tx });
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}
