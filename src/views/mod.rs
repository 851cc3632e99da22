pub mod bots;
pub mod conversations;
pub mod prompt_rules;
pub mod settings;

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use iocraft::prelude::State;

use crate::engine::{Command, CommandTracker, EngineHandle, Event, Request};
use crate::theme::ResolvedTheme;

/// Rows a view spends on its footer, table header and borders.
pub(crate) const CHROME_ROWS: u16 = 5;

/// Engine reply channel owned by one view.
pub(crate) type EventChannel = (Sender<Event>, Arc<Mutex<Receiver<Event>>>);

pub(crate) fn new_event_channel() -> EventChannel {
    let (tx, rx) = std::sync::mpsc::channel::<Event>();
    (tx, Arc::new(Mutex::new(rx)))
}

/// Everything currently waiting on the channel.
pub(crate) fn drain_events(rx: &Mutex<Receiver<Event>>) -> Vec<Event> {
    let rx = rx.lock().unwrap();
    let mut evts = Vec::new();
    while let Ok(evt) = rx.try_recv() {
        evts.push(evt);
    }
    evts
}

/// Issue a ticket for `command`, mark it pending and hand it to the engine.
pub(crate) fn run_command(
    engine: Option<&EngineHandle>,
    tracker: &mut State<CommandTracker>,
    command: Command,
    reply_tx: &Sender<Event>,
) {
    let mut t = tracker.read().clone();
    let ticket = t.issue(&command);
    tracker.set(t);
    tracing::debug!(%ticket, command = command.name(), "issued");
    if let Some(engine) = engine {
        engine.send(Request::Run {
            ticket,
            command,
            reply_tx: reply_tx.clone(),
        });
    }
}

/// Record a command outcome event; returns false for anything else.
pub(crate) fn resolve_command(tracker: &mut State<CommandTracker>, event: &Event) -> bool {
    let mut t = tracker.read().clone();
    let changed = t.resolve(event);
    if changed {
        tracker.set(t);
    }
    changed
}

/// Fallback theme when none is provided via props.
pub(crate) fn default_theme() -> ResolvedTheme {
    use crate::config::types::Theme;
    use crate::theme::Background;
    ResolvedTheme::resolve(&Theme::default(), Background::Dark)
}
