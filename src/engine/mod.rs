// Backend seam between the views and the in-process mock engine.

pub mod command;
mod interface;
pub mod mock;

pub use command::{Command, CommandStatus, CommandTracker, Ticket};
pub use interface::{Engine, EngineHandle, Event, Request};
pub use mock::MockEngine;
