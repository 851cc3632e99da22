// Domain records shared by the repository, the engine and the views.

pub mod bot;
pub mod conversation;

pub use bot::*;
pub use conversation::*;
