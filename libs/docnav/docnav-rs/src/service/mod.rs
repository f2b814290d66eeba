pub mod backend;
pub mod documents;
pub mod events;
pub mod folders;
pub mod logging;
pub mod navigation;
pub mod preview;
pub mod search;
pub mod session;
pub mod state;
pub mod upload;
