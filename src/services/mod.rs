pub mod collab;
pub mod content;
pub mod ranking;
