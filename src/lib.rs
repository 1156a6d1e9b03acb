//! Local AI assistant chat panel.
//!
//! The panel page is rendered from stored conversation turns, talks to the
//! controller over a WebSocket, and the controller forwards each question to
//! a remote question-answering backend over HTTP.

pub mod bridge;
pub mod config;
pub mod history;
pub mod message;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
