//! HTTP server exposing an MLTE artifact store.
//!
//! The routes are the wire protocol spoken by
//! [`mlte_store::RemoteHttpStore`]; [`client::InProcessClient`] connects the
//! two without a socket.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
