//! Augur CLI library: argument definitions, commands and the API server.
//!
//! Exposed as a library so integration tests can drive the router without
//! binding a socket.

pub mod cli;
pub mod commands;
pub mod server;
