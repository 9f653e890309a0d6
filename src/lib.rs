//! # Roster
//!
//! `roster` is a terminal front-end for a remote users collection service.
//! It lists the users the service knows about, lets an operator draft and
//! submit a new user, and refetches the list after every successful write.
//! All persistence belongs to the remote service; the client keeps nothing.

pub mod cli;
pub mod client;
pub mod view;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
