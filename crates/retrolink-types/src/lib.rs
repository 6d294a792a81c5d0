//! Foundation types for retrolink.
//!
//! This crate holds the types shared by the transports, the command core and
//! the embedding frontend: the virtual-button identifier space and its
//! per-frame state vector, the frontend event vocabulary, configuration, and
//! error types.

pub mod config;
pub mod error;
pub mod event;
pub mod input;
