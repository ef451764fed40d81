//! # Vigil console
//!
//! The asynchronous control layer of an operator console driving durable
//! security workflows: a vulnerability scan and a human-approved
//! issue-filing flow.
//!
//! The hard part is the bridge, not the rendering: a single-writer event
//! loop ([`app::App`]) dispatches deferred commands
//! ([`commands`]) that each perform one blocking interaction with the
//! workflow gateway or the report store and resolve to exactly one typed
//! [`message::Message`]. The loop consumes messages on its own turn,
//! mutates its state, and issues follow-up commands — notably the approval
//! hand-off, where starting an issue workflow returns a handle immediately
//! and the operator's decision is later delivered to that handle as a
//! signal.

pub mod app;
pub mod commands;
pub mod config;
pub mod frontend;
pub mod message;
pub mod render;
pub mod workflows;
