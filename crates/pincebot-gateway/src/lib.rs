//! HTTP front of pincebot: Slack Events API and interactivity endpoints plus
//! a health probe. The binary in `main.rs` wires config and collaborators.

pub mod app;
pub mod http;
