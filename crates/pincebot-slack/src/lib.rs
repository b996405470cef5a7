//! Slack side of pincebot: inbound event and interactivity models, the bot
//! filter, event routing into the aggregator, answer delivery and the Web
//! API client that posts everything back.

pub mod ack;
pub mod actions;
pub mod blocks;
pub mod client;
pub mod delivery;
pub mod error;
pub mod events;
pub mod filter;
pub mod platform;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use ack::ProcessingMarker;
pub use actions::FeedbackHandler;
pub use client::SlackClient;
pub use delivery::Delivery;
pub use error::SlackError;
pub use filter::BotFilter;
pub use platform::ChatPlatform;
pub use router::{EventRouter, RouteOutcome};
