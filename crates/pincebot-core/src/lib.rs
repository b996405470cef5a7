pub mod config;
pub mod error;
pub mod types;

pub use error::{PincebotError, Result};
pub use types::{ConversationKey, EventId, RelatedLink, SanitizedText};
