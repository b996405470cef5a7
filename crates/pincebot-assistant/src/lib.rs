//! Answer pipeline: sanitize the question, stream an answer from the
//! documentation assistant, filter non-answers and sanitize the result.

pub mod error;
pub mod mintlify;
pub mod pipeline;
pub mod provider;
pub mod refusal;
pub mod stream;

pub use error::AssistantError;
pub use mintlify::MintlifyBackend;
pub use pipeline::{Answer, AnswerPipeline};
pub use provider::AssistantBackend;
pub use stream::StreamEvent;
