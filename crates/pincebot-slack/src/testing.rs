//! Recording fakes shared by this crate's unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use pincebot_assistant::Answer;

use crate::error::SlackError;
use crate::platform::ChatPlatform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddReaction { channel: String, ts: String, name: String },
    RemoveReaction { channel: String, ts: String, name: String },
    PostAnswer { channel: String, thread_ts: String, answer: Answer },
    PostReply { channel: String, thread_ts: String, text: String },
}

/// Records every call; optionally fails them all after recording.
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingPlatform {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), SlackError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(SlackError::Api {
                method: "test".into(),
                error: "ratelimited".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn add_reaction(&self, channel: &str, ts: &str, name: &str) -> Result<(), SlackError> {
        self.record(Call::AddReaction {
            channel: channel.into(),
            ts: ts.into(),
            name: name.into(),
        })
    }

    async fn remove_reaction(
        &self,
        channel: &str,
        ts: &str,
        name: &str,
    ) -> Result<(), SlackError> {
        self.record(Call::RemoveReaction {
            channel: channel.into(),
            ts: ts.into(),
            name: name.into(),
        })
    }

    async fn post_answer(
        &self,
        channel: &str,
        thread_ts: &str,
        answer: &Answer,
    ) -> Result<(), SlackError> {
        self.record(Call::PostAnswer {
            channel: channel.into(),
            thread_ts: thread_ts.into(),
            answer: answer.clone(),
        })
    }

    async fn post_reply(
        &self,
        channel: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        self.record(Call::PostReply {
            channel: channel.into(),
            thread_ts: thread_ts.into(),
            text: text.into(),
        })
    }
}
