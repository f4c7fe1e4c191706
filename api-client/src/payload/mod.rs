mod chat;
mod single;

use serde_json::Value;

use crate::error::Result;

pub(crate) use crate::payload::chat::ChatMessagesPayloadBuilder;
pub(crate) use crate::payload::single::SinglePromptPayloadBuilder;

/// Builds the provider-specific request body for one analysis call.
pub(crate) trait PayloadBuilder {
    fn build(&self, file_name: &str, source: &str) -> Result<Value>;
}
