//! Reasoning service contract.
//!
//! The agent keeps the whole conversation and hands it to the service on every turn, so
//! implementations can stay stateless.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tools::{FunctionCall, ToolDeclaration};

/// Object-safe boxed future used by [`ReasoningService`].
pub type ReasoningFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Failure reported by the remote service (transport, quota, malformed reply).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ServiceError(pub String);

/// One reply from the model: tool calls to run, or plain text when it is done talking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTurn {
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ModelTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            function_calls: Vec::new(),
            text: Some(text.into()),
        }
    }

    pub fn calls(function_calls: Vec<FunctionCall>) -> Self {
        Self {
            function_calls,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum ChatMessage {
    User { text: String },
    Model { turn: ModelTurn },
    ToolResponses { responses: Vec<ToolResponse> },
}

/// Everything the service needs to produce the next turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub model: String,
    pub system_instruction: String,
    pub tools: Vec<ToolDeclaration>,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

/// Remote model that decides which tools to call.
pub trait ReasoningService {
    /// Produces the model's next turn for `conversation`.
    fn generate<'a>(
        &'a self,
        conversation: &'a Conversation,
    ) -> ReasoningFuture<'a, Result<ModelTurn, ServiceError>>;
}
