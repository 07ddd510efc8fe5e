//! Natural-language agent: tool layer over the desktop shell plus the turn loop that drives a
//! [`ReasoningService`].

pub mod agent;
pub mod config;
pub mod service;
pub mod tools;

pub use agent::{system_instruction, Agent, AgentError, AgentOutcome, TranscriptItem, GREETING};
pub use config::AgentConfig;
pub use service::{
    ChatMessage, Conversation, ModelTurn, ReasoningFuture, ReasoningService, ServiceError,
    ToolResponse,
};
pub use tools::{
    execute_function_call, execute_tool, tool_declarations, FunctionCall, ToolCall,
    ToolDeclaration,
};
