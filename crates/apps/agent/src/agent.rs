//! Orchestration loop between the reasoning service and the tool layer.

use desktop_runtime::{DesktopShell, DesktopState};
use desktop_vfs::Vfs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::AgentConfig,
    service::{ChatMessage, Conversation, ModelTurn, ReasoningService, ServiceError, ToolResponse},
    tools::{execute_function_call, tool_declarations, TASK_COMPLETE},
};

pub const GREETING: &str = "Hello! I am the StarOS Agent. How can I help you today?";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("invalid agent config: {0}")]
    Config(String),
}

/// One line of the chat log shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "kebab-case")]
pub enum TranscriptItem {
    User(String),
    AgentThought(String),
    AgentToolResult(String),
    AgentResponse(String),
    Error(String),
}

impl TranscriptItem {
    pub fn text(&self) -> &str {
        match self {
            Self::User(text)
            | Self::AgentThought(text)
            | Self::AgentToolResult(text)
            | Self::AgentResponse(text)
            | Self::Error(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// The model called `taskComplete`.
    Completed { reason: String },
    /// The model answered with text and no tool calls.
    Responded,
    /// The turn budget ran out first.
    IterationLimit,
}

/// Describes the filesystem tree and open windows for the model.
pub fn system_instruction(fs: &Vfs, desktop: &DesktopState) -> String {
    let windows = if desktop.windows.is_empty() {
        "None".to_string()
    } else {
        desktop
            .windows
            .iter()
            .map(|w| format!("- ID: {}, App: {}, Title: {}", w.id, w.app_id, w.title))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "You are StarOS Agent, a helpful AI assistant integrated into a web-based operating system.
You can use tools to interact with the OS on the user's behalf.
Current OS State:
- Filesystem:
{}
- Open Windows:
{windows}

Think step-by-step. When the user's request is fully complete, you MUST call the \"taskComplete\" function.",
        fs.render_tree()
    )
}

#[derive(Debug, Clone)]
pub struct Agent {
    config: AgentConfig,
    transcript: Vec<TranscriptItem>,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl Agent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            transcript: vec![TranscriptItem::AgentResponse(GREETING.to_string())],
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn transcript(&self) -> &[TranscriptItem] {
        &self.transcript
    }

    /// Runs one user request to completion.
    ///
    /// Tool calls go straight to `shell`; a service failure is recorded in the transcript and
    /// returned, leaving whatever the earlier tool calls already did in place.
    pub async fn run(
        &mut self,
        shell: &mut DesktopShell,
        service: &dyn ReasoningService,
        prompt: &str,
    ) -> Result<AgentOutcome, AgentError> {
        if prompt.trim().is_empty() {
            return Err(AgentError::EmptyPrompt);
        }
        self.transcript.push(TranscriptItem::User(prompt.to_string()));

        let mut conversation = Conversation {
            model: self.config.model.clone(),
            system_instruction: system_instruction(&shell.fs(), shell.desktop()),
            tools: tool_declarations(),
            messages: vec![ChatMessage::User {
                text: prompt.to_string(),
            }],
        };

        let result = self.drive(shell, service, &mut conversation).await;
        if let Err(err) = &result {
            warn!("agent service error: {err}");
            self.transcript.push(TranscriptItem::Error(format!("Error: {err}")));
        }
        result
    }

    async fn drive(
        &mut self,
        shell: &mut DesktopShell,
        service: &dyn ReasoningService,
        conversation: &mut Conversation,
    ) -> Result<AgentOutcome, AgentError> {
        let mut turn = service.generate(conversation).await?;

        for _ in 0..self.config.max_iterations {
            conversation.push(ChatMessage::Model { turn: turn.clone() });
            if turn.function_calls.is_empty() {
                if let Some(text) = turn.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    self.transcript
                        .push(TranscriptItem::AgentResponse(text.to_string()));
                }
                return Ok(AgentOutcome::Responded);
            }

            let names: Vec<&str> = turn
                .function_calls
                .iter()
                .map(|call| call.name.as_str())
                .collect();
            info!(calls = ?names, "agent turn");
            self.transcript.push(TranscriptItem::AgentThought(format!(
                "Calling {}...",
                names.join(", ")
            )));

            let (responses, completed) = self.run_calls(shell, &turn);
            let results: Vec<Value> = responses.iter().map(|r| r.response.clone()).collect();
            self.transcript.push(TranscriptItem::AgentToolResult(format!(
                "Tool results: {}",
                Value::Array(results)
            )));

            if let Some(reason) = completed {
                return Ok(AgentOutcome::Completed { reason });
            }

            conversation.push(ChatMessage::ToolResponses { responses });
            turn = service.generate(conversation).await?;
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "agent stopped at iteration limit"
        );
        Ok(AgentOutcome::IterationLimit)
    }

    /// Executes the calls of one turn in order. A `taskComplete` call stops the batch.
    fn run_calls(
        &mut self,
        shell: &mut DesktopShell,
        turn: &ModelTurn,
    ) -> (Vec<ToolResponse>, Option<String>) {
        let mut responses = Vec::new();
        for call in &turn.function_calls {
            let response = execute_function_call(shell, call);
            if call.name == TASK_COMPLETE {
                let reason = response
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                self.transcript
                    .push(TranscriptItem::AgentResponse(reason.clone()));
                return (responses, Some(reason));
            }
            responses.push(ToolResponse {
                name: call.name.clone(),
                id: call.id.clone(),
                response,
            });
        }
        (responses, None)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use desktop_runtime::{AppId, ManualClock, ShellConfig};
    use desktop_vfs::{VfsPath, VfsStore};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{service::ReasoningFuture, tools::FunctionCall};

    /// Replays canned turns and records how many messages each request carried.
    struct Scripted {
        turns: RefCell<VecDeque<Result<ModelTurn, ServiceError>>>,
        seen: RefCell<Vec<usize>>,
    }

    impl Scripted {
        fn new(turns: Vec<Result<ModelTurn, ServiceError>>) -> Self {
            Self {
                turns: RefCell::new(turns.into()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReasoningService for Scripted {
        fn generate<'a>(
            &'a self,
            conversation: &'a Conversation,
        ) -> ReasoningFuture<'a, Result<ModelTurn, ServiceError>> {
            self.seen.borrow_mut().push(conversation.messages.len());
            let next = self
                .turns
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(ModelTurn::calls(vec![list_home()])));
            Box::pin(async move { next })
        }
    }

    fn list_home() -> FunctionCall {
        FunctionCall::new("getDirectoryListing", json!({ "path": ["home", "guest"] }))
    }

    fn shell() -> DesktopShell {
        let config = ShellConfig {
            placement_seed: Some(2),
            ..ShellConfig::default()
        };
        DesktopShell::with_parts(config, VfsStore::default(), ManualClock::new(0)).expect("shell")
    }

    #[test]
    fn task_complete_ends_the_loop_and_skips_later_calls() {
        let mut shell = shell();
        let service = Scripted::new(vec![
            Ok(ModelTurn::calls(vec![FunctionCall::new(
                "createFile",
                json!({ "path": ["home", "guest", "todo.txt"], "content": "milk" }),
            )])),
            Ok(ModelTurn::calls(vec![
                FunctionCall::new("taskComplete", json!({ "reason": "Created todo.txt" })),
                FunctionCall::new("deleteNode", json!({ "path": ["home", "guest", "todo.txt"] })),
            ])),
        ]);
        let mut agent = Agent::default();

        let outcome = block_on(agent.run(&mut shell, &service, "make a todo")).expect("run");

        assert_eq!(
            outcome,
            AgentOutcome::Completed {
                reason: "Created todo.txt".to_string()
            }
        );
        assert_eq!(
            shell.fs().read(&VfsPath::parse("/home/guest/todo.txt")),
            Ok("milk")
        );
        assert_eq!(
            agent.transcript(),
            &[
                TranscriptItem::AgentResponse(GREETING.to_string()),
                TranscriptItem::User("make a todo".to_string()),
                TranscriptItem::AgentThought("Calling createFile...".to_string()),
                TranscriptItem::AgentToolResult("Tool results: [{\"success\":true}]".to_string()),
                TranscriptItem::AgentThought("Calling taskComplete, deleteNode...".to_string()),
                TranscriptItem::AgentResponse("Created todo.txt".to_string()),
                TranscriptItem::AgentToolResult("Tool results: []".to_string()),
            ]
        );
        assert_eq!(*service.seen.borrow(), vec![1, 3]);
    }

    #[test]
    fn plain_text_reply_is_recorded_as_response() {
        let mut shell = shell();
        let service = Scripted::new(vec![Ok(ModelTurn::text("  Nothing to do.  "))]);
        let mut agent = Agent::default();

        let outcome = block_on(agent.run(&mut shell, &service, "hi")).expect("run");

        assert_eq!(outcome, AgentOutcome::Responded);
        assert_eq!(
            agent.transcript().last(),
            Some(&TranscriptItem::AgentResponse("Nothing to do.".to_string()))
        );
    }

    #[test]
    fn iteration_ceiling_stops_a_looping_model() {
        let mut shell = shell();
        let service = Scripted::new(Vec::new());
        let mut agent = Agent::new(AgentConfig {
            max_iterations: 3,
            ..AgentConfig::default()
        });

        let outcome = block_on(agent.run(&mut shell, &service, "loop")).expect("run");

        assert_eq!(outcome, AgentOutcome::IterationLimit);
        assert_eq!(service.seen.borrow().len(), 4);
        let thoughts = agent
            .transcript()
            .iter()
            .filter(|item| matches!(item, TranscriptItem::AgentThought(_)))
            .count();
        assert_eq!(thoughts, 3);
    }

    #[test]
    fn service_failure_is_logged_in_transcript_and_keeps_earlier_effects() {
        let mut shell = shell();
        let service = Scripted::new(vec![
            Ok(ModelTurn::calls(vec![FunctionCall::new(
                "openApp",
                json!({ "appId": "terminal" }),
            )])),
            Err(ServiceError("quota exceeded".to_string())),
        ]);
        let mut agent = Agent::default();

        let err = block_on(agent.run(&mut shell, &service, "open a terminal"))
            .expect_err("service fails");

        assert_eq!(err, AgentError::Service(ServiceError("quota exceeded".to_string())));
        assert_eq!(
            agent.transcript().last(),
            Some(&TranscriptItem::Error("Error: quota exceeded".to_string()))
        );
        assert_eq!(
            shell.desktop().active_window().map(|w| w.app_id),
            Some(AppId::Terminal)
        );
    }

    #[test]
    fn empty_prompt_is_rejected_before_contacting_service() {
        let mut shell = shell();
        let service = Scripted::new(Vec::new());
        let mut agent = Agent::default();

        assert_eq!(
            block_on(agent.run(&mut shell, &service, "   ")),
            Err(AgentError::EmptyPrompt)
        );
        assert!(service.seen.borrow().is_empty());
        assert_eq!(agent.transcript().len(), 1);
    }

    #[test]
    fn system_instruction_lists_tree_and_windows() {
        let mut shell = shell();
        let fs = shell.fs();
        let empty = system_instruction(&fs, shell.desktop());
        assert!(empty.contains("- Open Windows:\nNone"));
        assert!(empty.contains("- Filesystem:\n~/\n  home/\n    guest/"));

        let id = shell.open_app(AppId::Notes).expect("open");
        let text = system_instruction(&shell.fs(), shell.desktop());
        assert!(text.contains(&format!("- ID: {id}, App: notes, Title: Notes")));
    }
}
