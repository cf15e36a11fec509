//! Step-by-step execution of an agent run.
//!
//! A run alternates between asking the model for a decision and executing
//! the tool calls it requests:
//!
//! ```text
//! Deciding -> (Acting -> Deciding)* -> Terminal
//! ```
//!
//! Tool calls of one response run sequentially in the order requested.

use promptrail_core::{generate_run_id, Message, ToolCall, Usage};
use promptrail_models::ModelRequest;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::errors::AgentRunError;
use crate::result::AgentRunResult;

/// Observation name of one model decision.
pub const DECIDE_OBSERVATION: &str = "agent.decide";

/// Where a run currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    /// The model is asked what to do next.
    Deciding,
    /// The model requested these tool calls.
    Acting(Vec<ToolCall>),
    /// The model answered without tool calls.
    Terminal,
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The model requested this many tool calls.
    ToolCallsRequested(usize),
    /// This many tool calls were executed.
    ToolsExecuted(usize),
    /// The run is finished.
    Finished,
}

/// An agent run in progress.
#[derive(Debug)]
pub struct AgentRun<'a> {
    agent: &'a Agent,
    transcript: Vec<Message>,
    usage: Usage,
    run_id: String,
    iterations: usize,
    state: RunState,
}

impl<'a> AgentRun<'a> {
    /// Start a run from the initial conversation.
    pub fn new(agent: &'a Agent, initial_messages: Vec<Message>) -> Self {
        Self {
            agent,
            transcript: initial_messages,
            usage: Usage::new(),
            run_id: generate_run_id(),
            iterations: 0,
            state: RunState::Deciding,
        }
    }

    /// Step until the model gives a final answer.
    pub async fn run_to_completion(mut self) -> Result<AgentRunResult, AgentRunError> {
        while !self.is_finished() {
            self.step().await?;
        }
        info!(
            run_id = %self.run_id,
            iterations = self.iterations,
            messages = self.transcript.len(),
            "Agent run finished"
        );
        Ok(AgentRunResult {
            transcript: self.transcript,
            usage: self.usage,
            run_id: self.run_id,
            iterations: self.iterations,
        })
    }

    /// Execute one Deciding or Acting step.
    pub async fn step(&mut self) -> Result<StepResult, AgentRunError> {
        match std::mem::replace(&mut self.state, RunState::Deciding) {
            RunState::Deciding => self.decide().await,
            RunState::Acting(calls) => self.act(calls).await,
            RunState::Terminal => {
                self.state = RunState::Terminal;
                Ok(StepResult::Finished)
            }
        }
    }

    async fn decide(&mut self) -> Result<StepResult, AgentRunError> {
        if self.iterations >= self.agent.max_iterations {
            return Err(AgentRunError::MaxIterationsExceeded {
                max_iterations: self.agent.max_iterations,
            });
        }
        self.iterations += 1;

        let mut request = ModelRequest::new(self.agent.config.clone(), self.transcript.clone())
            .with_tools(self.agent.tool_definitions.clone());
        if let Some(system) = &self.agent.system_prompt {
            request = request.with_system(system.clone());
        }

        debug!(
            run_id = %self.run_id,
            iteration = self.iterations,
            messages = request.messages.len(),
            "Requesting model decision"
        );
        let response = self
            .agent
            .tracer
            .observe(DECIDE_OBSERVATION, &request, self.agent.model.invoke(&request))
            .await?;

        self.usage += response.usage;
        let calls = response.message.tool_calls.clone();
        self.transcript.push(response.message);

        if calls.is_empty() {
            self.state = RunState::Terminal;
            Ok(StepResult::Finished)
        } else {
            let count = calls.len();
            self.state = RunState::Acting(calls);
            Ok(StepResult::ToolCallsRequested(count))
        }
    }

    async fn act(&mut self, calls: Vec<ToolCall>) -> Result<StepResult, AgentRunError> {
        let tools = &self.agent.tools;
        let count = calls.len();

        for call in calls {
            if !tools.contains(&call.name) {
                return Err(AgentRunError::UnknownTool {
                    name: call.name,
                    available: tools.names().map(str::to_string).collect(),
                });
            }

            debug!(run_id = %self.run_id, tool = %call.name, call_id = %call.id, "Calling tool");
            let observation = format!("tool.{}", call.name);
            let content = self
                .agent
                .tracer
                .observe(&observation, &call.arguments, async {
                    tools
                        .call(&call.name, call.arguments.clone())
                        .await
                        .map(|ret| ret.to_message_content())
                })
                .await
                .map_err(|e| AgentRunError::tool(call.name.clone(), e))?;

            self.transcript
                .push(Message::tool(call.id, call.name, content));
        }

        self.state = RunState::Deciding;
        Ok(StepResult::ToolsExecuted(count))
    }

    /// Messages so far.
    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    /// Usage so far.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Run ID.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Model calls made so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Current state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Check whether the run reached its final answer.
    pub fn is_finished(&self) -> bool {
        self.state == RunState::Terminal
    }
}
