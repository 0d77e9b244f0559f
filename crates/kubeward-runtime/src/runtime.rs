//! The agent runtime.

use dashmap::DashMap;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use kubeward_approval::{ApprovalGateway, ToolResolution};
use kubeward_audit::{
    ApprovalOutcome, AuditEntry, AuditFilter, AuditLog, JsonlAuditSink, MemoryAuditSink,
};
use kubeward_cluster::{ClusterExecutor, ExecutionEngine, ToolResult};
use kubeward_config::GatewayConfig;
use kubeward_core::{ApprovalId, SessionId, Timestamp};
use kubeward_events::{AgentEvent, EventEmitter, EventReceiver, channel};
use kubeward_llm::{
    LlmError, LlmProvider, LlmToolDefinition, Message, StreamEvent, ToolCall, ToolCallResult,
};
use kubeward_safety::{RiskAssessment, RiskClassifier, SafetyAnalyzer, assess_with_analyzer};

use crate::error::{RuntimeError, RuntimeResult};
use crate::session::SessionStore;
use crate::state::LoopState;

/// Feedback to the model when a human rejects a call.
const REJECTED_BY_USER: &str = "Tool execution cancelled by user";
/// Feedback to the model when the approval wait expires.
const REJECTED_BY_TIMEOUT: &str = "Tool execution was not approved before the timeout";

/// Deadline for the advisory deep analyzer. Advisory only, so it is kept
/// short: a slow analyzer must not stall the loop.
const ADVISORY_TIMEOUT: Duration = Duration::from_secs(10);

/// System prompt for the cluster assistant.
const SYSTEM_PROMPT: &str = "You are a Kubernetes operations assistant. You can inspect and \
     operate the cluster through the kubectl tool. Prefer read-only commands when answering \
     questions. State-changing commands may be held for human approval; when one is rejected, \
     do not retry it, explain the situation instead.";

/// The tool surface advertised to the model: one kubectl command runner.
fn tool_definitions() -> Vec<LlmToolDefinition> {
    vec![
        LlmToolDefinition::new("kubectl")
            .with_description("Run a kubectl command against the cluster and return its output")
            .with_schema(serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The full kubectl command line to run"
                    },
                    "namespace": {
                        "type": "string",
                        "description": "Namespace the command targets, when known"
                    }
                },
                "required": ["command"]
            })),
    ]
}

/// The gateway's orchestration core.
///
/// Holds the classifier, the optional advisory analyzer, the approval
/// gateway, the execution engine, the audit log, and the session store. One
/// [`AgentRuntime::submit`] call spawns one task and returns the event stream
/// for that request.
pub struct AgentRuntime<P: LlmProvider> {
    provider: Arc<P>,
    classifier: RiskClassifier,
    analyzer: Option<Arc<dyn SafetyAnalyzer>>,
    gateway: ApprovalGateway,
    engine: ExecutionEngine,
    audit: AuditLog,
    sessions: SessionStore,
    config: GatewayConfig,
    states: Arc<DashMap<SessionId, LoopState>>,
    cancellations: Arc<DashMap<SessionId, CancellationToken>>,
}

impl<P: LlmProvider> Clone for AgentRuntime<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            classifier: self.classifier,
            analyzer: self.analyzer.clone(),
            gateway: self.gateway.clone(),
            engine: self.engine.clone(),
            audit: self.audit.clone(),
            sessions: self.sessions.clone(),
            config: self.config.clone(),
            states: Arc::clone(&self.states),
            cancellations: Arc::clone(&self.cancellations),
        }
    }
}

impl<P: LlmProvider + 'static> AgentRuntime<P> {
    /// Create a runtime.
    ///
    /// The audit sink follows the config: JSON lines at `audit_log_path`, or
    /// in-memory when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit file's directory cannot be created.
    pub fn new(
        provider: P,
        executor: Arc<dyn ClusterExecutor>,
        config: GatewayConfig,
    ) -> RuntimeResult<Self> {
        let classifier = if config.strict_mode {
            RiskClassifier::strict()
        } else {
            RiskClassifier::new()
        };

        let audit = match &config.audit_log_path {
            Some(path) => AuditLog::new(Arc::new(JsonlAuditSink::new(path)?)),
            None => AuditLog::new(Arc::new(MemoryAuditSink::new())),
        };

        let engine = ExecutionEngine::new(executor, config.tool_timeout());

        info!(
            strict_mode = config.strict_mode,
            approval_timeout_secs = config.approval_timeout_secs,
            max_turns = config.max_turns,
            "Agent runtime initialized"
        );

        Ok(Self {
            provider: Arc::new(provider),
            classifier,
            analyzer: None,
            gateway: ApprovalGateway::new(),
            engine,
            audit,
            sessions: SessionStore::new(),
            config,
            states: Arc::new(DashMap::new()),
            cancellations: Arc::new(DashMap::new()),
        })
    }

    /// Attach an advisory deep analyzer.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn SafetyAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Submit one chat message.
    ///
    /// Resolves the session (creating one when `session_id` is `None`),
    /// spawns the agent task, and returns the request's event stream. The
    /// first event is always [`AgentEvent::Session`]; the last is always
    /// [`AgentEvent::End`].
    pub fn submit(&self, session_id: Option<SessionId>, message: impl Into<String>) -> EventReceiver {
        let (emitter, receiver) = channel();
        let session_id = self.sessions.get_or_create(session_id);
        self.sessions
            .set_provider(&session_id, self.provider.name(), self.provider.model());

        let token = CancellationToken::new();
        self.cancellations
            .insert(session_id.clone(), token.clone());

        let runtime = self.clone();
        let message = message.into();
        tokio::spawn(async move {
            emitter.emit(AgentEvent::Session {
                session_id: session_id.clone(),
            });

            tokio::select! {
                () = token.cancelled() => {
                    info!(session_id = %session_id, "Request cancelled");
                    runtime.gateway.cancel_session(&session_id);
                    runtime.set_state(&session_id, LoopState::Failed);
                },
                result = runtime.run_turn(&session_id, message, &emitter) => {
                    match result {
                        Ok(()) => runtime.set_state(&session_id, LoopState::Done),
                        Err(e) => {
                            error!(session_id = %session_id, error = %e, "Agent turn failed");
                            emitter.emit(AgentEvent::Text(format!("Error: {e}")));
                            runtime.set_state(&session_id, LoopState::Failed);
                        },
                    }
                },
            }

            runtime.cancellations.remove(&session_id);
            emitter.finish();
        });

        receiver
    }

    /// Deliver a human decision for a held tool call.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown or already-resolved ids.
    pub fn resolve(&self, approval_id: &ApprovalId, approved: bool) -> RuntimeResult<()> {
        self.gateway.resolve(approval_id, approved)?;
        Ok(())
    }

    /// Cancel a session's in-flight request.
    ///
    /// Rejects its outstanding approvals and stops the agent task. Audit
    /// entries already written are untouched.
    pub fn cancel(&self, session_id: &SessionId) {
        if let Some(token) = self.cancellations.get(session_id) {
            token.cancel();
        }
        self.gateway.cancel_session(session_id);
    }

    /// Query the audit trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be read.
    pub fn query_audit(&self, filter: &AuditFilter) -> RuntimeResult<Vec<AuditEntry>> {
        Ok(self.audit.query(filter)?)
    }

    /// Where a session's last request is (or ended up) in the loop.
    #[must_use]
    pub fn loop_state(&self, session_id: &SessionId) -> Option<LoopState> {
        self.states.get(session_id).map(|s| *s)
    }

    /// Session registry handle.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Number of audit writes lost to sink failures.
    #[must_use]
    pub fn dropped_audit_writes(&self) -> u64 {
        self.audit.dropped_writes()
    }

    fn set_state(&self, session_id: &SessionId, state: LoopState) {
        debug!(session_id = %session_id, ?state, "Loop state");
        self.states.insert(session_id.clone(), state);
    }

    /// One full request: model round trips until a text answer or the turn
    /// limit.
    async fn run_turn(
        &self,
        session_id: &SessionId,
        message: String,
        emitter: &EventEmitter,
    ) -> RuntimeResult<()> {
        self.sessions.append(session_id, Message::user(message));
        let tools = tool_definitions();

        for _ in 0..self.config.max_turns {
            self.set_state(session_id, LoopState::AwaitingModel);
            let history = self.sessions.history(session_id);
            let stream = tokio::time::timeout(
                self.config.provider_timeout(),
                self.provider.stream(&history, &tools, SYSTEM_PROMPT),
            )
            .await
            .map_err(|_| RuntimeError::Llm(LlmError::Timeout))??;

            let (response_text, tool_calls) = self.collect_stream(stream, emitter).await?;

            if tool_calls.is_empty() {
                if !response_text.is_empty() {
                    self.set_state(session_id, LoopState::ProducingText);
                    self.sessions
                        .append(session_id, Message::assistant(response_text));
                }
                return Ok(());
            }

            self.set_state(session_id, LoopState::ToolPending);
            // Text interleaved with tool calls stays in the transcript.
            let mut assistant = Message::assistant_with_tools(tool_calls.clone());
            assistant.content = response_text;
            self.sessions.append(session_id, assistant);

            for call in &tool_calls {
                let result = self.dispatch(session_id, call, emitter).await;
                let feedback = if result.success {
                    ToolCallResult::success(&call.id, &result.output)
                } else {
                    ToolCallResult::error(&call.id, &result.output)
                };
                self.sessions
                    .append(session_id, Message::tool_result(&feedback));
            }
        }

        Err(RuntimeError::MaxTurnsExceeded {
            limit: self.config.max_turns,
        })
    }

    /// Drain one provider stream into text (emitted as it arrives) and
    /// completed tool calls.
    async fn collect_stream(
        &self,
        mut stream: kubeward_llm::StreamBox,
        emitter: &EventEmitter,
    ) -> RuntimeResult<(String, Vec<ToolCall>)> {
        let mut response_text = String::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();
        let mut current_args = String::new();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::TextDelta(text) => {
                    emitter.emit(AgentEvent::Text(text.clone()));
                    response_text.push_str(&text);
                },
                StreamEvent::ToolCallStart { id, name } => {
                    tool_calls.push(ToolCall::new(id, name));
                    current_args.clear();
                },
                StreamEvent::ToolCallDelta { id: _, args_delta } => {
                    current_args.push_str(&args_delta);
                },
                StreamEvent::ToolCallEnd { id } => {
                    if let Some(call) = tool_calls.iter_mut().find(|c| c.id == id)
                        && let Ok(args) = serde_json::from_str(&current_args)
                    {
                        call.arguments = args;
                    }
                    current_args.clear();
                },
                StreamEvent::Done => break,
                StreamEvent::Error(e) => {
                    return Err(RuntimeError::Llm(LlmError::StreamingError(e)));
                },
            }
        }

        Ok((response_text, tool_calls))
    }

    /// Dispatch one tool call: classify, gate, execute (or refuse), then
    /// emit its event and write its audit entry.
    ///
    /// Every call that reaches this point produces exactly one
    /// [`ToolResult`], one [`AgentEvent::ToolExecution`], and one
    /// [`AuditEntry`], on every path.
    async fn dispatch(
        &self,
        session_id: &SessionId,
        call: &ToolCall,
        emitter: &EventEmitter,
    ) -> ToolResult {
        let command = call.command();
        let assessment = self.assess(&command, call.namespace()).await;

        let (result, outcome) = if !assessment.allowed {
            warn!(command = %command, "Command refused by policy");
            let result = ToolResult::rejected(
                &call.id,
                format!("Command refused by policy: {}", assessment.reason),
            );
            (result, ApprovalOutcome::Rejected)
        } else if assessment.requires_approval || !self.config.auto_approve_read_only {
            self.set_state(session_id, LoopState::AwaitingApproval);
            let ticket = self
                .gateway
                .request(session_id.clone(), call.clone(), assessment.clone());
            emitter.emit(AgentEvent::ApprovalRequired {
                approval_id: ticket.id().clone(),
                command: command.clone(),
                category: assessment.category,
                risk_level: assessment.level,
            });

            match ticket.decide(self.config.approval_timeout()).await {
                ToolResolution::Approved => {
                    self.set_state(session_id, LoopState::ExecutingTool);
                    (self.engine.run(call).await, ApprovalOutcome::Approved)
                },
                ToolResolution::Rejected => (
                    ToolResult::rejected(&call.id, REJECTED_BY_USER),
                    ApprovalOutcome::Rejected,
                ),
                ToolResolution::Expired => (
                    ToolResult::rejected(&call.id, REJECTED_BY_TIMEOUT),
                    ApprovalOutcome::Rejected,
                ),
            }
        } else {
            self.set_state(session_id, LoopState::ExecutingTool);
            let outcome = if assessment.level.requires_approval() {
                ApprovalOutcome::AutoApproved
            } else {
                ApprovalOutcome::NotRequired
            };
            (self.engine.run(call).await, outcome)
        };

        emitter.emit(AgentEvent::ToolExecution {
            tool: call.name.clone(),
            command: command.clone(),
            success: result.success,
            result: result.output.clone(),
        });

        self.audit.record(&AuditEntry {
            timestamp: Timestamp::now(),
            session_id: session_id.clone(),
            actor: session_id.to_string(),
            tool: call.name.clone(),
            command,
            risk_level: assessment.level,
            approval_outcome: outcome,
            success: result.success,
            error: if result.success {
                None
            } else {
                Some(result.output.clone())
            },
        });

        result
    }

    /// Local classification, optionally merged with the advisory analyzer.
    async fn assess(&self, command: &str, namespace: Option<&str>) -> RiskAssessment {
        let local = self.classifier.classify(command, namespace);
        match &self.analyzer {
            Some(analyzer) => {
                assess_with_analyzer(local, analyzer.as_ref(), command, namespace, ADVISORY_TIMEOUT)
                    .await
            },
            None => local,
        }
    }
}

impl<P: LlmProvider> std::fmt::Debug for AgentRuntime<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRuntime")
            .field("provider", &self.provider.name())
            .field("strict_mode", &self.classifier.is_strict())
            .field("sessions", &self.sessions.len())
            .field("pending_approvals", &self.gateway.pending_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kubeward_cluster::ClusterResult;
    use kubeward_llm::{LlmResponse, LlmResult, StreamBox};

    /// Provider that always answers with plain text.
    struct TextProvider(&'static str);

    #[async_trait]
    impl LlmProvider for TextProvider {
        fn name(&self) -> &str {
            "static"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn stream(
            &self,
            _messages: &[Message],
            _tools: &[LlmToolDefinition],
            _system: &str,
        ) -> LlmResult<StreamBox> {
            let events = vec![
                Ok(StreamEvent::TextDelta(self.0.to_string())),
                Ok(StreamEvent::Done),
            ];
            Ok(Box::pin(futures::stream::iter(events)))
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[LlmToolDefinition],
            _system: &str,
        ) -> LlmResult<LlmResponse> {
            Ok(LlmResponse {
                message: Message::assistant(self.0),
                stop_reason: kubeward_llm::StopReason::EndTurn,
            })
        }
    }

    struct NoopExecutor;

    #[async_trait]
    impl ClusterExecutor for NoopExecutor {
        async fn execute(&self, _command: &str) -> ClusterResult<String> {
            Ok(String::new())
        }
    }

    fn runtime(provider: TextProvider) -> AgentRuntime<TextProvider> {
        AgentRuntime::new(provider, Arc::new(NoopExecutor), GatewayConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_text_only_request() {
        let runtime = runtime(TextProvider("All pods are healthy."));
        let receiver = runtime.submit(None, "how are my pods?");
        let events = receiver.collect_all().await;

        assert!(matches!(events[0], AgentEvent::Session { .. }));
        assert!(
            matches!(&events[1], AgentEvent::Text(t) if t == "All pods are healthy.")
        );
        assert!(events.last().is_some_and(AgentEvent::is_end));
    }

    #[tokio::test]
    async fn test_session_reuse_keeps_history() {
        let runtime = runtime(TextProvider("ok"));
        let mut receiver = runtime.submit(None, "first");
        let Some(AgentEvent::Session { session_id }) = receiver.recv().await else {
            panic!("first event must be Session");
        };
        receiver.collect_all().await;

        let receiver = runtime.submit(Some(session_id.clone()), "second");
        receiver.collect_all().await;

        // user, assistant, user, assistant
        let history = runtime.sessions().history(&session_id);
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_errors() {
        let runtime = runtime(TextProvider("ok"));
        assert!(runtime.resolve(&ApprovalId::new(), true).is_err());
    }

    #[tokio::test]
    async fn test_done_state_after_text_answer() {
        let runtime = runtime(TextProvider("done"));
        let mut receiver = runtime.submit(None, "hello");
        let Some(AgentEvent::Session { session_id }) = receiver.recv().await else {
            panic!("first event must be Session");
        };
        receiver.collect_all().await;
        assert_eq!(runtime.loop_state(&session_id), Some(LoopState::Done));
    }
}
