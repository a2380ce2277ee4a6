//! Chat service: per-session history plus the upstream generation exchange.
//!
//! `ChatService` owns the session table. Each session is guarded by its own
//! async mutex that is held for the whole exchange, so concurrent sends to the
//! same session are serialized while different sessions proceed in parallel.
//! Resetting a session removes it from the table, so the table only holds
//! conversations with turns in them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use ally_types::chat::{ChatReply, NO_RESPONSE_SENTINEL, SessionId, Turn};
use ally_types::error::GenerationError;
use ally_types::generation::{GenerateContentResponse, GenerationRequest, SYSTEM_PROMPT};

use crate::chat::session::ConversationSession;
use crate::credential::provider::TokenProvider;
use crate::llm::client::GenerationClient;

type SessionHandle = Arc<Mutex<ConversationSession>>;

/// Conversation manager proxying the upstream generation endpoint.
///
/// Generic over `GenerationClient` and `TokenProvider` so ally-core never
/// depends on ally-infra.
pub struct ChatService<G: GenerationClient, P: TokenProvider> {
    client: G,
    credentials: P,
    sessions: DashMap<SessionId, SessionHandle>,
}

impl<G: GenerationClient, P: TokenProvider> ChatService<G, P> {
    pub fn new(client: G, credentials: P) -> Self {
        Self {
            client,
            credentials,
            sessions: DashMap::new(),
        }
    }

    pub fn client(&self) -> &G {
        &self.client
    }

    pub fn credentials(&self) -> &P {
        &self.credentials
    }

    /// Number of sessions currently holding history.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Lock a session, creating it on first use.
    ///
    /// A handle that a concurrent reset removed from the table is discarded
    /// and looked up again, so turns never land in a detached session. No map
    /// guard is held across an await.
    async fn lock_session(&self, id: &SessionId) -> OwnedMutexGuard<ConversationSession> {
        loop {
            let existing = self.sessions.get(id).map(|h| Arc::clone(h.value()));
            let handle = match existing {
                Some(handle) => handle,
                None => Arc::clone(self.sessions.entry(id.clone()).or_default().value()),
            };

            let guard = Arc::clone(&handle).lock_owned().await;
            let still_current = self
                .sessions
                .get(id)
                .is_some_and(|current| Arc::ptr_eq(current.value(), &handle));
            if still_current {
                return guard;
            }
        }
    }

    /// Send one user message and record the exchange.
    ///
    /// Never fails: transport and credential errors become
    /// [`ChatReply::Failed`] with only the user turn left in history, while a
    /// well-formed response without text becomes [`ChatReply::Degraded`] and
    /// records the sentinel as the model turn.
    pub async fn send_message(&self, session_id: &SessionId, message: &str) -> ChatReply {
        let mut session = self.lock_session(session_id).await;

        session.push_user(message);
        let request = GenerationRequest::new(SYSTEM_PROMPT, session.history());
        debug!(
            session_id = %session_id,
            turns = request.contents.len(),
            client = self.client.name(),
            "Dispatching generation request"
        );

        let result = match self.credentials.access_token().await {
            Ok(token) => self.client.generate(&request, &token).await,
            Err(e) => Err(GenerationError::from(e)),
        };

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Chat exchange failed");
                return ChatReply::Failed {
                    message: e.to_string(),
                };
            }
        };

        let text = GenerateContentResponse::from_value(body).and_then(|response| {
            if let Some(usage) = &response.usage_metadata {
                debug!(
                    session_id = %session_id,
                    prompt_tokens = usage.prompt_token_count,
                    output_tokens = usage.candidates_token_count,
                    "Generation usage"
                );
            }
            response.first_text().map(str::to_string)
        });

        match text {
            Ok(text) => {
                session.push_model(text.as_str());
                info!(
                    session_id = %session_id,
                    history_len = session.len(),
                    "Chat exchange completed"
                );
                ChatReply::Answer(text)
            }
            Err(reason) => {
                warn!(session_id = %session_id, %reason, "Upstream response had no usable text");
                session.push_model(NO_RESPONSE_SENTINEL);
                ChatReply::Degraded { reason }
            }
        }
    }

    /// Clear a session's history and drop it from the table.
    ///
    /// Idempotent; unknown sessions are a no-op. The session lock is held
    /// while the entry is removed, so a send waiting on it starts over with a
    /// fresh session.
    pub async fn reset_history(&self, session_id: &SessionId) {
        let handle = self.sessions.get(session_id).map(|h| Arc::clone(h.value()));
        if let Some(handle) = handle {
            let mut session = handle.lock().await;
            session.reset();
            self.sessions
                .remove_if(session_id, |_, current| Arc::ptr_eq(current, &handle));
            info!(session_id = %session_id, "Chat history reset");
        }
    }

    /// Snapshot of a session's turns. Unknown sessions have an empty history.
    pub async fn history(&self, session_id: &SessionId) -> Vec<Turn> {
        let handle = self.sessions.get(session_id).map(|h| Arc::clone(h.value()));
        match handle {
            Some(handle) => handle.lock().await.history().to_vec(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ally_types::chat::{DegradedReason, FAILURE_PREFIX, ReplyOutcome, TurnRole};
    use ally_types::credential::AccessToken;
    use ally_types::error::CredentialError;
    use serde_json::{Value, json};

    /// What the mock client does on each call.
    #[derive(Clone)]
    enum Behavior {
        /// Echo the last user turn back as `reply: {text}`.
        Echo,
        Body(Value),
        Fail,
    }

    struct MockClient {
        behavior: Behavior,
        /// Length of `contents` in every request seen.
        seen_lengths: StdMutex<Vec<usize>>,
        seen_tokens: StdMutex<Vec<String>>,
    }

    impl MockClient {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                seen_lengths: StdMutex::new(Vec::new()),
                seen_tokens: StdMutex::new(Vec::new()),
            }
        }

        fn seen_lengths(&self) -> Vec<usize> {
            self.seen_lengths.lock().unwrap().clone()
        }
    }

    impl GenerationClient for MockClient {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
            token: &AccessToken,
        ) -> Result<Value, GenerationError> {
            self.seen_lengths.lock().unwrap().push(request.contents.len());
            self.seen_tokens
                .lock()
                .unwrap()
                .push(token.expose().to_string());
            match &self.behavior {
                Behavior::Echo => {
                    let last = request.contents.last().map(Turn::text).unwrap_or_default();
                    Ok(json!({
                        "candidates": [{ "content": { "role": "model", "parts": [{ "text": format!("reply: {last}") }] } }],
                        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14 }
                    }))
                }
                Behavior::Body(body) => Ok(body.clone()),
                Behavior::Fail => Err(GenerationError::Transport("connection refused".to_string())),
            }
        }
    }

    struct MockProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockProvider {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    impl TokenProvider for MockProvider {
        fn describe(&self) -> &str {
            "mock"
        }

        async fn access_token(&self) -> Result<AccessToken, CredentialError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CredentialError::Unavailable("no ADC configured".to_string()));
            }
            Ok(AccessToken::new("test-token"))
        }
    }

    fn service(behavior: Behavior) -> ChatService<MockClient, MockProvider> {
        ChatService::new(MockClient::new(behavior), MockProvider::ok())
    }

    fn roles(history: &[Turn]) -> Vec<TurnRole> {
        history.iter().map(|t| t.role).collect()
    }

    #[tokio::test]
    async fn test_successful_send_appends_user_and_model_turns() {
        let svc = service(Behavior::Echo);
        let id = SessionId::default();

        let reply = svc.send_message(&id, "What is the minimum wage?").await;
        assert_eq!(reply, ChatReply::Answer("reply: What is the minimum wage?".to_string()));
        assert_eq!(reply.outcome(), ReplyOutcome::Ok);

        let history = svc.history(&id).await;
        assert_eq!(history.len(), 2);
        assert_eq!(roles(&history), vec![TurnRole::User, TurnRole::Model]);
        assert_eq!(history[0].text(), "What is the minimum wage?");
        assert_eq!(history[1].text(), "reply: What is the minimum wage?");
    }

    #[tokio::test]
    async fn test_request_carries_full_history_and_token() {
        let svc = service(Behavior::Echo);
        let id = SessionId::default();
        svc.send_message(&id, "one").await;
        svc.send_message(&id, "two").await;

        assert_eq!(svc.client().seen_lengths(), vec![1, 3]);
        assert_eq!(
            svc.client().seen_tokens.lock().unwrap().clone(),
            vec!["test-token", "test-token"]
        );
        assert_eq!(svc.credentials().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_then_send_starts_from_single_turn() {
        let svc = service(Behavior::Echo);
        let id = SessionId::default();
        svc.send_message(&id, "first").await;
        svc.send_message(&id, "second").await;

        svc.reset_history(&id).await;
        assert!(svc.history(&id).await.is_empty());

        svc.send_message(&id, "fresh start").await;
        assert_eq!(svc.client().seen_lengths().last(), Some(&1));
        assert_eq!(svc.history(&id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidates_records_sentinel() {
        let svc = service(Behavior::Body(json!({ "candidates": [] })));
        let id = SessionId::default();

        let reply = svc.send_message(&id, "hello").await;
        assert_eq!(
            reply,
            ChatReply::Degraded {
                reason: DegradedReason::NoCandidates
            }
        );
        assert_eq!(reply.text(), "No response text found.");

        let history = svc.history(&id).await;
        assert_eq!(roles(&history), vec![TurnRole::User, TurnRole::Model]);
        assert_eq!(history[1].text(), "No response text found.");
    }

    #[tokio::test]
    async fn test_missing_text_and_odd_shape_are_degraded() {
        let svc = service(Behavior::Body(json!({ "candidates": [{ "content": { "parts": [{}] } }] })));
        let reply = svc.send_message(&SessionId::default(), "hi").await;
        assert_eq!(
            reply,
            ChatReply::Degraded {
                reason: DegradedReason::MissingText
            }
        );

        let svc = service(Behavior::Body(json!({ "candidates": "nope" })));
        let reply = svc.send_message(&SessionId::default(), "hi").await;
        assert_eq!(
            reply,
            ChatReply::Degraded {
                reason: DegradedReason::UnexpectedShape
            }
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_only_user_turn() {
        let svc = service(Behavior::Fail);
        let id = SessionId::default();

        let reply = svc.send_message(&id, "hello").await;
        assert!(reply.is_failed());
        let text = reply.text();
        assert!(text.starts_with(FAILURE_PREFIX));
        assert!(text.contains("connection refused"));

        let history = svc.history(&id).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, TurnRole::User);
    }

    #[tokio::test]
    async fn test_credential_failure_is_reported_without_dispatch() {
        let svc = ChatService::new(MockClient::new(Behavior::Echo), MockProvider::failing());
        let id = SessionId::default();

        let reply = svc.send_message(&id, "hello").await;
        assert!(reply.is_failed());
        assert!(reply.text().contains("no ADC configured"));
        assert!(svc.client().seen_lengths().is_empty());
        assert_eq!(svc.history(&id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_sequential_sends_alternate_roles() {
        let svc = service(Behavior::Echo);
        let id = SessionId::default();
        let n = 5;
        for i in 0..n {
            svc.send_message(&id, &format!("message {i}")).await;
        }

        let history = svc.history(&id).await;
        assert_eq!(history.len(), 2 * n);
        for (i, turn) in history.iter().enumerate() {
            let expected = if i % 2 == 0 { TurnRole::User } else { TurnRole::Model };
            assert_eq!(turn.role, expected, "turn {i}");
        }
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let svc = service(Behavior::Echo);
        let alice = SessionId("alice".to_string());
        let bob = SessionId("bob".to_string());

        svc.send_message(&alice, "a1").await;
        svc.send_message(&alice, "a2").await;
        svc.send_message(&bob, "b1").await;

        assert_eq!(svc.history(&alice).await.len(), 4);
        assert_eq!(svc.history(&bob).await.len(), 2);
        assert_eq!(svc.session_count(), 2);

        svc.reset_history(&alice).await;
        assert!(svc.history(&alice).await.is_empty());
        assert_eq!(svc.history(&bob).await.len(), 2);
        assert_eq!(svc.session_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_unknown_session_is_noop() {
        let svc = service(Behavior::Echo);
        let id = SessionId("ghost".to_string());
        svc.reset_history(&id).await;
        svc.reset_history(&id).await;
        assert_eq!(svc.session_count(), 0);
        assert!(svc.history(&id).await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_sends_to_one_session_stay_paired() {
        let svc = Arc::new(service(Behavior::Echo));
        let id = SessionId::default();

        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = Arc::clone(&svc);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                svc.send_message(&id, &format!("q{i}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let history = svc.history(&id).await;
        assert_eq!(history.len(), 16);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[1].role, TurnRole::Model);
            assert_eq!(pair[1].text(), format!("reply: {}", pair[0].text()));
        }
    }

    #[tokio::test]
    async fn test_reset_releases_session_entries() {
        let svc = service(Behavior::Echo);
        for i in 0..50 {
            let id = SessionId(format!("visitor-{i}"));
            svc.send_message(&id, "hello").await;
            svc.reset_history(&id).await;
        }
        assert_eq!(svc.session_count(), 0);

        let id = SessionId("visitor-0".to_string());
        svc.send_message(&id, "back again").await;
        assert_eq!(svc.session_count(), 1);
        assert_eq!(svc.history(&id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_send_racing_reset_lands_in_live_session() {
        let svc = Arc::new(service(Behavior::Echo));
        let id = SessionId("racy".to_string());
        svc.send_message(&id, "warm up").await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = Arc::clone(&svc);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    svc.reset_history(&id).await;
                } else {
                    svc.send_message(&id, &format!("q{i}")).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Whatever survived is visible through the table and still paired.
        let history = svc.history(&id).await;
        assert_eq!(history.len() % 2, 0);
        assert!(svc.session_count() <= 1);
        assert_eq!(history.is_empty(), svc.session_count() == 0);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[1].text(), format!("reply: {}", pair[0].text()));
        }
    }

    #[tokio::test]
    async fn test_ally_persona_is_sent() {
        struct InstructionSpy(StdMutex<Option<String>>);

        impl GenerationClient for InstructionSpy {
            fn name(&self) -> &str {
                "spy"
            }

            async fn generate(
                &self,
                request: &GenerationRequest,
                _token: &AccessToken,
            ) -> Result<Value, GenerationError> {
                *self.0.lock().unwrap() = Some(request.system_instruction.parts[0].text.clone());
                Ok(json!({ "candidates": [] }))
            }
        }

        let svc = ChatService::new(InstructionSpy(StdMutex::new(None)), MockProvider::ok());
        svc.send_message(&SessionId::default(), "hi").await;
        assert_eq!(svc.client().0.lock().unwrap().as_deref(), Some(SYSTEM_PROMPT));
    }
}
