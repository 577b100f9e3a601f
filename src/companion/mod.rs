//! Local-intent router.
//!
//! Messages that ask for something on this machine are answered here from
//! verified local state instead of by the chat gateway.

pub mod executor;
pub mod intent;
pub mod probe;
pub mod replies;
pub mod session;
pub mod templates;
pub mod types;

pub use executor::LocalActionExecutor;
pub use intent::{LocalIntent, classify, looks_like_local_operation};
pub use probe::{PortProbe, TcpPortProbe};
pub use session::{SessionState, SessionStore};
pub use templates::NoteTemplate;
pub use types::{ActionKind, ActionReceipt, LocalActionResult};

/// Classifier, executor and the session they share.
pub struct CompanionService {
    session: SessionStore,
    executor: LocalActionExecutor,
}

impl CompanionService {
    pub fn new(executor: LocalActionExecutor) -> Self {
        Self {
            session: SessionStore::new(),
            executor,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn executor(&self) -> &LocalActionExecutor {
        &self.executor
    }

    /// Answer `message` locally, or return an unhandled envelope so the
    /// caller routes it to the chat gateway.
    pub fn handle(&self, message: &str) -> LocalActionResult {
        let state = self.session.snapshot();
        let Some((rule, intent)) = intent::classify_with_rule(message, &state) else {
            return LocalActionResult::unhandled();
        };
        tracing::debug!(rule, ?intent, "local intent matched");
        let result = self.executor.execute(&intent, &self.session);
        tracing::info!(kind = %result.kind, ok = result.ok, "local action handled");
        result
    }
}
