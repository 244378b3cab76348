//! Session Gate
//!
//! Tracks whether an administrator session exists.
//!
//! ```text
//!            initialize / first auth event
//!  Loading ─────────────────────────────────┬──> Anonymous
//!                                           └──> Authenticated
//!
//!  Anonymous ──sign_in ok──> Authenticated ──sign_out / expiry──> Anonymous
//! ```
//!
//! `Loading` is left exactly once. The state is a single enum value, so the
//! loading flag and the session reference can never disagree.

use futures_util::future::{self, Either};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;
use thiserror::Error;

use crate::backend::{AuthError, AuthEvent, AuthService, Session, SleepFuture};
use crate::notify::{Listeners, Subscription};

/// User-facing message for every failed sign-in
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// What the gate knows about the administrator session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "session", rename_all = "snake_case")]
pub enum SessionState {
    /// Initial lookup has not finished
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Anonymous,
        }
    }
}

/// Errors surfaced by the gate
#[derive(Error, Debug)]
pub enum GateError {
    /// Deliberately does not say which credential was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The remote sign-out failed; the local session was cleared anyway
    #[error("Sign-out failed: {0}")]
    SignOut(#[source] AuthError),
}

/// How the initial session lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The lookup answered and its result was applied
    Resolved,
    /// The lookup failed or missed the deadline; the gate fell back to anonymous
    FellBack,
    /// An auth change event resolved the gate first; the lookup result was ignored
    Superseded,
}

/// Owner of the session state
#[derive(Clone)]
pub struct SessionGate {
    inner: Rc<GateInner>,
}

struct GateInner {
    auth: Rc<dyn AuthService>,
    state: RefCell<SessionState>,
    initialized: Cell<bool>,
    listeners: Listeners<SessionState>,
    auth_subscription: RefCell<Option<Subscription>>,
}

impl GateInner {
    fn set(&self, next: SessionState) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if *state == next {
                false
            } else {
                *state = next.clone();
                true
            }
        };

        if changed {
            tracing::debug!(state = ?state_name(&next), "Session state changed");
            self.listeners.notify(&next);
        }
    }

    fn on_auth_event(&self, event: &AuthEvent) {
        tracing::debug!(event = ?event_name(event), "Auth event");
        self.set(SessionState::from_session(event.session().cloned()));
    }
}

impl SessionGate {
    /// Create a gate in the `Loading` state, observing `auth`'s change notifications
    pub fn new(auth: Rc<dyn AuthService>) -> Self {
        let inner = Rc::new(GateInner {
            auth,
            state: RefCell::new(SessionState::Loading),
            initialized: Cell::new(false),
            listeners: Listeners::new(),
            auth_subscription: RefCell::new(None),
        });

        let weak: Weak<GateInner> = Rc::downgrade(&inner);
        let subscription = inner.auth.subscribe(Box::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_auth_event(event);
            }
        }));
        *inner.auth_subscription.borrow_mut() = Some(subscription);

        Self { inner }
    }

    /// Resolve the initial session, giving up when `deadline` completes first
    ///
    /// A failed or late lookup leaves the gate `Anonymous`. Only the first
    /// call does anything; later calls return [`InitOutcome::Superseded`].
    pub async fn initialize<D>(&self, deadline: D) -> InitOutcome
    where
        D: Future<Output = ()>,
    {
        if self.inner.initialized.replace(true) {
            return InitOutcome::Superseded;
        }

        let lookup = self.inner.auth.current_session();
        futures_util::pin_mut!(lookup);
        futures_util::pin_mut!(deadline);

        let (next, outcome) = match future::select(lookup, deadline).await {
            Either::Left((Ok(session), _)) => (SessionState::from_session(session), InitOutcome::Resolved),
            Either::Left((Err(e), _)) => {
                tracing::warn!(error = %e, "Session lookup failed, continuing signed out");
                (SessionState::Anonymous, InitOutcome::FellBack)
            }
            Either::Right(_) => {
                tracing::warn!("Session lookup timed out, continuing signed out");
                (SessionState::Anonymous, InitOutcome::FellBack)
            }
        };

        if !self.inner.state.borrow().is_loading() {
            tracing::debug!("Session already resolved by an auth event");
            return InitOutcome::Superseded;
        }

        self.inner.set(next);
        outcome
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Observe state changes
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// Sign in with email and password
    ///
    /// On failure the state is left as it was and the error carries only
    /// the generic [`INVALID_CREDENTIALS_MESSAGE`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), GateError> {
        match self.inner.auth.sign_in(email, password).await {
            Ok(session) => {
                self.inner.set(SessionState::Authenticated(session));
                Ok(())
            }
            Err(e) => {
                tracing::info!(error = %e, "Sign-in rejected");
                Err(GateError::InvalidCredentials)
            }
        }
    }

    /// Sign out; the local state becomes `Anonymous` whatever the service answers
    pub async fn sign_out(&self) -> Result<(), GateError> {
        let result = self.inner.auth.sign_out().await;
        self.inner.set(SessionState::Anonymous);

        result.map_err(|e| {
            tracing::warn!(error = %e, "Remote sign-out failed");
            GateError::SignOut(e)
        })
    }

    /// Refresh the held session before it expires, until it ends
    ///
    /// Refreshes and expiry reach the state through auth events. Hosts
    /// start this whenever the gate becomes `Authenticated`; a second
    /// concurrent call returns immediately.
    pub async fn keep_alive(&self, sleep: &dyn Fn(Duration) -> SleepFuture) {
        self.inner.auth.keep_alive(sleep).await;
    }
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::Loading => "loading",
        SessionState::Anonymous => "anonymous",
        SessionState::Authenticated(_) => "authenticated",
    }
}

fn event_name(event: &AuthEvent) -> &'static str {
    match event {
        AuthEvent::SignedIn(_) => "signed_in",
        AuthEvent::SignedOut => "signed_out",
        AuthEvent::TokenRefreshed(_) => "token_refreshed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryAuth, SessionLookup};

    const EMAIL: &str = "admin@implexa.org";
    const PASSWORD: &str = "correct horse";

    fn gate_with(auth: MemoryAuth) -> (Rc<MemoryAuth>, SessionGate) {
        let auth = Rc::new(auth);
        let gate = SessionGate::new(auth.clone());
        (auth, gate)
    }

    #[tokio::test]
    async fn test_starts_loading_then_anonymous() {
        let (_auth, gate) = gate_with(MemoryAuth::new());
        assert!(gate.state().is_loading());

        let outcome = gate.initialize(future::pending()).await;
        assert_eq!(outcome, InitOutcome::Resolved);
        assert_eq!(gate.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_restores_existing_session() {
        let (_auth, gate) = gate_with(MemoryAuth::new().with_session(EMAIL));
        gate.initialize(future::pending()).await;

        let state = gate.state();
        assert!(state.is_authenticated());
        assert_eq!(state.session().unwrap().user.email.as_deref(), Some(EMAIL));
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_anonymous() {
        let (auth, gate) = gate_with(MemoryAuth::new().with_session(EMAIL));
        auth.set_lookup(SessionLookup::Fail);

        assert_eq!(gate.initialize(future::pending()).await, InitOutcome::FellBack);
        assert_eq!(gate.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_hanging_lookup_is_bounded_by_deadline() {
        let (auth, gate) = gate_with(MemoryAuth::new());
        auth.set_lookup(SessionLookup::Hang);

        assert_eq!(gate.initialize(future::ready(())).await, InitOutcome::FellBack);
        assert_eq!(gate.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let (auth, gate) = gate_with(MemoryAuth::new());
        gate.initialize(future::pending()).await;

        // A session appearing later must come through sign-in or an event
        auth.add_account(EMAIL, PASSWORD);
        assert_eq!(gate.initialize(future::pending()).await, InitOutcome::Superseded);
        assert_eq!(gate.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_auth_event_while_loading_resolves_gate() {
        let (auth, gate) = gate_with(MemoryAuth::new().with_account(EMAIL, PASSWORD));
        auth.sign_in(EMAIL, PASSWORD).await.unwrap();
        assert!(gate.state().is_authenticated());

        // The late lookup must not replace the event's result
        auth.set_lookup(SessionLookup::Fail);
        assert_eq!(gate.initialize(future::pending()).await, InitOutcome::Superseded);
        assert!(gate.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_success_and_failure() {
        let (_auth, gate) = gate_with(MemoryAuth::new().with_account(EMAIL, PASSWORD));
        gate.initialize(future::pending()).await;

        let err = gate.sign_in("nobody@implexa.org", PASSWORD).await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_CREDENTIALS_MESSAGE);
        let err = gate.sign_in(EMAIL, "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_CREDENTIALS_MESSAGE);
        assert_eq!(gate.state(), SessionState::Anonymous);

        gate.sign_in(EMAIL, PASSWORD).await.unwrap();
        assert!(gate.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let (_auth, gate) = gate_with(MemoryAuth::new().with_session(EMAIL));
        gate.initialize(future::pending()).await;

        gate.sign_out().await.unwrap();
        assert_eq!(gate.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_external_expiry_is_observed() {
        let (auth, gate) = gate_with(MemoryAuth::new().with_session(EMAIL));
        gate.initialize(future::pending()).await;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = gate.subscribe(move |s| seen_clone.borrow_mut().push(s.clone()));

        auth.expire();
        assert_eq!(gate.state(), SessionState::Anonymous);
        assert_eq!(*seen.borrow(), vec![SessionState::Anonymous]);
    }
    #[tokio::test]
    async fn test_keep_alive_is_noop_without_expiring_sessions() {
        let (_auth, gate) = gate_with(MemoryAuth::new().with_session(EMAIL));
        gate.initialize(future::pending()).await;

        // Would hang if the loop waited on this timer
        gate.keep_alive(&|_: Duration| -> SleepFuture { Box::pin(future::pending()) }).await;
        assert!(gate.state().is_authenticated());
    }
}
