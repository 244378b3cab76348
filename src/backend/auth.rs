//! Authentication Collaborator
//!
//! The session contract the session gate depends on, plus its GoTrue REST
//! implementation. Sessions survive reloads through a [`SessionPersistence`]
//! supplied by the host (browser local storage, a file for the CLI, memory
//! for tests).
//!
//! A held session ends without a sign-out when its refresh token is
//! rejected, or when the backend answers 401 to a data or storage request
//! made with its access token. Both emit [`AuthEvent::SignedOut`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration as StdDuration;
use thiserror::Error;

use super::client::BackendClient;
use super::error::BackendError;
use crate::notify::{Listeners, Subscription};

/// Authenticated user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated administrator session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    /// Whether the access token is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Change in the underlying session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

impl AuthEvent {
    /// Session after this event, if any
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => Some(session),
            AuthEvent::SignedOut => None,
        }
    }
}

/// Errors reported by the auth collaborator
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email/password pair was rejected
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Transport or service failure
    #[error("Auth service error: {0}")]
    Backend(#[from] BackendError),
}

/// Timer future handed to [`AuthService::keep_alive`]
pub type SleepFuture = LocalBoxFuture<'static, ()>;

/// Session source consumed by the session gate
#[async_trait(?Send)]
pub trait AuthService {
    /// Current session, refreshed if it had expired; `None` when signed out
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Observe sign-in, sign-out, refresh and expiry
    fn subscribe(&self, listener: Box<dyn Fn(&AuthEvent)>) -> Subscription;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Keep the held session fresh until it ends, waiting with `sleep`
    ///
    /// Returns once no session is held. Services whose sessions never
    /// expire on their own return immediately.
    async fn keep_alive(&self, _sleep: &dyn Fn(StdDuration) -> SleepFuture) {}
}

/// Where the auth client keeps the session between page loads
pub trait SessionPersistence {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

/// Session storage that lasts as long as the process
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    session: RefCell<Option<Session>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.session.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        *self.session.borrow_mut() = None;
    }
}

/// Seconds before expiry at which a held session is refreshed
pub const REFRESH_MARGIN_SECS: i64 = 30;

/// Wait before retrying a refresh that failed in transport
const REFRESH_RETRY: StdDuration = StdDuration::from_secs(10);

/// GoTrue REST client
pub struct SupabaseAuth {
    inner: Rc<AuthInner>,
    _unauthorized: Subscription,
}

struct AuthInner {
    client: BackendClient,
    persistence: Box<dyn SessionPersistence>,
    current: RefCell<Option<Session>>,
    listeners: Listeners<AuthEvent>,
    keeping_alive: Cell<bool>,
}

impl SupabaseAuth {
    /// Create an auth client sharing `client`'s bearer token
    ///
    /// A 401 from any request `client` sends with the session token ends
    /// the session.
    pub fn new(client: BackendClient, persistence: Box<dyn SessionPersistence>) -> Self {
        let inner = Rc::new(AuthInner {
            client,
            persistence,
            current: RefCell::new(None),
            listeners: Listeners::new(),
            keeping_alive: Cell::new(false),
        });

        let weak: Weak<AuthInner> = Rc::downgrade(&inner);
        let unauthorized = inner.client.on_unauthorized(move || {
            if let Some(inner) = weak.upgrade() {
                if inner.end_session() {
                    tracing::info!("Session rejected by the backend, signed out");
                }
            }
        });

        Self {
            inner,
            _unauthorized: unauthorized,
        }
    }

    /// Time until the held session is due for refresh; `None` when signed out
    pub fn refresh_delay(&self) -> Option<StdDuration> {
        let expires_at = self.inner.current.borrow().as_ref()?.expires_at;
        let due = expires_at - Duration::seconds(REFRESH_MARGIN_SECS);
        Some((due - Utc::now()).to_std().unwrap_or(StdDuration::ZERO))
    }

    /// Exchange the held session's refresh token for a new session
    ///
    /// Emits [`AuthEvent::TokenRefreshed`] on success. A rejected refresh
    /// token ends the session with [`AuthEvent::SignedOut`] and yields `None`.
    pub async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        let held = self.inner.current.borrow().clone();
        match held {
            Some(session) => self.inner.refresh(session).await,
            None => Ok(None),
        }
    }
}

impl AuthInner {
    fn store(&self, session: &Session) {
        self.persistence.save(session);
        self.client.set_access_token(Some(session.access_token.clone()));
        *self.current.borrow_mut() = Some(session.clone());
    }

    fn forget(&self) -> bool {
        self.persistence.clear();
        self.client.set_access_token(None);
        self.current.borrow_mut().take().is_some()
    }

    /// Drop the session, announcing it when one was held
    fn end_session(&self) -> bool {
        let was_active = self.forget();
        if was_active {
            self.listeners.notify(&AuthEvent::SignedOut);
        }
        was_active
    }

    async fn request_token(&self, grant_type: &str, body: &TokenRequest<'_>) -> Result<Session, BackendError> {
        let url = self
            .client
            .endpoint(&format!("auth/v1/token?grant_type={}", grant_type));
        // Token grants authenticate with the anon key only
        let request = self.client.anon_request(Method::POST, &url).json(body);

        let response = self.client.send_anon(request).await?;
        let token: TokenResponse = response.json().await.map_err(BackendError::from_transport)?;
        Ok(token.into_session(Utc::now()))
    }

    async fn refresh(&self, expired: Session) -> Result<Option<Session>, AuthError> {
        let body = TokenRequest::Refresh {
            refresh_token: &expired.refresh_token,
        };

        match self.request_token("refresh_token", &body).await {
            Ok(session) => {
                tracing::debug!(user = %session.user.id, "Session refreshed");
                self.store(&session);
                self.listeners.notify(&AuthEvent::TokenRefreshed(session.clone()));
                Ok(Some(session))
            }
            Err(BackendError::Api { status, message }) if status == 400 || status == 401 => {
                tracing::info!(status, message = %message, "Session could not be refreshed");
                self.end_session();
                Ok(None)
            }
            Err(e) => Err(AuthError::Backend(e)),
        }
    }
}

/// Clears the keep-alive flag when the loop ends or is dropped
struct KeepAliveGuard<'a>(&'a Cell<bool>);

impl Drop for KeepAliveGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[async_trait(?Send)]
impl AuthService for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let inner = &self.inner;
        let held = inner.current.borrow().clone();
        let session = match held.or_else(|| inner.persistence.load()) {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            return inner.refresh(session).await;
        }

        inner.client.set_access_token(Some(session.access_token.clone()));
        *inner.current.borrow_mut() = Some(session.clone());
        Ok(Some(session))
    }

    fn subscribe(&self, listener: Box<dyn Fn(&AuthEvent)>) -> Subscription {
        self.inner.listeners.subscribe(move |event: &AuthEvent| listener(event))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let body = TokenRequest::Password { email, password };

        match self.inner.request_token("password", &body).await {
            Ok(session) => {
                tracing::info!(user = %session.user.id, "Signed in");
                self.inner.store(&session);
                self.inner.listeners.notify(&AuthEvent::SignedIn(session.clone()));
                Ok(session)
            }
            Err(BackendError::Api { status, .. }) if status == 400 || status == 401 => {
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => Err(AuthError::Backend(e)),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let client = &self.inner.client;
        let result = if client.access_token().is_some() {
            let url = client.endpoint("auth/v1/logout");
            match client.send(client.request(Method::POST, &url)).await {
                Ok(_) => Ok(()),
                // Token already revoked or expired server-side
                Err(BackendError::Api { status: 401, .. }) | Err(BackendError::Api { status: 403, .. }) => Ok(()),
                Err(e) => Err(AuthError::Backend(e)),
            }
        } else {
            Ok(())
        };

        self.inner.end_session();
        tracing::info!("Signed out");
        result
    }

    async fn keep_alive(&self, sleep: &dyn Fn(StdDuration) -> SleepFuture) {
        if self.inner.keeping_alive.replace(true) {
            return;
        }
        let _guard = KeepAliveGuard(&self.inner.keeping_alive);

        loop {
            let waited_for = self.inner.current.borrow().clone();
            let Some(delay) = self.refresh_delay() else {
                break;
            };
            sleep(delay).await;

            let held = self.inner.current.borrow().clone();
            match held {
                None => break,
                // Signed in again or refreshed elsewhere while waiting
                Some(session) if Some(&session) != waited_for.as_ref() => continue,
                Some(session) => {
                    if self.refresh_delay() != Some(StdDuration::ZERO) {
                        continue;
                    }
                    if let Err(e) = self.inner.refresh(session).await {
                        tracing::warn!(error = %e, "Session refresh failed, retrying");
                        sleep(REFRESH_RETRY).await;
                    }
                }
            }
        }
        tracing::debug!("Session keep-alive finished");
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TokenRequest<'a> {
    Password { email: &'a str, password: &'a str },
    Refresh { refresh_token: &'a str },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in.unwrap_or(3600)));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_prefers_absolute_expiry() {
        let now = Utc::now();
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":60,"expires_at":4102444800,
                "user":{"id":"u1","email":"admin@implexa.org"}}"#,
        )
        .unwrap();

        let session = response.into_session(now);
        assert_eq!(session.expires_at.timestamp(), 4102444800);
        assert_eq!(session.user.email.as_deref(), Some("admin@implexa.org"));
    }

    #[test]
    fn test_token_response_relative_expiry() {
        let now = Utc::now();
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":60,"user":{"id":"u1"}}"#,
        )
        .unwrap();

        let session = response.into_session(now);
        assert_eq!(session.expires_at, now + Duration::seconds(60));
        assert!(!session.is_expired_at(now));
        assert!(session.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn test_token_request_bodies() {
        let password = serde_json::to_value(TokenRequest::Password {
            email: "a@b.c",
            password: "pw",
        })
        .unwrap();
        assert_eq!(password, serde_json::json!({"email": "a@b.c", "password": "pw"}));

        let refresh = serde_json::to_value(TokenRequest::Refresh { refresh_token: "r" }).unwrap();
        assert_eq!(refresh, serde_json::json!({"refresh_token": "r"}));
    }

    #[test]
    fn test_memory_persistence() {
        let store = MemoryPersistence::new();
        assert!(store.load().is_none());

        let session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now(),
            user: User { id: "u".into(), email: None },
        };
        store.save(&session);
        assert_eq!(store.load(), Some(session));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_event_session() {
        assert!(AuthEvent::SignedOut.session().is_none());
    }

    mod hosted {
        use super::super::*;
        use crate::backend::{ContentStore, Query, RestStore, Table};
        use crate::config::BackendConfig;
        use crate::session::{SessionGate, SessionState};
        use futures_util::future;
        use httpmock::prelude::*;
        use serde_json::json;

        const EMAIL: &str = "admin@implexa.org";
        const PASSWORD: &str = "correct horse";

        fn client_for(server: &MockServer) -> BackendClient {
            let config = BackendConfig {
                url: server.base_url(),
                anon_key: "anon-key".to_string(),
                ..BackendConfig::default()
            };
            BackendClient::new(&config).unwrap()
        }

        fn token_body(access_token: &str, expires_in: i64) -> serde_json::Value {
            json!({
                "access_token": access_token,
                "refresh_token": format!("{}-refresh", access_token),
                "expires_in": expires_in,
                "user": {"id": "u1", "email": EMAIL}
            })
        }

        fn immediately(_: StdDuration) -> SleepFuture {
            Box::pin(future::ready(()))
        }

        async fn mock_password_grant(server: &MockServer, expires_in: i64) {
            server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/auth/v1/token")
                        .query_param("grant_type", "password");
                    then.status(200).json_body(token_body("first", expires_in));
                })
                .await;
        }

        async fn signed_in_gate(client: &BackendClient) -> (Rc<SupabaseAuth>, SessionGate) {
            let auth = Rc::new(SupabaseAuth::new(client.clone(), Box::new(MemoryPersistence::new())));
            let gate = SessionGate::new(auth.clone());
            gate.initialize(future::pending()).await;

            gate.sign_in(EMAIL, PASSWORD).await.unwrap();
            assert!(gate.state().is_authenticated());
            (auth, gate)
        }

        fn record_states(gate: &SessionGate) -> (Rc<RefCell<Vec<SessionState>>>, Subscription) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let seen_clone = Rc::clone(&seen);
            let sub = gate.subscribe(move |s| seen_clone.borrow_mut().push(s.clone()));
            (seen, sub)
        }

        #[tokio::test]
        async fn test_rejected_refresh_ends_gate_session() {
            let server = MockServer::start_async().await;
            mock_password_grant(&server, 1).await;
            let refresh = server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/auth/v1/token")
                        .query_param("grant_type", "refresh_token")
                        .json_body(json!({"refresh_token": "first-refresh"}));
                    then.status(400).json_body(json!({"error": "invalid_grant"}));
                })
                .await;

            let client = client_for(&server);
            let (auth, gate) = signed_in_gate(&client).await;
            assert_eq!(auth.refresh_delay(), Some(StdDuration::ZERO));
            let (seen, _sub) = record_states(&gate);

            gate.keep_alive(&immediately).await;

            refresh.assert_async().await;
            assert_eq!(gate.state(), SessionState::Anonymous);
            assert_eq!(*seen.borrow(), vec![SessionState::Anonymous]);
            assert_eq!(client.access_token(), None);
            assert!(auth.refresh_delay().is_none());
        }

        #[tokio::test]
        async fn test_refresh_replaces_gate_session() {
            let server = MockServer::start_async().await;
            mock_password_grant(&server, 1).await;
            server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/auth/v1/token")
                        .query_param("grant_type", "refresh_token");
                    then.status(200).json_body(token_body("second", 3600));
                })
                .await;

            let client = client_for(&server);
            let (auth, gate) = signed_in_gate(&client).await;

            let refreshed = auth.refresh_session().await.unwrap().unwrap();
            assert_eq!(refreshed.access_token, "second");

            let state = gate.state();
            assert_eq!(state.session().map(|s| s.access_token.as_str()), Some("second"));
            assert_eq!(client.access_token().as_deref(), Some("second"));
            assert!(auth.refresh_delay().unwrap() > StdDuration::from_secs(3500));
        }

        #[tokio::test]
        async fn test_rejected_data_request_ends_gate_session() {
            let server = MockServer::start_async().await;
            mock_password_grant(&server, 3600).await;
            server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/rest/v1/blog_posts")
                        .header("authorization", "Bearer first");
                    then.status(401).json_body(json!({"message": "JWT expired"}));
                })
                .await;

            let client = client_for(&server);
            let (_auth, gate) = signed_in_gate(&client).await;
            let (seen, _sub) = record_states(&gate);

            let store = RestStore::new(client.clone());
            let result = store.select(&Query::from(Table::BlogPosts)).await;
            assert!(matches!(result, Err(BackendError::Api { status: 401, .. })));

            assert_eq!(gate.state(), SessionState::Anonymous);
            assert_eq!(*seen.borrow(), vec![SessionState::Anonymous]);
            assert_eq!(client.access_token(), None);

            // Nothing left to revoke remotely
            gate.sign_out().await.unwrap();
            assert_eq!(*seen.borrow(), vec![SessionState::Anonymous]);
        }

        #[tokio::test]
        async fn test_keep_alive_without_session_returns() {
            let server = MockServer::start_async().await;
            let auth = SupabaseAuth::new(client_for(&server), Box::new(MemoryPersistence::new()));

            auth.keep_alive(&immediately).await;
            assert!(auth.refresh_delay().is_none());
        }
    }
}
