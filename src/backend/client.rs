//! Backend HTTP Client
//!
//! Shared transport for the auth, content and storage collaborators. Every
//! request carries the project's anon key; requests made while an admin is
//! signed in carry that session's access token as the bearer instead.
//!
//! A 401 answered to a session-bearing request is reported to the
//! [`BackendClient::on_unauthorized`] listeners so the auth collaborator can
//! drop the session.

use reqwest::{Client, Method, RequestBuilder, Response};
use std::cell::RefCell;
use std::rc::Rc;

use super::error::{BackendError, BackendResult};
use crate::config::BackendConfig;
use crate::notify::{Listeners, Subscription};

/// Connection to the hosted backend
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: Rc<RefCell<Option<String>>>,
    unauthorized: Rc<Listeners<()>>,
}

impl BackendClient {
    /// Create a client for the configured project
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        if config.url.trim().is_empty() {
            return Err(BackendError::NotConfigured("backend.url is empty".to_string()));
        }
        if config.anon_key.trim().is_empty() {
            return Err(BackendError::NotConfigured("backend.anon_key is empty".to_string()));
        }

        Ok(Self {
            http: build_http_client(config.request_timeout_ms)?,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: Rc::new(RefCell::new(None)),
            unauthorized: Rc::new(Listeners::new()),
        })
    }

    /// Project base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path below the project base
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Use `token` as the bearer for subsequent requests, or the anon key when `None`
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.borrow_mut() = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.borrow().clone()
    }

    /// Start a request with the project headers applied
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self
            .access_token
            .borrow()
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());

        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Start a request that authenticates with the anon key even while signed in
    pub fn anon_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Observe the backend rejecting the current access token
    pub fn on_unauthorized(&self, listener: impl Fn() + 'static) -> Subscription {
        self.unauthorized.subscribe(move |_: &()| listener())
    }

    /// Send a request, turning transport failures and non-success statuses into errors
    ///
    /// A 401 while an access token is set notifies the unauthorized
    /// listeners, unless the token changed while the request was in flight.
    pub async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let bearer = self.access_token();
        let result = self.send_anon(request).await;

        if let Err(BackendError::Api { status: 401, .. }) = &result {
            if bearer.is_some() && self.access_token() == bearer {
                tracing::info!("Backend rejected the session token");
                self.unauthorized.notify(&());
            }
        }
        result
    }

    /// [`send`](Self::send) for requests built with [`anon_request`](Self::anon_request)
    pub async fn send_anon(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request.send().await.map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status, message = %message, "Backend returned an error status");
            Err(BackendError::Api { status, message })
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(timeout_ms: u64) -> BackendResult<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_millis(timeout_ms))
        .build()
        .map_err(BackendError::Request)
}

// The browser's fetch has no per-client timeout
#[cfg(target_arch = "wasm32")]
fn build_http_client(_timeout_ms: u64) -> BackendResult<Client> {
    Client::builder().build().map_err(BackendError::Request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> BackendConfig {
        BackendConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
            ..BackendConfig::default()
        }
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = BackendClient::new(&config("https://project.example.co/")).unwrap();
        assert_eq!(client.base_url(), "https://project.example.co");
        assert_eq!(
            client.endpoint("/rest/v1/blog_posts"),
            "https://project.example.co/rest/v1/blog_posts"
        );
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let result = BackendClient::new(&config("  "));
        assert!(matches!(result, Err(BackendError::NotConfigured(_))));
    }

    #[test]
    fn test_access_token_shared_between_clones() {
        let client = BackendClient::new(&config("http://localhost")).unwrap();
        let other = client.clone();

        client.set_access_token(Some("jwt".to_string()));
        assert_eq!(other.access_token(), Some("jwt".to_string()));

        other.set_access_token(None);
        assert_eq!(client.access_token(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_reported_only_for_session_requests() {
        use httpmock::prelude::*;
        use std::cell::Cell;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/team_members");
                then.status(401).body(r#"{"message":"JWT expired"}"#);
            })
            .await;

        let client = BackendClient::new(&config(&server.base_url())).unwrap();
        let rejected = Rc::new(Cell::new(0));
        let rejected_clone = Rc::clone(&rejected);
        let _sub = client.on_unauthorized(move || rejected_clone.set(rejected_clone.get() + 1));
        let url = client.endpoint("rest/v1/team_members");

        // Anon key only: nothing to drop
        let result = client.send(client.request(Method::GET, &url)).await;
        assert!(matches!(result, Err(BackendError::Api { status: 401, .. })));
        assert_eq!(rejected.get(), 0);

        client.set_access_token(Some("jwt".to_string()));
        let result = client.send_anon(client.anon_request(Method::GET, &url)).await;
        assert!(result.is_err());
        assert_eq!(rejected.get(), 0);

        let result = client.send(client.request(Method::GET, &url)).await;
        assert!(result.is_err());
        assert_eq!(rejected.get(), 1);
    }
}
