//! Scripted [`HttpTransport`] for client tests.

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use super::listeners::ListenerHub;
use super::{Auth, Connection, HttpRequest, HttpResponse, HttpTransport, OneApiClient};
use crate::config::NotificationConfig;
use crate::notify::BoxFuture;

#[derive(Debug, Clone)]
pub(super) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    requests: Vec<(String, HttpRequest)>,
    responses: VecDeque<HttpResponse>,
    fallback: HttpResponse,
}

impl FakeTransport {
    /// Answers `200 {}` once the scripted responses run out.
    pub(super) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                requests: Vec::new(),
                responses: VecDeque::new(),
                fallback: HttpResponse {
                    status: 200,
                    body: "{}".to_owned(),
                },
            })),
        }
    }

    pub(super) fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.state.lock().unwrap().responses.push_back(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub(super) fn otherwise(self, status: u16, body: impl Into<String>) -> Self {
        self.state.lock().unwrap().fallback = HttpResponse {
            status,
            body: body.into(),
        };
        self
    }

    pub(super) fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(super) fn last_request(&self) -> HttpRequest {
        let state = self.state.lock().unwrap();
        state.requests.last().expect("no request recorded").1.clone()
    }

    pub(super) fn last_authorization(&self) -> String {
        let state = self.state.lock().unwrap();
        state.requests.last().expect("no request recorded").0.clone()
    }
}

impl HttpTransport for FakeTransport {
    fn execute<'a>(
        &'a self,
        auth: &'a Auth,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let authorization = match auth {
                Auth::Basic { username, password } => {
                    format!("Basic {}:{}", username.as_str(), password.as_str())
                }
                Auth::Ibsso(token) => format!("IBSSO {}", token.as_str()),
            };
            let mut state = self.state.lock().unwrap();
            state.requests.push((authorization, request));
            let response = match state.responses.pop_front() {
                Some(response) => response,
                None => state.fallback.clone(),
            };
            Ok(response)
        })
    }
}

pub(super) fn assert_param(params: &[(String, String)], key: &str, value: &str) {
    assert!(
        params.iter().any(|(k, v)| k == key && v == value),
        "missing param {key}={value}; got: {params:?}"
    );
}

pub(super) fn make_client(auth: Auth, transport: FakeTransport) -> OneApiClient {
    make_client_with(auth, transport, NotificationConfig::default())
}

pub(super) fn make_client_with(
    auth: Auth,
    transport: FakeTransport,
    notifications: NotificationConfig,
) -> OneApiClient {
    OneApiClient {
        connection: Connection {
            auth,
            base_url: "https://example.invalid/1".to_owned(),
            http: Arc::new(transport),
        },
        notifications,
        listeners: Arc::new(ListenerHub::new()),
    }
}
