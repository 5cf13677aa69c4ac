//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Url;

use crate::client::{ApiRequest, RawResponse, ServiceClient, Transport, TransportError, TransportFuture};

/// Endpoint used by [`ScriptedTransport::into_client`].
pub const TEST_ENDPOINT: &str = "http://cinder.test/v3/project";

#[derive(Clone, Debug)]
enum Scripted {
    Reply(RawResponse),
    Fail(String),
    Pending,
}

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<Scripted>,
    requests: Vec<ApiRequest>,
}

/// Scripted transport that returns pre-seeded replies in FIFO order.
///
/// Used to drive deterministic service behaviour without opening sockets.
/// Every dispatched request is recorded for later assertions.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the transport in a client pointed at [`TEST_ENDPOINT`].
    ///
    /// # Panics
    ///
    /// Never in practice: [`TEST_ENDPOINT`] is a valid URL.
    #[must_use]
    pub fn into_client(self) -> ServiceClient<Self> {
        let endpoint = Url::parse(TEST_ENDPOINT)
            .unwrap_or_else(|err| panic!("test endpoint should parse: {err}"));
        ServiceClient::new(self, endpoint)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a reply with the given status and body.
    pub fn push_status(&self, status: u16, body: &str) {
        self.lock()
            .responses
            .push_back(Scripted::Reply(RawResponse::new(status, body)));
    }

    /// Queues a JSON reply.
    pub fn push_json(&self, status: u16, body: &serde_json::Value) {
        self.push_status(status, &body.to_string());
    }

    /// Queues a transport failure.
    pub fn push_transport_error(&self, message: &str) {
        self.lock()
            .responses
            .push_back(Scripted::Fail(message.to_owned()));
    }

    /// Queues a reply that never completes, for cancellation tests.
    pub fn push_pending(&self) {
        self.lock().responses.push_back(Scripted::Pending);
    }

    /// Returns a snapshot of all requests dispatched so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of replies not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lock().responses.len()
    }
}

impl Transport for ScriptedTransport {
    fn dispatch(&self, request: ApiRequest) -> TransportFuture<'_> {
        let next = {
            let mut state = self.lock();
            state.requests.push(request);
            state.responses.pop_front()
        };
        Box::pin(async move {
            match next {
                Some(Scripted::Reply(response)) => Ok(response),
                Some(Scripted::Fail(message)) => Err(TransportError::new(message)),
                Some(Scripted::Pending) => std::future::pending().await,
                None => Err(TransportError::new("no scripted response queued")),
            }
        })
    }
}
