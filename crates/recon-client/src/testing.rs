//! In-memory scripted [`Backend`] for protocol tests.
//!
//! Rules map `(method, path)` (optionally pinned to a [`Route`]) to a
//! sequence of replies; the last reply repeats once the sequence is used up.
//! Unscripted requests answer 404. Every call is recorded.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::{ApiRequest, ApiResponse, Backend, Method, Route};
use crate::error::ClientError;

pub const DIRECT_BASE: &str = "http://direct.test";
pub const PROXIED_BASE: &str = "http://proxied.test";

/// One scripted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: u16,
    body: Value,
    location: Option<String>,
    timeout: bool,
    delay: Duration,
}

impl Reply {
    #[must_use]
    pub const fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            location: None,
            timeout: false,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::json(status, Value::Null)
    }

    #[must_use]
    pub fn text(status: u16, text: &str) -> Self {
        Self::json(status, Value::String(text.to_string()))
    }

    /// Fails like a request that never got an answer.
    #[must_use]
    pub fn timeout() -> Self {
        Self {
            timeout: true,
            ..Self::status(0)
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Answer only after `delay` (tokio time, so paused clocks skip it).
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as the scripted backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub route: Route,
    pub path: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct Rule {
    method: Method,
    route: Option<Route>,
    path: String,
    replies: Vec<Reply>,
    served: usize,
}

impl Rule {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self.route.is_none_or(|route| route == request.route)
    }

    fn next_reply(&mut self) -> Reply {
        let idx = self.served.min(self.replies.len().saturating_sub(1));
        self.served += 1;
        self.replies
            .get(idx)
            .cloned()
            .unwrap_or_else(|| Reply::status(404))
    }
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` on any route with `reply`, forever.
    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.push_rule(method, None, path, vec![reply]);
    }

    /// Answer `method path` on one route only.
    pub fn on_route(&self, route: Route, method: Method, path: &str, reply: Reply) {
        self.push_rule(method, Some(route), path, vec![reply]);
    }

    /// Answer successive calls with successive replies; the last one repeats.
    pub fn on_sequence(&self, method: Method, path: &str, replies: Vec<Reply>) {
        self.push_rule(method, None, path, replies);
    }

    fn push_rule(&self, method: Method, route: Option<Route>, path: &str, replies: Vec<Reply>) {
        lock(&self.rules).push(Rule {
            method,
            route,
            path: path.to_string(),
            replies,
            served: 0,
        });
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls made to `path`, any method, any route.
    #[must_use]
    pub fn calls_to(&self, path: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.path == path).count()
    }

    fn reply_for(&self, request: &ApiRequest) -> Reply {
        let mut rules = lock(&self.rules);
        // Route-pinned rules take precedence over route-agnostic ones.
        let pinned = rules
            .iter()
            .position(|r| r.route.is_some() && r.matches(request));
        let idx = pinned.or_else(|| rules.iter().position(|r| r.matches(request)));
        idx.map_or_else(|| Reply::status(404), |i| rules[i].next_reply())
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn url_for(&self, route: Route, path: &str) -> String {
        let base = match route {
            Route::Direct => DIRECT_BASE,
            Route::Proxied => PROXIED_BASE,
        };
        format!("{base}{path}")
    }

    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        lock(&self.calls).push(RecordedCall {
            method: request.method,
            route: request.route,
            path: request.path.clone(),
            token: token.map(str::to_string),
            body: request.body.clone(),
        });

        let reply = self.reply_for(request);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        if reply.timeout {
            return Err(ClientError::Timeout);
        }
        match reply.status {
            429 => Err(ClientError::RateLimited {
                retry_after_secs: 60,
            }),
            200..=299 => Ok(ApiResponse {
                status: reply.status,
                body: reply.body,
                location: reply.location,
            }),
            status => Err(ClientError::Api {
                status,
                message: reply.body.to_string(),
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
