//! Per-run state: budget accounting, cancellation, and the attempt log.

use std::time::Duration;

use recon_client::{ApiRequest, ApiResponse, Backend};
use recon_core::{AttemptOutcome, EndpointAttempt, RetryBudget};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::catalog::EndpointCatalog;

/// State owned by one resolution run.
///
/// Every request of the run goes through [`Run::request`], which enforces
/// the attempt ceiling and the deadline, observes cancellation, and records
/// an [`EndpointAttempt`]. Nothing here outlives the run.
pub struct Run<'a> {
    backend: &'a dyn Backend,
    catalog: &'a dyn EndpointCatalog,
    token: Option<&'a str>,
    budget: RetryBudget,
    cancel: CancellationToken,
    started: Instant,
    sent: u32,
    attempts: Vec<EndpointAttempt>,
}

impl<'a> Run<'a> {
    #[must_use]
    pub fn new(
        backend: &'a dyn Backend,
        catalog: &'a dyn EndpointCatalog,
        token: Option<&'a str>,
        budget: RetryBudget,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backend,
            catalog,
            token,
            budget,
            cancel,
            started: Instant::now(),
            sent: 0,
            attempts: Vec::new(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &'a dyn EndpointCatalog {
        self.catalog
    }

    #[must_use]
    pub const fn budget(&self) -> &RetryBudget {
        &self.budget
    }

    /// Requests actually sent so far.
    #[must_use]
    pub const fn attempts_made(&self) -> u32 {
        self.sent
    }

    #[must_use]
    pub fn attempts(&self) -> &[EndpointAttempt] {
        &self.attempts
    }

    /// Why the run may not send anything more, if it may not.
    #[must_use]
    pub fn spent_reason(&self) -> Option<&'static str> {
        if self.cancel.is_cancelled() {
            Some("cancelled")
        } else if self.sent >= self.budget.max_attempts {
            Some("attempt ceiling reached")
        } else if self.started.elapsed() >= self.budget.deadline {
            Some("deadline reached")
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.spent_reason().is_some()
    }

    fn remaining(&self) -> Duration {
        self.budget.deadline.saturating_sub(self.started.elapsed())
    }

    /// Send one request and record its outcome.
    ///
    /// Returns the response for a 2xx answer and `None` for anything else:
    /// non-2xx status, transport failure, a spent budget, or cancellation.
    pub async fn request(&mut self, pattern: &str, request: &ApiRequest) -> Option<ApiResponse> {
        let url = self.backend.url_for(request.route, &request.path);
        if let Some(reason) = self.spent_reason() {
            self.record(pattern, url, AttemptOutcome::Skipped(reason.into()));
            return None;
        }

        self.sent += 1;
        let backend = self.backend;
        let token = self.token;
        let remaining = self.remaining();
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = tokio::time::timeout(remaining, backend.send(request, token)) => Some(result),
        };

        match result {
            None => {
                self.record(pattern, url, AttemptOutcome::Skipped("cancelled".into()));
                None
            }
            Some(Err(_elapsed)) => {
                self.record(
                    pattern,
                    url,
                    AttemptOutcome::Transport("run deadline reached".into()),
                );
                None
            }
            Some(Ok(Err(e))) => {
                let outcome = e
                    .status()
                    .map_or_else(|| AttemptOutcome::Transport(e.to_string()), AttemptOutcome::Status);
                self.record(pattern, url, outcome);
                None
            }
            Some(Ok(Ok(response))) => {
                self.record(pattern, url, AttemptOutcome::Status(response.status));
                Some(response)
            }
        }
    }

    /// Wait `delay`, cut short by the deadline.
    ///
    /// Returns `false` when the run is spent afterwards (or was cancelled
    /// while waiting).
    pub async fn pause(&self, delay: Duration) -> bool {
        if self.is_spent() {
            return false;
        }
        if !delay.is_zero() {
            let wait = delay.min(self.remaining());
            tokio::select! {
                () = self.cancel.cancelled() => return false,
                () = tokio::time::sleep(wait) => {}
            }
        }
        !self.is_spent()
    }

    /// Close the run, logging a summary. Returns the number of requests sent.
    pub fn finish(self) -> u32 {
        let failures = self
            .attempts
            .iter()
            .filter(|a| !a.outcome.is_success())
            .count();
        tracing::debug!(
            attempts = self.sent,
            failures,
            elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "resolve: run finished"
        );
        self.sent
    }

    fn record(&mut self, pattern: &str, url: String, outcome: AttemptOutcome) {
        tracing::debug!(template = pattern, %url, %outcome, "resolve: endpoint attempt");
        self.attempts.push(EndpointAttempt {
            template: pattern.to_string(),
            url,
            outcome,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefaultCatalog;
    use pretty_assertions::assert_eq;
    use recon_client::Method;
    use recon_client::testing::{Reply, ScriptedBackend};
    use serde_json::json;

    #[tokio::test]
    async fn records_success_and_failure() {
        let backend = ScriptedBackend::new();
        backend.on(Method::Get, "/ok", Reply::json(200, json!([])));
        backend.on(Method::Get, "/boom", Reply::status(500));

        let mut run = Run::new(
            &backend,
            &DefaultCatalog,
            None,
            RetryBudget::immediate(1, 1),
            CancellationToken::new(),
        );
        assert!(run.request("/ok", &ApiRequest::get("/ok")).await.is_some());
        assert!(run.request("/boom", &ApiRequest::get("/boom")).await.is_none());

        let outcomes: Vec<_> = run.attempts().iter().map(|a| a.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![AttemptOutcome::Status(200), AttemptOutcome::Status(500)]
        );
        assert_eq!(run.finish(), 2);
    }

    #[tokio::test]
    async fn attempt_ceiling_skips_further_requests() {
        let backend = ScriptedBackend::new();
        let mut run = Run::new(
            &backend,
            &DefaultCatalog,
            None,
            RetryBudget::immediate(1, 1).with_max_attempts(1),
            CancellationToken::new(),
        );
        run.request("/a", &ApiRequest::get("/a")).await;
        run.request("/b", &ApiRequest::get("/b")).await;

        assert_eq!(run.attempts_made(), 1);
        assert_eq!(backend.calls().len(), 1);
        assert!(matches!(
            run.attempts()[1].outcome,
            AttemptOutcome::Skipped(ref reason) if reason == "attempt ceiling reached"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cuts_a_slow_request() {
        let backend = ScriptedBackend::new();
        backend.on(
            Method::Get,
            "/slow",
            Reply::json(200, json!({})).with_delay(Duration::from_secs(30)),
        );
        let mut run = Run::new(
            &backend,
            &DefaultCatalog,
            None,
            RetryBudget::immediate(1, 1).with_deadline(Duration::from_secs(5)),
            CancellationToken::new(),
        );

        assert!(run.request("/slow", &ApiRequest::get("/slow")).await.is_none());
        assert_eq!(run.spent_reason(), Some("deadline reached"));
        assert!(!run.pause(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn cancelled_run_sends_nothing() {
        let backend = ScriptedBackend::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut run = Run::new(
            &backend,
            &DefaultCatalog,
            None,
            RetryBudget::default(),
            cancel,
        );

        assert!(run.request("/a", &ApiRequest::get("/a")).await.is_none());
        assert!(!run.pause(Duration::from_secs(60)).await);
        assert!(backend.calls().is_empty());
        assert_eq!(run.attempts_made(), 0);
    }
}
