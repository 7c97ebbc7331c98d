//! Ordered first-success combinator shared by both resolvers.

use std::future::Future;

use crate::run::Run;

/// One way of producing a value during a run.
///
/// Strategies are tried in order by [`first_success`]; a strategy returns
/// `None` both when it found nothing and when it could not finish.
pub trait Strategy<I: ?Sized + Sync>: Sync {
    type Output: Send;

    fn name(&self) -> &'static str;

    /// Whether the strategy issues requests. Strategies that only inspect
    /// what is already in hand still run once the run is spent.
    fn needs_budget(&self) -> bool {
        true
    }

    fn attempt(
        &self,
        run: &mut Run<'_>,
        input: &I,
    ) -> impl Future<Output = Option<Self::Output>> + Send;
}

/// Try `strategies` in order and return the first value produced.
///
/// Once the run is spent only strategies that need no budget are consulted.
pub async fn first_success<I, S>(strategies: &[S], run: &mut Run<'_>, input: &I) -> Option<S::Output>
where
    I: ?Sized + Sync,
    S: Strategy<I>,
{
    for strategy in strategies {
        if strategy.needs_budget() {
            if let Some(reason) = run.spent_reason() {
                tracing::debug!(strategy = strategy.name(), reason, "resolve: strategy skipped");
                continue;
            }
        }
        if let Some(found) = strategy.attempt(run, input).await {
            tracing::debug!(strategy = strategy.name(), "resolve: strategy succeeded");
            return Some(found);
        }
    }
    None
}
