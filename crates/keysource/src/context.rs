//! Cancellation and deadline propagation for source operations.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::SecretsError;

/// Request-scoped context passed to every source operation.
///
/// Carries a cancellation token and an optional deadline. Backends that
/// block (network, disk) honour it; backends that answer immediately may
/// ignore it. Cloning shares the same token.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Context {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Creates a context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Replaces the cancellation token, e.g. with one tied to shutdown.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Sets a deadline. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a context that is cancelled with this one but can also be
    /// cancelled on its own without affecting the parent.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancels this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns the underlying cancellation token.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns the deadline, if one is set.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Returns an error if the context is already done.
    pub fn check(&self) -> Result<(), SecretsError> {
        if self.is_cancelled() {
            return Err(SecretsError::Cancelled);
        }
        if self.is_expired() {
            return Err(SecretsError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Resolves when the context is cancelled or its deadline passes,
    /// yielding the corresponding error.
    pub async fn done(&self) -> SecretsError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = self.cancel.cancelled() => SecretsError::Cancelled,
                () = tokio::time::sleep_until(deadline) => SecretsError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                SecretsError::Cancelled
            }
        }
    }

    /// Runs a fallible future, abandoning it if the context finishes first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, SecretsError>
    where
        F: Future<Output = Result<T, SecretsError>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn background_is_never_done() {
        let ctx = Context::background();

        assert!(!ctx.is_cancelled());
        assert!(!ctx.is_expired());
        assert!(ctx.deadline().is_none());
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let ctx = Context::background();
        let clone = ctx.clone();

        clone.cancel();

        assert!(ctx.is_cancelled());
        assert_eq!(ctx.check().unwrap_err().kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn child_cancel_does_not_reach_parent() {
        let parent = Context::background();
        let child = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn external_token_drives_cancellation() {
        let token = CancellationToken::new();
        let ctx = Context::background().with_cancellation(token.clone());

        token.cancel();

        assert!(ctx.is_cancelled());
    }

    #[test]
    fn earlier_deadline_wins() {
        let now = Instant::now();
        let early = now + Duration::from_secs(1);
        let late = now + Duration::from_secs(60);

        let ctx = Context::background().with_deadline(early).with_deadline(late);
        assert_eq!(ctx.deadline(), Some(early));

        let ctx = Context::background().with_deadline(late).with_deadline(early);
        assert_eq!(ctx.deadline(), Some(early));
    }

    #[test]
    fn zero_timeout_is_expired() {
        let ctx = Context::background().with_timeout(Duration::ZERO);

        assert!(ctx.is_expired());
        assert_eq!(ctx.check().unwrap_err().kind(), ErrorKind::DeadlineExceeded);
    }

    #[tokio::test]
    async fn run_returns_future_result() {
        let ctx = Context::background().with_timeout(Duration::from_secs(30));

        let value = ctx.run(async { Ok::<_, SecretsError>(42) }).await.unwrap();

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn run_rejects_cancelled_context() {
        let ctx = Context::background();
        ctx.cancel();

        let result = ctx.run(async { Ok::<_, SecretsError>(()) }).await;

        assert!(matches!(result, Err(SecretsError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn run_abandons_future_at_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(50));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<_, SecretsError>(())
            })
            .await;

        assert!(matches!(result, Err(SecretsError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn done_resolves_on_cancel() {
        let ctx = Context::background();
        let waiter = ctx.clone();

        let handle = tokio::spawn(async move { waiter.done().await });
        ctx.cancel();

        let err = handle.await.unwrap();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }
}
