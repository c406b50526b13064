//! Mirror fallback
//!
//! Tries a provider's mirrors one at a time in priority order and returns the
//! first stream that resolves. Each attempt is bounded by a timeout; when it
//! fires the attempt's [`CancellationToken`] is cancelled and its future is
//! dropped, so an abandoned attempt never contributes to the result.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::{MirrorCandidate, ResolvedStream};
use crate::providers::ProviderError;

/// Default bound on a single mirror attempt
pub const DEFAULT_MIRROR_TIMEOUT: Duration = Duration::from_millis(6000);

/// Outcome of one mirror attempt
#[derive(Debug)]
enum Attempt {
    Resolved(ResolvedStream),
    Miss,
    Failed(ProviderError),
    TimedOut,
}

/// Resolve through `mirrors`, first success wins
///
/// Candidates are tried in ascending priority (ties keep their input order),
/// each at most once. Errors, misses and timeouts all move on to the next
/// candidate. Returns `None` once every candidate is exhausted.
pub async fn resolve_with_mirrors<F, Fut>(
    mut mirrors: Vec<MirrorCandidate>,
    timeout: Duration,
    mut resolve: F,
) -> Option<ResolvedStream>
where
    F: FnMut(MirrorCandidate, CancellationToken) -> Fut,
    Fut: Future<Output = Result<Option<ResolvedStream>, ProviderError>>,
{
    mirrors.sort_by_key(|m| m.priority);

    for mirror in mirrors {
        let label = mirror.label.clone();
        let token = CancellationToken::new();

        debug!(mirror = %label, priority = mirror.priority, "trying mirror");

        let attempt = {
            let work = resolve(mirror, token.clone());
            tokio::select! {
                result = work => match result {
                    Ok(Some(stream)) => Attempt::Resolved(stream),
                    Ok(None) => Attempt::Miss,
                    Err(e) => Attempt::Failed(e),
                },
                _ = tokio::time::sleep(timeout) => {
                    token.cancel();
                    Attempt::TimedOut
                }
            }
        };

        match attempt {
            Attempt::Resolved(stream) => {
                debug!(mirror = %label, url = %stream.url, "mirror resolved");
                return Some(stream);
            }
            Attempt::Miss => debug!(mirror = %label, "mirror had no stream"),
            Attempt::Failed(e) => warn!(mirror = %label, error = %e, "mirror failed"),
            Attempt::TimedOut => {
                warn!(mirror = %label, timeout_ms = timeout.as_millis() as u64, "mirror timed out")
            }
        }
    }

    None
}

/// Await `work` unless `token` is cancelled first
///
/// Mirror resolve functions wrap their outbound I/O in this so a timed-out
/// attempt stops at its next suspension point.
pub async fn cancellable<T, Fut>(token: &CancellationToken, work: Fut) -> Result<T, ProviderError>
where
    Fut: Future<Output = Result<T, ProviderError>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(ProviderError::Cancelled),
        result = work => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StreamType;

    #[test]
    fn test_empty_mirror_list_is_none() {
        let result = tokio_test::block_on(resolve_with_mirrors(
            Vec::new(),
            DEFAULT_MIRROR_TIMEOUT,
            |_, _| async { Ok(Some(ResolvedStream::new("x", StreamType::Hls))) },
        ));
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_cancellable_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();

        let result: Result<(), _> = cancellable(&token, std::future::pending()).await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let mirrors = vec![
            MirrorCandidate::new("first", "First", 1),
            MirrorCandidate::new("second", "Second", 1),
        ];

        let result = resolve_with_mirrors(mirrors, DEFAULT_MIRROR_TIMEOUT, |m, _| async move {
            Ok(Some(ResolvedStream::new(m.id, StreamType::Iframe)))
        })
        .await;

        assert_eq!(result.map(|s| s.url).as_deref(), Some("first"));
    }
}
