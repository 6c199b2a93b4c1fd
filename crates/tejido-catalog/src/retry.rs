use std::future::Future;
use std::time::Duration;

use tracing::warn;

use tejido_core::ports::CatalogError;

/// Presupuesto de reintentos con backoff exponencial.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 4, base_delay: Duration::from_millis(500) }
  }
}

impl RetryPolicy {
  fn backoff(&self, attempt: u32) -> Duration {
    self.base_delay * 2u32.saturating_pow(attempt)
  }
}

/// Runs `call` until it succeeds, returns a non-retryable error, or the
/// attempt budget runs out. `RateLimited` waits the server-suggested delay
/// when present, everything else follows the exponential backoff.
pub async fn with_retry<T, F, Fut>(
  policy: &RetryPolicy,
  operation: &str,
  mut call: F,
) -> Result<T, CatalogError>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, CatalogError>>,
{
  let mut attempt = 0u32;

  loop {
    match call().await {
      Ok(value) => return Ok(value),
      Err(err) if err.is_retryable() && attempt + 1 < policy.max_attempts => {
        let delay = match &err {
          CatalogError::RateLimited { retry_after: Some(wait) } => *wait,
          _ => policy.backoff(attempt),
        };
        warn!(
          operation,
          attempt,
          delay_ms = delay.as_millis() as u64,
          error = %err,
          "catalog call failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
      }
      Err(err) => return Err(err),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};

  fn fast_policy() -> RetryPolicy {
    RetryPolicy { max_attempts: 4, base_delay: Duration::from_millis(1) }
  }

  #[tokio::test]
  async fn test_retries_transient_errors_until_success() {
    let calls = AtomicU32::new(0);

    let result = with_retry(&fast_policy(), "op", || {
      let n = calls.fetch_add(1, Ordering::SeqCst);
      async move {
        if n < 2 { Err(CatalogError::Network("flaky".into())) } else { Ok(n) }
      }
    })
    .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_auth_errors_are_terminal() {
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = with_retry(&fast_policy(), "op", || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Err(CatalogError::Auth("bad secret".into())) }
    })
    .await;

    assert!(matches!(result, Err(CatalogError::Auth(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_budget_exhaustion_surfaces_last_error() {
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = with_retry(&fast_policy(), "op", || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Err(CatalogError::Network("still down".into())) }
    })
    .await;

    assert!(matches!(result, Err(CatalogError::Network(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn test_rate_limit_honors_server_delay() {
    let calls = AtomicU32::new(0);
    let start = std::time::Instant::now();

    let result = with_retry(&fast_policy(), "op", || {
      let n = calls.fetch_add(1, Ordering::SeqCst);
      async move {
        if n == 0 {
          Err(CatalogError::RateLimited { retry_after: Some(Duration::from_millis(20)) })
        } else {
          Ok(())
        }
      }
    })
    .await;

    assert!(result.is_ok());
    assert!(start.elapsed() >= Duration::from_millis(20));
  }
}
