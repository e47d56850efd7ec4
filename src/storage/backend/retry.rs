//! Whole-operation retry for transient database failures.
//!
//! Only units that either fully commit or fully roll back go through
//! [`with_retry`]: single reads, and the transactions behind approve, reject,
//! delete, track usage, click and event counters. A retried moderation
//! transaction re-reads the suggestion, so an approval that lost a race ends
//! in Conflict rather than a second question. Bare inserts outside a
//! transaction are not retried.

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Driver error codes worth another attempt.
const TRANSIENT_CODES: &[&str] = &[
    // MySQL: lock wait timeout, deadlock
    "1205", "1213",
    // PostgreSQL: serialization failure, deadlock
    "40001", "40P01",
    // SQLite: BUSY, LOCKED, BUSY_RECOVERY, LOCKED_SHAREDCACHE, BUSY_SNAPSHOT, BUSY_TIMEOUT
    "5", "6", "261", "262", "517", "773",
];

/// Fallback when the driver gives no code.
const TRANSIENT_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "serialization failure",
];

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    /// Doubling delay capped at `max_delay_ms`, plus up to 25% jitter.
    fn delay(&self, attempt: u32) -> Duration {
        let doubled = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX));
        let capped = doubled.min(self.max_delay_ms);
        let jitter = rand::random_range(0..=capped / 4);
        Duration::from_millis(capped.saturating_add(jitter))
    }
}

fn message_is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MESSAGES.iter().any(|m| message.contains(m))
}

fn runtime_is_transient(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            match sqlx_err.as_database_error().and_then(|e| e.code()) {
                Some(code) => TRANSIENT_CODES.contains(&&*code),
                None => message_is_transient(&sqlx_err.to_string()),
            }
        }
        RuntimeErr::Internal(message) => message_is_transient(message),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// Pool exhaustion, dropped connections, lock contention.
pub fn is_transient(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime_is_transient(runtime),
        _ => false,
    }
}

/// Run `operation`, re-running it on transient errors up to
/// `config.max_retries` more times.
///
/// Logical outcomes should ride inside `Ok` (see `TxnResult`), so only
/// database failures reach the retry decision.
pub async fn with_retry<T, F, Fut>(name: &str, config: RetryConfig, mut operation: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded on retry {}", name, attempt);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if attempt >= config.max_retries || !is_transient(&err) {
            return Err(err);
        }

        attempt += 1;
        let delay = config.delay(attempt);
        warn!(
            "{} hit a transient database error ({}), retry {}/{} in {:?}",
            name, err, attempt, config.max_retries, delay
        );
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::errors::AskmeError;

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    fn sqlite_busy() -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(
            "database is locked while committing approval".to_string(),
        ))
    }

    #[test]
    fn test_lock_contention_is_transient() {
        assert!(is_transient(&sqlite_busy()));
        assert!(is_transient(&DbErr::Query(RuntimeErr::Internal(
            "Deadlock found when trying to get lock".to_string()
        ))));
        assert!(is_transient(&DbErr::ConnectionAcquire(
            sea_orm::error::ConnAcquireErr::Timeout
        )));
    }

    #[test]
    fn test_duplicate_question_text_is_not_transient() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: questions.text".to_string(),
        ));
        assert!(!is_transient(&err));
        assert!(!is_transient(&DbErr::RecordNotFound("suggestion 7".to_string())));
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = RetryConfig::default();
        assert!((100..=125).contains(&config.delay(1).as_millis()));
        assert!((400..=500).contains(&config.delay(3).as_millis()));
        assert!((2000..=2500).contains(&config.delay(40).as_millis()));
    }

    #[tokio::test]
    async fn test_lost_race_surfaces_as_conflict_after_retry() {
        // first attempt collides with another writer, the rerun sees the
        // suggestion already approved
        let calls = AtomicU32::new(0);
        let outcome = with_retry("approve(7)", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(sqlite_busy())
                } else {
                    Ok(Err::<(), _>(AskmeError::conflict(
                        "Only pending suggestions can be approved",
                    )))
                }
            }
        })
        .await
        .unwrap();

        assert!(matches!(outcome, Err(AskmeError::Conflict(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry("track_question_usage", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<i64, _>(sqlite_busy()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result = with_retry("click(3)", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<i64, _>(DbErr::RecordNotFound("question 3".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
