//! Keyword usage telemetry — counts which portfolio keywords job descriptions hit.
//!
//! Recording is fire-and-forget: `spawn_record` detaches a task and never joins it.
//! A failed write is logged and has no effect on the analysis that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Sorted set holding one member per keyword (lowercased), scored by hit count.
pub const KEYWORD_USAGE_KEY: &str = "folio:keyword_usage";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait KeywordUsageTracker: Send + Sync {
    async fn record(&self, keywords: &[String]) -> Result<(), TelemetryError>;
}

/// Used when no telemetry backend is configured.
pub struct NoopTracker;

#[async_trait]
impl KeywordUsageTracker for NoopTracker {
    async fn record(&self, _keywords: &[String]) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Increments per-keyword counters in a Redis sorted set.
pub struct RedisKeywordTracker {
    client: redis::Client,
}

impl RedisKeywordTracker {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeywordUsageTracker for RedisKeywordTracker {
    async fn record(&self, keywords: &[String]) -> Result<(), TelemetryError> {
        let members = normalize(keywords);
        if members.is_empty() {
            return Ok(());
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let mut pipe = redis::pipe();
        for member in &members {
            pipe.zincr(KEYWORD_USAGE_KEY, member, 1).ignore();
        }
        pipe.query_async::<_, ()>(&mut conn).await?;

        debug!("Recorded usage for {} keywords", members.len());
        Ok(())
    }
}

/// Lowercased, deduplicated, blank-free.
fn normalize(keywords: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Records `keywords` on a detached task. The handle is dropped on purpose.
pub fn spawn_record(tracker: Arc<dyn KeywordUsageTracker>, keywords: Vec<String>) {
    if keywords.is_empty() {
        return;
    }
    tokio::spawn(async move {
        if let Err(e) = tracker.record(&keywords).await {
            warn!("Keyword usage tracking failed: {e}");
        }
    });
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Captures every recorded batch; optionally fails each call.
    #[derive(Default)]
    pub struct RecordingTracker {
        pub batches: Mutex<Vec<Vec<String>>>,
        pub fail: bool,
    }

    #[async_trait]
    impl KeywordUsageTracker for RecordingTracker {
        async fn record(&self, keywords: &[String]) -> Result<(), TelemetryError> {
            self.batches.lock().unwrap().push(keywords.to_vec());
            if self.fail {
                return Err(TelemetryError::Redis(redis::RedisError::from((
                    redis::ErrorKind::IoError,
                    "connection refused",
                ))));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingTracker;
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_dedupes() {
        let keywords = vec![
            "Rust".to_string(),
            "rust".to_string(),
            "  ".to_string(),
            "Docker".to_string(),
        ];
        assert_eq!(normalize(&keywords), vec!["rust".to_string(), "docker".to_string()]);
    }

    #[tokio::test]
    async fn test_noop_tracker_accepts_anything() {
        assert!(NoopTracker.record(&["Rust".to_string()]).await.is_ok());
    }

    #[tokio::test]
    async fn test_spawn_record_runs_detached() {
        let tracker = Arc::new(RecordingTracker::default());
        spawn_record(tracker.clone(), vec!["Rust".to_string()]);

        for _ in 0..50 {
            if !tracker.batches.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(tracker.batches.lock().unwrap()[0], vec!["Rust".to_string()]);
    }

    #[tokio::test]
    async fn test_spawn_record_skips_empty_batches() {
        let tracker = Arc::new(RecordingTracker::default());
        spawn_record(tracker.clone(), vec![]);
        tokio::task::yield_now().await;
        assert!(tracker.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_redis_tracker_unreachable_server_errors() {
        let client = redis::Client::open("redis://127.0.0.1:1/").unwrap();
        let tracker = RedisKeywordTracker::new(client);
        assert!(tracker.record(&["Rust".to_string()]).await.is_err());
    }
}
