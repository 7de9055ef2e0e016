//! Ordered multiset of waiting user ids.
//!
//! This is a hint store for queue-size reporting. Pairing decisions are made
//! against the ticket table, never against this list, so every caller treats
//! failures here as non-fatal.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::config::WaitingQueueConfig;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::MqError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Pops the two oldest entries, or nothing when fewer than two are present.
const POP_PAIR_SCRIPT: &str = r#"
if redis.call('LLEN', KEYS[1]) < 2 then
    return nil
end
local first = redis.call('LPOP', KEYS[1])
local second = redis.call('LPOP', KEYS[1])
return {first, second}
"#;

#[async_trait]
pub trait WaitingQueue: Send + Sync {
    /// Backend name for logs.
    fn backend(&self) -> &'static str;

    /// Append a user to the tail.
    async fn enqueue(&self, user_id: i32) -> Result<(), MqError>;

    /// Remove every entry for the user. No-op when absent.
    async fn dequeue(&self, user_id: i32) -> Result<(), MqError>;

    async fn size(&self) -> Result<usize, MqError>;

    /// Take the two oldest entries atomically.
    async fn pop_pair(&self) -> Result<Option<(i32, i32)>, MqError>;
}

/// In-process fallback used when Redis is not configured or unreachable.
#[derive(Default)]
pub struct InMemoryWaitingQueue {
    entries: Mutex<VecDeque<i32>>,
}

#[async_trait]
impl WaitingQueue for InMemoryWaitingQueue {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn enqueue(&self, user_id: i32) -> Result<(), MqError> {
        self.entries.lock().await.push_back(user_id);
        Ok(())
    }

    async fn dequeue(&self, user_id: i32) -> Result<(), MqError> {
        self.entries.lock().await.retain(|entry| *entry != user_id);
        Ok(())
    }

    async fn size(&self) -> Result<usize, MqError> {
        Ok(self.entries.lock().await.len())
    }

    async fn pop_pair(&self) -> Result<Option<(i32, i32)>, MqError> {
        let mut entries = self.entries.lock().await;
        if entries.len() < 2 {
            return Ok(None);
        }
        match (entries.pop_front(), entries.pop_front()) {
            (Some(first), Some(second)) => Ok(Some((first, second))),
            _ => Ok(None),
        }
    }
}

/// Redis list shared by every server process.
pub struct RedisWaitingQueue {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisWaitingQueue {
    /// Connect and verify the server answers `PING`.
    pub async fn connect(url: &str, key: &str) -> Result<Self, MqError> {
        let client = redis::Client::open(url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl WaitingQueue for RedisWaitingQueue {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn enqueue(&self, user_id: i32) -> Result<(), MqError> {
        let mut conn = self.conn.clone();
        let _: usize = conn.rpush(&self.key, user_id).await?;
        Ok(())
    }

    async fn dequeue(&self, user_id: i32) -> Result<(), MqError> {
        let mut conn = self.conn.clone();
        let _: usize = conn.lrem(&self.key, 0, user_id).await?;
        Ok(())
    }

    async fn size(&self) -> Result<usize, MqError> {
        let mut conn = self.conn.clone();
        let len: usize = conn.llen(&self.key).await?;
        Ok(len)
    }

    async fn pop_pair(&self) -> Result<Option<(i32, i32)>, MqError> {
        let mut conn = self.conn.clone();
        let popped: Option<Vec<i32>> = redis::Script::new(POP_PAIR_SCRIPT)
            .key(&self.key)
            .invoke_async(&mut conn)
            .await?;

        Ok(match popped.as_deref() {
            Some([first, second]) => Some((*first, *second)),
            _ => None,
        })
    }
}

/// Pick the waiting queue backend once at startup.
///
/// Redis is probed a single time. On failure the in-memory list is used for
/// the rest of the process lifetime.
pub async fn connect_waiting_queue(config: &WaitingQueueConfig) -> Arc<dyn WaitingQueue> {
    let Some(url) = config.redis_url.as_deref() else {
        info!("No waiting queue Redis configured, using in-memory waiting queue");
        return Arc::new(InMemoryWaitingQueue::default());
    };

    match tokio::time::timeout(PROBE_TIMEOUT, RedisWaitingQueue::connect(url, &config.key)).await
    {
        Ok(Ok(queue)) => {
            info!(key = %config.key, "Waiting queue connected to Redis");
            Arc::new(queue)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory waiting queue");
            Arc::new(InMemoryWaitingQueue::default())
        }
        Err(_) => {
            warn!(
                timeout_secs = PROBE_TIMEOUT.as_secs(),
                "Redis probe timed out, falling back to in-memory waiting queue"
            );
            Arc::new(InMemoryWaitingQueue::default())
        }
    }
}
