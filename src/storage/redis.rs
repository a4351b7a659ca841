use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::KeyValueStore;

/// Redis с локальным снимком.
///
/// Ключи читаются один раз при подключении, дальше `get` отдаёт снимок,
/// а `set` обновляет снимок и ставит запись в очередь фоновому писателю.
/// Один писатель сохраняет порядок записей.
pub struct RedisStore {
    snapshot: Mutex<HashMap<String, String>>,
    writes: mpsc::UnboundedSender<(String, String)>,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, preload: &[&str]) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let mut conn: MultiplexedConnection = client.get_multiplexed_async_connection().await?;
        let mut writer = conn.clone();

        let mut snapshot = HashMap::new();
        for key in preload {
            let value: Option<String> = conn.get(*key).await?;
            if let Some(value) = value {
                snapshot.insert(key.to_string(), value);
            }
        }
        info!("Redis store connected, preloaded {} keys", snapshot.len());

        let (writes, mut rx) = mpsc::unbounded_channel::<(String, String)>();
        tokio::spawn(async move {
            while let Some((key, value)) = rx.recv().await {
                let result: redis::RedisResult<()> = writer.set(&key, value).await;
                if let Err(e) = result {
                    warn!("Redis write for {} failed: {}", key, e);
                }
            }
        });

        Ok(Self {
            snapshot: Mutex::new(snapshot),
            writes,
        })
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());

        if self.writes.send((key.to_string(), value)).is_err() {
            warn!("Redis writer is gone, {} kept only in memory", key);
        }
    }
}
