//! Хранилище ключ-значение для сохранения выбора между сессиями.
//!
//! Контракт простой: `get` возвращает строку или ничего, `set` всегда
//! "успешен", ошибки бэкенда логируются и проглатываются.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

pub mod file;
#[cfg(feature = "redis-store")]
pub mod redis;

pub use file::FileStore;
#[cfg(feature = "redis-store")]
pub use self::redis::RedisStore;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Хранилище в памяти процесса.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(key, value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}
