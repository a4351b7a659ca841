use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// Хранилище в одном JSON-файле `{ "ключ": "значение" }`.
///
/// Файл читается один раз при открытии, дальше `get` отдаёт снимок в памяти.
/// `set` обновляет снимок и отдаёт полный снимок фоновому писателю, так что
/// запрос не ждёт диска. Писатель пишет во временный файл и переименовывает
/// его поверх основного. При drop очередь дописывается до конца.
pub struct FileStore {
    path: PathBuf,
    snapshot: Mutex<Entries>,
    writes: Option<mpsc::UnboundedSender<Entries>>,
    writer: Option<JoinHandle<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshot = read_entries(&path);

        let (writes, rx) = mpsc::unbounded_channel();
        let writer_path = path.clone();
        // Отдельный поток: хранилище работает и вне tokio runtime
        let writer = thread::Builder::new()
            .name("file-store-writer".to_string())
            .spawn(move || run_writer(&writer_path, rx));

        let (writes, writer) = match writer {
            Ok(handle) => (Some(writes), Some(handle)),
            Err(e) => {
                warn!("Cannot start writer for {}, writing inline: {}", path.display(), e);
                (None, None)
            }
        };

        Self {
            path,
            snapshot: Mutex::new(snapshot),
            writes,
            writer,
        }
    }
}

fn read_entries(path: &Path) -> Entries {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Entries::new(),
    };
    match serde_json::from_str(&data) {
        Ok(map) => map,
        Err(e) => {
            warn!("Store file {} is corrupt, ignoring: {}", path.display(), e);
            Entries::new()
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_entries(path: &Path, entries: &Entries) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_string_pretty(entries)?;
    let tmp = temp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}

fn run_writer(path: &Path, mut rx: mpsc::UnboundedReceiver<Entries>) {
    while let Some(mut entries) = rx.blocking_recv() {
        // Промежуточные снимки устарели, пишем только последний
        while let Ok(newer) = rx.try_recv() {
            entries = newer;
        }
        match write_entries(path, &entries) {
            Ok(()) => debug!("Store file {} written", path.display()),
            Err(e) => warn!("Failed to write store file {}: {}", path.display(), e),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        // Отправка под блокировкой снимка сохраняет порядок записей
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot.insert(key.to_string(), value);

        let sent = match &self.writes {
            Some(writes) => writes.send(snapshot.clone()).is_ok(),
            None => false,
        };
        if !sent {
            if let Err(e) = write_entries(&self.path, &snapshot) {
                warn!("Failed to write store file {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Закрываем канал, писатель дописывает очередь и выходит
        self.writes.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                warn!("Writer for {} panicked", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("store.json");

        let store = FileStore::new(&path);
        store.set("selected-seats", "[\"a\"]".to_string());
        store.set("other", "x".to_string());
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("selected-seats").as_deref(), Some("[\"a\"]"));
        assert_eq!(reopened.get("other").as_deref(), Some("x"));
        assert_eq!(reopened.get("missing"), None);
    }

    #[test]
    fn last_write_wins_and_no_temp_file_is_left() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path);
        for i in 0..50 {
            store.set("selected-seats", format!("[{}]", i));
        }
        assert_eq!(store.get("selected-seats").as_deref(), Some("[49]"));
        drop(store);

        assert!(!temp_path(&path).exists());
        let on_disk = read_entries(&path);
        assert_eq!(on_disk.get("selected-seats").map(String::as_str), Some("[49]"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("selected-seats"), None);

        store.set("selected-seats", "[]".to_string());
        assert_eq!(store.get("selected-seats").as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn set_does_not_need_the_caller_to_wait() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path);
        store.set("selected-seats", "[1]".to_string());
        assert_eq!(store.get("selected-seats").as_deref(), Some("[1]"));
        drop(store);

        assert_eq!(FileStore::new(&path).get("selected-seats").as_deref(), Some("[1]"));
    }
}
