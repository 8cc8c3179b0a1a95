use crate::error::{KeyError, Result};
use crate::store::KeyStore;
use tokio::sync::Mutex;

/// Round-robin handout of upstream keys.
///
/// The cursor and the underlying store sit behind one mutex, so taking the
/// next key is a single read-then-increment with no interleaving:
/// concurrent requests each observe a distinct, deterministically
/// advancing key. Mutations write through to the store's file.
#[derive(Debug)]
pub struct KeyRotator {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    store: KeyStore,
    cursor: usize,
}

impl KeyRotator {
    pub fn new(store: KeyStore) -> Self {
        Self {
            inner: Mutex::new(Inner { store, cursor: 0 }),
        }
    }

    /// Take the next key in rotation, wrapping at the end of the pool.
    ///
    /// An empty pool is the caller's pre-flight error; nothing upstream
    /// should be attempted after this fails.
    pub async fn next_key(&self) -> Result<String> {
        let mut inner = self.inner.lock().await;

        if inner.store.is_empty() {
            return Err(KeyError::NoKeys);
        }

        // Removals may have left the cursor past the end.
        if inner.cursor >= inner.store.len() {
            inner.cursor = 0;
        }

        let key = inner.store.keys()[inner.cursor].clone();
        inner.cursor = (inner.cursor + 1) % inner.store.len();
        Ok(key)
    }

    /// The key the next request would use, for status reporting.
    pub async fn current_key(&self) -> Option<String> {
        let inner = self.inner.lock().await;

        if inner.store.is_empty() {
            return None;
        }
        let idx = if inner.cursor >= inner.store.len() {
            0
        } else {
            inner.cursor
        };
        Some(inner.store.keys()[idx].clone())
    }

    pub async fn list(&self) -> Vec<String> {
        self.inner.lock().await.store.keys().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.store.len()
    }

    /// Add a key and persist the pool. Returns whether the pool changed.
    pub async fn add(&self, key: String) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        if !inner.store.add(key) {
            return Ok(false);
        }
        inner.store.save()?;
        Ok(true)
    }

    /// Remove a key and persist the pool. Returns whether the pool changed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        if !inner.store.remove(key) {
            return Ok(false);
        }
        inner.store.save()?;
        Ok(true)
    }
}
