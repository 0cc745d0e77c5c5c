//! Debounced persistence of the editor session.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use folio_core::{PortfolioData, PortfolioStore, Template, TemplateConfig};

use crate::server::SharedSession;

/// Quiet period before pending changes are written.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// A document that needs to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaveRequest {
    Config,
    Portfolio,
    Templates,
}

/// The last content written for each document.
#[derive(Debug, Default)]
struct Written {
    config: Option<TemplateConfig>,
    portfolio: Option<PortfolioData>,
    templates: Option<Vec<Template>>,
}

/// Handle for marking session documents dirty.
///
/// Requests are coalesced: a burst of edits produces one write per
/// document once no request has arrived for the quiet period.
#[derive(Debug, Clone)]
pub struct AutoSaver {
    tx: mpsc::UnboundedSender<SaveRequest>,
    written: Arc<Mutex<Written>>,
}

impl AutoSaver {
    /// Spawn the save task. It exits, flushing pending writes, when every
    /// handle has been dropped.
    pub fn spawn(
        session: SharedSession,
        store: PortfolioStore,
        quiet: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let written = Arc::new(Mutex::new(Written::default()));
        let handle = tokio::spawn(run(rx, session, store, quiet, Arc::clone(&written)));
        (Self { tx, written }, handle)
    }

    /// Mark a document dirty.
    pub fn request(&self, request: SaveRequest) {
        if self.tx.send(request).is_err() {
            tracing::warn!("Auto-save task has stopped, {:?} not saved", request);
        }
    }

    /// True when `config` is exactly what this saver last wrote.
    pub fn wrote_config(&self, config: &TemplateConfig) -> bool {
        self.check(|w| w.config.as_ref() == Some(config))
    }

    /// True when `data` is exactly what this saver last wrote.
    pub fn wrote_portfolio(&self, data: &PortfolioData) -> bool {
        self.check(|w| w.portfolio.as_ref() == Some(data))
    }

    /// True when `templates` are exactly what this saver last wrote.
    pub fn wrote_templates(&self, templates: &[Template]) -> bool {
        self.check(|w| w.templates.as_deref() == Some(templates))
    }

    fn check(&self, f: impl FnOnce(&Written) -> bool) -> bool {
        match self.written.lock() {
            Ok(written) => f(&written),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<SaveRequest>,
    session: SharedSession,
    store: PortfolioStore,
    quiet: Duration,
    written: Arc<Mutex<Written>>,
) {
    while let Some(first) = rx.recv().await {
        let mut dirty = BTreeSet::from([first]);
        let mut closed = false;

        loop {
            match tokio::time::timeout(quiet, rx.recv()).await {
                Ok(Some(request)) => {
                    dirty.insert(request);
                }
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        save(&session, &store, &dirty, &written).await;

        if closed {
            break;
        }
    }
}

/// Write the dirty documents. The session lock is held until the written
/// snapshots are recorded, so watch events for these writes always see them.
async fn save(
    session: &SharedSession,
    store: &PortfolioStore,
    dirty: &BTreeSet<SaveRequest>,
    written: &Mutex<Written>,
) {
    let session = session.read().await;
    let mut written = match written.lock() {
        Ok(w) => w,
        Err(poisoned) => poisoned.into_inner(),
    };

    for request in dirty {
        let result = match request {
            SaveRequest::Config => store
                .save_template_config(session.config())
                .map(|()| written.config = Some(session.config().clone())),
            SaveRequest::Portfolio => store
                .save_portfolio(session.data())
                .map(|()| written.portfolio = Some(session.data().clone())),
            SaveRequest::Templates => store
                .save_custom_templates(session.registry())
                .map(|()| written.templates = Some(session.registry().custom().to_vec())),
        };
        match result {
            Ok(()) => tracing::debug!("Saved {:?}", request),
            Err(e) => tracing::warn!("Failed to save {:?}: {}", request, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{EditorSession, KeyValueStore, MemoryStore, TemplateConfig, TemplateRegistry};
    use folio_core::store::{PORTFOLIO_DATA_KEY, TEMPLATE_CONFIG_KEY};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    /// Counts writes per store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Arc<AtomicUsize>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, folio_core::StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), folio_core::StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), folio_core::StoreError> {
            self.inner.remove(key)
        }
    }

    fn session() -> SharedSession {
        Arc::new(RwLock::new(EditorSession::new(
            TemplateRegistry::new(),
            TemplateConfig::default(),
            Default::default(),
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn coalesces_bursts_into_one_write() {
        let writes = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            writes: Arc::clone(&writes),
            ..Default::default()
        };
        let store = PortfolioStore::new(store);
        let (saver, handle) = AutoSaver::spawn(session(), store.clone(), DEFAULT_QUIET_PERIOD);

        for _ in 0..5 {
            saver.request(SaveRequest::Config);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(writes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        drop(saver);
        handle.await.unwrap();
        assert_eq!(store.load_template_config(), TemplateConfig::default());
    }

    #[tokio::test(start_paused = true)]
    async fn flushes_pending_writes_on_shutdown() {
        let memory = Arc::new(MemoryStore::new());
        let store = PortfolioStore::new(SharedMemory(Arc::clone(&memory)));
        let session = session();
        session.write().await.replace_portfolio(folio_core::PortfolioData {
            personal: folio_core::PersonalInfo {
                name: "Ada".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        let (saver, handle) = AutoSaver::spawn(session, store, DEFAULT_QUIET_PERIOD);

        saver.request(SaveRequest::Portfolio);
        drop(saver);
        handle.await.unwrap();

        assert!(memory.get(PORTFOLIO_DATA_KEY).unwrap().unwrap().contains("Ada"));
        assert_eq!(memory.get(TEMPLATE_CONFIG_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn remembers_written_snapshots() {
        let session = session();
        let (saver, handle) =
            AutoSaver::spawn(Arc::clone(&session), PortfolioStore::in_memory(), DEFAULT_QUIET_PERIOD);
        let saved = session.read().await.config().clone();
        assert!(!saver.wrote_config(&saved));

        saver.request(SaveRequest::Config);
        saver.request(SaveRequest::Templates);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(saver.wrote_config(&saved));
        assert!(saver.wrote_templates(&[]));
        assert!(!saver.wrote_portfolio(&Default::default()));

        session.write().await.select_template("minimal").unwrap();
        let current = session.read().await.config().clone();
        assert!(!saver.wrote_config(&current));

        drop(saver);
        handle.await.unwrap();
    }

    struct SharedMemory(Arc<MemoryStore>);

    impl KeyValueStore for SharedMemory {
        fn get(&self, key: &str) -> Result<Option<String>, folio_core::StoreError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), folio_core::StoreError> {
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), folio_core::StoreError> {
            self.0.remove(key)
        }
    }
}
