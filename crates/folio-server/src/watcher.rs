//! Watches the state directory for edits made outside the server.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use folio_core::store::{CUSTOM_TEMPLATES_KEY, PORTFOLIO_DATA_KEY, TEMPLATE_CONFIG_KEY};

/// A change to one of the persisted documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The template configuration file changed
    ConfigChanged(PathBuf),

    /// The portfolio data file changed
    PortfolioChanged(PathBuf),

    /// The custom template list changed
    TemplatesChanged(PathBuf),
}

/// File watcher over the state directory.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `dir`. Returns the watcher and a channel of classified events.
    pub fn new(dir: &Path) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            let debounce = Duration::from_millis(100);
            let mut last: Option<(WatchEvent, std::time::Instant)> = None;

            while let Ok(event) = sync_rx.recv() {
                for path in &event.paths {
                    let Some(watch_event) = classify_event(path, &event.kind) else {
                        continue;
                    };

                    // Editors and atomic renames fire several events per save.
                    let now = std::time::Instant::now();
                    if let Some((prev, at)) = &last {
                        if *prev == watch_event && now.duration_since(*at) < debounce {
                            continue;
                        }
                    }
                    last = Some((watch_event.clone(), now));

                    if async_tx.blocking_send(watch_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event by the document its file backs.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    if !matches!(kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return None;
    }

    let name = path.file_name()?.to_str()?;
    let key = name.strip_suffix(".json")?;
    let path = path.to_path_buf();

    match key {
        TEMPLATE_CONFIG_KEY => Some(WatchEvent::ConfigChanged(path)),
        PORTFOLIO_DATA_KEY => Some(WatchEvent::PortfolioChanged(path)),
        CUSTOM_TEMPLATES_KEY => Some(WatchEvent::TemplatesChanged(path)),
        _ => None,
    }
}
