use std::path::{Component, Path};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::store::{ChangeFeed, StoreEvent};
use super::vault_io::{doc_path, is_markdown, is_skipped_name};

/// A file system watcher for a vault directory.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl VaultWatcher {
    /// Start watching `root` recursively.
    /// Returns a `VaultWatcher` whose `poll()` method should be called each tick.
    pub fn start(root: &Path, ignore: Vec<String>) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let root_owned = root.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "vault watcher error");
                        return;
                    }
                };
                for evt in translate_event(&root_owned, &ignore, event) {
                    let _ = tx.send(evt);
                }
            },
            Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching vault");
        Ok(VaultWatcher {
            _watcher: watcher,
            rx,
        })
    }
}

impl ChangeFeed for VaultWatcher {
    fn poll(&self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

/// Turn a raw notify event into store events for the markdown documents it
/// touches. Paths outside the vault, in hidden or ignored directories, or
/// without a `.md` extension are dropped.
fn translate_event(root: &Path, ignore: &[String], event: Event) -> Vec<StoreEvent> {
    let make: fn(String) -> StoreEvent = match event.kind {
        EventKind::Create(_) => StoreEvent::Created,
        EventKind::Modify(_) => StoreEvent::Modified,
        EventKind::Remove(_) => StoreEvent::Removed,
        _ => return Vec::new(),
    };

    event
        .paths
        .into_iter()
        .filter_map(|p| relevant_path(root, ignore, &p))
        .map(make)
        .collect()
}

fn relevant_path(root: &Path, ignore: &[String], path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    if !is_markdown(rel) {
        return None;
    }
    let hidden = rel.components().any(|c| match c {
        Component::Normal(name) => is_skipped_name(&name.to_string_lossy(), ignore),
        _ => false,
    });
    if hidden {
        return None;
    }
    Some(doc_path(rel))
}
