//! The settings store: single source of truth for player preferences.

use super::persistence::{read_settings, write_settings, KeyValueStore};
use super::types::{Settings, SettingsPatch};
use crate::error::CoreResult;

/// Identifies a registered change handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&Settings)>;

/// Owns the current [`Settings`], persists them through a [`KeyValueStore`]
/// and notifies subscribers on every update.
///
/// Persistence is best effort. A failed write is logged and the in-memory
/// settings are kept, so the next successful write restores durability.
pub struct SettingsStore<B: KeyValueStore> {
    backend: B,
    current: Settings,
    subscribers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
    dirty: bool,
}

impl<B: KeyValueStore> SettingsStore<B> {
    /// Load settings from `backend`. Never fails: an unreadable backend yields
    /// the default settings.
    pub fn load(backend: B) -> Self {
        let current = match read_settings(&backend) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Settings::default()
            }
        };
        Self {
            backend,
            current,
            subscribers: Vec::new(),
            next_id: 0,
            dirty: false,
        }
    }

    /// Snapshot of the current settings.
    pub fn get(&self) -> Settings {
        self.current
    }

    /// Merge `patch`, clamp, persist and notify. Returns the resulting
    /// settings. An empty patch changes nothing but still persists and
    /// notifies once.
    pub fn update(&mut self, patch: SettingsPatch) -> Settings {
        self.current.apply(&patch);
        self.persist();
        self.notify();
        self.current
    }

    /// Restore defaults, persist and notify. The stored record is overwritten
    /// in one write, replacing any older keys.
    pub fn reset(&mut self) -> Settings {
        self.current = Settings::default();
        self.persist();
        self.notify();
        self.current
    }

    /// Retry writing the in-memory settings.
    pub fn flush(&mut self) -> CoreResult<()> {
        write_settings(&mut self.backend, &self.current)?;
        self.dirty = false;
        Ok(())
    }

    /// Whether the last write failed and the backend is behind.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Register `handler` to be called with the full settings after every
    /// update, in subscription order. Handlers must not call back into the
    /// store.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Settings) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("{}; keeping settings in memory", e);
            self.dirty = true;
        }
    }

    fn notify(&mut self) {
        let snapshot = self.current;
        for (_, handler) in self.subscribers.iter_mut() {
            handler(&snapshot);
        }
    }
}
