//! Integration test: settings store
//!
//! Loading from good, legacy and corrupt backends, clamping on update,
//! change notification and write-failure recovery.

use flapattack::settings::persistence::{KEY_BLOB, KEY_DIFFICULTY, KEY_MUSIC, KEY_MUSIC_VOLUME};
use flapattack::settings::{KeyValueStore, MemoryStore};
use flapattack::utils::JsonFileStore;
use flapattack::{CoreError, CoreResult, Difficulty, Settings, SettingsPatch, SettingsStore};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_settings_path() -> std::path::PathBuf {
    let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "flapattack_settings_it_{}_{}",
        std::process::id(),
        n
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("settings.json")
}

/// Backend whose writes can be switched off.
struct Unreliable {
    inner: MemoryStore,
    writable: Rc<RefCell<bool>>,
}

impl KeyValueStore for Unreliable {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        if !*self.writable.borrow() {
            return Err(CoreError::PersistenceUnavailable("read-only".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> CoreResult<()> {
        self.inner.remove(key)
    }
}

#[test]
fn test_fresh_store_yields_defaults() {
    let store = SettingsStore::load(MemoryStore::new());
    let s = store.get();
    assert_eq!(s, Settings::default());
    assert_eq!(s.difficulty, Difficulty::Normal);
    assert_eq!(s.music_volume, 70);
    assert_eq!(s.sfx_volume, 80);
    assert_eq!(s.pipe_speed, 100);
    assert_eq!(s.gap_size, 150);
    assert!(s.show_trail);
    assert!(s.screen_shake);
    assert!(!s.night_mode);
}

#[test]
fn test_out_of_range_updates_are_clamped() {
    let mut store = SettingsStore::load(MemoryStore::new());
    let s = store.update(SettingsPatch {
        music_volume: Some(250),
        sfx_volume: Some(-40),
        pipe_speed: Some(10),
        gap_size: Some(9000),
        ..SettingsPatch::default()
    });
    assert_eq!(s.music_volume, 100);
    assert_eq!(s.sfx_volume, 0);
    assert_eq!(s.pipe_speed, 50);
    assert_eq!(s.gap_size, 200);
    assert_eq!(store.get(), s);
}

#[test]
fn test_corrupt_backend_never_fails_load() {
    let backend = MemoryStore::with_entries([
        (KEY_BLOB, "{{{ not json"),
        (KEY_DIFFICULTY, "nightmare"),
        (KEY_MUSIC_VOLUME, "loud"),
    ]);
    let store = SettingsStore::load(backend);
    assert_eq!(store.get(), Settings::default());
}

#[test]
fn test_legacy_keys_are_understood() {
    let backend = MemoryStore::with_entries([
        (KEY_DIFFICULTY, "2"),
        (KEY_MUSIC_VOLUME, "0.5"),
        (KEY_MUSIC, "1"),
    ]);
    let s = SettingsStore::load(backend).get();
    assert_eq!(s.difficulty, Difficulty::Hard);
    assert_eq!(s.music_volume, 50);
    assert!(!s.music_on);
}

#[test]
fn test_empty_update_notifies_once() {
    let mut store = SettingsStore::load(MemoryStore::new());
    let calls = Rc::new(RefCell::new(0));
    let seen = Rc::clone(&calls);
    store.subscribe(move |_| *seen.borrow_mut() += 1);

    let before = store.get();
    let after = store.update(SettingsPatch::default());
    assert_eq!(before, after);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_unsubscribed_handler_is_not_called() {
    let mut store = SettingsStore::load(MemoryStore::new());
    let calls = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&calls);
    let id = store.subscribe(move |s: &Settings| seen.borrow_mut().push(s.difficulty));

    store.update(SettingsPatch::difficulty(Difficulty::Easy));
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.update(SettingsPatch::difficulty(Difficulty::Hard));

    assert_eq!(*calls.borrow(), vec![Difficulty::Easy]);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_failed_write_keeps_memory_and_flushes_later() {
    let writable = Rc::new(RefCell::new(false));
    let backend = Unreliable {
        inner: MemoryStore::new(),
        writable: Rc::clone(&writable),
    };
    let mut store = SettingsStore::load(backend);

    let s = store.update(SettingsPatch::difficulty(Difficulty::Hard));
    assert_eq!(s.difficulty, Difficulty::Hard);
    assert_eq!(store.get().difficulty, Difficulty::Hard);
    assert!(store.is_dirty());

    *writable.borrow_mut() = true;
    store.flush().unwrap();
    assert!(!store.is_dirty());

    let reloaded = SettingsStore::load(store.backend().inner.clone());
    assert_eq!(reloaded.get().difficulty, Difficulty::Hard);
}

#[test]
fn test_settings_survive_restart_on_disk() {
    let path = temp_settings_path();
    {
        let mut store = SettingsStore::load(JsonFileStore::open(&path).unwrap());
        store.update(SettingsPatch {
            difficulty: Some(Difficulty::Easy),
            night_mode: Some(true),
            gap_size: Some(180),
            ..SettingsPatch::default()
        });
    }

    let store = SettingsStore::load(JsonFileStore::open(&path).unwrap());
    let s = store.get();
    assert_eq!(s.difficulty, Difficulty::Easy);
    assert!(s.night_mode);
    assert_eq!(s.gap_size, 180);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_reset_restores_defaults_and_notifies() {
    let mut store = SettingsStore::load(MemoryStore::new());
    store.update(SettingsPatch {
        difficulty: Some(Difficulty::Hard),
        show_trail: Some(false),
        ..SettingsPatch::default()
    });

    let last = Rc::new(RefCell::new(None));
    let seen = Rc::clone(&last);
    store.subscribe(move |s: &Settings| *seen.borrow_mut() = Some(*s));

    assert_eq!(store.reset(), Settings::default());
    assert_eq!(*last.borrow(), Some(Settings::default()));
    let reloaded = SettingsStore::load(store.backend().clone());
    assert_eq!(reloaded.get(), Settings::default());
}
