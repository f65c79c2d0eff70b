//! The play scene: one game session bound to the settings store for as long
//! as the scene is active, plus the pipes it flies through.

use crate::engine::{ArcadeBody, PhysicsBody, TimerQueue};
use crate::obstacles::PipeField;
use crate::session::{GameEvent, GameSession, SessionState, TimerTag};
use crate::settings::{KeyValueStore, SettingsStore, SubscriptionId};
use rand::Rng;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Session type driven by the play scene.
pub type ArcadeSession = GameSession<ArcadeBody, TimerQueue<TimerTag>>;

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Points scored this frame.
    pub scored: u32,
    /// The run ended during this frame.
    pub game_over: bool,
}

pub struct PlayScene<R> {
    session: Rc<RefCell<ArcadeSession>>,
    subscription: SubscriptionId,
    pipes: PipeField,
    rng: R,
}

impl<R: Rng> PlayScene<R> {
    /// Create a fresh session from the current settings and subscribe it to
    /// settings changes.
    pub fn enter<B: KeyValueStore>(store: &mut SettingsStore<B>, rng: R) -> Self {
        let session = Rc::new(RefCell::new(GameSession::new(
            store.get(),
            ArcadeBody::new(),
            TimerQueue::new(),
        )));

        let weak = Rc::downgrade(&session);
        let subscription = store.subscribe(move |settings| {
            if let Some(session) = weak.upgrade() {
                session.borrow_mut().on_settings_changed(settings);
            }
        });

        log::debug!("play scene entered");
        Self {
            session,
            subscription,
            pipes: PipeField::new(),
            rng,
        }
    }

    /// Cancel pending timers, unsubscribe and drop the session.
    pub fn leave<B: KeyValueStore>(self, store: &mut SettingsStore<B>) {
        self.session.borrow_mut().teardown();
        store.unsubscribe(self.subscription);
        log::debug!("play scene left");
    }

    pub fn session(&self) -> Ref<'_, ArcadeSession> {
        self.session.borrow()
    }

    pub fn pipes(&self) -> &PipeField {
        &self.pipes
    }

    pub fn state(&self) -> SessionState {
        self.session.borrow().state()
    }

    /// Deliver a UI event. Returns whether the session accepted it.
    pub fn input(&mut self, event: GameEvent) -> bool {
        let accepted = self.session.borrow_mut().try_handle(event).is_ok();
        if accepted && self.state() == SessionState::Start {
            self.pipes.clear();
        }
        accepted
    }

    /// Advance timers, physics and obstacles by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u64) -> FrameReport {
        let mut session = self.session.borrow_mut();
        let fired = session.timer_mut().advance(dt_ms);
        for f in fired {
            session.on_timer(f);
        }

        let mut report = FrameReport::default();
        if session.state() != SessionState::Playing || session.is_counting_down() {
            return report;
        }

        let dt = dt_ms as f64 / 1000.0;
        session.physics_mut().step(dt);

        let settings = *session.settings();
        let bird = session.physics().position();
        let obstacles = self.pipes.advance(dt, &settings, bird, &mut self.rng);
        for _ in 0..obstacles.passed {
            if session.record_pass() {
                report.scored += 1;
            }
        }
        if obstacles.collided {
            session.handle(GameEvent::Collision);
        }
        session.update();

        report.game_over = session.state() == SessionState::GameOver;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, MemoryStore, SettingsPatch};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn store() -> SettingsStore<MemoryStore> {
        SettingsStore::load(MemoryStore::new())
    }

    #[test]
    fn test_enter_subscribes_and_leave_unsubscribes() {
        let mut store = store();
        let scene = PlayScene::enter(&mut store, ChaCha8Rng::seed_from_u64(0));
        assert_eq!(store.subscriber_count(), 1);
        scene.leave(&mut store);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_settings_update_reaches_session() {
        let mut store = store();
        let mut scene = PlayScene::enter(&mut store, ChaCha8Rng::seed_from_u64(0));
        scene.input(GameEvent::PrimaryInput);
        store.update(SettingsPatch::difficulty(Difficulty::Hard));
        assert_eq!(scene.session().physics().gravity(), 2000.0);
        assert_eq!(scene.state(), SessionState::Playing);
    }

    #[test]
    fn test_dropped_scene_does_not_break_notifications() {
        let mut store = store();
        let scene = PlayScene::enter(&mut store, ChaCha8Rng::seed_from_u64(0));
        drop(scene);
        store.update(SettingsPatch::difficulty(Difficulty::Easy));
        assert_eq!(store.get().difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_free_fall_ends_run() {
        let mut store = store();
        let mut scene = PlayScene::enter(&mut store, ChaCha8Rng::seed_from_u64(5));
        scene.input(GameEvent::PrimaryInput);
        let mut ended = false;
        for _ in 0..200 {
            if scene.tick(16).game_over {
                ended = true;
                break;
            }
        }
        assert!(ended);
        assert_eq!(scene.state(), SessionState::GameOver);
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let mut store = store();
        let mut scene = PlayScene::enter(&mut store, ChaCha8Rng::seed_from_u64(5));
        let before = scene.session().physics().position();
        scene.tick(500);
        assert_eq!(scene.session().physics().position(), before);
        assert!(scene.pipes().pipes.is_empty());
    }

    #[test]
    fn test_restart_clears_pipes() {
        let mut store = store();
        let mut scene = PlayScene::enter(&mut store, ChaCha8Rng::seed_from_u64(5));
        scene.input(GameEvent::PrimaryInput);
        scene.tick(16);
        assert!(!scene.pipes().pipes.is_empty());
        scene.input(GameEvent::PauseRequest);
        assert!(scene.input(GameEvent::ResumeRequest));
        assert!(!scene.input(GameEvent::PrimaryInput));
        // countdown finishes, then fall out of the world
        for _ in 0..400 {
            scene.tick(16);
            if scene.state() == SessionState::GameOver {
                break;
            }
        }
        assert_eq!(scene.state(), SessionState::GameOver);
        assert!(scene.input(GameEvent::PrimaryInput));
        assert!(scene.pipes().pipes.is_empty());
    }
}
