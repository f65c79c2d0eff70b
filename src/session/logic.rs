//! The game session state machine.
//!
//! | From         | Event              | To           |
//! |--------------|--------------------|--------------|
//! | Start        | PrimaryInput       | Playing      |
//! | Playing      | PrimaryInput       | Playing (flap) |
//! | Playing      | OutOfBounds / Collision | GameOver |
//! | Playing      | PauseRequest       | Paused       |
//! | Paused       | ResumeRequest      | CountingDown |
//! | CountingDown | CountdownTick      | CountingDown |
//! | CountingDown | CountdownComplete  | Playing      |
//! | GameOver     | PrimaryInput       | Start        |
//!
//! Physics runs only while `Playing`. Any other (state, event) pair is
//! ignored.

use super::types::{
    GameEvent, PauseSnapshot, SessionState, TimerTag, TrailHistory, COUNTDOWN_HANDOFF_MS,
    COUNTDOWN_INTERVAL_MS, COUNTDOWN_STEPS,
};
use crate::engine::physics::{PhysicsBody, BIRD_START_X, BIRD_START_Y};
use crate::engine::timer::{Fired, Timer, TimerHandle};
use crate::error::{CoreError, CoreResult};
use crate::settings::{DifficultyProfile, Settings};

/// One play attempt. Owns its physics body and timer collaborators.
#[derive(Debug)]
pub struct GameSession<P, T> {
    state: SessionState,
    score: u32,
    final_score: Option<u32>,
    settings: Settings,
    profile: DifficultyProfile,
    is_counting_down: bool,
    countdown_remaining: u32,
    countdown_timer: Option<TimerHandle>,
    handoff_timer: Option<TimerHandle>,
    pause_snapshot: Option<PauseSnapshot>,
    trail: TrailHistory,
    physics: P,
    timer: T,
}

impl<P: PhysicsBody, T: Timer<TimerTag>> GameSession<P, T> {
    /// Create a session in `Start` with physics suspended.
    pub fn new(settings: Settings, mut physics: P, timer: T) -> Self {
        physics.pause();
        physics.set_gravity(0.0);
        Self {
            state: SessionState::Start,
            score: 0,
            final_score: None,
            profile: settings.profile(),
            settings,
            is_counting_down: false,
            countdown_remaining: 0,
            countdown_timer: None,
            handoff_timer: None,
            pause_snapshot: None,
            trail: TrailHistory::new(),
            physics,
            timer,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score recorded when the last run ended.
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_counting_down(&self) -> bool {
        self.is_counting_down
    }

    /// Countdown steps left; 0 once the last step has shown.
    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn pause_snapshot(&self) -> Option<PauseSnapshot> {
        self.pause_snapshot
    }

    pub fn trail(&self) -> &TrailHistory {
        &self.trail
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Apply an event. Events with no transition from the current state are
    /// dropped.
    pub fn handle(&mut self, event: GameEvent) {
        if let Err(e) = self.try_handle(event) {
            log::trace!("{}", e);
        }
    }

    /// Apply an event, reporting events that have no transition.
    pub fn try_handle(&mut self, event: GameEvent) -> CoreResult<()> {
        let rejected = CoreError::InvalidTransitionRequest {
            state: self.state,
            event,
        };

        if self.is_counting_down && event == GameEvent::PrimaryInput {
            return Err(rejected);
        }

        match (self.state, event) {
            (SessionState::Start, GameEvent::PrimaryInput) => self.start_run(),
            (SessionState::Playing, GameEvent::PrimaryInput) => self.flap(),
            (SessionState::Playing, GameEvent::OutOfBounds | GameEvent::Collision) => {
                self.end_run()
            }
            (SessionState::Playing, GameEvent::PauseRequest) => self.pause(),
            (SessionState::Paused, GameEvent::ResumeRequest) => self.begin_countdown(),
            (SessionState::CountingDown, GameEvent::CountdownTick)
                if self.countdown_remaining > 0 =>
            {
                self.countdown_tick()
            }
            (SessionState::CountingDown, GameEvent::CountdownComplete)
                if self.countdown_remaining == 0 =>
            {
                self.finish_countdown()
            }
            (SessionState::GameOver, GameEvent::PrimaryInput) => self.reset(),
            _ => return Err(rejected),
        }

        log::debug!("{:?} -> {:?}", event, self.state);
        Ok(())
    }

    /// Route a timer firing. Firings from timers this session no longer owns
    /// are ignored.
    pub fn on_timer(&mut self, fired: Fired<TimerTag>) {
        let owned = match fired.tag {
            TimerTag::CountdownTick => self.countdown_timer == Some(fired.handle),
            TimerTag::CountdownComplete => self.handoff_timer == Some(fired.handle),
        };
        if owned {
            self.handle(fired.tag.into());
        } else {
            log::trace!("dropping stale timer {:?}", fired);
        }
    }

    /// Per-frame housekeeping: record the trail and detect the bird leaving
    /// the world. Suspended while counting down.
    pub fn update(&mut self) {
        if self.is_counting_down || self.state != SessionState::Playing {
            return;
        }
        if self.settings.show_trail {
            let (x, y) = self.physics.position();
            self.trail.record(x, y);
        }
        if self.physics.is_out_of_bounds() {
            self.handle(GameEvent::OutOfBounds);
        }
    }

    /// Count one passed obstacle. Only scores while playing.
    pub fn record_pass(&mut self) -> bool {
        if self.state == SessionState::Playing && !self.is_counting_down {
            self.score += 1;
            true
        } else {
            false
        }
    }

    /// React to a settings change.
    pub fn on_settings_changed(&mut self, settings: &Settings) {
        self.settings = *settings;
        self.profile = settings.profile();
        if self.state == SessionState::Playing {
            self.physics.set_gravity(self.profile.gravity);
        }
        if !settings.show_trail {
            self.trail.clear();
        }
    }

    /// Cancel any countdown timers still in flight.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.countdown_timer.take() {
            self.timer.cancel(handle);
        }
        if let Some(handle) = self.handoff_timer.take() {
            self.timer.cancel(handle);
        }
    }

    fn start_run(&mut self) {
        self.physics.set_gravity(self.profile.gravity);
        self.physics.resume();
        self.state = SessionState::Playing;
    }

    fn flap(&mut self) {
        self.physics.set_velocity_y(self.profile.impulse_velocity);
    }

    fn end_run(&mut self) {
        self.physics.pause();
        self.final_score = Some(self.score);
        self.state = SessionState::GameOver;
    }

    fn pause(&mut self) {
        let (x, y) = self.physics.position();
        self.pause_snapshot = Some(PauseSnapshot {
            x,
            y,
            velocity_y: self.physics.velocity_y(),
        });
        self.physics.pause();
        self.state = SessionState::Paused;
    }

    fn begin_countdown(&mut self) {
        self.teardown();
        self.state = SessionState::CountingDown;
        self.is_counting_down = true;
        self.countdown_remaining = COUNTDOWN_STEPS;
        self.countdown_timer = Some(self.timer.schedule_repeating(
            COUNTDOWN_INTERVAL_MS,
            COUNTDOWN_STEPS,
            TimerTag::CountdownTick,
        ));
    }

    fn countdown_tick(&mut self) {
        self.countdown_remaining -= 1;
        if self.countdown_remaining == 0 {
            if let Some(handle) = self.countdown_timer.take() {
                self.timer.cancel(handle);
            }
            self.handoff_timer = Some(
                self.timer
                    .schedule_once(COUNTDOWN_HANDOFF_MS, TimerTag::CountdownComplete),
            );
        }
    }

    fn finish_countdown(&mut self) {
        self.teardown();
        if let Some(snapshot) = self.pause_snapshot.take() {
            self.physics.set_position(snapshot.x, snapshot.y);
            self.physics.set_velocity_y(snapshot.velocity_y);
        }
        self.physics.set_gravity(self.profile.gravity);
        self.physics.resume();
        self.is_counting_down = false;
        self.state = SessionState::Playing;
    }

    fn reset(&mut self) {
        self.teardown();
        self.score = 0;
        self.final_score = None;
        self.pause_snapshot = None;
        self.countdown_remaining = 0;
        self.is_counting_down = false;
        self.trail.clear();
        self.physics.pause();
        self.physics.set_gravity(0.0);
        self.physics.set_velocity_y(0.0);
        self.physics.set_position(BIRD_START_X, BIRD_START_Y);
        self.state = SessionState::Start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ArcadeBody, TimerQueue};
    use crate::settings::Difficulty;

    type TestSession = GameSession<ArcadeBody, TimerQueue<TimerTag>>;

    fn session() -> TestSession {
        GameSession::new(Settings::default(), ArcadeBody::new(), TimerQueue::new())
    }

    fn advance(session: &mut TestSession, ms: u64) {
        let fired = session.timer_mut().advance(ms);
        for f in fired {
            session.on_timer(f);
        }
    }

    #[test]
    fn test_new_session_is_suspended_in_start() {
        let s = session();
        assert_eq!(s.state(), SessionState::Start);
        assert_eq!(s.score(), 0);
        assert!(s.physics().is_paused());
        assert!(!s.is_counting_down());
    }

    #[test]
    fn test_start_applies_gravity() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        assert_eq!(s.state(), SessionState::Playing);
        assert!(!s.physics().is_paused());
        assert_eq!(s.physics().gravity(), 1500.0);
    }

    #[test]
    fn test_flap_sets_impulse_velocity() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PrimaryInput);
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.physics().velocity_y(), -400.0);
    }

    #[test]
    fn test_out_of_bounds_ends_run_and_records_score() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.record_pass();
        s.record_pass();
        s.handle(GameEvent::OutOfBounds);
        assert_eq!(s.state(), SessionState::GameOver);
        assert_eq!(s.final_score(), Some(2));
        assert!(s.physics().is_paused());
    }

    #[test]
    fn test_undefined_transitions_are_rejected() {
        let mut s = session();
        assert!(s.try_handle(GameEvent::PauseRequest).is_err());
        assert!(s.try_handle(GameEvent::ResumeRequest).is_err());
        assert!(s.try_handle(GameEvent::CountdownTick).is_err());
        assert_eq!(s.state(), SessionState::Start);

        s.handle(GameEvent::PrimaryInput);
        assert!(matches!(
            s.try_handle(GameEvent::ResumeRequest),
            Err(CoreError::InvalidTransitionRequest {
                state: SessionState::Playing,
                event: GameEvent::ResumeRequest,
            })
        ));
    }

    #[test]
    fn test_pause_snapshots_and_suspends() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PrimaryInput);
        s.physics_mut().step(0.05);
        let velocity = s.physics().velocity_y();
        let (_, y) = s.physics().position();

        s.handle(GameEvent::PauseRequest);
        assert_eq!(s.state(), SessionState::Paused);
        assert!(s.physics().is_paused());
        let snap = s.pause_snapshot().unwrap();
        assert_eq!(snap.velocity_y, velocity);
        assert_eq!(snap.y, y);
    }

    #[test]
    fn test_countdown_sequence() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PauseRequest);
        s.handle(GameEvent::ResumeRequest);
        assert_eq!(s.state(), SessionState::CountingDown);
        assert_eq!(s.countdown_remaining(), 3);
        assert!(s.physics().is_paused());

        advance(&mut s, 1000);
        assert_eq!(s.countdown_remaining(), 2);
        advance(&mut s, 1000);
        assert_eq!(s.countdown_remaining(), 1);
        advance(&mut s, 1000);
        assert_eq!(s.countdown_remaining(), 0);
        assert_eq!(s.state(), SessionState::CountingDown);

        advance(&mut s, COUNTDOWN_HANDOFF_MS);
        assert_eq!(s.state(), SessionState::Playing);
        assert!(!s.is_counting_down());
        assert!(!s.physics().is_paused());
        assert_eq!(s.timer().pending(), 0);
    }

    #[test]
    fn test_pause_ignored_while_counting_down() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PauseRequest);
        s.handle(GameEvent::ResumeRequest);
        s.handle(GameEvent::PauseRequest);
        assert_eq!(s.state(), SessionState::CountingDown);
    }

    #[test]
    fn test_teardown_makes_timers_stale() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PauseRequest);
        s.handle(GameEvent::ResumeRequest);
        s.teardown();
        assert_eq!(s.timer().pending(), 0);
        advance(&mut s, 10_000);
        assert_eq!(s.countdown_remaining(), 3);
        assert_eq!(s.state(), SessionState::CountingDown);
    }

    #[test]
    fn test_foreign_timer_firing_ignored() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PauseRequest);
        s.handle(GameEvent::ResumeRequest);
        let foreign = s.timer_mut().schedule_once(10, TimerTag::CountdownTick);
        s.on_timer(Fired {
            handle: foreign,
            tag: TimerTag::CountdownTick,
        });
        assert_eq!(s.countdown_remaining(), 3);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.record_pass();
        s.physics_mut().step(0.2);
        s.update();
        s.handle(GameEvent::Collision);
        s.handle(GameEvent::PrimaryInput);

        assert_eq!(s.state(), SessionState::Start);
        assert_eq!(s.score(), 0);
        assert!(s.trail().is_empty());
        assert!(s.physics().is_paused());
        assert_eq!(s.physics().position(), (BIRD_START_X, BIRD_START_Y));
        assert_eq!(s.physics().gravity(), 0.0);
    }

    #[test]
    fn test_record_pass_only_while_playing() {
        let mut s = session();
        assert!(!s.record_pass());
        s.handle(GameEvent::PrimaryInput);
        assert!(s.record_pass());
        s.handle(GameEvent::PauseRequest);
        assert!(!s.record_pass());
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn test_settings_change_applies_gravity_when_playing() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        let hard = Settings {
            difficulty: Difficulty::Hard,
            ..Settings::default()
        };
        s.on_settings_changed(&hard);
        assert_eq!(s.physics().gravity(), 2000.0);
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn test_settings_change_while_paused_applies_on_resume() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.handle(GameEvent::PauseRequest);
        let easy = Settings {
            difficulty: Difficulty::Easy,
            ..Settings::default()
        };
        s.on_settings_changed(&easy);
        assert_eq!(s.physics().gravity(), 1500.0);

        s.handle(GameEvent::ResumeRequest);
        advance(&mut s, 3 * COUNTDOWN_INTERVAL_MS);
        advance(&mut s, COUNTDOWN_HANDOFF_MS);
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.physics().gravity(), 1000.0);
    }

    #[test]
    fn test_disabling_trail_clears_history() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.update();
        s.update();
        assert_eq!(s.trail().len(), 2);

        let no_trail = Settings {
            show_trail: false,
            ..Settings::default()
        };
        s.on_settings_changed(&no_trail);
        assert!(s.trail().is_empty());
        s.update();
        assert!(s.trail().is_empty());
    }

    #[test]
    fn test_update_detects_out_of_bounds() {
        let mut s = session();
        s.handle(GameEvent::PrimaryInput);
        s.physics_mut().set_position(BIRD_START_X, -20.0);
        s.update();
        assert_eq!(s.state(), SessionState::GameOver);
    }
}
