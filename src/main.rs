use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flapattack::audio::{AudioController, LogAudio, SoundCue};
use flapattack::input::{map_key, UiInput};
use flapattack::settings::{KeyValueStore, MemoryStore};
use flapattack::ui::{
    draw_home, draw_pause, draw_play, HomeItem, MenuCursor, PauseItem, SettingsField,
    SettingsScreen,
};
use flapattack::utils::persistence::{data_path, LOG_FILE};
use flapattack::utils::{logging, version_line, JsonFileStore};
use flapattack::{GameEvent, PlayScene, SessionState, SettingsStore};
use rand::rngs::ThreadRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Target frame length.
const FRAME_MS: u64 = 16;
/// Longest step fed to the simulation after a stall.
const MAX_STEP_MS: u64 = 100;
/// Frames the play field shakes after a crash.
const SHAKE_FRAMES: u32 = 12;

type Store = SettingsStore<Box<dyn KeyValueStore>>;
type Scene = PlayScene<ThreadRng>;
type Audio = Rc<RefCell<AudioController<LogAudio>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    Settings { from_pause: bool },
    Play,
}

fn main() -> io::Result<()> {
    let mut memory = false;
    let mut reset = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("{}", version_line());
                return Ok(());
            }
            "--help" | "-h" => {
                println!("Flap Attack - terminal arcade game\n");
                println!("Usage: flapattack [options] [command]\n");
                println!("Commands:");
                println!("  reset-settings  Restore default settings and exit\n");
                println!("Options:");
                println!("  --memory        Keep settings in memory only");
                println!("  --version       Show version information");
                println!("  --help          Show this help message");
                return Ok(());
            }
            "--memory" => memory = true,
            "reset-settings" => reset = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'flapattack --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    let log_path = if memory {
        None
    } else {
        data_path(LOG_FILE).ok()
    };
    logging::init(log_path.as_deref());

    let mut store = SettingsStore::load(open_backend(memory));
    if reset {
        store.reset();
        if store.is_dirty() {
            eprintln!("Could not write settings; see the log for details.");
            std::process::exit(1);
        }
        println!("Settings restored to defaults.");
        return Ok(());
    }

    let audio: Audio = Rc::new(RefCell::new(AudioController::new(LogAudio, &store.get())));
    let audio_sub = Rc::clone(&audio);
    store.subscribe(move |settings| audio_sub.borrow_mut().apply(settings));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut store, &audio);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if store.is_dirty() {
        if let Err(e) = store.flush() {
            eprintln!("Settings were not saved: {}", e);
        }
    }

    result
}

fn open_backend(memory: bool) -> Box<dyn KeyValueStore> {
    if memory {
        return Box::new(MemoryStore::new());
    }
    match JsonFileStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; settings will not be saved", e);
            Box::new(MemoryStore::new())
        }
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut Store,
    audio: &Audio,
) -> io::Result<()> {
    let mut screen = Screen::Home;
    let mut home = MenuCursor::default();
    let mut pause = MenuCursor::default();
    let mut settings_screen = SettingsScreen::new();
    let mut scene: Option<Scene> = None;
    let mut shake_frames: u32 = 0;
    let mut last_tick = Instant::now();

    loop {
        let settings = store.get();
        terminal.draw(|frame| {
            let area = frame.size();
            match screen {
                Screen::Home => draw_home(frame, area, &home),
                Screen::Settings { .. } => settings_screen.draw(frame, area, &settings),
                Screen::Play => {
                    if let Some(scene) = &scene {
                        let shake = if shake_frames > 0 {
                            (shake_frames % 2) as u16 + 1
                        } else {
                            0
                        };
                        draw_play(frame, area, &scene.session(), scene.pipes(), shake);
                        if scene.state() == SessionState::Paused {
                            draw_pause(frame, area, &pause);
                        }
                    }
                }
            }
        })?;

        if event::poll(Duration::from_millis(FRAME_MS))? {
            if let Event::Key(key) = event::read()? {
                let input = map_key(key);
                match screen {
                    Screen::Home => match input {
                        UiInput::Up => home.navigate_up(),
                        UiInput::Down => home.navigate_down(HomeItem::ALL.len()),
                        UiInput::Confirm | UiInput::Primary => match home.home_item() {
                            HomeItem::Play => {
                                scene = Some(PlayScene::enter(store, rand::thread_rng()));
                                screen = Screen::Play;
                            }
                            HomeItem::Settings => {
                                settings_screen = SettingsScreen::new();
                                screen = Screen::Settings { from_pause: false };
                            }
                            HomeItem::Quit => break,
                        },
                        UiInput::Quit | UiInput::Back => break,
                        _ => {}
                    },
                    Screen::Settings { from_pause } => {
                        let leave_to = if from_pause {
                            Screen::Play
                        } else {
                            Screen::Home
                        };
                        match input {
                            UiInput::Up => settings_screen.navigate_up(),
                            UiInput::Down => settings_screen.navigate_down(),
                            UiInput::Left | UiInput::Right => {
                                let forward = input == UiInput::Right;
                                let field = settings_screen.field();
                                if let Some(patch) = field.adjust(&settings, forward) {
                                    store.update(patch);
                                }
                            }
                            UiInput::Confirm | UiInput::Primary => {
                                match settings_screen.field() {
                                    SettingsField::Back => screen = leave_to,
                                    field => {
                                        if let Some(patch) = field.adjust(&settings, true) {
                                            store.update(patch);
                                        }
                                    }
                                }
                            }
                            UiInput::Reset => {
                                store.reset();
                            }
                            UiInput::Back | UiInput::Quit => screen = leave_to,
                            UiInput::Other => {}
                        }
                    }
                    Screen::Play => {
                        if let Some(active) = scene.as_mut() {
                            match play_input(active, input, &mut pause, audio) {
                                PlayAction::Stay => {}
                                PlayAction::OpenSettings => {
                                    settings_screen = SettingsScreen::new();
                                    screen = Screen::Settings { from_pause: true };
                                }
                                PlayAction::Restart => {
                                    if let Some(old) = scene.take() {
                                        old.leave(store);
                                    }
                                    scene = Some(PlayScene::enter(store, rand::thread_rng()));
                                }
                                PlayAction::Exit => {
                                    if let Some(old) = scene.take() {
                                        old.leave(store);
                                    }
                                    screen = Screen::Home;
                                }
                            }
                        }
                    }
                }
            }
        }

        let elapsed = last_tick.elapsed().as_millis() as u64;
        if elapsed >= FRAME_MS {
            last_tick = Instant::now();
            shake_frames = shake_frames.saturating_sub(1);
            if screen == Screen::Play {
                if let Some(active) = scene.as_mut() {
                    let report = active.tick(elapsed.min(MAX_STEP_MS));
                    if report.scored > 0 {
                        audio.borrow_mut().cue(SoundCue::Score);
                    }
                    if report.game_over {
                        audio.borrow_mut().cue(SoundCue::Hit);
                        if store.get().screen_shake {
                            shake_frames = SHAKE_FRAMES;
                        }
                    }
                }
            }
        }
    }

    if let Some(old) = scene.take() {
        old.leave(store);
    }
    Ok(())
}

enum PlayAction {
    Stay,
    OpenSettings,
    Restart,
    Exit,
}

fn play_input(
    scene: &mut Scene,
    input: UiInput,
    pause: &mut MenuCursor,
    audio: &Audio,
) -> PlayAction {
    match (scene.state(), input) {
        (SessionState::Paused, UiInput::Up) => pause.navigate_up(),
        (SessionState::Paused, UiInput::Down) => pause.navigate_down(PauseItem::ALL.len()),
        (SessionState::Paused, UiInput::Confirm | UiInput::Primary) => match pause.pause_item() {
            PauseItem::Resume => {
                scene.input(GameEvent::ResumeRequest);
            }
            PauseItem::Settings => return PlayAction::OpenSettings,
            PauseItem::Restart => return PlayAction::Restart,
            PauseItem::MainMenu => return PlayAction::Exit,
        },
        (SessionState::Paused, UiInput::Back) => {
            scene.input(GameEvent::ResumeRequest);
        }
        (SessionState::Playing, UiInput::Back | UiInput::Quit) => {
            if scene.input(GameEvent::PauseRequest) {
                *pause = MenuCursor::default();
            }
        }
        (SessionState::Start | SessionState::GameOver, UiInput::Back | UiInput::Quit) => {
            return PlayAction::Exit;
        }
        (_, UiInput::Primary | UiInput::Confirm | UiInput::Up) => {
            if scene.input(GameEvent::PrimaryInput) && scene.state() == SessionState::Playing {
                audio.borrow_mut().cue(SoundCue::Flap);
            }
        }
        _ => {}
    }
    PlayAction::Stay
}
