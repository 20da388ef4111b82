//! Interactive, keyboard-driven walkthrough playback.
//!
//! | Key            | Action               |
//! |----------------|----------------------|
//! | Space          | play / pause         |
//! | Right          | single step          |
//! | `r`            | rewind               |
//! | `+` / `-`      | faster / slower      |
//! | `q`, Esc, ^C   | quit                 |

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use blk66_core::{AnimationController, Blk66Error, Modifiers, ShortcutMap};

use crate::walkthrough::Walkthrough;

const MIN_SPEED: f64 = 0.125;
const MAX_SPEED: f64 = 16.0;

/// State the shortcut handlers act on.
pub struct Player<F>
where
    F: FnMut() -> bool,
{
    pub controller: AnimationController<F>,
    pub quit: bool,
}

impl<F> Player<F>
where
    F: FnMut() -> bool,
{
    pub fn new(controller: AnimationController<F>) -> Self {
        Self {
            controller,
            quit: false,
        }
    }

    /// Set the playback speed, clamped to the supported range.
    pub fn apply_speed(&mut self, speed: f64) {
        if let Err(e) = self.controller.set_speed(speed.clamp(MIN_SPEED, MAX_SPEED)) {
            warn!("speed unchanged: {e}");
        }
    }

    /// Multiply the playback speed, clamped to the supported range.
    pub fn scale_speed(&mut self, factor: f64) {
        self.apply_speed(self.controller.speed() * factor);
    }
}

/// Default key bindings for the walkthrough.
pub fn bindings<F>() -> ShortcutMap<Player<F>>
where
    F: FnMut() -> bool + 'static,
{
    let mut keys = ShortcutMap::new();
    keys.on(" ", Modifiers::empty(), |p: &mut Player<F>| p.controller.toggle());
    keys.on("ArrowRight", Modifiers::empty(), |p: &mut Player<F>| {
        p.controller.step();
    });
    keys.on("r", Modifiers::empty(), |p: &mut Player<F>| p.controller.reset());
    keys.on("+", Modifiers::empty(), |p: &mut Player<F>| p.scale_speed(2.0));
    keys.on("=", Modifiers::empty(), |p: &mut Player<F>| p.scale_speed(2.0));
    keys.on("-", Modifiers::empty(), |p: &mut Player<F>| p.scale_speed(0.5));
    keys.on("q", Modifiers::empty(), |p: &mut Player<F>| p.quit = true);
    keys.on("Escape", Modifiers::empty(), |p: &mut Player<F>| p.quit = true);
    keys.on("c", Modifiers::CTRL, |p: &mut Player<F>| p.quit = true);
    keys
}

/// Translate a terminal key event into a shortcut key name and modifiers.
pub fn translate_key(key: &KeyEvent) -> Option<(String, Modifiers)> {
    let name = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        _ => return None,
    };
    let mut mods = Modifiers::empty();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    Some((name, mods))
}

/// Raw-mode output needs explicit carriage returns.
fn emit(text: &str) {
    let mut out = std::io::stdout();
    for line in text.lines() {
        let _ = write!(out, "{line}\r\n");
    }
    let _ = out.flush();
}

/// Puts the terminal in raw mode for the guard's lifetime.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self, Blk66Error> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Forward key presses until `reading` clears, the receiver goes away or
/// the terminal reports an error.
fn forward_keys<P, R>(
    reading: &AtomicBool,
    mut poll: P,
    mut read: R,
    tx: &mpsc::UnboundedSender<KeyEvent>,
) where
    P: FnMut(Duration) -> std::io::Result<bool>,
    R: FnMut() -> std::io::Result<Event>,
{
    while reading.load(Ordering::SeqCst) {
        match poll(Duration::from_millis(20)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("terminal input failed: {e}");
                return;
            }
        }
        match read() {
            Ok(Event::Key(key)) => {
                if key.kind == KeyEventKind::Press && tx.send(key).is_err() {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("terminal input failed: {e}");
                return;
            }
        }
    }
}

/// Play `walkthrough` until the user quits.
pub async fn play(
    walkthrough: Walkthrough,
    interval: Duration,
    speed: f64,
    color: bool,
) -> Result<(), Blk66Error> {
    let shared = Rc::new(RefCell::new(walkthrough));

    let step_state = Rc::clone(&shared);
    let reset_state = Rc::clone(&shared);
    let done_state = Rc::clone(&shared);
    let controller = AnimationController::new(move || {
        let step = step_state.borrow_mut().advance();
        match step {
            Some(step) => {
                emit(&step.render(color));
                true
            }
            None => false,
        }
    })
    .with_interval(interval)
    .on_reset(move || {
        reset_state.borrow_mut().rewind();
        emit("-- rewound --");
    })
    .on_complete(move || emit(&format!("-- done: {} --", done_state.borrow().summary())));

    let mut player = Player::new(controller);
    player.apply_speed(speed);
    let mut keys = bindings();

    let _raw = RawMode::enable()?;
    emit("space: play/pause  right: step  r: rewind  +/-: speed  q: quit");

    // Blocking crossterm poll on a dedicated thread.
    let (key_tx, mut key_rx) = mpsc::unbounded_channel::<KeyEvent>();
    let reading = Arc::new(AtomicBool::new(true));
    let reader_flag = Arc::clone(&reading);
    let reader = tokio::task::spawn_blocking(move || {
        forward_keys(&reader_flag, event::poll, event::read, &key_tx)
    });

    while !player.quit {
        let delay = player.controller.delay();
        tokio::select! {
            key = key_rx.recv() => {
                let Some(key) = key else { break };
                if let Some((name, mods)) = translate_key(&key) {
                    if !keys.dispatch(&name, mods, &mut player) {
                        debug!(key = %name, "unbound key");
                    }
                }
            }
            _ = tokio::time::sleep(delay), if player.controller.is_running() => {
                player.controller.tick();
            }
        }
    }

    reading.store(false, Ordering::SeqCst);
    let _ = reader.await;
    emit(&shared.borrow().summary());
    Ok(())
}
