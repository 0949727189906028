//! Keyboard commands travel from a blocking reader thread to the game loop
//! through a small ring. The loop takes at most one command per iteration and
//! never waits on the reader.
//!
//! When more than `CAPACITY` commands are waiting, the oldest unread one is
//! dropped, so a burst of fast key presses can lose early turns.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::snake::Direction;

pub const CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    ToggleColor,
    Quit,
}

#[derive(Debug)]
struct Ring {
    pending: VecDeque<Command>,
    closed: bool,
}

/// Writing end, owned by the input reader.
#[derive(Debug, Clone)]
pub struct InputSender {
    ring: Arc<Mutex<Ring>>,
}

/// Reading end, owned by the game loop.
#[derive(Debug)]
pub struct InputReceiver {
    ring: Arc<Mutex<Ring>>,
}

pub fn channel() -> (InputSender, InputReceiver) {
    let ring = Arc::new(Mutex::new(Ring {
        pending: VecDeque::with_capacity(CAPACITY),
        closed: false,
    }));
    (InputSender { ring: Arc::clone(&ring) }, InputReceiver { ring })
}

fn lock(ring: &Mutex<Ring>) -> MutexGuard<'_, Ring> {
    // Only plain values live in the ring, so a panic elsewhere can't leave it
    // half-updated.
    ring.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InputSender {
    /// Queues a command. Returns false once the receiver has closed the
    /// channel; the command is dropped in that case.
    pub fn send(&self, command: Command) -> bool {
        let mut ring = lock(&self.ring);
        if ring.closed {
            return false;
        }
        if ring.pending.len() == CAPACITY {
            let lost = ring.pending.pop_front();
            debug!(?lost, "input buffer full, dropping oldest command");
        }
        ring.pending.push_back(command);
        true
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.ring).closed
    }
}

impl InputReceiver {
    pub fn try_recv(&self) -> Option<Command> {
        lock(&self.ring).pending.pop_front()
    }

    /// Tells the reader to stop after its current read.
    pub fn close(&self) {
        let mut ring = lock(&self.ring);
        ring.closed = true;
        ring.pending.clear();
    }
}

impl Drop for InputReceiver {
    fn drop(&mut self) {
        self.close();
    }
}

/// Maps a key press to a game command.
pub fn translate(ev: &KeyEvent) -> Option<Command> {
    use Direction::*;

    if is_quit(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Enter => {
            Some(Command::ToggleColor)
        }
        _ => None,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
            | KeyEvent { code: KeyCode::Esc, .. }
            | KeyEvent { code: KeyCode::Char('q'), .. }
    )
}

/// Feeds `sender` from any blocking source of key events until the channel is
/// closed or the player quits. The key read after closing is thrown away.
pub fn pump<F>(sender: &InputSender, mut next_key: F)
where
    F: FnMut() -> Option<KeyEvent>,
{
    while !sender.is_closed() {
        let key = match next_key() {
            Some(key) => key,
            None => break,
        };
        if let Some(command) = translate(&key) {
            if !sender.send(command) || command == Command::Quit {
                break;
            }
        }
    }
}

/// Starts the thread that reads the keyboard.
pub fn spawn_reader(sender: InputSender) -> JoinHandle<()> {
    thread::spawn(move || {
        pump(&sender, || loop {
            match read() {
                Ok(Event::Key(ev)) => return Some(ev),
                Ok(_) => continue,
                Err(err) => {
                    warn!(%err, "reading input failed");
                    return None;
                }
            }
        });
        debug!("input reader finished");
    })
}
