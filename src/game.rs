use std::thread::sleep;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::Result;
use crate::input::{Command, InputReceiver};
use crate::snake::MoveResult;
use crate::state::{GameState, Status};
use crate::tile::{Color, TileKind};
use crate::Coords;

/// Idle time between polls while waiting for the next move.
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// What the status line above the board shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    pub score: u64,
    pub chain: u32,
    pub items_in_group: u8,
    pub group_color: Color,
    pub player_color: Color,
    pub flash: bool,
    pub endgame: Option<Color>,
    pub game_over: bool,
}

impl StatusBar {
    pub fn of(state: &GameState, flash: bool) -> Self {
        let chain = state.chain();
        StatusBar {
            score: state.score(),
            chain: chain.current(),
            items_in_group: chain.items_in_group(),
            group_color: chain.in_progress_color(),
            player_color: state.player_color(),
            flash,
            endgame: state.endgame(),
            game_over: matches!(state.status(), Status::GameOver { .. }),
        }
    }
}

/// Something that can draw the game.
pub trait Renderer {
    /// Redraws the status line and every cell of the board.
    fn render_full(&mut self, state: &GameState, status: &StatusBar) -> Result<()>;

    /// Redraws only the given cells.
    fn render_diff(&mut self, cells: &[(Coords, TileKind)], player_color: Color) -> Result<()>;

    /// Redraws the part of the status line that blinks after a finished group.
    fn render_flash(&mut self, status: &StatusBar) -> Result<()>;
}

/// Whether the loop wants to be called again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing moved yet; wait a little.
    Idle,
    Moved,
    Finished,
}

/// Drives one game from start to finish.
pub struct GameLoop<R: Renderer> {
    state: GameState,
    input: InputReceiver,
    renderer: R,
    interval: Duration,
    /// `None` means the next iteration moves right away.
    last_move: Option<Instant>,
    flash: bool,
}

impl<R: Renderer> GameLoop<R> {
    pub fn new(
        state: GameState,
        input: InputReceiver,
        renderer: R,
        interval: Duration,
        started: Instant,
    ) -> Self {
        GameLoop { state, input, renderer, interval, last_move: Some(started), flash: false }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Plays until the snake crashes or the player quits, then hands back
    /// the final state and the renderer.
    pub fn run(mut self) -> Result<(GameState, R)> {
        info!(interval_ms = self.interval.as_millis() as u64, "game loop started");
        self.render_full()?;

        loop {
            match self.iterate(Instant::now())? {
                Tick::Idle => sleep(POLL_INTERVAL),
                Tick::Moved => {}
                Tick::Finished => break,
            }
        }

        Ok((self.state, self.renderer))
    }

    /// One pass of the loop: blink, take one command, and move if it's time.
    pub fn iterate(&mut self, now: Instant) -> Result<Tick> {
        if !self.state.is_alive() {
            return self.finish();
        }

        if self.state.chain().is_flashing() {
            self.flash = !self.flash;
            let status = StatusBar::of(&self.state, self.flash);
            self.renderer.render_flash(&status)?;
        }

        if let Some(command) = self.input.try_recv() {
            self.apply(command);
            if !self.state.is_alive() {
                return self.finish();
            }
            self.render_full()?;
        }

        if let Some(last) = self.last_move {
            if now.saturating_duration_since(last) < self.interval {
                return Ok(Tick::Idle);
            }
        }
        self.last_move = Some(now);

        match self.state.advance() {
            Some(MoveResult::Moved { dirty, flash_cleared, .. }) => {
                if flash_cleared {
                    self.flash = false;
                    self.render_full()?;
                }
                let cells: Vec<_> =
                    dirty.into_iter().map(|pos| (pos, self.state.tile_at(pos))).collect();
                self.renderer.render_diff(&cells, self.state.player_color())?;
                Ok(Tick::Moved)
            }
            Some(MoveResult::Ate { .. }) => {
                self.render_full()?;
                Ok(Tick::Moved)
            }
            Some(MoveResult::Crashed { .. }) | None => self.finish(),
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => {
                if self.state.request_turn(direction) {
                    // Turns take effect on this very iteration.
                    self.last_move = None;
                } else {
                    debug!(?direction, "turn blocked");
                }
            }
            Command::ToggleColor => self.state.toggle_color(),
            Command::Quit => {
                info!("player quit");
                self.state.quit();
            }
        }
    }

    fn finish(&mut self) -> Result<Tick> {
        self.flash = false;
        self.render_full()?;
        self.input.close();
        Ok(Tick::Finished)
    }

    fn render_full(&mut self) -> Result<()> {
        let status = StatusBar::of(&self.state, self.flash);
        self.renderer.render_full(&self.state, &status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSize;
    use crate::input::{channel, InputSender};
    use crate::snake::Direction;

    #[derive(Default)]
    struct Recorder {
        full: Vec<StatusBar>,
        diffs: Vec<Vec<(Coords, TileKind)>>,
        flashes: Vec<bool>,
    }

    impl Renderer for Recorder {
        fn render_full(&mut self, _state: &GameState, status: &StatusBar) -> Result<()> {
            self.full.push(status.clone());
            Ok(())
        }

        fn render_diff(&mut self, cells: &[(Coords, TileKind)], _player: Color) -> Result<()> {
            self.diffs.push(cells.to_vec());
            Ok(())
        }

        fn render_flash(&mut self, status: &StatusBar) -> Result<()> {
            self.flashes.push(status.flash);
            Ok(())
        }
    }

    const STEP: Duration = Duration::from_millis(200);

    fn setup(start: Instant) -> (GameLoop<Recorder>, InputSender) {
        let state = GameState::with_seed(GridSize::from_terminal(12, 39).unwrap(), 11);
        let (tx, rx) = channel();
        (GameLoop::new(state, rx, Recorder::default(), STEP, start), tx)
    }

    #[test]
    fn waits_for_the_interval() {
        let start = Instant::now();
        let (mut game, _tx) = setup(start);
        assert_eq!(game.iterate(start + STEP / 2).unwrap(), Tick::Idle);
        assert_eq!(game.state().snake().head(), (4, 5));
        assert_eq!(game.iterate(start + STEP).unwrap(), Tick::Moved);
        assert_eq!(game.state().snake().head(), (5, 5));
        assert_eq!(game.renderer().diffs.len(), 1);
        assert!(game.renderer().diffs[0].contains(&((5, 5), TileKind::SnakeHead)));
    }

    #[test]
    fn accepted_turn_moves_immediately() {
        let start = Instant::now();
        let (mut game, tx) = setup(start);
        tx.send(Command::Turn(Direction::Down));
        assert_eq!(game.iterate(start).unwrap(), Tick::Moved);
        assert_eq!(game.state().snake().head(), (4, 6));
    }

    #[test]
    fn blocked_turn_keeps_timer() {
        let start = Instant::now();
        let (mut game, tx) = setup(start);
        game.iterate(start + STEP).unwrap();
        // The cell to the left is now body.
        tx.send(Command::Turn(Direction::Left));
        assert_eq!(game.iterate(start + STEP + STEP / 2).unwrap(), Tick::Idle);
        assert_eq!(game.state().snake().direction(), Direction::Right);
    }

    #[test]
    fn one_command_per_iteration() {
        let start = Instant::now();
        let (mut game, tx) = setup(start);
        tx.send(Command::ToggleColor);
        tx.send(Command::ToggleColor);
        game.iterate(start).unwrap();
        assert_eq!(game.state().player_color(), Color::Black);
        game.iterate(start).unwrap();
        assert_eq!(game.state().player_color(), Color::White);
    }

    #[test]
    fn crash_finishes_with_full_render() {
        let start = Instant::now();
        let (mut game, tx) = setup(start);
        let mut now = start;
        let mut ticks = 0;
        loop {
            // Keep the color matching whatever lies ahead so only the wall can end it.
            let ahead = game.state().snake().direction().step_from(game.state().snake().head());
            if let TileKind::Item(color) = game.state().grid().get(ahead) {
                if color != game.state().player_color() {
                    tx.send(Command::ToggleColor);
                }
            }
            now += STEP;
            ticks += 1;
            if game.iterate(now).unwrap() == Tick::Finished {
                break;
            }
            assert!(ticks < 100);
        }
        assert!(matches!(game.state().status(), Status::GameOver { tombstone: (18, 5) }));
        assert!(game.renderer().full.last().unwrap().game_over);
        assert!(tx.is_closed());
    }

    #[test]
    fn quit_command_ends_the_game() {
        let start = Instant::now();
        let (mut game, tx) = setup(start);
        tx.send(Command::Quit);
        assert_eq!(game.iterate(start).unwrap(), Tick::Finished);
        assert_eq!(game.state().status(), Status::Quit);
        assert!(!game.renderer().full.last().unwrap().game_over);
    }

    #[test]
    fn finished_group_blinks_until_tail_moves() {
        let start = Instant::now();
        let (mut game, _tx) = setup(start);
        for x in 5..=7 {
            game.state.grid.set((x, 5), TileKind::Item(Color::White));
        }
        let mut now = start;
        for _ in 0..3 {
            now += STEP;
            game.iterate(now).unwrap();
        }
        assert!(game.state().chain().is_flashing());

        game.iterate(now).unwrap();
        game.iterate(now).unwrap();
        assert_eq!(game.renderer().flashes, vec![true, false]);
    }
}
