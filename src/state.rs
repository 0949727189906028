use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::chain::ChainState;
use crate::config::GridSize;
use crate::placement;
use crate::snake::{Direction, MoveResult, Snake};
use crate::tile::{Color, TileKind};
use crate::{Coords, GridInt};

/// Serial of the first generated item; it lands in the middle of a white run.
pub const FIRST_ITEM_SERIAL: u32 = 4;

/// Color of the `serial`-th item: runs of three, alternating.
pub fn color_for_serial(serial: u32) -> Color {
    if serial % 6 / 3 == 0 {
        Color::Black
    } else {
        Color::White
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: GridInt,
    height: GridInt,
    cells: Vec<TileKind>,
}

impl Grid {
    /// An empty board enclosed by walls.
    pub fn new(size: GridSize) -> Self {
        let GridSize { width, height } = size;
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                cells.push(if border { TileKind::Wall } else { TileKind::Space });
            }
        }
        Grid { width, height, cells }
    }

    pub fn width(&self) -> GridInt {
        self.width
    }

    pub fn height(&self) -> GridInt {
        self.height
    }

    pub fn size(&self) -> GridSize {
        GridSize { width: self.width, height: self.height }
    }

    pub fn is_border(&self, (x, y): Coords) -> bool {
        x == 0 || y == 0 || x >= self.width - 1 || y >= self.height - 1
    }

    pub fn get(&self, pos: Coords) -> TileKind {
        self.cells[self.index(pos)]
    }

    /// Writes an interior cell. Border cells are walls for the board's whole life.
    pub fn set(&mut self, pos: Coords, tile: TileKind) {
        debug_assert!(!self.is_border(pos), "write to border cell {:?}", pos);
        if self.is_border(pos) {
            return;
        }
        let i = self.index(pos);
        self.cells[i] = tile;
    }

    /// All non-border cells, row by row.
    pub fn interior(&self) -> Vec<Coords> {
        let mut cells = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                cells.push((x, y));
            }
        }
        cells
    }

    fn index(&self, (x, y): Coords) -> usize {
        self.width as usize * y as usize + x as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Alive,
    /// Crashed into the given cell.
    GameOver { tombstone: Coords },
    /// The player left before crashing.
    Quit,
}

/// The whole mutable game: board, snake, items, score.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) snake: Snake,
    pub(crate) player_color: Color,
    pub(crate) item_serial: u32,
    /// Set once normal placement ran out of room; holds the only color
    /// generated from then on.
    pub(crate) endgame: Option<Color>,
    pub(crate) chain: ChainState,
    pub(crate) score: u64,
    pub(crate) status: Status,
    pub(crate) rng: ChaCha8Rng,
}

impl GameState {
    pub fn new(size: GridSize) -> Self {
        Self::from_rng(size, ChaCha8Rng::from_entropy())
    }

    pub fn with_seed(size: GridSize, seed: u64) -> Self {
        Self::from_rng(size, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(size: GridSize, rng: ChaCha8Rng) -> Self {
        let mut state = Self::bare(size, rng);
        let (x, y) = state.snake.head();
        state.grid.set((size.width - x, y), TileKind::Item(Color::White));
        let placed = placement::scatter_initial(&mut state);
        info!(width = size.width, height = size.height, placed, "new game");
        state
    }

    /// Board with only the snake's head on it.
    pub(crate) fn bare(size: GridSize, rng: ChaCha8Rng) -> Self {
        let mut grid = Grid::new(size);
        let head = (size.width / 4, size.height / 2);
        grid.set(head, TileKind::SnakeHead);

        GameState {
            grid,
            snake: Snake::new(head, Direction::Right),
            player_color: Color::White,
            item_serial: FIRST_ITEM_SERIAL,
            endgame: None,
            chain: ChainState::new(Color::White),
            score: 0,
            status: Status::Alive,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn chain(&self) -> &ChainState {
        &self.chain
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn endgame(&self) -> Option<Color> {
        self.endgame
    }

    pub fn item_serial(&self) -> u32 {
        self.item_serial
    }

    /// Color the next generated item gets.
    pub fn due_color(&self) -> Color {
        self.endgame.unwrap_or_else(|| color_for_serial(self.item_serial))
    }

    /// What should be drawn at `pos`: the grid plus the tombstone and the
    /// endgame hint, which are not stored in the grid.
    pub fn tile_at(&self, pos: Coords) -> TileKind {
        if let Status::GameOver { tombstone } = self.status {
            if tombstone == pos {
                return TileKind::Tombstone;
            }
        }
        if let Some(color) = self.endgame {
            if pos == (self.grid.width - 1, self.grid.height - 1) {
                return TileKind::EndgameHint(color);
            }
        }
        self.grid.get(pos)
    }

    pub fn toggle_color(&mut self) {
        self.player_color = self.player_color.toggled();
    }

    pub fn quit(&mut self) {
        if self.is_alive() {
            self.status = Status::Quit;
        }
    }

    /// Turns the snake if the cell that way is free or holds an item.
    /// Returns whether the turn was taken.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if !self.is_alive() {
            return false;
        }
        let target = direction.step_from(self.snake.head());
        if self.grid.get(target).is_open() {
            self.snake.set_direction(direction);
            true
        } else {
            false
        }
    }

    /// Moves the head one cell in the current direction and resolves what it hits.
    pub fn advance(&mut self) -> Option<MoveResult> {
        if !self.is_alive() {
            return None;
        }

        let old_head = self.snake.head();
        let (mid, tail) = self.snake.shading_cells();
        self.grid.set(old_head, TileKind::SnakeBodyFront);
        self.grid.set(mid, TileKind::SnakeBodyMid);
        self.grid.set(tail, TileKind::SnakeBodyTail);

        let new_head = self.snake.direction().step_from(old_head);
        let result = match self.grid.get(new_head) {
            TileKind::Space => {
                self.grid.set(new_head, TileKind::SnakeHead);
                self.snake.push_head(new_head);
                let mut dirty = vec![old_head, mid, tail, new_head];
                let mut flash_cleared = false;
                if let Some(old_tail) = self.snake.trim_tail() {
                    self.grid.set(old_tail, TileKind::Space);
                    dirty.push(old_tail);
                    flash_cleared = self.chain.clear_flash();
                }
                dirty.sort_unstable();
                dirty.dedup();
                MoveResult::Moved { new_head, dirty, flash_cleared }
            }
            TileKind::Item(color) if color == self.player_color => {
                let points = self.chain.record_pickup(color);
                self.score += points;
                self.snake.grow();
                self.grid.set(new_head, TileKind::SnakeHead);
                self.snake.push_head(new_head);
                let placed = placement::place_after_pickup(self);
                debug!(?new_head, points, placed, score = self.score, "item eaten");
                MoveResult::Ate { new_head, points, placed }
            }
            hit => {
                self.status = Status::GameOver { tombstone: new_head };
                info!(?new_head, ?hit, score = self.score, "game over");
                MoveResult::Crashed { at: new_head }
            }
        };

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GridSize {
        GridSize::from_terminal(12, 39).unwrap()
    }

    fn bare() -> GameState {
        GameState::bare(small(), ChaCha8Rng::seed_from_u64(1))
    }

    fn assert_walls_intact(grid: &Grid) {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.is_border((x, y)) {
                    assert_eq!(grid.get((x, y)), TileKind::Wall, "border at {:?}", (x, y));
                }
            }
        }
    }

    #[test]
    fn starting_layout() {
        let state = GameState::with_seed(small(), 3);
        assert_eq!(state.grid().width(), 19);
        assert_eq!(state.grid().height(), 10);
        assert_eq!(state.grid().size(), small());
        assert_eq!(state.snake().head(), (4, 5));
        assert_eq!(state.grid().get((4, 5)), TileKind::SnakeHead);
        assert_eq!(state.grid().get((15, 5)), TileKind::Item(Color::White));
        assert_eq!(state.player_color(), Color::White);
        assert_walls_intact(state.grid());
    }

    #[test]
    fn serial_colors_come_in_threes() {
        let colors: Vec<Color> = (0..12).map(color_for_serial).collect();
        use Color::*;
        assert_eq!(
            colors,
            vec![Black, Black, Black, White, White, White, Black, Black, Black, White, White, White]
        );
    }

    #[test]
    fn turn_into_wall_is_rejected() {
        let mut state = bare();
        state.snake = Snake::new((1, 1), Direction::Right);
        state.grid.set((1, 1), TileKind::SnakeHead);

        assert!(!state.request_turn(Direction::Up));
        assert!(!state.request_turn(Direction::Left));
        assert_eq!(state.snake().direction(), Direction::Right);
        assert!(state.request_turn(Direction::Down));
        assert_eq!(state.snake().direction(), Direction::Down);
    }

    #[test]
    fn turn_towards_other_color_is_allowed() {
        let mut state = bare();
        state.grid.set((4, 4), TileKind::Item(Color::Black));
        assert!(state.request_turn(Direction::Up));
        assert!(matches!(state.advance(), Some(MoveResult::Crashed { at: (4, 4) })));
        assert_eq!(state.tile_at((4, 4)), TileKind::Tombstone);
        assert_eq!(state.advance(), None);
    }

    #[test]
    fn reversing_into_body_is_rejected() {
        let mut state = bare();
        state.advance();
        assert!(!state.request_turn(Direction::Left));
    }

    #[test]
    fn trail_stays_within_growth_target() {
        let mut state = bare();
        let mut last_target = state.snake().growth_target();
        for _ in 0..8 {
            state.advance();
            assert!(state.snake().len() <= state.snake().growth_target());
            assert!(state.snake().growth_target() >= last_target);
            last_target = state.snake().growth_target();
        }
        assert_eq!(state.snake().head(), (12, 5));
        assert_eq!(state.grid().get((9, 5)), TileKind::Space);
        let snake_cells = state
            .grid()
            .interior()
            .into_iter()
            .filter(|&pos| state.grid().get(pos).is_snake())
            .count();
        assert_eq!(snake_cells, state.snake().len());
    }

    #[test]
    fn moving_reports_changed_cells() {
        let mut state = bare();
        for _ in 0..2 {
            state.advance();
        }
        match state.advance() {
            Some(MoveResult::Moved { new_head, dirty, flash_cleared }) => {
                assert_eq!(new_head, (7, 5));
                assert!(dirty.contains(&(7, 5)));
                assert!(dirty.contains(&(6, 5)));
                assert!(dirty.contains(&(4, 5)));
                assert!(!flash_cleared);
            }
            other => panic!("unexpected move result {:?}", other),
        }
        assert_eq!(state.grid().get((4, 5)), TileKind::Space);
        assert_eq!(state.grid().get((6, 5)), TileKind::SnakeBodyFront);
    }

    #[test]
    fn eating_matching_item_scores_and_grows() {
        let mut state = bare();
        state.grid.set((5, 5), TileKind::Item(Color::White));
        let target = state.snake().growth_target();

        let result = state.advance();
        assert!(matches!(result, Some(MoveResult::Ate { new_head: (5, 5), points: 10, .. })));
        assert_eq!(state.score(), 10);
        assert_eq!(state.snake().growth_target(), target + 2);
        assert_eq!(state.snake().len(), 2);
        assert_eq!(state.grid().get((5, 5)), TileKind::SnakeHead);
    }

    #[test]
    fn wrong_color_is_fatal() {
        let mut state = bare();
        state.grid.set((5, 5), TileKind::Item(Color::White));
        state.toggle_color();
        assert!(matches!(state.advance(), Some(MoveResult::Crashed { at: (5, 5) })));
        assert!(!state.is_alive());
    }

    #[test]
    fn crash_into_wall_keeps_border() {
        let mut state = bare();
        for _ in 0..30 {
            if state.advance().is_none() {
                break;
            }
        }
        assert_eq!(state.status(), Status::GameOver { tombstone: (18, 5) });
        assert_walls_intact(state.grid());
        assert_eq!(state.tile_at((18, 5)), TileKind::Tombstone);
    }

    #[test]
    fn three_items_make_a_chain() {
        let mut state = bare();
        for x in 5..=7 {
            state.grid.set((x, 5), TileKind::Item(Color::White));
        }
        for _ in 0..3 {
            state.advance();
        }
        assert_eq!(state.score(), 130);
        assert_eq!(state.chain().current(), 1);
        assert!(state.chain().is_flashing());
    }

    #[test]
    fn tail_trim_clears_flash() {
        let mut state = bare();
        for x in 5..=7 {
            state.grid.set((x, 5), TileKind::Item(Color::White));
        }
        for _ in 0..3 {
            state.advance();
        }
        for pos in state.grid.interior() {
            if let TileKind::Item(_) = state.grid.get(pos) {
                state.grid.set(pos, TileKind::Space);
            }
        }
        // Growth target is now 9 with 4 cells in the trail.
        let mut cleared = false;
        for _ in 0..6 {
            if let Some(MoveResult::Moved { flash_cleared: true, .. }) = state.advance() {
                cleared = true;
            }
        }
        assert!(cleared);
        assert!(!state.chain().is_flashing());
    }

    #[test]
    fn quit_ends_a_live_game_only() {
        let mut state = bare();
        state.quit();
        assert_eq!(state.status(), Status::Quit);
        assert_eq!(state.advance(), None);
    }
}
