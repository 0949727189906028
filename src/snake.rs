use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

/// Trail cells the snake may grow to before it starts, and how much each
/// matching item adds.
pub const INITIAL_GROWTH_TARGET: usize = 3;
pub const GROWTH_PER_ITEM: usize = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Neighbouring cell. Callers only step from interior cells, so the
    /// result never leaves the grid.
    pub fn step_from(self, (x, y): Coords) -> Coords {
        let (dx, dy) = self.delta();
        ((x as i32 + dx) as u16, (y as i32 + dy) as u16)
    }
}

/// What a single move did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Landed on an empty cell. `dirty` lists every cell that changed.
    Moved { new_head: Coords, dirty: Vec<Coords>, flash_cleared: bool },
    /// Ate a matching item.
    Ate { new_head: Coords, points: u64, placed: usize },
    /// Hit a wall, the body, or an item of the other color.
    Crashed { at: Coords },
}

/// The trail from tail to head; the back of the deque is the head.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    growth_target: usize,
}

impl Snake {
    pub fn new(head: Coords, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Snake { body, direction, growth_target: INITIAL_GROWTH_TARGET }
    }

    pub fn head(&self) -> Coords {
        // The body is created with a head and only loses its oldest cell after
        // a new head was pushed, so it is never empty.
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn growth_target(&self) -> usize {
        self.growth_target
    }

    pub fn grow(&mut self) {
        self.growth_target += GROWTH_PER_ITEM;
    }

    /// Cells to repaint as the middle and the tail end of the body, picked
    /// from the current trail before the head advances.
    pub fn shading_cells(&self) -> (Coords, Coords) {
        let len = self.body.len();
        (self.body[len / 2], self.body[len / 4])
    }

    pub fn push_head(&mut self, pos: Coords) {
        self.body.push_back(pos);
    }

    /// Drops the oldest cell once the trail outgrew its target.
    pub fn trim_tail(&mut self) -> Option<Coords> {
        if self.body.len() > self.growth_target {
            self.body.pop_front()
        } else {
            None
        }
    }
}
