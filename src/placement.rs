//! Where new items go.
//!
//! Items may only be dropped where their whole 3x3 neighbourhood is empty or
//! holds items of the same color, which keeps differently colored clusters
//! apart. When the board gets too crowded for that, placement relaxes its
//! rules and the game switches to endgame, freezing the item color.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::state::GameState;
use crate::tile::TileKind;
use crate::Coords;

pub const SCATTER_PROBABILITY: f64 = 0.1;
pub const EXTRA_ITEM_PROBABILITY: f64 = 0.1;
/// Items placed after a pickup keep more than this Chebyshev distance from the head.
pub const MIN_HEAD_DISTANCE: u16 = 3;

/// Constraints of one placement pass, from strictest to loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Strict,
    IgnoreNeighbours,
    Anywhere,
}

impl Pass {
    pub const ALL: [Pass; 3] = [Pass::Strict, Pass::IgnoreNeighbours, Pass::Anywhere];

    fn accepts(self, state: &GameState, pos: Coords, head: Coords) -> bool {
        if state.grid.get(pos) != TileKind::Space {
            return false;
        }
        match self {
            Pass::Strict => far_from(pos, head) && eligible(state, pos),
            Pass::IgnoreNeighbours => far_from(pos, head),
            Pass::Anywhere => true,
        }
    }
}

fn far_from((x, y): Coords, (hx, hy): Coords) -> bool {
    x.abs_diff(hx) > MIN_HEAD_DISTANCE || y.abs_diff(hy) > MIN_HEAD_DISTANCE
}

/// True if `pos` and its eight neighbours are all empty or hold items of the
/// color that is due next. `pos` must be an interior cell.
pub fn eligible(state: &GameState, (x, y): Coords) -> bool {
    let due = TileKind::Item(state.due_color());
    (y - 1..=y + 1).all(|ny| {
        (x - 1..=x + 1).all(|nx| {
            let tile = state.grid.get((nx, ny));
            tile == TileKind::Space || tile == due
        })
    })
}

/// Drops the due item at `pos` and moves the color sequence along, unless it
/// is frozen.
fn put_item(state: &mut GameState, pos: Coords) {
    state.grid.set(pos, TileKind::Item(state.due_color()));
    if state.endgame.is_none() {
        state.item_serial += 1;
    }
}

fn shuffled_interior(state: &mut GameState) -> Vec<Coords> {
    let mut cells = state.grid.interior();
    cells.shuffle(&mut state.rng);
    cells
}

/// Sprinkles the starting items, keeping the snake's row and the rows next to
/// it clear. Returns how many were placed.
pub fn scatter_initial(state: &mut GameState) -> usize {
    let (_, head_row) = state.snake.head();
    let mut placed = 0;

    for pos in shuffled_interior(state) {
        if pos.1.abs_diff(head_row) > 1
            && state.rng.gen_bool(SCATTER_PROBABILITY)
            && eligible(state, pos)
        {
            put_item(state, pos);
            placed += 1;
        }
    }

    placed
}

/// Places at least one new item after a pickup, if the board has any room
/// left. Runs the passes in order over a fresh shuffle each; after every
/// placement it keeps going only with a small probability. A placement that
/// needed a relaxed pass starts the endgame.
pub fn place_after_pickup(state: &mut GameState) -> usize {
    let head = state.snake.head();
    let mut placed = 0;
    let mut keep_going = true;

    for pass in Pass::ALL.iter().copied() {
        if !keep_going {
            break;
        }

        for pos in shuffled_interior(state) {
            if !pass.accepts(state, pos, head) {
                continue;
            }

            if pass != Pass::Strict && state.endgame.is_none() {
                let frozen = state.due_color();
                state.endgame = Some(frozen);
                info!(?frozen, ?pass, "board is full, entering endgame");
            }
            put_item(state, pos);
            placed += 1;

            keep_going = state.rng.gen_bool(EXTRA_ITEM_PROBABILITY);
            if !keep_going {
                break;
            }
        }
    }

    if placed == 0 {
        debug!("no room left for a new item");
    }
    placed
}
