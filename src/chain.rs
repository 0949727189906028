//! Chain bookkeeping: three same-colored items in a row complete a group,
//! consecutive groups build a chain, and a color switch mid-group breaks it.

use tracing::debug;

use crate::tile::Color;

pub const POINTS_PER_ITEM: u64 = 10;
pub const CHAIN_BONUS_BASE: u64 = 100;
pub const MAX_BONUS_EXPONENT: u32 = 8;
pub const GROUP_SIZE: u8 = 3;

/// Bonus for completing the `chain`-th consecutive group (1-based).
pub fn chain_bonus(chain: u32) -> u64 {
    CHAIN_BONUS_BASE << chain.saturating_sub(1).min(MAX_BONUS_EXPONENT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainState {
    items_in_group: u8,
    in_progress: Color,
    current: u32,
    max: u32,
}

impl ChainState {
    pub fn new(in_progress: Color) -> Self {
        ChainState { items_in_group: 0, in_progress, current: 0, max: 0 }
    }

    pub fn items_in_group(&self) -> u8 {
        self.items_in_group
    }

    pub fn in_progress_color(&self) -> Color {
        self.in_progress
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// A group was just finished and is being shown off.
    pub fn is_flashing(&self) -> bool {
        self.items_in_group == GROUP_SIZE
    }

    /// Ends the flash once the tail moves; the next pickup starts a new group
    /// exactly as it would after a full group.
    pub fn clear_flash(&mut self) -> bool {
        if self.is_flashing() {
            self.items_in_group = 0;
            true
        } else {
            false
        }
    }

    /// Registers an eaten item and returns the points it is worth.
    pub fn record_pickup(&mut self, color: Color) -> u64 {
        let mut points = POINTS_PER_ITEM;

        match self.items_in_group {
            1 | 2 if color == self.in_progress => {
                self.items_in_group += 1;
                if self.items_in_group == GROUP_SIZE {
                    self.current += 1;
                    self.max = self.max.max(self.current);
                    points += chain_bonus(self.current);
                    debug!(chain = self.current, "chain group completed");
                }
            }
            1 | 2 => {
                if self.current > 0 {
                    debug!(chain = self.current, "chain broken");
                }
                self.in_progress = color;
                self.items_in_group = 1;
                self.current = 0;
            }
            _ => {
                self.in_progress = color;
                self.items_in_group = 1;
            }
        }

        points
    }
}
