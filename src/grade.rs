use std::fmt;

use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    DotEater,
    C,
    B,
    A,
    S,
}

const LETTERS: [Grade; 4] = [Grade::C, Grade::B, Grade::A, Grade::S];

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::DotEater => "Dot eater",
            Grade::C => "C",
            Grade::B => "B",
            Grade::A => "A",
            Grade::S => "S",
        };
        f.write_str(s)
    }
}

/// Final numbers of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalStats {
    /// Playable cells, borders excluded.
    pub area: u64,
    pub length: u64,
    pub score: u64,
    pub max_chain: u32,
}

impl FinalStats {
    pub fn of(state: &GameState) -> Self {
        FinalStats {
            area: state.grid().size().playable_area(),
            length: state.snake().len() as u64,
            score: state.score(),
            max_chain: state.chain().max(),
        }
    }

    /// Share of the playable area the trail covers, in whole percent.
    pub fn coverage_percent(&self) -> u64 {
        self.length * 100 / self.area
    }
}

/// Letter for a finished game. Without a single chain it is always
/// "Dot eater"; otherwise the best level whose length or score bar was beaten.
pub fn grade(stats: &FinalStats) -> Grade {
    if stats.max_chain == 0 {
        return Grade::DotEater;
    }

    let area = stats.area as f64;
    let half = stats.area / 2;
    let mut result = Grade::DotEater;

    for (level, &letter) in LETTERS.iter().enumerate() {
        let w = level as i32;
        let length_bar = area * (0.3 * w as f64 - 0.1);
        let score_bar = (half * 10) as f64 + (half / 3 * 100) as f64 * 2f64.powi(3 * w - 2);

        if stats.length as f64 > length_bar || stats.score as f64 > score_bar {
            result = letter;
        }
    }

    result
}

/// The summary printed after the game.
pub struct Report(pub FinalStats);

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.0;
        writeln!(f, "Area: {}%", stats.coverage_percent())?;
        writeln!(f, "Score: {}", stats.score)?;
        writeln!(f, "Max: {} chain", stats.max_chain)?;
        write!(f, "Grade: {}", grade(stats))
    }
}
