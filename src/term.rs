use std::io::{stdout, Stdout, Write};

use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::chain::GROUP_SIZE;
use crate::error::Result;
use crate::game::{Renderer, StatusBar};
use crate::state::GameState;
use crate::tile::{Color, TileKind};
use crate::Coords;

/// Rows above the board (the status bar).
const BOARD_TOP: u16 = 1;
const GAME_OVER: &str = "    GAME OVER    ";

pub struct TermManager {
    stdout: Stdout,
    width: u16,
}

/// Two characters and a color for one cell.
struct Sprite(&'static str, TermColor);

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), width: 0 }
    }

    /// Terminal size as (rows, columns).
    pub fn size() -> Result<(u16, u16)> {
        let (columns, rows) = terminal::size()?;
        Ok((rows, columns))
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }

    fn print_cell(&mut self, (x, y): Coords, tile: TileKind, player: Color) -> Result<()> {
        let Sprite(text, color) = sprite(tile, player);
        queue!(
            self.stdout,
            cursor::MoveTo(x * 2, y + BOARD_TOP),
            SetForegroundColor(color),
            Print(text)
        )?;
        Ok(())
    }

    fn print_status(&mut self, status: &StatusBar) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine)
        )?;

        let filled = status.items_in_group.min(GROUP_SIZE);
        let group_color = if status.flash {
            TermColor::Yellow
        } else {
            item_color(status.group_color)
        };
        for i in 0..GROUP_SIZE {
            let mark = if i < filled { "()" } else { ". " };
            queue!(self.stdout, SetForegroundColor(group_color), Print(mark))?;
        }

        if status.chain > 0 {
            let mut text = format!("  {} chain", status.chain);
            if status.chain > 8 {
                text = text.to_uppercase();
            }
            let color = if status.chain > 8 { TermColor::Magenta } else { TermColor::Cyan };
            queue!(self.stdout, SetForegroundColor(color), Print(text))?;
        }

        if let Some(color) = status.endgame {
            queue!(self.stdout, SetForegroundColor(item_color(color)), Print("  endgame"))?;
        }

        let score = format!(" {}", status.score);
        let column = (self.width * 2).saturating_sub(score.len() as u16);
        queue!(
            self.stdout,
            cursor::MoveTo(column, 0),
            ResetColor,
            SetAttribute(Attribute::Bold),
            Print(score),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    fn print_game_over(&mut self, state: &GameState) -> Result<()> {
        let grid = state.grid();
        let column = (grid.width() * 2).saturating_sub(GAME_OVER.len() as u16) / 2;
        let row = grid.height() / 2 + BOARD_TOP;
        queue!(
            self.stdout,
            cursor::MoveTo(column, row),
            ResetColor,
            SetAttribute(Attribute::Reverse),
            Print(GAME_OVER),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().map_err(crossterm::ErrorKind::IoError)?;
        Ok(())
    }
}

impl Renderer for TermManager {
    fn render_full(&mut self, state: &GameState, status: &StatusBar) -> Result<()> {
        let grid = state.grid();
        self.width = grid.width();
        self.print_status(status)?;

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                self.print_cell((x, y), state.tile_at((x, y)), status.player_color)?;
            }
        }

        if status.game_over {
            self.print_game_over(state)?;
        }

        queue!(self.stdout, ResetColor)?;
        self.flush()
    }

    fn render_diff(&mut self, cells: &[(Coords, TileKind)], player_color: Color) -> Result<()> {
        for &(pos, tile) in cells {
            self.print_cell(pos, tile, player_color)?;
        }
        queue!(self.stdout, ResetColor)?;
        self.flush()
    }

    fn render_flash(&mut self, status: &StatusBar) -> Result<()> {
        self.print_status(status)?;
        self.flush()
    }
}

fn item_color(color: Color) -> TermColor {
    match color {
        Color::Black => TermColor::DarkBlue,
        Color::White => TermColor::White,
    }
}

/// Items of the player's color are drawn solid, the others hollow.
fn sprite(tile: TileKind, player: Color) -> Sprite {
    match tile {
        TileKind::Wall => Sprite("##", TermColor::DarkGrey),
        TileKind::Space => Sprite("  ", TermColor::Reset),
        TileKind::Item(color) if color == player => Sprite("()", item_color(color)),
        TileKind::Item(color) => Sprite("[]", item_color(color)),
        TileKind::SnakeHead => Sprite("@@", item_color(player)),
        TileKind::SnakeBodyFront => Sprite("OO", TermColor::Green),
        TileKind::SnakeBodyMid => Sprite("%%", TermColor::Green),
        TileKind::SnakeBodyTail => Sprite("++", TermColor::DarkGreen),
        TileKind::Tombstone => Sprite("XX", TermColor::Red),
        TileKind::EndgameHint(color) => Sprite("()", item_color(color)),
    }
}
