/// Item and player color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn toggled(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Wall,
    Space,
    Item(Color),
    SnakeHead,
    SnakeBodyFront,
    SnakeBodyMid,
    SnakeBodyTail,
    Tombstone,
    EndgameHint(Color),
}

impl TileKind {
    /// Tiles a turn may point into.
    pub fn is_open(self) -> bool {
        matches!(self, TileKind::Space | TileKind::Item(_))
    }

    pub fn is_snake(self) -> bool {
        matches!(
            self,
            TileKind::SnakeHead
                | TileKind::SnakeBodyFront
                | TileKind::SnakeBodyMid
                | TileKind::SnakeBodyTail
        )
    }
}
