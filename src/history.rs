use std::fmt;

use super::board::{Board, SIDE};

/// Row and column of a square, both zero based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn from_index(index: usize) -> Position {
        Position {
            row: index / SIDE,
            col: index % SIDE,
        }
    }

    pub fn index(&self) -> usize {
        self.row * SIDE + self.col
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One entry of the game history: the board after the move was made.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub board: Board,
    pub ordinal: usize,
    pub origin: Option<Position>,
}

impl Move {
    /// The empty board every game starts from.
    pub fn start() -> Move {
        Move {
            board: Board::new(),
            ordinal: 0,
            origin: None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(&self) -> SortOrder {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Stable sort of `moves` by ordinal in this direction.
    pub fn sort(&self, moves: &mut [Move]) {
        match self {
            SortOrder::Ascending => moves.sort_by(|a, b| a.ordinal.cmp(&b.ordinal)),
            SortOrder::Descending => moves.sort_by(|a, b| b.ordinal.cmp(&a.ordinal)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("Ascending"),
            SortOrder::Descending => f.write_str("Descending"),
        }
    }
}

/// A row of the move list as shown to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveEntry {
    pub ordinal: usize,
    pub origin: Option<Position>,
    pub is_current: bool,
}

impl fmt::Display for MoveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_current, self.ordinal) {
            (true, n) => write!(f, "You are at move #{}", n)?,
            (false, 0) => f.write_str("Go to game start")?,
            (false, n) => write!(f, "Go to move #{}", n)?,
        }
        if let Some(origin) = self.origin {
            write!(f, " {}", origin)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_from_index_is_row_major() {
        assert_eq!(Position::from_index(0), Position { row: 0, col: 0 });
        assert_eq!(Position::from_index(5), Position { row: 1, col: 2 });
        assert_eq!(Position::from_index(7), Position { row: 2, col: 1 });
        assert_eq!(Position::from_index(7).index(), 7);
    }

    #[test]
    fn sort_only_flips_direction() {
        let mut moves: Vec<Move> = (0..4)
            .map(|ordinal| Move {
                ordinal,
                ..Move::start()
            })
            .collect();
        SortOrder::Descending.sort(&mut moves);
        let ordinals: Vec<usize> = moves.iter().map(|m| m.ordinal).collect();
        assert_eq!(ordinals, vec![3, 2, 1, 0]);

        SortOrder::Ascending.sort(&mut moves);
        let ordinals: Vec<usize> = moves.iter().map(|m| m.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn entry_descriptions() {
        let start = MoveEntry {
            ordinal: 0,
            origin: None,
            is_current: false,
        };
        assert_eq!(start.to_string(), "Go to game start");
        assert_eq!(
            MoveEntry {
                is_current: true,
                ..start
            }
            .to_string(),
            "You are at move #0"
        );

        let current = MoveEntry {
            ordinal: 3,
            origin: Some(Position { row: 2, col: 1 }),
            is_current: true,
        };
        assert_eq!(current.to_string(), "You are at move #3 (2, 1)");
        assert_eq!(
            MoveEntry {
                is_current: false,
                ..current
            }
            .to_string(),
            "Go to move #3 (2, 1)"
        );
    }
}
