use std::fmt;

/// Side length of the board.
pub const SIDE: usize = 3;

/// Number of squares on the board.
pub const SQUARES: usize = SIDE * SIDE;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// Result of evaluating a board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Winner { mark: Mark, line: [usize; SIDE] },
    Draw,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner { mark, .. } => Some(*mark),
            _ => None,
        }
    }

    /// The winning line, if any.
    pub fn line(&self) -> Option<[usize; SIDE]> {
        match self {
            Outcome::Winner { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Every winning line of an `N`x`N` board in priority order: rows top to
/// bottom, columns left to right, then the main and anti diagonals.
pub fn lines<const N: usize>() -> impl Iterator<Item = [usize; N]> {
    let rows = (0..N).map(|row| std::array::from_fn::<usize, N, _>(|col| row * N + col));
    let cols = (0..N).map(|col| std::array::from_fn::<usize, N, _>(|row| row * N + col));
    let main = std::iter::once(std::array::from_fn::<usize, N, _>(|i| i * N + i));
    let anti = std::iter::once(std::array::from_fn::<usize, N, _>(|i| i * N + (N - 1 - i)));
    rows.chain(cols).chain(main).chain(anti)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Mark>; SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let squares = [None; SQUARES];
        Self { squares }
    }

    /// Builds a board from row-major squares.
    pub fn from_squares(squares: [Option<Mark>; SQUARES]) -> Self {
        Self { squares }
    }

    /// Returns `None` for an out of range index as well as an empty square.
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.squares.get(index).copied().flatten()
    }

    /// A copy of this board with `mark` placed at `index`.
    pub fn mark(&self, index: usize, mark: Mark) -> Board {
        let mut new_board = *self;
        new_board.squares[index] = Some(mark);
        new_board
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        matches!(self.squares.get(index), Some(None))
    }

    pub fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    fn display_squares(&self) -> [&'static str; SQUARES] {
        let mut display = [""; SQUARES];
        for (dsquare, square) in display.iter_mut().zip(self.squares.iter()) {
            match square {
                Some(Mark::X) => *dsquare = "X",
                Some(Mark::O) => *dsquare = "O",
                None => *dsquare = " ",
            }
        }
        display
    }
}

/// Decides the board: the first complete line wins, a full board without
/// one is a draw.
pub fn evaluate(board: &Board) -> Outcome {
    for line in lines::<SIDE>() {
        let first = board.squares[line[0]];
        if let Some(mark) = first {
            if line.iter().all(|i| board.squares[*i] == first) {
                return Outcome::Winner { mark, line };
            }
        }
    }
    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ds = self.display_squares();
        writeln!(f, " {} | {} | {}", ds[0], ds[1], ds[2])?;
        f.write_str("---+---+---\n")?;
        writeln!(f, " {} | {} | {}", ds[3], ds[4], ds[5])?;
        f.write_str("---+---+---\n")?;
        writeln!(f, " {} | {} | {}", ds[6], ds[7], ds[8])?;
        Ok(())
    }
}
