use std::fmt;

use tracing::{debug, info, trace};

use super::board::{evaluate, Board, Mark, Outcome, SQUARES};
use super::history::{Move, MoveEntry, Position, SortOrder};
use super::Error;

/// Something the player asked the game to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Play(usize),
    JumpTo(usize),
    ToggleSort,
}

/// What the status line should say about the viewed move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Winner(Mark),
    Draw,
    Next(Mark),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Winner(mark) => write!(f, "Winner: {}", mark),
            Status::Draw => f.write_str("Draw!!!"),
            Status::Next(mark) => write!(f, "Next player: {}", mark),
        }
    }
}

/// Move history plus the cursor selecting the move being viewed.
///
/// Invariants: `history` always holds the ordinal 0 move, ordinals are
/// unique, and `cursor < history.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    history: Vec<Move>,
    cursor: usize,
    order: SortOrder,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_order(SortOrder::Ascending)
    }

    /// A fresh game whose move list is shown in `order`.
    pub fn with_order(order: SortOrder) -> Self {
        GameState {
            history: vec![Move::start()],
            cursor: 0,
            order,
        }
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// The move being viewed.
    pub fn current(&self) -> &Move {
        &self.history[self.cursor]
    }

    pub fn board(&self) -> &Board {
        &self.current().board
    }

    pub fn outcome(&self) -> Outcome {
        evaluate(self.board())
    }

    pub fn is_decided(&self) -> bool {
        self.outcome().is_decided()
    }

    /// Whose turn it is at the viewed move. X moves on even ordinals.
    pub fn turn(&self) -> Mark {
        if self.current().ordinal % 2 == 0 {
            Mark::X
        } else {
            Mark::O
        }
    }

    pub fn status(&self) -> Status {
        match self.outcome() {
            Outcome::Winner { mark, .. } => Status::Winner(mark),
            Outcome::Draw => Status::Draw,
            Outcome::InProgress => Status::Next(self.turn()),
        }
    }

    /// The move list in display order.
    pub fn entries(&self) -> impl Iterator<Item = MoveEntry> + '_ {
        self.history
            .iter()
            .enumerate()
            .map(move |(index, mv)| MoveEntry {
                ordinal: mv.ordinal,
                origin: mv.origin,
                is_current: index == self.cursor,
            })
    }

    fn position_of(&self, ordinal: usize) -> Option<usize> {
        self.history.iter().position(|mv| mv.ordinal == ordinal)
    }

    /// Reports why `action` would be ignored, if it would be. Squares in the
    /// error are numbered from 1, as the player sees them.
    pub fn check(&self, action: Action) -> Result<(), Error> {
        match action {
            Action::Play(index) => {
                if index >= SQUARES {
                    Err(Error::InvalidIndex(index.saturating_add(1)))
                } else if self.is_decided() {
                    Err(Error::GameOver)
                } else if !self.board().is_valid_move(index) {
                    Err(Error::SquareTaken(index + 1))
                } else {
                    Ok(())
                }
            }
            Action::JumpTo(ordinal) => match self.position_of(ordinal) {
                Some(_) => Ok(()),
                None => Err(Error::UnknownMove(ordinal)),
            },
            Action::ToggleSort => Ok(()),
        }
    }

    /// Marks square `index` for the player whose turn it is.
    ///
    /// Any moves after the viewed one are dropped. Does nothing if the square
    /// is taken or out of range, or the viewed game is already decided.
    pub fn play(&mut self, index: usize) {
        if let Err(reason) = self.check(Action::Play(index)) {
            trace!(index, %reason, "ignoring play");
            return;
        }

        let current = *self.current();
        let next = Move {
            board: current.board.mark(index, self.turn()),
            ordinal: current.ordinal + 1,
            origin: Some(Position::from_index(index)),
        };

        let mut history: Vec<Move> = self
            .history
            .iter()
            .filter(|mv| mv.ordinal <= current.ordinal)
            .copied()
            .collect();
        history.push(next);

        self.cursor = history.len() - 1;
        self.history = history;
        debug!(index, ordinal = next.ordinal, "played");

        match evaluate(&next.board) {
            Outcome::Winner { mark, line } => info!(%mark, ?line, "game won"),
            Outcome::Draw => info!("game drawn"),
            Outcome::InProgress => {}
        }
    }

    /// Views the move with `ordinal`. Does nothing if there is no such move.
    pub fn jump_to(&mut self, ordinal: usize) {
        match self.position_of(ordinal) {
            Some(cursor) => {
                self.cursor = cursor;
                debug!(ordinal, cursor, "jumped");
            }
            None => trace!(ordinal, "ignoring jump to unknown move"),
        }
    }

    /// Flips the move list order, keeping the same move in view.
    pub fn toggle_sort(&mut self) {
        let ordinal = self.current().ordinal;
        self.order = self.order.toggle();

        let mut history = self.history.clone();
        self.order.sort(&mut history);
        self.history = history;

        if let Some(cursor) = self.position_of(ordinal) {
            self.cursor = cursor;
        }
        debug!(order = %self.order, cursor = self.cursor, "sorted");
    }

    /// Returns the state after `action`, leaving `self` as it was.
    pub fn apply(&self, action: Action) -> GameState {
        let mut next = self.clone();
        match action {
            Action::Play(index) => next.play(index),
            Action::JumpTo(ordinal) => next.jump_to(ordinal),
            Action::ToggleSort => next.toggle_sort(),
        }
        next
    }
}
