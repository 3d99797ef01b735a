use std::num::ParseIntError;

use sodium::{Cell, CellLoop, SodiumCtx, Stream};
use thiserror::Error;

mod board;
mod command;
mod game;
mod history;

pub use board::{evaluate, lines, Board, Mark, Outcome, SIDE, SQUARES};
pub use game::{Action, GameState, Status};
pub use history::{Move, MoveEntry, Position, SortOrder};

/// Why an action was not carried out. Squares are numbered from 1.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid move: square {0} is already taken!")]
    SquareTaken(usize),

    #[error("invalid square: {0}!")]
    InvalidIndex(usize),

    #[error("the game is over, jump back to keep playing!")]
    GameOver,

    #[error("there is no move #{0}!")]
    UnknownMove(usize),

    #[error("invalid input: {0}!")]
    InvalidInteger(ParseIntError),

    #[error("unknown command: {0:?}!")]
    UnknownCommand(String),
}

/// A game driven by a stream of actions.
pub struct TicTacToe {
    pub state: Cell<GameState>,
    /// Actions that changed, or could have changed, the state.
    pub accepted: Stream<Action>,
    /// Fires when a move decides the game.
    pub outcome: Stream<Outcome>,
    pub error: Stream<Error>,
}

/// Player input split into actions and parse errors.
pub struct CommandInput {
    pub actions: Stream<Action>,
    pub error: Stream<Error>,
}

struct ActionValidator {
    accepted: Stream<Action>,
    error: Stream<Error>,
}

impl TicTacToe {
    pub fn new(ctx: &SodiumCtx, actions: &Stream<Action>, initial: GameState) -> TicTacToe {
        ctx.transaction(|| {
            let state_cell_loop: CellLoop<GameState> = ctx.new_cell_loop();
            let state_cell_fwd = state_cell_loop.cell();

            let ActionValidator { accepted, error } =
                ActionValidator::new(actions, &state_cell_fwd);

            let transition_stream = accepted.snapshot(
                &state_cell_fwd,
                |action: &Action, state: &GameState| (*action, state.apply(*action)),
            );
            let state_cell = transition_stream
                .map(|(_, state): &(Action, GameState)| state.clone())
                .hold(initial.clone());
            state_cell_loop.loop_(&state_cell);

            let outcome_stream = transition_stream
                .map(|(action, state): &(Action, GameState)| match action {
                    Action::Play(_) => Some(state.outcome()),
                    _ => None,
                })
                .filter_option()
                .filter(|outcome: &Outcome| outcome.is_decided());

            TicTacToe {
                state: state_cell,
                accepted,
                outcome: outcome_stream,
                error,
            }
        })
    }
}

impl ActionValidator {
    fn new(action_stream: &Stream<Action>, state_cell: &Cell<GameState>) -> ActionValidator {
        let (accepted, error) = action_stream
            .snapshot(state_cell, |action: &Action, state: &GameState| {
                state.check(*action).map(|()| *action)
            })
            .split_res();

        ActionValidator { accepted, error }
    }
}

impl CommandInput {
    pub fn new(input_stream: &Stream<String>) -> CommandInput {
        let (actions, error) = input_stream
            .filter(|line: &String| !line.trim().is_empty())
            .map(|line: &String| line.parse::<Action>())
            .split_res();

        CommandInput { actions, error }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use sodium::StreamSink;

    use super::*;

    fn collect<A: Clone + Send + 'static>(
        stream: &Stream<A>,
    ) -> (Arc<Mutex<Vec<A>>>, sodium::Listener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener = stream.listen({
            let seen = seen.clone();
            move |a: &A| seen.lock().unwrap().push(a.clone())
        });
        (seen, listener)
    }

    #[test]
    fn accepted_actions_update_state() {
        let ctx = SodiumCtx::new();
        let actions: StreamSink<Action> = ctx.new_stream_sink();
        let game = TicTacToe::new(&ctx, &actions.stream(), GameState::new());

        for index in [0, 4, 1, 7, 2] {
            actions.send(Action::Play(index));
        }

        let state = game.state.sample();
        assert_eq!(state.history().len(), 6);
        assert_eq!(state.status(), Status::Winner(Mark::X));
    }

    #[test]
    fn starts_from_the_given_state() {
        let ctx = SodiumCtx::new();
        let actions: StreamSink<Action> = ctx.new_stream_sink();
        let initial = GameState::with_order(SortOrder::Descending);
        let game = TicTacToe::new(&ctx, &actions.stream(), initial.clone());
        assert_eq!(game.state.sample(), initial);

        actions.send(Action::Play(0));
        actions.send(Action::ToggleSort);
        let state = game.state.sample();
        assert_eq!(state.order(), SortOrder::Ascending);
        assert_eq!(state.current().ordinal, 1);
    }

    #[test]
    fn rejected_actions_report_errors() {
        let ctx = SodiumCtx::new();
        let actions: StreamSink<Action> = ctx.new_stream_sink();
        let game = TicTacToe::new(&ctx, &actions.stream(), GameState::new());
        let (errors, _listener) = collect(&game.error);

        actions.send(Action::Play(4));
        actions.send(Action::Play(4));
        actions.send(Action::JumpTo(5));

        assert_eq!(
            *errors.lock().unwrap(),
            vec![Error::SquareTaken(5), Error::UnknownMove(5)]
        );
        assert_eq!(game.state.sample().history().len(), 2);
    }

    #[test]
    fn outcome_fires_once_when_decided() {
        let ctx = SodiumCtx::new();
        let actions: StreamSink<Action> = ctx.new_stream_sink();
        let game = TicTacToe::new(&ctx, &actions.stream(), GameState::new());
        let (outcomes, _listener) = collect(&game.outcome);

        for index in [0, 4, 1, 7, 2] {
            actions.send(Action::Play(index));
        }
        actions.send(Action::JumpTo(3));
        actions.send(Action::JumpTo(5));
        actions.send(Action::ToggleSort);

        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![Outcome::Winner {
                mark: Mark::X,
                line: [0, 1, 2]
            }]
        );
        assert_eq!(game.state.sample().order(), SortOrder::Descending);
    }

    #[test]
    fn command_input_feeds_the_game() {
        let ctx = SodiumCtx::new();
        let kb_input: StreamSink<String> = ctx.new_stream_sink();
        let (input, game) = ctx.transaction(|| {
            let input = CommandInput::new(&kb_input.stream());
            let game = TicTacToe::new(&ctx, &input.actions, GameState::new());
            (input, game)
        });
        let (errors, _listener) = collect(&input.error);

        for line in ["5", "", "1", "j 1", "what"] {
            kb_input.send(line.to_string());
        }

        let state = game.state.sample();
        assert_eq!(state.current().ordinal, 1);
        assert_eq!(state.history().len(), 3);
        assert_eq!(
            *errors.lock().unwrap(),
            vec![Error::UnknownCommand("what".to_string())]
        );
    }
}
