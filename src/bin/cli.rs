use std::io::{self, BufRead};

use clap::Parser;
use sodium::{SodiumCtx, StreamSink};
use tracing_subscriber::EnvFilter;

use histttory::{CommandInput, Error, GameState, Outcome, SortOrder, TicTacToe};

/// Tic-tac-toe on the command line, with a move history you can jump around in.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// List moves newest first.
    #[arg(long)]
    descending: bool,

    /// Only print the status line after each move.
    #[arg(long, short)]
    quiet: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn print_game(game: &GameState, quiet: bool) {
    if !quiet {
        println!("{}", game.board());
        println!("Moves ({}):", game.order());
        for entry in game.entries() {
            println!("  {}", entry);
        }
    }
    println!("{}", game.status());
}

fn main() -> io::Result<()> {
    init_tracing();
    let args = Args::parse();
    let order = if args.descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };

    let ctx = SodiumCtx::new();

    let (kb_input, game, _listeners) = ctx.transaction(|| {
        let mut listeners = Vec::new();
        let kb_input: StreamSink<String> = ctx.new_stream_sink();

        let input = CommandInput::new(&kb_input.stream());
        let game = TicTacToe::new(&ctx, &input.actions, GameState::with_order(order));

        listeners.push(
            input
                .error
                .or_else(&game.error)
                .listen(|err: &Error| println!("{}", err)),
        );

        let quiet = args.quiet;
        listeners.push(
            game.state
                .updates()
                .listen(move |state: &GameState| print_game(state, quiet)),
        );

        listeners.push(game.outcome.listen(|outcome: &Outcome| match outcome {
            Outcome::Winner { mark, .. } => println!("{} has won the game!", mark),
            Outcome::Draw => println!("It's a draw!"),
            Outcome::InProgress => {}
        }));

        (kb_input, game, listeners)
    });

    println!("Welcome to Tic Tac Toe!\n");
    println!("Squares are numbered 1-9 from the top left.");
    println!("`j N` jumps to move N, `s` flips the move list.\n");
    print_game(&game.state.sample(), args.quiet);

    let stdin = io::stdin().lock();
    for line in stdin.lines() {
        kb_input.send(line?);
    }

    Ok(())
}
