use std::{io, time::Duration};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use histttory::{Action, GameState, Mark, SortOrder, Status, TicTacToe};
use sodium as na;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Widget},
    Frame, Terminal,
};

/// Tic-tac-toe in the terminal, with a move history you can jump around in.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// List moves newest first.
    #[arg(long)]
    descending: bool,
}

/// Logs go to the file named by `HISTTTORY_LOG`, and nowhere otherwise.
fn init_tracing() {
    let Some(log_path) = std::env::var("HISTTTORY_LOG").ok() else {
        return;
    };
    let Ok(file) = std::fs::File::create(&log_path) else {
        eprintln!("Warning: failed to create log file: {}", log_path);
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn main() -> io::Result<()> {
    init_tracing();
    let args = Args::parse();
    let order = if args.descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };

    let ctx = na::SodiumCtx::new();
    let (actions, ui) = ctx.transaction(|| {
        let actions: na::StreamSink<Action> = ctx.new_stream_sink();
        let game = TicTacToe::new(&ctx, &actions.stream(), GameState::with_order(order));

        let message = game
            .error
            .map(|err: &histttory::Error| Some(err.to_string()))
            .or_else(&game.accepted.map(|_: &Action| None::<String>))
            .hold(None);

        let ui = Ui {
            state: game.state,
            message,
            selected: 4,
            focus: Focus::Board,
            moves: ListState::default(),
        };
        (actions, ui)
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &actions, ui);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    actions: &na::StreamSink<Action>,
    mut ui: Ui,
) -> io::Result<()> {
    ui.on_state_change();
    loop {
        terminal.draw(|f| ui.draw(f))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            code => {
                if let Some(action) = ui.update(code) {
                    actions.send(action);
                    ui.on_state_change();
                }
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Focus {
    Board,
    Moves,
}

struct Ui {
    state: na::Cell<GameState>,
    message: na::Cell<Option<String>>,
    selected: usize,
    focus: Focus,
    moves: ListState,
}

impl Ui {
    fn update(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char(c @ '1'..='9') => {
                return c.to_digit(10).map(|square| Action::Play(square as usize - 1));
            }
            KeyCode::Char('s') => return Some(Action::ToggleSort),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Board => Focus::Moves,
                    Focus::Moves => Focus::Board,
                };
                self.on_state_change();
                return None;
            }
            _ => {}
        }
        match self.focus {
            Focus::Board => self.update_board(code),
            Focus::Moves => self.update_moves(code),
        }
    }

    fn update_board(&mut self, code: KeyCode) -> Option<Action> {
        let (row, col) = (self.selected / 3, self.selected % 3);
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = row.saturating_sub(1) * 3 + col,
            KeyCode::Down | KeyCode::Char('j') => self.selected = (row + 1).min(2) * 3 + col,
            KeyCode::Left | KeyCode::Char('h') => self.selected = row * 3 + col.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => self.selected = row * 3 + (col + 1).min(2),
            KeyCode::Enter | KeyCode::Char(' ') => return Some(Action::Play(self.selected)),
            _ => {}
        }
        None
    }

    fn update_moves(&mut self, code: KeyCode) -> Option<Action> {
        let state = self.state.sample();
        let last = state.history().len() - 1;
        let selected = self.moves.selected().unwrap_or(state.cursor());
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.moves.select(Some(selected.saturating_sub(1))),
            KeyCode::Down | KeyCode::Char('j') => self.moves.select(Some((selected + 1).min(last))),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return state
                    .history()
                    .get(selected)
                    .map(|mv| Action::JumpTo(mv.ordinal));
            }
            _ => {}
        }
        None
    }

    /// Moves the list selection onto the viewed move.
    fn on_state_change(&mut self) {
        let cursor = self.state.sample().cursor();
        self.moves.select(Some(cursor));
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        let state = self.state.sample();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(2)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(f.size());
        let block = Block::default().title("Board").borders(Borders::ALL);
        self.draw_board(f, &state, block.inner(chunks[0]));
        f.render_widget(block, chunks[0]);

        let info = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)].as_ref())
            .split(chunks[1]);
        self.draw_status(f, &state, info[0]);
        self.draw_moves(f, &state, info[1]);
    }

    fn draw_status<B: Backend>(&self, f: &mut Frame<B>, state: &GameState, area: Rect) {
        let status_style = match state.status() {
            Status::Winner(_) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Status::Draw => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Status::Next(_) => Style::default(),
        };
        let mut lines = vec![Spans::from(Span::styled(state.status().to_string(), status_style))];
        if let Some(message) = self.message.sample() {
            lines.push(Spans::from(Span::styled(message, Style::default().fg(Color::Red))));
        }
        lines.push(Spans::from("1-9 play  s sort  tab focus  q quit"));

        let block = Block::default().title("Game Info").borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_moves<B: Backend>(&mut self, f: &mut Frame<B>, state: &GameState, area: Rect) {
        let items: Vec<ListItem> = state
            .entries()
            .map(|entry| {
                let style = if entry.is_current {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(entry.to_string(), style))
            })
            .collect();

        let title = format!("Moves ({})", state.order());
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if self.focus == Focus::Moves {
            block = block.border_style(Style::default().fg(Color::Cyan));
        }
        let list = List::new(items)
            .block(block)
            .highlight_symbol("> ")
            .highlight_style(Style::default().fg(Color::Cyan));
        f.render_stateful_widget(list, area, &mut self.moves);
    }

    fn draw_board<B: Backend>(&self, f: &mut Frame<B>, state: &GameState, area: Rect) {
        let thirds = [
            Constraint::Percentage(5),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(5),
        ];
        let vchunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(thirds.as_ref())
            .split(area);

        let winning_line = state.outcome().line();
        for row in 0..3 {
            let hchunks = Layout::default()
                .direction(Direction::Horizontal)
                .horizontal_margin(3)
                .constraints(thirds.as_ref())
                .split(vchunks[row + 1]);

            for col in 0..3 {
                let index = row * 3 + col;
                let mut style = Style::default();
                if winning_line.is_some_and(|line| line.contains(&index)) {
                    style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                }
                let mut block_style = Style::default();
                if self.focus == Focus::Board && index == self.selected {
                    block_style = block_style.fg(Color::Cyan);
                }

                let chunk = hchunks[col + 1];
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(block_style);
                f.render_widget(
                    RenderMark {
                        mark: state.board().get(index),
                        style,
                    },
                    block.inner(chunk),
                );
                f.render_widget(block, chunk);
            }
        }
    }
}

struct RenderMark {
    mark: Option<Mark>,
    style: Style,
}

impl Widget for RenderMark {
    fn render(self, area: Rect, buf: &mut tui::buffer::Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        match self.mark {
            Some(Mark::X) => render_x(area, buf, self.style),
            Some(Mark::O) => render_o(area, buf, self.style),
            None => {}
        }
    }
}

fn render_x(area: Rect, buf: &mut tui::buffer::Buffer, style: Style) {
    let span = area.height.saturating_sub(1).max(1);
    for y in 0..area.height {
        let x_left = y * area.width.saturating_sub(1) / span;
        let x_right = area.width.saturating_sub(1) - x_left;
        buf.set_string(area.x + x_left, area.y + y, "\\", style);
        buf.set_string(area.x + x_right, area.y + y, "/", style);
    }
}

fn render_o(area: Rect, buf: &mut tui::buffer::Buffer, style: Style) {
    let half_width = area.width as f32 / 2.0;
    let half_height = area.height as f32 / 2.0;

    for y in 0..area.height {
        for x in 0..area.width {
            let dx = (x as f32 + 0.5 - half_width) / half_width;
            let dy = (y as f32 + 0.5 - half_height) / half_height;
            let r = (dx * dx + dy * dy).sqrt();
            if (r - 0.8).abs() < 0.2 {
                buf.set_string(area.x + x, area.y + y, "@", style);
            }
        }
    }
}
