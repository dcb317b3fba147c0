#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Escape in a terminal.

mod maze_file;
mod session;
mod settings;
mod terminal;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_escape_core::MazeLayout;
use maze_escape_rendering::{FrameInput, Presentation, RenderingBackend};
use maze_escape_world::{query, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use self::{
    maze_file::{parse_maze, DEFAULT_MAZE},
    session::Session,
    settings::Settings,
    terminal::{key_input, render_scene, TerminalBackend},
};

/// Title shown above every interactive frame.
const TITLE: &str = "Maze Escape";

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "maze-escape")]
#[command(about = "Turn-based maze escape with a clone that replays your moves")]
struct Cli {
    /// Maze file to play; the bundled maze is used when omitted.
    #[arg(long, short)]
    maze: Option<PathBuf>,
    /// TOML settings file with `activation_turn` and `dynamic_wall_turns`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Committed moves after which the clone appears.
    #[arg(long)]
    activation_turn: Option<u32>,
    /// Countdown given to every dynamic wall in the maze file.
    #[arg(long)]
    dynamic_wall_turns: Option<u32>,
    /// Plays the given keys without prompting and prints the final frame.
    #[arg(long, value_name = "KEYS")]
    moves: Option<String>,
    /// Shows the hint path from the first frame.
    #[arg(long)]
    hint: bool,
}

/// Entry point for the Maze Escape command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_overrides(cli.activation_turn, cli.dynamic_wall_turns);
    let config = settings.game_config().context("invalid game settings")?;

    let layout = load_layout(cli.maze.as_deref(), settings.dynamic_wall_turns)?;
    let world = World::new(&layout, config).context("maze cannot be played")?;
    let (rows, columns) = query::dimensions(&world);
    info!(rows, columns, activation_turn = config.activation_turn().get(), "maze loaded");

    let mut session = Session::new(world);
    println!("{}", query::welcome_banner(session.world()));
    if cli.hint {
        session.handle(FrameInput {
            toggle_hint: true,
            ..FrameInput::default()
        });
    }

    match cli.moves {
        Some(keys) => run_script(session, &keys),
        None => run_interactive(session),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_layout(path: Option<&Path>, dynamic_wall_turns: u32) -> Result<MazeLayout> {
    let Some(path) = path else {
        return parse_maze(DEFAULT_MAZE, dynamic_wall_turns).context("bundled maze is malformed");
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read maze file {}", path.display()))?;
    parse_maze(&text, dynamic_wall_turns)
        .with_context(|| format!("failed to parse maze file {}", path.display()))
}

fn run_script(mut session: Session, keys: &str) -> Result<()> {
    for key in keys.chars() {
        let Some(input) = key_input(key) else {
            if !key.is_whitespace() {
                warn!(?key, "ignoring unknown key");
            }
            continue;
        };
        if input.quit {
            break;
        }
        session.handle(input);
    }

    let scene = session.scene().context("failed to assemble scene")?;
    print!("{}", render_scene(&scene));
    Ok(())
}

fn run_interactive(mut session: Session) -> Result<()> {
    let scene = session.scene().context("failed to assemble scene")?;
    let backend = TerminalBackend::new(io::stdin().lock(), io::stdout().lock());

    backend.run(Presentation::new(TITLE, scene), |input, scene| {
        session.handle(input);
        session.populate(scene);
    })
}
