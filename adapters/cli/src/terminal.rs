//! Line-oriented terminal backend.
//!
//! Each frame is drawn as text. Input is read one line at a time and every
//! recognised key in the line is forwarded as its own [`FrameInput`].

use std::{
    fmt::Write as _,
    io::{BufRead, Write},
};

use anyhow::{Context, Result};
use maze_escape_core::{CellCoord, CellKind, Direction, GameStatus};
use maze_escape_rendering::{FrameInput, Marker, Presentation, RenderingBackend, Scene};

/// Key reference printed beneath every frame.
const CONTROLS: &str =
    "keys: q/w/e slant-left/slant-right/vertical, a/d left/right, h hint, r restart, x quit";

/// Translates a single key into frame input.
#[must_use]
pub(crate) fn key_input(key: char) -> Option<FrameInput> {
    let direction = |direction| FrameInput {
        direction: Some(direction),
        ..FrameInput::default()
    };

    let input = match key.to_ascii_lowercase() {
        'q' => direction(Direction::SlantLeft),
        'w' => direction(Direction::SlantRight),
        'e' => direction(Direction::Vertical),
        'a' => direction(Direction::Left),
        'd' => direction(Direction::Right),
        'h' => FrameInput {
            toggle_hint: true,
            ..FrameInput::default()
        },
        'r' => FrameInput {
            restart: true,
            ..FrameInput::default()
        },
        'x' => FrameInput {
            quit: true,
            ..FrameInput::default()
        },
        _ => return None,
    };
    Some(input)
}

/// Draws the scene as text, one maze row per line.
///
/// Odd rows are shifted by one column so neighbouring triangles interlock.
#[must_use]
pub(crate) fn render_scene(scene: &Scene) -> String {
    let (rows, columns) = scene.dimensions();
    let mut frame = String::new();

    for row in 0..rows {
        if row % 2 == 1 {
            frame.push(' ');
        }
        for column in 0..columns {
            let cell = CellCoord::new(row, column);
            frame.push(glyph(scene, cell));
            frame.push(' ');
        }
        while frame.ends_with(' ') {
            let _ = frame.pop();
        }
        frame.push('\n');
    }

    let _ = writeln!(frame, "turn {}  {}", scene.turn.get(), status_label(scene.status));
    if let Some(message) = &scene.message {
        let _ = writeln!(frame, "{message}");
    }
    frame
}

fn glyph(scene: &Scene, cell: CellCoord) -> char {
    match scene.marker(cell) {
        Some(Marker::Pursuer) => return 'C',
        Some(Marker::Player) => return '@',
        Some(Marker::Goal) => return 'E',
        Some(Marker::Hint) => return '*',
        None => {}
    }

    let Some(descriptor) = scene.cell(cell) else {
        return ' ';
    };
    match descriptor.kind {
        CellKind::Path => '.',
        CellKind::Wall => '#',
        CellKind::AlternatingWall if descriptor.open_next_turn => '~',
        CellKind::AlternatingWall => '=',
        CellKind::DynamicWall => descriptor
            .turns_remaining
            .and_then(|turns| char::from_digit(turns, 10))
            .unwrap_or('+'),
    }
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Playing => "playing",
        GameStatus::Won => "escaped",
        GameStatus::Lost => "caught",
    }
}

/// Rendering backend that draws frames to a writer and reads keys from a reader.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
}

impl<R, W> TerminalBackend<R, W> {
    /// Creates a backend over the provided streams.
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R, W> TerminalBackend<R, W>
where
    W: Write,
{
    fn draw(&mut self, title: &str, scene: &Scene) -> Result<()> {
        write!(
            self.output,
            "\n{title}\n{}{CONTROLS}\n> ",
            render_scene(scene)
        )
        .context("failed to draw frame")?;
        self.output.flush().context("failed to flush frame")
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene),
    {
        let Presentation { title, mut scene } = presentation;
        self.draw(&title, &scene)?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read input")?;
            if read == 0 {
                return Ok(());
            }

            for input in line.chars().filter_map(key_input) {
                if input.quit {
                    return Ok(());
                }
                update_scene(input, &mut scene);
            }

            self.draw(&title, &scene)?;
        }
    }
}
