#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Escape adapters.
//!
//! Adapters assemble a [`Scene`] from the world's read-only queries and hand
//! it to a [`RenderingBackend`], which draws it and reports player input back
//! through [`FrameInput`].

use anyhow::Result as AnyResult;
use maze_escape_core::{CellCoord, CellKind, Direction, GameStatus, Turn};
use std::{error::Error, fmt};

/// Presentation state of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneCell {
    /// Terrain currently stored at the cell.
    pub kind: CellKind,
    /// Countdown of a closed dynamic wall.
    pub turns_remaining: Option<u32>,
    /// Whether the cell could be entered by the next committed move.
    pub open_next_turn: bool,
}

impl SceneCell {
    /// Creates a new cell descriptor.
    #[must_use]
    pub const fn new(kind: CellKind, turns_remaining: Option<u32>, open_next_turn: bool) -> Self {
        Self {
            kind,
            turns_remaining,
            open_next_turn,
        }
    }
}

/// Occupant drawn on top of a cell's terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The pursuer stands on the cell.
    Pursuer,
    /// The player stands on the cell.
    Player,
    /// The cell is the goal.
    Goal,
    /// The cell lies on the visible hint path.
    Hint,
}

/// Scene description combining the maze, its inhabitants and the hint.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    rows: u32,
    columns: u32,
    /// Row-major cell descriptors.
    pub cells: Vec<SceneCell>,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Cell occupied by the pursuer once it is active.
    pub pursuer: Option<CellCoord>,
    /// Cell the player must reach.
    pub goal: CellCoord,
    /// Visible hint path, empty while the hint is hidden.
    pub hint: Vec<CellCoord>,
    /// Turn reached so far.
    pub turn: Turn,
    /// Current game status.
    pub status: GameStatus,
    /// Status line shown beneath the maze.
    pub message: Option<String>,
}

impl Scene {
    /// Creates a new scene descriptor.
    ///
    /// The scene starts at turn zero with no pursuer, no hint and no message.
    pub fn new(
        rows: u32,
        columns: u32,
        cells: Vec<SceneCell>,
        player: CellCoord,
        goal: CellCoord,
    ) -> Result<Self, RenderingError> {
        let expected = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(RenderingError::CellCountMismatch {
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            cells,
            player,
            pursuer: None,
            goal,
            hint: Vec::new(),
            turn: Turn::ZERO,
            status: GameStatus::Playing,
            message: None,
        })
    }

    /// Provides the dimensions of the scene as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Descriptor of the provided cell, if it lies inside the scene.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&SceneCell> {
        if !coord.within(self.rows, self.columns) {
            return None;
        }

        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.cells.get(row * width + column)
    }

    /// Topmost marker drawn on the provided cell.
    ///
    /// A pursuer sharing the player's cell hides the player.
    #[must_use]
    pub fn marker(&self, coord: CellCoord) -> Option<Marker> {
        if self.pursuer == Some(coord) {
            Some(Marker::Pursuer)
        } else if self.player == coord {
            Some(Marker::Player)
        } else if self.goal == coord {
            Some(Marker::Goal)
        } else if self.hint.contains(&coord) {
            Some(Marker::Hint)
        } else {
            None
        }
    }
}

/// Input gathered by adapters for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction the player asked to move in.
    pub direction: Option<Direction>,
    /// Whether the hint visibility should flip.
    pub toggle_hint: bool,
    /// Whether the game should start over.
    pub restart: bool,
    /// Whether the adapter should stop presenting frames.
    pub quit: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the maze.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Escape scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until input requests an exit.
    ///
    /// `update_scene` receives the input captured for each frame and may
    /// mutate the scene before it is drawn again.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The number of cell descriptors does not match the scene dimensions.
    CellCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells provided.
        found: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellCountMismatch { expected, found } => {
                write!(f, "scene expects {expected} cells (received {found})")
            }
        }
    }
}

impl Error for RenderingError {}
