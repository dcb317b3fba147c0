#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Escape engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired moves, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and query
//! immutable snapshots such as [`MazeSnapshot`].
//!
//! The rules that decide when a time-dependent cell may be entered live here
//! as free functions ([`alternating_wall_open_at`] and [`dynamic_wall_open`])
//! together with the five-neighbour adjacency table on [`Direction`], so the
//! move resolver and the pathfinder can never disagree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Escape the grid before your clone catches up.";

/// Number of committed moves after which the pursuer starts replaying.
pub const DEFAULT_ACTIVATION_TURN: u32 = 6;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step once in the provided direction.
    AttemptMove {
        /// Direction token resolved against the player's row parity.
        direction: Direction,
    },
    /// Rebuilds the world from the layout it was created with.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player committed a move.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
        /// Turn reached once the move was committed.
        turn: Turn,
    },
    /// Reports that a move attempt was refused. Time does not advance.
    MoveRejected {
        /// Direction that was requested.
        direction: Direction,
        /// Why the move could not be committed.
        reason: MoveRejection,
    },
    /// Indicates that the turn counter advanced.
    TurnAdvanced {
        /// Turn reached after advancing.
        turn: Turn,
    },
    /// Announces that a dynamic wall finished its countdown and became a path.
    DynamicWallOpened {
        /// Cell that permanently opened.
        cell: CellCoord,
    },
    /// Announces that the pursuer started replaying the player's history.
    PursuerActivated {
        /// Cell the pursuer occupies on activation.
        cell: CellCoord,
    },
    /// Confirms that the pursuer moved along the recorded history.
    PursuerMoved {
        /// Cell the pursuer occupied before the update.
        from: CellCoord,
        /// Cell the pursuer occupies after the update.
        to: CellCoord,
    },
    /// Announces that the game left the playing state.
    StatusChanged {
        /// Status that became active.
        status: GameStatus,
    },
    /// Confirms that the world was rebuilt from its initial layout.
    GameRestarted,
}

/// Reasons a move attempt may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The target lies outside the grid.
    OutOfBounds,
    /// The target cell is not walkable at the turn it would be entered.
    Blocked,
    /// The active pursuer currently occupies the target cell.
    PursuerOccupied,
    /// The game already reached a terminal status.
    GameOver,
}

/// Lifecycle of a single game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are accepted.
    #[default]
    Playing,
    /// The player reached the goal.
    Won,
    /// The pursuer caught the player.
    Lost,
}

impl GameStatus {
    /// Reports whether no further moves are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Kind of terrain stored in a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Always walkable.
    Path,
    /// Never walkable.
    Wall,
    /// Walkable only when entered on an even turn.
    AlternatingWall,
    /// Blocked until its countdown reaches zero, then permanently a path.
    DynamicWall,
}

/// Parity of a row, which selects the shape of its cells.
///
/// Even rows hold "point-up" cells whose slanted edges face upward; odd rows
/// hold "point-down" cells whose slanted edges face downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowParity {
    /// Rows 0, 2, 4, ...
    Even,
    /// Rows 1, 3, 5, ...
    Odd,
}

impl RowParity {
    /// Parity of the provided row index.
    #[must_use]
    pub const fn of(row: u32) -> Self {
        if row % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }
}

/// Direction tokens understood by the five-neighbour grid.
///
/// Every cell has exactly five neighbours. `Left` and `Right` stay on the
/// row; the remaining three cross into adjacent rows and depend on the
/// mover's row parity:
///
/// | token        | even row | odd row  |
/// |--------------|----------|----------|
/// | `Left`       | (0, -1)  | (0, -1)  |
/// | `Right`      | (0, +1)  | (0, +1)  |
/// | `SlantLeft`  | (-1, -1) | (+1, 0)  |
/// | `SlantRight` | (-1, 0)  | (+1, +1) |
/// | `Vertical`   | (+1, 0)  | (-1, 0)  |
///
/// The relation is symmetric: if `a` reaches `b` then `b` reaches `a`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing column indices on the same row.
    Left,
    /// Toward increasing column indices on the same row.
    Right,
    /// Across the left slanted edge.
    SlantLeft,
    /// Across the right slanted edge.
    SlantRight,
    /// Across the flat edge.
    Vertical,
}

impl Direction {
    /// All direction tokens in the order neighbours are generated.
    pub const ALL: [Direction; 5] = [
        Direction::Left,
        Direction::Right,
        Direction::SlantLeft,
        Direction::SlantRight,
        Direction::Vertical,
    ];

    /// Row and column delta for this token when leaving a row of `parity`.
    #[must_use]
    pub const fn offset(self, parity: RowParity) -> (i32, i32) {
        match (parity, self) {
            (_, Self::Left) => (0, -1),
            (_, Self::Right) => (0, 1),
            (RowParity::Even, Self::SlantLeft) => (-1, -1),
            (RowParity::Even, Self::SlantRight) => (-1, 0),
            (RowParity::Even, Self::Vertical) => (1, 0),
            (RowParity::Odd, Self::SlantLeft) => (1, 0),
            (RowParity::Odd, Self::SlantRight) => (1, 1),
            (RowParity::Odd, Self::Vertical) => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Parity of the row containing the cell.
    #[must_use]
    pub const fn parity(&self) -> RowParity {
        RowParity::of(self.row)
    }

    /// Reports whether the cell lies inside a `rows × columns` grid.
    #[must_use]
    pub const fn within(&self, rows: u32, columns: u32) -> bool {
        self.row < rows && self.column < columns
    }

    /// Neighbouring cell reached by `direction`, if it lies inside the grid.
    #[must_use]
    pub fn step(self, direction: Direction, rows: u32, columns: u32) -> Option<CellCoord> {
        let (row_delta, column_delta) = direction.offset(self.parity());
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        let cell = CellCoord::new(row, column);
        cell.within(rows, columns).then_some(cell)
    }

    /// Iterator over the in-bounds neighbours in [`Direction::ALL`] order.
    pub fn neighbors(self, rows: u32, columns: u32) -> impl Iterator<Item = CellCoord> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction, rows, columns))
    }

    /// Direction token that leads from `self` to `other`, if they are adjacent.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        Direction::ALL.into_iter().find(|direction| {
            let (row_delta, column_delta) = direction.offset(self.parity());
            self.row.checked_add_signed(row_delta) == Some(other.row)
                && self.column.checked_add_signed(column_delta) == Some(other.column)
        })
    }
}

/// Discrete time unit, advanced once per committed player move.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Turn(u32);

impl Turn {
    /// The turn every game starts on.
    pub const ZERO: Turn = Turn(0);

    /// Creates a new turn wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying turn count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Turn that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Number of turns elapsed since `earlier`, saturating at zero.
    #[must_use]
    pub const fn since(self, earlier: Turn) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Reports whether an alternating wall may be entered on `turn`.
///
/// Alternating walls are open on even turns and closed on odd turns. This is
/// the only place the convention is spelled out.
#[must_use]
pub const fn alternating_wall_open_at(turn: Turn) -> bool {
    turn.get() % 2 == 0
}

/// Reports whether a dynamic wall is open once `steps_elapsed` further turns
/// have passed since its countdown read `turns_remaining`.
///
/// Live checks pass `steps_elapsed = 0`, which reduces to "the countdown is
/// already zero".
#[must_use]
pub const fn dynamic_wall_open(turns_remaining: u32, steps_elapsed: u32) -> bool {
    turns_remaining <= steps_elapsed
}

/// Countdown attached to a single dynamic wall cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DynamicWallTimer {
    cell: CellCoord,
    turns_remaining: u32,
}

impl DynamicWallTimer {
    /// Creates a countdown for the wall at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, turns_remaining: u32) -> Self {
        Self {
            cell,
            turns_remaining,
        }
    }

    /// Cell guarded by the countdown.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Turns left before the wall opens.
    #[must_use]
    pub const fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    /// Reports whether the countdown already reached zero.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.turns_remaining == 0
    }

    /// Decrements an armed countdown by one turn.
    ///
    /// Returns `true` exactly once, on the tick that brings the countdown to
    /// zero. An exhausted timer stays at zero.
    pub fn tick(&mut self) -> bool {
        if self.turns_remaining == 0 {
            return false;
        }

        self.turns_remaining -= 1;
        self.turns_remaining == 0
    }
}

/// Static description of a maze as produced by a loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    grid: Vec<Vec<CellKind>>,
    timers: Vec<DynamicWallTimer>,
    start: CellCoord,
    goal: CellCoord,
}

impl MazeLayout {
    /// Creates a layout from rows of cells, wall countdowns, start and goal.
    ///
    /// No validation happens here; the world rejects malformed layouts when
    /// it is constructed.
    #[must_use]
    pub fn new(
        grid: Vec<Vec<CellKind>>,
        timers: Vec<DynamicWallTimer>,
        start: CellCoord,
        goal: CellCoord,
    ) -> Self {
        Self {
            grid,
            timers,
            start,
            goal,
        }
    }

    /// Rows of cells in top-to-bottom order.
    #[must_use]
    pub fn grid(&self) -> &[Vec<CellKind>] {
        &self.grid
    }

    /// Countdowns supplied for dynamic wall cells.
    #[must_use]
    pub fn timers(&self) -> &[DynamicWallTimer] {
        &self.timers
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the player must reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }
}

/// Owned, frozen copy of the maze taken at a specific turn.
///
/// Snapshots never alias the live timer list, so they can be handed to
/// systems or other threads while the world keeps mutating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    rows: u32,
    columns: u32,
    cells: Vec<CellKind>,
    timers: Vec<DynamicWallTimer>,
    turn: Turn,
}

impl MazeSnapshot {
    /// Captures a snapshot from row-major cells, timers and the current turn.
    #[must_use]
    pub fn new(
        rows: u32,
        columns: u32,
        cells: Vec<CellKind>,
        timers: Vec<DynamicWallTimer>,
        turn: Turn,
    ) -> Self {
        Self {
            rows,
            columns,
            cells,
            timers,
            turn,
        }
    }

    /// Provides the dimensions of the snapshot as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Turn at which the snapshot was taken.
    #[must_use]
    pub const fn turn(&self) -> Turn {
        self.turn
    }

    /// Countdowns as they stood when the snapshot was taken.
    #[must_use]
    pub fn timers(&self) -> &[DynamicWallTimer] {
        &self.timers
    }

    /// Cell kinds stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Kind of the provided cell, if it lies inside the snapshot.
    #[must_use]
    pub fn cell_kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Row-major index of the provided cell, if it lies inside the snapshot.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !cell.within(self.rows, self.columns) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Everything the pathfinder needs to answer a single hint request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathQuery {
    /// Frozen maze state.
    pub maze: MazeSnapshot,
    /// Cell the search starts from.
    pub start: CellCoord,
    /// Cell the search tries to reach.
    pub goal: CellCoord,
}

/// Record shared by the player and the pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entity {
    cell: CellCoord,
    active: bool,
}

impl Entity {
    /// Creates an active entity standing on `cell`.
    #[must_use]
    pub const fn active_at(cell: CellCoord) -> Self {
        Self { cell, active: true }
    }

    /// Creates an inactive entity parked on `cell` until it is activated.
    #[must_use]
    pub const fn dormant(cell: CellCoord) -> Self {
        Self {
            cell,
            active: false,
        }
    }

    /// Reports whether the entity takes part in the game.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Cell occupied by the entity, or `None` while it is off the grid.
    #[must_use]
    pub const fn position(&self) -> Option<CellCoord> {
        if self.active {
            Some(self.cell)
        } else {
            None
        }
    }

    /// Marks the entity as active.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Moves the entity to `cell`.
    pub fn move_to(&mut self, cell: CellCoord) {
        self.cell = cell;
    }
}

/// Tunable rules for a single game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    activation_turn: u32,
}

impl GameConfig {
    /// Creates a configuration whose pursuer wakes up on `activation_turn`.
    pub fn new(activation_turn: u32) -> Result<Self, ConfigError> {
        if activation_turn == 0 {
            return Err(ConfigError::ZeroActivationTurn);
        }

        Ok(Self { activation_turn })
    }

    /// Turn on which the pursuer activates.
    #[must_use]
    pub const fn activation_turn(&self) -> Turn {
        Turn::new(self.activation_turn)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            activation_turn: DEFAULT_ACTIVATION_TURN,
        }
    }
}

/// Reasons a [`GameConfig`] may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The pursuer needs at least one recorded move to replay.
    #[error("pursuer activation turn must be at least 1")]
    ZeroActivationTurn,
}
