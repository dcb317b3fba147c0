//! Static grid storage and dynamic wall countdowns.

use maze_escape_core::{
    alternating_wall_open_at, dynamic_wall_open, CellCoord, CellKind, DynamicWallTimer,
    MazeSnapshot, Turn,
};
use thiserror::Error;
use tracing::{info, warn};

/// Reasons a maze cannot be constructed or queried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The grid has no rows or its first row has no cells.
    #[error("maze grid contains no cells")]
    EmptyGrid,
    /// A row's length differs from the first row's length.
    #[error("row {row} has {found} cells but the first row has {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells in the first row.
        expected: usize,
        /// Number of cells in the offending row.
        found: usize,
    },
    /// The grid is too large to be addressed with 32-bit coordinates.
    #[error("maze grid exceeds the supported dimensions")]
    TooLarge,
    /// A query addressed a cell outside the grid.
    #[error("cell {cell:?} lies outside the grid")]
    OutOfBounds {
        /// Requested cell.
        cell: CellCoord,
    },
    /// A countdown was supplied for a cell outside the grid.
    #[error("dynamic wall timer at {cell:?} lies outside the grid")]
    TimerOutOfBounds {
        /// Cell named by the countdown.
        cell: CellCoord,
    },
    /// A countdown was supplied for a cell that is not a dynamic wall.
    #[error("dynamic wall timer at {cell:?} targets a {kind:?} cell")]
    TimerOnStaticCell {
        /// Cell named by the countdown.
        cell: CellCoord,
        /// Kind stored in the grid at that cell.
        kind: CellKind,
    },
    /// Two countdowns were supplied for the same cell.
    #[error("dynamic wall at {cell:?} has more than one timer")]
    DuplicateTimer {
        /// Cell named by both countdowns.
        cell: CellCoord,
    },
    /// The start cell lies outside the grid.
    #[error("start cell {cell:?} lies outside the grid")]
    StartOutOfBounds {
        /// Requested start cell.
        cell: CellCoord,
    },
    /// The goal cell lies outside the grid.
    #[error("goal cell {cell:?} lies outside the grid")]
    GoalOutOfBounds {
        /// Requested goal cell.
        cell: CellCoord,
    },
    /// The start cell is a wall and no path cell exists to fall back to.
    #[error("maze has no path cell the player could start on")]
    NoWalkableStart,
}

/// Grid of cell kinds plus the countdowns of its dynamic walls.
///
/// Cells are stored densely in row-major order. The only mutation after
/// construction is [`MazeModel::advance_turn`], which decays countdowns and
/// rewrites opened walls to [`CellKind::Path`].
#[derive(Clone, Debug)]
pub struct MazeModel {
    rows: u32,
    columns: u32,
    cells: Vec<CellKind>,
    timers: Vec<DynamicWallTimer>,
    advanced_to: Turn,
}

impl MazeModel {
    /// Builds a maze from rows of cells and the countdowns of its dynamic walls.
    ///
    /// Countdowns that already read zero open their cell immediately.
    pub fn new(grid: &[Vec<CellKind>], timers: &[DynamicWallTimer]) -> Result<Self, MazeError> {
        let expected = grid.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(MazeError::EmptyGrid);
        }

        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != expected {
                return Err(MazeError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }

        let rows = u32::try_from(grid.len()).map_err(|_| MazeError::TooLarge)?;
        let columns = u32::try_from(expected).map_err(|_| MazeError::TooLarge)?;
        let mut maze = Self {
            rows,
            columns,
            cells: grid.iter().flatten().copied().collect(),
            timers: Vec::with_capacity(timers.len()),
            advanced_to: Turn::ZERO,
        };

        for timer in timers {
            let cell = timer.cell();
            let kind = maze
                .kind_at(cell)
                .ok_or(MazeError::TimerOutOfBounds { cell })?;
            if kind != CellKind::DynamicWall {
                return Err(MazeError::TimerOnStaticCell { cell, kind });
            }
            if maze.timer(cell).is_some() {
                return Err(MazeError::DuplicateTimer { cell });
            }
            if timer.is_open() {
                maze.open(cell);
            }
            maze.timers.push(*timer);
        }

        Ok(maze)
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Provides the dimensions of the grid as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.within(self.rows, self.columns)
    }

    /// Kind of terrain stored at `cell`.
    pub fn cell_kind(&self, cell: CellCoord) -> Result<CellKind, MazeError> {
        self.kind_at(cell).ok_or(MazeError::OutOfBounds { cell })
    }

    /// Countdowns for every dynamic wall, including the ones already open.
    #[must_use]
    pub fn timers(&self) -> &[DynamicWallTimer] {
        &self.timers
    }

    /// Turns left before the dynamic wall at `cell` opens, if it has a timer.
    #[must_use]
    pub fn turns_remaining(&self, cell: CellCoord) -> Option<u32> {
        self.timer(cell).map(DynamicWallTimer::turns_remaining)
    }

    /// Reports whether the player may enter `cell` on `turn_at_entry`.
    ///
    /// Cells listed in `blocked` are refused regardless of their kind. A
    /// dynamic wall without a countdown is treated as permanently closed.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord, turn_at_entry: Turn, blocked: &[CellCoord]) -> bool {
        if blocked.contains(&cell) {
            return false;
        }

        let Some(kind) = self.kind_at(cell) else {
            return false;
        };

        match kind {
            CellKind::Path => true,
            CellKind::Wall => false,
            CellKind::AlternatingWall => alternating_wall_open_at(turn_at_entry),
            CellKind::DynamicWall => match self.timer(cell) {
                Some(timer) => dynamic_wall_open(timer.turns_remaining(), 0),
                None => {
                    warn!(
                        row = cell.row(),
                        column = cell.column(),
                        "dynamic wall has no countdown; treating it as closed"
                    );
                    false
                }
            },
        }
    }

    /// Decays every armed countdown by one turn.
    ///
    /// Walls whose countdown reaches zero are rewritten to [`CellKind::Path`]
    /// and returned. Repeating a call for a turn that was already applied is
    /// a no-op.
    pub fn advance_turn(&mut self, new_turn: Turn) -> Vec<CellCoord> {
        if new_turn <= self.advanced_to {
            return Vec::new();
        }
        self.advanced_to = new_turn;

        let mut opened = Vec::new();
        for timer in &mut self.timers {
            if timer.tick() {
                opened.push(timer.cell());
            }
        }

        for &cell in &opened {
            self.open(cell);
            info!(
                row = cell.row(),
                column = cell.column(),
                turn = new_turn.get(),
                "dynamic wall opened"
            );
        }

        opened
    }

    /// Captures an owned copy of the grid and countdowns at `turn`.
    #[must_use]
    pub fn snapshot(&self, turn: Turn) -> MazeSnapshot {
        MazeSnapshot::new(
            self.rows,
            self.columns,
            self.cells.clone(),
            self.timers.clone(),
            turn,
        )
    }

    /// First path cell in row-major order, if any.
    #[must_use]
    pub(crate) fn first_path_cell(&self) -> Option<CellCoord> {
        let width = usize::try_from(self.columns).ok()?;
        let index = self
            .cells
            .iter()
            .position(|kind| *kind == CellKind::Path)?;
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        Some(CellCoord::new(row, column))
    }

    fn open(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = CellKind::Path;
            }
        }
    }

    fn timer(&self, cell: CellCoord) -> Option<&DynamicWallTimer> {
        self.timers.iter().find(|timer| timer.cell() == cell)
    }

    fn kind_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::CellKind::{AlternatingWall as A, DynamicWall as D, Path as P, Wall as W};

    fn maze(grid: &[Vec<CellKind>], timers: &[DynamicWallTimer]) -> MazeModel {
        MazeModel::new(grid, timers).expect("valid maze")
    }

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(MazeModel::new(&[], &[]).unwrap_err(), MazeError::EmptyGrid);
        assert_eq!(
            MazeModel::new(&[Vec::new()], &[]).unwrap_err(),
            MazeError::EmptyGrid
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let error = MazeModel::new(&[vec![P, P], vec![P]], &[]).unwrap_err();
        assert_eq!(
            error,
            MazeError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_misplaced_timers() {
        let grid = vec![vec![P, D]];
        let on_path = DynamicWallTimer::new(CellCoord::new(0, 0), 2);
        let off_grid = DynamicWallTimer::new(CellCoord::new(4, 4), 2);
        let valid = DynamicWallTimer::new(CellCoord::new(0, 1), 2);

        assert!(matches!(
            MazeModel::new(&grid, &[on_path]),
            Err(MazeError::TimerOnStaticCell { kind: P, .. })
        ));
        assert!(matches!(
            MazeModel::new(&grid, &[off_grid]),
            Err(MazeError::TimerOutOfBounds { .. })
        ));
        assert!(matches!(
            MazeModel::new(&grid, &[valid, valid]),
            Err(MazeError::DuplicateTimer { .. })
        ));
    }

    #[test]
    fn cell_kind_reports_out_of_bounds() {
        let maze = maze(&[vec![P, W]], &[]);
        assert_eq!(maze.cell_kind(CellCoord::new(0, 1)), Ok(W));
        assert_eq!(
            maze.cell_kind(CellCoord::new(1, 0)),
            Err(MazeError::OutOfBounds {
                cell: CellCoord::new(1, 0)
            })
        );
    }

    #[test]
    fn walkability_follows_cell_kind() {
        let timer = DynamicWallTimer::new(CellCoord::new(0, 3), 2);
        let maze = maze(&[vec![P, W, A, D]], &[timer]);
        let turn = Turn::new(2);

        assert!(maze.is_walkable(CellCoord::new(0, 0), turn, &[]));
        assert!(!maze.is_walkable(CellCoord::new(0, 1), turn, &[]));
        assert!(maze.is_walkable(CellCoord::new(0, 2), turn, &[]));
        assert!(!maze.is_walkable(CellCoord::new(0, 2), Turn::new(3), &[]));
        assert!(!maze.is_walkable(CellCoord::new(0, 3), turn, &[]));
        assert!(!maze.is_walkable(CellCoord::new(0, 4), turn, &[]));
    }

    #[test]
    fn blocked_positions_override_open_cells() {
        let maze = maze(&[vec![P, P]], &[]);
        let pursuer = CellCoord::new(0, 1);
        assert!(!maze.is_walkable(pursuer, Turn::ZERO, &[pursuer]));
        assert!(maze.is_walkable(CellCoord::new(0, 0), Turn::ZERO, &[pursuer]));
    }

    #[test]
    fn dynamic_wall_without_timer_stays_closed() {
        let maze = maze(&[vec![P, D]], &[]);
        for turn in 0..4 {
            assert!(!maze.is_walkable(CellCoord::new(0, 1), Turn::new(turn), &[]));
        }
    }

    #[test]
    fn advance_turn_opens_wall_permanently() {
        let wall = CellCoord::new(1, 1);
        let mut grid = vec![vec![P; 3]; 3];
        grid[1][1] = D;
        let mut maze = maze(&grid, &[DynamicWallTimer::new(wall, 3)]);

        assert!(maze.advance_turn(Turn::new(1)).is_empty());
        assert!(maze.advance_turn(Turn::new(2)).is_empty());
        assert_eq!(maze.cell_kind(wall), Ok(D));
        assert_eq!(maze.advance_turn(Turn::new(3)), vec![wall]);
        assert_eq!(maze.cell_kind(wall), Ok(P));

        for turn in 4..10 {
            assert!(maze.advance_turn(Turn::new(turn)).is_empty());
            assert_eq!(maze.cell_kind(wall), Ok(P));
            assert_eq!(maze.turns_remaining(wall), Some(0));
        }
    }

    #[test]
    fn advance_turn_is_idempotent_per_turn() {
        let wall = CellCoord::new(0, 1);
        let mut maze = maze(&[vec![P, D]], &[DynamicWallTimer::new(wall, 2)]);

        let _ = maze.advance_turn(Turn::new(1));
        let _ = maze.advance_turn(Turn::new(1));
        assert_eq!(maze.turns_remaining(wall), Some(1));
    }

    #[test]
    fn countdowns_never_increase() {
        let timers = [
            DynamicWallTimer::new(CellCoord::new(0, 0), 1),
            DynamicWallTimer::new(CellCoord::new(0, 1), 4),
        ];
        let mut maze = maze(&[vec![D, D]], &timers);
        let mut previous: Vec<u32> = maze.timers().iter().map(|t| t.turns_remaining()).collect();

        for turn in 1..8 {
            let _ = maze.advance_turn(Turn::new(turn));
            let current: Vec<u32> = maze.timers().iter().map(|t| t.turns_remaining()).collect();
            for (before, after) in previous.iter().zip(&current) {
                assert!(after <= before);
            }
            previous = current;
        }
    }

    #[test]
    fn zero_countdown_opens_on_construction() {
        let wall = CellCoord::new(0, 0);
        let maze = maze(&[vec![D]], &[DynamicWallTimer::new(wall, 0)]);
        assert_eq!(maze.cell_kind(wall), Ok(P));
    }

    #[test]
    fn snapshot_is_detached_from_live_timers() {
        let wall = CellCoord::new(0, 1);
        let mut maze = maze(&[vec![P, D]], &[DynamicWallTimer::new(wall, 2)]);
        let snapshot = maze.snapshot(Turn::ZERO);

        let _ = maze.advance_turn(Turn::new(1));
        assert_eq!(snapshot.timers()[0].turns_remaining(), 2);
        assert_eq!(maze.turns_remaining(wall), Some(1));
    }
}
