//! Plain-text maze file parser.
//!
//! One grid row per line. Digits select the terrain (`0` path, `1` wall,
//! `2` alternating wall, `3` dynamic wall), `S` and `E` mark the start and
//! goal on path cells. Spaces and carriage returns are ignored, blank lines
//! are skipped and any other character is read as a path. Rows shorter than
//! the widest one are padded with walls.

use maze_escape_core::{CellCoord, CellKind, DynamicWallTimer, MazeLayout};
use thiserror::Error;
use tracing::warn;

/// Maze bundled with the binary and used when no file is given.
pub(crate) const DEFAULT_MAZE: &str = include_str!("../mazes/default.txt");

/// Reasons a maze file cannot be turned into a layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum MazeFileError {
    /// The file contains no grid rows.
    #[error("maze file contains no rows")]
    Empty,
    /// The grid is too large to be addressed with 32-bit coordinates.
    #[error("maze file exceeds the supported dimensions")]
    TooLarge,
}

/// Parses maze text into a layout, arming every dynamic wall with `dynamic_wall_turns`.
///
/// The start defaults to the top-left cell and the goal to the bottom-right
/// cell when the file does not mark them.
pub(crate) fn parse_maze(text: &str, dynamic_wall_turns: u32) -> Result<MazeLayout, MazeFileError> {
    let lines: Vec<Vec<char>> = text
        .lines()
        .map(|line| {
            line.chars()
                .filter(|symbol| *symbol != ' ' && *symbol != '\r')
                .collect::<Vec<_>>()
        })
        .filter(|symbols| !symbols.is_empty())
        .collect();

    let width = lines.iter().map(Vec::len).max().ok_or(MazeFileError::Empty)?;
    let rows = u32::try_from(lines.len()).map_err(|_| MazeFileError::TooLarge)?;
    let columns = u32::try_from(width).map_err(|_| MazeFileError::TooLarge)?;

    let mut grid = Vec::with_capacity(lines.len());
    let mut timers = Vec::new();
    let mut start = None;
    let mut goal = None;

    for (row, symbols) in (0..rows).zip(&lines) {
        let mut cells = Vec::with_capacity(width);
        for (column, symbol) in (0..columns).zip(symbols.iter().copied()) {
            let cell = CellCoord::new(row, column);
            let kind = match symbol {
                '1' => CellKind::Wall,
                '2' => CellKind::AlternatingWall,
                '3' => {
                    timers.push(DynamicWallTimer::new(cell, dynamic_wall_turns));
                    CellKind::DynamicWall
                }
                'S' => {
                    mark(&mut start, cell, "start");
                    CellKind::Path
                }
                'E' => {
                    mark(&mut goal, cell, "goal");
                    CellKind::Path
                }
                _ => CellKind::Path,
            };
            cells.push(kind);
        }
        cells.resize(width, CellKind::Wall);
        grid.push(cells);
    }

    let start = start.unwrap_or(CellCoord::new(0, 0));
    let goal = goal.unwrap_or(CellCoord::new(rows.saturating_sub(1), columns.saturating_sub(1)));
    Ok(MazeLayout::new(grid, timers, start, goal))
}

fn mark(slot: &mut Option<CellCoord>, cell: CellCoord, name: &str) {
    if let Some(previous) = slot.replace(cell) {
        warn!(
            marker = name,
            ignored_row = previous.row(),
            ignored_column = previous.column(),
            "maze file marks more than one cell; keeping the last"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::CellKind::{AlternatingWall as A, DynamicWall as D, Path as P, Wall as W};

    #[test]
    fn parses_digits_and_markers() {
        let layout = parse_maze("S012\n3 1 0E\n", 3).expect("valid maze");

        assert_eq!(layout.grid(), &[vec![P, P, W, A], vec![D, W, P, P]]);
        assert_eq!(layout.start(), CellCoord::new(0, 0));
        assert_eq!(layout.goal(), CellCoord::new(1, 3));
        assert_eq!(
            layout.timers(),
            &[DynamicWallTimer::new(CellCoord::new(1, 0), 3)]
        );
    }

    #[test]
    fn pads_short_rows_with_walls() {
        let layout = parse_maze("000\n0\n00\n", 3).expect("valid maze");

        assert_eq!(
            layout.grid(),
            &[vec![P, P, P], vec![P, W, W], vec![P, P, W]]
        );
    }

    #[test]
    fn skips_blank_lines_and_carriage_returns() {
        let layout = parse_maze("\r\n01\r\n\n  \n10\r\n", 3).expect("valid maze");

        assert_eq!(layout.grid(), &[vec![P, W], vec![W, P]]);
    }

    #[test]
    fn unknown_symbols_are_paths() {
        let layout = parse_maze("x9#", 3).expect("valid maze");
        assert_eq!(layout.grid(), &[vec![P, P, P]]);
    }

    #[test]
    fn defaults_start_and_goal_to_corners() {
        let layout = parse_maze("00\n00\n01\n", 3).expect("valid maze");

        assert_eq!(layout.start(), CellCoord::new(0, 0));
        assert_eq!(layout.goal(), CellCoord::new(2, 1));
    }

    #[test]
    fn later_marker_wins() {
        let layout = parse_maze("S0S\n", 3).expect("valid maze");
        assert_eq!(layout.start(), CellCoord::new(0, 2));
    }

    #[test]
    fn dynamic_wall_turns_are_configurable() {
        let layout = parse_maze("03", 7).expect("valid maze");
        assert_eq!(layout.timers()[0].turns_remaining(), 7);
    }

    #[test]
    fn empty_file_is_rejected() {
        assert_eq!(parse_maze("", 3).unwrap_err(), MazeFileError::Empty);
        assert_eq!(parse_maze(" \n\r\n", 3).unwrap_err(), MazeFileError::Empty);
    }

    #[test]
    fn bundled_maze_parses() {
        let layout = parse_maze(DEFAULT_MAZE, 3).expect("bundled maze is valid");
        assert_eq!(layout.grid().len(), 7);
        assert_eq!(layout.start(), CellCoord::new(0, 0));
        assert_eq!(layout.goal(), CellCoord::new(6, 9));
    }
}
