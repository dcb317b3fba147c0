#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Temporal breadth-first pathfinding and the on-demand hint system.
//!
//! The search runs over a frozen [`MazeSnapshot`]. Whether a cell can be
//! entered depends on the absolute turn at which the path would reach it, so
//! each frontier entry carries its arrival turn alongside the cell.

use std::collections::{HashMap, VecDeque};

use maze_escape_core::{
    alternating_wall_open_at, dynamic_wall_open, CellCoord, CellKind, Event, MazeSnapshot,
    PathQuery, Turn,
};
use tracing::trace;

/// Finds a shortest sequence of cells leading from `start` to `goal`.
///
/// The returned path begins with `start` and ends with `goal`. It may revisit
/// cells when stepping back and forth is the only way to wait for a wall to
/// open. An empty path means the start or goal lies outside the maze, the
/// start cannot be stood on at the snapshot's turn, or the goal is unreachable.
#[must_use]
pub fn find_path(maze: &MazeSnapshot, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
    let (rows, columns) = maze.dimensions();
    let search_turn = maze.turn();

    let (Some(start_index), Some(goal_index)) = (maze.index(start), maze.index(goal)) else {
        trace!(?start, ?goal, "path endpoints outside maze");
        return Vec::new();
    };

    let field = TemporalField::new(maze);
    if !field.enterable(start_index, search_turn) {
        trace!(?start, turn = search_turn.get(), "path start is not walkable");
        return Vec::new();
    }

    if start_index == goal_index {
        return vec![start];
    }

    let phases = field.phases();
    let start_state = start_index * phases;
    let mut predecessors = HashMap::from([(start_state, start_state)]);
    let mut queue = VecDeque::new();
    queue.push_back((start, 0_u32));

    while let Some((cell, elapsed)) = queue.pop_front() {
        let Some(current_index) = maze.index(cell) else {
            continue;
        };
        let current_state = current_index * phases + field.phase(elapsed);
        let elapsed = elapsed.saturating_add(1);
        let arrival = Turn::new(search_turn.get().saturating_add(elapsed));
        let phase = field.phase(elapsed);

        for neighbor in cell.neighbors(rows, columns) {
            let Some(neighbor_index) = maze.index(neighbor) else {
                continue;
            };
            let state = neighbor_index * phases + phase;

            if predecessors.contains_key(&state) || !field.enterable(neighbor_index, arrival) {
                continue;
            }
            let _ = predecessors.insert(state, current_state);

            if neighbor_index == goal_index {
                let path = reconstruct(maze, &predecessors, phases, start_state, state);
                trace!(
                    ?start,
                    ?goal,
                    turn = search_turn.get(),
                    length = path.len(),
                    "path found"
                );
                return path;
            }

            queue.push_back((neighbor, elapsed));
        }
    }

    trace!(?start, ?goal, turn = search_turn.get(), "goal unreachable");
    Vec::new()
}

/// Walkability oracle over a snapshot with countdowns indexed by cell.
///
/// Search states are keyed by cell and phase. The phase is the number of
/// elapsed turns until every countdown has run out; past that horizon only
/// the parity of the arrival turn still changes what can be entered.
#[derive(Debug)]
struct TemporalField<'a> {
    maze: &'a MazeSnapshot,
    countdowns: Vec<Option<u32>>,
    horizon: u32,
}

impl<'a> TemporalField<'a> {
    fn new(maze: &'a MazeSnapshot) -> Self {
        let mut countdowns = vec![None; maze.cells().len()];
        for timer in maze.timers() {
            if let Some(slot) = maze
                .index(timer.cell())
                .and_then(|index| countdowns.get_mut(index))
            {
                *slot = Some(timer.turns_remaining());
            }
        }
        let horizon = countdowns.iter().flatten().copied().max().unwrap_or(0);

        Self {
            maze,
            countdowns,
            horizon,
        }
    }

    fn phases(&self) -> usize {
        usize::try_from(self.horizon)
            .unwrap_or(usize::MAX)
            .saturating_add(3)
    }

    fn phase(&self, elapsed: u32) -> usize {
        let folded = if elapsed <= self.horizon {
            elapsed
        } else {
            self.horizon + 1 + (elapsed - self.horizon - 1) % 2
        };
        usize::try_from(folded).unwrap_or(usize::MAX)
    }

    fn enterable(&self, index: usize, arrival: Turn) -> bool {
        let Some(kind) = self.maze.cells().get(index) else {
            return false;
        };

        match kind {
            CellKind::Path => true,
            CellKind::Wall => false,
            CellKind::AlternatingWall => alternating_wall_open_at(arrival),
            CellKind::DynamicWall => self
                .countdowns
                .get(index)
                .copied()
                .flatten()
                .is_some_and(|remaining| {
                    dynamic_wall_open(remaining, arrival.since(self.maze.turn()))
                }),
        }
    }
}

fn reconstruct(
    maze: &MazeSnapshot,
    predecessors: &HashMap<usize, usize>,
    phases: usize,
    start_state: usize,
    goal_state: usize,
) -> Vec<CellCoord> {
    let (_, columns) = maze.dimensions();
    let Ok(width) = usize::try_from(columns) else {
        return Vec::new();
    };

    let mut states = vec![goal_state];
    let mut current = goal_state;
    while current != start_state {
        let Some(&previous) = predecessors.get(&current) else {
            return Vec::new();
        };
        states.push(previous);
        current = previous;
    }

    states
        .into_iter()
        .rev()
        .filter_map(|state| {
            let index = state / phases;
            let row = u32::try_from(index / width).ok()?;
            let column = u32::try_from(index % width).ok()?;
            Some(CellCoord::new(row, column))
        })
        .collect()
}

/// Pure system that keeps the hint path in step with the world.
///
/// The hint starts hidden. While visible it recomputes the path whenever the
/// world reports a change that can invalidate it.
#[derive(Debug, Default)]
pub struct Hint {
    visible: bool,
    stale: bool,
    path: Vec<CellCoord>,
}

impl Hint {
    /// Consumes world events and the toggle request, refreshing the path when needed.
    ///
    /// `query` is only invoked when a recomputation is required.
    pub fn handle<F>(&mut self, events: &[Event], toggle: bool, query: F)
    where
        F: FnOnce() -> PathQuery,
    {
        if toggle {
            self.visible = !self.visible;
            self.stale = true;
        }

        if events.iter().any(invalidates_path) {
            self.stale = true;
        }

        if !self.visible {
            self.path.clear();
            return;
        }

        if self.stale {
            let request = query();
            self.path = find_path(&request.maze, request.start, request.goal);
            self.stale = false;
        }
    }

    /// Reports whether the hint is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Cached hint path; empty while hidden or when no path exists.
    ///
    /// The search counts a dynamic wall as open on the move that uses up its
    /// countdown, one turn before the live move check admits it.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }
}

fn invalidates_path(event: &Event) -> bool {
    matches!(
        event,
        Event::PlayerMoved { .. }
            | Event::DynamicWallOpened { .. }
            | Event::PursuerActivated { .. }
            | Event::GameRestarted
    )
}
