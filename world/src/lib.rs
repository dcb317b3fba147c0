#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Escape.
//!
//! The world owns the maze, the turn counter, the player's movement history
//! and the pursuer. Adapters mutate it exclusively through [`apply`] and read
//! it through the [`query`] module.

mod maze;
mod pursuer;
mod turn;

pub use maze::{MazeError, MazeModel};
pub use pursuer::PursuerReplay;
pub use turn::TurnEngine;

use maze_escape_core::{
    CellCoord, CellKind, Command, Direction, Entity, Event, GameConfig, GameStatus, MazeLayout,
    MoveRejection, WELCOME_BANNER,
};
use tracing::{debug, info};

/// Represents the authoritative Maze Escape world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    initial_maze: MazeModel,
    start: CellCoord,
    goal: CellCoord,
    maze: MazeModel,
    turns: TurnEngine,
    player: Entity,
    history: Vec<CellCoord>,
    pursuer: PursuerReplay,
    status: GameStatus,
}

impl World {
    /// Creates a world from a loaded layout.
    ///
    /// Malformed layouts are rejected without building any state. A start
    /// cell that is a wall is replaced by the first path cell in row-major
    /// order.
    pub fn new(layout: &MazeLayout, config: GameConfig) -> Result<Self, MazeError> {
        let maze = MazeModel::new(layout.grid(), layout.timers())?;

        let goal = layout.goal();
        if !maze.contains(goal) {
            return Err(MazeError::GoalOutOfBounds { cell: goal });
        }

        let start = resolve_start(&maze, layout.start())?;

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            initial_maze: maze.clone(),
            start,
            goal,
            maze,
            turns: TurnEngine::new(),
            player: Entity::active_at(start),
            history: Vec::new(),
            pursuer: PursuerReplay::new(config.activation_turn(), start),
            status: GameStatus::Playing,
        })
    }

    fn player_cell(&self) -> CellCoord {
        self.player.position().unwrap_or(self.start)
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.maze = self.initial_maze.clone();
        self.turns = TurnEngine::new();
        self.player = Entity::active_at(self.start);
        self.history.clear();
        self.pursuer = PursuerReplay::new(self.config.activation_turn(), self.start);
        self.status = GameStatus::Playing;
        info!("game restarted");
        out_events.push(Event::GameRestarted);
    }

    fn attempt_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.status.is_terminal() {
            reject(direction, MoveRejection::GameOver, out_events);
            return;
        }

        let from = self.player_cell();
        let (rows, columns) = self.maze.dimensions();
        let Some(target) = from.step(direction, rows, columns) else {
            reject(direction, MoveRejection::OutOfBounds, out_events);
            return;
        };

        let pursuer_cell = self.pursuer.position();
        let blocked: Vec<CellCoord> = pursuer_cell.into_iter().collect();
        if !self
            .maze
            .is_walkable(target, self.turns.upcoming(), &blocked)
        {
            let reason = if pursuer_cell == Some(target) {
                MoveRejection::PursuerOccupied
            } else {
                MoveRejection::Blocked
            };
            reject(direction, reason, out_events);
            return;
        }

        self.player.move_to(target);
        self.history.push(target);
        let (turn, opened) = self.turns.commit_move(&mut self.maze);
        debug!(
            from_row = from.row(),
            from_column = from.column(),
            to_row = target.row(),
            to_column = target.column(),
            turn = turn.get(),
            "player moved"
        );
        out_events.push(Event::PlayerMoved {
            from,
            to: target,
            turn,
        });
        out_events.push(Event::TurnAdvanced { turn });
        out_events.extend(
            opened
                .into_iter()
                .map(|cell| Event::DynamicWallOpened { cell }),
        );

        self.advance_pursuer(out_events);
        self.evaluate_status(out_events);
    }

    fn advance_pursuer(&mut self, out_events: &mut Vec<Event>) {
        let turn = self.turns.current();
        let before = self.pursuer.position();

        if !self.pursuer.is_active() && self.pursuer.due(turn) {
            self.pursuer.activate();
        }
        self.pursuer.update(&self.history, turn);

        match (before, self.pursuer.position()) {
            (None, Some(cell)) => {
                info!(
                    row = cell.row(),
                    column = cell.column(),
                    turn = turn.get(),
                    "pursuer activated"
                );
                out_events.push(Event::PursuerActivated { cell });
            }
            (Some(from), Some(to)) if from != to => {
                out_events.push(Event::PursuerMoved { from, to });
            }
            _ => {}
        }
    }

    fn evaluate_status(&mut self, out_events: &mut Vec<Event>) {
        let player = self.player_cell();
        let status = if self.pursuer.position() == Some(player) {
            GameStatus::Lost
        } else if player == self.goal {
            GameStatus::Won
        } else {
            return;
        };

        self.status = status;
        info!(?status, turn = self.turns.current().get(), "game finished");
        out_events.push(Event::StatusChanged { status });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AttemptMove { direction } => world.attempt_move(direction, out_events),
        Command::Restart => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_escape_core::{
        CellCoord, CellKind, Entity, GameConfig, GameStatus, MazeSnapshot, PathQuery, Turn,
    };

    use super::{MazeError, MazeModel, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn config(world: &World) -> GameConfig {
        world.config
    }

    /// Provides read-only access to the live maze.
    #[must_use]
    pub fn maze(world: &World) -> &MazeModel {
        &world.maze
    }

    /// Provides the dimensions of the grid as `(rows, columns)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.maze.dimensions()
    }

    /// Kind of terrain currently stored at `cell`.
    pub fn cell_kind(world: &World, cell: CellCoord) -> Result<CellKind, MazeError> {
        world.maze.cell_kind(cell)
    }

    /// Turns left before the dynamic wall at `cell` opens, if it has a timer.
    #[must_use]
    pub fn turns_remaining(world: &World, cell: CellCoord) -> Option<u32> {
        world.maze.turns_remaining(cell)
    }

    /// Player entity; always active.
    #[must_use]
    pub fn player(world: &World) -> &Entity {
        &world.player
    }

    /// Pursuer entity; reports no position until activated.
    #[must_use]
    pub fn pursuer(world: &World) -> &Entity {
        world.pursuer.entity()
    }

    /// Cells the player entered, one per committed move.
    #[must_use]
    pub fn history(world: &World) -> &[CellCoord] {
        &world.history
    }

    /// Turn reached so far.
    #[must_use]
    pub fn turn(world: &World) -> Turn {
        world.turns.current()
    }

    /// Current game status.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Cell the player starts on.
    #[must_use]
    pub fn start(world: &World) -> CellCoord {
        world.start
    }

    /// Cell the player must reach.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.goal
    }

    /// Owned copy of the maze frozen at the current turn.
    #[must_use]
    pub fn maze_snapshot(world: &World) -> MazeSnapshot {
        world.maze.snapshot(world.turns.current())
    }

    /// Hint request from the player's cell to the goal.
    #[must_use]
    pub fn path_query(world: &World) -> PathQuery {
        PathQuery {
            maze: maze_snapshot(world),
            start: world.player_cell(),
            goal: world.goal,
        }
    }
}

fn reject(direction: Direction, reason: MoveRejection, out_events: &mut Vec<Event>) {
    debug!(?direction, ?reason, "move rejected");
    out_events.push(Event::MoveRejected { direction, reason });
}

fn resolve_start(maze: &MazeModel, requested: CellCoord) -> Result<CellCoord, MazeError> {
    let kind = maze
        .cell_kind(requested)
        .map_err(|_| MazeError::StartOutOfBounds { cell: requested })?;
    if kind != CellKind::Wall {
        return Ok(requested);
    }

    let relocated = maze.first_path_cell().ok_or(MazeError::NoWalkableStart)?;
    info!(
        requested_row = requested.row(),
        requested_column = requested.column(),
        row = relocated.row(),
        column = relocated.column(),
        "start cell is a wall; relocating player"
    );
    Ok(relocated)
}
