//! Glue between frame input, the world and the hint system.

use maze_escape_core::{
    alternating_wall_open_at, CellCoord, CellKind, Command, Event, GameStatus, MoveRejection,
};
use maze_escape_rendering::{FrameInput, RenderingError, Scene, SceneCell};
use maze_escape_system_pathfinding::Hint;
use maze_escape_world::{self as world, query, World};

/// Running game together with its presentation-only state.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    hint: Hint,
    message: Option<String>,
}

impl Session {
    /// Wraps a freshly created world.
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            hint: Hint::default(),
            message: None,
        }
    }

    /// Read-only access to the wrapped world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies a frame of input to the world and refreshes the hint.
    pub(crate) fn handle(&mut self, input: FrameInput) {
        let mut events = Vec::new();
        if input.restart {
            world::apply(&mut self.world, Command::Restart, &mut events);
        }
        if let Some(direction) = input.direction {
            world::apply(
                &mut self.world,
                Command::AttemptMove { direction },
                &mut events,
            );
        }

        let world = &self.world;
        self.hint
            .handle(&events, input.toggle_hint, || query::path_query(world));

        if input.toggle_hint {
            self.message = Some(self.hint_message());
        }
        if let Some(message) = describe(&events) {
            self.message = Some(message);
        }
    }

    /// Builds a scene describing the current world.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let (rows, columns) = query::dimensions(&self.world);
        let mut scene = Scene::new(
            rows,
            columns,
            self.cells(),
            query::start(&self.world),
            query::goal(&self.world),
        )?;
        self.populate(&mut scene);
        Ok(scene)
    }

    /// Refreshes every mutable channel of an existing scene.
    pub(crate) fn populate(&self, scene: &mut Scene) {
        scene.cells = self.cells();
        scene.player = query::player(&self.world)
            .position()
            .unwrap_or_else(|| query::start(&self.world));
        scene.pursuer = query::pursuer(&self.world).position();
        scene.goal = query::goal(&self.world);
        scene.hint = self.hint.path().to_vec();
        scene.turn = query::turn(&self.world);
        scene.status = query::status(&self.world);
        scene.message = self.message.clone();
    }

    fn cells(&self) -> Vec<SceneCell> {
        let (rows, columns) = query::dimensions(&self.world);
        let open_next_turn = alternating_wall_open_at(query::turn(&self.world).next());

        (0..rows)
            .flat_map(|row| (0..columns).map(move |column| CellCoord::new(row, column)))
            .map(|cell| {
                let kind = query::cell_kind(&self.world, cell).unwrap_or(CellKind::Wall);
                let turns_remaining = match kind {
                    CellKind::DynamicWall => query::turns_remaining(&self.world, cell),
                    _ => None,
                };
                let open = match kind {
                    CellKind::Path => true,
                    CellKind::Wall | CellKind::DynamicWall => false,
                    CellKind::AlternatingWall => open_next_turn,
                };
                SceneCell::new(kind, turns_remaining, open)
            })
            .collect()
    }

    fn hint_message(&self) -> String {
        if !self.hint.is_visible() {
            String::from("hint hidden")
        } else if self.hint.path().is_empty() {
            String::from("no path to the exit from here")
        } else {
            format!("hint: {} moves to the exit", self.hint.path().len() - 1)
        }
    }
}

fn describe(events: &[Event]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        Event::StatusChanged {
            status: GameStatus::Won,
        } => Some(String::from("You escaped the maze!")),
        Event::StatusChanged {
            status: GameStatus::Lost,
        } => Some(String::from("Your clone caught you.")),
        Event::PursuerActivated { .. } => Some(String::from("Your clone has appeared.")),
        Event::MoveRejected { reason, .. } => Some(String::from(match reason {
            MoveRejection::OutOfBounds => "You cannot leave the maze.",
            MoveRejection::Blocked => "That way is blocked.",
            MoveRejection::PursuerOccupied => "Your clone is standing there.",
            MoveRejection::GameOver => "The game is over; press r to restart.",
        })),
        Event::GameRestarted => Some(String::from("Back to the start.")),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::{Direction, GameConfig, MazeLayout};

    fn session() -> Session {
        let layout = MazeLayout::new(
            vec![vec![
                CellKind::Path,
                CellKind::Path,
                CellKind::AlternatingWall,
                CellKind::Path,
            ]],
            Vec::new(),
            CellCoord::new(0, 0),
            CellCoord::new(0, 3),
        );
        Session::new(World::new(&layout, GameConfig::default()).expect("valid layout"))
    }

    fn step(direction: Direction) -> FrameInput {
        FrameInput {
            direction: Some(direction),
            ..FrameInput::default()
        }
    }

    #[test]
    fn scene_mirrors_world() {
        let mut session = session();
        session.handle(step(Direction::Right));
        let scene = session.scene().expect("scene matches dimensions");

        assert_eq!(scene.player, CellCoord::new(0, 1));
        assert_eq!(scene.turn.get(), 1);
        assert_eq!(scene.pursuer, None);
        assert_eq!(
            scene.cell(CellCoord::new(0, 2)).map(|cell| cell.open_next_turn),
            Some(true)
        );
    }

    #[test]
    fn rejected_move_sets_message() {
        let mut session = session();
        session.handle(step(Direction::Left));
        assert_eq!(
            session.message.as_deref(),
            Some("You cannot leave the maze.")
        );
    }

    #[test]
    fn hint_toggle_reports_length() {
        let mut session = session();
        session.handle(FrameInput {
            toggle_hint: true,
            ..FrameInput::default()
        });

        let scene = session.scene().expect("scene matches dimensions");
        assert_eq!(scene.hint.len(), 4);
        assert_eq!(scene.message.as_deref(), Some("hint: 3 moves to the exit"));
    }

    #[test]
    fn winning_and_restarting() {
        let mut session = session();
        for _ in 0..3 {
            session.handle(step(Direction::Right));
        }
        assert_eq!(query::status(session.world()), GameStatus::Won);
        assert_eq!(session.message.as_deref(), Some("You escaped the maze!"));

        session.handle(FrameInput {
            restart: true,
            ..FrameInput::default()
        });
        assert_eq!(query::status(session.world()), GameStatus::Playing);
        assert_eq!(session.message.as_deref(), Some("Back to the start."));
    }
}
