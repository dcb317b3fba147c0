use maze_escape_core::{
    CellCoord, CellKind, Command, Direction, DynamicWallTimer, Event, GameConfig, GameStatus,
    MazeLayout, MoveRejection, Turn,
};
use maze_escape_world::{self as world, query, World};

fn open_grid(rows: usize, columns: usize) -> Vec<Vec<CellKind>> {
    vec![vec![CellKind::Path; columns]; rows]
}

fn build(
    grid: Vec<Vec<CellKind>>,
    timers: Vec<DynamicWallTimer>,
    start: CellCoord,
    goal: CellCoord,
) -> World {
    World::new(&MazeLayout::new(grid, timers, start, goal), GameConfig::default())
        .expect("layout should be accepted")
}

fn step(world: &mut World, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::AttemptMove { direction }, &mut events);
    events
}

fn rejection(events: &[Event]) -> Option<MoveRejection> {
    events.iter().find_map(|event| match event {
        Event::MoveRejected { reason, .. } => Some(*reason),
        _ => None,
    })
}

#[test]
fn single_cell_maze_rejects_every_direction() {
    let origin = CellCoord::new(0, 0);
    let mut world = build(open_grid(1, 1), Vec::new(), origin, origin);
    assert_eq!(query::status(&world), GameStatus::Playing);

    for direction in Direction::ALL {
        let events = step(&mut world, direction);
        assert_eq!(rejection(&events), Some(MoveRejection::OutOfBounds));
    }

    assert_eq!(query::status(&world), GameStatus::Playing);
    assert_eq!(query::turn(&world), Turn::ZERO);
}

#[test]
fn alternating_wall_refuses_entry_on_odd_turn() {
    let grid = vec![vec![CellKind::Path, CellKind::AlternatingWall]];
    let mut world = build(grid, Vec::new(), CellCoord::new(0, 0), CellCoord::new(0, 1));

    let events = step(&mut world, Direction::Right);

    assert_eq!(rejection(&events), Some(MoveRejection::Blocked));
    assert_eq!(query::turn(&world), Turn::ZERO);
    assert_eq!(query::player(&world).position(), Some(CellCoord::new(0, 0)));
}

#[test]
fn alternating_wall_admits_entry_on_even_turn() {
    let grid = vec![vec![
        CellKind::Path,
        CellKind::Path,
        CellKind::AlternatingWall,
    ]];
    let mut world = build(grid, Vec::new(), CellCoord::new(0, 0), CellCoord::new(0, 2));

    assert_eq!(rejection(&step(&mut world, Direction::Right)), None);
    assert_eq!(rejection(&step(&mut world, Direction::Right)), None);

    assert_eq!(query::player(&world).position(), Some(CellCoord::new(0, 2)));
    assert_eq!(query::turn(&world), Turn::new(2));
    assert_eq!(query::status(&world), GameStatus::Won);
}

#[test]
fn dynamic_wall_opens_after_countdown_and_stays_open() {
    let wall = CellCoord::new(1, 1);
    let mut grid = open_grid(3, 3);
    grid[1][1] = CellKind::DynamicWall;
    let mut world = build(
        grid,
        vec![DynamicWallTimer::new(wall, 3)],
        CellCoord::new(0, 0),
        CellCoord::new(2, 2),
    );

    let _ = step(&mut world, Direction::Right);
    let _ = step(&mut world, Direction::Left);
    assert_eq!(query::cell_kind(&world, wall), Ok(CellKind::DynamicWall));
    assert_eq!(query::turns_remaining(&world, wall), Some(1));

    let events = step(&mut world, Direction::Right);
    assert!(events.contains(&Event::DynamicWallOpened { cell: wall }));
    assert_eq!(query::turn(&world), Turn::new(3));
    assert_eq!(query::cell_kind(&world, wall), Ok(CellKind::Path));

    // (0, 1) is an even row; Vertical leads straight down into the opened wall.
    let events = step(&mut world, Direction::Vertical);
    assert_eq!(rejection(&events), None);
    assert_eq!(query::player(&world).position(), Some(wall));

    for direction in [Direction::Left, Direction::Right, Direction::Left] {
        let _ = step(&mut world, direction);
        assert_eq!(query::cell_kind(&world, wall), Ok(CellKind::Path));
    }
}

#[test]
fn closed_dynamic_wall_refuses_entry() {
    let wall = CellCoord::new(0, 1);
    let grid = vec![vec![CellKind::Path, CellKind::DynamicWall]];
    let mut world = build(
        grid,
        vec![DynamicWallTimer::new(wall, 2)],
        CellCoord::new(0, 0),
        wall,
    );

    assert_eq!(
        rejection(&step(&mut world, Direction::Right)),
        Some(MoveRejection::Blocked)
    );
    assert_eq!(query::turns_remaining(&world, wall), Some(2));
}

#[test]
fn pursuer_activates_on_sixth_move_and_replays_history() {
    let mut world = build(
        open_grid(1, 10),
        Vec::new(),
        CellCoord::new(0, 0),
        CellCoord::new(0, 9),
    );

    for _ in 0..5 {
        let _ = step(&mut world, Direction::Right);
        assert_eq!(query::pursuer(&world).position(), None);
    }

    let events = step(&mut world, Direction::Right);
    let history = query::history(&world).to_vec();
    assert!(events.contains(&Event::PursuerActivated { cell: history[0] }));
    assert_eq!(query::pursuer(&world).position(), Some(history[0]));
    assert_eq!(history[0], CellCoord::new(0, 1));

    let events = step(&mut world, Direction::Right);
    let history = query::history(&world).to_vec();
    assert!(events.contains(&Event::PursuerMoved {
        from: history[0],
        to: history[1],
    }));
    assert_eq!(query::pursuer(&world).position(), Some(history[1]));
    assert_eq!(query::status(&world), GameStatus::Playing);
}

#[test]
fn moving_onto_active_pursuer_is_refused() {
    let mut world = build(
        open_grid(1, 3),
        Vec::new(),
        CellCoord::new(0, 0),
        CellCoord::new(0, 2),
    );

    for direction in [
        Direction::Right,
        Direction::Left,
        Direction::Right,
        Direction::Left,
        Direction::Right,
        Direction::Left,
    ] {
        assert_eq!(rejection(&step(&mut world, direction)), None);
    }
    assert_eq!(query::pursuer(&world).position(), Some(CellCoord::new(0, 1)));
    assert_eq!(query::player(&world).position(), Some(CellCoord::new(0, 0)));

    let events = step(&mut world, Direction::Right);

    assert_eq!(rejection(&events), Some(MoveRejection::PursuerOccupied));
    assert_eq!(query::turn(&world), Turn::new(6));
    assert_eq!(query::history(&world).len(), 6);
    assert_eq!(query::status(&world), GameStatus::Playing);
}

#[test]
fn pursuer_landing_on_player_loses_game() {
    let mut world = build(
        open_grid(3, 3),
        Vec::new(),
        CellCoord::new(1, 0),
        CellCoord::new(0, 2),
    );

    // Triangle (1,0) -> (2,0) -> (2,1) -> (1,0), then back and forth so the
    // sixth move lands where the first one did.
    for direction in [
        Direction::SlantLeft,
        Direction::Right,
        Direction::SlantLeft,
        Direction::SlantLeft,
        Direction::Right,
    ] {
        assert_eq!(rejection(&step(&mut world, direction)), None);
    }

    let events = step(&mut world, Direction::Left);

    assert_eq!(query::player(&world).position(), Some(CellCoord::new(2, 0)));
    assert_eq!(query::pursuer(&world).position(), Some(CellCoord::new(2, 0)));
    assert_eq!(query::status(&world), GameStatus::Lost);
    assert_eq!(
        events.last(),
        Some(&Event::StatusChanged {
            status: GameStatus::Lost
        })
    );
}

#[test]
fn custom_activation_turn_shifts_replay() {
    let layout = MazeLayout::new(
        open_grid(1, 6),
        Vec::new(),
        CellCoord::new(0, 0),
        CellCoord::new(0, 5),
    );
    let config = GameConfig::new(2).expect("valid config");
    let mut world = World::new(&layout, config).expect("layout should be accepted");

    let _ = step(&mut world, Direction::Right);
    assert_eq!(query::pursuer(&world).position(), None);
    let _ = step(&mut world, Direction::Right);
    assert_eq!(query::pursuer(&world).position(), Some(CellCoord::new(0, 1)));
    let _ = step(&mut world, Direction::Right);
    assert_eq!(query::pursuer(&world).position(), Some(CellCoord::new(0, 2)));
}

#[test]
fn ragged_layout_is_rejected() {
    let layout = MazeLayout::new(
        vec![vec![CellKind::Path; 3], vec![CellKind::Path; 2]],
        Vec::new(),
        CellCoord::new(0, 0),
        CellCoord::new(1, 1),
    );
    assert!(World::new(&layout, GameConfig::default()).is_err());
}
