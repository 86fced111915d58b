use dronepath_core::Point3D;
use dronepath_planner::{
    add_instruction, BuildSettings, Direction, FlightBuilder, FlightInstruction, Horizontal,
    Offset, Rotation, RotationAngle, Vertical,
};

fn dir(vertical: Vertical, horizontal: Horizontal) -> Direction {
    Direction::new(vertical, horizontal).unwrap()
}

#[test]
fn test_repeated_step_merges_into_one_move() {
    let start = vec![FlightInstruction::Takeoff, FlightInstruction::Land];
    let step = FlightInstruction::Move {
        direction: dir(Vertical::Level, Horizontal::Left),
        offset: Offset::new(0.0, 1.0, 0.0),
        speed: 20,
        distance: 1.0,
    };

    let once = add_instruction(&start, step.clone());
    let twice = add_instruction(&once, step);

    assert_eq!(twice.len(), 3);
    assert_eq!(
        twice[1],
        FlightInstruction::Move {
            direction: dir(Vertical::Level, Horizontal::Left),
            offset: Offset::new(0.0, 2.0, 0.0),
            speed: 20,
            distance: 2.0,
        }
    );
    assert_eq!(twice[1].message(), "Left --> 2.0 m");
}

#[test]
fn test_square_flight_returns_to_start() {
    let mut builder = FlightBuilder::new(BuildSettings {
        distance: 1.0,
        ..Default::default()
    });

    for _ in 0..4 {
        builder
            .add_move(dir(Vertical::Level, Horizontal::Forward))
            .unwrap();
        builder.add_rotation(Rotation::Cw, RotationAngle::Quarter);
    }

    let path = builder.path();
    assert_eq!(path.len(), 5);
    assert!(path[1].approx_eq(&Point3D::new(0.0, 1.0, 1.0)));
    assert!(path[2].approx_eq(&Point3D::new(-1.0, 1.0, 1.0)));
    assert!(path[3].approx_eq(&Point3D::new(-1.0, 1.0, 0.0)));
    assert!(builder.current_point().approx_eq(&builder.settings().start));
    assert_eq!(builder.heading().bucket(), 0);

    assert_eq!(
        builder.store().drone_commands(),
        vec![
            "takeoff", "go 100 0 0 20", "cw 90", "go 100 0 0 20", "cw 90", "go 100 0 0 20",
            "cw 90", "go 100 0 0 20", "cw 90", "land",
        ]
    );
}

#[test]
fn test_climb_stops_at_ceiling() {
    let mut builder = FlightBuilder::new(BuildSettings {
        distance: 3.0,
        scale: 10.0,
        ..Default::default()
    });
    let up = dir(Vertical::Up, Horizontal::None);

    builder.add_move(up).unwrap();
    builder.add_move(up).unwrap();
    builder.add_move(up).unwrap();
    assert!(builder.control_limits().up);
    assert!(builder.add_move(up).is_err());
    assert!(builder
        .current_point()
        .approx_eq(&Point3D::new(0.0, 10.0, 0.0)));
}

#[test]
fn test_delete_then_clear() {
    let mut builder = FlightBuilder::default();
    builder.add_move(dir(Vertical::Up, Horizontal::None)).unwrap();
    builder.add_hold(2.0).unwrap();

    assert_eq!(builder.delete_last(), Some(FlightInstruction::hold(2.0)));
    builder.clear();
    assert!(builder.store().has_no_moves());
    assert_eq!(builder.delete_last(), None);
}
