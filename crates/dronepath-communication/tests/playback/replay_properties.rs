//! Replaying a plan lands the drone model where the projector says

use dronepath_communication::{PlaybackScheduler, PlaybackState, PlaybackTiming};
use dronepath_core::{DroneState, Point3D};
use dronepath_planner::{
    Direction, FlightInstruction, Horizontal, InstructionStore, Projector, Rotation,
    RotationAngle, Vertical,
};
use proptest::prelude::*;

fn instruction() -> impl Strategy<Value = FlightInstruction> {
    let horizontal = prop_oneof![
        Just(Horizontal::Forward),
        Just(Horizontal::Reverse),
        Just(Horizontal::Left),
        Just(Horizontal::ForwardRight),
        Just(Horizontal::None),
    ];
    let vertical = prop_oneof![Just(Vertical::Up), Just(Vertical::Level), Just(Vertical::Down)];
    prop_oneof![
        (vertical, horizontal, 1u32..=10).prop_map(|(v, h, tenths)| {
            match Direction::new(v, h) {
                Some(direction) => FlightInstruction::step(direction, tenths as f64 / 10.0, 20),
                None => FlightInstruction::hold(1.0),
            }
        }),
        (
            prop_oneof![Just(Rotation::Cw), Just(Rotation::Ccw)],
            prop_oneof![
                Just(RotationAngle::Quarter),
                Just(RotationAngle::Half),
                Just(RotationAngle::ThreeQuarter)
            ]
        )
            .prop_map(|(rotation, angle)| FlightInstruction::rotate(rotation, angle)),
    ]
}

proptest! {
    #[test]
    fn replay_matches_projection(instructions in prop::collection::vec(instruction(), 0..25)) {
        let mut store = InstructionStore::new();
        for instruction in instructions {
            store.add(instruction);
        }
        let projector = Projector::default();

        let mut scheduler = PlaybackScheduler::new(
            store.to_vec(),
            Point3D::ORIGIN,
            PlaybackTiming::default(),
        );
        let mut drone = DroneState::new(Point3D::ORIGIN);
        scheduler.start().unwrap();

        let mut steps = 0;
        while scheduler.index() < store.len() - 1 {
            prop_assert!(scheduler.next_step(&mut drone).is_some());
            steps += 1;
        }
        prop_assert_eq!(steps, store.len() - 1);
        prop_assert!(drone.position().approx_eq(&projector.current_point(store.as_slice())));
        prop_assert_eq!(drone.heading(), projector.final_heading(store.as_slice()));

        let land = scheduler.next_step(&mut drone).unwrap();
        prop_assert_eq!(land.instruction, FlightInstruction::Land);
        prop_assert_eq!(scheduler.state(), PlaybackState::Settling);
    }
}
