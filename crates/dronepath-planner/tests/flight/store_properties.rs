use dronepath_planner::{
    Direction, FlightInstruction, Horizontal, InstructionStore, Projector, Rotation,
    RotationAngle, Vertical,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(FlightInstruction),
    DeleteLast,
    Clear,
}

fn vertical() -> impl Strategy<Value = Vertical> {
    prop_oneof![Just(Vertical::Up), Just(Vertical::Level), Just(Vertical::Down)]
}

fn horizontal() -> impl Strategy<Value = Horizontal> {
    prop_oneof![
        Just(Horizontal::None),
        Just(Horizontal::Forward),
        Just(Horizontal::Reverse),
        Just(Horizontal::Left),
        Just(Horizontal::Right),
        Just(Horizontal::ForwardLeft),
        Just(Horizontal::ReverseRight),
    ]
}

fn instruction() -> impl Strategy<Value = FlightInstruction> {
    prop_oneof![
        (vertical(), horizontal(), 1u32..=20, 10u32..=100).prop_map(|(v, h, tenths, speed)| {
            match Direction::new(v, h) {
                Some(direction) => FlightInstruction::step(direction, tenths as f64 / 10.0, speed),
                None => FlightInstruction::hold(tenths as f64 / 10.0),
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
        (1u32..=10).prop_map(|s| FlightInstruction::hold(s as f64)),
        Just(FlightInstruction::Takeoff),
        Just(FlightInstruction::Land),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => instruction().prop_map(Op::Add),
        2 => Just(Op::DeleteLast),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn store_keeps_markers(ops in prop::collection::vec(op(), 0..60)) {
        let mut store = InstructionStore::new();
        for op in ops {
            match op {
                Op::Add(instruction) => store.add(instruction),
                Op::DeleteLast => {
                    store.delete_last();
                }
                Op::Clear => store.clear(),
            }

            prop_assert!(store.len() >= 2);
            prop_assert_eq!(&store.as_slice()[0], &FlightInstruction::Takeoff);
            prop_assert_eq!(store.as_slice().last(), Some(&FlightInstruction::Land));
            prop_assert!(dronepath_planner::validate_sequence(store.as_slice()).is_ok());
        }
    }

    #[test]
    fn no_two_neighbours_share_a_category(ops in prop::collection::vec(instruction(), 0..40)) {
        let mut store = InstructionStore::new();
        for instruction in ops {
            store.add(instruction);
        }
        for pair in store.as_slice().windows(2) {
            match (&pair[0], &pair[1]) {
                // a move too long for one `go` continues in a second entry
                (
                    FlightInstruction::Move { offset: a, .. },
                    FlightInstruction::Move { offset: b, .. },
                ) if pair[0].category() == pair[1].category() => {
                    prop_assert!(!(*a + *b).within_go_range());
                }
                _ => prop_assert_ne!(pair[0].category(), pair[1].category()),
            }
        }
    }

    #[test]
    fn projection_is_pure(ops in prop::collection::vec(instruction(), 0..40)) {
        let mut store = InstructionStore::new();
        for instruction in ops {
            store.add(instruction);
        }
        let projector = Projector::default();
        let first = projector.project(store.as_slice());
        let second = projector.project(store.as_slice());
        prop_assert_eq!(first, second);
    }
}
