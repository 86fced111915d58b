use dronepath_planner::{
    Direction, FlightBuilder, FlightFile, FlightInstruction, Horizontal, Rotation,
    RotationAngle, Vertical,
};
use tempfile::TempDir;

fn sample_builder() -> FlightBuilder {
    let mut builder = FlightBuilder::default();
    builder.flight_name = "Survey".to_string();
    builder.set_speed(40);
    builder
        .add_move(Direction::new(Vertical::Up, Horizontal::ForwardRight).unwrap())
        .unwrap();
    builder.add_rotation(Rotation::Ccw, RotationAngle::Half);
    builder.add_hold(3.0).unwrap();
    builder
}

#[test]
fn test_export_then_import_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("survey.json");

    let mut original = sample_builder();
    original.save_to_file(&path).unwrap();
    assert!(!original.is_modified);
    assert_eq!(original.current_file_path.as_deref(), Some(path.as_path()));

    let mut restored = FlightBuilder::default();
    restored.load_from_file(&path).unwrap();

    assert_eq!(restored.instructions(), original.instructions());
    assert_eq!(restored.settings().speed, 40);
    assert_eq!(restored.flight_name, "Survey");
}

#[test]
fn test_load_rejects_sequence_without_land() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");

    let mut file = FlightFile::new("Broken");
    file.instructions = vec![FlightInstruction::Takeoff, FlightInstruction::hold(1.0)];
    file.save_to_file(&path).unwrap();

    let err = FlightFile::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("must end with Land"));

    let mut builder = sample_builder();
    let before = builder.instructions().to_vec();
    assert!(builder.load_from_file(&path).is_err());
    assert_eq!(builder.instructions(), before.as_slice());
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = FlightFile::load_from_file(temp_dir.path().join("nope.json"));
    assert!(result.is_err());
}

#[test]
fn test_load_rejects_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = FlightFile::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse flight file"));
}
