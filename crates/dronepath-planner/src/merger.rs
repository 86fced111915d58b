//! Instruction merging.
//!
//! A repeated command does not grow the plan: pressing "Forward" twice
//! yields one forward move covering both steps.

use crate::instruction::{FlightInstruction, RotationAngle};
use tracing::debug;

/// Result of folding a new instruction into an existing one of the same category
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Replace the existing entry with this one
    Replace(FlightInstruction),
    /// The two cancel out; drop the existing entry
    Cancel,
    /// The combined move is too long for one `go`; keep both entries
    Separate,
}

/// Fold `new` into `existing`. Both must share a category.
pub fn merge(existing: &FlightInstruction, new: &FlightInstruction) -> MergeOutcome {
    match (existing, new) {
        (
            FlightInstruction::Move {
                direction,
                offset,
                speed,
                distance,
            },
            FlightInstruction::Move {
                offset: new_offset,
                distance: new_distance,
                ..
            },
        ) => {
            let offset = *offset + *new_offset;
            if !offset.within_go_range() {
                return MergeOutcome::Separate;
            }
            MergeOutcome::Replace(FlightInstruction::Move {
                direction: *direction,
                offset,
                speed: *speed,
                distance: distance + new_distance,
            })
        }
        (
            FlightInstruction::Rotate { rotation, angle },
            FlightInstruction::Rotate {
                angle: new_angle, ..
            },
        ) => match RotationAngle::from_degrees(angle.degrees() + new_angle.degrees()) {
            Some(total) => MergeOutcome::Replace(FlightInstruction::rotate(*rotation, total)),
            None => MergeOutcome::Cancel,
        },
        (FlightInstruction::Hold { seconds }, FlightInstruction::Hold { seconds: more }) => {
            MergeOutcome::Replace(FlightInstruction::hold(seconds + more))
        }
        _ => MergeOutcome::Replace(existing.clone()),
    }
}

/// Add `new` to a well-formed sequence (takeoff first, land last).
///
/// When the newest non-terminal entry has the same category the two are
/// merged in place, otherwise `new` is inserted just before land. Markers
/// are fixed, so passing takeoff or land returns the sequence unchanged.
pub fn add_instruction(
    current: &[FlightInstruction],
    new: FlightInstruction,
) -> Vec<FlightInstruction> {
    let mut updated = current.to_vec();
    if new.is_marker() || current.len() < 2 {
        debug!("Ignoring {} for sequence of {}", new, current.len());
        return updated;
    }

    let land_index = updated.len() - 1;
    let latest_index = land_index - 1;
    let latest = &updated[latest_index];

    if latest.category() == new.category() {
        match merge(latest, &new) {
            MergeOutcome::Replace(merged) => {
                debug!("Merged {} into {}", new, merged);
                updated[latest_index] = merged;
            }
            MergeOutcome::Cancel => {
                debug!("{} cancels {}", new, latest);
                updated.remove(latest_index);
            }
            MergeOutcome::Separate => {
                debug!("{} starts a new entry after {}", new, latest);
                updated.insert(land_index, new);
            }
        }
    } else {
        debug!("Appending {}", new);
        updated.insert(land_index, new);
    }

    updated
}
