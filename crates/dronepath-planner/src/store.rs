//! The instruction store.
//!
//! Holds the ordered flight plan. The first entry is always takeoff and the
//! last is always land; the store never exposes a way to break that.

use crate::instruction::FlightInstruction;
use crate::merger;
use dronepath_core::FlightError;

/// Check that a sequence is a complete flight plan
///
/// Requires takeoff first, land last, no other markers in between, and
/// valid values in every instruction.
pub fn validate_sequence(sequence: &[FlightInstruction]) -> Result<(), FlightError> {
    if sequence.len() < 2 {
        return Err(FlightError::TooShort {
            len: sequence.len(),
        });
    }
    if sequence[0] != FlightInstruction::Takeoff {
        return Err(FlightError::MissingMarker {
            marker: "Takeoff".to_string(),
            position: "start".to_string(),
        });
    }
    if sequence[sequence.len() - 1] != FlightInstruction::Land {
        return Err(FlightError::MissingMarker {
            marker: "Land".to_string(),
            position: "end".to_string(),
        });
    }

    for (index, instruction) in sequence
        .iter()
        .enumerate()
        .take(sequence.len() - 1)
        .skip(1)
    {
        if instruction.is_marker() {
            return Err(FlightError::MisplacedMarker {
                marker: instruction.message(),
                index,
            });
        }
        instruction
            .validate()
            .map_err(|reason| FlightError::InvalidInstruction { index, reason })?;
    }

    Ok(())
}

/// Ordered flight instructions with fixed takeoff and land markers
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionStore {
    instructions: Vec<FlightInstruction>,
}

impl Default for InstructionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionStore {
    /// Create a store holding only the markers
    pub fn new() -> Self {
        Self {
            instructions: vec![FlightInstruction::Takeoff, FlightInstruction::Land],
        }
    }

    /// Build a store from an externally supplied sequence
    pub fn from_sequence(sequence: Vec<FlightInstruction>) -> Result<Self, FlightError> {
        validate_sequence(&sequence)?;
        Ok(Self {
            instructions: sequence,
        })
    }

    /// Merge or append an instruction
    pub fn add(&mut self, instruction: FlightInstruction) {
        self.instructions = merger::add_instruction(&self.instructions, instruction);
    }

    /// Remove the newest non-terminal entry, if any
    pub fn delete_last(&mut self) -> Option<FlightInstruction> {
        if self.has_no_moves() {
            return None;
        }
        let index = self.instructions.len() - 2;
        Some(self.instructions.remove(index))
    }

    /// Reset to the markers
    pub fn clear(&mut self) {
        self.instructions.truncate(1);
        self.instructions.push(FlightInstruction::Land);
    }

    /// Replace the whole plan with a validated sequence
    pub fn replace_all(&mut self, sequence: Vec<FlightInstruction>) -> Result<(), FlightError> {
        validate_sequence(&sequence)?;
        self.instructions = sequence;
        Ok(())
    }

    /// The newest non-terminal entry (takeoff when the plan is empty)
    pub fn latest(&self) -> &FlightInstruction {
        &self.instructions[self.instructions.len() - 2]
    }

    /// True when only the markers remain
    pub fn has_no_moves(&self) -> bool {
        self.instructions.len() <= 2
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Never true; the markers are always present
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn as_slice(&self) -> &[FlightInstruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightInstruction> {
        self.instructions.iter()
    }

    /// Labels for the instruction list display
    pub fn messages(&self) -> Vec<String> {
        self.instructions.iter().map(|i| i.message()).collect()
    }

    /// SDK commands for every entry, in order
    pub fn drone_commands(&self) -> Vec<String> {
        self.instructions.iter().map(|i| i.drone_command()).collect()
    }

    pub fn to_vec(&self) -> Vec<FlightInstruction> {
        self.instructions.clone()
    }
}

impl<'a> IntoIterator for &'a InstructionStore {
    type Item = &'a FlightInstruction;
    type IntoIter = std::slice::Iter<'a, FlightInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
