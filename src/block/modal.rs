//! Modal group classification
//!
//! A small reference catalogue: every word of a code letter (G and M by
//! default) starts its own instruction, its modal group looked up in a table;
//! all other words are modal parameters.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::instruction::{Classified, Classifier, Instruction, ModalGroup};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::parser::Word;

pub const MOTION: ModalGroup = ModalGroup::from_static("motion");
pub const PLANE_SELECTION: ModalGroup = ModalGroup::from_static("plane_selection");
pub const DISTANCE: ModalGroup = ModalGroup::from_static("distance");
pub const ARC_IJK_DISTANCE: ModalGroup = ModalGroup::from_static("arc_ijk_distance");
pub const FEED_RATE_MODE: ModalGroup = ModalGroup::from_static("feed_rate_mode");
pub const UNITS: ModalGroup = ModalGroup::from_static("units");
pub const CUTTER_DIAMETER_COMP: ModalGroup = ModalGroup::from_static("cutter_diameter_comp");
pub const TOOL_LENGTH_OFFSET: ModalGroup = ModalGroup::from_static("tool_length_offset");
pub const CANNED_CYCLES_RETURN: ModalGroup = ModalGroup::from_static("canned_cycles_return");
pub const COORDINATE_SYSTEM: ModalGroup = ModalGroup::from_static("coordinate_system");
pub const CONTROL_MODE: ModalGroup = ModalGroup::from_static("control_mode");
pub const SPINDLE_SPEED_MODE: ModalGroup = ModalGroup::from_static("spindle_speed_mode");
pub const LATHE_DIAMETER_MODE: ModalGroup = ModalGroup::from_static("lathe_diameter_mode");
pub const STOPPING: ModalGroup = ModalGroup::from_static("stopping");
pub const TOOL_CHANGE: ModalGroup = ModalGroup::from_static("tool_change");
pub const SPINDLE: ModalGroup = ModalGroup::from_static("spindle");
pub const OVERRIDE_SWITCHES: ModalGroup = ModalGroup::from_static("override_switches");

static LINUXCNC: Lazy<ModalClassifier> = Lazy::new(ModalClassifier::linuxcnc);

/// Shared LinuxCNC classifier
pub fn linuxcnc() -> &'static ModalClassifier {
    &LINUXCNC
}

// codes carry at most one fraction digit, so tenths identify them exactly
fn code_key(letter: char, code: f64) -> (char, i64) {
    (letter.to_ascii_uppercase(), (code * 10.0).round() as i64)
}

/// Classifier driven by a (letter, code) -> modal group table
#[derive(Debug, Clone, Default)]
pub struct ModalClassifier {
    code_letters: HashSet<char>,
    groups: HashMap<(char, i64), ModalGroup>,
}

impl ModalClassifier {
    pub fn new(code_letters: impl IntoIterator<Item = char>) -> Self {
        Self {
            code_letters: code_letters
                .into_iter()
                .map(|c| c.to_ascii_uppercase())
                .collect(),
            groups: HashMap::new(),
        }
    }

    /// Put `letter` codes into a modal group
    pub fn with_group(mut self, letter: char, codes: &[f64], group: ModalGroup) -> Self {
        for &code in codes {
            self.groups.insert(code_key(letter, code), group.clone());
        }
        self
    }

    /// LinuxCNC G and M code modal groups
    pub fn linuxcnc() -> Self {
        Self::new(['G', 'M'])
            .with_group(
                'G',
                &[
                    0.0, 1.0, 2.0, 3.0, 33.0, 38.2, 38.3, 38.4, 38.5, 73.0, 76.0, 80.0, 81.0,
                    82.0, 83.0, 84.0, 85.0, 86.0, 87.0, 88.0, 89.0,
                ],
                MOTION,
            )
            .with_group('G', &[17.0, 18.0, 19.0, 17.1, 18.1, 19.1], PLANE_SELECTION)
            .with_group('G', &[90.0, 91.0], DISTANCE)
            .with_group('G', &[90.1, 91.1], ARC_IJK_DISTANCE)
            .with_group('G', &[93.0, 94.0, 95.0], FEED_RATE_MODE)
            .with_group('G', &[20.0, 21.0], UNITS)
            .with_group('G', &[40.0, 41.0, 42.0, 41.1, 42.1], CUTTER_DIAMETER_COMP)
            .with_group('G', &[43.0, 43.1, 49.0], TOOL_LENGTH_OFFSET)
            .with_group('G', &[98.0, 99.0], CANNED_CYCLES_RETURN)
            .with_group(
                'G',
                &[54.0, 55.0, 56.0, 57.0, 58.0, 59.0, 59.1, 59.2, 59.3],
                COORDINATE_SYSTEM,
            )
            .with_group('G', &[61.0, 61.1, 64.0], CONTROL_MODE)
            .with_group('G', &[96.0, 97.0], SPINDLE_SPEED_MODE)
            .with_group('G', &[7.0, 8.0], LATHE_DIAMETER_MODE)
            .with_group('M', &[0.0, 1.0, 2.0, 30.0, 60.0], STOPPING)
            .with_group('M', &[6.0], TOOL_CHANGE)
            .with_group('M', &[3.0, 4.0, 5.0], SPINDLE)
            .with_group('M', &[48.0, 49.0], OVERRIDE_SWITCHES)
    }

    pub fn is_code(&self, word: &Word) -> bool {
        self.code_letters.contains(&word.letter())
    }

    /// Modal group of a code word, if the table knows it
    pub fn group_of(&self, word: &Word) -> Option<&ModalGroup> {
        let code = word.value().as_f64()?;
        self.groups.get(&code_key(word.letter(), code))
    }
}

impl Classifier for ModalClassifier {
    fn classify(&self, words: &[Word], _dialect: &Dialect) -> Result<Classified> {
        let mut classified = Classified::default();
        for word in words {
            if self.is_code(word) {
                let group = self.group_of(word).cloned();
                classified
                    .instructions
                    .push(Instruction::new(word.clone(), group));
            } else {
                classified.modal_params.push(word.clone());
            }
        }
        Ok(classified)
    }
}
