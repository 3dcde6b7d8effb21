//! Secondary room attributes: seating, boards and AC units

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single air-conditioning unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcUnit {
    pub id: Uuid,
    pub working: bool,
}

impl AcUnit {
    /// A freshly installed unit, working by default
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            working: true,
        }
    }
}

impl Default for AcUnit {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilities {
    pub chairs_available: u32,
    pub smart_board: bool,
    pub white_board: bool,
    pub pens_available: bool,
    /// Ordered by installation; new units are appended at the tail
    pub ac_units: Vec<AcUnit>,
}

impl Facilities {
    pub fn working_ac_count(&self) -> usize {
        self.ac_units.iter().filter(|ac| ac.working).count()
    }

    /// True when no two units share an id
    pub fn has_unique_ac_ids(&self) -> bool {
        let mut ids: Vec<Uuid> = self.ac_units.iter().map(|ac| ac.id).collect();
        ids.sort();
        ids.windows(2).all(|w| w[0] != w[1])
    }
}

impl Default for Facilities {
    fn default() -> Self {
        Self {
            chairs_available: 100,
            smart_board: true,
            white_board: true,
            pens_available: true,
            ac_units: Vec::new(),
        }
    }
}
