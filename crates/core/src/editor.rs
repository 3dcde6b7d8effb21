//! Facility editor
//!
//! Edits accumulate on a private copy of a room's facilities and leave as a
//! single `SetFacilities` command. Dropping the editor discards them.

use tracing::debug;
use uuid::Uuid;

use crate::command::RoomCommand;
use crate::error::{Error, Result};
use crate::models::{AcUnit, Facilities, Room};

#[derive(Debug, Clone)]
pub struct FacilityEditor {
    room_id: String,
    draft: Facilities,
}

impl FacilityEditor {
    /// Start editing from the room's current facilities
    pub fn open(room: &Room) -> Self {
        Self {
            room_id: room.id.clone(),
            draft: room.facilities.clone(),
        }
    }

    pub fn draft(&self) -> &Facilities {
        &self.draft
    }

    pub fn set_chairs(&mut self, chairs: u32) -> &mut Self {
        self.draft.chairs_available = chairs;
        self
    }

    pub fn set_smart_board(&mut self, present: bool) -> &mut Self {
        self.draft.smart_board = present;
        self
    }

    pub fn set_white_board(&mut self, present: bool) -> &mut Self {
        self.draft.white_board = present;
        self
    }

    pub fn set_pens(&mut self, available: bool) -> &mut Self {
        self.draft.pens_available = available;
        self
    }

    /// Resize the AC unit list.
    ///
    /// Growing appends fresh working units; shrinking drops units from the
    /// tail. Surviving units keep their ids and flags.
    pub fn set_ac_count(&mut self, count: usize) -> &mut Self {
        let units = &mut self.draft.ac_units;
        if count < units.len() {
            units.truncate(count);
        } else {
            units.extend((units.len()..count).map(|_| AcUnit::new()));
        }
        self
    }

    /// Flip the working flag of one unit
    pub fn toggle_unit(&mut self, id: Uuid) -> Result<bool> {
        let unit = self
            .draft
            .ac_units
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound(format!("AC unit {}", id)))?;
        unit.working = !unit.working;
        Ok(unit.working)
    }

    /// Set the working flag of the unit at `index` (installation order)
    pub fn set_unit_working(&mut self, index: usize, working: bool) -> Result<()> {
        let len = self.draft.ac_units.len();
        let unit = self.draft.ac_units.get_mut(index).ok_or_else(|| {
            Error::Validation(format!("AC unit {} out of range (room has {})", index + 1, len))
        })?;
        unit.working = working;
        Ok(())
    }

    /// Finish editing, producing one atomic update
    pub fn commit(self) -> RoomCommand {
        debug!(
            room_id = %self.room_id,
            ac_units = self.draft.ac_units.len(),
            "Committing facilities"
        );
        RoomCommand::SetFacilities {
            room_id: self.room_id,
            facilities: self.draft,
        }
    }
}
