//! Board Models
//!
//! Values read off the board at drop time.

/// A card moved from one status column to another.
/// Only exists for cross-column moves of an identified card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub task_id: String,
    /// Origin column status, "" when the column carried none
    pub from_status: String,
    pub to_status: String,
}

impl MoveIntent {
    /// Build from the raw attribute values of a drop.
    ///
    /// None when the card stayed in its status (including two columns that
    /// both lack a status), when the destination has no status, or when the
    /// card has no task id.
    pub fn from_drop(
        task_id: Option<String>,
        from_status: Option<String>,
        to_status: Option<String>,
    ) -> Option<Self> {
        if from_status == to_status {
            return None;
        }
        let to_status = to_status.filter(|s| !s.is_empty())?;
        let task_id = task_id.filter(|id| !id.is_empty())?;
        Some(Self {
            task_id,
            from_status: from_status.unwrap_or_default(),
            to_status,
        })
    }
}
