//! Resume marker for description exports.

use crate::model::meeting::MeetingId;

/// Last completed step of a partially applied description export.
///
/// Step 0 is the title update; steps `1..total_steps` are content chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProgress {
    pub meeting_id: MeetingId,
    /// Digest of the exported title and body; a mismatch invalidates the marker.
    pub fingerprint: String,
    pub completed_steps: u32,
    pub total_steps: u32,
}

impl ExportProgress {
    pub fn is_complete(&self) -> bool {
        self.completed_steps >= self.total_steps
    }
}
