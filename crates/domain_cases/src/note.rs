//! Investigation notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::NoteId;

/// Author used for notes written by the system
pub const SYSTEM_AUTHOR: &str = "SYSTEM";

/// Note category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteType {
    System,
    Investigator,
    StatusChange,
    Evidence,
}

/// A note on a case; never edited after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationNote {
    pub note_id: NoteId,
    pub author: String,
    pub note_type: NoteType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl InvestigationNote {
    pub fn new(author: impl Into<String>, note_type: NoteType, content: impl Into<String>) -> Self {
        Self {
            note_id: NoteId::new_v7(),
            author: author.into(),
            note_type,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn system(note_type: NoteType, content: impl Into<String>) -> Self {
        Self::new(SYSTEM_AUTHOR, note_type, content)
    }
}
