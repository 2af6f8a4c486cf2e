//! Investigation bookmarks.

use super::model::InvestigationContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A frozen snapshot of an investigation at bookmark time.
///
/// A bookmark owns its own deep copy of the context, so later history
/// mutations or evictions cannot corrupt it. It never mutates after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Bookmark id, distinct from the investigation id.
    pub id: String,
    /// Owned snapshot of the bookmarked investigation.
    pub investigation: InvestigationContext,
    /// When the bookmark was created.
    pub created_at: DateTime<Utc>,
    /// Free-form user notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Title override for display in bookmark lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
    /// Labels carried over from the investigation plus user additions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Bookmark {
    /// Snapshots `investigation` into a new bookmark.
    pub fn snapshot(
        investigation: &InvestigationContext,
        notes: Option<String>,
        custom_title: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            investigation: investigation.clone(),
            created_at,
            notes,
            custom_title,
            tags: investigation.tags.clone(),
        }
    }

    /// The title shown in bookmark lists.
    pub fn display_title(&self) -> &str {
        self.custom_title
            .as_deref()
            .unwrap_or(&self.investigation.title)
    }
}
