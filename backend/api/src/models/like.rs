use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::video::Video;

/// A liked video as returned by the liked-videos listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    pub liked_at: DateTime<Utc>,
    pub video: Video,
}

/// Result of a constraint-backed toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Created,
    Removed,
}

impl ToggleOutcome {
    pub fn like_message(self) -> &'static str {
        match self {
            ToggleOutcome::Created => "Liked successfully",
            ToggleOutcome::Removed => "Like removed",
        }
    }

    pub fn subscription_message(self) -> &'static str {
        match self {
            ToggleOutcome::Created => "Subscribed successfully",
            ToggleOutcome::Removed => "Unsubscribed successfully",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_messages() {
        assert_eq!(ToggleOutcome::Created.like_message(), "Liked successfully");
        assert_eq!(ToggleOutcome::Removed.like_message(), "Like removed");
        assert_eq!(
            ToggleOutcome::Created.subscription_message(),
            "Subscribed successfully"
        );
        assert_eq!(
            ToggleOutcome::Removed.subscription_message(),
            "Unsubscribed successfully"
        );
    }
}
