use serde::{Deserialize, Serialize};

/// Default poll duration when the admin does not pick one.
pub const DEFAULT_POLL_DURATION_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Draft,
    Live,
    Ended,
    Archived,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollStatus::Draft => "draft",
            PollStatus::Live => "live",
            PollStatus::Ended => "ended",
            PollStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for PollStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PollStatus::Draft),
            "live" => Ok(PollStatus::Live),
            "ended" => Ok(PollStatus::Ended),
            "archived" => Ok(PollStatus::Archived),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub episode_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: PollStatus,
    pub starts_at: i64,
    pub ends_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub poll_id: String,
    pub name: String,
    pub vote_count: i64,
    pub display_order: i64,
}

/// A poll together with its options, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PollWithOptions {
    #[serde(flatten)]
    pub poll: Poll,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePoll {
    pub episode_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<PollStatus>,
    /// Poll duration in days; defaults to [`DEFAULT_POLL_DURATION_DAYS`].
    #[serde(default)]
    pub duration_days: Option<i64>,
    /// Option names in display order. A poll needs at least two.
    pub options: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePoll {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<PollStatus>,
    pub ends_at: Option<i64>,
}
