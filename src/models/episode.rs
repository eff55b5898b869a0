use serde::{Deserialize, Serialize};

/// Where an episode sits in the release schedule, as shown to visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Available,
    Upcoming,
    Locked,
    Draft,
    Archived,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Available => "available",
            Visibility::Upcoming => "upcoming",
            Visibility::Locked => "locked",
            Visibility::Draft => "draft",
            Visibility::Archived => "archived",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Visibility::Available),
            "upcoming" => Ok(Visibility::Upcoming),
            "locked" => Ok(Visibility::Locked),
            "draft" => Ok(Visibility::Draft),
            "archived" => Ok(Visibility::Archived),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Free,
    Premium,
    Vip,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Free => "free",
            AccessLevel::Premium => "premium",
            AccessLevel::Vip => "vip",
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(AccessLevel::Free),
            "premium" => Ok(AccessLevel::Premium),
            "vip" => Ok(AccessLevel::Vip),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeStatus {
    Draft,
    Published,
}

impl EpisodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeStatus::Draft => "draft",
            EpisodeStatus::Published => "published",
        }
    }
}

impl std::str::FromStr for EpisodeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EpisodeStatus::Draft),
            "published" => Ok(EpisodeStatus::Published),
            _ => Err(()),
        }
    }
}

/// A premiere episode. The `passphrase` is a presentation gate for the
/// premiere page, not an access-control boundary, and is never serialized
/// into public responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    /// External episode identifier (e.g. the production's own numbering).
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub runtime_minutes: Option<i64>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub access_level: AccessLevel,
    #[serde(skip_serializing)]
    pub passphrase: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: EpisodeStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateEpisode {
    pub external_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub runtime_minutes: Option<i64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub passphrase: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub status: EpisodeStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEpisode {
    pub title: Option<String>,
    pub description: Option<String>,
    pub runtime_minutes: Option<i64>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
    pub access_level: Option<AccessLevel>,
    pub passphrase: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: Option<EpisodeStatus>,
}
