//! Ranked chart entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CollageError;

/// The kind of top item being ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Top albums.
    Album,
    /// Top artists.
    Artist,
    /// Top tracks.
    Track,
}

impl EntityKind {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Album => "album",
            EntityKind::Artist => "artist",
            EntityKind::Track => "track",
        }
    }

    /// Last.fm method name for the user's top list.
    pub fn api_method(&self) -> &'static str {
        match self {
            EntityKind::Album => "user.gettopalbums",
            EntityKind::Artist => "user.gettopartists",
            EntityKind::Track => "user.gettoptracks",
        }
    }

    /// Top-level key of the response object.
    pub fn response_key(&self) -> &'static str {
        match self {
            EntityKind::Album => "topalbums",
            EntityKind::Artist => "topartists",
            EntityKind::Track => "toptracks",
        }
    }

    /// Key of the item list inside the response object.
    pub fn item_key(&self) -> &'static str {
        self.as_str()
    }

    /// All kinds.
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Album, EntityKind::Artist, EntityKind::Track]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CollageError::InvalidConfiguration(format!(
                    "Invalid entity: {}. Options are: album, artist, track",
                    s
                ))
            })
    }
}

/// One ranked item from a user's top list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// What kind of item this is.
    pub kind: EntityKind,

    /// Album, artist or track name.
    pub name: String,

    /// Artist name. `None` for artist entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Cover image URL, if the item has artwork.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// 1-based position in the service's ranking.
    pub rank: u32,

    /// Scrobbles in the requested period.
    pub playcount: u64,
}

impl Entity {
    /// Caption in "Artist - Title" form, or just the name for artists.
    pub fn title(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{} - {}", artist, self.name),
            None => self.name.clone(),
        }
    }

    /// Whether a cover image URL is present.
    pub fn has_artwork(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
