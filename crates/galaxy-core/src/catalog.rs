//! The fixed, ordered background-music catalog.
//!
//! Catalog order is part of the contract: it is the order in which
//! `next_track` and `previous_track` walk the playlist.

use std::fmt;

/// Identifier of a track. Ids are plain strings so that requests for tracks
/// outside the catalog can still be expressed (and rejected) at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackCategory {
    Epic,
    Ambient,
    Mystic,
}

impl TrackCategory {
    pub fn label(self) -> &'static str {
        match self {
            TrackCategory::Epic => "Epic",
            TrackCategory::Ambient => "Ambient",
            TrackCategory::Mystic => "Mystic",
        }
    }
}

/// Per-track metadata shown in the HUD and used to locate the audio asset.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackInfo {
    pub id: TrackId,
    pub title: &'static str,
    pub description: &'static str,
    pub category: TrackCategory,
    pub file: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct TrackCatalog {
    tracks: Vec<TrackInfo>,
}

impl TrackCatalog {
    pub fn new(tracks: Vec<TrackInfo>) -> Self {
        Self { tracks }
    }

    /// Ids only, in catalog order. Metadata is filled with the id itself.
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let tracks = ids
            .into_iter()
            .map(|id| TrackInfo {
                id: TrackId::from(id),
                title: "",
                description: "",
                category: TrackCategory::Ambient,
                file: "",
            })
            .collect();
        Self { tracks }
    }

    /// The soundtrack shipped with the explorer.
    pub fn soundtrack() -> Self {
        Self::new(vec![
            TrackInfo {
                id: TrackId::from("epic_march"),
                title: "Epic March",
                description: "Brass and war drums for the clan fleets",
                category: TrackCategory::Epic,
                file: "epic_march.mp3",
            },
            TrackInfo {
                id: TrackId::from("mystic_plains"),
                title: "Mystic Plains",
                description: "Slow strings over a drifting pad",
                category: TrackCategory::Mystic,
                file: "mystic_plains.mp3",
            },
            TrackInfo {
                id: TrackId::from("stellar_drift"),
                title: "Stellar Drift",
                description: "Warm synth swells for open space",
                category: TrackCategory::Ambient,
                file: "stellar_drift.mp3",
            },
            TrackInfo {
                id: TrackId::from("nebula_lullaby"),
                title: "Nebula Lullaby",
                description: "Celesta and choir, very quiet",
                category: TrackCategory::Ambient,
                file: "nebula_lullaby.mp3",
            },
            TrackInfo {
                id: TrackId::from("void_requiem"),
                title: "Void Requiem",
                description: "Low drones near the black holes",
                category: TrackCategory::Mystic,
                file: "void_requiem.mp3",
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackInfo> {
        self.tracks.get(index)
    }

    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn info(&self, id: &TrackId) -> Option<&TrackInfo> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackInfo> {
        self.tracks.iter()
    }

    /// Index after `index`, wrapping to the front. `None` for an empty catalog.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let len = self.tracks.len();
        (len > 0).then(|| (index % len + 1) % len)
    }

    /// Index before `index`, wrapping to the back. `None` for an empty catalog.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        let len = self.tracks.len();
        (len > 0).then(|| (index % len + len - 1) % len)
    }
}
