//! Record types mirroring the TVDB api resources.
//!
//! These structures mirror the JSON shapes returned by the api. Records that
//! come out of a search are only partially populated; the fetch methods on
//! [`Client`](crate::Client) fill in the rest. Fields the api reports as
//! `null` decode to their zero value, so emptiness checks stay uniform.
use serde::{Deserialize, Deserializer, Serialize};

/// Base URL where the static image assets are served from.
pub const BANNERS_BASE_URL: &str = "https://thetvdb.com/banners/";

/// Decodes a JSON `null` to the field type's default value.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A TV series, the root record owning episodes, actors, images and summary.
///
/// The owned collections start out empty and are only populated by the
/// corresponding fetch methods on [`Client`](crate::Client).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Series {
    pub id: u32,
    #[serde(deserialize_with = "null_default")]
    pub series_name: String,
    pub aliases: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub banner: String,
    #[serde(deserialize_with = "null_default")]
    pub first_aired: String,
    pub genre: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub overview: String,
    #[serde(deserialize_with = "null_default")]
    pub network: String,
    #[serde(deserialize_with = "null_default")]
    pub network_id: String,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub airs_day_of_week: String,
    #[serde(deserialize_with = "null_default")]
    pub airs_time: String,
    #[serde(deserialize_with = "null_default")]
    pub runtime: String,
    #[serde(deserialize_with = "null_default")]
    pub rating: String,
    #[serde(deserialize_with = "null_default")]
    pub imdb_id: String,
    #[serde(deserialize_with = "null_default")]
    pub zap2it_id: String,
    #[serde(deserialize_with = "null_default")]
    pub series_id: String,
    #[serde(deserialize_with = "null_default")]
    pub added: String,
    #[serde(deserialize_with = "null_default")]
    pub added_by: u32,
    #[serde(deserialize_with = "null_default")]
    pub last_updated: u64,
    #[serde(deserialize_with = "null_default")]
    pub site_rating: f32,
    #[serde(deserialize_with = "null_default")]
    pub site_rating_count: u32,

    /// Populated by [`Client::get_series_actors`](crate::Client::get_series_actors).
    #[serde(skip)]
    pub actors: Vec<Actor>,
    /// Populated by [`Client::get_series_episodes`](crate::Client::get_series_episodes),
    /// in the order the api returned them.
    #[serde(skip)]
    pub episodes: Vec<Episode>,
    /// Populated by the image fetch methods on [`Client`](crate::Client).
    #[serde(skip)]
    pub images: Vec<Image>,
    /// Populated by [`Client::get_series_summary`](crate::Client::get_series_summary).
    #[serde(skip)]
    pub summary: Summary,
}

impl Series {
    /// Returns true if this record carries no identity yet.
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.series_name.is_empty()
    }

    /// Returns the episode with the given season and in-season number.
    ///
    /// Linear scan over the fetched episode collection; `None` means the
    /// pair is not present, which is not an error. Never touches the
    /// network.
    pub fn get_episode(&self, season: u32, number: u32) -> Option<&Episode> {
        self.episodes
            .iter()
            .find(|e| e.aired_season == season && e.aired_episode_number == number)
    }

    /// Returns all episodes of the given season, in collection order.
    ///
    /// The order is whatever the api returned, not necessarily sorted by
    /// episode number.
    pub fn get_season_episodes(&self, season: u32) -> Vec<&Episode> {
        self.episodes
            .iter()
            .filter(|e| e.aired_season == season)
            .collect()
    }

    /// Returns the absolute URL of the series banner image.
    pub fn banner_url(&self) -> String {
        image_url(&self.banner)
    }
}

/// A single episode of a series, keyed by (season, number) within it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Episode {
    pub id: u32,
    #[serde(deserialize_with = "null_default")]
    pub episode_name: String,
    pub aired_season: u32,
    pub aired_episode_number: u32,
    #[serde(deserialize_with = "null_default")]
    pub absolute_number: u32,
    #[serde(deserialize_with = "null_default")]
    pub airs_after_season: u32,
    #[serde(deserialize_with = "null_default")]
    pub airs_before_episode: u32,
    #[serde(deserialize_with = "null_default")]
    pub airs_before_season: u32,
    #[serde(deserialize_with = "null_default")]
    pub dvd_chapter: u32,
    #[serde(deserialize_with = "null_default")]
    pub dvd_discid: String,
    #[serde(deserialize_with = "null_default")]
    pub dvd_episode_number: u32,
    #[serde(deserialize_with = "null_default")]
    pub dvd_season: u32,
    #[serde(deserialize_with = "null_default")]
    pub first_aired: String,
    #[serde(deserialize_with = "null_default")]
    pub overview: String,
    #[serde(deserialize_with = "null_default")]
    pub directors: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub writers: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub guest_stars: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub filename: String,
    #[serde(deserialize_with = "null_default")]
    pub imdb_id: String,
    #[serde(deserialize_with = "null_default")]
    pub production_code: String,
    pub series_id: u32,
    #[serde(rename = "showURL", deserialize_with = "null_default")]
    pub show_url: String,
    #[serde(deserialize_with = "null_default")]
    pub site_rating: f32,
    #[serde(deserialize_with = "null_default")]
    pub site_rating_count: u32,
    #[serde(deserialize_with = "null_default")]
    pub last_updated: u64,
    #[serde(deserialize_with = "null_default")]
    pub last_updated_by: u32,
}

impl Episode {
    /// Returns true if this record carries no identity yet.
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.episode_name.is_empty()
    }
}

/// An actor appearing in a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Actor {
    pub id: u32,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub role: String,
    #[serde(deserialize_with = "null_default")]
    pub image: String,
    #[serde(deserialize_with = "null_default")]
    pub image_added: String,
    #[serde(deserialize_with = "null_default")]
    pub image_author: u32,
    #[serde(deserialize_with = "null_default")]
    pub last_updated: String,
    pub series_id: u32,
    pub sort_order: u32,
}

/// A banner/poster/fanart image attached to a series.
///
/// The `file_name` is relative to the static asset host; use
/// [`image_url`] to obtain the absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub id: u32,
    #[serde(deserialize_with = "null_default")]
    pub file_name: String,
    #[serde(deserialize_with = "null_default")]
    pub key_type: String,
    #[serde(deserialize_with = "null_default")]
    pub sub_key: String,
    #[serde(deserialize_with = "null_default")]
    pub resolution: String,
    #[serde(deserialize_with = "null_default")]
    pub thumbnail: String,
    #[serde(deserialize_with = "null_default")]
    pub language_id: u32,
    pub ratings_info: Rating,
}

/// Rating statistics attached to an [`Image`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    #[serde(deserialize_with = "null_default")]
    pub average: f64,
    #[serde(deserialize_with = "null_default")]
    pub count: u32,
}

/// A language the api can deliver content in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Language {
    pub id: u32,
    #[serde(deserialize_with = "null_default")]
    pub abbreviation: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub english_name: String,
}

/// Count of aired and DVD episodes/seasons available for a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Summary {
    #[serde(deserialize_with = "null_default")]
    pub aired_episodes: String,
    pub aired_seasons: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub dvd_episodes: String,
    pub dvd_seasons: Vec<String>,
}

/// Marker that a series changed on the remote side at some point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Update {
    pub id: u32,
    pub last_updated: u64,
}

/// Returns the complete URL of an image.
///
/// The image file names returned by the api are relative, so this simply
/// joins the static asset base URL with the relative path. No normalization
/// is applied.
///
/// ```
/// assert_eq!(
///     tvdb::image_url("posters/121361-1.jpg"),
///     "https://thetvdb.com/banners/posters/121361-1.jpg"
/// );
/// ```
pub fn image_url(file_name: &str) -> String {
    format!("{BANNERS_BASE_URL}{file_name}")
}
