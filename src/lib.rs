//! tvdb - Client for the TVDB JSON api version 2
//!
//! This library wraps the REST api served at https://api.thetvdb.com: it
//! logs in with an api key, searches for series, and fetches episodes,
//! actors, images and summaries into typed records.
//!
//! See https://api.thetvdb.com/swagger for the api documentation.
//!
//! # Example
//!
//! ```no_run
//! use tvdb::Client;
//!
//! let mut client = Client::new(std::env::var("TVDB_APIKEY").unwrap())
//!     .with_language("en");
//! client.login()?;
//!
//! let mut series = client.best_search("Game of Thrones")?;
//! client.get_series_episodes(&mut series, &Default::default())?;
//!
//! if let Some(episode) = series.get_episode(1, 1) {
//!     println!("{}", episode.episode_name); // Winter Is Coming
//! }
//! # Ok::<(), tvdb::TvdbError>(())
//! ```

mod api_types;
mod client;
mod error;
mod types;

pub use client::{BASE_URL, Client, EpisodeQuery};
pub use error::TvdbError;
pub use types::{
    Actor, BANNERS_BASE_URL, Episode, Image, Language, Rating, Series, Summary, Update, image_url,
};
