//! TVDB api client: authentication, search and resource fetching.
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::api_types::{ApiResponse, TokenResponse};
use crate::error::TvdbError;
use crate::types::{Actor, Episode, Image, Language, Series, Summary, Update};

/// Base URL where the TVDB api is accessible.
pub const BASE_URL: &str = "https://api.thetvdb.com";

/// Number of episodes the api packs into one page of the episodes query.
const EPISODES_PAGE_SIZE: usize = 100;

/// Language sent in `Accept-Language` when none is configured.
const DEFAULT_LANGUAGE: &str = "en";

/// Filter parameters for [`Client::get_series_episodes`].
///
/// All filters are optional; the default value fetches every episode of the
/// series. The page parameter is managed by the client itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeQuery {
    pub absolute_number: Option<u32>,
    pub aired_season: Option<u32>,
    pub aired_episode: Option<u32>,
    pub dvd_season: Option<u32>,
    pub dvd_episode: Option<u32>,
    pub imdb_id: Option<String>,
}

impl EpisodeQuery {
    /// Converts the set filters into query parameters.
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(n) = self.absolute_number {
            params.push(("absoluteNumber", n.to_string()));
        }
        if let Some(n) = self.aired_season {
            params.push(("airedSeason", n.to_string()));
        }
        if let Some(n) = self.aired_episode {
            params.push(("airedEpisode", n.to_string()));
        }
        if let Some(n) = self.dvd_season {
            params.push(("dvdSeason", n.to_string()));
        }
        if let Some(n) = self.dvd_episode {
            params.push(("dvdEpisode", n.to_string()));
        }
        if let Some(id) = &self.imdb_id {
            params.push(("imdbId", id.clone()));
        }
        params
    }
}

/// Client performing the REST requests to the TVDB api endpoints.
///
/// A client is built with the api credentials, logged in once, and then used
/// for any number of search and fetch calls. The bearer token obtained by
/// [`login`](Client::login) is stored on the client and refreshed in place by
/// [`refresh_token`](Client::refresh_token).
///
/// All calls are blocking and the token is plain mutable state: a client is
/// meant to be used from one thread. Sharing one instance across threads
/// requires external synchronization (or one client per thread).
///
/// # Examples
///
/// ```no_run
/// use tvdb::Client;
///
/// let mut client = Client::new("YOUR_API_KEY").with_language("en");
/// client.login()?;
/// let mut series = client.best_search("Game of Thrones")?;
/// client.get_series_episodes(&mut series, &Default::default())?;
/// if let Some(episode) = series.get_episode(4, 8) {
///     println!("{}", episode.episode_name);
/// }
/// # Ok::<(), tvdb::TvdbError>(())
/// ```
pub struct Client {
    api_key: String,
    user_key: Option<String>,
    username: Option<String>,
    language: String,
    token: Option<String>,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Creates a new client for the given api key.
    ///
    /// The api key is obtained by registering on https://thetvdb.com.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            user_key: None,
            username: None,
            language: DEFAULT_LANGUAGE.to_string(),
            token: None,
            base_url: BASE_URL.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Sets the user key and username sent along with the api key on login.
    pub fn with_user_credentials(
        mut self,
        user_key: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        self.user_key = Some(user_key.into());
        self.username = Some(username.into());
        self
    }

    /// Sets the language the data is requested in.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Overrides the api base URL (for tests against a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Logs in and stores the bearer token used by any other request.
    ///
    /// Fails with [`TvdbError::Status`] (commonly 401) when the credentials
    /// are rejected. There is no automatic re-login: when a later call fails
    /// with 401 the caller has to log in again.
    pub fn login(&mut self) -> Result<(), TvdbError> {
        let credentials = json!({
            "apikey": self.api_key,
            "userkey": self.user_key.as_deref().unwrap_or_default(),
            "username": self.username.as_deref().unwrap_or_default(),
        });
        let response: TokenResponse = self.post_json("/login", &credentials)?;
        self.token = Some(response.token);
        Ok(())
    }

    /// Exchanges the current token for a renewed one.
    ///
    /// Fails with [`TvdbError::Status`] if the client never logged in or the
    /// token expired beyond refresh.
    pub fn refresh_token(&mut self) -> Result<(), TvdbError> {
        let response: TokenResponse = self.get_json("/refresh_token", &[])?;
        self.token = Some(response.token);
        Ok(())
    }

    /// Returns all languages available on the api.
    pub fn get_languages(&self) -> Result<Vec<Language>, TvdbError> {
        let response: ApiResponse<Vec<Language>> = self.get_json("/languages", &[])?;
        Ok(response.data)
    }

    /// Returns the series that changed on the remote side since the given
    /// epoch timestamp.
    pub fn get_updates(&self, from_time: u64) -> Result<Vec<Update>, TvdbError> {
        let response: ApiResponse<Option<Vec<Update>>> =
            self.get_json("/updated/query", &[("fromTime", from_time.to_string())])?;
        Ok(response.data.unwrap_or_default())
    }

    /// Searches for series by name. Returns the candidates in the order the
    /// api delivered them.
    pub fn search_by_name(&self, q: &str) -> Result<Vec<Series>, TvdbError> {
        self.search(("name", q.to_string()))
    }

    /// Searches for the series with the given IMDB id (https://www.imdb.com).
    pub fn search_by_imdb_id(&self, q: &str) -> Result<Vec<Series>, TvdbError> {
        self.search(("imdbId", q.to_string()))
    }

    /// Searches for the series with the given Zap2it id (http://zap2it.com).
    pub fn search_by_zap2it_id(&self, q: &str) -> Result<Vec<Series>, TvdbError> {
        self.search(("zap2itId", q.to_string()))
    }

    /// Returns the best matching series for the given name.
    ///
    /// Candidates are ranked by a fixed tie-break order: a case-insensitive
    /// exact match on the primary name wins, then a case-insensitive exact
    /// match on an alias, then the first candidate of the search result. The
    /// api answers a name it knows nothing about with a 404 status; an
    /// answer with an empty candidate list becomes [`TvdbError::NotFound`].
    pub fn best_search(&self, q: &str) -> Result<Series, TvdbError> {
        let candidates = self.search_by_name(q)?;
        pick_best_match(q, candidates)
    }

    /// Retrieves all fields of the series.
    ///
    /// A series coming out of a search is only partially populated; this
    /// replaces the whole record with the api's full version. The locally
    /// fetched collections (episodes, actors, images, summary) are reset by
    /// the overwrite.
    pub fn get_series(&self, series: &mut Series) -> Result<(), TvdbError> {
        if series.is_empty() {
            return Err(TvdbError::Empty("series"));
        }
        let response: ApiResponse<Series> =
            self.get_json(&format!("/series/{}", series.id), &[])?;
        *series = response.data;
        Ok(())
    }

    /// Retrieves the actors of the series into `series.actors`.
    pub fn get_series_actors(&self, series: &mut Series) -> Result<(), TvdbError> {
        if series.is_empty() {
            return Err(TvdbError::Empty("series"));
        }
        let response: ApiResponse<Vec<Actor>> =
            self.get_json(&format!("/series/{}/actors", series.id), &[])?;
        series.actors = response.data;
        Ok(())
    }

    /// Retrieves the episodes of the series into `series.episodes`.
    ///
    /// The api delivers episodes in pages of 100; this keeps requesting
    /// pages until a short page signals the end, so with the default query
    /// every episode of the series is fetched. With filters (for example a
    /// single season) the result may fit into one page.
    ///
    /// The episode collection is only replaced after the whole fetch
    /// succeeded; on any failure mid-loop the series is left untouched.
    pub fn get_series_episodes(
        &self,
        series: &mut Series,
        query: &EpisodeQuery,
    ) -> Result<(), TvdbError> {
        if series.is_empty() {
            return Err(TvdbError::Empty("series"));
        }
        let path = format!("/series/{}/episodes/query", series.id);
        let mut episodes = Vec::new();
        for page in 1u32.. {
            let mut params = query.to_params();
            params.push(("page", page.to_string()));
            let response: ApiResponse<Vec<Episode>> = self.get_json(&path, &params)?;
            let fetched = response.data.len();
            episodes.extend(response.data);
            if fetched < EPISODES_PAGE_SIZE {
                break;
            }
        }
        debug!(series_id = series.id, count = episodes.len(), "fetched episodes");
        series.episodes = episodes;
        Ok(())
    }

    /// Retrieves the summary of the episodes and seasons available for the
    /// series into `series.summary`.
    pub fn get_series_summary(&self, series: &mut Series) -> Result<(), TvdbError> {
        if series.is_empty() {
            return Err(TvdbError::Empty("series"));
        }
        let response: ApiResponse<Summary> =
            self.get_json(&format!("/series/{}/episodes/summary", series.id), &[])?;
        series.summary = response.data;
        Ok(())
    }

    /// Retrieves all fields of the episode.
    ///
    /// Episodes coming out of [`get_series_episodes`](Client::get_series_episodes)
    /// are only partially populated; this replaces the whole record with the
    /// api's full version.
    pub fn get_episode(&self, episode: &mut Episode) -> Result<(), TvdbError> {
        if episode.is_empty() {
            return Err(TvdbError::Empty("episode"));
        }
        let response: ApiResponse<Episode> =
            self.get_json(&format!("/episodes/{}", episode.id), &[])?;
        *episode = response.data;
        Ok(())
    }

    /// Retrieves the fanart images of the series into `series.images`.
    pub fn get_series_fanart_images(&self, series: &mut Series) -> Result<(), TvdbError> {
        self.get_series_images(series, "fanart")
    }

    /// Retrieves the poster images of the series into `series.images`.
    pub fn get_series_poster_images(&self, series: &mut Series) -> Result<(), TvdbError> {
        self.get_series_images(series, "poster")
    }

    /// Retrieves the season images of the series into `series.images`.
    pub fn get_series_season_images(&self, series: &mut Series) -> Result<(), TvdbError> {
        self.get_series_images(series, "season")
    }

    /// Retrieves the seasonwide images of the series into `series.images`.
    pub fn get_series_seasonwide_images(&self, series: &mut Series) -> Result<(), TvdbError> {
        self.get_series_images(series, "seasonwide")
    }

    /// Retrieves the series images of the series into `series.images`.
    pub fn get_series_series_images(&self, series: &mut Series) -> Result<(), TvdbError> {
        self.get_series_images(series, "series")
    }

    fn get_series_images(&self, series: &mut Series, key_type: &str) -> Result<(), TvdbError> {
        if series.is_empty() {
            return Err(TvdbError::Empty("series"));
        }
        let response: ApiResponse<Vec<Image>> = self.get_json(
            &format!("/series/{}/images/query", series.id),
            &[("keyType", key_type.to_string())],
        )?;
        series.images = response.data;
        Ok(())
    }

    fn search(&self, param: (&'static str, String)) -> Result<Vec<Series>, TvdbError> {
        let response: ApiResponse<Vec<Series>> =
            self.get_json("/search/series", &[param])?;
        Ok(response.data)
    }

    /// Performs an authenticated GET and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, TvdbError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let mut request = self.http.get(&url).query(params);
        request = self.common_headers(request);
        let response = request.send()?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(TvdbError::Status(status));
        }
        Ok(serde_json::from_str(&response.text()?)?)
    }

    /// Performs an authenticated POST with a JSON body and decodes the JSON
    /// response body.
    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, TvdbError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");
        let mut request = self.http.post(&url).json(body);
        request = self.common_headers(request);
        let response = request.send()?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(TvdbError::Status(status));
        }
        Ok(serde_json::from_str(&response.text()?)?)
    }

    fn common_headers(
        &self,
        mut request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        request = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, &self.language);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }
}

/// Applies the best-match tie-break order to a search result.
///
/// Primary name beats alias beats first candidate; matches are
/// case-insensitive and the first one wins.
fn pick_best_match(q: &str, mut candidates: Vec<Series>) -> Result<Series, TvdbError> {
    if candidates.is_empty() {
        return Err(TvdbError::NotFound(q.to_string()));
    }
    let lowered = q.to_lowercase();
    let index = candidates
        .iter()
        .position(|series| series.series_name.to_lowercase() == lowered)
        .or_else(|| {
            candidates.iter().position(|series| {
                series
                    .aliases
                    .iter()
                    .any(|alias| alias.to_lowercase() == lowered)
            })
        })
        .unwrap_or(0);
    // The remaining candidates are dropped, so order no longer matters
    Ok(candidates.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, aliases: &[&str]) -> Series {
        Series {
            id: 1,
            series_name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            ..Series::default()
        }
    }

    #[test]
    fn pick_best_match_prefers_exact_name_over_position() {
        let candidates = vec![
            candidate("Game of Thrones: The Last Watch", &[]),
            candidate("Game of Thrones Academy", &[]),
            candidate("Game of Thrones", &[]),
        ];
        let best = pick_best_match("game of thrones", candidates).unwrap();
        assert_eq!(best.series_name, "Game of Thrones");
    }

    #[test]
    fn pick_best_match_falls_back_to_aliases() {
        let candidates = vec![
            candidate("Some Other Show", &[]),
            candidate("Il Trono di Spade", &["Game of Thrones", "GoT"]),
        ];
        let best = pick_best_match("Game of Thrones", candidates).unwrap();
        assert_eq!(best.series_name, "Il Trono di Spade");
    }

    #[test]
    fn pick_best_match_name_beats_alias() {
        let candidates = vec![
            candidate("Some Other Show", &["Lost"]),
            candidate("Lost", &[]),
        ];
        let best = pick_best_match("lost", candidates).unwrap();
        assert_eq!(best.series_name, "Lost");
    }

    #[test]
    fn pick_best_match_defaults_to_the_first_candidate() {
        let candidates = vec![
            candidate("Lost in Space", &[]),
            candidate("Lost Girl", &[]),
        ];
        let best = pick_best_match("lost", candidates).unwrap();
        assert_eq!(best.series_name, "Lost in Space");
    }

    #[test]
    fn pick_best_match_fails_on_an_empty_candidate_list() {
        let err = pick_best_match("whatever", Vec::new()).unwrap_err();
        assert!(matches!(err, TvdbError::NotFound(name) if name == "whatever"));
    }

    #[test]
    fn episode_query_produces_the_set_filters_only() {
        let query = EpisodeQuery {
            aired_season: Some(2),
            imdb_id: Some("tt0944947".to_string()),
            ..EpisodeQuery::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("airedSeason", "2".to_string()),
                ("imdbId", "tt0944947".to_string()),
            ]
        );
        assert!(EpisodeQuery::default().to_params().is_empty());
    }
}
