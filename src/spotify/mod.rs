mod client;
mod error;
mod models;
mod resource;
mod retry;

use client::NO_PARAMS;
pub use client::{Client, SharedToken, StaticToken, TokenProvider, UnauthorizedCallback};
pub use error::{classify, ErrorKind, SpotifyError};
pub use resource::*;
pub use retry::{retry_with_backoff, RetryConfig};

use log::*;
use models::{AlbumModel, ArtistModel, Paging, SavedAlbumModel, SearchResponse, UserModel};
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

/// Maximum number of album IDs accepted by the library endpoints.
///
const MAX_IDS_PER_REQUEST: usize = 20;

/// Page size used when walking an artist's discography.
///
const ARTIST_ALBUMS_PAGE_SIZE: u32 = 50;

/// Responsible for asynchronous interaction with the Spotify Web API including
/// transformation of response data into explicitly-defined types. Every call
/// goes through the retry policy.
///
pub struct Spotify {
    client: Client,
    retry: RetryConfig,
    market: String,
    include_groups: String,
}

impl Spotify {
    /// Returns a new instance around an explicitly constructed client.
    ///
    pub fn new(client: Client, retry: RetryConfig) -> Spotify {
        debug!(
            "Initializing Spotify client for {} with {} retries...",
            client.base_url, retry.max_retries
        );
        Spotify {
            client,
            retry,
            market: "US".to_string(),
            include_groups: "album,single".to_string(),
        }
    }

    /// Set the market and album groups used for artist discographies.
    ///
    pub fn with_catalog(mut self, market: &str, include_groups: &str) -> Spotify {
        self.market = market.to_owned();
        self.include_groups = include_groups.to_owned();
        self
    }

    /// Returns the current user's profile.
    ///
    pub async fn me(&self) -> Result<User, SpotifyError> {
        debug!("Requesting current user profile...");
        let client = &self.client;
        let data: UserModel = retry_with_backoff(&self.retry, || client.get("me", NO_PARAMS)).await?;
        Ok(data.into())
    }

    /// Returns one page of artists matching the query.
    ///
    pub async fn search_artists(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Artist>, SpotifyError> {
        debug!(
            "Searching artists for '{}' (limit {}, offset {})...",
            query, limit, offset
        );
        let client = &self.client;
        let params = [
            ("q", query.to_string()),
            ("type", "artist".to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let data: SearchResponse =
            retry_with_backoff(&self.retry, || client.get("search", &params)).await?;
        debug!(
            "Search for '{}' returned {} of {} artists",
            query,
            data.artists.items.len(),
            data.artists.total
        );
        Ok(data.artists.into_page())
    }

    /// Returns the artist with the given ID.
    ///
    pub async fn artist(&self, id: &str) -> Result<Artist, SpotifyError> {
        debug!("Requesting artist {}...", id);
        let client = &self.client;
        let path = format!("artists/{}", id);
        let data: ArtistModel = retry_with_backoff(&self.retry, || client.get(&path, NO_PARAMS)).await?;
        Ok(data.into())
    }

    /// Returns every album of the artist in the configured groups, walking the
    /// listing until a short page.
    ///
    pub async fn artist_albums(&self, id: &str) -> Result<Vec<Album>, SpotifyError> {
        debug!(
            "Requesting albums for artist {} (groups {}, market {})...",
            id, self.include_groups, self.market
        );
        let client = &self.client;
        let path = format!("artists/{}/albums", id);
        let mut albums = Vec::new();
        let mut offset = 0;

        loop {
            let params = [
                ("include_groups", self.include_groups.clone()),
                ("market", self.market.clone()),
                ("limit", ARTIST_ALBUMS_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ];
            let page: Paging<AlbumModel> =
                retry_with_backoff(&self.retry, || client.get(&path, &params)).await?;
            let page_size = page.items.len() as u32;
            albums.extend(page.items.into_iter().map(Album::from));

            debug!(
                "Fetched {} albums at offset {} (total so far: {})",
                page_size,
                offset,
                albums.len()
            );

            if page_size < ARTIST_ALBUMS_PAGE_SIZE || albums.len() as u32 >= page.total {
                break;
            }
            offset += page_size;
        }

        Ok(albums)
    }

    /// Returns one page of the user's saved albums.
    ///
    pub async fn saved_albums(&self, limit: u32, offset: u32) -> Result<Page<SavedAlbum>, SpotifyError> {
        debug!("Requesting saved albums (limit {}, offset {})...", limit, offset);
        let client = &self.client;
        let params = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let data: Paging<SavedAlbumModel> =
            retry_with_backoff(&self.retry, || client.get("me/albums", &params)).await?;
        Ok(data.into_page())
    }

    /// Save albums to the user's library.
    ///
    pub async fn save_albums(&self, ids: &[String]) -> Result<(), SpotifyError> {
        debug!("Saving albums {:?}...", ids);
        let client = &self.client;
        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let body = json!({ "ids": chunk });
            retry_with_backoff(&self.retry, || client.put("me/albums", body.clone())).await?;
        }
        Ok(())
    }

    /// Remove albums from the user's library.
    ///
    pub async fn remove_albums(&self, ids: &[String]) -> Result<(), SpotifyError> {
        debug!("Removing albums {:?}...", ids);
        let client = &self.client;
        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let body = json!({ "ids": chunk });
            retry_with_backoff(&self.retry, || client.delete("me/albums", body.clone())).await?;
        }
        Ok(())
    }

    /// Returns, for each album ID in order, whether it is in the user's library.
    ///
    pub async fn albums_saved(&self, ids: &[String]) -> Result<Vec<bool>, SpotifyError> {
        let client = &self.client;
        let mut saved = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let params = [("ids", chunk.join(","))];
            let flags: Vec<bool> =
                retry_with_backoff(&self.retry, || client.get("me/albums/contains", &params))
                    .await?;
            saved.extend(flags);
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::uuid::UUIDv4;
    use fake::{Fake, Faker};
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_factor: 2.0,
        }
    }

    fn spotify(server: &MockServer, token: &str) -> Spotify {
        let client = Client::new(
            &server.base_url(),
            Arc::new(StaticToken(token.to_string())),
            Duration::from_secs(10),
        )
        .unwrap();
        Spotify::new(client, fast_retry())
    }

    fn artist_json(artist: &Artist) -> serde_json::Value {
        json!({
            "id": artist.id,
            "name": artist.name,
            "genres": artist.genres,
            "followers": { "href": null, "total": artist.followers },
            "popularity": artist.popularity,
            "images": [],
            "external_urls": { "spotify": artist.url },
            "type": "artist",
        })
    }

    fn album_json(id: &str, artist: Option<&str>) -> serde_json::Value {
        let artists = match artist {
            Some(name) => json!([{ "id": format!("{}-id", name), "name": name }]),
            None => json!([]),
        };
        json!({
            "id": id,
            "name": format!("Album {}", id),
            "album_type": "album",
            "release_date": "2020-01-01",
            "total_tracks": 12,
            "artists": artists,
            "external_urls": { "spotify": format!("https://open.spotify.com/album/{}", id) },
        })
    }

    #[tokio::test]
    async fn me_success() {
        let token: Uuid = UUIDv4.fake();
        let user: User = Faker.fake();

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/me")
                    .header("Authorization", &format!("Bearer {}", &token));
                then.status(200).json_body(json!({
                    "id": user.id,
                    "display_name": user.display_name,
                    "email": user.email,
                    "country": user.country,
                    "product": user.product,
                }));
            })
            .await;

        let me = spotify(&server, &token.to_string()).me().await.unwrap();
        assert_eq!(me, user);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn me_unauthorized_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/me");
                then.status(401);
            })
            .await;

        let result = spotify(&server, "").me().await;
        assert!(matches!(result, Err(SpotifyError::Authentication { .. })));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn search_artists_success() {
        let token: Uuid = UUIDv4.fake();
        let artists: [Artist; 2] = Faker.fake();

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/search")
                    .header("Authorization", &format!("Bearer {}", &token))
                    .query_param("q", "test")
                    .query_param("type", "artist")
                    .query_param("limit", "20")
                    .query_param("offset", "0");
                then.status(200).json_body(json!({
                    "artists": {
                        "items": [artist_json(&artists[0]), artist_json(&artists[1])],
                        "total": 2,
                        "limit": 20,
                        "offset": 0,
                    }
                }));
            })
            .await;

        let page = spotify(&server, &token.to_string())
            .search_artists("test", 20, 0)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, artists[0].id);
        assert_eq!(page.items[1].followers, artists[1].followers);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/artists/abc");
                then.status(503);
            })
            .await;

        let result = spotify(&server, "token").artist("abc").await;
        assert!(matches!(result, Err(SpotifyError::Server { status: 503, .. })));
        // one attempt plus two retries
        mock.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn artist_not_found() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/artists/missing");
                then.status(404).json_body(
                    json!({ "error": { "status": 404, "message": "non existing id" } }),
                );
            })
            .await;

        let result = spotify(&server, "token").artist("missing").await;
        assert!(matches!(result, Err(SpotifyError::NotFound { .. })));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn artist_albums_uses_catalog_options() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/artists/abba/albums")
                    .query_param("include_groups", "album")
                    .query_param("market", "SE")
                    .query_param("offset", "0");
                then.status(200).json_body(json!({
                    "items": [album_json("one", Some("ABBA")), album_json("two", Some("ABBA"))],
                    "total": 2,
                    "limit": 50,
                    "offset": 0,
                }));
            })
            .await;

        let albums = spotify(&server, "token")
            .with_catalog("SE", "album")
            .artist_albums("abba")
            .await
            .unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[1].id, "two");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn saved_albums_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/me/albums")
                    .query_param("limit", "50")
                    .query_param("offset", "50");
                then.status(200).json_body(json!({
                    "items": [
                        { "added_at": "2024-01-01T00:00:00Z", "album": album_json("x", None) }
                    ],
                    "total": 51,
                    "limit": 50,
                    "offset": 50,
                }));
            })
            .await;

        let page = spotify(&server, "token").saved_albums(50, 50).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.offset, 50);
        assert!(page.items[0].album.artists.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn save_and_remove_albums() {
        let server = MockServer::start_async().await;
        let save = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/me/albums")
                    .json_body(json!({ "ids": ["album1"] }));
                then.status(200);
            })
            .await;
        let remove = server
            .mock_async(|when, then| {
                when.method("DELETE")
                    .path("/me/albums")
                    .json_body(json!({ "ids": ["album1"] }));
                then.status(200);
            })
            .await;

        let spotify = spotify(&server, "token");
        let ids = vec!["album1".to_string()];
        spotify.save_albums(&ids).await.unwrap();
        spotify.remove_albums(&ids).await.unwrap();
        save.assert_async().await;
        remove.assert_async().await;
    }

    #[tokio::test]
    async fn albums_saved_preserves_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/me/albums/contains")
                    .query_param("ids", "a,b,c");
                then.status(200).json_body(json!([true, false, true]));
            })
            .await;

        let ids: Vec<String> = ["a", "b", "c"].iter().map(|id| id.to_string()).collect();
        let flags = spotify(&server, "token").albums_saved(&ids).await.unwrap();
        assert_eq!(flags, vec![true, false, true]);
        mock.assert_async().await;
    }
}
