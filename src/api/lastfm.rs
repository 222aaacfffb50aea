//! Last.fm web service client.
//!
//! Wraps the read-only `user.getTop*` methods of the public API
//! (ws.audioscrobbler.com) and plain HTTP downloads for cover art.
//! Only the API key is needed for these methods; the secret is kept with
//! the credentials for callers that share them with signed requests.

use std::sync::LazyLock;

use async_trait::async_trait;
use bytes::Bytes;
use regex::Regex;
use reqwest::{header, Client, Url};
use serde_json::Value;
use tracing::{debug, error, warn};
use url::form_urlencoded;

use crate::api::ChartSource;
use crate::config::Credentials;
use crate::converters;
use crate::error::{CollageError, Result};
use crate::models::{Entity, EntityKind, Period};

/// Base URL for the Last.fm API.
const API_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Base URL for the Last.fm website (artist pages).
const WEBSITE_BASE_URL: &str = "https://www.last.fm";

const USER_AGENT: &str = concat!("lastfm-collage/", env!("CARGO_PKG_VERSION"));

/// Hero image element on an artist page.
static ARTIST_IMAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[^>]*class="[^"]*header-new-background-image[^"]*"[^>]*>"#)
        .expect("valid artist image regex")
});

static CONTENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"content="([^"]+)""#).expect("valid content regex"));

/// Last.fm API client.
///
/// # Example
///
/// ```rust,no_run
/// use lastfm_collage::{Credentials, EntityKind, LastfmClient, Period};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = LastfmClient::new(Credentials::new("api_key", "api_secret"))?;
///     let albums = client
///         .get_top_entities(EntityKind::Album, "rj", Period::Month, 9)
///         .await?;
///     for album in albums {
///         println!("#{} {} ({} plays)", album.rank, album.title(), album.playcount);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LastfmClient {
    client: Client,
    credentials: Credentials,
    api_base_url: String,
    website_base_url: String,
}

impl LastfmClient {
    /// Create a client against the public Last.fm endpoints.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                CollageError::ServiceUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credentials,
            api_base_url: API_BASE_URL.to_string(),
            website_base_url: WEBSITE_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    /// Point artist page lookups at a different website root.
    pub fn with_website_url(mut self, website_url: impl Into<String>) -> Self {
        self.website_base_url = website_url.into();
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Call an API method and return the JSON body.
    ///
    /// Error payloads (`{"error": 6, "message": "..."}`) are mapped via
    /// [`CollageError::from_api_code`].
    async fn get_api(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {} method={} params={:?}", self.api_base_url, method, params);

        let response = self
            .client
            .get(&self.api_base_url)
            .query(&[
                ("method", method),
                ("api_key", self.credentials.api_key()),
                ("format", "json"),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| CollageError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CollageError::ServiceUnavailable(e.to_string()))?;

        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                return Err(CollageError::ServiceUnavailable(format!(
                    "HTTP {}: unreadable response ({})",
                    status, e
                )));
            }
        };

        if let Some(code) = data.get("error").and_then(|c| c.as_i64()) {
            let message = data
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            error!("Last.fm API error {}: {}", code, message);
            return Err(CollageError::from_api_code(code, message));
        }

        if !status.is_success() {
            return Err(CollageError::ServiceUnavailable(format!("HTTP {}", status)));
        }

        Ok(data)
    }

    /// Get a user's top albums, artists or tracks for a period.
    ///
    /// Artists without usable artwork in the API response get their image
    /// from the artist's page on the website, tracks from their album.
    pub async fn get_top_entities(
        &self,
        kind: EntityKind,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Entity>> {
        let limit_str = limit.to_string();
        let response = self
            .get_api(
                kind.api_method(),
                &[
                    ("user", username),
                    ("period", period.as_str()),
                    ("limit", &limit_str),
                ],
            )
            .await?;

        let mut entities = converters::parse_top_entities(&response, kind, limit as usize)?;
        debug!("Fetched {} top {}s for {}", entities.len(), kind, username);

        for entity in entities.iter_mut().filter(|e| !e.has_artwork()) {
            entity.image_url = match (kind, entity.artist.as_deref()) {
                (EntityKind::Artist, _) => self.artist_image_url(&entity.name).await,
                (EntityKind::Track, Some(artist)) => {
                    self.track_image_url(artist, &entity.name).await
                }
                _ => None,
            };
        }

        Ok(entities)
    }

    /// Look up a track's album cover through `track.getInfo`.
    ///
    /// Top-track lists only carry the generic star. Any failure here
    /// yields `None` so the collage falls back to the placeholder.
    pub async fn track_image_url(&self, artist: &str, track: &str) -> Option<String> {
        let info = match self
            .get_api("track.getinfo", &[("artist", artist), ("track", track)])
            .await
        {
            Ok(info) => info,
            Err(e) => {
                warn!("Could not get track info for {} - {}: {}", artist, track, e);
                return None;
            }
        };

        let image_url = converters::parse_track_album_image(&info);
        if image_url.is_none() {
            warn!("No album image found for {} - {}", artist, track);
        }
        image_url
    }

    /// Look up an artist's hero image on their Last.fm page.
    ///
    /// The API only serves a generic star for artists. Any failure here
    /// yields `None` so the collage falls back to the placeholder.
    pub async fn artist_image_url(&self, artist: &str) -> Option<String> {
        let url = match Url::parse(&artist_page_url(&self.website_base_url, artist)) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid website URL {}: {}", self.website_base_url, e);
                return None;
            }
        };
        debug!("GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not load artist page for {}: {}", artist, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Artist page for {} returned HTTP {}", artist, response.status());
            return None;
        }

        let page = match response.text().await {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not read artist page for {}: {}", artist, e);
                return None;
            }
        };

        let image_url = find_artist_image(&page);
        if image_url.is_none() {
            warn!("No artist image found for {}", artist);
        }
        image_url
    }

    /// Download image bytes, checking status and content type.
    pub async fn get_image(&self, url: &str) -> Result<Bytes> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CollageError::image_fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollageError::image_fetch(url, format!("HTTP {}", status)));
        }

        if let Some(content_type) = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.starts_with("image/") {
                return Err(CollageError::image_fetch(
                    url,
                    format!("unexpected content type {}", content_type),
                ));
            }
        }

        response
            .bytes()
            .await
            .map_err(|e| CollageError::image_fetch(url, e))
    }
}

/// Artist page URL. The site reads `+` in the path as a space, so the name
/// is form-encoded (`+` for spaces, `%2B` for plus signs).
fn artist_page_url(website_base_url: &str, artist: &str) -> String {
    let name: String = form_urlencoded::byte_serialize(artist.as_bytes()).collect();
    format!("{}/music/{}", website_base_url.trim_end_matches('/'), name)
}

/// Extract the hero image URL from artist page HTML.
fn find_artist_image(page: &str) -> Option<String> {
    let tag = ARTIST_IMAGE_TAG.find(page)?;
    CONTENT_ATTR
        .captures(tag.as_str())
        .map(|caps| caps[1].replace("&amp;", "&"))
        .filter(|url| !converters::is_placeholder_url(url))
}

#[async_trait]
impl ChartSource for LastfmClient {
    async fn fetch_top_entities(
        &self,
        kind: EntityKind,
        username: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Entity>> {
        self.get_top_entities(kind, username, period, limit).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Bytes> {
        self.get_image(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    type Reply = (u16, &'static str, Vec<u8>);

    /// Minimal HTTP/1.1 server on an ephemeral port. `handler` gets the
    /// request target (path and query) and returns status, content type
    /// and body. Returns the base URL.
    async fn serve<F>(handler: F) -> String
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let target = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, content_type, body) = (*handler)(target);
                    let head = format!(
                        "HTTP/1.1 {} OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status,
                        content_type,
                        body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn json_reply(status: u16, body: serde_json::Value) -> Reply {
        (status, "application/json", body.to_string().into_bytes())
    }

    fn client_for(base: &str) -> LastfmClient {
        LastfmClient::new(Credentials::new("key", "secret"))
            .unwrap()
            .with_base_url(format!("{}/2.0/", base))
            .with_website_url(base)
    }

    fn star_images() -> serde_json::Value {
        let star = "https://lastfm.freetls.fastly.net/i/u/300x300/2a96cbd8b46e442fc41c2b86b821562f.png";
        serde_json::json!([
            {"size": "small", "#text": star},
            {"size": "extralarge", "#text": star}
        ])
    }

    #[tokio::test]
    async fn test_error_payloads_map_to_taxonomy() {
        let base = serve(|target| {
            if target.contains("user=nobody") {
                json_reply(404, serde_json::json!({"error": 6, "message": "User not found"}))
            } else {
                json_reply(403, serde_json::json!({"error": 10, "message": "Invalid API key"}))
            }
        })
        .await;
        let client = client_for(&base);

        let err = client
            .get_top_entities(EntityKind::Album, "rj", Period::Week, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, CollageError::Authentication(ref m) if m == "Invalid API key"));

        let err = client
            .get_top_entities(EntityKind::Album, "nobody", Period::Week, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, CollageError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_unavailable() {
        let base = serve(|_| (502, "text/html", b"<html>Bad Gateway</html>".to_vec())).await;
        let err = client_for(&base)
            .get_top_entities(EntityKind::Artist, "rj", Period::Week, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, CollageError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_top_albums_request_and_parse() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_server = Arc::clone(&seen);
        let base = serve(move |target| {
            seen_by_server.lock().unwrap().push(target.to_string());
            json_reply(
                200,
                serde_json::json!({
                    "topalbums": {"album": [{
                        "name": "Mezzanine",
                        "playcount": "31",
                        "artist": {"name": "Massive Attack"},
                        "image": [{"size": "extralarge", "#text": "https://x/m.png"}],
                        "@attr": {"rank": "1"}
                    }]}
                }),
            )
        })
        .await;

        let albums = client_for(&base)
            .get_top_entities(EntityKind::Album, "rj", Period::Quarter, 9)
            .await
            .unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].image_url.as_deref(), Some("https://x/m.png"));

        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        for param in [
            "method=user.gettopalbums",
            "api_key=key",
            "format=json",
            "user=rj",
            "period=3month",
            "limit=9",
        ] {
            assert!(requests[0].contains(param), "{} missing {}", requests[0], param);
        }
    }

    #[tokio::test]
    async fn test_track_artwork_comes_from_album() {
        let base = serve(|target| {
            if target.contains("method=track.getinfo") && target.contains("track=Teardrop") {
                json_reply(
                    200,
                    serde_json::json!({"track": {"name": "Teardrop", "album": {
                        "title": "Mezzanine",
                        "image": [{"size": "extralarge", "#text": "https://x/mezzanine.png"}]
                    }}}),
                )
            } else if target.contains("method=track.getinfo") {
                json_reply(404, serde_json::json!({"error": 6, "message": "Track not found"}))
            } else {
                json_reply(
                    200,
                    serde_json::json!({"toptracks": {"track": [
                        {
                            "name": "Teardrop",
                            "playcount": "12",
                            "artist": {"name": "Massive Attack"},
                            "image": star_images(),
                            "@attr": {"rank": "1"}
                        },
                        {
                            "name": "Unknown Demo",
                            "playcount": "3",
                            "artist": {"name": "Nobody"},
                            "image": star_images(),
                            "@attr": {"rank": "2"}
                        }
                    ]}}),
                )
            }
        })
        .await;

        let tracks = client_for(&base)
            .get_top_entities(EntityKind::Track, "rj", Period::Week, 2)
            .await
            .unwrap();
        assert_eq!(
            tracks[0].image_url.as_deref(),
            Some("https://x/mezzanine.png")
        );
        // Lookup failure degrades to no artwork.
        assert_eq!(tracks[1].image_url, None);
    }

    #[tokio::test]
    async fn test_image_download_checks() {
        let base = serve(|target| match target {
            "/cover.png" => (200, "image/png", vec![0x89, b'P', b'N', b'G']),
            "/page.png" => (200, "text/html", b"<html></html>".to_vec()),
            _ => (404, "text/plain", b"missing".to_vec()),
        })
        .await;
        let client = client_for(&base);

        let bytes = client.get_image(&format!("{}/cover.png", base)).await.unwrap();
        assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);

        let err = client
            .get_image(&format!("{}/page.png", base))
            .await
            .unwrap_err();
        assert!(
            matches!(err, CollageError::ImageFetch { ref reason, .. } if reason.contains("text/html"))
        );

        let err = client
            .get_image(&format!("{}/gone.png", base))
            .await
            .unwrap_err();
        assert!(matches!(err, CollageError::ImageFetch { ref reason, .. } if reason.contains("404")));
    }

    #[tokio::test]
    async fn test_artist_page_lookup() {
        let base = serve(|target| match target {
            "/music/Portishead" => (
                200,
                "text/html",
                br#"<div class="header-new-background-image" content="https://x/p.jpg"></div>"#
                    .to_vec(),
            ),
            "/music/Blank+Page" => (200, "text/html", b"<html><body></body></html>".to_vec()),
            _ => (404, "text/html", b"not found".to_vec()),
        })
        .await;
        let client = client_for(&base);

        assert_eq!(
            client.artist_image_url("Portishead").await.as_deref(),
            Some("https://x/p.jpg")
        );
        assert_eq!(client.artist_image_url("Blank Page").await, None);
        assert_eq!(client.artist_image_url("Nobody At All").await, None);
    }

    #[test]
    fn test_artist_page_url_encoding() {
        assert_eq!(
            artist_page_url("https://www.last.fm/", "Mumford + Sons"),
            "https://www.last.fm/music/Mumford+%2B+Sons"
        );
        assert_eq!(
            artist_page_url("https://www.last.fm", "AC/DC"),
            "https://www.last.fm/music/AC%2FDC"
        );
    }

    #[test]
    fn test_find_artist_image() {
        let page = r#"
            <div class="header-new-background-image"
                 itemprop="image"
                 content="https://lastfm.freetls.fastly.net/i/u/ar0/abc.jpg"
                 style="background-image: url(https://lastfm.freetls.fastly.net/i/u/ar0/abc.jpg);">
            </div>
        "#;
        assert_eq!(
            find_artist_image(page).as_deref(),
            Some("https://lastfm.freetls.fastly.net/i/u/ar0/abc.jpg")
        );
    }

    #[test]
    fn test_find_artist_image_missing() {
        assert_eq!(find_artist_image("<html><body>nothing</body></html>"), None);
    }

    #[test]
    fn test_client_builders() {
        let client = LastfmClient::new(Credentials::new("key", "secret"))
            .unwrap()
            .with_base_url("http://localhost:1/2.0/")
            .with_website_url("http://localhost:1");
        assert_eq!(client.api_base_url, "http://localhost:1/2.0/");
        assert_eq!(client.website_base_url, "http://localhost:1");
        assert_eq!(client.credentials().api_key(), "key");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = LastfmClient::new(Credentials::new("key", "secret"))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/2.0/");
        let err = client
            .get_top_entities(EntityKind::Album, "rj", Period::Week, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, CollageError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_image_is_image_fetch_error() {
        let client = LastfmClient::new(Credentials::new("key", "secret")).unwrap();
        let err = client
            .get_image("http://127.0.0.1:9/cover.png")
            .await
            .unwrap_err();
        assert!(matches!(err, CollageError::ImageFetch { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_artist_page_degrades_to_none() {
        let client = LastfmClient::new(Credentials::new("key", "secret"))
            .unwrap()
            .with_website_url("http://127.0.0.1:9");
        assert_eq!(client.artist_image_url("Björk").await, None);
    }
}
