use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use scraper::{Html, Node, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;

/// Song metadata as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongHit {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub release_date: Option<String>,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub pageviews: Option<u64>,
    pub annotation_count: Option<u64>,
}

#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Best match for a (title, artist) pair, if any.
    async fn find_song(&self, title: &str, artist: &str) -> anyhow::Result<Option<SongHit>>;
    /// Raw lyrics text of a song page, section headers included.
    async fn lyrics(&self, hit: &SongHit) -> anyhow::Result<Option<String>>;
    async fn search_songs(&self, term: &str, per_page: u32) -> anyhow::Result<Vec<SongHit>>;
    async fn songs_by_genre(&self, genre: &str, per_page: u32) -> anyhow::Result<Vec<SongHit>>;
}

#[derive(Clone)]
pub struct GeniusClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeniusClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let user_agent = format!("mondegreen/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()
            .context("build http client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "genius request");
        let body = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("GET {}", url))?
            .json::<ApiEnvelope<T>>()
            .await
            .with_context(|| format!("decode {}", url))?;
        Ok(body.response)
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    async fn find_song(&self, title: &str, artist: &str) -> anyhow::Result<Option<SongHit>> {
        let hits = self.search_songs(&format!("{} {}", title, artist), 5).await?;
        Ok(best_match(hits, artist))
    }

    async fn lyrics(&self, hit: &SongHit) -> anyhow::Result<Option<String>> {
        let Some(url) = hit.url.as_deref() else {
            return Ok(None);
        };
        let html = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("GET {}", url))?
            .text()
            .await
            .context("read lyrics page")?;
        Ok(extract_lyrics(&html))
    }

    async fn search_songs(&self, term: &str, per_page: u32) -> anyhow::Result<Vec<SongHit>> {
        let data: SearchResponse = self
            .get_json(
                "/api/search/song",
                &[("q", term.to_string()), ("per_page", per_page.to_string())],
            )
            .await?;
        Ok(data.song_hits())
    }

    async fn songs_by_genre(&self, genre: &str, per_page: u32) -> anyhow::Result<Vec<SongHit>> {
        let data: ChartResponse = self
            .get_json(
                "/api/songs/chart",
                &[
                    ("chart_genre", genre.to_string()),
                    ("time_period", "all_time".to_string()),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await?;
        Ok(data.chart_items.into_iter().map(|c| c.item.into()).collect())
    }
}

// ---- wire format ----

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    sections: Vec<Section>,
}

impl SearchResponse {
    fn song_hits(self) -> Vec<SongHit> {
        self.sections
            .into_iter()
            .filter(|s| s.kind == "song")
            .flat_map(|s| s.hits)
            .map(|h| h.result.into())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    result: GeniusSong,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    #[serde(default)]
    chart_items: Vec<ChartItem>,
}

#[derive(Debug, Deserialize)]
struct ChartItem {
    #[serde(default)]
    item: GeniusSong,
}

#[derive(Debug, Default, Deserialize)]
struct GeniusSong {
    title: Option<String>,
    artist_names: Option<String>,
    primary_artist: Option<GeniusArtist>,
    release_date_for_display: Option<String>,
    url: Option<String>,
    song_art_image_thumbnail_url: Option<String>,
    stats: Option<GeniusStats>,
    annotation_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct GeniusArtist {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeniusStats {
    pageviews: Option<u64>,
}

impl From<GeniusSong> for SongHit {
    fn from(s: GeniusSong) -> Self {
        let artist = s
            .artist_names
            .or_else(|| s.primary_artist.and_then(|a| a.name));
        Self {
            title: s.title,
            artist,
            release_date: s.release_date_for_display,
            url: s.url,
            thumbnail_url: s.song_art_image_thumbnail_url,
            pageviews: s.stats.and_then(|st| st.pageviews),
            annotation_count: s.annotation_count,
        }
    }
}

/// First hit crediting the requested artist, else the first hit.
fn best_match(hits: Vec<SongHit>, artist: &str) -> Option<SongHit> {
    let wanted = artist.trim().to_lowercase();
    let idx = hits
        .iter()
        .position(|h| {
            h.artist
                .as_deref()
                .map(|a| !wanted.is_empty() && a.to_lowercase().contains(&wanted))
                .unwrap_or(false)
        })
        .unwrap_or(0);
    hits.into_iter().nth(idx)
}

/// Pulls the text of every lyrics container; `<br>` becomes a newline.
fn extract_lyrics(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(r#"div[data-lyrics-container="true"]"#).ok()?;

    let mut blocks = Vec::new();
    for container in doc.select(&selector) {
        let mut text = String::new();
        for node in container.descendants() {
            match node.value() {
                Node::Text(t) => text.push_str(t),
                Node::Element(e) if e.name() == "br" => text.push('\n'),
                _ => {}
            }
        }
        blocks.push(text);
    }

    let lyrics = blocks.join("\n");
    if lyrics.trim().is_empty() {
        None
    } else {
        Some(lyrics)
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;

    use super::*;

    /// In-memory provider keyed by `"title|artist"`.
    #[derive(Default)]
    pub struct FakeProvider {
        pub songs: HashMap<String, (SongHit, String)>,
        pub search_results: Vec<SongHit>,
        pub fail: bool,
    }

    impl FakeProvider {
        pub fn with_song(mut self, title: &str, artist: &str, cover: &str, lyrics: &str) -> Self {
            let hit = SongHit {
                title: Some(title.into()),
                artist: Some(artist.into()),
                url: Some(format!("https://fake.local/{}", title)),
                thumbnail_url: Some(cover.into()),
                ..SongHit::default()
            };
            self.songs
                .insert(format!("{}|{}", title, artist), (hit, lyrics.into()));
            self
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn check(&self) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("provider timed out");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl LyricsProvider for FakeProvider {
        async fn find_song(&self, title: &str, artist: &str) -> anyhow::Result<Option<SongHit>> {
            self.check()?;
            Ok(self
                .songs
                .get(&format!("{}|{}", title, artist))
                .map(|(hit, _)| hit.clone()))
        }

        async fn lyrics(&self, hit: &SongHit) -> anyhow::Result<Option<String>> {
            self.check()?;
            Ok(self
                .songs
                .values()
                .find(|(h, _)| h.url == hit.url)
                .map(|(_, lyrics)| lyrics.clone()))
        }

        async fn search_songs(&self, _term: &str, per_page: u32) -> anyhow::Result<Vec<SongHit>> {
            self.check()?;
            Ok(self
                .search_results
                .iter()
                .take(per_page as usize)
                .cloned()
                .collect())
        }

        async fn songs_by_genre(&self, genre: &str, per_page: u32) -> anyhow::Result<Vec<SongHit>> {
            self.search_songs(genre, per_page).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_JSON: &str = r#"{
      "meta": {"status": 200},
      "response": {
        "sections": [
          {"type": "top_hit", "hits": [{"result": {"title": "Ignored"}}]},
          {"type": "song", "hits": [
            {"result": {
              "title": "Linger",
              "artist_names": "The Cranberries",
              "release_date_for_display": "February 22, 1993",
              "url": "https://genius.com/The-cranberries-linger-lyrics",
              "song_art_image_thumbnail_url": "https://images.genius.com/x.300x300x1.png",
              "stats": {"pageviews": 912345},
              "annotation_count": 4
            }},
            {"result": {
              "title": "Linger (Live)",
              "artist_names": "The Cranberries",
              "release_date_for_display": null,
              "url": "https://genius.com/The-cranberries-linger-live-lyrics",
              "stats": {}
            }}
          ]}
        ]
      }
    }"#;

    #[test]
    fn search_keeps_only_song_section_in_order() {
        let env: ApiEnvelope<SearchResponse> = serde_json::from_str(SEARCH_JSON).unwrap();
        let hits = env.response.song_hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title.as_deref(), Some("Linger"));
        assert_eq!(hits[0].pageviews, Some(912345));
        assert_eq!(hits[0].annotation_count, Some(4));
        assert_eq!(hits[1].title.as_deref(), Some("Linger (Live)"));
        assert_eq!(hits[1].release_date, None);
        assert_eq!(hits[1].pageviews, None);
        assert_eq!(hits[1].thumbnail_url, None);
    }

    #[test]
    fn chart_items_are_unwrapped() {
        let json = r#"{"response": {"chart_items": [
            {"item": {"title": "Juna", "primary_artist": {"name": "Clairo"}}},
            {"item": {"title": "Cloudbusting", "artist_names": "Kate Bush"}}
        ]}}"#;
        let env: ApiEnvelope<ChartResponse> = serde_json::from_str(json).unwrap();
        let hits: Vec<SongHit> = env.response.chart_items.into_iter().map(|c| c.item.into()).collect();
        assert_eq!(hits[0].artist.as_deref(), Some("Clairo"));
        assert_eq!(hits[1].artist.as_deref(), Some("Kate Bush"));
    }

    #[test]
    fn best_match_prefers_requested_artist() {
        let hits = vec![
            SongHit {
                title: Some("Linger".into()),
                artist: Some("Someone Else".into()),
                ..SongHit::default()
            },
            SongHit {
                title: Some("Linger".into()),
                artist: Some("The Cranberries".into()),
                ..SongHit::default()
            },
        ];
        let hit = best_match(hits.clone(), "the cranberries").unwrap();
        assert_eq!(hit.artist.as_deref(), Some("The Cranberries"));

        let fallback = best_match(hits, "Nobody").unwrap();
        assert_eq!(fallback.artist.as_deref(), Some("Someone Else"));

        assert!(best_match(Vec::new(), "x").is_none());
    }

    #[test]
    fn extract_lyrics_joins_containers_and_breaks() {
        let html = r#"<html><body>
            <div data-lyrics-container="true">[Verse 1]<br>I don't know<br><i>why</i></div>
            <div class="ad">buy stuff</div>
            <div data-lyrics-container="true">[Chorus]<br>Linger</div>
        </body></html>"#;
        let lyrics = extract_lyrics(html).unwrap();
        assert_eq!(lyrics, "[Verse 1]\nI don't know\nwhy\n[Chorus]\nLinger");
    }

    #[test]
    fn extract_lyrics_none_without_containers() {
        assert!(extract_lyrics("<html><body><p>nothing</p></body></html>").is_none());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GeniusClient::new(&ProviderConfig {
            base_url: "https://genius.com/".into(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(client.base_url, "https://genius.com");
    }

    mod over_http {
        use std::collections::HashMap;

        use axum::{
            extract::Query,
            http::StatusCode,
            response::{Html, IntoResponse},
            routing::get,
            Json, Router,
        };
        use serde_json::json;

        use super::*;

        const LYRICS_PAGE: &str = r#"<html><body>
            <div data-lyrics-container="true">[Verse 1]<br>If you, if you could return</div>
        </body></html>"#;

        /// Genius-shaped endpoints on a local port; returns the client pointed at them.
        async fn local_genius() -> GeniusClient {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());

            let page = format!("{}/linger-lyrics", base);
            let search = move |Query(q): Query<HashMap<String, String>>| {
                let page = page.clone();
                async move {
                    let term = q.get("q").cloned().unwrap_or_default();
                    Json(json!({"response": {"sections": [{"type": "song", "hits": [
                        {"result": {"title": term, "artist_names": "Someone Else"}},
                        {"result": {
                            "title": "Linger",
                            "artist_names": "The Cranberries",
                            "url": page,
                            "song_art_image_thumbnail_url": "https://images.genius.com/linger.png"
                        }}
                    ]}]}}))
                }
            };
            let chart = |Query(q): Query<HashMap<String, String>>| async move {
                let genre = q.get("chart_genre").cloned().unwrap_or_default();
                if genre == "broken" {
                    return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
                }
                Json(json!({"response": {"chart_items": [
                    {"item": {"title": genre, "primary_artist": {"name": "Chart Artist"}}}
                ]}}))
                .into_response()
            };

            let app = Router::new()
                .route("/api/search/song", get(search))
                .route("/api/songs/chart", get(chart))
                .route("/linger-lyrics", get(|| async { Html(LYRICS_PAGE) }));
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            GeniusClient::new(&ProviderConfig { base_url: base, timeout_secs: 5 }).unwrap()
        }

        #[tokio::test]
        async fn search_sends_term_and_decodes_hits() {
            let client = local_genius().await;
            let hits = client.search_songs("linger", 9).await.unwrap();
            assert_eq!(hits.len(), 2);
            assert_eq!(hits[0].title.as_deref(), Some("linger"));
            assert_eq!(hits[1].artist.as_deref(), Some("The Cranberries"));
        }

        #[tokio::test]
        async fn find_song_then_lyrics_scrapes_the_song_page() {
            let client = local_genius().await;
            let hit = client.find_song("Linger", "the cranberries").await.unwrap().unwrap();
            assert_eq!(hit.artist.as_deref(), Some("The Cranberries"));
            assert_eq!(
                hit.thumbnail_url.as_deref(),
                Some("https://images.genius.com/linger.png")
            );

            let lyrics = client.lyrics(&hit).await.unwrap();
            assert_eq!(lyrics.as_deref(), Some("[Verse 1]\nIf you, if you could return"));
        }

        #[tokio::test]
        async fn lyrics_without_url_is_none() {
            let client = local_genius().await;
            assert!(client.lyrics(&SongHit::default()).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn chart_sends_genre_and_surfaces_http_errors() {
            let client = local_genius().await;
            let hits = client.songs_by_genre("rock", 9).await.unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].title.as_deref(), Some("rock"));
            assert_eq!(hits[0].artist.as_deref(), Some("Chart Artist"));

            assert!(client.songs_by_genre("broken", 9).await.is_err());
        }
    }
}
