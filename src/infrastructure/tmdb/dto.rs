use serde::Deserialize;

use crate::domain::entities::{CatalogItem, CatalogPage, ItemId, VideoReference};

/// Paged movie listing (`/movie/popular`, `/search/movie`).
#[derive(Debug, Deserialize)]
pub struct MovieListResponse {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MovieResponse>,
}

/// Single movie record.
#[derive(Debug, Deserialize)]
pub struct MovieResponse {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    /// Present only when the request appended `videos`.
    #[serde(default)]
    pub videos: Option<VideoListResponse>,
}

/// Video listing (`/movie/{id}/videos`).
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub results: Vec<VideoResponse>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResponse {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<VideoResponse> for VideoReference {
    fn from(video: VideoResponse) -> Self {
        Self {
            site: video.site,
            kind: video.kind,
            key: video.key,
            name: video.name,
        }
    }
}

impl From<MovieResponse> for CatalogItem {
    fn from(movie: MovieResponse) -> Self {
        Self {
            id: ItemId(movie.id),
            title: movie.title,
            synopsis: movie.overview.unwrap_or_default(),
            poster_path: movie.poster_path.filter(|path| !path.is_empty()),
            rating: movie.vote_average.clamp(0.0, 10.0),
            videos: movie
                .videos
                .map(|list| list.results.into_iter().map(Into::into).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<MovieListResponse> for CatalogPage {
    // An empty search reports zero total pages upstream.
    fn from(list: MovieListResponse) -> Self {
        Self {
            page_number: list.page.max(1),
            total_pages: list.total_pages.max(1),
            items: list.results.into_iter().map(Into::into).collect(),
        }
    }
}
