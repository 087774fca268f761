//! Wire formats of Spotify Web API responses.

use super::resource::{Album, Artist, ArtistRef, Page, SavedAlbum, User};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    #[allow(dead_code)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub artists: Paging<ArtistModel>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Followers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Image {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub followers: Followers,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimplifiedArtistModel {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub album_type: String,
    pub release_date: Option<String>,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtistModel>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SavedAlbumModel {
    pub added_at: Option<String>,
    pub album: AlbumModel,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserModel {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub product: Option<String>,
}

impl From<ArtistModel> for Artist {
    fn from(model: ArtistModel) -> Self {
        Artist {
            id: model.id,
            name: model.name,
            genres: model.genres,
            followers: model.followers.total,
            popularity: model.popularity,
            image_url: model.images.into_iter().next().map(|image| image.url),
            url: model.external_urls.spotify,
        }
    }
}

impl From<AlbumModel> for Album {
    fn from(model: AlbumModel) -> Self {
        Album {
            id: model.id,
            name: model.name,
            album_type: model.album_type,
            release_date: model.release_date,
            total_tracks: model.total_tracks,
            artists: model
                .artists
                .into_iter()
                .map(|artist| ArtistRef {
                    id: artist.id.unwrap_or_default(),
                    name: artist.name,
                })
                .collect(),
            url: model.external_urls.spotify,
        }
    }
}

impl From<SavedAlbumModel> for SavedAlbum {
    fn from(model: SavedAlbumModel) -> Self {
        SavedAlbum {
            added_at: model.added_at,
            album: model.album.into(),
        }
    }
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            display_name: model.display_name,
            email: model.email,
            country: model.country,
            product: model.product,
        }
    }
}

impl<M> Paging<M> {
    /// Convert a wire page into a resource page.
    ///
    pub fn into_page<T: From<M>>(self) -> Page<T> {
        Page {
            items: self.items.into_iter().map(T::from).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
