use fake::Dummy;

/// Defines user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub product: Option<String>, // premium, free, open
}

impl User {
    /// Return the display name, falling back to the user ID.
    ///
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Defines artist data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub followers: u64,
    pub popularity: u32, // 0-100
    pub image_url: Option<String>,
    pub url: Option<String>, // open.spotify.com link
}

/// Defines the artist reference embedded in albums.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// Defines album data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: String, // album, single, compilation
    pub release_date: Option<String>, // YYYY, YYYY-MM or YYYY-MM-DD
    pub total_tracks: u32,
    pub artists: Vec<ArtistRef>,
    pub url: Option<String>,
}

impl Album {
    /// Return the year part of the release date.
    ///
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }
}

/// Defines an album in the user's library.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct SavedAlbum {
    pub added_at: Option<String>,
    pub album: Album,
}

/// Defines one page of an offset-paginated listing.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

impl<T> Page<T> {
    /// Return the number of pages needed for all results.
    ///
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }
}
