//! Spotify link utilities.
//!
//! This module recognizes artist links pasted into the search box, such as
//! "https://open.spotify.com/artist/{id}" or "spotify:artist:{id}".

use log::*;
use regex::Regex;

/// Extract the artist ID from a Spotify artist link or URI.
///
/// # Arguments
/// * `text` - The text to inspect, typically the search query
///
/// # Returns
/// The base-62 artist ID, or `None` if the text is not an artist link.
pub fn artist_id(text: &str) -> Option<String> {
    let patterns = [
        r"^https?://open\.spotify\.com/(?:intl-[a-z]{2}/)?artist/([0-9A-Za-z]{22})(?:[/?#].*)?$",
        r"^spotify:artist:([0-9A-Za-z]{22})$",
    ];

    let text = text.trim();
    for pattern in patterns {
        let re = match Regex::new(pattern) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to compile regex pattern '{}': {}", pattern, e);
                continue;
            }
        };
        if let Some(id) = re.captures(text).and_then(|caps| caps.get(1)) {
            return Some(id.as_str().to_string());
        }
    }
    None
}

/// Return the open.spotify.com link for an album ID.
///
pub fn album_url(album_id: &str) -> String {
    format!("https://open.spotify.com/album/{}", album_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_id_from_web_link() {
        assert_eq!(
            artist_id("https://open.spotify.com/artist/0LcJLqbBmaGUft1e9Mm8HV?si=abc"),
            Some("0LcJLqbBmaGUft1e9Mm8HV".to_string())
        );
        assert_eq!(
            artist_id("  https://open.spotify.com/intl-de/artist/0LcJLqbBmaGUft1e9Mm8HV "),
            Some("0LcJLqbBmaGUft1e9Mm8HV".to_string())
        );
    }

    #[test]
    fn test_artist_id_from_uri() {
        assert_eq!(
            artist_id("spotify:artist:0LcJLqbBmaGUft1e9Mm8HV"),
            Some("0LcJLqbBmaGUft1e9Mm8HV".to_string())
        );
    }

    #[test]
    fn test_artist_id_rejects_other_text() {
        assert_eq!(artist_id("abba"), None);
        assert_eq!(artist_id("spotify:album:0LcJLqbBmaGUft1e9Mm8HV"), None);
        assert_eq!(artist_id("https://open.spotify.com/artist/short"), None);
    }

    #[test]
    fn test_album_url() {
        assert_eq!(
            album_url("4aawyAB9vmqN3uQ7FjRGTy"),
            "https://open.spotify.com/album/4aawyAB9vmqN3uQ7FjRGTy"
        );
    }
}
