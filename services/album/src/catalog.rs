//! Static photo catalog served by `GET /media/photos`
//!
//! The album contents are fixed configuration: each entry points at a
//! media URL served by this process, plus display metadata.

use serde::Serialize;
use std::sync::OnceLock;

/// One catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct PhotoEntry {
    pub id: i64,
    pub url: &'static str,
    pub caption: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'static str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<&'static str>,
}

const fn photo(id: i64, url: &'static str, caption: &'static str, date: &'static str) -> PhotoEntry {
    PhotoEntry {
        id,
        url,
        caption,
        date: Some(date),
        media_type: None,
    }
}

/// The album catalog, built once
pub fn photo_catalog() -> &'static [PhotoEntry] {
    static CATALOG: OnceLock<Vec<PhotoEntry>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            photo(1, "/media/photos/together/7.jpg", "Our first date", "Jul 2024"),
            photo(2, "/media/photos/together/3.png", "Cute moments", "Feb 2025"),
            photo(3, "/media/photos/together/4.jpg", "Awww...", "Feb 2025"),
            photo(4, "/media/photos/together/5.jpg", "Selfie fun", "Feb 2025"),
            photo(5, "/media/photos/together/6.jpg", "Hehe..", "Feb 2025"),
            PhotoEntry {
                id: 6,
                url: "/media/videos/sweet.mp4",
                caption: "Sweet moments together",
                date: Some("Aug 2025"),
                media_type: Some("video"),
            },
            photo(7, "/media/photos/together/1.jpg", "Sunset vibes", "Dec 2025"),
            photo(8, "/media/photos/together/2.jpg", "Sunset memories", "Dec 2025"),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entries_are_stable() {
        let catalog = photo_catalog();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog[0].id, 1);
        assert_eq!(catalog[5].media_type, Some("video"));
    }

    #[test]
    fn test_type_field_renamed_and_optional() {
        let catalog = photo_catalog();
        let image = serde_json::to_value(&catalog[0]).unwrap();
        assert!(image.get("type").is_none());
        assert_eq!(image["url"], "/media/photos/together/7.jpg");

        let video = serde_json::to_value(&catalog[5]).unwrap();
        assert_eq!(video["type"], "video");
    }
}
