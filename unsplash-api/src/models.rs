//! Wire models for the endpoint groups.
//!
//! Only the fields the endpoint groups and the command-line front end use are
//! decoded. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub description: Option<String>,
    #[serde(rename = "color")]
    pub hex_color: Option<String>,
    pub user: Option<User>,
    pub urls: Option<PhotoUrls>,
    pub links: Option<Links>,
    pub exif: Option<Exif>,
    pub location: Option<Location>,
    pub downloads: Option<u32>,
    pub likes: Option<u32>,
    pub liked_by_user: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
    pub custom: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exif {
    pub make: Option<String>,
    pub model: Option<String>,
    pub exposure_time: Option<String>,
    pub aperture: Option<String>,
    pub focal_length: Option<String>,
    pub iso: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub position: Option<Position>,
    pub confidential: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub main: Option<String>,
    pub html: Option<String>,
    pub download: Option<String>,
    pub download_location: Option<String>,
    pub photos: Option<String>,
    pub likes: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_url: Option<String>,
    pub instagram_username: Option<String>,
    pub total_likes: Option<u32>,
    pub total_photos: Option<u32>,
    pub total_collections: Option<u32>,
    pub links: Option<Links>,
}

/// Fields accepted by the profile update endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub portfolio_url: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub instagram_username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub curated: Option<bool>,
    pub featured: Option<bool>,
    #[serde(rename = "private")]
    pub is_private: Option<bool>,
    pub share_key: Option<String>,
    pub published_at: Option<String>,
    pub total_photos: Option<u32>,
    pub cover_photo: Option<Box<Photo>>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPhotoUpdate {
    pub photo: Photo,
    pub collection: Collection,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub photo: Photo,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub url: Option<String>,
}

/// Body synthesized for `204 No Content` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub code: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub id: Option<String>,
    pub username: Option<String>,
    pub downloads: Option<Stat>,
    pub views: Option<Stat>,
    pub likes: Option<Stat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub total: u64,
    pub historical: Option<Historical>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Historical {
    pub change: i64,
    pub resolution: String,
    pub quantity: u32,
    #[serde(default)]
    pub values: Vec<StatValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults<T> {
    pub total: u32,
    pub total_pages: u32,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_photo_ignores_unknown_fields() {
        let body = r##"{
            "id": "Dwu85P9SOIk",
            "created_at": "2016-05-03T11:00:28-04:00",
            "width": 2448,
            "height": 3264,
            "color": "#6E633A",
            "likes": 24,
            "liked_by_user": false,
            "urls": {
                "raw": "https://images.unsplash.com/photo-1",
                "full": "https://images.unsplash.com/photo-1?q=75",
                "regular": "https://images.unsplash.com/photo-1?w=1080",
                "small": "https://images.unsplash.com/photo-1?w=400",
                "thumb": "https://images.unsplash.com/photo-1?w=200"
            },
            "user": {"id": "QPxL2MGqfrw", "username": "exampleuser", "name": "Joe Example"},
            "links": {"self": "https://api.unsplash.com/photos/Dwu85P9SOIk"}
        }"##;

        let photo: Photo = serde_json::from_str(body).unwrap();
        assert_eq!(photo.id, "Dwu85P9SOIk");
        assert_eq!(photo.hex_color.as_deref(), Some("#6E633A"));
        assert_eq!(photo.user.unwrap().username, "exampleuser");
        assert!(photo.urls.unwrap().custom.is_none());
        assert_eq!(
            photo.links.unwrap().main.as_deref(),
            Some("https://api.unsplash.com/photos/Dwu85P9SOIk")
        );
    }

    #[test]
    fn test_decode_collection_private_flag() {
        let body = r#"{"id": 296, "title": "I like a man with a beard.", "private": true}"#;
        let collection: Collection = serde_json::from_str(body).unwrap();
        assert_eq!(collection.id, 296);
        assert_eq!(collection.is_private, Some(true));
    }

    #[test]
    fn test_decode_search_results() {
        let body = r#"{"total": 133, "total_pages": 7, "results": [{"id": "u1", "username": "a"}]}"#;
        let results: SearchResults<User> = serde_json::from_str(body).unwrap();
        assert_eq!(results.total_pages, 7);
        assert_eq!(results.results[0].username, "a");
    }
}
