use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

pub mod db_operations;
pub mod pagination;
pub mod parking;

use parking::ParkingStatus;

// --- Categories ---

/// Closed set of post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Domestic,
    Overseas,
    Special,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Domestic, Category::Overseas, Category::Special];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Domestic => "domestic",
            Category::Overseas => "overseas",
            Category::Special => "special",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub domestic: u64,
    pub overseas: u64,
    pub special: u64,
}

impl CategoryCounts {
    pub fn record(&mut self, category: Category) {
        match category {
            Category::Domestic => self.domestic += 1,
            Category::Overseas => self.overseas += 1,
            Category::Special => self.special += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.domestic + self.overseas + self.special
    }
}

// --- Stores ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub location: String,
    pub store_id: String,
    pub coordinates: Option<Coordinates>,
    pub parking: String,
    pub opening_date: Option<NaiveDate>,
    pub phone: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn from_input(input: StoreInput, now: DateTime<Utc>) -> Self {
        Store {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            location: input.location,
            store_id: input.store_id,
            coordinates: input.coordinates,
            parking: input.parking,
            opening_date: input.opening_date,
            phone: input.phone,
            tags: input.tags,
            images: input.images,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping identity and creation time.
    pub fn apply_input(&mut self, input: StoreInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.address = input.address;
        self.location = input.location;
        self.store_id = input.store_id;
        self.coordinates = input.coordinates;
        self.parking = input.parking;
        self.opening_date = input.opening_date;
        self.phone = input.phone;
        self.tags = input.tags;
        self.images = input.images;
        self.updated_at = now;
    }

    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_str(),
            self.address.as_str(),
            self.location.as_str(),
            self.store_id.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
    }
}

/// A store as handed to clients, with its derived parking status.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StoreView {
    #[serde(flatten)]
    pub store: Store,
    pub parking_status: ParkingStatus,
}

impl From<Store> for StoreView {
    fn from(store: Store) -> Self {
        let parking_status = ParkingStatus::classify(&store.parking);
        StoreView { store, parking_status }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StoreInput {
    #[validate(length(min = 1, max = 100, message = "Store name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Address must be between 1 and 200 characters"))]
    pub address: String,
    #[validate(length(min = 1, max = 100, message = "Location must be between 1 and 100 characters"))]
    pub location: String,
    #[validate(length(min = 1, max = 50, message = "Store ID must be between 1 and 50 characters"))]
    pub store_id: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Parking notes must be at most 200 characters"))]
    pub parking: String,
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 30, message = "A store can carry at most 30 tags"))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "A store can carry at most 20 images"))]
    pub images: Vec<String>,
}

// --- Posts ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub description: String,
    pub image: Option<String>,
    pub views: u64,
    pub likes: u64,
    pub store: Option<Uuid>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn from_input(input: PostInput, slug: String, now: DateTime<Utc>) -> Self {
        Post {
            id: Uuid::new_v4(),
            title: input.title,
            slug,
            category: input.category,
            description: input.description,
            image: input.image,
            views: 0,
            likes: 0,
            store: input.store,
            published: input.published,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields. Counters and creation time survive edits.
    pub fn apply_input(&mut self, input: PostInput, slug: String, now: DateTime<Utc>) {
        self.title = input.title;
        self.slug = slug;
        self.category = input.category;
        self.description = input.description;
        self.image = input.image;
        self.store = input.store;
        self.published = input.published;
        self.updated_at = now;
    }

    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.description.as_str()].into_iter()
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    /// Derived from the title when absent.
    #[serde(default)]
    #[validate(length(max = 200, message = "Slug must be at most 200 characters"))]
    pub slug: Option<String>,
    pub category: Category,
    #[serde(default)]
    #[validate(length(max = 20000, message = "Description must be at most 20000 characters"))]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub store: Option<Uuid>,
    #[serde(default)]
    pub published: bool,
}

/// Post detail: the post plus its resolved store and live comment count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub post: Post,
    pub store: Option<StoreView>,
    pub comment_count: u64,
}

// --- Comments ---

/// Lifecycle of a comment. Comments are never removed from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStatus {
    Active,
    Deleted,
}

impl CommentStatus {
    pub fn is_deleted(&self) -> bool {
        matches!(self, CommentStatus::Deleted)
    }
}

// Persisted and exposed as the boolean `isDeleted`.
mod deleted_flag {
    use super::CommentStatus;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &CommentStatus, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(status.is_deleted())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CommentStatus, D::Error> {
        Ok(if bool::deserialize(deserializer)? {
            CommentStatus::Deleted
        } else {
            CommentStatus::Active
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post: Uuid,
    pub author: String,
    pub content: String,
    pub email: Option<String>,
    #[serde(rename = "isDeleted", with = "deleted_flag")]
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_input(post: Uuid, input: CommentInput, now: DateTime<Utc>) -> Self {
        Comment {
            id: Uuid::new_v4(),
            post,
            author: input.author,
            content: input.content,
            email: input.email,
            status: CommentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.author.as_str(), self.content.as_str()]
            .into_iter()
            .chain(self.email.as_deref())
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CommentInput {
    #[validate(length(min = 1, max = 50, message = "Author must be between 1 and 50 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 1000, message = "Comment must be between 1 and 1000 characters"))]
    pub content: String,
    #[serde(default)]
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
}

/// Case-insensitive substring match of a normalized needle against any field.
pub fn matches_search<'a>(needle: &str, mut fields: impl Iterator<Item = &'a str>) -> bool {
    fields.any(|field| field.to_lowercase().contains(needle))
}

/// Trims and lowercases a search term; blank terms mean "no filter".
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_comment() -> Comment {
        let now = Utc::now();
        Comment::from_input(
            Uuid::new_v4(),
            CommentInput {
                author: "minji".to_string(),
                content: "좋은 매장이네요".to_string(),
                email: None,
            },
            now,
        )
    }

    #[test]
    fn comment_status_serializes_as_is_deleted_flag() {
        let mut comment = sample_comment();
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["isDeleted"], json!(false));

        comment.status = CommentStatus::Deleted;
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["isDeleted"], json!(true));

        let back: Comment = serde_json::from_value(value).unwrap();
        assert_eq!(back.status, CommentStatus::Deleted);
    }

    #[test]
    fn store_view_flattens_store_and_adds_parking_status() {
        let input = StoreInput {
            name: "Gangnam R".to_string(),
            address: "서울 강남구 강남대로 390".to_string(),
            location: "Seoul".to_string(),
            store_id: "KR-0001".to_string(),
            coordinates: None,
            parking: "주차 불가".to_string(),
            opening_date: None,
            phone: String::new(),
            tags: vec!["Seoul".to_string()],
            images: vec![],
        };
        let view = StoreView::from(Store::from_input(input, Utc::now()));
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["storeId"], json!("KR-0001"));
        assert_eq!(value["parkingStatus"], json!("unavailable"));
    }

    #[test]
    fn search_helpers_ignore_case_and_blank_terms() {
        assert_eq!(normalize_search(Some("  ")), None);
        assert_eq!(normalize_search(Some(" Reserve ")), Some("reserve".to_string()));
        let needle = normalize_search(Some("RESERVE")).unwrap();
        assert!(matches_search(&needle, ["Starbucks Reserve Roastery"].into_iter()));
        assert!(!matches_search(&needle, ["Drive Thru"].into_iter()));
    }

    #[test]
    fn comment_search_covers_optional_email() {
        let mut comment = sample_comment();
        assert!(!matches_search("example.com", comment.search_fields()));
        comment.email = Some("minji@example.com".to_string());
        assert!(matches_search("example.com", comment.search_fields()));
    }

    #[test]
    fn category_counts_tally_each_bucket() {
        let mut counts = CategoryCounts::default();
        counts.record(Category::Domestic);
        counts.record(Category::Domestic);
        counts.record(Category::Special);
        assert_eq!(counts, CategoryCounts { domestic: 2, overseas: 0, special: 1 });
        assert_eq!(counts.total(), 3);
    }
}
