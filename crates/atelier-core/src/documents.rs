//! Content store document types.

use crate::position::{Position, PositionedItem};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCULPTURE_TYPE: &str = "sculpture";
pub const CATEGORY_TYPE: &str = "category";
pub const GUEST_ENTRY_TYPE: &str = "guestEntry";
pub const CONTACT_MESSAGE_TYPE: &str = "contactMessage";

/// Current time as an RFC 3339 UTC timestamp, the store's datetime format.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A sculpture as read for a category page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sculpture {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Rich-text blocks, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Resolved cover image URL.
    #[serde(rename = "coverImage", default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Sculpture {
    /// Stored geometry with defaults for anything missing.
    pub fn position(&self) -> Position {
        Position::from_stored(self.top, self.left, self.width, self.height)
    }

    pub fn positioned_item(&self) -> PositionedItem {
        PositionedItem::new(self.id.clone(), self.position())
    }
}

/// Background color value as stored on a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "_type", default = "color_type")]
    pub kind: String,
    pub hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

fn color_type() -> String {
    "color".to_string()
}

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self {
            kind: color_type(),
            hex: hex.into(),
            alpha: Some(1.0),
        }
    }
}

/// Check a `#RRGGBB` color string.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// A sculpture category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}

/// Everything a category page needs to reproduce its layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLayout {
    pub category: Category,
    pub sculptures: Vec<Sculpture>,
}

impl CategoryLayout {
    pub fn positioned_items(&self) -> impl Iterator<Item = PositionedItem> + '_ {
        self.sculptures.iter().map(Sculpture::positioned_item)
    }
}

/// A guestbook entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub message: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Build a new guestbook entry document (id assigned by the store).
pub fn new_guest_entry(name: &str, message: &str) -> Value {
    serde_json::json!({
        "_type": GUEST_ENTRY_TYPE,
        "name": name,
        "message": message,
        "createdAt": timestamp_now(),
    })
}

/// Build a new contact message document with its own id.
pub fn new_contact_message(name: &str, email: &str, message: &str) -> Value {
    serde_json::json!({
        "_type": CONTACT_MESSAGE_TYPE,
        "_id": uuid::Uuid::new_v4().to_string(),
        "name": name,
        "email": email,
        "message": message,
        "createdAt": timestamp_now(),
    })
}
