//! Story entity model, DTOs, and filter.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use backlot_core::content::{validate_blocks, ContentBlock};
use backlot_core::types::{EntityId, Timestamp};
use backlot_core::validate::{self, Issues};

/// Full story row from the `stories` table.
///
/// `date` is the publish date and the listing order key; insertion order
/// (`created_at`) is only a tiebreaker.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: Json<Vec<ContentBlock>>,
    pub author: String,
    pub date: String,
    pub image: String,
    pub category: String,
    pub read_time: String,
    pub featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a story.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStory {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub read_time: String,
    #[serde(default)]
    pub featured: bool,
}

impl CreateStory {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("title", validate::required(&self.title));
        issues.check("slug", validate::slug(&self.slug));
        issues.check("author", validate::required(&self.author));
        issues.check("date", validate::required(&self.date));
        issues.check("category", validate::required(&self.category));
        if !self.image.is_empty() {
            issues.check("image", validate::http_url(&self.image));
        }
        validate_blocks(&self.content, &mut issues);
        issues.into_result()
    }
}

/// DTO for a partial story update. Strict schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStory {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<Vec<ContentBlock>>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub read_time: Option<String>,
    pub featured: Option<bool>,
}

impl UpdateStory {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        if let Some(title) = &self.title {
            issues.check("title", validate::required(title));
        }
        if let Some(slug) = &self.slug {
            issues.check("slug", validate::slug(slug));
        }
        if let Some(date) = &self.date {
            issues.check("date", validate::required(date));
        }
        if let Some(image) = &self.image {
            issues.check("image", validate::http_url_or_empty(image));
        }
        if let Some(content) = &self.content {
            validate_blocks(content, &mut issues);
        }
        issues.into_result()
    }
}

/// Typed equality filters for story listings.
#[derive(Debug, Clone, Default)]
pub struct StoryFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub limit: i64,
}
