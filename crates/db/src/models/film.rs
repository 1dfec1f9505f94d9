//! Film entity model, DTOs, and filter.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use backlot_core::types::{EntityId, Timestamp};
use backlot_core::validate::{self, Issues};

/// One cast or crew credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCrewEntry {
    pub role: String,
    pub name: String,
}

/// A pull quote attributed to a source (critic, festival, press).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmQuote {
    pub text: String,
    #[serde(default)]
    pub source: String,
}

/// Full film row from the `films` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub year: String,
    pub description: String,
    pub long_description: String,
    pub image: String,
    pub director: String,
    pub producer: String,
    pub duration: String,
    pub languages: Vec<String>,
    pub subtitles: Vec<String>,
    pub release_date: String,
    pub awards: Vec<String>,
    pub cast_crew: Json<Vec<CastCrewEntry>>,
    pub gallery: Vec<String>,
    pub trailer: Option<String>,
    pub synopsis: String,
    pub quotes: Json<Vec<FilmQuote>>,
    pub rating: f32,
    pub featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a film. Optional collections and strings default to
/// empty so the insert never sees missing values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFilm {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub year: String,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub image: String,
    pub director: String,
    pub producer: String,
    pub duration: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub subtitles: Vec<String>,
    pub release_date: String,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub cast_crew: Vec<CastCrewEntry>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub trailer: Option<String>,
    pub synopsis: String,
    #[serde(default)]
    pub quotes: Vec<FilmQuote>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub featured: bool,
}

impl CreateFilm {
    /// Validate every field, returning the full issue map on failure.
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("title", validate::required(&self.title));
        issues.check("slug", validate::slug(&self.slug));
        issues.check("category", validate::required(&self.category));
        issues.check("year", validate::year(&self.year));
        issues.check("description", validate::min_len(&self.description, 10));
        issues.check("image", validate::http_url(&self.image));
        issues.check("director", validate::required(&self.director));
        issues.check("producer", validate::required(&self.producer));
        issues.check("duration", validate::required(&self.duration));
        issues.check("releaseDate", validate::required(&self.release_date));
        issues.check("synopsis", validate::min_len(&self.synopsis, 10));
        issues.check("rating", validate::rating(f64::from(self.rating)));
        if let Some(trailer) = &self.trailer {
            issues.check("trailer", validate::http_url_or_empty(trailer));
        }
        for (i, url) in self.gallery.iter().enumerate() {
            issues.check(&format!("gallery[{i}]"), validate::http_url(url));
        }
        for (i, entry) in self.cast_crew.iter().enumerate() {
            issues.check(&format!("castCrew[{i}].role"), validate::required(&entry.role));
            issues.check(&format!("castCrew[{i}].name"), validate::required(&entry.name));
        }
        for (i, quote) in self.quotes.iter().enumerate() {
            issues.check(&format!("quotes[{i}].text"), validate::required(&quote.text));
        }
        issues.into_result()
    }
}

/// DTO for a partial film update. Strict: unknown fields (including `id`
/// and timestamps) are rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFilm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub image: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub duration: Option<String>,
    pub languages: Option<Vec<String>>,
    pub subtitles: Option<Vec<String>>,
    pub release_date: Option<String>,
    pub awards: Option<Vec<String>>,
    pub cast_crew: Option<Vec<CastCrewEntry>>,
    pub gallery: Option<Vec<String>>,
    pub trailer: Option<String>,
    pub synopsis: Option<String>,
    pub quotes: Option<Vec<FilmQuote>>,
    pub rating: Option<f32>,
    pub featured: Option<bool>,
}

impl UpdateFilm {
    /// Validate only the fields present in the patch.
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        if let Some(title) = &self.title {
            issues.check("title", validate::required(title));
        }
        if let Some(slug) = &self.slug {
            issues.check("slug", validate::slug(slug));
        }
        if let Some(year) = &self.year {
            issues.check("year", validate::year(year));
        }
        if let Some(description) = &self.description {
            issues.check("description", validate::min_len(description, 10));
        }
        if let Some(image) = &self.image {
            issues.check("image", validate::http_url(image));
        }
        if let Some(trailer) = &self.trailer {
            issues.check("trailer", validate::http_url_or_empty(trailer));
        }
        if let Some(synopsis) = &self.synopsis {
            issues.check("synopsis", validate::min_len(synopsis, 10));
        }
        if let Some(rating) = self.rating {
            issues.check("rating", validate::rating(f64::from(rating)));
        }
        if let Some(gallery) = &self.gallery {
            for (i, url) in gallery.iter().enumerate() {
                issues.check(&format!("gallery[{i}]"), validate::http_url(url));
            }
        }
        issues.into_result()
    }
}

/// Typed equality filters for film listings, combined with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct FilmFilter {
    pub category: Option<String>,
    pub year: Option<String>,
    pub director: Option<String>,
    pub featured: Option<bool>,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> serde_json::Value {
        serde_json::json!({
            "title": "X",
            "slug": "x-film",
            "category": "Doc",
            "year": "2024",
            "description": "aaaaaaaaaa",
            "image": "https://x/y.jpg",
            "director": "D",
            "producer": "P",
            "duration": "90m",
            "releaseDate": "2024-01-01",
            "synopsis": "bbbbbbbbbb"
        })
    }

    #[test]
    fn create_defaults_applied() {
        let film: CreateFilm = serde_json::from_value(minimal()).expect("minimal create is valid");
        assert!(film.validate().is_ok());
        assert_eq!(film.rating, 0.0);
        assert!(!film.featured);
        assert!(film.languages.is_empty());
        assert!(film.awards.is_empty());
        assert!(film.cast_crew.is_empty());
    }

    #[test]
    fn create_collects_every_bad_field() {
        let mut raw = minimal();
        raw["slug"] = "Bad Slug".into();
        raw["year"] = "24".into();
        raw["image"] = "not-a-url".into();
        raw["rating"] = 7.5.into();
        let film: CreateFilm = serde_json::from_value(raw).expect("shape still parses");
        let issues = film.validate().expect_err("four fields are invalid");
        assert_eq!(issues.len(), 4);
        for field in ["slug", "year", "image", "rating"] {
            assert!(issues.iter().any(|(f, _)| f == field), "missing issue for {field}");
        }
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let result: Result<UpdateFilm, _> =
            serde_json::from_value(serde_json::json!({"title": "New", "id": "abc"}));
        assert!(result.is_err(), "id must not be patchable");
    }

    #[test]
    fn update_validates_present_fields_only() {
        let patch: UpdateFilm =
            serde_json::from_value(serde_json::json!({"slug": "new-slug"})).expect("valid patch");
        assert!(patch.validate().is_ok());

        let patch: UpdateFilm =
            serde_json::from_value(serde_json::json!({"slug": "Not A Slug"})).expect("parses");
        assert!(patch.validate().is_err());
    }
}
