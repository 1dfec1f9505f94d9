//! Production entity model, DTOs, and filter.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use backlot_core::production::check_status;
use backlot_core::types::{EntityId, Timestamp};
use backlot_core::validate::{self, Issues};

/// One stage of a production pipeline with its milestone checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionStage {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub milestones: Vec<String>,
}

/// Full production row from the `productions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub status: String,
    pub description: String,
    pub image: String,
    pub progress: i32,
    pub team: Vec<String>,
    pub stages: Json<Vec<ProductionStage>>,
    pub start_date: String,
    pub estimated_completion: String,
    pub featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a production.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduction {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub stages: Vec<ProductionStage>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub estimated_completion: String,
    #[serde(default)]
    pub featured: bool,
}

impl CreateProduction {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("title", validate::required(&self.title));
        issues.check("slug", validate::slug(&self.slug));
        issues.check("category", validate::required(&self.category));
        issues.check("status", check_status(&self.status));
        issues.check("progress", validate::progress(self.progress));
        if !self.image.is_empty() {
            issues.check("image", validate::http_url(&self.image));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            issues.check(&format!("stages[{i}].name"), validate::required(&stage.name));
            issues.check(&format!("stages[{i}].status"), validate::required(&stage.status));
        }
        issues.into_result()
    }
}

/// DTO for a partial production update. Strict schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProduction {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub progress: Option<i32>,
    pub team: Option<Vec<String>>,
    pub stages: Option<Vec<ProductionStage>>,
    pub start_date: Option<String>,
    pub estimated_completion: Option<String>,
    pub featured: Option<bool>,
}

impl UpdateProduction {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        if let Some(title) = &self.title {
            issues.check("title", validate::required(title));
        }
        if let Some(slug) = &self.slug {
            issues.check("slug", validate::slug(slug));
        }
        if let Some(status) = &self.status {
            issues.check("status", check_status(status));
        }
        if let Some(progress) = self.progress {
            issues.check("progress", validate::progress(progress));
        }
        if let Some(image) = &self.image {
            issues.check("image", validate::http_url_or_empty(image));
        }
        issues.into_result()
    }
}

/// Typed equality filters for production listings.
#[derive(Debug, Clone, Default)]
pub struct ProductionFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_must_be_known() {
        let create: CreateProduction = serde_json::from_value(serde_json::json!({
            "title": "T", "slug": "t", "category": "Doc", "status": "Filming"
        }))
        .expect("shape parses");
        let issues = create.validate().expect_err("unknown status");
        assert!(issues.iter().any(|(f, _)| f == "status"));
    }

    #[test]
    fn progress_bounds_enforced() {
        let patch: UpdateProduction =
            serde_json::from_value(serde_json::json!({"progress": 101})).expect("parses");
        assert!(patch.validate().is_err());
        let patch: UpdateProduction =
            serde_json::from_value(serde_json::json!({"progress": 100})).expect("parses");
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let result: Result<UpdateProduction, _> =
            serde_json::from_value(serde_json::json!({"createdAt": "2024-01-01"}));
        assert!(result.is_err());
    }
}
