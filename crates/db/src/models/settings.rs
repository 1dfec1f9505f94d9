//! Site settings singleton model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use backlot_core::types::Timestamp;
use backlot_core::validate::{self, Issues};

/// The constant key the singleton row is stored under.
pub const SINGLETON_KEY: &str = "site";

/// One social media link shown in the site footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// The site settings singleton row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(skip_serializing)]
    pub singleton_key: String,
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub social_links: Json<Vec<SocialLink>>,
    pub logo_path: String,
    pub logo_dark_path: String,
    pub meta_image: String,
    pub updated_at: Timestamp,
}

/// Wire DTO for `PUT /settings`: a full replace of the editable fields.
/// Omitted optional fields reset to empty rather than being preserved.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSettings {
    pub site_name: String,
    #[serde(default)]
    pub site_description: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub logo_path: String,
    #[serde(default)]
    pub logo_dark_path: String,
    #[serde(default)]
    pub meta_image: String,
}

impl UpdateSettings {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("siteName", validate::required(&self.site_name));
        if !self.contact_email.is_empty() {
            issues.check("contactEmail", validate::email(&self.contact_email));
        }
        for (i, link) in self.social_links.iter().enumerate() {
            issues.check(
                &format!("socialLinks[{i}].platform"),
                validate::required(&link.platform),
            );
            issues.check(&format!("socialLinks[{i}].url"), validate::http_url(&link.url));
        }
        issues.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_require_a_site_name() {
        let update: UpdateSettings =
            serde_json::from_value(serde_json::json!({"siteName": ""})).expect("parses");
        assert!(update.validate().is_err());
    }

    #[test]
    fn social_links_must_carry_valid_urls() {
        let update: UpdateSettings = serde_json::from_value(serde_json::json!({
            "siteName": "Backlot Films",
            "socialLinks": [{"platform": "instagram", "url": "not-a-url"}]
        }))
        .expect("parses");
        let issues = update.validate().expect_err("bad url");
        assert!(issues.iter().any(|(f, _)| f == "socialLinks[0].url"));
    }
}
