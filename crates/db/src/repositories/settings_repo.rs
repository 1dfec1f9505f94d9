//! Repository for the `site_settings` singleton.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::settings::{SiteSettings, UpdateSettings, SINGLETON_KEY};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "singleton_key, site_name, site_description, contact_email, contact_phone, \
                       address, social_links, logo_path, logo_dark_path, meta_image, updated_at";

/// Default values written on first read.
const DEFAULT_SITE_NAME: &str = "Backlot Films";
const DEFAULT_SITE_DESCRIPTION: &str = "Independent film production company";

/// Provides access to the settings singleton.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the singleton, creating it with defaults if absent.
    ///
    /// The insert-or-no-op upsert makes concurrent first reads converge on
    /// one row instead of racing a get-then-insert.
    pub async fn get_or_create(pool: &PgPool) -> Result<SiteSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_settings (singleton_key, site_name, site_description, contact_email, \
             contact_phone, address, logo_path, logo_dark_path, meta_image)
             VALUES ($1, $2, $3, '', '', '', '', '', '')
             ON CONFLICT ON CONSTRAINT uq_site_settings_key
             DO UPDATE SET singleton_key = site_settings.singleton_key
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSettings>(&query)
            .bind(SINGLETON_KEY)
            .bind(DEFAULT_SITE_NAME)
            .bind(DEFAULT_SITE_DESCRIPTION)
            .fetch_one(pool)
            .await
    }

    /// Replace the singleton's editable fields.
    pub async fn replace(
        pool: &PgPool,
        input: &UpdateSettings,
    ) -> Result<SiteSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_settings (singleton_key, site_name, site_description, contact_email, \
             contact_phone, address, social_links, logo_path, logo_dark_path, meta_image, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
             ON CONFLICT ON CONSTRAINT uq_site_settings_key
             DO UPDATE SET
                site_name = EXCLUDED.site_name,
                site_description = EXCLUDED.site_description,
                contact_email = EXCLUDED.contact_email,
                contact_phone = EXCLUDED.contact_phone,
                address = EXCLUDED.address,
                social_links = EXCLUDED.social_links,
                logo_path = EXCLUDED.logo_path,
                logo_dark_path = EXCLUDED.logo_dark_path,
                meta_image = EXCLUDED.meta_image,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSettings>(&query)
            .bind(SINGLETON_KEY)
            .bind(&input.site_name)
            .bind(&input.site_description)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.address)
            .bind(Json(&input.social_links))
            .bind(&input.logo_path)
            .bind(&input.logo_dark_path)
            .bind(&input.meta_image)
            .fetch_one(pool)
            .await
    }
}
