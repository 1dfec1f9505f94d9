//! One zero-sized repository per entity.
//!
//! Repositories speak raw SQL over `&PgPool` and return `sqlx::Error`
//! untouched; the API layer classifies constraint violations and missing
//! rows into the HTTP taxonomy.

pub mod activity_repo;
pub mod campaign_repo;
pub mod film_repo;
pub mod notification_repo;
pub mod production_repo;
pub mod session_repo;
pub mod settings_repo;
pub mod story_repo;
pub mod subscriber_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use campaign_repo::CampaignRepo;
pub use film_repo::FilmRepo;
pub use notification_repo::NotificationRepo;
pub use production_repo::ProductionRepo;
pub use session_repo::SessionRepo;
pub use settings_repo::SettingsRepo;
pub use story_repo::StoryRepo;
pub use subscriber_repo::SubscriberRepo;
pub use user_repo::UserRepo;
