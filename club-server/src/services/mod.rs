//! Application services: outbound email, sentiment analysis, image storage,
//! the event expiration sweep and dashboard aggregation.

pub mod dashboard;
pub mod expiration;
pub mod image_store;
pub mod mailer;
pub mod sentiment;

pub use dashboard::DashboardService;
pub use expiration::ExpirationService;
pub use image_store::ImageStore;
pub use mailer::MailerService;
pub use sentiment::SentimentClient;
