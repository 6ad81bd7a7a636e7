//! Event expiration sweep.
//!
//! Periodically scans for events whose start instant fell within the last
//! 24 hours and sends each registered participant a one-time review request.
//! Deliveries are tracked in a process-local set keyed by
//! `(event, registration)`; the set is not persisted, so notifications can
//! repeat after a restart.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};
use dashmap::DashSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{EventRepository, RegistrationRepository, UserRepository};
use crate::services::MailerService;
use crate::utils::AppError;

/// How far back the sweep looks for finished events.
const EXPIRY_WINDOW_HOURS: i64 = 24;

/// True when `start` lies within `[now - 24h, now]`.
pub fn is_recently_finished(start: NaiveDateTime, now: NaiveDateTime) -> bool {
    let threshold = now - Duration::hours(EXPIRY_WINDOW_HOURS);
    start <= now && start >= threshold
}

#[derive(Clone)]
pub struct ExpirationService {
    db: Surreal<Db>,
    mailer: MailerService,
    frontend_url: String,
    processed: Arc<DashSet<String>>,
}

impl ExpirationService {
    pub fn new(db: Surreal<Db>, mailer: MailerService, frontend_url: String) -> Self {
        Self {
            db,
            mailer,
            frontend_url,
            processed: Arc::new(DashSet::new()),
        }
    }

    /// Scan for recently finished events and send pending review requests.
    ///
    /// Returns the number of notifications sent by this pass.
    pub async fn check_expired_events(&self) -> Result<u32, AppError> {
        let now = Utc::now().naive_utc();
        tracing::debug!("Checking for recently finished events");

        let events = EventRepository::new(self.db.clone()).find_all().await?;
        let registrations = RegistrationRepository::new(self.db.clone());
        let users = UserRepository::new(self.db.clone());

        let mut sent = 0u32;

        for event in events {
            if !is_recently_finished(event.start_instant(), now) {
                continue;
            }
            let Some(event_id) = event.id.clone() else {
                continue;
            };

            tracing::info!(event = %event.event_name, "Event recently finished, notifying participants");

            for registration in registrations.find_by_event(&event_id).await? {
                let Some(registration_id) = registration.id.clone() else {
                    continue;
                };
                let key = format!("{}_{}", event_id, registration_id);
                if self.processed.contains(&key) {
                    continue;
                }

                let user = match users.find_by_matricule(&registration.matricule).await? {
                    Some(user) => user,
                    None => {
                        tracing::warn!(
                            matricule = %registration.matricule,
                            "No user account for registration, skipping review request"
                        );
                        continue;
                    }
                };

                let review_link =
                    format!("{}/reviews?eventId={}", self.frontend_url, event_id);

                match self
                    .mailer
                    .send_review_request(&user.email, &user.nom, &event.event_name, &review_link)
                    .await
                {
                    Ok(()) => {
                        self.processed.insert(key);
                        sent += 1;
                    }
                    Err(e) => {
                        tracing::error!(
                            to = %user.email,
                            event = %event.event_name,
                            error = %e,
                            "Failed to send review request"
                        );
                    }
                }
            }
        }

        tracing::debug!(sent, "Expiration sweep finished");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn event_inside_window_is_finished() {
        let now = at(2025, 6, 15, 12, 0);
        assert!(is_recently_finished(at(2025, 6, 15, 11, 0), now));
        assert!(is_recently_finished(at(2025, 6, 14, 12, 0), now)); // exactly 24h ago
    }

    #[test]
    fn future_event_is_not_finished() {
        let now = at(2025, 6, 15, 12, 0);
        assert!(!is_recently_finished(at(2025, 6, 15, 12, 1), now));
    }

    #[test]
    fn event_older_than_window_is_ignored() {
        let now = at(2025, 6, 15, 12, 0);
        assert!(!is_recently_finished(at(2025, 6, 14, 11, 59), now));
    }
}
