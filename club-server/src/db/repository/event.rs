//! Event repository

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Event;

const TABLE: &str = "event";

#[derive(Clone)]
pub struct EventRepository {
    base: BaseRepository,
}

impl EventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all events ordered by date
    pub async fn find_all(&self) -> RepoResult<Vec<Event>> {
        let events: Vec<Event> = self
            .base
            .db()
            .query("SELECT * FROM event ORDER BY event_date")
            .await?
            .take(0)?;
        Ok(events)
    }

    /// Find event by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Event>> {
        let rid = parse_record_id(TABLE, id)?;
        let event: Option<Event> = self.base.db().select(rid).await?;
        Ok(event)
    }

    /// Create an event. `event_image` is the relative path stored by the
    /// image service.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        event_name: String,
        event_date: NaiveDate,
        start_time: NaiveTime,
        event_location: String,
        ticket_number: i64,
        ticket_price: Decimal,
        event_image: Option<String>,
    ) -> RepoResult<Event> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE event SET
                    event_name = $event_name,
                    event_date = $event_date,
                    start_time = $start_time,
                    event_location = $event_location,
                    ticket_number = $ticket_number,
                    ticket_price = $ticket_price,
                    event_image = $event_image
                RETURN AFTER"#,
            )
            .bind(("event_name", event_name))
            .bind(("event_date", event_date))
            .bind(("start_time", start_time))
            .bind(("event_location", event_location))
            .bind(("ticket_number", ticket_number))
            .bind(("ticket_price", ticket_price))
            .bind(("event_image", event_image))
            .await?;

        result
            .take::<Option<Event>>(0)?
            .ok_or_else(|| RepoError::Database("Failed to create event".to_string()))
    }

    /// Persist a fully merged event.
    pub async fn update(&self, id: &str, event: &Event) -> RepoResult<Event> {
        let rid = parse_record_id(TABLE, id)?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    event_name = $event_name,
                    event_date = $event_date,
                    start_time = $start_time,
                    event_location = $event_location,
                    ticket_number = $ticket_number,
                    ticket_price = $ticket_price,
                    event_image = $event_image
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("event_name", event.event_name.clone()))
            .bind(("event_date", event.event_date))
            .bind(("start_time", event.start_time))
            .bind(("event_location", event.event_location.clone()))
            .bind(("ticket_number", event.ticket_number))
            .bind(("ticket_price", event.ticket_price))
            .bind(("event_image", event.event_image.clone()))
            .await?;

        result
            .take::<Option<Event>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Event {} not found", id)))
    }

    /// Hard delete an event
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let existing: Option<Event> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Event {} not found", id)));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?
            .check()?;
        Ok(true)
    }
}
