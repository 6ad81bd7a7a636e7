//! Event model

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// A registerable event with a fixed ticket capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub event_location: String,
    pub ticket_number: i64,
    pub ticket_price: Decimal,
    #[serde(default)]
    pub event_image: Option<String>,
}

impl Event {
    /// The event's start instant, combining `event_date` and `start_time`.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.event_date.and_time(self.start_time)
    }
}

/// Textual event fields carried in the multipart create/update request
/// alongside the image part.
#[derive(Debug, Clone, Default)]
pub struct EventFields {
    pub event_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub event_location: Option<String>,
    pub ticket_number: Option<i64>,
    pub ticket_price: Option<Decimal>,
}

/// Event annotated with ticket accounting over its active registrations.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithAvailability {
    #[serde(flatten)]
    pub event: Event,
    pub inscription_count: i64,
    pub tickets_available: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn start_instant_combines_date_and_time() {
        let event = Event {
            id: None,
            event_name: "Marathon".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            event_location: "Nabeul".into(),
            ticket_number: 100,
            ticket_price: Decimal::new(20, 0),
            event_image: None,
        };
        let start = event.start_instant();
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2025-06-14 09:30");
    }
}
