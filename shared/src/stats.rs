//! Dashboard statistics payload.
//!
//! Field names follow the JSON contract consumed by the dashboard frontend,
//! hence the camelCase renames and the French `nom`/`participations` pair on
//! the sport-activity series.

use serde::{Deserialize, Serialize};

/// Full dashboard payload: one entry per chart on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_clubs: Vec<TypeMemberCount>,
    pub archived_clubs: Vec<TypeMemberCount>,
    pub active_sports: Vec<SportParticipationCount>,
    pub archived_sports: Vec<SportParticipationCount>,
    pub inscriptions_by_active_club_type: Vec<TypeInscriptionCount>,
    pub inscriptions_by_archived_club_type: Vec<TypeInscriptionCount>,
    pub inscriptions_by_active_sport_type: Vec<TypeInscriptionCount>,
    pub inscriptions_by_archived_sport_type: Vec<TypeInscriptionCount>,
    pub inscriptions_by_beneficiary_club: Vec<BeneficiaryInscriptionCount>,
    pub inscriptions_by_beneficiary_sport: Vec<BeneficiaryInscriptionCount>,
    pub reviews_by_event: Vec<EventReviewStats>,
    pub events: Vec<EventInscriptionCount>,
}

/// Members enrolled under one club type, labelled with its lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMemberCount {
    pub name: String,
    pub members: u64,
}

/// Participants under one sport-activity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportParticipationCount {
    pub nom: String,
    pub participations: u64,
}

/// Enrollments under one type (club or sport family).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInscriptionCount {
    pub name: String,
    pub inscriptions: u64,
}

/// Enrollments grouped by beneficiary kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeneficiaryInscriptionCount {
    pub beneficiary: String,
    pub inscriptions: u64,
}

/// Review counts for one event, bucketed by sentiment stars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReviewStats {
    pub event_name: String,
    pub event_id: String,
    pub review_count: u64,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

/// Ticket registrations recorded against one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInscriptionCount {
    pub name: String,
    pub inscriptions: u64,
}
