//! Dashboard aggregation.
//!
//! Pure read-side: assembles the full [`DashboardStats`] payload from
//! grouped counts plus name resolution against the live and archived type
//! registries. The same payload serves the HTTP endpoint and the Socket.IO
//! broadcast.

use std::collections::HashMap;

use shared::stats::{
    BeneficiaryInscriptionCount, DashboardStats, EventInscriptionCount, EventReviewStats,
    SportParticipationCount, TypeInscriptionCount, TypeMemberCount,
};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{ArchivedType, TypeRecord};
use crate::db::repository::{
    ACTIVITY_TYPES, CLUB_TYPES, EventRepository, ReviewRepository, StatsRepository,
    TypeRegistryRepository,
};
use crate::utils::AppError;

#[derive(Clone)]
pub struct DashboardService {
    db: Surreal<Db>,
}

/// Resolved per-type counts for one membership family.
struct FamilyCounts {
    active: Vec<(String, u64)>,
    archived: Vec<(String, u64)>,
}

impl DashboardService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Run the full aggregate query set against the current store state.
    pub async fn collect(&self) -> Result<DashboardStats, AppError> {
        let stats = StatsRepository::new(self.db.clone());

        let clubs = self.family_counts(&stats, CLUB_TYPES).await?;
        let sports = self.family_counts(&stats, ACTIVITY_TYPES).await?;

        let club_beneficiaries = stats.members_by_beneficiary(CLUB_TYPES.member_table).await?;
        let sport_beneficiaries = stats
            .members_by_beneficiary(ACTIVITY_TYPES.member_table)
            .await?;

        let events = EventRepository::new(self.db.clone()).find_all().await?;
        let event_names: HashMap<String, String> = events
            .iter()
            .filter_map(|e| {
                e.id.as_ref()
                    .map(|id| (id.to_string(), e.event_name.clone()))
            })
            .collect();

        let reviews_by_event = self.reviews_by_event(&event_names).await?;

        let events_series = stats
            .registrations_by_event()
            .await?
            .into_iter()
            .filter_map(|(event_id, count)| {
                event_names
                    .get(&event_id.to_string())
                    .map(|name| EventInscriptionCount {
                        name: name.clone(),
                        inscriptions: count,
                    })
            })
            .collect();

        Ok(DashboardStats {
            active_clubs: clubs
                .active
                .iter()
                .map(|(name, n)| TypeMemberCount {
                    name: format!("{} (En cours)", name),
                    members: *n,
                })
                .collect(),
            archived_clubs: clubs
                .archived
                .iter()
                .map(|(name, n)| TypeMemberCount {
                    name: format!("{} (Expiré)", name),
                    members: *n,
                })
                .collect(),
            active_sports: sports
                .active
                .iter()
                .map(|(name, n)| SportParticipationCount {
                    nom: name.clone(),
                    participations: *n,
                })
                .collect(),
            archived_sports: sports
                .archived
                .iter()
                .map(|(name, n)| SportParticipationCount {
                    nom: name.clone(),
                    participations: *n,
                })
                .collect(),
            inscriptions_by_active_club_type: suffixed(&clubs.active, "En cours"),
            inscriptions_by_archived_club_type: suffixed(&clubs.archived, "Expiré"),
            inscriptions_by_active_sport_type: suffixed(&sports.active, "En cours"),
            inscriptions_by_archived_sport_type: suffixed(&sports.archived, "Expiré"),
            inscriptions_by_beneficiary_club: beneficiary_series(club_beneficiaries),
            inscriptions_by_beneficiary_sport: beneficiary_series(sport_beneficiaries),
            reviews_by_event,
            events: events_series,
        })
    }

    /// Grouped member counts for one family, with type ids resolved to
    /// names. Counts whose type cannot be resolved any more are dropped,
    /// matching the display rule's "Non assigné" bucket staying off the
    /// charts.
    async fn family_counts(
        &self,
        stats: &StatsRepository,
        tables: crate::db::repository::RegistryTables,
    ) -> Result<FamilyCounts, AppError> {
        let registry = TypeRegistryRepository::new(self.db.clone(), tables);
        let live_names = live_name_map(registry.find_all().await?);
        let archived_names = archived_name_map(registry.find_all_archived().await?);

        let active = resolve_counts(
            stats.members_by_live_type(tables.member_table).await?,
            &live_names,
        );
        let archived = resolve_counts(
            stats.members_by_archived_type(tables.member_table).await?,
            &archived_names,
        );

        Ok(FamilyCounts { active, archived })
    }

    async fn reviews_by_event(
        &self,
        event_names: &HashMap<String, String>,
    ) -> Result<Vec<EventReviewStats>, AppError> {
        let reviews = ReviewRepository::new(self.db.clone()).find_all().await?;

        let mut buckets: HashMap<String, EventReviewStats> = HashMap::new();
        for review in reviews {
            let event_id = review.event.to_string();
            let Some(event_name) = event_names.get(&event_id) else {
                continue;
            };

            let entry = buckets
                .entry(event_id.clone())
                .or_insert_with(|| EventReviewStats {
                    event_name: event_name.clone(),
                    event_id,
                    review_count: 0,
                    positive: 0,
                    neutral: 0,
                    negative: 0,
                });

            entry.review_count += 1;
            if let Some(sentiment) = &review.sentiment {
                if sentiment.is_positive() {
                    entry.positive += 1;
                } else if sentiment.is_neutral() {
                    entry.neutral += 1;
                } else {
                    entry.negative += 1;
                }
            }
        }

        let mut series: Vec<EventReviewStats> = buckets.into_values().collect();
        series.sort_by(|a, b| a.event_name.cmp(&b.event_name));
        Ok(series)
    }
}

fn live_name_map(types: Vec<TypeRecord>) -> HashMap<String, String> {
    types
        .into_iter()
        .filter_map(|t| t.id.as_ref().map(|id| (id.to_string(), t.name.clone())))
        .collect()
}

fn archived_name_map(archived: Vec<ArchivedType>) -> HashMap<String, String> {
    // Rows arrive newest-first; keep the most recent name per type id.
    let mut map = HashMap::new();
    for row in archived {
        map.entry(row.type_id.to_string()).or_insert(row.name);
    }
    map
}

fn resolve_counts(
    counts: Vec<(RecordId, u64)>,
    names: &HashMap<String, String>,
) -> Vec<(String, u64)> {
    let mut resolved: Vec<(String, u64)> = counts
        .into_iter()
        .filter_map(|(id, n)| names.get(&id.to_string()).map(|name| (name.clone(), n)))
        .collect();
    resolved.sort();
    resolved
}

fn suffixed(counts: &[(String, u64)], suffix: &str) -> Vec<TypeInscriptionCount> {
    counts
        .iter()
        .map(|(name, n)| TypeInscriptionCount {
            name: format!("{} ({})", name, suffix),
            inscriptions: *n,
        })
        .collect()
}

fn beneficiary_series(counts: Vec<(String, u64)>) -> Vec<BeneficiaryInscriptionCount> {
    counts
        .into_iter()
        .map(|(beneficiary, n)| BeneficiaryInscriptionCount {
            beneficiary,
            inscriptions: n,
        })
        .collect()
}
