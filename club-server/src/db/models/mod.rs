//! Database Models

// Serde helpers
pub mod serde_helpers;

// Type registries (club types, sport-activity types) + archives
pub mod type_record;

// Memberships
pub mod activity;
pub mod club;

// Events
pub mod event;
pub mod registration;

// Reviews
pub mod review;

// Users
pub mod user;

// Re-exports
pub use activity::{Activity, ActivityCreate, ActivityUpdate, ActivityWithType};
pub use club::{Club, ClubCreate, ClubUpdate, ClubWithType};
pub use event::{Event, EventFields, EventWithAvailability};
pub use registration::{
    EVENT_STATUS_ACTIVE, EVENT_STATUS_EXPIRED, Registration, RegistrationCreate,
    RegistrationUpdate,
};
pub use review::{Review, ReviewCreate};
pub use type_record::{
    ArchivedType, STATUS_ACTIVE, STATUS_EXPIRED, TypeRecord, TypeRecordCreate, TypeRecordUpdate,
};
pub use user::{User, UserCreate, UserUpdate};
