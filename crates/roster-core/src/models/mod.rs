//! Data models for the roster engine

mod actor;
mod filters;
mod trip;

pub use actor::{Actor, EditCategory, Role};
pub use filters::RosterFilters;
pub use trip::{CrewMember, DelayReason, TripEdit, TripId, TripRecord};
