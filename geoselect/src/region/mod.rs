//! Geographic identifiers and static reference data.
//!
//! - [`Code`] / [`Level`] - what a selection is made of
//! - [`STATES`] / [`COUNTIES`] - checklist tables used to reconcile
//!   boundary names and geocoder output with codes

mod tables;
mod types;

pub use tables::{
    checklist, county_by_code, county_code_for_label, is_state_code, state_code_for_name,
    CountyEntry, StateEntry, COUNTIES, STATES,
};
pub use types::{Code, Level, ParseLevelError, RegionRecord};
