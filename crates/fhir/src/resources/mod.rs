//! Resource types.

mod bundle;
mod observation;
mod organization;
mod patient;

pub use bundle::{BUNDLE_ENTRY_TYPE, BUNDLE_TYPE, Bundle, BundleEntry};
pub use observation::{OBSERVATION_TYPE, Observation, ObservationEffective, ObservationValue};
pub use organization::{ORGANIZATION_TYPE, Organization};
pub use patient::{PATIENT_TYPE, Patient, PatientDeceased, PatientMultipleBirth};
