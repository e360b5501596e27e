pub mod health_record;
pub mod symptom;

pub use health_record::HealthRecord;
pub use symptom::{Symptom, SymptomRatings, MAX_RATING};
