use serde::{Deserialize, Serialize};

use super::symptom::SymptomRatings;

/// One saved symptom log with the vitals current at save time.
///
/// A vital of 0.0 means it was never measured in that session, not a
/// physiological zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Assigned by the store on first insert. Inserting with an existing id
    /// replaces that row.
    pub id: Option<i64>,
    pub heart_rate: f64,
    pub respiratory_rate: f64,
    pub symptoms: SymptomRatings,
}

impl HealthRecord {
    pub fn new(heart_rate: f64, respiratory_rate: f64, symptoms: SymptomRatings) -> Self {
        Self {
            id: None,
            heart_rate,
            respiratory_rate,
            symptoms,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
