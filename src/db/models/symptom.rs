//! Self-reported symptom catalogue and per-log severity ratings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Symptom {
    Nausea,
    Headache,
    Diarrhea,
    SoreThroat,
    Fever,
    MuscleAche,
    LossOfSmellOrTaste,
    Cough,
    ShortnessOfBreath,
    FeelingTired,
}

impl Symptom {
    pub const ALL: [Symptom; 10] = [
        Symptom::Nausea,
        Symptom::Headache,
        Symptom::Diarrhea,
        Symptom::SoreThroat,
        Symptom::Fever,
        Symptom::MuscleAche,
        Symptom::LossOfSmellOrTaste,
        Symptom::Cough,
        Symptom::ShortnessOfBreath,
        Symptom::FeelingTired,
    ];

    /// Label shown in the symptom picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            Symptom::Nausea => "Nausea",
            Symptom::Headache => "Headache",
            Symptom::Diarrhea => "Diarrhea",
            Symptom::SoreThroat => "Sore Throat",
            Symptom::Fever => "Fever",
            Symptom::MuscleAche => "Muscle Ache",
            Symptom::LossOfSmellOrTaste => "Loss of Smell or Taste",
            Symptom::Cough => "Cough",
            Symptom::ShortnessOfBreath => "Shortness of Breath",
            Symptom::FeelingTired => "Feeling Tired",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Symptom::Nausea => "nausea",
            Symptom::Headache => "headache",
            Symptom::Diarrhea => "diarrhea",
            Symptom::SoreThroat => "sore_throat",
            Symptom::Fever => "fever",
            Symptom::MuscleAche => "muscle_ache",
            Symptom::LossOfSmellOrTaste => "loss_of_smell_or_taste",
            Symptom::Cough => "cough",
            Symptom::ShortnessOfBreath => "shortness_of_breath",
            Symptom::FeelingTired => "feeling_tired",
        }
    }

    /// Case-insensitive lookup by display name. Older UI builds spelled two
    /// of the labels differently, and those are still accepted.
    pub fn from_name(name: &str) -> Option<Symptom> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("Soar Throat") {
            return Some(Symptom::SoreThroat);
        }
        if name.eq_ignore_ascii_case("Loss of Smell/Taste") {
            return Some(Symptom::LossOfSmellOrTaste);
        }
        Symptom::ALL
            .into_iter()
            .find(|symptom| symptom.display_name().eq_ignore_ascii_case(name))
    }
}

/// Severity per symptom, each in `0..=MAX_RATING`. Unrated symptoms are 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRatings {
    pub nausea: u8,
    pub headache: u8,
    pub diarrhea: u8,
    pub sore_throat: u8,
    pub fever: u8,
    pub muscle_ache: u8,
    pub loss_of_smell_or_taste: u8,
    pub cough: u8,
    pub shortness_of_breath: u8,
    pub feeling_tired: u8,
}

impl SymptomRatings {
    pub fn get(&self, symptom: Symptom) -> u8 {
        match symptom {
            Symptom::Nausea => self.nausea,
            Symptom::Headache => self.headache,
            Symptom::Diarrhea => self.diarrhea,
            Symptom::SoreThroat => self.sore_throat,
            Symptom::Fever => self.fever,
            Symptom::MuscleAche => self.muscle_ache,
            Symptom::LossOfSmellOrTaste => self.loss_of_smell_or_taste,
            Symptom::Cough => self.cough,
            Symptom::ShortnessOfBreath => self.shortness_of_breath,
            Symptom::FeelingTired => self.feeling_tired,
        }
    }

    /// Sets a rating, clamped to `0..=MAX_RATING`.
    pub fn set(&mut self, symptom: Symptom, rating: u8) {
        let rating = rating.min(MAX_RATING);
        let slot = match symptom {
            Symptom::Nausea => &mut self.nausea,
            Symptom::Headache => &mut self.headache,
            Symptom::Diarrhea => &mut self.diarrhea,
            Symptom::SoreThroat => &mut self.sore_throat,
            Symptom::Fever => &mut self.fever,
            Symptom::MuscleAche => &mut self.muscle_ache,
            Symptom::LossOfSmellOrTaste => &mut self.loss_of_smell_or_taste,
            Symptom::Cough => &mut self.cough,
            Symptom::ShortnessOfBreath => &mut self.shortness_of_breath,
            Symptom::FeelingTired => &mut self.feeling_tired,
        };
        *slot = rating;
    }

    /// Builds ratings from the picker's name → severity map. Unknown names are
    /// dropped and out-of-range severities clamped, both with a warning.
    pub fn from_named(named: &HashMap<String, i32>) -> Self {
        let mut ratings = Self::default();
        for (name, &value) in named {
            let Some(symptom) = Symptom::from_name(name) else {
                log_warn!("Ignoring rating for unknown symptom '{}'", name);
                continue;
            };
            let clamped = value.clamp(0, i32::from(MAX_RATING));
            if clamped != value {
                log_warn!(
                    "Rating {} for '{}' outside 0..={}, stored as {}",
                    value,
                    name,
                    MAX_RATING,
                    clamped
                );
            }
            ratings.set(symptom, clamped as u8);
        }
        ratings
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symptom, u8)> + '_ {
        Symptom::ALL.into_iter().map(|symptom| (symptom, self.get(symptom)))
    }
}
