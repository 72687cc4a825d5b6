// src/metrics/calories.rs
//! Distance-based energy expenditure estimate
//!
//! Uses the ACSM metabolic equation for running expressed per meter rather
//! than per minute: 0.2 ml O2/kg for each horizontal meter plus 0.9 ml O2/kg
//! for each vertical meter climbed, at 5 kcal per liter of oxygen. The
//! vertical term only applies uphill. Running outdoors is treated as a 1%
//! treadmill incline. The resting component is excluded, so the figure is the
//! net cost of the distance covered.

use serde::{Deserialize, Serialize};

const HORIZONTAL_O2_ML_PER_KG_M: f64 = 0.2;
const VERTICAL_O2_ML_PER_KG_M: f64 = 0.9;
const KCAL_PER_LITER_O2: f64 = 5.0;
const OUTDOOR_GRADE_EQUIVALENT: f64 = 0.01;

/// Physiological parameters for the calorie model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalorieProfile {
    /// Average grade as a fraction; negative is downhill
    pub slope: f64,
    pub mass_kg: f64,
    pub resting_heart_rate: f64,
    pub age: f64,
    pub treadmill: bool,
}

impl Default for CalorieProfile {
    fn default() -> Self {
        Self {
            slope: -0.015,
            mass_kg: 80.0,
            resting_heart_rate: 80.0,
            age: 23.0,
            treadmill: false,
        }
    }
}

impl CalorieProfile {
    /// Tanaka estimate of maximum heart rate
    pub fn max_heart_rate(&self) -> f64 {
        208.0 - 0.7 * self.age
    }

    /// Uth heart-rate ratio estimate of VO2max in ml/kg/min
    pub fn estimated_vo2max(&self) -> f64 {
        15.3 * self.max_heart_rate() / self.resting_heart_rate
    }

    fn effective_grade(&self) -> f64 {
        if self.treadmill {
            self.slope
        } else {
            self.slope + OUTDOOR_GRADE_EQUIVALENT
        }
    }

    /// Oxygen cost in ml per kilogram per meter
    fn oxygen_per_kg_m(&self) -> f64 {
        HORIZONTAL_O2_ML_PER_KG_M + VERTICAL_O2_ML_PER_KG_M * self.effective_grade().max(0.0)
    }
}

/// Estimated kilocalories for covering `distance_m`, rounded to whole kcal.
///
/// Invalid numeric input (NaN) propagates to the result.
pub fn estimate_calories(distance_m: f64, profile: &CalorieProfile) -> f64 {
    let oxygen_liters = distance_m * profile.mass_kg * profile.oxygen_per_kg_m() / 1000.0;
    (oxygen_liters * KCAL_PER_LITER_O2).round()
}
