// ABOUTME: Pure scoring function deriving daily points from activity flags
// ABOUTME: ActivityWeights table with unit defaults, applied per completed category

//! Daily point scoring.
//!
//! A day's points are the weighted count of completed activities. Every
//! observed deployment runs the default table (one point per category, daily
//! range 0..=4), but the weight table is explicit so a group can rebalance
//! without touching the scoring code.

use serde::{Deserialize, Serialize};

use crate::constants::weights::POINTS_PER_ACTIVITY;
use crate::models::{Activity, ActivityFlags};

/// Per-activity point weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWeights {
    /// Points for completed physical activity
    pub physical_activity: u32,
    /// Points for following the diet
    pub diet_nutrition: u32,
    /// Points for rest or recovery
    pub rest_recovery: u32,
    /// Points for personal development
    pub personal_development: u32,
}

impl Default for ActivityWeights {
    fn default() -> Self {
        Self {
            physical_activity: POINTS_PER_ACTIVITY,
            diet_nutrition: POINTS_PER_ACTIVITY,
            rest_recovery: POINTS_PER_ACTIVITY,
            personal_development: POINTS_PER_ACTIVITY,
        }
    }
}

impl ActivityWeights {
    /// Weight for one category
    #[must_use]
    pub const fn get(&self, activity: Activity) -> u32 {
        match activity {
            Activity::PhysicalActivity => self.physical_activity,
            Activity::DietNutrition => self.diet_nutrition,
            Activity::RestRecovery => self.rest_recovery,
            Activity::PersonalDevelopment => self.personal_development,
        }
    }

    /// Largest possible daily total under this table
    #[must_use]
    pub const fn daily_maximum(&self) -> u32 {
        self.physical_activity + self.diet_nutrition + self.rest_recovery + self.personal_development
    }
}

/// Points for one day's flags under the given weight table
///
/// Pure function: the sum of `flag as u32 * weight` over the four
/// categories. Under default unit weights the result is the count of
/// completed activities.
#[must_use]
pub fn score(flags: ActivityFlags, weights: ActivityWeights) -> u32 {
    Activity::ALL
        .iter()
        .filter(|activity| flags.get(**activity))
        .map(|activity| weights.get(*activity))
        .sum()
}
