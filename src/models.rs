// ABOUTME: Core data models for the Winter Arc tracker domain
// ABOUTME: User, Activity, ActivityFlags, ActivityRecord, and WeightEntry definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain models shared by the stores, the scoring core, and the HTTP layer.
//!
//! The four daily activity categories are fixed: physical activity, diet and
//! nutrition, rest and recovery, and personal development. A day's log is a
//! structured [`ActivityFlags`] value with named boolean fields, validated at
//! the store boundary rather than manipulated as loosely typed columns.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// The four fixed daily activity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Physical training of any kind
    PhysicalActivity,
    /// Eating according to plan
    DietNutrition,
    /// Sleep, rest, or active recovery
    RestRecovery,
    /// Reading, studying, or skill practice
    PersonalDevelopment,
}

impl Activity {
    /// All categories in canonical column order
    pub const ALL: [Self; 4] = [
        Self::PhysicalActivity,
        Self::DietNutrition,
        Self::RestRecovery,
        Self::PersonalDevelopment,
    ];

    /// Stable identifier used in URLs and database columns
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhysicalActivity => "physical_activity",
            Self::DietNutrition => "diet_nutrition",
            Self::RestRecovery => "rest_recovery",
            Self::PersonalDevelopment => "personal_development",
        }
    }

    /// Display label as shown to the group
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PhysicalActivity => "Actividad Fisica",
            Self::DietNutrition => "Dieta y Nutricion",
            Self::RestRecovery => "Descanso o Recuperacion",
            Self::PersonalDevelopment => "Desarrollo Personal",
        }
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Activity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical_activity" => Ok(Self::PhysicalActivity),
            "diet_nutrition" => Ok(Self::DietNutrition),
            "rest_recovery" => Ok(Self::RestRecovery),
            "personal_development" => Ok(Self::PersonalDevelopment),
            _ => Err(AppError::invalid_input(format!("Unknown activity: {s}"))),
        }
    }
}

/// One day's completion flags, defaulting to nothing done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFlags {
    /// Physical training completed
    #[serde(default)]
    pub physical_activity: bool,
    /// Diet followed
    #[serde(default)]
    pub diet_nutrition: bool,
    /// Rest or recovery completed
    #[serde(default)]
    pub rest_recovery: bool,
    /// Personal development completed
    #[serde(default)]
    pub personal_development: bool,
}

impl ActivityFlags {
    /// Read the flag for one category
    #[must_use]
    pub const fn get(&self, activity: Activity) -> bool {
        match activity {
            Activity::PhysicalActivity => self.physical_activity,
            Activity::DietNutrition => self.diet_nutrition,
            Activity::RestRecovery => self.rest_recovery,
            Activity::PersonalDevelopment => self.personal_development,
        }
    }

    /// Flags with every category completed
    #[must_use]
    pub const fn all_done() -> Self {
        Self {
            physical_activity: true,
            diet_nutrition: true,
            rest_recovery: true,
            personal_development: true,
        }
    }
}

/// A tracked user
///
/// Usernames are unique case-insensitively: comparisons lower-case both
/// sides, so `Alice` and `alice` are the same account. The optional weight
/// target is stamped with the moment it was last set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name, unique case-insensitively
    pub username: String,
    /// Bcrypt hash of the login password; absent in the unauthenticated
    /// flat-file variant
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Goal weight in kilograms, if set
    pub target_weight: Option<f64>,
    /// When the goal weight was last set
    pub target_weight_date: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with a fresh id and creation timestamp
    #[must_use]
    pub fn new(
        username: String,
        password_hash: Option<String>,
        target_weight: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: now,
            target_weight,
            target_weight_date: target_weight.map(|_| now),
        }
    }
}

/// One user's activity log for one calendar date
///
/// At most one record exists per `(user, date)`; saving again for the same
/// date replaces the earlier record. `points` is always derived from the
/// flags when the record is written, never trusted from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Owning user
    pub user_id: Uuid,
    /// Calendar date the log covers
    pub date: NaiveDate,
    /// Completion flags for the four categories
    #[serde(flatten)]
    pub flags: ActivityFlags,
    /// Points derived from the flags
    pub points: u32,
}

/// One weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Owning user
    pub user_id: Uuid,
    /// Measurement date
    pub date: NaiveDate,
    /// Weight in kilograms, always positive
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_round_trips_through_str() {
        for activity in Activity::ALL {
            assert_eq!(activity.as_str().parse::<Activity>().ok(), Some(activity));
        }
    }

    #[test]
    fn unknown_activity_is_rejected() {
        assert!("sleep_tracking".parse::<Activity>().is_err());
    }

    #[test]
    fn default_flags_are_all_false() {
        let flags = ActivityFlags::default();
        for activity in Activity::ALL {
            assert!(!flags.get(activity));
        }
    }

    #[test]
    fn new_user_stamps_target_date_only_with_target() {
        let with_target = User::new("alice".into(), None, Some(70.0));
        assert!(with_target.target_weight_date.is_some());

        let without_target = User::new("bob".into(), None, None);
        assert!(without_target.target_weight_date.is_none());
    }
}
