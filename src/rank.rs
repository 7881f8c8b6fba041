// ABOUTME: Monthly ninja rank classifier mapping point totals to tier labels
// ABOUTME: Six inclusive bands from Estudiante de la Academia up to Hokage

//! Rank classification.
//!
//! A period's point total maps to one of six named tiers through ordered
//! inclusive bands. The bands are contiguous, non-overlapping, and cover
//! `[0, +inf)`: anything at or above the top threshold is Hokage, never an
//! error. Callers guarantee the total is non-negative (it is a sum of
//! non-negative daily scores).

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::constants::ranks;

/// A named tier for a period's cumulative points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// 0-30 points: occasional participation
    Estudiante,
    /// 31-60 points: moderate, steady participation
    Genin,
    /// 61-90 points: solid commitment
    Chunin,
    /// 91-110 points: high discipline
    Jounin,
    /// 111-119 points: near perfection
    Sannin,
    /// 120+ points: every activity, every day
    Hokage,
}

impl Rank {
    /// Classify a period's point total
    ///
    /// Thresholds are checked from the top down, exactly as the group's
    /// rules read: 120 or more is Hokage, 111 or more Sannin, and so on
    /// down to Estudiante de la Academia for 30 and below.
    #[must_use]
    pub const fn for_points(points: u32) -> Self {
        if points >= ranks::HOKAGE_MIN {
            Self::Hokage
        } else if points >= ranks::SANNIN_MIN {
            Self::Sannin
        } else if points >= ranks::JOUNIN_MIN {
            Self::Jounin
        } else if points >= ranks::CHUNIN_MIN {
            Self::Chunin
        } else if points >= ranks::GENIN_MIN {
            Self::Genin
        } else {
            Self::Estudiante
        }
    }

    /// Full display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Estudiante => "Estudiante de la Academia",
            Self::Genin => "Genin",
            Self::Chunin => "Chunin",
            Self::Jounin => "Jounin",
            Self::Sannin => "Sannin Legendario",
            Self::Hokage => "Hokage",
        }
    }

    /// Emoji shown next to the label
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Estudiante => "\u{1f468}\u{200d}\u{1f393}",
            Self::Genin => "\u{1f94b}",
            Self::Chunin => "\u{1f3af}",
            Self::Jounin => "\u{2694}\u{fe0f}",
            Self::Sannin => "\u{1f3c6}",
            Self::Hokage => "\u{1f451}",
        }
    }

    /// Chart color used by leaderboard renderers
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Estudiante => "#808080",
            Self::Genin => "#90EE90",
            Self::Chunin => "#4169E1",
            Self::Jounin => "#800080",
            Self::Sannin => "#FFD700",
            Self::Hokage => "#FF4500",
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}
