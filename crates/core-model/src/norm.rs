//! Universal score normalization: every detector's raw scale maps into
//! [1.0, 3.0] through one of four declared profiles.
//!
//! Contract (must hold for any profile and any declared range):
//! * output is always inside [1.0, 3.0] (clamped at both ends),
//! * monotone in `raw` for a fixed spec,
//! * `g4hunter` normalizes `|raw|` (the G4Hunter signal is signed; C-rich
//!   mirrors score negative),
//! * `zdna_cumulative` is the log profile pinned to raw_min 50, raw_max 2000
//!   regardless of what a caller passes in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormProfile {
    Linear,
    Log,
    G4hunter,
    ZdnaCumulative,
}

/// A detector's declared normalization: profile plus raw range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormSpec {
    pub profile: NormProfile,
    pub raw_min: f64,
    pub raw_max: f64,
}

/// Cumulative Z-DNA raw bounds (fixed by the profile, not the caller).
const ZDNA_RAW_MIN: f64 = 50.0;
const ZDNA_RAW_MAX: f64 = 2000.0;

impl NormSpec {
    pub const fn linear(raw_min: f64, raw_max: f64) -> Self {
        Self {
            profile: NormProfile::Linear,
            raw_min,
            raw_max,
        }
    }

    pub const fn log(raw_min: f64, raw_max: f64) -> Self {
        Self {
            profile: NormProfile::Log,
            raw_min,
            raw_max,
        }
    }

    pub const fn g4hunter(raw_min: f64, raw_max: f64) -> Self {
        Self {
            profile: NormProfile::G4hunter,
            raw_min,
            raw_max,
        }
    }

    pub const fn zdna_cumulative() -> Self {
        Self {
            profile: NormProfile::ZdnaCumulative,
            raw_min: ZDNA_RAW_MIN,
            raw_max: ZDNA_RAW_MAX,
        }
    }

    /// Map a raw score into [1.0, 3.0].
    pub fn normalize(&self, raw: f64) -> f64 {
        let fraction = match self.profile {
            NormProfile::Linear => linear_fraction(raw, self.raw_min, self.raw_max),
            NormProfile::Log => log_fraction(raw, self.raw_min, self.raw_max),
            NormProfile::G4hunter => linear_fraction(raw.abs(), self.raw_min, self.raw_max),
            NormProfile::ZdnaCumulative => log_fraction(raw, ZDNA_RAW_MIN, ZDNA_RAW_MAX),
        };
        1.0 + 2.0 * fraction
    }
}

fn linear_fraction(raw: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((raw - min) / (max - min)).clamp(0.0, 1.0)
}

fn log_fraction(raw: f64, min: f64, max: f64) -> f64 {
    if max <= min || min <= 0.0 {
        return 0.0;
    }
    if raw <= min {
        return 0.0;
    }
    ((raw.ln() - min.ln()) / (max.ln() - min.ln())).clamp(0.0, 1.0)
}
