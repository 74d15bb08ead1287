use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::models::volume_profile::VolumeProfile;

/// Distance score for a price sitting exactly on a Value Area boundary.
pub const DISTANCE_AT_BOUNDARY: u8 = 10;
/// Distance score for a price beyond a boundary on its signal side.
pub const DISTANCE_BEYOND_BOUNDARY: u8 = 11;
/// Largest score a price strictly inside the Value Area can get.
pub const DISTANCE_INSIDE_MAX: u8 = 9;

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    #[strum(serialize = "BUY")]
    Buy,
    #[strum(serialize = "SELL")]
    Sell,
    #[strum(serialize = "NEUTRAL")]
    Neutral,
}

impl SignalKind {
    pub fn reason(&self) -> &'static str {
        match self {
            SignalKind::Buy => "price below the lower Value Area boundary",
            SignalKind::Sell => "price above the upper Value Area boundary",
            SignalKind::Neutral => "price inside the Value Area",
        }
    }
}

/// A classified price with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub reason: &'static str,
}

impl Signal {
    fn new(kind: SignalKind) -> Self {
        Self {
            kind,
            reason: kind.reason(),
        }
    }

    /// Buy and Sell are actionable, Neutral is not.
    pub fn is_actionable(&self) -> bool {
        !matches!(self.kind, SignalKind::Neutral)
    }

    pub fn alert_banner(&self) -> Option<String> {
        match self.kind {
            SignalKind::Buy => Some("🚨 BUY SIGNAL! 🚨".to_string()),
            SignalKind::Sell => Some("🚨 SELL SIGNAL! 🚨".to_string()),
            SignalKind::Neutral => None,
        }
    }
}

/// Compares `current_price` with the Value Area. Boundaries count as inside.
pub fn classify(profile: &VolumeProfile, current_price: f64) -> Signal {
    if current_price > profile.value_area_upper {
        Signal::new(SignalKind::Sell)
    } else if current_price < profile.value_area_lower {
        Signal::new(SignalKind::Buy)
    } else {
        Signal::new(SignalKind::Neutral)
    }
}

/// Position of a price relative to each Value Area boundary on a 1..=11 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundaryDistance {
    pub upper: u8,
    pub lower: u8,
}

/// Scores how close `current_price` is to each boundary.
///
/// 10 means on the boundary and 11 beyond it. Otherwise the price's relative
/// position `(price - lower) / (upper - lower)` (its complement for the lower
/// boundary) is clamped to `[0, 1]` and mapped through `1 + 9 * fraction`,
/// rounded half to even and capped at 9 so that 10 stays reserved for the
/// boundary itself. A price past the opposite boundary therefore scores 1.
///
/// A zero-width Value Area has no interior, so the interpolated branch scores 1.
pub fn distance_scale(
    current_price: f64,
    value_area_upper: f64,
    value_area_lower: f64,
) -> ProfileResult<BoundaryDistance> {
    if !current_price.is_finite() || !value_area_upper.is_finite() || !value_area_lower.is_finite()
    {
        return Err(ProfileError::invalid_input(format!(
            "non-finite distance input: price {}, upper {}, lower {}",
            current_price, value_area_upper, value_area_lower
        )));
    }
    if value_area_upper < value_area_lower {
        return Err(ProfileError::invalid_input(format!(
            "Value Area upper {} is below lower {}",
            value_area_upper, value_area_lower
        )));
    }

    let range = value_area_upper - value_area_lower;

    let upper = if current_price == value_area_upper {
        DISTANCE_AT_BOUNDARY
    } else if current_price > value_area_upper {
        DISTANCE_BEYOND_BOUNDARY
    } else {
        interpolate(current_price - value_area_lower, range)
    };

    let lower = if current_price == value_area_lower {
        DISTANCE_AT_BOUNDARY
    } else if current_price < value_area_lower {
        DISTANCE_BEYOND_BOUNDARY
    } else {
        interpolate(value_area_upper - current_price, range)
    };

    Ok(BoundaryDistance { upper, lower })
}

fn interpolate(offset: f64, range: f64) -> u8 {
    if range == 0.0 {
        return 1;
    }
    let fraction = (offset / range).clamp(0.0, 1.0);
    let score = (1.0 + fraction * 9.0).round_ties_even() as u8;
    score.clamp(1, DISTANCE_INSIDE_MAX)
}
