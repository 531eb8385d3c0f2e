//! A single flower holding a depletable amount of nectar.

use crate::math;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Fixed pickup point and "front" direction of a flower. Immutable once built.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AnchorPose {
    /// Center of the nectar pickup zone.
    pub position: [f64; 3],
    /// Unit vector pointing straight out of the flower.
    pub up: [f64; 3],
}

impl AnchorPose {
    pub fn new(position: [f64; 3], up: [f64; 3]) -> Self {
        assert!(math::length(up) > 0.0, "anchor up axis cannot be zero");
        Self {
            position,
            up: math::normalize_or_zero(up),
        }
    }
}

/// Visual state exposed to the rendering collaborator as data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    #[default]
    Full,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedError {
    NegativeAmount { amount: f32 },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::NegativeAmount { amount } => {
                write!(f, "feed amount must be non-negative, got {amount}")
            }
        }
    }
}

impl Error for FeedError {}

/// A flower with a nectar reserve, two interaction-surface activation flags
/// consumed by the external collision system, and a visual indicator.
///
/// Invariant: `0 <= nectar <= capacity`, and both surfaces are inactive with
/// an `Empty` indicator exactly when `nectar == 0`.
#[derive(Clone, Debug)]
pub struct Flower {
    nectar: f32,
    capacity: f32,
    anchor: AnchorPose,
    nectar_collider_active: bool,
    flower_collider_active: bool,
    indicator: Indicator,
}

impl Flower {
    /// Create a full flower. `capacity` must be positive.
    pub fn new(capacity: f32, anchor: AnchorPose) -> Self {
        assert!(capacity > 0.0, "flower capacity must be positive");
        Self {
            nectar: capacity,
            capacity,
            anchor,
            nectar_collider_active: true,
            flower_collider_active: true,
            indicator: Indicator::Full,
        }
    }

    /// Attempt to remove nectar. Returns the amount actually taken.
    ///
    /// The return value is clamped to what is available, while the reserve is
    /// reduced by the raw `amount` and floored at zero, so an over-request
    /// empties the flower in one call. Reaching zero deactivates both
    /// interaction surfaces and flips the indicator to `Empty`.
    pub fn feed(&mut self, amount: f32) -> Result<f32, FeedError> {
        if amount < 0.0 {
            return Err(FeedError::NegativeAmount { amount });
        }
        let taken = amount.clamp(0.0, self.nectar);
        self.nectar = (self.nectar - amount).max(0.0);
        if self.nectar == 0.0 {
            self.nectar_collider_active = false;
            self.flower_collider_active = false;
            self.indicator = Indicator::Empty;
        }
        Ok(taken)
    }

    /// Refill to capacity and reactivate both interaction surfaces. Idempotent.
    pub fn reset(&mut self) {
        self.nectar = self.capacity;
        self.nectar_collider_active = true;
        self.flower_collider_active = true;
        self.indicator = Indicator::Full;
    }

    pub fn has_nectar(&self) -> bool {
        self.nectar > 0.0
    }

    pub fn nectar(&self) -> f32 {
        self.nectar
    }

    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    pub fn anchor(&self) -> &AnchorPose {
        &self.anchor
    }

    pub fn nectar_collider_active(&self) -> bool {
        self.nectar_collider_active
    }

    pub fn flower_collider_active(&self) -> bool {
        self.flower_collider_active
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }
}
