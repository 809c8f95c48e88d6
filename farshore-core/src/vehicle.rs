//! Vehicle condition and capability snapshots.
use serde::{Deserialize, Serialize};

/// Independently-tracked vehicle components.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Part {
    Hull,
    Stern,
    Bow,
    Bridge,
}

impl Part {
    /// All parts in canonical order.
    pub const ALL: [Self; 4] = [Self::Hull, Self::Stern, Self::Bow, Self::Bridge];
}

/// Condition snapshot for a single component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartCondition {
    /// Remaining condition (percentage 0-100).
    #[serde(default = "PartCondition::default_condition")]
    pub condition: f32,
    /// Condition lost per unit of route cost executed.
    #[serde(default)]
    pub decay_per_cost: f32,
}

impl Default for PartCondition {
    fn default() -> Self {
        Self {
            condition: Self::default_condition(),
            decay_per_cost: 0.0,
        }
    }
}

impl PartCondition {
    const fn default_condition() -> f32 {
        100.0
    }

    /// Condition normalized for projection math: negative or NaN reads as 0.
    #[must_use]
    pub fn normalized_condition(&self) -> f32 {
        if self.condition.is_nan() || self.condition < 0.0 {
            0.0
        } else {
            self.condition.min(Self::default_condition())
        }
    }

    /// Apply condition loss, clamping at zero.
    pub fn apply_decay(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.condition = (self.normalized_condition() - amount).max(0.0);
    }
}

/// Per-voyage condition state of a vehicle, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VehicleState {
    /// Current rank.
    #[serde(default)]
    pub rank: u8,
    /// Experience accumulated toward the next rank.
    #[serde(default)]
    pub exp: u32,
    /// Average cost of the voyages this vehicle has been running.
    #[serde(default)]
    pub avg_voyage_cost: f32,
    #[serde(default)]
    pub hull: PartCondition,
    #[serde(default)]
    pub stern: PartCondition,
    #[serde(default)]
    pub bow: PartCondition,
    #[serde(default)]
    pub bridge: PartCondition,
}

impl VehicleState {
    /// Condition entry for a part.
    #[must_use]
    pub const fn part(&self, part: Part) -> &PartCondition {
        match part {
            Part::Hull => &self.hull,
            Part::Stern => &self.stern,
            Part::Bow => &self.bow,
            Part::Bridge => &self.bridge,
        }
    }

    /// Mutable condition entry for a part.
    pub const fn part_mut(&mut self, part: Part) -> &mut PartCondition {
        match part {
            Part::Hull => &mut self.hull,
            Part::Stern => &mut self.stern,
            Part::Bow => &mut self.bow,
            Part::Bridge => &mut self.bridge,
        }
    }

    /// Returns true when any component is already out of condition.
    #[must_use]
    pub fn needs_repair(&self) -> bool {
        Part::ALL
            .iter()
            .any(|&part| self.part(part).normalized_condition() <= 0.0)
    }
}

/// Capability snapshot used for a single optimizer invocation.
///
/// The optimizer never mutates this; the feasibility flag it would otherwise
/// write back travels on the returned route result instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCapability {
    /// Current rank; gates which sectors are eligible.
    pub rank: u8,
    /// Maximum cumulative route cost the vehicle can sustain.
    pub range: f32,
    /// Speed-derived divisor applied to per-sector cost.
    #[serde(default = "VehicleCapability::default_speed_factor")]
    pub speed_factor: f32,
    /// Favor-derived discount applied to per-sector cost (0.0 - 0.9).
    #[serde(default)]
    pub favor_discount: f32,
    /// Port-call capacity: maximum stops on a single route.
    #[serde(default = "VehicleCapability::default_max_stops")]
    pub max_stops: usize,
}

impl Default for VehicleCapability {
    fn default() -> Self {
        Self {
            rank: 1,
            range: 0.0,
            speed_factor: Self::default_speed_factor(),
            favor_discount: 0.0,
            max_stops: Self::default_max_stops(),
        }
    }
}

impl VehicleCapability {
    const MIN_SPEED_FACTOR: f32 = 0.05;
    const MAX_FAVOR_DISCOUNT: f32 = 0.9;

    const fn default_speed_factor() -> f32 {
        1.0
    }

    const fn default_max_stops() -> usize {
        5
    }

    /// Cost of visiting a sector under this vehicle's modifiers.
    #[must_use]
    pub fn adjusted_cost(&self, base_cost: f32) -> f32 {
        let speed = self.speed_factor.max(Self::MIN_SPEED_FACTOR);
        let discount = self.favor_discount.clamp(0.0, Self::MAX_FAVOR_DISCOUNT);
        (base_cost / speed) * (1.0 - discount)
    }
}
