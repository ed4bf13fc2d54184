//! Fuzzy survival controller: maps (state of charge, remaining distance) to a
//! driving aggression factor.
//!
//! Three stages, all pure:
//! 1. fuzzify the battery and distance readings into membership degrees,
//! 2. evaluate the rule base (min for AND, max for OR),
//! 3. defuzzify with a weighted average of singleton outputs.

use serde::{Deserialize, Serialize};

/// Singleton output of the survival rule.
pub const SURVIVAL_OUTPUT: f64 = 0.4;
/// Singleton output of the eco rule.
pub const ECO_OUTPUT: f64 = 0.7;
/// Singleton output of the sport rule; also the default when no rule fires.
pub const SPORT_OUTPUT: f64 = 1.0;

fn clip(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Degrees of truth for the battery concepts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryMemberships {
    pub critical: f64,
    pub low: f64,
    pub normal: f64,
    /// Computed for completeness; no rule consumes it.
    pub full: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistanceMemberships {
    pub close: f64,
    pub far: f64,
}

pub fn fuzzify_battery(soc: f64) -> BatteryMemberships {
    let low = if soc < 0.20 {
        clip((soc - 0.10) / 0.10)
    } else {
        clip((0.40 - soc) / 0.20)
    };
    BatteryMemberships {
        critical: clip((0.20 - soc) / 0.10),
        low,
        normal: clip((soc - 0.30) / 0.20),
        full: clip((soc - 0.60) / 0.40),
    }
}

pub fn fuzzify_distance(distance_remaining_km: f64) -> DistanceMemberships {
    DistanceMemberships {
        close: clip((20.0 - distance_remaining_km) / 20.0),
        far: clip((distance_remaining_km - 20.0) / 60.0),
    }
}

/// Firing strength of each rule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleStrengths {
    pub survival: f64,
    pub eco: f64,
    pub sport: f64,
}

impl RuleStrengths {
    pub fn total(&self) -> f64 {
        self.survival + self.eco + self.sport
    }
}

pub fn evaluate_rules(battery: &BatteryMemberships, distance: &DistanceMemberships) -> RuleStrengths {
    RuleStrengths {
        // critical AND far
        survival: battery.critical.min(distance.far),
        // low AND far
        eco: battery.low.min(distance.far),
        // normal OR (low AND close)
        sport: battery.normal.max(battery.low.min(distance.close)),
    }
}

/// Weighted average of the singleton outputs. Returns [`SPORT_OUTPUT`] when
/// no rule fired.
pub fn defuzzify(strengths: RuleStrengths) -> f64 {
    let denominator = strengths.total();
    if denominator == 0.0 {
        return SPORT_OUTPUT;
    }
    let numerator = strengths.survival * SURVIVAL_OUTPUT
        + strengths.eco * ECO_OUTPUT
        + strengths.sport * SPORT_OUTPUT;
    // A weighted average of the singletons; clamp only absorbs rounding.
    (numerator / denominator).clamp(SURVIVAL_OUTPUT, SPORT_OUTPUT)
}

/// Full trace of one inference, for observability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyDecision {
    pub battery: BatteryMemberships,
    pub distance: DistanceMemberships,
    pub strengths: RuleStrengths,
    pub aggression: f64,
}

impl FuzzyDecision {
    pub fn mode(&self) -> DrivingMode {
        DrivingMode::from_aggression(self.aggression)
    }
}

pub fn infer(soc: f64, distance_remaining_km: f64) -> FuzzyDecision {
    let battery = fuzzify_battery(soc);
    let distance = fuzzify_distance(distance_remaining_km);
    let strengths = evaluate_rules(&battery, &distance);
    FuzzyDecision {
        battery,
        distance,
        strengths,
        aggression: defuzzify(strengths),
    }
}

/// Aggression factor in `[0.4, 1.0]` for the given state of charge (fraction)
/// and remaining distance (km).
pub fn calculate_aggression(soc: f64, distance_remaining_km: f64) -> f64 {
    infer(soc, distance_remaining_km).aggression
}

/// Display-only classification of an aggression factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingMode {
    Sport,
    Eco,
    Survival,
}

impl DrivingMode {
    pub fn from_aggression(aggression: f64) -> Self {
        if aggression > 0.9 {
            DrivingMode::Sport
        } else if aggression > 0.6 {
            DrivingMode::Eco
        } else {
            DrivingMode::Survival
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrivingMode::Sport => "sport",
            DrivingMode::Eco => "eco",
            DrivingMode::Survival => "survival",
        }
    }
}

impl std::fmt::Display for DrivingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn survival_leaning_example() {
        let decision = infer(0.15, 50.0);
        assert!((decision.battery.critical - 0.5).abs() < EPS);
        assert!((decision.battery.low - 0.5).abs() < EPS);
        assert_eq!(decision.battery.normal, 0.0);
        assert!((decision.distance.far - 0.5).abs() < EPS);
        assert_eq!(decision.distance.close, 0.0);
        assert!((decision.strengths.survival - 0.5).abs() < EPS);
        assert!((decision.strengths.eco - 0.5).abs() < EPS);
        assert_eq!(decision.strengths.sport, 0.0);
        assert!((decision.aggression - 0.55).abs() < EPS);
        assert_eq!(decision.mode(), DrivingMode::Survival);
    }

    #[test]
    fn sport_leaning_example() {
        let decision = infer(0.95, 10.0);
        assert_eq!(decision.battery.critical, 0.0);
        assert_eq!(decision.battery.low, 0.0);
        assert_eq!(decision.battery.normal, 1.0);
        assert_eq!(decision.distance.far, 0.0);
        assert!((decision.distance.close - 0.5).abs() < EPS);
        assert_eq!(decision.strengths.sport, 1.0);
        assert_eq!(decision.aggression, 1.0);
        assert_eq!(decision.mode(), DrivingMode::Sport);
    }

    #[test]
    fn defuzzify_defaults_to_sport_when_no_rule_fires() {
        assert_eq!(defuzzify(RuleStrengths::default()), 1.0);
    }

    #[test]
    fn zero_rule_point_on_the_domain_returns_default() {
        // normal is 0 at 30%, and 20 km is neither close nor far.
        let decision = infer(0.30, 20.0);
        assert_eq!(decision.strengths.total(), 0.0);
        assert_eq!(decision.aggression, 1.0);
    }

    #[test]
    fn aggression_stays_within_output_range() {
        for soc_step in 0..=200 {
            let soc = soc_step as f64 / 200.0;
            for km in 0..=120 {
                let aggression = calculate_aggression(soc, km as f64);
                assert!(
                    (SURVIVAL_OUTPUT..=SPORT_OUTPUT).contains(&aggression),
                    "soc={soc} km={km} aggression={aggression}"
                );
            }
        }
    }

    #[test]
    fn inference_is_reproducible() {
        let a = calculate_aggression(0.237, 41.3);
        let b = calculate_aggression(0.237, 41.3);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn memberships_are_clipped() {
        let battery = fuzzify_battery(0.0);
        assert_eq!(battery.critical, 1.0);
        assert_eq!(battery.low, 0.0);
        let distance = fuzzify_distance(500.0);
        assert_eq!(distance.far, 1.0);
        assert_eq!(distance.close, 0.0);
    }

    #[test]
    fn mode_thresholds() {
        assert_eq!(DrivingMode::from_aggression(1.0), DrivingMode::Sport);
        assert_eq!(DrivingMode::from_aggression(0.9), DrivingMode::Eco);
        assert_eq!(DrivingMode::from_aggression(0.61), DrivingMode::Eco);
        assert_eq!(DrivingMode::from_aggression(0.6), DrivingMode::Survival);
        assert_eq!(DrivingMode::Eco.to_string(), "eco");
    }
}
