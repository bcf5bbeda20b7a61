//! Decides whether the current weather is fit for a game outdoors.

use crate::model::WeatherSnapshot;

pub const MIN_TEMPERATURE_C: f64 = 10.0;
pub const MAX_TEMPERATURE_C: f64 = 30.0;
/// Wind must stay strictly below this.
pub const MAX_WIND_SPEED_MPS: f64 = 10.0;

/// Matched as substrings of the lowercased condition label, so "Light rain"
/// and any longer word containing one of these both disqualify.
pub const DISQUALIFYING_TERMS: [&str; 7] = [
    "rain",
    "snow",
    "thunderstorm",
    "drizzle",
    "squall",
    "tornado",
    "extreme",
];

/// Returns `true` when the snapshot describes weather good enough to play.
///
/// A missing snapshot, temperature or condition label is never suitable.
/// Missing wind speed counts as calm air.
pub fn evaluate(snapshot: Option<&WeatherSnapshot>) -> bool {
    let Some(snapshot) = snapshot else {
        return false;
    };
    let Some(temperature) = snapshot.temperature_c else {
        return false;
    };
    let condition = match snapshot.condition.as_deref() {
        Some(label) if !label.is_empty() => label.to_lowercase(),
        _ => return false,
    };

    let wind = snapshot.wind_speed_mps.unwrap_or(0.0);

    (MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(&temperature)
        && wind < MAX_WIND_SPEED_MPS
        && !DISQUALIFYING_TERMS
            .iter()
            .any(|term| condition.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(temp: Option<f64>, wind: Option<f64>, condition: Option<&str>) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: temp,
            wind_speed_mps: wind,
            condition: condition.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn absent_snapshot_is_unsuitable() {
        assert!(!evaluate(None));
    }

    #[test]
    fn mild_clear_day_is_suitable() {
        let s = snapshot(Some(20.0), Some(5.0), Some("Clear"));
        assert!(evaluate(Some(&s)));
    }

    #[test]
    fn temperature_below_range_is_unsuitable() {
        let s = snapshot(Some(9.9), Some(0.0), Some("Clear"));
        assert!(!evaluate(Some(&s)));
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        assert!(evaluate(Some(&snapshot(Some(10.0), None, Some("Clear")))));
        assert!(evaluate(Some(&snapshot(Some(30.0), None, Some("Clear")))));
        assert!(!evaluate(Some(&snapshot(Some(30.1), None, Some("Clear")))));
    }

    #[test]
    fn wind_at_threshold_is_unsuitable() {
        let s = snapshot(Some(20.0), Some(10.0), Some("Clear"));
        assert!(!evaluate(Some(&s)));

        let s = snapshot(Some(20.0), Some(9.99), Some("Clear"));
        assert!(evaluate(Some(&s)));
    }

    #[test]
    fn disqualifying_term_matches_as_substring() {
        let s = snapshot(Some(20.0), Some(0.0), Some("Light rain"));
        assert!(!evaluate(Some(&s)));

        // "brainstorm" contains "rain"
        let s = snapshot(Some(20.0), Some(0.0), Some("Brainstorm"));
        assert!(!evaluate(Some(&s)));
    }

    #[test]
    fn every_term_disqualifies_case_insensitively() {
        for term in DISQUALIFYING_TERMS {
            let label = term.to_uppercase();
            let s = snapshot(Some(20.0), Some(0.0), Some(&label));
            assert!(!evaluate(Some(&s)), "{label} should disqualify");
        }
    }

    #[test]
    fn absent_wind_counts_as_calm() {
        let s = snapshot(Some(20.0), None, Some("Sunny"));
        assert!(evaluate(Some(&s)));
    }

    #[test]
    fn missing_temperature_or_condition_is_unsuitable() {
        assert!(!evaluate(Some(&snapshot(None, Some(1.0), Some("Clear")))));
        assert!(!evaluate(Some(&snapshot(Some(20.0), Some(1.0), None))));
        assert!(!evaluate(Some(&snapshot(Some(20.0), Some(1.0), Some("")))));
    }
}
