//! Closeness bands derived from the target character.
use serde::{Deserialize, Serialize};

use crate::catalog::Character;
use crate::constants::{
    CODE_HIGH_BASE, CODE_HIGH_SCALE, CODE_VERY_HIGH_BASE, CODE_VERY_HIGH_SCALE, HEIGHT_HIGH_BASE,
    HEIGHT_HIGH_SCALE, HEIGHT_VERY_HIGH_BASE, HEIGHT_VERY_HIGH_SCALE, MOST_COMMON_HEIGHT,
};

/// Distance cutoffs for one numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub high: f64,
    pub very_high: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub code: Band,
    pub height: Band,
}

/// Bands for `target`. Rarer codes and heights far from the most common
/// height get wider bands.
#[must_use]
pub fn calculate_thresholds(target: &Character) -> Thresholds {
    let code = f64::from(target.code);
    let height_offset = f64::from(
        u32::try_from((i64::from(target.height) - MOST_COMMON_HEIGHT).unsigned_abs())
            .unwrap_or(u32::MAX),
    );

    Thresholds {
        code: Band {
            high: CODE_HIGH_BASE + code * CODE_HIGH_SCALE,
            very_high: CODE_VERY_HIGH_BASE + code * CODE_VERY_HIGH_SCALE,
        },
        height: Band {
            high: HEIGHT_HIGH_BASE + height_offset * HEIGHT_HIGH_SCALE,
            very_high: HEIGHT_VERY_HIGH_BASE + height_offset * HEIGHT_VERY_HIGH_SCALE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::character;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn code_bands_scale_with_code() {
        let t = calculate_thresholds(&character("A", 100, "Lawful", 168));
        assert!(approx(t.code.high, 15.0));
        assert!(approx(t.code.very_high, 85.0));
    }

    #[test]
    fn height_bands_use_distance_from_reference() {
        let at_reference = calculate_thresholds(&character("A", 0, "Lawful", 168));
        assert!(approx(at_reference.height.high, 3.0));
        assert!(approx(at_reference.height.very_high, 15.0));

        let tall = calculate_thresholds(&character("B", 0, "Lawful", 188));
        let short = calculate_thresholds(&character("C", 0, "Lawful", 148));
        assert!(approx(tall.height.high, 5.0));
        assert!(approx(tall.height.very_high, 22.0));
        assert_eq!(tall.height, short.height);
    }

    #[test]
    fn code_thresholds_are_monotonic() {
        let mut previous = calculate_thresholds(&character("A", 0, "Lawful", 168)).code;
        for code in 1..=300 {
            let current = calculate_thresholds(&character("A", code, "Lawful", 168)).code;
            assert!(current.high >= previous.high);
            assert!(current.very_high >= previous.very_high);
            previous = current;
        }
    }

    #[test]
    fn bands_ignore_non_numeric_attributes() {
        let a = calculate_thresholds(&character("A", 40, "Lawful", 170));
        let b = calculate_thresholds(&character("B", 40, "Chaotic", 170));
        assert_eq!(a, b);
    }
}
