// ============================================================================
// Rounding Modes
// Maps scaled real values onto the integer lattice
// ============================================================================

use super::errors::{FixedError, FixedResult};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bias that keeps a `.5` tie on the truncated side.
const TOWARD_BIAS: f64 = 0.4;

/// Bias that carries a `.5` tie away from zero.
const AWAY_BIAS: f64 = 0.5;

/// Policy for mapping a real value onto the nearest lattice point.
///
/// Every mode except `Floor` and `Ceil` adds a sign-following bias of 0.4 or
/// 0.5 and truncates toward zero. The constants match the reference HDL
/// models bit for bit; they are not a generic "round half up".
///
/// | Mode        | positive bias | negative bias |
/// |-------------|-------------------|-------------------|
/// | `SymInf`    | 0.5           | 0.5           |
/// | `SymZero`   | 0.4           | 0.4           |
/// | `NonSymPos` | 0.5           | 0.4           |
/// | `NonSymNeg` | 0.4           | 0.5           |
/// | `ConvEven`  | 0.4 even, 0.5 odd | 0.4 even, 0.5 odd |
/// | `ConvOdd`   | 0.5 even, 0.4 odd | 0.5 even, 0.4 odd |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Ties round away from zero
    SymInf,
    /// Ties round toward zero
    #[default]
    SymZero,
    /// Ties round toward +infinity
    NonSymPos,
    /// Ties round toward -infinity
    NonSymNeg,
    /// Ties round to the even neighbour
    ConvEven,
    /// Ties round to the odd neighbour
    ConvOdd,
    /// Largest integer not above the value
    Floor,
    /// Smallest integer not below the value
    Ceil,
}

impl RoundingMode {
    /// All modes, in declaration order.
    pub const ALL: [RoundingMode; 8] = [
        RoundingMode::SymInf,
        RoundingMode::SymZero,
        RoundingMode::NonSymPos,
        RoundingMode::NonSymNeg,
        RoundingMode::ConvEven,
        RoundingMode::ConvOdd,
        RoundingMode::Floor,
        RoundingMode::Ceil,
    ];

    /// Round a value already scaled by `2^frac_bits`.
    ///
    /// The result is integral but still floating point.
    #[inline]
    pub fn round(self, scaled: f64) -> f64 {
        match self {
            RoundingMode::SymInf => biased(scaled, AWAY_BIAS, AWAY_BIAS),
            RoundingMode::SymZero => biased(scaled, TOWARD_BIAS, TOWARD_BIAS),
            RoundingMode::NonSymPos => biased(scaled, AWAY_BIAS, TOWARD_BIAS),
            RoundingMode::NonSymNeg => biased(scaled, TOWARD_BIAS, AWAY_BIAS),
            RoundingMode::ConvEven => {
                let bias = if is_even(scaled) { TOWARD_BIAS } else { AWAY_BIAS };
                biased(scaled, bias, bias)
            }
            RoundingMode::ConvOdd => {
                let bias = if is_even(scaled) { AWAY_BIAS } else { TOWARD_BIAS };
                biased(scaled, bias, bias)
            }
            RoundingMode::Floor => scaled.floor(),
            RoundingMode::Ceil => scaled.ceil(),
        }
    }

    /// Tag used in configuration files and stimulus headers.
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundingMode::SymInf => "SymInf",
            RoundingMode::SymZero => "SymZero",
            RoundingMode::NonSymPos => "NonSymPos",
            RoundingMode::NonSymNeg => "NonSymNeg",
            RoundingMode::ConvEven => "ConvEven",
            RoundingMode::ConvOdd => "ConvOdd",
            RoundingMode::Floor => "Floor",
            RoundingMode::Ceil => "Ceil",
        }
    }
}

/// Add `pos` to positive values, subtract `neg` from negative ones, truncate.
#[inline]
fn biased(x: f64, pos: f64, neg: f64) -> f64 {
    if x > 0.0 {
        (x + pos).trunc()
    } else if x < 0.0 {
        (x - neg).trunc()
    } else {
        x
    }
}

/// Parity of the integer part.
#[inline]
fn is_even(x: f64) -> bool {
    x.trunc() % 2.0 == 0.0
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = FixedError;

    fn from_str(s: &str) -> FixedResult<Self> {
        RoundingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| FixedError::InvalidRoundMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNED_PATTERN: [f64; 12] = [
        2.6, 2.5, 2.4, 1.7, 1.5, 1.2, -4.3, -4.5, -4.8, -5.4, -5.5, -5.6,
    ];

    fn round_all(mode: RoundingMode) -> Vec<f64> {
        SIGNED_PATTERN.iter().map(|&x| mode.round(x)).collect()
    }

    #[test]
    fn test_symmetric_modes() {
        assert_eq!(
            round_all(RoundingMode::SymInf),
            vec![3., 3., 2., 2., 2., 1., -4., -5., -5., -5., -6., -6.]
        );
        assert_eq!(
            round_all(RoundingMode::SymZero),
            vec![3., 2., 2., 2., 1., 1., -4., -4., -5., -5., -5., -6.]
        );
    }

    #[test]
    fn test_asymmetric_modes() {
        assert_eq!(
            round_all(RoundingMode::NonSymPos),
            vec![3., 3., 2., 2., 2., 1., -4., -4., -5., -5., -5., -6.]
        );
        assert_eq!(
            round_all(RoundingMode::NonSymNeg),
            vec![3., 2., 2., 2., 1., 1., -4., -5., -5., -5., -6., -6.]
        );
    }

    #[test]
    fn test_convergent_modes() {
        assert_eq!(
            round_all(RoundingMode::ConvEven),
            vec![3., 2., 2., 2., 2., 1., -4., -4., -5., -5., -6., -6.]
        );
        assert_eq!(
            round_all(RoundingMode::ConvOdd),
            vec![3., 3., 2., 2., 1., 1., -4., -5., -5., -5., -5., -6.]
        );
    }

    #[test]
    fn test_floor_and_ceil() {
        assert_eq!(
            round_all(RoundingMode::Floor),
            vec![2., 2., 2., 1., 1., 1., -5., -5., -5., -6., -6., -6.]
        );
        assert_eq!(
            round_all(RoundingMode::Ceil),
            vec![3., 3., 3., 2., 2., 2., -4., -4., -4., -5., -5., -5.]
        );
    }

    #[test]
    fn test_zero_is_untouched() {
        for mode in RoundingMode::ALL {
            assert_eq!(mode.round(0.0), 0.0, "{}", mode);
        }
    }

    #[test]
    fn test_integers_are_fixed_points() {
        for mode in RoundingMode::ALL {
            for x in [-7.0, -1.0, 1.0, 12.0] {
                assert_eq!(mode.round(x), x, "{} moved {}", mode, x);
            }
        }
    }

    #[test]
    fn test_parse_tags() {
        for mode in RoundingMode::ALL {
            assert_eq!(mode.to_string().parse::<RoundingMode>().unwrap(), mode);
        }
        assert_eq!(
            "Nearest".parse::<RoundingMode>(),
            Err(FixedError::InvalidRoundMode("Nearest".to_string()))
        );
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(RoundingMode::default(), RoundingMode::SymZero);
    }
}
