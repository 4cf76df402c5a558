//! Easing strategies
//!
//! Each strategy maps animation progress in `[0, 1]` to an eased progress.
//! Outputs may leave `[0, 1]` (elastic, bounce) but every strategy maps
//! 0 to 0 and 1 to 1 up to float error.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Maps linear progress to eased progress
pub trait AnimationStrategy: fmt::Debug {
    fn value(&self, percent_complete: f32) -> f32;
}

/// The standard easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animations {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSin,
    OutSin,
    InOutSin,
    InExp,
    OutExp,
    InOutExp,
    InCircular,
    OutCircular,
    InOutCircular,
    InElastic,
    OutElastic,
    InOutElastic,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Animations {
    pub const ALL: [Animations; 28] = [
        Animations::Linear,
        Animations::InQuad,
        Animations::OutQuad,
        Animations::InOutQuad,
        Animations::InCubic,
        Animations::OutCubic,
        Animations::InOutCubic,
        Animations::InQuart,
        Animations::OutQuart,
        Animations::InOutQuart,
        Animations::InQuint,
        Animations::OutQuint,
        Animations::InOutQuint,
        Animations::InSin,
        Animations::OutSin,
        Animations::InOutSin,
        Animations::InExp,
        Animations::OutExp,
        Animations::InOutExp,
        Animations::InCircular,
        Animations::OutCircular,
        Animations::InOutCircular,
        Animations::InElastic,
        Animations::OutElastic,
        Animations::InOutElastic,
        Animations::InBounce,
        Animations::OutBounce,
        Animations::InOutBounce,
    ];

    /// Upper snake case name, as used in scene files
    pub fn name(self) -> &'static str {
        match self {
            Animations::Linear => "LINEAR",
            Animations::InQuad => "IN_QUAD",
            Animations::OutQuad => "OUT_QUAD",
            Animations::InOutQuad => "IN_OUT_QUAD",
            Animations::InCubic => "IN_CUBIC",
            Animations::OutCubic => "OUT_CUBIC",
            Animations::InOutCubic => "IN_OUT_CUBIC",
            Animations::InQuart => "IN_QUART",
            Animations::OutQuart => "OUT_QUART",
            Animations::InOutQuart => "IN_OUT_QUART",
            Animations::InQuint => "IN_QUINT",
            Animations::OutQuint => "OUT_QUINT",
            Animations::InOutQuint => "IN_OUT_QUINT",
            Animations::InSin => "IN_SIN",
            Animations::OutSin => "OUT_SIN",
            Animations::InOutSin => "IN_OUT_SIN",
            Animations::InExp => "IN_EXP",
            Animations::OutExp => "OUT_EXP",
            Animations::InOutExp => "IN_OUT_EXP",
            Animations::InCircular => "IN_CIRCULAR",
            Animations::OutCircular => "OUT_CIRCULAR",
            Animations::InOutCircular => "IN_OUT_CIRCULAR",
            Animations::InElastic => "IN_ELASTIC",
            Animations::OutElastic => "OUT_ELASTIC",
            Animations::InOutElastic => "IN_OUT_ELASTIC",
            Animations::InBounce => "IN_BOUNCE",
            Animations::OutBounce => "OUT_BOUNCE",
            Animations::InOutBounce => "IN_OUT_BOUNCE",
        }
    }
}

fn out_bounce(p: f32) -> f32 {
    let mut t = p;
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        t -= 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        t -= 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        t -= 2.625 / 2.75;
        7.5625 * t * t + 0.984375
    }
}

fn in_bounce(p: f32) -> f32 {
    1.0 - out_bounce(1.0 - p)
}

impl AnimationStrategy for Animations {
    fn value(&self, p: f32) -> f32 {
        match self {
            Animations::Linear => p,
            Animations::InQuad => p.powi(2),
            Animations::OutQuad => -p * (p - 2.0),
            Animations::InOutQuad => {
                let t = p * 2.0;
                if t < 1.0 {
                    return 0.5 * t.powi(2);
                }
                let t = t - 1.0;
                -0.5 * (t * (t - 2.0) - 1.0)
            }
            Animations::InCubic => p.powi(3),
            Animations::OutCubic => (p - 1.0).powi(3) + 1.0,
            Animations::InOutCubic => {
                let t = p * 2.0;
                if t < 1.0 {
                    return 0.5 * t.powi(3);
                }
                0.5 * ((t - 2.0).powi(3) + 2.0)
            }
            Animations::InQuart => p.powi(4),
            Animations::OutQuart => -((p - 1.0).powi(4) - 1.0),
            Animations::InOutQuart => {
                let t = p * 2.0;
                if t < 1.0 {
                    return 0.5 * t.powi(4);
                }
                -0.5 * ((t - 2.0).powi(4) - 2.0)
            }
            Animations::InQuint => p.powi(5),
            Animations::OutQuint => (p - 1.0).powi(5) + 1.0,
            Animations::InOutQuint => {
                let t = p * 2.0;
                if t < 1.0 {
                    return 0.5 * t.powi(5);
                }
                0.5 * ((t - 2.0).powi(5) + 2.0)
            }
            Animations::InSin => -(p * (PI / 2.0)).cos() + 1.0,
            Animations::OutSin => (p * (PI / 2.0)).sin(),
            Animations::InOutSin => -0.5 * ((PI * p).cos() - 1.0),
            Animations::InExp => 2f32.powf(10.0 * (p - 1.0)),
            Animations::OutExp => -(2f32.powf(-10.0 * p)) + 1.0,
            Animations::InOutExp => {
                let t = p * 2.0;
                if t < 1.0 {
                    return 0.5 * 2f32.powf(10.0 * (t - 1.0));
                }
                0.5 * (-(2f32.powf(-10.0 * (t - 1.0))) + 2.0)
            }
            Animations::InCircular => -((1.0 - p.powi(2)).sqrt() - 1.0),
            Animations::OutCircular => (1.0 - (p - 1.0).powi(2)).sqrt(),
            Animations::InOutCircular => {
                let t = p * 2.0;
                if t < 1.0 {
                    return -0.5 * ((1.0 - t.powi(2)).sqrt() - 1.0);
                }
                0.5 * ((1.0 - (t - 2.0).powi(2)).sqrt() + 1.0)
            }
            Animations::InElastic => {
                let t = p - 1.0;
                -(2f32.powf(10.0 * t)) * ((t - 0.075) * (2.0 * PI) / 0.3).sin()
            }
            Animations::OutElastic => {
                2f32.powf(-10.0 * p) * ((p - 0.075) * (2.0 * PI) / 0.3).sin() + 1.0
            }
            Animations::InOutElastic => {
                let t = p * 2.0 - 1.0;
                let wave = ((t - 0.1125) * (2.0 * PI) / 0.45).sin();
                if t < 0.0 {
                    0.5 * -(2f32.powf(10.0 * t)) * wave
                } else {
                    0.5 * 2f32.powf(-10.0 * t) * wave + 1.0
                }
            }
            Animations::InBounce => in_bounce(p),
            Animations::OutBounce => out_bounce(p),
            Animations::InOutBounce => {
                if p < 0.5 {
                    in_bounce(p * 2.0) * 0.5
                } else {
                    out_bounce(p * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }
}

impl fmt::Display for Animations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown easing name
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown animation strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for Animations {
    type Err = UnknownStrategy;

    /// Accepts `IN_OUT_QUAD`, `in_out_quad` and `InOutQuad`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Animations::ALL
            .into_iter()
            .find(|a| a.name().replace('_', "") == wanted)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for strategy in Animations::ALL {
            assert!(strategy.value(0.0).abs() < 1e-2, "{} at 0", strategy);
            assert!((strategy.value(1.0) - 1.0).abs() < 1e-2, "{} at 1", strategy);
        }
    }

    #[test]
    fn test_known_midpoints() {
        assert_eq!(Animations::Linear.value(0.25), 0.25);
        assert_eq!(Animations::InQuad.value(0.5), 0.25);
        assert_eq!(Animations::OutQuad.value(0.5), 0.75);
        assert_eq!(Animations::InOutCubic.value(0.5), 0.5);
        assert!((Animations::InOutSin.value(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots() {
        let max = (1..100)
            .map(|i| Animations::OutElastic.value(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(max > 1.0);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("IN_OUT_QUAD".parse::<Animations>(), Ok(Animations::InOutQuad));
        assert_eq!("out_bounce".parse::<Animations>(), Ok(Animations::OutBounce));
        assert_eq!("InElastic".parse::<Animations>(), Ok(Animations::InElastic));
        assert!("wobble".parse::<Animations>().is_err());
    }
}
