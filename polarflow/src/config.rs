//! # Estimator configuration

use crate::polar::StatusFilter;
use crate::proximity::Margins;

/// Dominant vector selection strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Scan every sample as a cluster center and pick the best supported one.
    #[default]
    ModeSeek,
    /// Repeatedly move a center to the mean of its neighbours.
    Refine,
}

/// Parses the serde names, plus `mode` as a short form of `mode_seek`.
impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode" | "mode_seek" => Ok(Self::ModeSeek),
            "refine" => Ok(Self::Refine),
            _ => Err(format!("unknown strategy: {s}")),
        }
    }
}

/// Full configuration of a dominant vector estimation run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorConfig {
    /// Proximity window shared by both strategies.
    pub margins: Margins,
    pub strategy: Strategy,
    /// Refinement steps, only used by `Strategy::Refine`.
    pub iterations: usize,
    /// Scan candidates on a thread pool, only used by `Strategy::ModeSeek`.
    pub parallel: bool,
    /// Whether correspondences the tracker lost take part.
    pub status_filter: StatusFilter,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            strategy: Strategy::default(),
            iterations: 8,
            parallel: false,
            status_filter: StatusFilter::AcceptAll,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::proximity::WrapRule;

    #[test]
    fn partial_json() {
        let config: EstimatorConfig =
            serde_json::from_str(r#"{ "margins": { "size_margin": 4.0 }, "strategy": "refine" }"#)
                .unwrap();

        assert_eq!(config.margins.size_margin, 4.0);
        assert_eq!(config.margins.angle_margin, 0.3);
        assert_eq!(config.margins.wrap, WrapRule::ShiftedTurns);
        assert_eq!(config.strategy, Strategy::Refine);
        assert_eq!(config.iterations, 8);
        assert_eq!(config.status_filter, StatusFilter::AcceptAll);
    }

    #[test]
    fn enum_names() {
        let config: EstimatorConfig = serde_json::from_str(
            r#"{ "margins": { "wrap": "circular" }, "status_filter": "tracked_only" }"#,
        )
        .unwrap();

        assert_eq!(config.margins.wrap, WrapRule::Circular);
        assert_eq!(config.status_filter, StatusFilter::TrackedOnly);
        assert_eq!("mode".parse::<Strategy>(), Ok(Strategy::ModeSeek));
        assert_eq!("mode_seek".parse::<Strategy>(), Ok(Strategy::ModeSeek));
        assert_eq!("refine".parse::<Strategy>(), Ok(Strategy::Refine));

        let config: EstimatorConfig =
            serde_json::from_str(r#"{ "strategy": "mode_seek" }"#).unwrap();
        assert_eq!(config.strategy, Strategy::ModeSeek);
        assert!("random".parse::<Strategy>().is_err());
    }
}
