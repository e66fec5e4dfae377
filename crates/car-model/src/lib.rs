//! Data model for the CaR viewer.
//!
//! Result records (one per stone) hold a validated composition and one
//! guarantee curve per confidence level. Selections describe which
//! (stone, level) pairs a user wants overlaid.

pub mod composition;
pub mod curve;
pub mod error;
pub mod ids;
pub mod level;
pub mod mineral;
pub mod record;
pub mod selection;

pub use composition::{FRACTION_SUM_TOLERANCE, StoneComposition};
pub use curve::{GuaranteeCurve, MAX_GUARANTEE, TimeUnit, carbon_at_risk};
pub use error::{DataError, DataErrorKind, ModelError, RenderError, SelectionError};
pub use ids::StoneId;
pub use level::ConfidenceLevel;
pub use mineral::Mineral;
pub use record::{ResultRecord, SourceInfo};
pub use selection::{PlotPair, Selection, ViewMode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_pair_serializes() {
        let pair = PlotPair::new(StoneId::new("A").unwrap(), ConfidenceLevel::Car95);
        let json = serde_json::to_string(&pair).expect("serialize pair");
        assert_eq!(json, r#"{"stone":"A","level":95}"#);
        let round: PlotPair = serde_json::from_str(&json).expect("deserialize pair");
        assert_eq!(round, pair);
    }

    #[test]
    fn selection_serializes_mode_kebab_case() {
        let selection = Selection::new(
            [StoneId::new("A").unwrap()],
            [ConfidenceLevel::Car80],
            ViewMode::LevelsAtOneStone,
        );
        let json = serde_json::to_string(&selection).expect("serialize selection");
        assert_eq!(
            json,
            r#"{"stones":["A"],"levels":[80],"mode":"levels-at-one-stone"}"#
        );
    }
}
