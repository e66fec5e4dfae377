//! User selections and the pairs they resolve to.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::StoneId;
use crate::level::ConfidenceLevel;

/// How selected stones and levels are combined into one plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Several stones overlaid at a single CaR level.
    StonesAtOneLevel,
    /// Several CaR levels overlaid for a single stone.
    LevelsAtOneStone,
    /// Every selected stone at every selected level.
    #[default]
    AllCombinations,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [
        ViewMode::StonesAtOneLevel,
        ViewMode::LevelsAtOneStone,
        ViewMode::AllCombinations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::StonesAtOneLevel => "stones-at-one-level",
            ViewMode::LevelsAtOneStone => "levels-at-one-stone",
            ViewMode::AllCombinations => "all-combinations",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| format!("Unknown view mode: {s}"))
    }
}

/// One series to plot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotPair {
    pub stone: StoneId,
    pub level: ConfidenceLevel,
}

impl PlotPair {
    pub fn new(stone: StoneId, level: ConfidenceLevel) -> Self {
        Self { stone, level }
    }
}

impl fmt::Display for PlotPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.stone, self.level)
    }
}

/// A complete selection, passed atomically per render request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub stones: BTreeSet<StoneId>,
    pub levels: BTreeSet<ConfidenceLevel>,
    pub mode: ViewMode,
}

impl Selection {
    pub fn new(
        stones: impl IntoIterator<Item = StoneId>,
        levels: impl IntoIterator<Item = ConfidenceLevel>,
        mode: ViewMode,
    ) -> Self {
        Self {
            stones: stones.into_iter().collect(),
            levels: levels.into_iter().collect(),
            mode,
        }
    }
}
