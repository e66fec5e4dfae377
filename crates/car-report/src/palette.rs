use serde::Serialize;

/// Qualitative series colors, cycled by color index.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Stroke pattern, used to tell levels apart when color encodes stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineDash {
    const CYCLE: [LineDash; 4] = [
        LineDash::Solid,
        LineDash::Dashed,
        LineDash::Dotted,
        LineDash::DashDot,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    /// SVG `stroke-dasharray`, `None` for solid lines.
    pub fn dasharray(&self) -> Option<&'static str> {
        match self {
            LineDash::Solid => None,
            LineDash::Dashed => Some("8 4"),
            LineDash::Dotted => Some("2 3"),
            LineDash::DashDot => Some("8 3 2 3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle() {
        assert_eq!(color(0), color(PALETTE.len()));
        assert_ne!(color(0), color(1));
    }

    #[test]
    fn dashes_cycle() {
        assert_eq!(LineDash::from_index(0), LineDash::Solid);
        assert_eq!(LineDash::from_index(5), LineDash::Dashed);
        assert!(LineDash::Solid.dasharray().is_none());
    }
}
