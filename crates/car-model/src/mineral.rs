//! Proxy minerals used as the reactive feedstock model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four proxy minerals.
///
/// Declaration order is the display order used in composition legends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mineral {
    /// Wollastonite, CaSiO3.
    #[serde(rename = "CaSiO3")]
    Wollastonite,
    /// Enstatite, MgSiO3.
    #[serde(rename = "MgSiO3")]
    Enstatite,
    /// Albite, NaAlSi3O8.
    #[serde(rename = "NaAlSi3O8")]
    Albite,
    /// Orthoclase, KAlSi3O8.
    #[serde(rename = "KAlSi3O8")]
    Orthoclase,
}

impl Mineral {
    pub const ALL: [Mineral; 4] = [
        Mineral::Wollastonite,
        Mineral::Enstatite,
        Mineral::Albite,
        Mineral::Orthoclase,
    ];

    /// Chemical formula, as used for keys in result files.
    pub fn formula(&self) -> &'static str {
        match self {
            Mineral::Wollastonite => "CaSiO3",
            Mineral::Enstatite => "MgSiO3",
            Mineral::Albite => "NaAlSi3O8",
            Mineral::Orthoclase => "KAlSi3O8",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mineral::Wollastonite => "wollastonite",
            Mineral::Enstatite => "enstatite",
            Mineral::Albite => "albite",
            Mineral::Orthoclase => "orthoclase",
        }
    }
}

impl fmt::Display for Mineral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.formula())
    }
}

impl FromStr for Mineral {
    type Err = String;

    /// Parse either the formula (`CaSiO3`) or the mineral name (`wollastonite`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Mineral::ALL
            .into_iter()
            .find(|m| {
                m.formula().eq_ignore_ascii_case(trimmed) || m.name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("Unknown mineral: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mineral_from_str() {
        assert_eq!("CaSiO3".parse::<Mineral>(), Ok(Mineral::Wollastonite));
        assert_eq!("kalsi3o8".parse::<Mineral>(), Ok(Mineral::Orthoclase));
        assert_eq!("Albite".parse::<Mineral>(), Ok(Mineral::Albite));
        assert!("Fe2SiO4".parse::<Mineral>().is_err());
    }

    #[test]
    fn test_display_order() {
        let mut minerals = vec![Mineral::Orthoclase, Mineral::Wollastonite, Mineral::Albite];
        minerals.sort();
        assert_eq!(
            minerals,
            vec![Mineral::Wollastonite, Mineral::Albite, Mineral::Orthoclase]
        );
    }
}
