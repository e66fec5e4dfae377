//! Expand a selection into the ordered pairs to plot.
//!
//! | Mode                 | Needs          | Order                          |
//! |----------------------|----------------|--------------------------------|
//! | `StonesAtOneLevel`   | one level      | stone ascending                |
//! | `LevelsAtOneStone`   | one stone      | level descending               |
//! | `AllCombinations`    | any            | stone asc, then level desc     |

use car_model::{PlotPair, Selection, SelectionError, ViewMode};

/// Ordered `(stone, level)` pairs for `selection`.
///
/// Emptiness is reported before cardinality, so an empty stone set in
/// `LevelsAtOneStone` is `NoStonesSelected`, not `ExpectedSingleStone`.
pub fn resolve(selection: &Selection) -> Result<Vec<PlotPair>, SelectionError> {
    check_cardinality(selection)?;

    // With the cardinality checks passed every mode is the ordered product.
    Ok(selection
        .stones
        .iter()
        .flat_map(|stone| {
            selection
                .levels
                .iter()
                .rev()
                .map(move |level| PlotPair::new(stone.clone(), *level))
        })
        .collect())
}

fn check_cardinality(selection: &Selection) -> Result<(), SelectionError> {
    if selection.stones.is_empty() {
        return Err(SelectionError::NoStonesSelected);
    }
    if selection.levels.is_empty() {
        return Err(SelectionError::NoLevelsSelected);
    }
    match selection.mode {
        ViewMode::StonesAtOneLevel if selection.levels.len() != 1 => {
            Err(SelectionError::ExpectedSingleLevel {
                mode: selection.mode,
                selected: selection.levels.len(),
            })
        }
        ViewMode::LevelsAtOneStone if selection.stones.len() != 1 => {
            Err(SelectionError::ExpectedSingleStone {
                mode: selection.mode,
                selected: selection.stones.len(),
            })
        }
        _ => Ok(()),
    }
}
