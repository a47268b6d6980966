use crate::tree::DockPosition;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Unknown dock position: {0}")]
    UnknownPosition(String),
}

impl FromStr for DockPosition {
    type Err = PlacementError;

    /// Parse a position token, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(DockPosition::Left),
            "right" => Ok(DockPosition::Right),
            "top" => Ok(DockPosition::Top),
            "bottom" => Ok(DockPosition::Bottom),
            "center" => Ok(DockPosition::Center),
            "centerbefore" => Ok(DockPosition::CenterBefore),
            _ => Err(PlacementError::UnknownPosition(s.trim().to_string())),
        }
    }
}

/// One `anchor/Position` entry of a placement spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementClause<'a> {
    pub anchor: &'a str,
    pub position: Result<DockPosition, PlacementError>,
}

/// Split `"a/Left;b/Bottom"` into its clauses, in order.
///
/// Entries without a `/` are not clauses and are dropped here; entries with
/// an unknown position are kept so callers can report and skip them.
pub fn clauses(spec: &str) -> impl Iterator<Item = PlacementClause<'_>> {
    spec.split(';').filter_map(|entry| {
        let (anchor, position) = entry.split_once('/')?;
        Some(PlacementClause {
            anchor: anchor.trim(),
            position: position.parse(),
        })
    })
}
