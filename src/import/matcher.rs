//! Automatic row-to-asset matching by file name.
use super::{Asset, Row};

/// Propose an asset for a row by case-insensitive file name equality.
///
/// When several assets share the name, the lowest index wins.
pub fn propose_match(row: &Row, assets: &[Asset]) -> Option<usize> {
    position_by_name(&row.asset_reference, assets)
}

/// Locate an asset by name using the auto-match rule.
pub fn position_by_name(name: &str, assets: &[Asset]) -> Option<usize> {
    let wanted = name.to_lowercase();
    assets
        .iter()
        .filter(|asset| asset.name.to_lowercase() == wanted)
        .map(|asset| asset.index)
        .min()
}
