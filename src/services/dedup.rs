//! Cross-subquery deduplication.

use std::collections::HashSet;

use crate::models::Asset;

/// Drop repeated assets, keeping the first occurrence.
///
/// An asset is dropped when its non-empty IP was already admitted, even if
/// its URL is new; failing that, when its non-empty URL was already admitted.
/// Relative order of the admitted assets is preserved.
pub fn dedup_assets(assets: Vec<Asset>) -> Vec<Asset> {
    let mut seen_ips: HashSet<String> = HashSet::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(assets.len());

    for asset in assets {
        if !asset.ip.is_empty() && seen_ips.contains(&asset.ip) {
            log::info!(
                "[secondary] Skipping duplicate IP {} ({})",
                asset.ip,
                asset.title
            );
            continue;
        }
        if !asset.url.is_empty() && seen_urls.contains(&asset.url) {
            continue;
        }

        if !asset.ip.is_empty() {
            seen_ips.insert(asset.ip.clone());
        }
        if !asset.url.is_empty() {
            seen_urls.insert(asset.url.clone());
        }
        unique.push(asset);
    }

    unique
}
