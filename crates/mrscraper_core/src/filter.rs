use crate::{CatalogEntry, RunConfiguration};

/// Region-free release marker, accepted whatever region is configured.
pub const UNIVERSAL_TAG: &str = "(World)";

/// Release-type markers for non-final or promotional builds.
pub const EXCLUDED_MARKERS: &[&str] = &[
    "(Beta)",
    "(Alpha)",
    "(Proto)",
    "(Virtual Console)",
    "(Aftermarket)",
    "(Unl)",
    "(Sample)",
    "(Promo)",
    "(Demo)",
    "(Kiosk)",
];

/// Pure accept/reject decision for one entry.
///
/// Matching is case-sensitive substring containment on the decoded name.
/// Entries without a file name (directory links) are never accepted.
pub fn is_accepted(entry: &CatalogEntry, config: &RunConfiguration) -> bool {
    let name = entry.display_name.as_str();
    if name.is_empty() {
        return false;
    }

    if config.region_filter_enabled
        && !(name.contains(config.region.as_str()) || name.contains(UNIVERSAL_TAG))
    {
        return false;
    }

    if config.smart_filter_enabled && EXCLUDED_MARKERS.iter().any(|marker| name.contains(marker)) {
        return false;
    }

    true
}
