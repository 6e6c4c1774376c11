//! Paging of a user's saved squads.

/// Squads per page of the user's list.
pub const SQUADS_PER_PAGE: u64 = 5;
/// Page numbers offered around the current page.
const WINDOW: u32 = 7;

/// Number of pages needed for `count` squads.
pub fn total_pages(count: u64) -> u32 {
    u32::try_from(count.div_ceil(SQUADS_PER_PAGE)).unwrap_or(u32::MAX)
}

/// 1-based page from a query parameter; missing or unparsable means page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Up to seven 1-based page numbers around `current`, shifted to stay within `1..=total`.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    if total == 0 {
        return Vec::new();
    }
    if total <= WINDOW {
        return (1..=total).collect();
    }
    let current = current.clamp(1, total);
    let half = WINDOW / 2;
    let start = current.saturating_sub(half).max(1).min(total - WINDOW + 1);
    (start..start + WINDOW).collect()
}
