//! Page arithmetic for record lists.

/// One entry of a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// A link to a 1-based page number.
    Page(u32),
    /// A run of hidden pages.
    Gap,
}

/// Number of pages needed for `total` items at `per_page` items per page.
pub fn total_pages(total: usize, per_page: usize) -> u32 {
    if per_page == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX)
}

/// Pager entries around `current`.
///
/// The first and last pages are always shown, as are pages within `delta`
/// of the current one. A hole of exactly one page shows that page instead of
/// a gap. No pager is needed for a single page, so `total <= 1` yields an
/// empty window.
pub fn page_window(current: u32, total: u32, delta: u32) -> Vec<PageSlot> {
    if total <= 1 {
        return Vec::new();
    }

    let left = current.saturating_sub(delta);
    let right = current.saturating_add(delta);

    let mut slots = Vec::new();
    let mut last: Option<u32> = None;
    let shown = |p: u32| p == 1 || p == total || (left..=right).contains(&p);
    for page in (1..=total).filter(|&p| shown(p)) {
        if let Some(prev) = last {
            match page - prev {
                1 => {}
                2 => slots.push(PageSlot::Page(prev + 1)),
                _ => slots.push(PageSlot::Gap),
            }
        }
        slots.push(PageSlot::Page(page));
        last = Some(page);
    }
    slots
}
