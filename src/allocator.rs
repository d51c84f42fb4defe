//! Physical page allocator
//!
//! The free/used map lives in page 0, one status byte per physical page.
//! Allocation is first-fit by ascending page index, so callers can rely on
//! the lowest free page being handed out.

use log::{debug, trace};

use crate::constants::*;
use crate::memory::PhysicalMemory;

const FREE: u8 = 0;
const USED: u8 = 1;

/// Mark page 0 as used. Expects freshly zeroed memory.
pub fn reserve_zero_page(pm: &mut PhysicalMemory) {
    pm.page_zero_mut().free_map[ZERO_PAGE] = USED;
}

/// Allocate the lowest free physical page
///
/// Returns `None` without touching memory when every page is in use.
pub fn allocate_page(pm: &mut PhysicalMemory) -> Option<usize> {
    let free_map = pm.page_zero_mut().free_map;
    let page = free_map.iter().position(|&status| status == FREE)?;
    free_map[page] = USED;
    debug!("allocated physical page {page}");
    Some(page)
}

/// Return a page to the free map
///
/// Freeing page 0, or a page the caller does not own, corrupts the map.
/// Clearing an already free entry is harmless.
pub fn free_page(pm: &mut PhysicalMemory, page: usize) {
    trace!("freeing physical page {page}");
    pm.page_zero_mut().free_map[page] = FREE;
}

#[inline]
pub fn is_free(pm: &PhysicalMemory, page: usize) -> bool {
    pm.page_zero().free_map[page] == FREE
}

pub fn free_count(pm: &PhysicalMemory) -> usize {
    pm.page_zero()
        .free_map
        .iter()
        .filter(|&&status| status == FREE)
        .count()
}

/// One entry per physical page, `true` when the page is used
pub fn used_map(pm: &PhysicalMemory) -> Vec<bool> {
    pm.page_zero()
        .free_map
        .iter()
        .map(|&status| status != FREE)
        .collect()
}
