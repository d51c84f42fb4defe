//! Page table directory: which physical page holds each process's page table.
//!
//! Page 0 can never be a page-table page, so an entry of 0 means the
//! process does not exist. Nothing here validates; `proc_num` must be below
//! `MAX_PROCESSES`.

use crate::memory::PhysicalMemory;

/// Get the page table page for a given process, 0 if it has none
#[inline]
pub fn get_table_page(pm: &PhysicalMemory, proc_num: usize) -> usize {
    pm.page_zero().directory[proc_num] as usize
}

pub fn set_table_page(pm: &mut PhysicalMemory, proc_num: usize, page: usize) {
    pm.page_zero_mut().directory[proc_num] = page as u8;
}

#[inline]
pub fn has_table(pm: &PhysicalMemory, proc_num: usize) -> bool {
    get_table_page(pm, proc_num) != 0
}
