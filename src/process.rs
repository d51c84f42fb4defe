//! Process lifecycle: building and tearing down a process's paging structures.

use log::{debug, warn};

use crate::allocator::{allocate_page, free_page};
use crate::constants::*;
use crate::directory::{get_table_page, set_table_page};
use crate::error::{AllocationKind, SimError};
use crate::memory::PhysicalMemory;

/// Allocate pages for a new process
///
/// This includes the new process page table and `page_count` data pages.
/// Pages are only recorded in the directory and page table once every
/// allocation succeeded. The table page is cleared before its entries are
/// written, so only the new mappings are visible. When a data page
/// allocation fails, the pages already taken by this call (page table
/// included) stay marked used but are not referenced from anywhere.
pub fn create_process(
    pm: &mut PhysicalMemory,
    proc_num: usize,
    page_count: usize,
) -> Result<usize, SimError> {
    let pt_page = allocate_page(pm).ok_or_else(|| {
        warn!("proc {proc_num}: no page left for the page table");
        SimError::OutOfMemory { proc_num, kind: AllocationKind::PageTable }
    })?;

    // At most PAGE_COUNT allocations can succeed.
    let mut data_pages = Vec::with_capacity(page_count.min(PAGE_COUNT));
    for _ in 0..page_count {
        let page = allocate_page(pm).ok_or_else(|| {
            warn!(
                "proc {proc_num}: out of data pages after {} of {page_count}, leaking {} pages",
                data_pages.len(),
                data_pages.len() + 1
            );
            SimError::OutOfMemory { proc_num, kind: AllocationKind::DataPage }
        })?;
        data_pages.push(page);
    }

    set_table_page(pm, proc_num, pt_page);
    // A recycled table page still holds its previous owner's entries.
    pm.page_mut(pt_page)[..MAX_VIRTUAL_PAGES_PER_PROCESS].fill(0);
    for (virtual_page, &frame) in data_pages.iter().enumerate() {
        pm.set_page_entry(pt_page, virtual_page, frame);
    }

    debug!("proc {proc_num}: page table in page {pt_page}, data pages {data_pages:?}");
    Ok(pt_page)
}

/// Kill a process
///
/// Frees every nonzero page table entry, then the page table itself, then
/// clears the directory entry.
pub fn destroy_process(pm: &mut PhysicalMemory, proc_num: usize) -> Result<(), SimError> {
    let pt_page = get_table_page(pm, proc_num);
    if pt_page == 0 {
        warn!("proc {proc_num}: kill requested but there is no page table");
        return Err(SimError::ProcessNotFound(proc_num));
    }

    // Data pages must go before the table that lists them.
    for virtual_page in 0..MAX_VIRTUAL_PAGES_PER_PROCESS {
        let frame = pm.get_page_frame(pt_page, virtual_page);
        if frame != 0 {
            free_page(pm, frame);
        }
    }

    free_page(pm, pt_page);
    set_table_page(pm, proc_num, 0);

    debug!("proc {proc_num}: destroyed, page table page {pt_page} released");
    Ok(())
}

/// Every mapped `(virtual_page, physical_page)` pair of a process, in
/// virtual page order. Empty when the process does not exist.
pub fn page_table_entries(pm: &PhysicalMemory, proc_num: usize) -> Vec<(usize, usize)> {
    let pt_page = get_table_page(pm, proc_num);
    if pt_page == 0 {
        return Vec::new();
    }

    pm.page(pt_page)[..MAX_VIRTUAL_PAGES_PER_PROCESS]
        .iter()
        .enumerate()
        .filter(|&(_, &frame)| frame != 0)
        .map(|(virtual_page, &frame)| (virtual_page, frame as usize))
        .collect()
}
