use log::debug;

use crate::address::{VirtualAddress, get_address};
use crate::directory::get_table_page;
use crate::error::SimError;
use crate::memory::PhysicalMemory;

/// Translate a virtual address of `proc_num` to a physical address
///
/// # Note
/// A process without a page table has nothing mapped, so every address of it
/// faults. Pages at or above `MAX_VIRTUAL_PAGES_PER_PROCESS` cannot be
/// described by a single-page table and are rejected before any lookup.
pub fn translate(
    proc_num: usize,
    va: &VirtualAddress,
    pm: &PhysicalMemory,
) -> Result<usize, SimError> {
    // Step 1: Check the page index fits the page table
    if !va.is_addressable() {
        return Err(SimError::VirtualAddressOutOfRange { proc_num, vaddr: va.va });
    }

    // Step 2: Find the page table
    let pt_page = get_table_page(pm, proc_num);
    if pt_page == 0 {
        return Err(SimError::TranslationFault { proc_num, vaddr: va.va });
    }

    // Step 3: Look up the page table entry, 0 means unmapped
    let frame = pm.get_page_frame(pt_page, va.page);
    if frame == 0 {
        return Err(SimError::TranslationFault { proc_num, vaddr: va.va });
    }

    // Step 4: Calculate physical address
    let pa = get_address(frame, va.offset);
    debug!("proc {proc_num}: {va} -> PA {pa}");
    Ok(pa)
}
