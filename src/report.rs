//! Human readable dumps of simulator state.

use std::fmt::Write;

use crate::access::Access;

const MAP_ROW_WIDTH: usize = 16;

/// Render the free page map, `.` for free and `#` for used, 16 pages a row
pub fn format_free_map(used: &[bool]) -> String {
    let mut out = String::from("--- PAGE FREE MAP ---\n");
    for row in used.chunks(MAP_ROW_WIDTH) {
        out.extend(row.iter().map(|&used| if used { '#' } else { '.' }));
        out.push('\n');
    }
    out
}

/// Render the virtual to physical page mapping of one process
pub fn format_page_table(proc_num: usize, entries: &[(usize, usize)]) -> String {
    let mut out = format!("--- PROCESS {proc_num} PAGE TABLE ---\n");
    for (virtual_page, frame) in entries {
        let _ = writeln!(out, "{virtual_page:02x} -> {frame:02x}");
    }
    out
}

pub fn format_store(access: &Access) -> String {
    format_access("Store", access)
}

pub fn format_load(access: &Access) -> String {
    format_access("Load", access)
}

fn format_access(verb: &str, access: &Access) -> String {
    format!(
        "{verb} proc {}: {} => {}, value={}",
        access.proc_num, access.vaddr, access.paddr, access.value
    )
}
