//! Byte loads and stores through a process's page table.

use crate::address::VirtualAddress;
use crate::error::SimError;
use crate::memory::PhysicalMemory;
use crate::translation::translate;

/// A completed load or store and the mapping it went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub proc_num: usize,
    pub vaddr: usize,
    pub paddr: usize,
    pub value: u8,
}

/// Store `value` at `vaddr`. Nothing is written on a fault.
pub fn store_byte(
    pm: &mut PhysicalMemory,
    proc_num: usize,
    vaddr: usize,
    value: u8,
) -> Result<Access, SimError> {
    let paddr = translate(proc_num, &VirtualAddress::from_raw(vaddr), pm)?;
    pm.write(paddr, value);
    Ok(Access { proc_num, vaddr, paddr, value })
}

/// Load the byte at `vaddr`
pub fn load_byte(pm: &PhysicalMemory, proc_num: usize, vaddr: usize) -> Result<Access, SimError> {
    let paddr = translate(proc_num, &VirtualAddress::from_raw(vaddr), pm)?;
    let value = pm.read(paddr);
    Ok(Access { proc_num, vaddr, paddr, value })
}
