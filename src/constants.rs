//! Geometry of the simulated machine.

pub const PAGE_SHIFT: u32 = 8;
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
pub const PAGE_COUNT: usize = 64;
pub const MEM_SIZE: usize = PAGE_SIZE * PAGE_COUNT;

pub const OFFSET_MASK: usize = PAGE_SIZE - 1;

/// Offset of the free/used map inside page 0.
pub const FREE_MAP_OFFSET: usize = 0;
/// Offset of the page table pointer table (directory) inside page 0.
pub const PTP_OFFSET: usize = FREE_MAP_OFFSET + PAGE_COUNT;
/// The directory takes whatever is left of page 0.
pub const MAX_PROCESSES: usize = PAGE_SIZE - PTP_OFFSET;

/// A page table is one page of one-byte entries, but only `PAGE_COUNT`
/// physical pages exist to point at.
pub const MAX_VIRTUAL_PAGES_PER_PROCESS: usize = PAGE_COUNT;

/// Page 0 holds the bookkeeping and is never handed out.
pub const ZERO_PAGE: usize = 0;

const _: () = assert!(PAGE_COUNT * PAGE_SIZE == MEM_SIZE);
const _: () = assert!(PAGE_SIZE.is_power_of_two());
const _: () = assert!(PTP_OFFSET + MAX_PROCESSES <= PAGE_SIZE);
const _: () = assert!(MAX_VIRTUAL_PAGES_PER_PROCESS <= PAGE_SIZE);
// Entries are single bytes.
const _: () = assert!(PAGE_COUNT <= u8::MAX as usize + 1);
