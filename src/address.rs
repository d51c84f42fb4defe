use crate::constants::*;

/// Convert a page, offset pair into a flat address
#[inline]
pub fn get_address(page: usize, offset: usize) -> usize {
    (page << PAGE_SHIFT) | offset
}

/// Split a flat address into its page and offset
#[inline]
pub fn split_address(address: usize) -> (usize, usize) {
    (address >> PAGE_SHIFT, address & OFFSET_MASK)
}

/// Represents the decomposed components of a Virtual Address
///
/// Virtual and physical pages are the same size, so the same shift and mask
/// apply to both address spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: usize,
    pub page: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// Decompose a raw VA into its components
    pub fn from_raw(va: usize) -> Self {
        let (page, offset) = split_address(va);
        VirtualAddress { va, page, offset }
    }

    /// Whether the page index fits inside a single-page page table
    #[inline]
    pub fn is_addressable(&self) -> bool {
        self.page < MAX_VIRTUAL_PAGES_PER_PROCESS
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (page={}, offset={})", self.va, self.page, self.offset)
    }
}
