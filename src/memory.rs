use crate::address::get_address;
use crate::constants::*;

/// Simulated RAM, addressed as `page << PAGE_SHIFT | offset`.
pub struct PhysicalMemory {
    data: Box<[u8]>,
}

/// Read-only view of the bookkeeping that lives in page 0.
pub struct PageZero<'a> {
    /// One status byte per physical page, 0 = free.
    pub free_map: &'a [u8],
    /// Page-table page of each process, 0 = no process.
    pub directory: &'a [u8],
}

/// Mutable view of the bookkeeping that lives in page 0.
pub struct PageZeroMut<'a> {
    pub free_map: &'a mut [u8],
    pub directory: &'a mut [u8],
}

impl PhysicalMemory {
    /// Create a new physical memory initialized to all zeros
    pub fn new() -> Self {
        PhysicalMemory {
            data: vec![0u8; MEM_SIZE].into_boxed_slice(),
        }
    }

    /// Zero every byte of physical memory
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Read a byte from physical memory
    #[inline]
    pub fn read(&self, address: usize) -> u8 {
        self.data[address]
    }

    /// Write a byte to physical memory
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) {
        self.data[address] = value;
    }

    /// The `PAGE_SIZE` bytes of one physical page
    pub fn page(&self, page: usize) -> &[u8] {
        let base = get_address(page, 0);
        &self.data[base..base + PAGE_SIZE]
    }

    pub fn page_mut(&mut self, page: usize) -> &mut [u8] {
        let base = get_address(page, 0);
        &mut self.data[base..base + PAGE_SIZE]
    }

    /// Split page 0 into the free/used map and the directory
    pub fn page_zero(&self) -> PageZero<'_> {
        let zero = self.page(ZERO_PAGE);
        // The directory starts where the free map ends.
        let (free_map, rest) = zero[FREE_MAP_OFFSET..].split_at(PAGE_COUNT);
        PageZero {
            free_map,
            directory: &rest[..MAX_PROCESSES],
        }
    }

    pub fn page_zero_mut(&mut self) -> PageZeroMut<'_> {
        let zero = self.page_mut(ZERO_PAGE);
        let (free_map, rest) = zero[FREE_MAP_OFFSET..].split_at_mut(PAGE_COUNT);
        PageZeroMut {
            free_map,
            directory: &mut rest[..MAX_PROCESSES],
        }
    }

    /// Get a Page Table entry
    #[inline]
    pub fn get_page_frame(&self, pt_page: usize, virtual_page: usize) -> usize {
        self.read(get_address(pt_page, virtual_page)) as usize
    }

    /// Set a Page Table entry
    pub fn set_page_entry(&mut self, pt_page: usize, virtual_page: usize, frame: usize) {
        self.write(get_address(pt_page, virtual_page), frame as u8);
    }

    /// Get direct access to the underlying data
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new()
    }
}
