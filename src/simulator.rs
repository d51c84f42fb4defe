//! The simulator context: one block of physical memory and the operations
//! callers are allowed to perform on it.

use log::info;
use spin::Mutex;

use crate::access::{self, Access};
use crate::allocator;
use crate::constants::*;
use crate::directory;
use crate::error::SimError;
use crate::memory::PhysicalMemory;
use crate::process;

pub struct Simulator {
    pm: PhysicalMemory,
}

impl Simulator {
    /// A freshly initialized simulator
    pub fn new() -> Self {
        let mut sim = Simulator { pm: PhysicalMemory::new() };
        sim.initialize();
        sim
    }

    /// Zero all memory and reserve page 0
    pub fn initialize(&mut self) {
        self.pm.clear();
        allocator::reserve_zero_page(&mut self.pm);
        info!("initialized {PAGE_COUNT} pages of {PAGE_SIZE} bytes");
    }

    pub fn create_process(&mut self, proc_num: usize, page_count: usize) -> Result<(), SimError> {
        check_proc(proc_num)?;
        process::create_process(&mut self.pm, proc_num, page_count)?;
        info!("created proc {proc_num} with {page_count} pages");
        Ok(())
    }

    pub fn destroy_process(&mut self, proc_num: usize) -> Result<(), SimError> {
        check_proc(proc_num)?;
        process::destroy_process(&mut self.pm, proc_num)?;
        info!("killed proc {proc_num}");
        Ok(())
    }

    pub fn store_byte(
        &mut self,
        proc_num: usize,
        vaddr: usize,
        value: u8,
    ) -> Result<Access, SimError> {
        check_proc(proc_num)?;
        access::store_byte(&mut self.pm, proc_num, vaddr, value)
    }

    pub fn load_byte(&self, proc_num: usize, vaddr: usize) -> Result<Access, SimError> {
        check_proc(proc_num)?;
        access::load_byte(&self.pm, proc_num, vaddr)
    }

    /// One entry per physical page, `true` when used
    pub fn free_map_snapshot(&self) -> Vec<bool> {
        allocator::used_map(&self.pm)
    }

    /// Mapped `(virtual_page, physical_page)` pairs of a process
    pub fn page_table_snapshot(&self, proc_num: usize) -> Result<Vec<(usize, usize)>, SimError> {
        check_proc(proc_num)?;
        Ok(process::page_table_entries(&self.pm, proc_num))
    }

    pub fn free_page_count(&self) -> usize {
        allocator::free_count(&self.pm)
    }

    pub fn process_exists(&self, proc_num: usize) -> bool {
        proc_num < MAX_PROCESSES && directory::has_table(&self.pm, proc_num)
    }

    pub fn memory(&self) -> &PhysicalMemory {
        &self.pm
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

fn check_proc(proc_num: usize) -> Result<(), SimError> {
    if proc_num >= MAX_PROCESSES {
        return Err(SimError::InvalidProcess(proc_num));
    }
    Ok(())
}

/// A simulator behind one lock, for callers on several threads
///
/// Allocation, directory and page table updates all touch page 0, so every
/// operation holds the lock for its whole duration.
#[derive(Default)]
pub struct SharedSimulator {
    inner: Mutex<Simulator>,
}

impl SharedSimulator {
    pub fn new() -> Self {
        SharedSimulator { inner: Mutex::new(Simulator::new()) }
    }

    pub fn initialize(&self) {
        self.inner.lock().initialize();
    }

    pub fn create_process(&self, proc_num: usize, page_count: usize) -> Result<(), SimError> {
        self.inner.lock().create_process(proc_num, page_count)
    }

    pub fn destroy_process(&self, proc_num: usize) -> Result<(), SimError> {
        self.inner.lock().destroy_process(proc_num)
    }

    pub fn store_byte(
        &self,
        proc_num: usize,
        vaddr: usize,
        value: u8,
    ) -> Result<Access, SimError> {
        self.inner.lock().store_byte(proc_num, vaddr, value)
    }

    pub fn load_byte(&self, proc_num: usize, vaddr: usize) -> Result<Access, SimError> {
        self.inner.lock().load_byte(proc_num, vaddr)
    }

    pub fn free_map_snapshot(&self) -> Vec<bool> {
        self.inner.lock().free_map_snapshot()
    }

    pub fn page_table_snapshot(&self, proc_num: usize) -> Result<Vec<(usize, usize)>, SimError> {
        self.inner.lock().page_table_snapshot(proc_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::get_address;
    use crate::error::AllocationKind;

    fn only_zero_used() -> Vec<bool> {
        let mut map = vec![false; PAGE_COUNT];
        map[0] = true;
        map
    }

    #[test]
    fn test_fresh_free_map() {
        let sim = Simulator::new();
        assert_eq!(sim.free_map_snapshot(), only_zero_used());
        assert_eq!(sim.free_page_count(), PAGE_COUNT - 1);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let mut sim = Simulator::new();
        sim.create_process(1, 4).unwrap();
        assert_eq!(sim.free_map_snapshot(), sim.free_map_snapshot());
    }

    #[test]
    fn test_full_scenario() {
        let mut sim = Simulator::new();
        sim.create_process(2, 3).unwrap();

        let map = sim.free_map_snapshot();
        assert!(map[..5].iter().all(|&used| used));
        assert!(map[5..].iter().all(|&used| !used));
        assert_eq!(sim.page_table_snapshot(2).unwrap(), vec![(0, 2), (1, 3), (2, 4)]);

        let stored = sim.store_byte(2, 0, 42).unwrap();
        assert_eq!(stored.paddr, get_address(2, 0));
        assert_eq!(sim.load_byte(2, 0).unwrap().value, 42);

        sim.destroy_process(2).unwrap();
        assert_eq!(sim.free_map_snapshot(), only_zero_used());
        assert!(!sim.process_exists(2));
    }

    #[test]
    fn test_fault_scenario() {
        let mut sim = Simulator::new();
        sim.create_process(2, 3).unwrap();
        assert_eq!(
            sim.load_byte(2, 5 * 256),
            Err(SimError::TranslationFault { proc_num: 2, vaddr: 1280 })
        );
    }

    #[test]
    fn test_round_trip_every_mapped_page() {
        let mut sim = Simulator::new();
        sim.create_process(7, 5).unwrap();
        for page in 0..5 {
            let vaddr = page * PAGE_SIZE + page;
            sim.store_byte(7, vaddr, page as u8 + 100).unwrap();
        }
        for page in 0..5 {
            let vaddr = page * PAGE_SIZE + page;
            assert_eq!(sim.load_byte(7, vaddr).unwrap().value, page as u8 + 100);
        }
    }

    #[test]
    fn test_distinct_physical_pages() {
        let mut sim = Simulator::new();
        sim.create_process(0, 10).unwrap();
        let entries = sim.page_table_snapshot(0).unwrap();
        assert_eq!(entries.len(), 10);

        let mut frames: Vec<usize> = entries.iter().map(|&(_, frame)| frame).collect();
        frames.sort_unstable();
        frames.dedup();
        assert_eq!(frames.len(), 10);
        assert!(!frames.contains(&0));
    }

    #[test]
    fn test_oom_when_request_exceeds_free_pages() {
        let mut sim = Simulator::new();
        sim.create_process(0, 40).unwrap();
        let free = sim.free_page_count();
        assert_eq!(free, 22);

        // One page goes to the table, so `free` data pages cannot fit
        assert_eq!(
            sim.create_process(1, free),
            Err(SimError::OutOfMemory { proc_num: 1, kind: AllocationKind::DataPage })
        );
        assert!(!sim.process_exists(1));
        assert_eq!(sim.page_table_snapshot(1).unwrap(), Vec::new());
    }

    #[test]
    fn test_failure_does_not_block_later_commands() {
        let mut sim = Simulator::new();
        assert_eq!(sim.destroy_process(5), Err(SimError::ProcessNotFound(5)));
        sim.create_process(5, 1).unwrap();
        sim.store_byte(5, 3, 8).unwrap();
        assert_eq!(sim.load_byte(5, 3).unwrap().value, 8);
    }

    #[test]
    fn test_reinitialize_clears_everything() {
        let mut sim = Simulator::new();
        sim.create_process(1, 3).unwrap();
        sim.store_byte(1, 0, 9).unwrap();

        sim.initialize();
        assert_eq!(sim.free_map_snapshot(), only_zero_used());
        assert!(!sim.process_exists(1));
        assert!(sim.memory().data()[PAGE_SIZE..].iter().all(|&b| b == 0));
    }

    /// Every page owned by a live process is marked used and owned only once
    fn assert_consistent(sim: &Simulator) {
        let used = sim.free_map_snapshot();
        let mut owner = vec![None; PAGE_COUNT];
        owner[0] = Some(usize::MAX);

        for proc_num in (0..MAX_PROCESSES).filter(|&p| sim.process_exists(p)) {
            let table = directory::get_table_page(sim.memory(), proc_num);
            let frames = sim.page_table_snapshot(proc_num).unwrap();
            let pages = std::iter::once(table).chain(frames.iter().map(|&(_, frame)| frame));
            for page in pages {
                assert!(used[page], "proc {proc_num} references free page {page}");
                assert_eq!(owner[page], None, "page {page} owned twice (proc {proc_num})");
                owner[page] = Some(proc_num);
            }
        }
    }

    #[test]
    fn test_stale_mapping_cannot_reach_other_process() {
        let mut sim = Simulator::new();
        sim.create_process(1, 2).unwrap();
        sim.destroy_process(1).unwrap();
        sim.create_process(3, 1).unwrap();
        sim.create_process(4, 1).unwrap();

        // Virtual page 1 of proc 3 was only mapped for the old proc 1
        assert_eq!(sim.page_table_snapshot(3).unwrap(), vec![(0, 2)]);
        assert_eq!(
            sim.store_byte(3, 256, 7),
            Err(SimError::TranslationFault { proc_num: 3, vaddr: 256 })
        );
        assert_eq!(sim.page_table_snapshot(4).unwrap(), vec![(0, 4)]);

        sim.destroy_process(3).unwrap();
        let used = sim.free_map_snapshot();
        assert!(used[3]);
        assert!(used[4]);
        assert_consistent(&sim);
    }

    #[test]
    fn test_create_destroy_cycles_stay_consistent() {
        let mut sim = Simulator::new();
        let script = [
            (true, 1, 2),
            (false, 1, 0),
            (true, 3, 1),
            (true, 4, 1),
            (true, 5, 6),
            (false, 3, 0),
            (true, 6, 3),
            (false, 4, 0),
            (true, 7, 50),
            (false, 5, 0),
            (true, 8, 2),
            (false, 6, 0),
            (true, 9, 4),
        ];
        for (create, proc_num, page_count) in script {
            let _ = if create {
                sim.create_process(proc_num, page_count)
            } else {
                sim.destroy_process(proc_num)
            };
            assert_consistent(&sim);
        }
    }

    #[test]
    fn test_random_create_destroy_stays_consistent() {
        let mut sim = Simulator::new();
        let mut state: u32 = 0x2545_f491;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as usize
        };

        for _ in 0..500 {
            let proc_num = next() % 8;
            if next() % 3 == 0 {
                let _ = sim.destroy_process(proc_num);
            } else if !sim.process_exists(proc_num) {
                let _ = sim.create_process(proc_num, next() % 12);
            }
            assert_consistent(&sim);

            // Leaked pages from OOM never come back, so start over when memory runs dry
            if sim.free_page_count() == 0 {
                sim.initialize();
            }
        }
    }

    #[test]
    fn test_invalid_process_number() {
        let mut sim = Simulator::new();
        assert_eq!(
            sim.create_process(MAX_PROCESSES, 1),
            Err(SimError::InvalidProcess(MAX_PROCESSES))
        );
        assert_eq!(sim.free_map_snapshot(), only_zero_used());
        assert!(!sim.process_exists(MAX_PROCESSES));
    }

    #[test]
    fn test_shared_simulator_across_threads() {
        let shared = std::sync::Arc::new(SharedSimulator::new());
        let handles: Vec<_> = (0..4)
            .map(|proc_num| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared.create_process(proc_num, 2).unwrap();
                    shared.store_byte(proc_num, 1, proc_num as u8).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 4 tables + 8 data pages + page 0
        let used = shared.free_map_snapshot().iter().filter(|&&used| used).count();
        assert_eq!(used, 13);
        for proc_num in 0..4 {
            assert_eq!(shared.load_byte(proc_num, 1).unwrap().value, proc_num as u8);
            assert_eq!(shared.page_table_snapshot(proc_num).unwrap().len(), 2);
        }

        shared.initialize();
        assert_eq!(shared.free_map_snapshot(), only_zero_used());
    }
}
