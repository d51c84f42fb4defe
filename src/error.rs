/// Which allocation ran out of memory during process creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    PageTable,
    DataPage,
}

impl std::fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationKind::PageTable => f.write_str("page table"),
            AllocationKind::DataPage => f.write_str("data page"),
        }
    }
}

/// Errors reported by simulator operations. None of them are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("OOM: proc {proc_num}: {kind}")]
    OutOfMemory { proc_num: usize, kind: AllocationKind },
    #[error("process {0} not found")]
    ProcessNotFound(usize),
    #[error("Error: Invalid virtual address")]
    TranslationFault { proc_num: usize, vaddr: usize },
    #[error("Error: Invalid virtual address")]
    VirtualAddressOutOfRange { proc_num: usize, vaddr: usize },
    #[error("invalid process number {0}")]
    InvalidProcess(usize),
}
