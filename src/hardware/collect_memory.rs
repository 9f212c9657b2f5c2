use crate::hardware::lshw::ComponentRecord;
use crate::hardware::types::{render_gb, MemoryFact, UNKNOWN};

/// Total installed memory from the System Memory record.
pub fn collect_memory_total(system_memory: Option<&ComponentRecord>) -> String {
    render_gb(system_memory.and_then(|memory| memory.size.as_ref()))
}

/// One fact per bank under the System Memory record, empty slots included.
pub fn collect_memory_modules(system_memory: Option<&ComponentRecord>) -> Vec<MemoryFact> {
    let Some(memory) = system_memory else {
        return Vec::new();
    };

    memory
        .children
        .iter()
        .map(|bank| MemoryFact {
            slot: bank.slot.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            size: render_gb(bank.size.as_ref()),
            description: bank.description.clone(),
        })
        .collect()
}
