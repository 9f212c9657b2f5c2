use crate::hardware::lshw::ComponentRecord;

pub const SYSTEM_MEMORY: &str = "System Memory";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Cpu,
    Memory,
    Network,
    StorageController,
}

/// Decide which bucket a top-level record belongs to. First match wins.
pub fn bucket_for(record: &ComponentRecord) -> Option<Bucket> {
    match record.class.as_str() {
        "processor" => Some(Bucket::Cpu),
        "memory" if record.description.as_deref() == Some(SYSTEM_MEMORY) => Some(Bucket::Memory),
        "network" => Some(Bucket::Network),
        "storage" if matches!(record.id.as_str(), "raid" | "sata") => {
            Some(Bucket::StorageController)
        }
        _ => None,
    }
}

/// The hardware tree split by category. Built once; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    cpu: Vec<ComponentRecord>,
    memory: Vec<ComponentRecord>,
    network: Vec<ComponentRecord>,
    storage: Vec<ComponentRecord>,
    disks: Vec<ComponentRecord>,
}

impl Buckets {
    pub fn cpu(&self) -> &[ComponentRecord] {
        &self.cpu
    }

    pub fn memory(&self) -> &[ComponentRecord] {
        &self.memory
    }

    pub fn network(&self) -> &[ComponentRecord] {
        &self.network
    }

    pub fn storage(&self) -> &[ComponentRecord] {
        &self.storage
    }

    /// Records from the dedicated disk query, untouched by classification.
    pub fn disks(&self) -> &[ComponentRecord] {
        &self.disks
    }

    /// The System Memory record, if the tree carried one.
    pub fn system_memory(&self) -> Option<&ComponentRecord> {
        self.memory
            .iter()
            .find(|record| record.description.as_deref() == Some(SYSTEM_MEMORY))
    }
}

/// Partition top-level records of the combined query. Children are not
/// descended into; records matching no rule are dropped.
pub fn classify(combined: &[ComponentRecord], disks: Vec<ComponentRecord>) -> Buckets {
    let mut buckets = Buckets {
        disks,
        ..Default::default()
    };

    for record in combined {
        let target = match bucket_for(record) {
            Some(Bucket::Cpu) => &mut buckets.cpu,
            Some(Bucket::Memory) => &mut buckets.memory,
            Some(Bucket::Network) => &mut buckets.network,
            Some(Bucket::StorageController) => &mut buckets.storage,
            None => continue,
        };
        target.push(record.clone());
    }

    buckets
}
