use crate::hardware::lshw::ComponentRecord;
use crate::hardware::types::{render_gb, DiskFact, StorageFact};

/// Project records from the dedicated disk query.
pub fn collect_disks(records: &[ComponentRecord]) -> Vec<DiskFact> {
    records
        .iter()
        .map(|disk| DiskFact {
            kind: disk.id.clone(),
            product: disk.product.clone(),
            vendor: disk.vendor.clone(),
            size: render_gb(disk.size.as_ref()),
        })
        .collect()
}

/// Project RAID/SATA controllers. Controllers have no capacity of their own.
pub fn collect_storage_controllers(records: &[ComponentRecord]) -> Vec<StorageFact> {
    records
        .iter()
        .map(|controller| StorageFact {
            kind: controller.id.clone(),
            product: controller.product.clone(),
            vendor: controller.vendor.clone(),
            description: controller.description.clone(),
        })
        .collect()
}
