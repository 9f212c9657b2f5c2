//! Facts whose answer depends on whether we run on bare metal or in a VM.
//!
//! The decision is made once when a collector is built; accessors just
//! delegate to the selected strategy.

use std::fmt;

use crate::hardware::classify::Buckets;
use crate::hardware::collect_bmc::collect_bmc_lan;
use crate::hardware::collect_memory::{collect_memory_modules, collect_memory_total};
use crate::hardware::collect_node::{collect_boot_mac, read_dmi, serial_from_mac, CHASSIS_SERIAL};
use crate::hardware::collect_storage::collect_storage_controllers;
use crate::hardware::collector::ProbePaths;
use crate::hardware::error::Result;
use crate::hardware::probe::HardwareProbe;
use crate::hardware::types::{BmcFact, MemoryFact, StorageFact, UNKNOWN, VM_DESCRIPTION};

/// BMC address reported for virtual machines.
pub const VM_BMC_IP: &str = "0.0.0.0";

pub trait HostStrategy: fmt::Debug {
    fn name(&self) -> &'static str;

    fn memory_modules(&self, buckets: &Buckets) -> Vec<MemoryFact>;

    fn storage_controllers(&self, buckets: &Buckets) -> Vec<StorageFact>;

    fn bmc(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<Vec<BmcFact>>;

    fn bmc_ip(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<Option<String>>;

    fn serial(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<String>;
}

pub fn select(virtualized: bool) -> Box<dyn HostStrategy> {
    if virtualized {
        Box::new(VirtualMachineStrategy)
    } else {
        Box::new(RealHardwareStrategy)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealHardwareStrategy;

impl HostStrategy for RealHardwareStrategy {
    fn name(&self) -> &'static str {
        "bare-metal"
    }

    fn memory_modules(&self, buckets: &Buckets) -> Vec<MemoryFact> {
        collect_memory_modules(buckets.system_memory())
    }

    fn storage_controllers(&self, buckets: &Buckets) -> Vec<StorageFact> {
        collect_storage_controllers(buckets.storage())
    }

    fn bmc(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<Vec<BmcFact>> {
        Ok(vec![collect_bmc_lan(probe, &paths.bmc_device)?])
    }

    fn bmc_ip(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<Option<String>> {
        Ok(collect_bmc_lan(probe, &paths.bmc_device)?.ipaddr)
    }

    fn serial(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<String> {
        read_dmi(probe, &paths.dmi_dir, CHASSIS_SERIAL)
    }
}

/// Fixed placeholder answers; real-hardware tables are never consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualMachineStrategy;

impl HostStrategy for VirtualMachineStrategy {
    fn name(&self) -> &'static str {
        "virtual-machine"
    }

    fn memory_modules(&self, buckets: &Buckets) -> Vec<MemoryFact> {
        vec![MemoryFact {
            slot: UNKNOWN.to_string(),
            size: collect_memory_total(buckets.system_memory()),
            description: Some(VM_DESCRIPTION.to_string()),
        }]
    }

    fn storage_controllers(&self, _buckets: &Buckets) -> Vec<StorageFact> {
        vec![StorageFact {
            kind: UNKNOWN.to_string(),
            product: Some(UNKNOWN.to_string()),
            vendor: Some(UNKNOWN.to_string()),
            description: Some(VM_DESCRIPTION.to_string()),
        }]
    }

    fn bmc(&self, _probe: &dyn HardwareProbe, _paths: &ProbePaths) -> Result<Vec<BmcFact>> {
        Ok(vec![BmcFact {
            ipaddr: Some(UNKNOWN.to_string()),
            mask: Some(UNKNOWN.to_string()),
            gateway: Some(UNKNOWN.to_string()),
            mac: Some(UNKNOWN.to_string()),
        }])
    }

    fn bmc_ip(&self, _probe: &dyn HardwareProbe, _paths: &ProbePaths) -> Result<Option<String>> {
        Ok(Some(VM_BMC_IP.to_string()))
    }

    fn serial(&self, probe: &dyn HardwareProbe, paths: &ProbePaths) -> Result<String> {
        let mac = collect_boot_mac(probe, &paths.net_class_dir, &paths.boot_interface)?;
        Ok(serial_from_mac(&mac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::classify::{classify, SYSTEM_MEMORY};
    use crate::hardware::test_support::{record, FakeProbe};
    use crate::hardware::types::SizeValue;

    fn buckets() -> Buckets {
        let mut memory = record("memory", "memory");
        memory.description = Some(SYSTEM_MEMORY.to_string());
        memory.size = Some(SizeValue::Bytes(8 << 30));
        memory.children = vec![record("memory", "bank:0"), record("memory", "bank:1")];
        classify(&[memory, record("storage", "sata")], Vec::new())
    }

    #[test]
    fn test_select_by_flag() {
        assert_eq!(select(true).name(), "virtual-machine");
        assert_eq!(select(false).name(), "bare-metal");
    }

    #[test]
    fn test_vm_memory_is_single_placeholder() {
        let modules = VirtualMachineStrategy.memory_modules(&buckets());
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].slot, UNKNOWN);
        assert_eq!(modules[0].size, "8 GB");
        assert_eq!(modules[0].description.as_deref(), Some(VM_DESCRIPTION));
    }

    #[test]
    fn test_vm_storage_is_single_placeholder() {
        let controllers = VirtualMachineStrategy.storage_controllers(&buckets());
        assert_eq!(controllers.len(), 1);
        assert_eq!(controllers[0].kind, UNKNOWN);
        assert_eq!(controllers[0].description.as_deref(), Some(VM_DESCRIPTION));
    }

    #[test]
    fn test_real_hardware_reads_buckets() {
        let buckets = buckets();
        assert_eq!(RealHardwareStrategy.memory_modules(&buckets).len(), 2);
        assert_eq!(RealHardwareStrategy.storage_controllers(&buckets)[0].kind, "sata");
    }

    #[test]
    fn test_vm_bmc_never_probes() {
        let probe = FakeProbe::new().with_path("/dev/ipmi0");
        let paths = ProbePaths::default();

        let bmc = VirtualMachineStrategy.bmc(&probe, &paths).unwrap();
        assert_eq!(bmc.len(), 1);
        assert_eq!(bmc[0].ipaddr.as_deref(), Some(UNKNOWN));
        assert_eq!(bmc[0].mac.as_deref(), Some(UNKNOWN));
        assert_eq!(
            VirtualMachineStrategy.bmc_ip(&probe, &paths).unwrap().as_deref(),
            Some(VM_BMC_IP)
        );
        assert!(probe.calls().is_empty());
    }

    #[test]
    fn test_vm_serial_from_boot_mac() {
        let probe = FakeProbe::new().with_file("/sys/class/net/eth0/address", "52:54:00:ab:cd:ef\n");
        let serial = VirtualMachineStrategy.serial(&probe, &ProbePaths::default()).unwrap();
        assert_eq!(serial, "525400abcdef");
    }

    #[test]
    fn test_real_serial_from_chassis_file() {
        let probe = FakeProbe::new().with_file("/sys/devices/virtual/dmi/id/chassis_serial", "CZJ12345\n");
        let serial = RealHardwareStrategy.serial(&probe, &ProbePaths::default()).unwrap();
        assert_eq!(serial, "CZJ12345");
    }
}
