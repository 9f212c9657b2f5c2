use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::hardware::classify::{classify, Buckets};
use crate::hardware::collect_cpu::{collect_cpu_facts, collect_cpu_model};
use crate::hardware::collect_memory::collect_memory_total;
use crate::hardware::collect_network::collect_network_facts;
use crate::hardware::collect_node::{collect_boot_ip, collect_boot_mac, read_dmi, PRODUCT_NAME, SYS_VENDOR};
use crate::hardware::collect_storage::collect_disks;
use crate::hardware::error::Result;
use crate::hardware::lshw;
use crate::hardware::probe::{HardwareProbe, SystemProbe};
use crate::hardware::strategy::{self, HostStrategy};
use crate::hardware::types::{
    BmcFact, CpuFact, DiskFact, Inventory, MemoryFact, NetworkFact, NodeInfo, StorageFact,
};

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Well-known locations the identity and BMC probes read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePaths {
    pub dmi_dir: PathBuf,
    pub net_class_dir: PathBuf,
    pub boot_interface: String,
    pub bmc_device: PathBuf,
}

impl Default for ProbePaths {
    fn default() -> Self {
        Self {
            dmi_dir: PathBuf::from("/sys/devices/virtual/dmi/id"),
            net_class_dir: PathBuf::from("/sys/class/net"),
            boot_interface: "eth0".to_string(),
            bmc_device: PathBuf::from("/dev/ipmi0"),
        }
    }
}

/// One hardware snapshot. The hardware tree is read and classified when the
/// collector is built; identity, boot-network and BMC accessors probe again
/// on every call.
#[derive(Debug)]
pub struct Collector<P: HardwareProbe = SystemProbe> {
    probe: P,
    paths: ProbePaths,
    virtualized: bool,
    buckets: Buckets,
    strategy: Box<dyn HostStrategy>,
}

impl<P: HardwareProbe> Collector<P> {
    pub fn new(probe: P, paths: ProbePaths) -> Result<Self> {
        let acquisition = lshw::acquire(&probe)?;
        let buckets = classify(&acquisition.combined, acquisition.disks);
        let strategy = strategy::select(acquisition.virtualized);

        info!(
            mode = strategy.name(),
            cpus = buckets.cpu().len(),
            memory = buckets.memory().len(),
            network = buckets.network().len(),
            storage = buckets.storage().len(),
            disks = buckets.disks().len(),
            "hardware inventory acquired"
        );

        Ok(Self {
            probe,
            paths,
            virtualized: acquisition.virtualized,
            buckets,
            strategy,
        })
    }

    pub fn is_virtual(&self) -> bool {
        self.virtualized
    }

    pub fn cpus(&self) -> Vec<CpuFact> {
        collect_cpu_facts(self.buckets.cpu())
    }

    pub fn cpu_model(&self) -> Result<Option<String>> {
        collect_cpu_model(&self.probe)
    }

    pub fn mem_total(&self) -> String {
        collect_memory_total(self.buckets.system_memory())
    }

    pub fn memory_modules(&self) -> Vec<MemoryFact> {
        self.strategy.memory_modules(&self.buckets)
    }

    pub fn network(&self) -> Vec<NetworkFact> {
        collect_network_facts(self.buckets.network())
    }

    pub fn disks(&self) -> Vec<DiskFact> {
        collect_disks(self.buckets.disks())
    }

    pub fn storage_controllers(&self) -> Vec<StorageFact> {
        self.strategy.storage_controllers(&self.buckets)
    }

    pub fn boot_mac(&self) -> Result<String> {
        collect_boot_mac(&self.probe, &self.paths.net_class_dir, &self.paths.boot_interface)
    }

    pub fn boot_ip(&self) -> Result<Option<String>> {
        collect_boot_ip(&self.probe, &self.paths.boot_interface)
    }

    pub fn product(&self) -> Result<String> {
        read_dmi(&self.probe, &self.paths.dmi_dir, PRODUCT_NAME)
    }

    pub fn vendor(&self) -> Result<String> {
        read_dmi(&self.probe, &self.paths.dmi_dir, SYS_VENDOR)
    }

    pub fn serial(&self) -> Result<String> {
        self.strategy.serial(&self.probe, &self.paths)
    }

    pub fn bmc(&self) -> Result<Vec<BmcFact>> {
        self.strategy.bmc(&self.probe, &self.paths)
    }

    pub fn bmc_ip(&self) -> Result<Option<String>> {
        self.strategy.bmc_ip(&self.probe, &self.paths)
    }

    pub fn node(&self) -> Result<NodeInfo> {
        Ok(NodeInfo {
            product: self.product()?,
            vendor: self.vendor()?,
            serial: self.serial()?,
            boot_mac: self.boot_mac()?,
            boot_ip: self.boot_ip()?,
        })
    }

    /// Every fact this collector knows, as one document.
    pub fn inventory(&self) -> Result<Inventory> {
        Ok(Inventory {
            agent_version: AGENT_VERSION.to_string(),
            collected_at: Utc::now(),
            virtual_machine: self.is_virtual(),
            node: self.node()?,
            cpu_model: self.cpu_model()?,
            cpus: self.cpus(),
            mem_total: self.mem_total(),
            memory: self.memory_modules(),
            network: self.network(),
            disks: self.disks(),
            storage: self.storage_controllers(),
            bmc: self.bmc()?,
        })
    }
}
