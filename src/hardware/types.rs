use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Placeholder for any field whose source value is absent.
pub const UNKNOWN: &str = "Unknown";

/// Description carried by placeholder records when running virtualized.
pub const VM_DESCRIPTION: &str = "The virtual machine";

const GIB: u64 = 1 << 30;

/// A size reported by lshw: either a byte count or the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeValue {
    Unknown,
    Bytes(u64),
}

impl SizeValue {
    /// `"<N> GB"` with N = bytes / 2^30, truncated. The sentinel passes through.
    pub fn to_gb(&self) -> String {
        match self {
            SizeValue::Unknown => UNKNOWN.to_string(),
            SizeValue::Bytes(bytes) => format!("{} GB", bytes / GIB),
        }
    }
}

/// Render an optional size, defaulting to the sentinel when absent.
pub fn render_gb(size: Option<&SizeValue>) -> String {
    size.copied().unwrap_or(SizeValue::Unknown).to_gb()
}

impl FromStr for SizeValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == UNKNOWN {
            return Ok(SizeValue::Unknown);
        }
        s.parse::<u64>()
            .map(SizeValue::Bytes)
            .map_err(|_| format!("invalid size value {:?}", s))
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeValue::Unknown => f.write_str(UNKNOWN),
            SizeValue::Bytes(bytes) => write!(f, "{}", bytes),
        }
    }
}

impl<'de> Deserialize<'de> for SizeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(bytes) => Ok(SizeValue::Bytes(bytes)),
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// lshw emits `logicalname` as a string or, for multi-homed devices, a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogicalName {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuFact {
    pub slot: Option<String>,
    pub model: String,
    pub core: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryFact {
    pub slot: String,
    pub size: String,
    pub description: Option<String>,
}

/// Network facts pass lshw fields through as-is, without sentinel substitution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkFact {
    pub name: Option<LogicalName>,
    pub mac: Option<String>,
    pub product: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskFact {
    #[serde(rename = "type")]
    pub kind: String,
    pub product: Option<String>,
    pub vendor: Option<String>,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageFact {
    #[serde(rename = "type")]
    pub kind: String,
    pub product: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
}

/// BMC LAN configuration. Keys the tool did not report are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BmcFact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipaddr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

impl BmcFact {
    pub fn is_empty(&self) -> bool {
        self.ipaddr.is_none() && self.mask.is_none() && self.gateway.is_none() && self.mac.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub product: String,
    pub vendor: String,
    pub serial: String,
    pub boot_mac: String,
    pub boot_ip: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Inventory {
    pub agent_version: String,
    pub collected_at: DateTime<Utc>,
    pub virtual_machine: bool,
    pub node: NodeInfo,
    pub cpu_model: Option<String>,
    pub cpus: Vec<CpuFact>,
    pub mem_total: String,
    pub memory: Vec<MemoryFact>,
    pub network: Vec<NetworkFact>,
    pub disks: Vec<DiskFact>,
    pub storage: Vec<StorageFact>,
    pub bmc: Vec<BmcFact>,
}
