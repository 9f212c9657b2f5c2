//! Acquisition of the raw hardware tree from `lshw`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::hardware::error::{ProbeError, Result};
use crate::hardware::probe::HardwareProbe;
use crate::hardware::types::{LogicalName, SizeValue};

pub const LSHW: &str = "lshw";
pub const DETECT_VIRT: &str = "systemd-detect-virt";

/// Classes requested in the combined query.
pub const COMBINED_CLASSES: &[&str] = &["cpu", "memory", "network", "disk", "storage"];
/// The combined query does not reliably carry complete disk records, so disks
/// are queried again on their own.
pub const DISK_CLASSES: &[&str] = &["disk"];

/// One node of the lshw tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    pub class: String,
    pub description: Option<String>,
    pub product: Option<String>,
    pub vendor: Option<String>,
    pub serial: Option<String>,
    pub logicalname: Option<LogicalName>,
    pub size: Option<SizeValue>,
    pub slot: Option<String>,
    #[serde(default)]
    pub children: Vec<ComponentRecord>,
    #[serde(default)]
    pub configuration: BTreeMap<String, Value>,
}

impl ComponentRecord {
    /// A `configuration` entry rendered as text. lshw reports these as strings,
    /// but numbers are tolerated.
    pub fn config_value(&self, key: &str) -> Option<String> {
        match self.configuration.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Raw probe results captured once when a collector is built.
#[derive(Debug, Clone, Default)]
pub struct Acquisition {
    pub virtualized: bool,
    pub combined: Vec<ComponentRecord>,
    pub disks: Vec<ComponentRecord>,
}

pub fn acquire(probe: &dyn HardwareProbe) -> Result<Acquisition> {
    let virtualized = detect_virtualization(probe)?;
    let combined = query(probe, COMBINED_CLASSES)?;
    let disks = query(probe, DISK_CLASSES)?;

    debug!(
        virtualized,
        combined = combined.len(),
        disks = disks.len(),
        "hardware tree acquired"
    );
    Ok(Acquisition {
        virtualized,
        combined,
        disks,
    })
}

/// Run lshw restricted to `classes` and parse its JSON.
pub fn query(probe: &dyn HardwareProbe, classes: &[&str]) -> Result<Vec<ComponentRecord>> {
    let mut args = Vec::with_capacity(classes.len() * 2 + 1);
    for class in classes {
        args.push("-c");
        args.push(*class);
    }
    args.push("-json");

    let stdout = probe.run(LSHW, &args)?.into_checked(LSHW)?;
    parse_document(&stdout)
}

/// Parse lshw JSON output into top-level records.
///
/// Current lshw prints an array. Older builds print a bare object, or several
/// objects separated by commas with no enclosing brackets.
pub fn parse_document(text: &str) -> Result<Vec<ComponentRecord>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ProbeError::parse(LSHW, "empty output"));
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => serde_json::from_str(&format!("[{}]", text))
            .map_err(|_| ProbeError::parse(LSHW, err.to_string()))?,
    };

    let records = if value.is_array() {
        serde_json::from_value::<Vec<ComponentRecord>>(value)
    } else if value.is_object() {
        serde_json::from_value::<ComponentRecord>(value).map(|record| vec![record])
    } else {
        return Err(ProbeError::parse(LSHW, "expected a JSON object or array"));
    };

    records.map_err(|e| ProbeError::parse(LSHW, e.to_string()))
}

/// Any answer other than `none` means we are running virtualized.
pub fn detect_virtualization(probe: &dyn HardwareProbe) -> Result<bool> {
    // systemd-detect-virt exits non-zero when it prints "none", so the exit
    // code carries no failure signal here.
    let output = probe.run(DETECT_VIRT, &[])?;
    parse_virt_token(&output.stdout)
}

fn parse_virt_token(stdout: &str) -> Result<bool> {
    match stdout.split_whitespace().next() {
        Some(token) => Ok(token != "none"),
        None => Err(ProbeError::parse(DETECT_VIRT, "empty output")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::error::ErrorKind;
    use crate::hardware::test_support::FakeProbe;

    const SAMPLE: &str = r#"[
      {
        "id" : "cpu:0",
        "class" : "processor",
        "claimed" : true,
        "product" : "Intel(R) Xeon(R) Gold 6230 CPU @ 2.10GHz",
        "vendor" : "Intel Corp.",
        "slot" : "CPU1",
        "size" : 2100000000,
        "configuration" : { "cores" : "20", "enabledcores" : "20", "threads" : "40" }
      },
      {
        "id" : "memory",
        "class" : "memory",
        "description" : "System Memory",
        "size" : 68719476736,
        "children" : [
          { "id" : "bank:0", "class" : "memory", "slot" : "DIMM_A1", "size" : 34359738368 },
          { "id" : "bank:1", "class" : "memory", "slot" : "DIMM_A2", "description" : "[empty]" }
        ]
      },
      {
        "id" : "network",
        "class" : "network",
        "logicalname" : ["eno1", "eno1.100"],
        "serial" : "3c:ec:ef:00:11:22"
      }
    ]"#;

    #[test]
    fn test_parse_array_document() {
        let records = parse_document(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);

        let cpu = &records[0];
        assert_eq!(cpu.class, "processor");
        assert_eq!(cpu.config_value("cores"), Some("20".to_string()));
        assert_eq!(cpu.size, Some(SizeValue::Bytes(2_100_000_000)));

        let memory = &records[1];
        assert_eq!(memory.children.len(), 2);
        assert_eq!(memory.children[1].size, None);

        assert_eq!(
            records[2].logicalname,
            Some(LogicalName::Many(vec!["eno1".to_string(), "eno1.100".to_string()]))
        );
    }

    #[test]
    fn test_parse_single_object_document() {
        let records =
            parse_document(r#"{"id":"disk","class":"disk","product":"QEMU HARDDISK"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product.as_deref(), Some("QEMU HARDDISK"));
    }

    #[test]
    fn test_parse_comma_separated_objects() {
        let text = "{\"id\":\"disk:0\",\"class\":\"disk\"},\n{\"id\":\"cdrom\",\"class\":\"disk\"}\n";
        let records = parse_document(text).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["disk:0", "cdrom"]);
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        for text in ["", "not json", "42", r#"[{"id":"x","class":"disk","size":"huge"}]"#] {
            let err = parse_document(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "input {:?}", text);
        }
    }

    #[test]
    fn test_query_passes_class_filters() {
        let probe = FakeProbe::new().with_output(
            LSHW,
            &["-c", "disk", "-json"],
            r#"[{"id":"disk","class":"disk"}]"#,
        );
        let records = query(&probe, DISK_CLASSES).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_lshw_is_unavailable() {
        let probe = FakeProbe::new().with_output(DETECT_VIRT, &[], "none\n");
        let err = acquire(&probe).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_virtualization_token() {
        assert!(!parse_virt_token("none\n").unwrap());
        assert!(parse_virt_token("kvm\n").unwrap());
        assert!(parse_virt_token("vmware").unwrap());
        assert_eq!(parse_virt_token("  \n").unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_detect_virtualization_ignores_exit_code() {
        let probe = FakeProbe::new().with_result(DETECT_VIRT, &[], "none\n", 1);
        assert!(!detect_virtualization(&probe).unwrap());
    }
}
