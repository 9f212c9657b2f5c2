//! Chassis identity and boot-interface facts. Every call re-reads the source.

use std::path::Path;

use crate::hardware::error::Result;
use crate::hardware::probe::HardwareProbe;

pub const IP: &str = "ip";

pub const PRODUCT_NAME: &str = "product_name";
pub const SYS_VENDOR: &str = "sys_vendor";
pub const CHASSIS_SERIAL: &str = "chassis_serial";

fn read_trimmed(probe: &dyn HardwareProbe, path: &Path) -> Result<String> {
    Ok(probe.read_file(path)?.trim().to_string())
}

/// Read one DMI identity attribute, e.g. `product_name`.
pub fn read_dmi(probe: &dyn HardwareProbe, dmi_dir: &Path, attribute: &str) -> Result<String> {
    read_trimmed(probe, &dmi_dir.join(attribute))
}

pub fn collect_boot_mac(probe: &dyn HardwareProbe, net_class_dir: &Path, interface: &str) -> Result<String> {
    read_trimmed(probe, &net_class_dir.join(interface).join("address"))
}

/// First IPv4 address configured on `interface`, without its prefix length.
pub fn collect_boot_ip(probe: &dyn HardwareProbe, interface: &str) -> Result<Option<String>> {
    let output = probe.run(IP, &["addr", "show", interface])?.into_checked(IP)?;
    Ok(parse_first_inet(&output))
}

fn parse_first_inet(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next()? != "inet" {
            return None;
        }
        let cidr = fields.next()?;
        let addr = cidr.split('/').next().unwrap_or(cidr);
        Some(addr.to_string())
    })
}

/// Serial synthesized for virtual machines, which have no meaningful chassis serial.
pub fn serial_from_mac(mac: &str) -> String {
    mac.replace(':', "")
}
