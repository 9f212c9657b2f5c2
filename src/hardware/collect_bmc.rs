use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::hardware::error::Result;
use crate::hardware::probe::HardwareProbe;
use crate::hardware::types::BmcFact;

pub const IPMITOOL: &str = "ipmitool";

/// Query the BMC LAN configuration through `ipmitool lan print`.
///
/// Without the IPMI device node nothing is invoked and the result is empty.
/// The tool output goes to a private temporary file that is read back and
/// removed afterwards, so concurrent runs never share it.
pub fn collect_bmc_lan(probe: &dyn HardwareProbe, device: &Path) -> Result<BmcFact> {
    if !probe.exists(device) {
        debug!(device = %device.display(), "no IPMI device, skipping BMC query");
        return Ok(BmcFact::default());
    }

    let scratch = NamedTempFile::new()?;
    let code = probe.run_to_file(IPMITOOL, &["lan", "print"], scratch.path())?;
    if code != Some(0) {
        warn!(exit_code = ?code, "ipmitool lan print exited unsuccessfully, parsing partial output");
    }

    let text = probe.read_file(scratch.path())?;
    let fact = parse_lan_print(&text);
    if fact.is_empty() {
        debug!("ipmitool reported no LAN fields");
    }
    Ok(fact)
}

/// Parse `Label : value [trailing text]` lines. Only the first token of the
/// value is kept; unrecognized labels and lines without a colon are ignored.
pub fn parse_lan_print(text: &str) -> BmcFact {
    let mut fact = BmcFact::default();

    for line in text.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let target = match label.trim() {
            "IP Address" => &mut fact.ipaddr,
            "Subnet Mask" => &mut fact.mask,
            "MAC Address" => &mut fact.mac,
            "Default Gateway IP" => &mut fact.gateway,
            _ => continue,
        };
        *target = Some(value.split_whitespace().next().unwrap_or_default().to_string());
    }

    fact
}
