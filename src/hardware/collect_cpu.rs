use crate::hardware::error::Result;
use crate::hardware::lshw::ComponentRecord;
use crate::hardware::probe::HardwareProbe;
use crate::hardware::types::CpuFact;

pub const LSCPU: &str = "lscpu";

/// Project processor records. Sockets without a model are empty and skipped.
pub fn collect_cpu_facts(records: &[ComponentRecord]) -> Vec<CpuFact> {
    records
        .iter()
        .filter_map(|cpu| {
            let model = cpu.product.as_ref().filter(|p| !p.is_empty())?;
            Some(CpuFact {
                slot: cpu.slot.clone(),
                model: model.clone(),
                core: cpu.config_value("cores"),
            })
        })
        .collect()
}

/// Model string from `lscpu`, for callers that only need the name.
pub fn collect_cpu_model(probe: &dyn HardwareProbe) -> Result<Option<String>> {
    let output = probe.run(LSCPU, &[])?.into_checked(LSCPU)?;
    Ok(parse_model_name(&output))
}

fn parse_model_name(output: &str) -> Option<String> {
    let line = output.lines().find(|line| line.contains("Model name"))?;
    let (_, value) = line.split_once(':')?;
    let model = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if model.is_empty() {
        None
    } else {
        Some(model)
    }
}
