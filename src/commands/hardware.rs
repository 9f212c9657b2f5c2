use tracing::info;

use crate::cli::Commands;
use crate::config::AgentConfig;
use crate::hardware::lshw::LSHW;
use crate::hardware::{Collector, SystemProbe};
use crate::output::{output_data, print_info, print_success};

pub fn handle_hardware_command(cmd: &Commands, config: &AgentConfig) -> Result<(), Box<dyn std::error::Error>> {
    let probe = SystemProbe::new(config.probe_timeout()).with_tool_timeout(LSHW, config.lshw_timeout());
    let collector = Collector::new(probe, config.probe_paths())?;

    match cmd {
        Commands::Inventory { format } => {
            let inventory = collector.inventory()?;
            output_data(&inventory, *format)?;
        }
        Commands::Cpu { only_model, format } => {
            if *only_model {
                output_data(&collector.cpu_model()?, *format)?;
            } else {
                output_data(&collector.cpus(), *format)?;
            }
        }
        Commands::Memory { total, format } => {
            if *total {
                output_data(&collector.mem_total(), *format)?;
            } else {
                output_data(&collector.memory_modules(), *format)?;
            }
        }
        Commands::Network { format } => {
            output_data(&collector.network(), *format)?;
        }
        Commands::Disk { format } => {
            output_data(&collector.disks(), *format)?;
        }
        Commands::Storage { format } => {
            output_data(&collector.storage_controllers(), *format)?;
        }
        Commands::Bmc { only_ip, format } => {
            if *only_ip {
                output_data(&collector.bmc_ip()?, *format)?;
            } else {
                output_data(&collector.bmc()?, *format)?;
            }
        }
        Commands::Node { format } => {
            output_data(&collector.node()?, *format)?;
        }
        Commands::PostInventory { url } => {
            print_info("Collecting hardware inventory...");
            let inventory = collector.inventory()?;

            let base = url.as_deref().unwrap_or(&config.report_url);
            let api_url = format!("{}/api/v1/servers/inventory", base.trim_end_matches('/'));
            info!(url = %api_url, "posting inventory");

            let client = reqwest::blocking::Client::builder()
                .timeout(config.report_timeout())
                .build()?;
            let response = client.post(&api_url).json(&inventory).send()?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text()?;
                return Err(format!("Failed to post inventory: HTTP {}: {}", status, body.trim()).into());
            }
            print_success(&format!("Inventory posted to {}", api_url));
        }
    }
    Ok(())
}
