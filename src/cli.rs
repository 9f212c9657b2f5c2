use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "hwinfo-agent")]
#[command(about = "Collect a normalized hardware inventory of this machine")]
pub struct Cli {
    /// YAML config file (default: ~/.config/hwinfo-agent/config.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Timeout in seconds for each external probe
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect the full hardware inventory
    Inventory {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Processor sockets with model and core count
    Cpu {
        /// Only print the model name reported by lscpu
        #[arg(long)]
        only_model: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Installed memory modules
    Memory {
        /// Only print total installed memory
        #[arg(long)]
        total: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Network interfaces
    Network {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Disks
    Disk {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// RAID and SATA storage controllers
    Storage {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// BMC LAN configuration
    Bmc {
        /// Only print the BMC IP address
        #[arg(long)]
        only_ip: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Chassis identity and boot interface addresses
    Node {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Post the inventory to the reporting API once
    PostInventory {
        /// API base URL (default: report_url from config)
        #[arg(short, long)]
        url: Option<String>,
    },
}
