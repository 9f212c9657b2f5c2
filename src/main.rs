mod cli;
mod commands;
mod config;
mod hardware;
mod output;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use cli::Cli;
use commands::handle_hardware_command;
use config::AgentConfig;
use hardware::ProbeError;
use output::print_error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        print_error(&e.to_string());
        std::process::exit(exit_code(&*e));
    }
}

/// EX_TEMPFAIL (75) tells a scheduler the whole collection is worth retrying.
fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<ProbeError>() {
        Some(probe_err) if probe_err.is_transient() => 75,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AgentConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.timeout, cli.log_file.clone())?;
    init_logging(cli.verbose, cli.quiet, config.log_file.as_deref())?;

    handle_hardware_command(&cli.command, &config)
}

/// Default level is INFO; -v for DEBUG, -vv for TRACE, -q for errors only.
/// Logs go to stderr unless a log file is configured, keeping stdout for facts.
fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(format!("hwinfo_agent={}", level).parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::time::Duration;

    #[test]
    fn test_transient_probe_error_exits_tempfail() {
        let err: Box<dyn Error> = Box::new(ProbeError::Timeout {
            tool: "lshw".to_string(),
            after: Duration::from_secs(60),
        });
        assert_eq!(exit_code(&*err), 75);
    }

    #[test]
    fn test_parse_error_exits_one() {
        let err: Box<dyn Error> = Box::new(ProbeError::parse("lshw", "expected value at line 1"));
        assert_eq!(exit_code(&*err), 1);
    }

    #[test]
    fn test_plain_error_exits_one() {
        let err: Box<dyn Error> = String::from("Failed to post inventory: HTTP 500").into();
        assert_eq!(exit_code(&*err), 1);
    }
}
