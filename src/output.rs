use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    Yaml,
    /// Indented JSON
    Pretty,
}

pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String, Box<dyn std::error::Error>> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(data)?,
    };
    Ok(text)
}

pub fn output_data<T: Serialize>(data: &T, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render(data, format)?.trim_end());
    Ok(())
}

pub fn print_success(message: &str) {
    eprintln!("✅ {}", message);
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31m❌ Error: {}\x1b[0m", message);
}

pub fn print_info(message: &str) {
    eprintln!("ℹ️  {}", message);
}
