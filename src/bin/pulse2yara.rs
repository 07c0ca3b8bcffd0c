//! pulse2yara: export the indicators of an OTX pulse to CSV and YARA.

use clap::Parser;
use fwintel::otx::{export_to_csv, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_CSV_PATH};
use fwintel::yara::{generate_yara_rule, DEFAULT_YARA_PATH};
use fwintel::{OtxClient, OtxConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pulse2yara")]
#[command(version)]
#[command(about = "Export AlienVault OTX pulse indicators to CSV and a YARA rule", long_about = None)]
struct Cli {
    /// Pulse ID (prompted for when omitted)
    #[arg(short, long)]
    pulse_id: Option<String>,

    /// OTX API key
    #[arg(short = 'k', long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: String,

    /// CSV output file
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// YARA output file
    #[arg(long, default_value = DEFAULT_YARA_PATH)]
    yara: PathBuf,

    /// OTX base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn read_pulse_id() -> io::Result<String> {
    print!("Enter the ID of the pulse you want to export: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pulse_id = match cli.pulse_id {
        Some(id) => id,
        None => read_pulse_id()?,
    };

    let config = OtxConfig::new(cli.api_key)
        .with_base_url(cli.base_url)
        .with_timeout(Duration::from_secs(cli.timeout));
    let client = OtxClient::new(config)?;

    // A failed fetch is logged and the run continues with nothing to export
    let indicators = client.pulse_indicators_or_empty(&pulse_id);

    if export_to_csv(&indicators, &cli.csv)? {
        println!("Pulse indicators exported to '{}' successfully.", cli.csv.display());
    } else {
        println!("No indicators to export.");
    }

    if generate_yara_rule(&indicators, &cli.yara)? {
        println!(
            "YARA rule generated and saved to '{}' successfully.",
            cli.yara.display()
        );
    } else {
        println!("No indicators to generate YARA rule.");
    }

    Ok(())
}
