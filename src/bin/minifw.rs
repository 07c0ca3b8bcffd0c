//! minifw: manage Windows Firewall rules through netsh.

use clap::{Parser, Subcommand};
use fwintel::menu::Menu;
use fwintel::netsh::{parse_port, DEFAULT_EXPORT_PATH};
use fwintel::{Firewall, Protocol, RemoteAddress};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minifw")]
#[command(version)]
#[command(about = "Manage Windows Firewall rules via netsh", long_about = None)]
struct Cli {
    /// File used by the interactive "List current rules" option
    #[arg(long, global = true, default_value = DEFAULT_EXPORT_PATH)]
    output: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Allow traffic on a local port (inbound and outbound)
    Allow {
        /// Protocol (tcp, udp)
        #[arg(short, long)]
        protocol: String,

        /// Local port number
        #[arg(long)]
        port: String,
    },

    /// Block traffic on a local port (inbound and outbound)
    Block {
        /// Protocol (tcp, udp)
        #[arg(short, long)]
        protocol: String,

        /// Local port number
        #[arg(long)]
        port: String,
    },

    /// Block a remote IP address or network
    BlockIp {
        /// IP address or CIDR network
        address: String,
    },

    /// Remove the block for a remote IP address or network
    UnblockIp {
        /// IP address or CIDR network
        address: String,
    },

    /// Export current rules to CSV
    List,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let firewall = Firewall::system();

    let Some(command) = cli.command else {
        let stdin = io::stdin();
        let mut menu = Menu::new(&firewall, stdin.lock(), io::stdout()).with_export_path(cli.output);
        menu.run()?;
        return Ok(());
    };

    match command {
        Commands::Allow { protocol, port } => {
            let protocol: Protocol = protocol.parse()?;
            let port = parse_port(&port)?;
            firewall.allow_traffic(protocol, port)?;
            println!("Traffic allowed for protocol {} on port {}", protocol, port);
        }
        Commands::Block { protocol, port } => {
            let protocol: Protocol = protocol.parse()?;
            let port = parse_port(&port)?;
            firewall.block_traffic(protocol, port)?;
            println!("Traffic blocked for protocol {} on port {}", protocol, port);
        }
        Commands::BlockIp { address } => {
            let address: RemoteAddress = address.parse()?;
            firewall.block_ip(&address)?;
            println!("Traffic blocked for IP address {}", address);
        }
        Commands::UnblockIp { address } => {
            let address: RemoteAddress = address.parse()?;
            firewall.unblock_ip(&address)?;
            println!("Traffic unblocked for IP address {}", address);
        }
        Commands::List => {
            let count = firewall.export_rules(&cli.output)?;
            println!(
                "{} firewall rules exported to '{}'",
                count,
                cli.output.display()
            );
        }
    }

    Ok(())
}
