//! Interactive menu for the firewall tool.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::netsh::{parse_port, CommandRunner, Firewall, Protocol, RemoteAddress};
use crate::Result;

const BANNER: &str = r"            _       _  __
  _ __ ___ (_)_ __ (_)/ _|_      __
 | '_ ` _ \| | '_ \| | |_\ \ /\ / /
 | | | | | | | | | | |  _|\ V  V /
 |_| |_| |_|_|_| |_|_|_|   \_/\_/
                       -yetkin 2024";

const OPTIONS: [&str; 6] = [
    "Allow traffic",
    "Block traffic",
    "Block IP address",
    "Unblock IP address",
    "List current rules",
    "Exit",
];

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    AllowTraffic,
    BlockTraffic,
    BlockIp,
    UnblockIp,
    ListRules,
    Exit,
}

impl Choice {
    /// Parse a numbered menu selection.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Choice::AllowTraffic),
            "2" => Some(Choice::BlockTraffic),
            "3" => Some(Choice::BlockIp),
            "4" => Some(Choice::UnblockIp),
            "5" => Some(Choice::ListRules),
            "6" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Numbered-choice loop driving a [`Firewall`].
pub struct Menu<'a, R: CommandRunner, I: BufRead, O: Write> {
    firewall: &'a Firewall<R>,
    input: I,
    output: O,
    export_path: PathBuf,
}

impl<'a, R: CommandRunner, I: BufRead, O: Write> Menu<'a, R, I, O> {
    pub fn new(firewall: &'a Firewall<R>, input: I, output: O) -> Self {
        Self {
            firewall,
            input,
            output,
            export_path: PathBuf::from(crate::netsh::DEFAULT_EXPORT_PATH),
        }
    }

    /// Set the file rule listings are exported to.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Give back the output sink.
    pub fn into_output(self) -> O {
        self.output
    }

    /// Print `message` and read one line. `None` on end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "{}", BANNER)?;
        for (i, option) in OPTIONS.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, option)?;
        }
        Ok(())
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                writeln!(self.output)?;
                return Ok(());
            };

            let outcome = match Choice::parse(&choice) {
                Some(Choice::Exit) => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                Some(choice) => self.handle(choice),
                None => {
                    writeln!(self.output, "Invalid choice")?;
                    continue;
                }
            };

            match outcome {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => {
                    log::error!("{}", e);
                    writeln!(self.output, "Error: {}", e)?;
                }
            }
        }
    }

    /// Carry out one choice. `Ok(false)` when input ended mid-prompt.
    fn handle(&mut self, choice: Choice) -> Result<bool> {
        match choice {
            Choice::AllowTraffic | Choice::BlockTraffic => {
                let Some(protocol) = self.prompt("Enter protocol (e.g., tcp, udp): ")? else {
                    return Ok(false);
                };
                let protocol: Protocol = protocol.parse()?;
                let Some(port) = self.prompt("Enter port number: ")? else {
                    return Ok(false);
                };
                let port = parse_port(&port)?;

                if choice == Choice::AllowTraffic {
                    self.firewall.allow_traffic(protocol, port)?;
                    writeln!(self.output, "Traffic allowed for protocol {} on port {}", protocol, port)?;
                } else {
                    self.firewall.block_traffic(protocol, port)?;
                    writeln!(self.output, "Traffic blocked for protocol {} on port {}", protocol, port)?;
                }
            }
            Choice::BlockIp => {
                let Some(address) = self.prompt("Enter IP address to block: ")? else {
                    return Ok(false);
                };
                let address: RemoteAddress = address.parse()?;
                self.firewall.block_ip(&address)?;
                writeln!(self.output, "Traffic blocked for IP address {}", address)?;
            }
            Choice::UnblockIp => {
                let Some(address) = self.prompt("Enter IP address to unblock: ")? else {
                    return Ok(false);
                };
                let address: RemoteAddress = address.parse()?;
                self.firewall.unblock_ip(&address)?;
                writeln!(self.output, "Traffic unblocked for IP address {}", address)?;
            }
            Choice::ListRules => {
                writeln!(self.output, "Current firewall rules:")?;
                let count = self.firewall.export_rules(&self.export_path)?;
                writeln!(
                    self.output,
                    "{} firewall rules exported to '{}'",
                    count,
                    self.export_path.display()
                )?;
            }
            Choice::Exit => return Ok(false),
        }
        Ok(true)
    }
}
