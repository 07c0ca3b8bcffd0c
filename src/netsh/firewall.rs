//! Firewall operations on top of `netsh`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::columns::RULE_COLUMNS;
use super::command::{Action, Direction, NetshCommand, Protocol, RemoteAddress};
use super::parser::{RuleRecord, RuleTextParser};
use super::runner::{CommandOutput, CommandRunner, SystemRunner};
use crate::csv::DictWriter;
use crate::{Error, Result};

/// Message `netsh` prints when a rule filter matches nothing.
pub const NO_RULES_MATCH: &str = "No rules match the specified criteria";

/// Default export file for rule listings.
pub const DEFAULT_EXPORT_PATH: &str = "firewall_rules.csv";

/// Windows Firewall managed through `netsh`.
///
/// Every mutating operation issues an inbound command followed by an
/// outbound one. The outbound command runs even when the inbound one fails.
pub struct Firewall<R: CommandRunner = SystemRunner> {
    runner: R,
}

impl Firewall<SystemRunner> {
    /// Create a firewall that runs the real `netsh`.
    pub fn system() -> Self {
        Self::new(SystemRunner)
    }
}

impl<R: CommandRunner> Firewall<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Access the underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn execute(&self, command: &NetshCommand) -> Result<CommandOutput> {
        log::debug!("{}", command);
        self.runner.run(command.program(), command.args())
    }

    /// Run the command for each direction, inbound first.
    ///
    /// Both commands are always issued; the first error is returned after
    /// the second has run.
    fn both_directions<F>(&self, build: F) -> Result<()>
    where
        F: Fn(Direction) -> NetshCommand,
    {
        let mut first_error = None;
        for direction in Direction::BOTH {
            if let Err(e) = self.execute(&build(direction)) {
                log::warn!("{} rule command failed: {}", direction, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn port_rule(&self, protocol: Protocol, port: u16, action: Action) -> Result<()> {
        self.both_directions(|direction| {
            NetshCommand::add_port_rule(protocol, port, direction, action)
        })?;
        log::info!("{} {} traffic on port {}", action, protocol, port);
        Ok(())
    }

    /// Allow traffic for a protocol and local port in both directions.
    pub fn allow_traffic(&self, protocol: Protocol, port: u16) -> Result<()> {
        self.port_rule(protocol, port, Action::Allow)
    }

    /// Block traffic for a protocol and local port in both directions.
    pub fn block_traffic(&self, protocol: Protocol, port: u16) -> Result<()> {
        self.port_rule(protocol, port, Action::Block)
    }

    /// Block a remote address in both directions.
    pub fn block_ip(&self, address: &RemoteAddress) -> Result<()> {
        self.both_directions(|direction| NetshCommand::block_address(address, direction))?;
        log::info!("Blocked {}", address);
        Ok(())
    }

    /// Remove the block rules for a remote address.
    pub fn unblock_ip(&self, address: &RemoteAddress) -> Result<()> {
        self.both_directions(|direction| NetshCommand::unblock_address(address, direction))?;
        log::info!("Unblocked {}", address);
        Ok(())
    }

    /// List all configured rules.
    ///
    /// `netsh` exits non-zero when no rule exists at all; that is reported
    /// as an empty list.
    pub fn list_rules(&self) -> Result<Vec<RuleRecord>> {
        match self.execute(&NetshCommand::show_all()) {
            Ok(output) => Ok(RuleTextParser::parse(&output.stdout)),
            Err(Error::CommandFailed { ref message, .. }) if message.contains(NO_RULES_MATCH) => {
                log::debug!("netsh reported no rules");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Write all configured rules to a CSV file.
    ///
    /// Returns the number of rules written.
    pub fn export_rules(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let rules = self.list_rules()?;
        let file = File::create(path)?;
        write_rules_csv(BufWriter::new(file), &rules)?;
        log::info!("Exported {} rules to {:?}", rules.len(), path);
        Ok(rules.len())
    }
}

/// Write rule records as CSV under the standard export columns.
pub fn write_rules_csv<W: Write>(out: W, rules: &[RuleRecord]) -> Result<W> {
    let mut writer = DictWriter::new(out, &RULE_COLUMNS);
    writer.write_header()?;
    for rule in rules {
        writer.write_record(rule)?;
    }
    writer.into_inner()
}
