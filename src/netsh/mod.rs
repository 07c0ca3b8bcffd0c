//! Windows Firewall management through `netsh advfirewall`.

pub mod columns;
pub mod command;
pub mod firewall;
pub mod parser;
pub mod runner;

pub use columns::{RULE_COLUMNS, RULE_NAME};
pub use command::{parse_port, Action, Direction, NetshCommand, Protocol, RemoteAddress};
pub use firewall::{write_rules_csv, Firewall, DEFAULT_EXPORT_PATH, NO_RULES_MATCH};
pub use parser::{RuleRecord, RuleTextParser, BLOCK_MARKER};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
#[doc(hidden)]
pub use runner::RecordingRunner;
