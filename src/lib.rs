//! fwintel - Windows Firewall rule management and OTX threat-intel export.
//!
//! This crate backs two small command-line tools:
//!
//! - **minifw**: adds and removes Windows Firewall rules through
//!   `netsh advfirewall firewall`, and exports the configured rules to CSV.
//! - **pulse2yara**: fetches the indicators of an AlienVault OTX pulse and
//!   writes them to a CSV file and a YARA rule file.
//!
//! # Parsing rule listings
//!
//! `netsh advfirewall firewall show rule name=all` prints one `Key: Value`
//! block per rule. [`RuleTextParser`] turns that text into [`RuleRecord`]s:
//!
//! ```
//! use fwintel::RuleTextParser;
//!
//! let rules = RuleTextParser::parse("Rule Name: A\nDirection: In\nRule Name: B\n");
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules[0].get("Direction"), Some("In"));
//! assert_eq!(rules[1].name(), Some("B"));
//! ```
//!
//! # Managing rules
//!
//! ```ignore
//! use fwintel::{Firewall, Protocol};
//!
//! let firewall = Firewall::system();
//! firewall.block_traffic(Protocol::Tcp, 445)?;
//! firewall.export_rules("firewall_rules.csv")?;
//! ```
//!
//! # Exporting a pulse
//!
//! ```ignore
//! use fwintel::otx::{export_to_csv, OtxClient, OtxConfig};
//! use fwintel::yara::generate_yara_rule;
//!
//! let client = OtxClient::new(OtxConfig::new(api_key))?;
//! let indicators = client.pulse_indicators("5f1a2b3c4d5e6f7a8b9c0d1e")?;
//! export_to_csv(&indicators, "pulse_indicators.csv")?;
//! generate_yara_rule(&indicators, "pulse_indicators.yar")?;
//! ```

mod error;

pub mod csv;
pub mod menu;
pub mod netsh;
pub mod otx;
pub mod yara;

// Re-export core types
pub use error::{Error, Result};

pub use netsh::{
    Action, Direction, Firewall, Protocol, RemoteAddress, RuleRecord, RuleTextParser, RULE_COLUMNS,
};
pub use otx::{Indicator, OtxClient, OtxConfig};
