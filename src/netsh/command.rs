//! Typed builders for `netsh advfirewall firewall` invocations.

use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

use crate::{Error, Result};

/// Program used for all firewall commands.
pub const NETSH: &str = "netsh";

/// Rule name used for port allow rules.
pub const ALLOW_TRAFFIC_RULE: &str = "AllowTraffic";
/// Rule name used for port block rules.
pub const BLOCK_TRAFFIC_RULE: &str = "BlockTraffic";
/// Rule name used for address block rules.
pub const BLOCK_IP_RULE: &str = "BlockIP";

/// Transport protocol of a port rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    IcmpV4,
    IcmpV6,
    Any,
}

impl Protocol {
    /// Get the name `netsh` expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::IcmpV4 => "icmpv4",
            Protocol::IcmpV6 => "icmpv6",
            Protocol::Any => "any",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "icmpv4" => Ok(Protocol::IcmpV4),
            "icmpv6" => Ok(Protocol::IcmpV6),
            "any" => Ok(Protocol::Any),
            _ => Err(Error::InvalidProtocol(s.to_string())),
        }
    }
}

/// Traffic direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Both directions, inbound first.
    pub const BOTH: [Direction; 2] = [Direction::In, Direction::Out];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Allow,
    Block,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Block => "block",
        }
    }

    /// Rule name used for port rules with this action.
    pub fn port_rule_name(&self) -> &'static str {
        match self {
            Action::Allow => ALLOW_TRAFFIC_RULE,
            Action::Block => BLOCK_TRAFFIC_RULE,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a local port number. Port 0 is rejected.
pub fn parse_port(s: &str) -> Result<u16> {
    match s.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(Error::InvalidPort(s.trim().to_string())),
        Ok(port) => Ok(port),
    }
}

/// A remote address: a single IP or a CIDR network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteAddress {
    Ip(IpAddr),
    Net(IpNet),
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteAddress::Ip(ip) => write!(f, "{}", ip),
            RemoteAddress::Net(net) => write!(f, "{}", net),
        }
    }
}

impl std::str::FromStr for RemoteAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(RemoteAddress::Ip(ip));
        }
        s.parse::<IpNet>()
            .map(RemoteAddress::Net)
            .map_err(|_| Error::InvalidAddress(s.to_string()))
    }
}

/// A single `netsh` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetshCommand {
    args: Vec<String>,
}

impl NetshCommand {
    fn firewall(verb: &str) -> Self {
        Self {
            args: vec![
                "advfirewall".to_string(),
                "firewall".to_string(),
                verb.to_string(),
                "rule".to_string(),
            ],
        }
    }

    fn arg(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("{}={}", key, value));
        self
    }

    /// `add rule` for a local port.
    pub fn add_port_rule(protocol: Protocol, port: u16, direction: Direction, action: Action) -> Self {
        Self::firewall("add")
            .arg("name", action.port_rule_name())
            .arg("protocol", protocol)
            .arg("dir", direction)
            .arg("localport", port)
            .arg("action", action)
    }

    /// `add rule` blocking a remote address.
    pub fn block_address(address: &RemoteAddress, direction: Direction) -> Self {
        Self::firewall("add")
            .arg("name", BLOCK_IP_RULE)
            .arg("dir", direction)
            .arg("action", Action::Block)
            .arg("remoteip", address)
    }

    /// `delete rule` removing an address block.
    pub fn unblock_address(address: &RemoteAddress, direction: Direction) -> Self {
        Self::firewall("delete")
            .arg("name", BLOCK_IP_RULE)
            .arg("dir", direction)
            .arg("remoteip", address)
    }

    /// `show rule name=all`.
    pub fn show_all() -> Self {
        Self::firewall("show").arg("name", "all")
    }

    /// Program to run.
    pub fn program(&self) -> &'static str {
        NETSH
    }

    /// Arguments, without the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for NetshCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", NETSH, self.args.join(" "))
    }
}
