//! Column layout for exported rule listings.

/// Field holding the rule name.
pub const RULE_NAME: &str = "Rule Name";

/// Export columns, in output order.
///
/// Kept as declared even where `netsh` prints a differently cased key
/// (e.g. some Windows builds print `Edge Traversal`); such columns stay empty.
pub const RULE_COLUMNS: [&str; 13] = [
    RULE_NAME,
    "Description",
    "Enabled",
    "Direction",
    "Profiles",
    "Grouping",
    "LocalIP",
    "RemoteIP",
    "Protocol",
    "LocalPort",
    "RemotePort",
    "Edge traversal",
    "Action",
];
