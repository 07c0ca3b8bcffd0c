//! Parser for `netsh advfirewall firewall show rule` output.
//!
//! The command prints one block per rule:
//!
//! ```text
//! Rule Name:                            Core Networking - DNS (UDP-Out)
//! ----------------------------------------------------------------------
//! Enabled:                              Yes
//! Direction:                            Out
//! Protocol:                             UDP
//! Action:                               Allow
//! ```
//!
//! A `Rule Name:` line opens a new block. Every other non-blank line is read
//! as `Key: Value`, split at the first colon. Lines without a colon (such as
//! the dashed separator) are dropped. Parsing never fails.

use ahash::AHashMap;
use std::io::{BufRead, BufReader, Read};

use super::columns::RULE_NAME;

/// Line prefix that starts a new rule block.
pub const BLOCK_MARKER: &str = "Rule Name:";

/// A single parsed firewall rule.
///
/// Maps field names as printed by `netsh` to their trimmed values. Only the
/// rule name is guaranteed to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRecord {
    fields: AHashMap<String, String>,
}

impl RuleRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// The rule name.
    pub fn name(&self) -> Option<&str> {
        self.get(RULE_NAME)
    }

    /// Check whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Block currently being read.
///
/// The name is read from the marker line before any of the block's fields,
/// so it is held apart from the field accumulator and only merged in when the
/// block is closed.
struct OpenBlock {
    pending_name: String,
    fields: AHashMap<String, String>,
}

impl OpenBlock {
    fn new(name: &str) -> Self {
        Self {
            pending_name: name.trim().to_string(),
            fields: AHashMap::new(),
        }
    }

    fn finish(self) -> RuleRecord {
        let mut fields = self.fields;
        fields.insert(RULE_NAME.to_string(), self.pending_name);
        RuleRecord { fields }
    }
}

/// Parser state: the block being filled and the finished records.
#[derive(Default)]
struct ParseState {
    current: Option<OpenBlock>,
    records: Vec<RuleRecord>,
}

impl ParseState {
    fn feed(&mut self, line: &str) {
        if let Some(name) = line.strip_prefix(BLOCK_MARKER) {
            self.close();
            self.current = Some(OpenBlock::new(name));
            return;
        }

        if line.trim().is_empty() {
            return;
        }

        let Some((key, value)) = line.split_once(':') else {
            return;
        };

        // Fields before the first marker belong to no rule.
        if let Some(block) = self.current.as_mut() {
            block
                .fields
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    fn close(&mut self) {
        if let Some(block) = self.current.take() {
            self.records.push(block.finish());
        }
    }

    fn finish(mut self) -> Vec<RuleRecord> {
        self.close();
        self.records
    }
}

/// Parser for the rule listing printed by `netsh`.
pub struct RuleTextParser;

impl RuleTextParser {
    /// Parse rules from a string.
    pub fn parse(text: &str) -> Vec<RuleRecord> {
        let mut state = ParseState::default();
        for line in text.lines() {
            state.feed(line);
        }
        let records = state.finish();
        log::debug!("Parsed {} firewall rules", records.len());
        records
    }

    /// Parse rules from a reader.
    ///
    /// Reading stops at the first IO or decoding error; records read up to
    /// that point are kept.
    pub fn parse_reader<R: Read>(reader: R) -> Vec<RuleRecord> {
        let mut state = ParseState::default();
        for line in BufReader::new(reader).lines() {
            match line {
                Ok(l) => state.feed(&l),
                Err(e) => {
                    log::warn!("Stopped reading rule listing: {}", e);
                    break;
                }
            }
        }
        state.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RuleRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_no_marker_yields_nothing() {
        assert!(RuleTextParser::parse("").is_empty());
        assert!(RuleTextParser::parse("Direction: In\nProtocol: TCP\n").is_empty());
        assert!(RuleTextParser::parse("garbage line\n\n\n").is_empty());
    }

    #[test]
    fn test_two_blocks() {
        let rules = RuleTextParser::parse("Rule Name: A\nDirection: In\nRule Name: B\n");
        assert_eq!(
            rules,
            vec![
                record(&[("Rule Name", "A"), ("Direction", "In")]),
                record(&[("Rule Name", "B")]),
            ]
        );
    }

    #[test]
    fn test_single_block_fields() {
        let rules = RuleTextParser::parse("Rule Name: X\nProtocol: TCP\nAction: Allow\n");
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.len(), 3);
        assert_eq!(rule.name(), Some("X"));
        assert_eq!(rule.get("Protocol"), Some("TCP"));
        assert_eq!(rule.get("Action"), Some("Allow"));
    }

    #[test]
    fn test_marker_at_eof() {
        let rules = RuleTextParser::parse("Rule Name: Lonely");
        assert_eq!(rules, vec![record(&[("Rule Name", "Lonely")])]);
    }

    #[test]
    fn test_consecutive_markers() {
        let rules = RuleTextParser::parse("Rule Name: A\nRule Name: B\nRule Name: C\n");
        let names: Vec<_> = rules.iter().map(|r| r.name().unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(rules.iter().all(|r| r.len() == 1));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let plain = "Rule Name: A\nDirection: In\nRule Name: B\nAction: Block\n";
        let spaced = "\n\nRule Name: A\n\n   \nDirection: In\n\t\nRule Name: B\n\nAction: Block\n\n";
        assert_eq!(RuleTextParser::parse(plain), RuleTextParser::parse(spaced));
    }

    #[test]
    fn test_line_without_colon() {
        let rules = RuleTextParser::parse(
            "Rule Name: A\ngarbage line\nDirection: In\n------------\nRule Name: B\n",
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], record(&[("Rule Name", "A"), ("Direction", "In")]));
    }

    #[test]
    fn test_split_at_first_colon() {
        let rules = RuleTextParser::parse("Rule Name: Web\nLocalIP:   fe80::1 \n");
        assert_eq!(rules[0].get("LocalIP"), Some("fe80::1"));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let rules = RuleTextParser::parse("Rule Name: A\nInterfaceTypes: Any\n");
        assert_eq!(rules[0].get("InterfaceTypes"), Some("Any"));
    }

    #[test]
    fn test_crlf_input() {
        let rules = RuleTextParser::parse("Rule Name: A\r\nProtocol: UDP\r\n\r\n");
        assert_eq!(rules, vec![record(&[("Rule Name", "A"), ("Protocol", "UDP")])]);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let text = "Rule Name: A\nDirection: In\nRule Name: B\nProtocol: TCP\n";
        assert_eq!(RuleTextParser::parse(text), RuleTextParser::parse(text));
    }

    #[test]
    fn test_parse_reader_matches_parse() {
        let text = "Rule Name: A\nDirection: In\n\nRule Name: B\n";
        assert_eq!(
            RuleTextParser::parse_reader(text.as_bytes()),
            RuleTextParser::parse(text)
        );
    }

    #[test]
    fn test_netsh_listing() {
        let text = "\r\n\
Rule Name:                            Core Networking - DNS (UDP-Out)\r\n\
----------------------------------------------------------------------\r\n\
Enabled:                              Yes\r\n\
Direction:                            Out\r\n\
Profiles:                             Domain,Private,Public\r\n\
Grouping:                             Core Networking\r\n\
LocalIP:                              Any\r\n\
RemoteIP:                             Any\r\n\
Protocol:                             UDP\r\n\
LocalPort:                            Any\r\n\
RemotePort:                           53\r\n\
Edge traversal:                       No\r\n\
Action:                               Allow\r\n\
\r\n\
Rule Name:                            BlockIP\r\n\
----------------------------------------------------------------------\r\n\
Enabled:                              Yes\r\n\
Direction:                            In\r\n\
RemoteIP:                             203.0.113.7/32\r\n\
Action:                               Block\r\n\
Ok.\r\n";

        let rules = RuleTextParser::parse(text);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name(), Some("Core Networking - DNS (UDP-Out)"));
        assert_eq!(rules[0].get("Profiles"), Some("Domain,Private,Public"));
        assert_eq!(rules[0].get("RemotePort"), Some("53"));
        assert_eq!(rules[0].get("Edge traversal"), Some("No"));
        assert_eq!(rules[1].name(), Some("BlockIP"));
        assert_eq!(rules[1].get("RemoteIP"), Some("203.0.113.7/32"));
        assert!(!rules[1].contains("Ok."));
    }
}
