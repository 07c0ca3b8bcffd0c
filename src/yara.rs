//! YARA rule generation from pulse indicators.
//!
//! Each indicator becomes a case-insensitive ASCII text string and the rule
//! fires on any of them. The generated source is checked for structural
//! problems before it is written.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::otx::Indicator;
use crate::{Error, Result};

/// Default YARA output file.
pub const DEFAULT_YARA_PATH: &str = "pulse_indicators.yar";

/// Name of the generated rule.
pub const RULE_NAME: &str = "PulseIndicators";

/// Escape a value for use inside a YARA text string.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\x0d"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Render the rule source for a set of indicators.
///
/// Returns `None` when there are no indicators.
pub fn render_rule(indicators: &[Indicator]) -> Option<String> {
    if indicators.is_empty() {
        return None;
    }

    let mut source = String::new();
    let _ = writeln!(source, "rule {}", RULE_NAME);
    source.push_str("{\n    strings:\n");
    for (i, indicator) in indicators.iter().enumerate() {
        let _ = writeln!(
            source,
            "$s{} = \"{}\" ascii nocase",
            i + 1,
            escape_string(&indicator.indicator)
        );
    }
    source.push_str("    condition:\n        any of them\n}\n");
    Some(source)
}

/// Check a single-rule source for the mistakes generated text can contain.
///
/// Verifies that string literals are closed on their own line, that braces
/// balance outside literals, that string identifiers are unique and that the
/// rule has both a `strings:` and a `condition:` section.
pub fn check_source(source: &str) -> Result<()> {
    let mut depth: i32 = 0;
    let mut identifiers = HashSet::new();

    for (lineno, line) in source.lines().enumerate() {
        let lineno = lineno + 1;
        let mut in_string = false;
        let mut escaped = false;

        for c in line.chars() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(Error::YaraSyntax(format!("line {}: unexpected '}}'", lineno)));
                    }
                }
                _ => {}
            }
        }
        if in_string {
            return Err(Error::YaraSyntax(format!(
                "line {}: unterminated string",
                lineno
            )));
        }

        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('$') {
            let ident: String = rest
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if ident.is_empty() {
                return Err(Error::YaraSyntax(format!(
                    "line {}: empty string identifier",
                    lineno
                )));
            }
            if !identifiers.insert(ident.clone()) {
                return Err(Error::YaraSyntax(format!(
                    "line {}: duplicated string identifier \"${}\"",
                    lineno, ident
                )));
            }
        }
    }

    if depth != 0 {
        return Err(Error::YaraSyntax("unbalanced braces".to_string()));
    }
    if identifiers.is_empty() {
        return Err(Error::YaraSyntax("rule has no strings".to_string()));
    }
    if !source.lines().any(|l| l.trim() == "condition:") {
        return Err(Error::YaraSyntax("rule has no condition".to_string()));
    }
    Ok(())
}

/// Generate the YARA rule for `indicators` and write it to `path`.
///
/// Returns `false` without touching the file when there are no indicators.
pub fn generate_yara_rule(indicators: &[Indicator], path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let Some(source) = render_rule(indicators) else {
        log::warn!("No indicators to generate YARA rule");
        return Ok(false);
    };

    check_source(&source)?;
    fs::write(path, source)?;
    log::info!(
        "Wrote YARA rule with {} strings to {:?}",
        indicators.len(),
        path
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_rule() {
        let indicators = vec![
            Indicator::new("domain", "evil.example"),
            Indicator::new("IPv4", "198.51.100.23"),
        ];
        assert_eq!(
            render_rule(&indicators).unwrap(),
            "rule PulseIndicators\n\
             {\n    strings:\n\
             $s1 = \"evil.example\" ascii nocase\n\
             $s2 = \"198.51.100.23\" ascii nocase\n    condition:\n        any of them\n}\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(render_rule(&[]).is_none());
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("C:\\Windows\\evil.exe"), "C:\\\\Windows\\\\evil.exe");
        assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string("a\nb\tc"), "a\\nb\\tc");
        assert_eq!(escape_string("\u{1}"), "\\x01");
        assert_eq!(escape_string("café"), "café");
    }

    #[test]
    fn test_rendered_source_passes_check() {
        let indicators = vec![
            Indicator::new("URL", "http://x.example/?q=\"}{\""),
            Indicator::new("FilePath", "C:\\Temp\\a.exe"),
            Indicator::new("mutex", "line\nbreak"),
        ];
        let source = render_rule(&indicators).unwrap();
        check_source(&source).unwrap();
    }

    #[test]
    fn test_check_rejects_bad_sources() {
        let unterminated = "rule R\n{\n    strings:\n$s1 = \"abc ascii\n    condition:\n        any of them\n}\n";
        assert!(matches!(check_source(unterminated), Err(Error::YaraSyntax(_))));

        let unbalanced = "rule R\n{\n    strings:\n$s1 = \"abc\"\n    condition:\n        any of them\n";
        assert!(check_source(unbalanced).is_err());

        let duplicated = "rule R\n{\n    strings:\n$s1 = \"a\"\n$s1 = \"b\"\n    condition:\n        any of them\n}\n";
        assert!(check_source(duplicated).is_err());

        let no_strings = "rule R\n{\n    condition:\n        true\n}\n";
        assert!(check_source(no_strings).is_err());
    }

    #[test]
    fn test_generate_yara_rule_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.yar");
        assert!(generate_yara_rule(&[Indicator::new("domain", "evil.example")], &path).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("$s1 = \"evil.example\" ascii nocase"));

        let empty = dir.path().join("empty.yar");
        assert!(!generate_yara_rule(&[], &empty).unwrap());
        assert!(!empty.exists());
    }
}
