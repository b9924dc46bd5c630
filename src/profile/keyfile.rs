//! Minimal reader for the key-file format used by `.remmina` profiles.
//!
//! Profiles are INI-style: `[group]` headers followed by `key=value` lines.
//! Only the values the applet shows are needed, so this reader keeps the
//! string values of a single section and ignores everything else.

use std::collections::HashMap;

/// Returns the `key=value` pairs of `section`, or `None` if it is absent.
///
/// Comment lines (`#`) and blank lines are skipped. Keys with a locale
/// suffix (`name[de]`) are ignored. When a key repeats, the last value wins.
pub fn read_section(text: &str, section: &str) -> Option<HashMap<String, String>> {
    let mut values = HashMap::new();
    let mut in_section = false;
    let mut found = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = header == section;
            found |= in_section;
            continue;
        }

        if !in_section {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.contains('[') {
            continue;
        }
        values.insert(key.to_string(), unescape(value.trim()));
    }

    found.then_some(values)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
