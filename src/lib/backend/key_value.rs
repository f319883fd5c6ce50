// SPDX-License-Identifier: Apache-2.0

/// Shell style `KEY=value` file used by `ifcfg-*`, `/etc/sysconfig/network`
/// and `/etc/default/networking`. Lines which are not assignments are kept
/// verbatim so rewriting never loses comments or unmanaged keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct KeyValueFile {
    lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Pair {
        /// Assignment written as `export KEY=value`.
        export: bool,
        key: String,
        value: String,
        /// Original text, dropped once the value is changed.
        raw: Option<String>,
    },
    Other(String),
}

impl KeyValueFile {
    pub(crate) fn parse(content: &str) -> Self {
        let lines = content
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.starts_with('#') {
                    return Line::Other(line.to_string());
                }
                let (export, assignment) = match trimmed.strip_prefix("export ")
                {
                    Some(rest) => (true, rest.trim_start()),
                    None => (false, trimmed),
                };
                match assignment.split_once('=') {
                    Some((key, value)) if is_valid_key(key) => Line::Pair {
                        export,
                        key: key.to_string(),
                        value: unquote(value.trim()),
                        raw: Some(line.to_string()),
                    },
                    _ => Line::Other(line.to_string()),
                }
            })
            .collect();
        Self { lines }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        // Shell semantics: last assignment wins
        self.lines.iter().rev().find_map(|l| match l {
            Line::Pair { key: k, value, .. } if k == key => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            Line::Pair { key, .. } => Some(key.as_str()),
            Line::Other(_) => None,
        })
    }

    /// Update the first assignment of `key` in place (dropping later
    /// duplicates) or append it. `None` removes every assignment.
    pub(crate) fn set(&mut self, key: &str, value: Option<&str>) {
        let mut found = false;
        let mut new_lines = Vec::with_capacity(self.lines.len() + 1);
        for line in self.lines.drain(..) {
            match line {
                Line::Pair {
                    export,
                    key: k,
                    value: old_value,
                    raw,
                } if k == key => {
                    if let (false, Some(value)) = (found, value) {
                        let raw = raw.filter(|_| old_value == value);
                        new_lines.push(Line::Pair {
                            export,
                            key: k,
                            value: value.to_string(),
                            raw,
                        });
                    }
                    found = true;
                }
                line => new_lines.push(line),
            }
        }
        if let (false, Some(value)) = (found, value) {
            new_lines.push(Line::Pair {
                export: false,
                key: key.to_string(),
                value: value.to_string(),
                raw: None,
            });
        }
        self.lines = new_lines;
    }

    pub(crate) fn to_content(&self) -> String {
        let mut ret = String::new();
        for line in &self.lines {
            match line {
                Line::Pair { raw: Some(raw), .. } => ret.push_str(raw),
                Line::Pair {
                    export, key, value, ..
                } => {
                    if *export {
                        ret.push_str("export ");
                    }
                    ret.push_str(key);
                    ret.push('=');
                    ret.push_str(&quote(value));
                }
                Line::Other(s) => ret.push_str(s),
            }
            ret.push('\n');
        }
        ret
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !key.starts_with(|c: char| c.is_ascii_digit())
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let mut ret = String::new();
        let mut chars = value[1..value.len() - 1].chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    ret.push(escaped);
                }
            } else {
                ret.push(c);
            }
        }
        return ret;
    }
    value.to_string()
}

fn quote(value: &str) -> String {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || "\"'$`\\;&|<>()#".contains(c))
    {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Shell style boolean as used by `ONBOOT`, `NETWORKING` and
/// `CONFIGURE_INTERFACES`.
pub(crate) fn parse_yes_no(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "1" => Some(true),
        "no" | "n" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
