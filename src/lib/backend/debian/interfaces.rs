// SPDX-License-Identifier: Apache-2.0

use crate::{ErrorKind, NetconvError};

pub(crate) const FAMILY_INET: &str = "inet";

const AUTO_KEYWORDS: [&str; 2] = ["auto", "allow-auto"];

/// Structured form of `/etc/network/interfaces`.
///
/// The file is parsed once into an ordered list of blocks, modified in
/// place and serialized again. Content this crate does not manage
/// (comments, `source`, `mapping`, `allow-hotplug` and stanzas of other
/// interfaces) is kept untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct InterfacesFile {
    blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Auto { keyword: String, names: Vec<String> },
    Iface(IfaceStanza),
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IfaceStanza {
    pub(crate) name: String,
    pub(crate) family: String,
    pub(crate) method: String,
    /// Indented option lines, trimmed. Comment and blank lines found between
    /// options are kept here untrimmed and never match an option key.
    pub(crate) options: Vec<String>,
}

impl IfaceStanza {
    pub(crate) fn new(name: &str, method: &str) -> Self {
        Self {
            name: name.to_string(),
            family: FAMILY_INET.to_string(),
            method: method.to_string(),
            options: Vec::new(),
        }
    }

    /// Value of the first option named `key`. Both `-` and `_` spellings
    /// are accepted as ifupdown does.
    pub(crate) fn option(&self, key: &str) -> Option<&str> {
        self.options.iter().filter(|opt| is_option_line(opt)).find_map(|opt| {
            let (k, v) = split_option(opt);
            if same_option_key(k, key) {
                Some(v)
            } else {
                None
            }
        })
    }

    pub(crate) fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }

    pub(crate) fn push_option(&mut self, key: &str, value: &str) {
        self.options.push(format!("{key} {value}"));
    }

    /// Options whose key is not in `managed_keys`.
    pub(crate) fn unmanaged_options<'a>(
        &'a self,
        managed_keys: &'a [&str],
    ) -> impl Iterator<Item = &'a String> + 'a {
        self.options.iter().filter(move |opt| {
            let (k, _) = split_option(opt);
            !managed_keys.iter().any(|m| same_option_key(k, m))
        })
    }
}

fn is_option_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

fn split_option(opt: &str) -> (&str, &str) {
    match opt.split_once(char::is_whitespace) {
        Some((k, v)) => (k, v.trim()),
        None => (opt, ""),
    }
}

fn same_option_key(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            x == y || (matches!(x, '-' | '_') && matches!(y, '-' | '_'))
        })
}

impl InterfacesFile {
    pub(crate) fn parse(content: &str) -> Result<Self, NetconvError> {
        let mut blocks: Vec<Block> = Vec::new();
        let mut cur_stanza: Option<IfaceStanza> = None;
        // Comment and blank lines seen inside a stanza. They belong to the
        // stanza only when more options follow them.
        let mut pending: Vec<String> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            let indented = line.starts_with(char::is_whitespace);

            if let Some(stanza) = cur_stanza.as_mut() {
                if !is_option_line(line) {
                    pending.push(line.to_string());
                    continue;
                }
                if indented {
                    stanza.options.append(&mut pending);
                    stanza.options.push(trimmed.to_string());
                    continue;
                }
            }
            if let Some(stanza) = cur_stanza.take() {
                blocks.push(Block::Iface(stanza));
            }
            blocks.extend(pending.drain(..).map(Block::Verbatim));

            let mut words = trimmed.split_whitespace();
            match words.next() {
                Some(keyword) if AUTO_KEYWORDS.contains(&keyword) => {
                    blocks.push(Block::Auto {
                        keyword: keyword.to_string(),
                        names: words.map(str::to_string).collect(),
                    });
                }
                Some("iface") => {
                    let fields: Vec<&str> = words.collect();
                    if fields.len() != 3 {
                        return Err(NetconvError::new(
                            ErrorKind::ReadError,
                            format!(
                                "Line {}: malformed iface stanza `{trimmed}`, \
                                 expecting `iface <name> <family> <method>`",
                                index + 1
                            ),
                        ));
                    }
                    cur_stanza = Some(IfaceStanza {
                        name: fields[0].to_string(),
                        family: fields[1].to_string(),
                        method: fields[2].to_string(),
                        options: Vec::new(),
                    });
                }
                _ => blocks.push(Block::Verbatim(line.to_string())),
            }
        }
        if let Some(stanza) = cur_stanza.take() {
            blocks.push(Block::Iface(stanza));
        }
        blocks.extend(pending.drain(..).map(Block::Verbatim));
        Ok(Self { blocks })
    }

    pub(crate) fn to_content(&self) -> String {
        let mut ret = String::new();
        for block in &self.blocks {
            match block {
                Block::Auto { keyword, names } => {
                    ret.push_str(&format!("{keyword} {}\n", names.join(" ")));
                }
                Block::Iface(stanza) => {
                    ret.push_str(&format!(
                        "iface {} {} {}\n",
                        stanza.name, stanza.family, stanza.method
                    ));
                    for opt in &stanza.options {
                        if is_option_line(opt) {
                            ret.push_str(&format!("    {opt}\n"));
                        } else {
                            ret.push_str(opt);
                            ret.push('\n');
                        }
                    }
                }
                Block::Verbatim(line) => {
                    ret.push_str(line);
                    ret.push('\n');
                }
            }
        }
        ret
    }

    pub(crate) fn stanza(&self, name: &str, family: &str) -> Option<&IfaceStanza> {
        self.blocks.iter().find_map(|b| match b {
            Block::Iface(s) if s.name == name && s.family == family => Some(s),
            _ => None,
        })
    }

    pub(crate) fn is_auto(&self, name: &str) -> bool {
        self.blocks.iter().any(|b| match b {
            Block::Auto { names, .. } => names.iter().any(|n| n == name),
            _ => false,
        })
    }

    /// Insert or replace the stanza of the same name and family, marking it
    /// `auto` when `auto` is true.
    pub(crate) fn set_stanza(&mut self, stanza: IfaceStanza, auto: bool) {
        let name = stanza.name.clone();
        self.remove_auto(&name);

        let existing = self.blocks.iter().position(|b| {
            matches!(
                b,
                Block::Iface(s) if s.name == stanza.name
                    && s.family == stanza.family
            )
        });
        let index = match existing {
            Some(index) => {
                self.blocks[index] = Block::Iface(stanza);
                index
            }
            None => {
                let needs_separator = match self.blocks.last() {
                    None => false,
                    Some(Block::Verbatim(line)) => !line.trim().is_empty(),
                    Some(_) => true,
                };
                if needs_separator {
                    self.blocks.push(Block::Verbatim(String::new()));
                }
                self.blocks.push(Block::Iface(stanza));
                self.blocks.len() - 1
            }
        };
        if auto {
            self.blocks.insert(
                index,
                Block::Auto {
                    keyword: AUTO_KEYWORDS[0].to_string(),
                    names: vec![name],
                },
            );
        }
    }

    fn remove_auto(&mut self, name: &str) {
        for block in self.blocks.iter_mut() {
            if let Block::Auto { names, .. } = block {
                names.retain(|n| n != name);
            }
        }
        self.blocks
            .retain(|b| !matches!(b, Block::Auto { names, .. } if names.is_empty()));
    }
}
