//! Environment snapshot and override-file loading.
//!
//! The orchestrator never reads or writes the global process environment
//! after startup. It carries an immutable [`Environment`] instead, and each
//! override file produces a new snapshot layered over the previous one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use crate::config::loader::ConfigError;

/// An immutable set of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are dropped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key`, or the empty string when unset.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// True only for the literal values `true` and `True`.
    ///
    /// `1`, `TRUE`, `yes` and an unset variable are all false.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("true" | "True"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Copy of this environment with one variable set.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Layer the assignments found in `path` over this environment.
    ///
    /// Reads the file the way `source` would leave the environment:
    /// - `export KEY=value` always sets `KEY`
    /// - a bare `KEY=value` only updates a variable that is already set,
    ///   otherwise it stays local to the file (`HISTSIZE`, `color_prompt`)
    /// - `$NAME` and `${NAME}` resolve against this environment, then against
    ///   earlier lines of the file; text in single quotes is left alone
    ///
    /// Lines that are not assignments (functions, aliases, conditionals in a
    /// shell profile) are skipped. A missing file leaves the environment
    /// unchanged.
    pub fn overlay_file(&self, path: &Path) -> Result<Environment, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Environment file not found, skipping");
                return Ok(self.clone());
            }
            Err(e) => {
                return Err(ConfigError::EnvFile {
                    path: path.to_path_buf(),
                    source: dotenvy::Error::Io(e),
                })
            }
        };

        let prepared = PreparedFile::new(&content);
        let mut vars = self.vars.clone();
        let mut locals: HashMap<String, String> = HashMap::new();
        let mut loaded = 0usize;

        for item in dotenvy::from_read_iter(prepared.text.as_bytes()) {
            match item {
                Ok((key, raw)) => {
                    let value = expand(&raw, |name| {
                        vars.get(name)
                            .or_else(|| locals.get(name))
                            .cloned()
                            .or_else(|| std::env::var(name).ok())
                    });
                    if prepared.exported.contains(&key) || vars.contains_key(&key) {
                        locals.remove(&key);
                        vars.insert(key, value);
                        loaded += 1;
                    } else {
                        tracing::trace!(path = %path.display(), key = %key, "Keeping unexported variable local");
                        locals.insert(key, value);
                    }
                }
                Err(dotenvy::Error::LineParse(line, _)) => {
                    tracing::debug!(path = %path.display(), line = %line, "Skipping non-assignment line");
                }
                Err(source) => {
                    return Err(ConfigError::EnvFile {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        tracing::debug!(path = %path.display(), loaded, "Environment file applied");
        Ok(Environment { vars })
    }
}

/// Marks a `$` that should be expanded once the line is parsed.
///
/// Parsing sees the marker as plain text, so its own substitution never runs.
const EXPAND_MARKER: char = '\u{E000}';

/// File content with expandable `$` marked, plus the keys named by `export`.
struct PreparedFile {
    text: String,
    exported: HashSet<String>,
}

impl PreparedFile {
    fn new(content: &str) -> Self {
        let mut text = String::with_capacity(content.len());
        let mut exported = HashSet::new();
        let mut single = false;
        let mut double = false;

        for line in content.split_inclusive('\n') {
            if !single && !double {
                if let Some(rest) = line.trim_start().strip_prefix("export") {
                    if rest.starts_with(char::is_whitespace) {
                        let key: String = rest
                            .trim_start()
                            .chars()
                            .take_while(|c| is_name_char(*c) || *c == '.')
                            .collect();
                        if !key.is_empty() {
                            exported.insert(key);
                        }
                    }
                }
            }

            let mut escaped = false;
            let mut prev = ' ';
            for (index, c) in line.char_indices() {
                if escaped {
                    escaped = false;
                    text.push(c);
                } else if !single && !double && c == '#' && prev.is_whitespace() {
                    text.push_str(&line[index..]);
                    break;
                } else {
                    match c {
                        '\\' if !single => escaped = true,
                        '\'' if !double => single = !single,
                        '"' if !single => double = !double,
                        _ => {}
                    }
                    text.push(if c == '$' && !single { EXPAND_MARKER } else { c });
                }
                prev = c;
            }
        }

        Self { text, exported }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace marked `$NAME`, `${NAME}` and `${NAME:-default}` references.
///
/// Unknown names expand to the empty string, as in the shell.
fn expand(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != EXPAND_MARKER {
            out.push(c);
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            let mut body = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                body.push(c);
            }
            if !closed {
                out.push_str("${");
                out.push_str(&body);
                continue;
            }
            let (name, default) = match body.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (body.as_str(), None),
            };
            match (lookup(name).filter(|v| !v.is_empty()), default) {
                (Some(value), _) => out.push_str(&value),
                (None, Some(default)) => out.push_str(default),
                (None, None) => {}
            }
        } else {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if !is_name_char(c) {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                out.push('$');
            } else if let Some(value) = lookup(&name) {
                out.push_str(&value);
            }
        }
    }

    out
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
