//! Startup parameter store.
//!
//! Raw process arguments in the order they were received. No flag grammar is
//! enforced: lookups work on exact strings and `key=value` pairs.

use std::collections::BTreeSet;

/// Parameters that only make sense to the instance that was launched first.
///
/// They are dropped when a command line is rebuilt for a subsequent instance.
pub const DEFAULT_FIRST_INSTANCE_ONLY: &[&str] = &["--restart", "--unclean-restart"];

/// Which parameters a rebuilt command line carries for non-first instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstInstancePolicy {
    first_only: BTreeSet<String>,
}

impl Default for FirstInstancePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FIRST_INSTANCE_ONLY.iter().copied())
    }
}

impl FirstInstancePolicy {
    /// Build a policy from parameter keys. `--foo` also matches `--foo=bar`.
    pub fn new<I, S>(first_only: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            first_only: first_only.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that keeps every parameter for every instance.
    pub fn keep_all() -> Self {
        Self {
            first_only: BTreeSet::new(),
        }
    }

    pub fn is_first_instance_only(&self, param: &str) -> bool {
        self.first_only.contains(param_key(param))
    }
}

/// Ordered, append-only collection of startup parameters.
///
/// Appends need `&mut self`; callers sharing the store across threads
/// serialize writes themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupParams {
    params: Vec<String>,
}

impl StartupParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a raw parameter. Duplicates are kept.
    pub fn add(&mut self, param: impl Into<String>) {
        self.params.push(param.into());
    }

    /// Exact-match membership test.
    pub fn has(&self, param: &str) -> bool {
        self.params.iter().any(|p| p == param)
    }

    /// Value of the first `key=value` or bare `key` entry, in insertion order.
    ///
    /// A bare `key` yields `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.iter().find_map(|p| match p.split_once('=') {
            Some((k, v)) if k == key => Some(v),
            None if p == key => Some(""),
            _ => None,
        })
    }

    /// Rebuild a single command line string for re-exec or IPC.
    ///
    /// When `is_first` is false, parameters the policy marks as first-instance
    /// only are left out. Parameters containing whitespace or quotes are
    /// double-quoted.
    pub fn to_command_line(&self, is_first: bool, policy: &FirstInstancePolicy) -> String {
        self.params
            .iter()
            .filter(|p| is_first || !policy.is_first_instance_only(p))
            .map(|p| quote(p))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

fn param_key(param: &str) -> &str {
    param.split_once('=').map_or(param, |(k, _)| k)
}

fn quote(param: &str) -> String {
    if param.is_empty() || param.contains(|c: char| c.is_whitespace() || c == '"') {
        format!("\"{}\"", param.replace('"', "\\\""))
    } else {
        param.to_string()
    }
}
