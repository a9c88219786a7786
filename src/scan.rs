/*!
Heuristic module/driver name recovery.

The scanner has no trusted module index to work from; it recovers names from
raw byte content by pattern. Its contract is narrow: every returned name
matches the driver filename pattern and none is on the denylist. Finding
every real module is best-effort only.
*/

use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::validate;

/// Scanning is bounded to the leading part of the buffer to bound cost on
/// complete dumps.
pub const SCAN_PREFIX_LEN: usize = 16 * 1024 * 1024;

static MODULE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    // (?-u) keeps the match byte-oriented; names are plain ASCII.
    Regex::new(r"(?i-u)[A-Z0-9_-]+\.(sys|dll|exe)").unwrap()
});

/// Where a module name came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub enum Provenance {
    /// Recovered by the byte scanner.
    Scan,
    /// No recorded origin.
    None,
}

/// A driver/module filename recovered from the dump.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub struct ModuleName {
    pub name: String,
    pub provenance: Provenance,
    /// True once the anti-hallucination filter has passed the name.
    pub validated: bool,
}

impl ModuleName {
    pub fn new(name: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            name: name.into(),
            provenance,
            validated: false,
        }
    }
}

/// Scans the buffer prefix for filename-like tokens.
///
/// Non-printable bytes split tokens naturally since the pattern only matches
/// printable characters. The result set is de-duplicated case-insensitively
/// with first-seen order preserved, and denylisted names are dropped before
/// returning.
pub fn scan_modules(buffer: &[u8]) -> Vec<ModuleName> {
    let prefix = &buffer[..buffer.len().min(SCAN_PREFIX_LEN)];

    let mut seen = HashSet::new();
    let mut modules = Vec::new();

    for found in MODULE_NAME_RE.find_iter(prefix) {
        // The pattern only matches ASCII bytes, so this cannot fail.
        let name = match std::str::from_utf8(found.as_bytes()) {
            Ok(name) => name,
            Err(_) => continue,
        };

        if !seen.insert(name.to_ascii_lowercase()) {
            continue;
        }

        if validate::is_denylisted_module(name) {
            debug!("dropping denylisted module name candidate: {}", name);
            continue;
        }

        modules.push(ModuleName::new(name, Provenance::Scan));
    }

    debug!("module scan recovered {} candidate names", modules.len());
    modules
}
