/*!
Anti-hallucination validation.

The denylists hold values that the downstream summarizer was observed to
fabricate. A denylisted value is rejected no matter how plausible it looks,
and an invalid value is only ever marked, never replaced: substituting a
"corrected" value would reintroduce the exact failure this stage exists to
prevent.
*/

use crate::bugcheck::{self, BugCheckRecord};
use crate::scan::ModuleName;

/// Bug-check codes known to be fabricated rather than read from a dump.
pub static DENYLISTED_BUG_CHECK_CODES: &[u32] = &[0xdead_beef, 0xdead_dead];

/// Module names known to be fabricated (short garbled filenames that match
/// the driver pattern but exist in no Windows install).
pub static DENYLISTED_MODULE_NAMES: &[&str] = &["wxr.sys", "wrx.sys"];

/// Upper bound of the plausibility band for stop codes that are not in the
/// well-known table.
pub const BUG_CHECK_PLAUSIBLE_MAX: u32 = 0xffff;

/// Validation verdict carried on decoded values.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub enum Validity {
    Valid,
    /// Rejected, with the explicit reason preserved for auditing.
    Invalid(&'static str),
}

impl Validity {
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn reason(self) -> Option<&'static str> {
        match self {
            Validity::Valid => None,
            Validity::Invalid(reason) => Some(reason),
        }
    }
}

pub fn is_denylisted_code(code: u32) -> bool {
    DENYLISTED_BUG_CHECK_CODES.contains(&code)
}

pub fn is_denylisted_module(name: &str) -> bool {
    DENYLISTED_MODULE_NAMES
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(name))
}

/// Judges a stop code. Denylist first, then the plausibility band.
pub fn check_bug_check_code(code: u32) -> Validity {
    if is_denylisted_code(code) {
        return Validity::Invalid("code is on the known-fabricated denylist");
    }

    if code == 0 {
        return Validity::Invalid("bug check code is zero");
    }

    if code > BUG_CHECK_PLAUSIBLE_MAX && !bugcheck::is_known_code(code) {
        return Validity::Invalid("code is outside the plausible range and not a known stop code");
    }

    Validity::Valid
}

/// Marks the validity of a decoded bug check. The record is returned in full
/// either way; callers decide whether to omit or flag it.
pub fn validate_bug_check(mut record: BugCheckRecord) -> BugCheckRecord {
    record.validity = check_bug_check_code(record.code);
    record
}

/// Re-checks a scanned module set. The scanner already drops denylisted
/// names; this is the last line of defense for sets that arrive from
/// elsewhere.
pub fn validate_modules(modules: Vec<ModuleName>) -> Vec<ModuleName> {
    modules
        .into_iter()
        .filter(|module| !is_denylisted_module(&module.name))
        .map(|mut module| {
            module.validated = true;
            module
        })
        .collect()
}
