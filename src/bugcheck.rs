/*!
Bug-check code naming.
*/

use crate::validate::Validity;

/// Well-known stop codes, sorted by code for binary search.
///
/// Codes missing here are kept with a generated `UNKNOWN_<hex>` name; a
/// missing human-readable name is not a failure.
static BUG_CHECK_NAMES: &[(u32, &str)] = &[
    (0x0001, "APC_INDEX_MISMATCH"),
    (0x000a, "IRQL_NOT_LESS_OR_EQUAL"),
    (0x0019, "BAD_POOL_HEADER"),
    (0x001a, "MEMORY_MANAGEMENT"),
    (0x001e, "KMODE_EXCEPTION_NOT_HANDLED"),
    (0x0024, "NTFS_FILE_SYSTEM"),
    (0x002e, "DATA_BUS_ERROR"),
    (0x003b, "SYSTEM_SERVICE_EXCEPTION"),
    (0x0050, "PAGE_FAULT_IN_NONPAGED_AREA"),
    (0x007a, "KERNEL_DATA_INPAGE_ERROR"),
    (0x007e, "SYSTEM_THREAD_EXCEPTION_NOT_HANDLED"),
    (0x007f, "UNEXPECTED_KERNEL_MODE_TRAP"),
    (0x009f, "DRIVER_POWER_STATE_FAILURE"),
    (0x00be, "ATTEMPTED_WRITE_TO_READONLY_MEMORY"),
    (0x00c2, "BAD_POOL_CALLER"),
    (0x00c4, "DRIVER_VERIFIER_DETECTED_VIOLATION"),
    (0x00c5, "DRIVER_CORRUPTED_EXPOOL"),
    (0x00d1, "DRIVER_IRQL_NOT_LESS_OR_EQUAL"),
    (0x00ef, "CRITICAL_PROCESS_DIED"),
    (0x00f5, "FLTMGR_FILE_SYSTEM"),
    (0x00fc, "ATTEMPTED_EXECUTE_OF_NOEXECUTE_MEMORY"),
    (0x0116, "VIDEO_TDR_FAILURE"),
    (0x0124, "WHEA_UNCORRECTABLE_ERROR"),
    (0x0133, "DPC_WATCHDOG_VIOLATION"),
    (0x0139, "KERNEL_SECURITY_CHECK_FAILURE"),
    (0x0154, "UNEXPECTED_STORE_EXCEPTION"),
    (0x01ca, "SYNTHETIC_WATCHDOG_TIMEOUT"),
];

/// Looks up the canonical name of a stop code.
pub fn lookup_name(code: u32) -> Option<&'static str> {
    BUG_CHECK_NAMES
        .binary_search_by_key(&code, |&(c, _)| c)
        .ok()
        .map(|idx| BUG_CHECK_NAMES[idx].1)
}

/// Whether a code is in the well-known table.
pub fn is_known_code(code: u32) -> bool {
    lookup_name(code).is_some()
}

/// The decoded bug check: stop code, resolved name and the four parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub struct BugCheckRecord {
    pub code: u32,
    pub name: String,
    pub parameters: [u64; 4],
    /// Set by the validation filter; an invalid record is kept, never
    /// dropped, so callers can audit the rejection reason.
    pub validity: Validity,
}

impl BugCheckRecord {
    /// Builds a record from raw field values. Validation happens separately.
    pub fn new(code: u32, parameters: [u64; 4]) -> Self {
        let name = lookup_name(code)
            .map(str::to_string)
            .unwrap_or_else(|| format!("UNKNOWN_0x{:08X}", code));

        Self {
            code,
            name,
            parameters,
            validity: Validity::Valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_table_is_sorted() {
        for pair in BUG_CHECK_NAMES.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn test_lookup_known() {
        assert_eq!(lookup_name(0xa), Some("IRQL_NOT_LESS_OR_EQUAL"));
        assert_eq!(lookup_name(0xd1), Some("DRIVER_IRQL_NOT_LESS_OR_EQUAL"));
        assert_eq!(lookup_name(0x133), Some("DPC_WATCHDOG_VIOLATION"));
    }

    #[test]
    fn test_unknown_code_keeps_value() {
        let record = BugCheckRecord::new(0xbeef, [0, 0, 0, 0]);
        assert_eq!(record.code, 0xbeef);
        assert_eq!(record.name, "UNKNOWN_0x0000BEEF");
    }
}
