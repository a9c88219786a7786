/*!
Triage decoder for Microsoft Windows crash dump files.

Turns a raw dump buffer (user minidump, "PAGEDU64"-signed kernel dump, or
complete memory dump) into a verified [`CrashData`] record: bug check code
and parameters, recovered driver names, candidate stack frames and raw byte
evidence. All diagnostic fields are read at statically declared offsets and
pass an anti-hallucination filter before they reach the result, so a
downstream consumer is never handed a fabricated code or module name.

The decoder performs no I/O of its own; the caller supplies the buffer and
owns the returned record. Parsing is synchronous, deterministic and free of
shared mutable state, so independent buffers can be decoded from parallel
threads without locking.

# Examples

```
use dumptriage::analyze;

let mut dump = vec![0u8; 0x2000];
dump[..8].copy_from_slice(b"PAGEDU64");
dump[0x38..0x3c].copy_from_slice(&0x0au32.to_le_bytes());

let data = analyze(&dump);
let bug_check = data.bug_check.unwrap();
assert_eq!(bug_check.name, "IRQL_NOT_LESS_OR_EQUAL");
```
*/

pub mod error;
pub use error::{Error, Result};

pub mod format;
pub use format::{detect, DumpFormat};

pub mod native;

pub mod offsets;
pub use offsets::OffsetTable;

pub mod extract;
pub use extract::Architecture;

pub mod bugcheck;
pub use bugcheck::BugCheckRecord;

pub mod scan;
pub use scan::{ModuleName, Provenance};

pub mod stack;
pub use stack::{ModuleRange, StackFrame, MAX_STACK_FRAMES};

pub mod validate;
pub use validate::Validity;

pub mod evidence;

pub mod report;
pub use report::{format_report, CrashData, WindowsVersion};

use dataview::Pod;
use log::{info, warn};

use crate::native::{CoreDumpHeader64, DUMP_SIGNATURE, DUMP_VALID_DUMP64};

/// Upstream size-derived category. Selects UI copy and processing limits in
/// the caller; the decoder classifies by signature and never consults this.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub enum SizeCategory {
    Minidump,
    Kernel,
}

/// Dumps below this byte length categorize as [`SizeCategory::Minidump`].
pub const MINIDUMP_MAX_LEN: usize = 5 * 1024 * 1024;

impl SizeCategory {
    pub fn from_len(len: usize) -> Self {
        if len < MINIDUMP_MAX_LEN {
            SizeCategory::Minidump
        } else {
            SizeCategory::Kernel
        }
    }
}

/// Sanity-checks a full kernel header when the buffer carries one.
/// Purely diagnostic; extraction only trusts the static offset tables.
fn verify_kernel_header(buffer: &[u8]) {
    if buffer.len() < std::mem::size_of::<CoreDumpHeader64>() {
        return;
    }

    let header = Pod::as_data_view(buffer).copy::<CoreDumpHeader64>(0);
    if header.signature != DUMP_SIGNATURE || header.valid_dump != DUMP_VALID_DUMP64 {
        return;
    }

    if extract::Architecture::from_machine_image_type(header.machine_image_type).is_none() {
        warn!(
            "unexpected machine image type 0x{:x} in crash dump header",
            header.machine_image_type
        );
    } else {
        info!("64-bit Microsoft Crash Dump header verified");
    }
}

/// Runs the full decode pipeline over one buffer.
///
/// Never fails: an unrecognized or truncated buffer degrades to an
/// evidence-only record with the format-specific fields absent. Missing data
/// is reported as missing, never substituted.
pub fn analyze(buffer: &[u8]) -> CrashData {
    let format = detect(buffer);

    if format == DumpFormat::Unknown {
        info!("no known dump signature; format-independent extraction only");
    }

    if matches!(format, DumpFormat::KernelPagedu64 | DumpFormat::KernelFull) {
        verify_kernel_header(buffer);
    }

    let fields = OffsetTable::for_format(format)
        .map(|table| extract::extract(buffer, table))
        .unwrap_or_default();

    let architecture = fields.architecture();

    let bug_check = match (fields.bug_check_code, fields.bug_check_parameters) {
        (Some(code), [Some(p1), Some(p2), Some(p3), Some(p4)]) => Some(
            validate::validate_bug_check(BugCheckRecord::new(code, [p1, p2, p3, p4])),
        ),
        (Some(_), _) => {
            // Header ends inside the parameter block. Omitting the record
            // beats padding it with values that were never in the file.
            warn!("bug check parameters truncated; omitting bug check record");
            None
        }
        _ => None,
    };

    let modules = validate::validate_modules(scan::scan_modules(buffer));

    let stack_frames = stack::reconstruct(
        stack::stack_region(format, buffer),
        architecture.unwrap_or(Architecture::X64),
        // No trusted module ranges exist for these formats; frames stay
        // unattributed rather than guessed.
        &[],
    );

    let windows_version = match (fields.major_version, fields.minor_version) {
        (Some(major), Some(minor)) => Some(WindowsVersion { major, minor }),
        _ => None,
    };

    CrashData {
        format,
        bug_check,
        architecture,
        processor_count: fields.number_processors,
        windows_version,
        modules,
        stack_frames,
        hex_dump: evidence::hex_dump(buffer),
        extracted_strings: evidence::extract_strings(buffer),
    }
}

/// [`analyze`] wrapped in a wall-clock deadline check.
///
/// The pipeline itself has no suspension points, so the deadline is enforced
/// around the whole invocation rather than inside it.
pub fn analyze_with_deadline(buffer: &[u8], deadline: std::time::Duration) -> Result<CrashData> {
    let start = std::time::Instant::now();
    let data = analyze(buffer);

    if start.elapsed() > deadline {
        return Err(Error::Deadline);
    }

    Ok(data)
}
