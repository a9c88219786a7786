/*!
The terminal result record and its textual presentation.
*/

use std::fmt::Write as _;

use crate::bugcheck::BugCheckRecord;
use crate::extract::Architecture;
use crate::format::DumpFormat;
use crate::scan::ModuleName;
use crate::stack::StackFrame;

/// NT version pair from the dump header (major, build number).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub struct WindowsVersion {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for WindowsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NT {}.{}", self.major, self.minor)
    }
}

/// Everything recovered from one parse call. Assembled once, immutable
/// afterwards, owned solely by the caller.
///
/// Format-specific fields are `None` when the format is unknown or the field
/// could not be read; the scanner and evidence fields are format-independent
/// and always populated.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub struct CrashData {
    pub format: DumpFormat,
    pub bug_check: Option<BugCheckRecord>,
    pub architecture: Option<Architecture>,
    pub processor_count: Option<u32>,
    pub windows_version: Option<WindowsVersion>,
    pub modules: Vec<ModuleName>,
    pub stack_frames: Vec<StackFrame>,
    pub hex_dump: String,
    pub extracted_strings: String,
}

/// Renders a deterministic plain-text report with fixed section headers.
/// Purely a presentation transform; no additional inference happens here.
pub fn format_report(data: &CrashData) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== SYSTEM ==");
    let _ = writeln!(out, "format: {}", data.format.as_str());
    if let Some(arch) = data.architecture {
        let _ = writeln!(out, "architecture: {}", arch.as_str());
    }
    if let Some(count) = data.processor_count {
        let _ = writeln!(out, "processors: {}", count);
    }
    if let Some(version) = data.windows_version {
        let _ = writeln!(out, "windows version: {}", version);
    }

    let _ = writeln!(out, "\n== BUG CHECK ==");
    match &data.bug_check {
        Some(record) if record.validity.is_valid() => {
            let _ = writeln!(out, "code: 0x{:08X}", record.code);
            let _ = writeln!(out, "name: {}", record.name);
        }
        Some(record) => {
            // A rejected value is shown with its reason, never as a finding.
            let _ = writeln!(
                out,
                "status: REJECTED ({})",
                record.validity.reason().unwrap_or("invalid")
            );
            let _ = writeln!(out, "raw value: 0x{:08X} (unverified, do not report)", record.code);
        }
        None => {
            let _ = writeln!(out, "not present in this dump format");
        }
    }

    let _ = writeln!(out, "\n== PARAMETERS ==");
    match &data.bug_check {
        Some(record) => {
            for (i, param) in record.parameters.iter().enumerate() {
                let _ = writeln!(out, "parameter{}: 0x{:016X}", i + 1, param);
            }
        }
        None => {
            let _ = writeln!(out, "not present");
        }
    }

    let _ = writeln!(out, "\n== DRIVERS ==");
    if data.modules.is_empty() {
        let _ = writeln!(out, "none recovered");
    }
    for module in &data.modules {
        let _ = writeln!(out, "{}", module.name);
    }

    let _ = writeln!(out, "\n== STACK TRACE ==");
    if data.stack_frames.is_empty() {
        let _ = writeln!(out, "no frames recovered");
    }
    for (i, frame) in data.stack_frames.iter().enumerate() {
        match &frame.module {
            Some(module) => {
                let _ = writeln!(out, "#{:02} 0x{:016X} {}", i, frame.address, module);
            }
            None => {
                let _ = writeln!(out, "#{:02} 0x{:016X}", i, frame.address);
            }
        }
    }

    let _ = writeln!(out, "\n== EVIDENCE ==");
    out.push_str(&data.hex_dump);

    out
}
