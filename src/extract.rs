/*!
Typed field extraction at table-declared offsets.
*/

use log::warn;

use crate::error::{Error, Result};
use crate::native::{IMAGE_FILE_MACHINE_AMD64, IMAGE_FILE_MACHINE_I386};
use crate::offsets::{FieldSpec, FieldWidth, OffsetTable};

/// Processor architecture recovered from the machine image type field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    pub fn from_machine_image_type(machine: u32) -> Option<Self> {
        match machine {
            IMAGE_FILE_MACHINE_I386 => Some(Architecture::X86),
            IMAGE_FILE_MACHINE_AMD64 => Some(Architecture::X64),
            _ => None,
        }
    }

    /// Pointer width in bytes.
    pub fn ptr_width(self) -> usize {
        match self {
            Architecture::X86 => 4,
            Architecture::X64 => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
        }
    }
}

/// Raw field values read from a buffer. A field that could not be read (no
/// fixed offset for the format, or the buffer ends before it) is `None`;
/// missing is reported as missing, never substituted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawFields {
    pub bug_check_code: Option<u32>,
    pub bug_check_parameters: [Option<u64>; 4],
    pub machine_image_type: Option<u32>,
    pub number_processors: Option<u32>,
    pub major_version: Option<u32>,
    pub minor_version: Option<u32>,
}

impl RawFields {
    pub fn architecture(&self) -> Option<Architecture> {
        self.machine_image_type
            .and_then(Architecture::from_machine_image_type)
    }
}

/// Reads a field at its declared offset and width, zero-extended to u64.
///
/// The declared width is authoritative; width is never inferred from context.
pub fn read_field(buffer: &[u8], spec: FieldSpec, name: &'static str) -> Result<u64> {
    let end = spec
        .offset
        .checked_add(spec.width.len())
        .ok_or(Error::Bounds)?;
    let bytes = buffer.get(spec.offset..end).ok_or(Error::Truncated(name))?;

    Ok(match spec.width {
        FieldWidth::U32 => {
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64
        }
        FieldWidth::U64 => u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]),
    })
}

fn read_opt(buffer: &[u8], spec: Option<FieldSpec>, name: &'static str) -> Option<u64> {
    let spec = spec?;
    match read_field(buffer, spec, name) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("field {} skipped: {}", name, err);
            None
        }
    }
}

/// Extracts every field the table declares. Truncated fields are omitted
/// individually; extraction of the remaining fields continues.
pub fn extract(buffer: &[u8], table: &OffsetTable) -> RawFields {
    let params = &table.bug_check_parameters;

    RawFields {
        bug_check_code: read_opt(buffer, table.bug_check_code, "bug_check_code").map(|v| v as u32),
        bug_check_parameters: [
            read_opt(buffer, params[0], "bug_check_parameter1"),
            read_opt(buffer, params[1], "bug_check_parameter2"),
            read_opt(buffer, params[2], "bug_check_parameter3"),
            read_opt(buffer, params[3], "bug_check_parameter4"),
        ],
        machine_image_type: read_opt(buffer, table.machine_image_type, "machine_image_type")
            .map(|v| v as u32),
        number_processors: read_opt(buffer, table.number_processors, "number_processors")
            .map(|v| v as u32),
        major_version: read_opt(buffer, table.major_version, "major_version").map(|v| v as u32),
        minor_version: read_opt(buffer, table.minor_version, "minor_version").map(|v| v as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offsets::KERNEL64;

    fn kernel_buffer() -> Vec<u8> {
        let mut buf = vec![0u8; 0x2000];
        buf[..8].copy_from_slice(b"PAGEDU64");
        buf[0x30..0x34].copy_from_slice(&IMAGE_FILE_MACHINE_AMD64.to_le_bytes());
        buf[0x34..0x38].copy_from_slice(&8u32.to_le_bytes());
        buf[0x38..0x3c].copy_from_slice(&0x0au32.to_le_bytes());
        buf[0x40..0x48].copy_from_slice(&0xffff_f802_1234_5678u64.to_le_bytes());
        buf[0x48..0x50].copy_from_slice(&2u64.to_le_bytes());
        buf[0x50..0x58].copy_from_slice(&0u64.to_le_bytes());
        buf[0x58..0x60].copy_from_slice(&0xffff_f802_dead_0000u64.to_le_bytes());
        buf[0x08..0x0c].copy_from_slice(&15u32.to_le_bytes());
        buf[0x0c..0x10].copy_from_slice(&19041u32.to_le_bytes());
        buf
    }

    #[test]
    fn test_extract_kernel_fields() {
        let buf = kernel_buffer();
        let fields = extract(&buf, &KERNEL64);

        assert_eq!(fields.bug_check_code, Some(0x0a));
        assert_eq!(fields.bug_check_parameters[0], Some(0xffff_f802_1234_5678));
        assert_eq!(fields.bug_check_parameters[3], Some(0xffff_f802_dead_0000));
        assert_eq!(fields.architecture(), Some(Architecture::X64));
        assert_eq!(fields.number_processors, Some(8));
        assert_eq!(fields.major_version, Some(15));
        assert_eq!(fields.minor_version, Some(19041));
    }

    #[test]
    fn test_parameters_keep_full_64bit_width() {
        // A 32-bit read of an address-valued parameter would truncate the
        // upper half. The table width must win.
        let buf = kernel_buffer();
        let fields = extract(&buf, &KERNEL64);
        assert_eq!(fields.bug_check_parameters[0].unwrap() >> 32, 0xffff_f802);
    }

    #[test]
    fn test_truncated_fields_are_omitted() {
        // Long enough for the code at 0x38 but not for parameter4 at 0x58.
        let buf = kernel_buffer();
        let fields = extract(&buf[..0x48], &KERNEL64);

        assert_eq!(fields.bug_check_code, Some(0x0a));
        assert_eq!(fields.bug_check_parameters[0], Some(0xffff_f802_1234_5678));
        assert_eq!(fields.bug_check_parameters[3], None);
    }

    #[test]
    fn test_read_field_never_reads_past_end() {
        let spec = FieldSpec {
            offset: 0x38,
            width: FieldWidth::U32,
        };
        assert_eq!(
            read_field(&[0u8; 0x3b], spec, "bug_check_code"),
            Err(Error::Truncated("bug_check_code"))
        );
    }
}
