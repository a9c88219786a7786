/*!
Static per-format offset tables.

A wrong byte offset here produces a plausible looking but entirely fictitious
diagnosis, so offsets are defined exactly once as static data and never
derived at runtime. Adding a format variant means adding a table, never
touching extraction logic. The tests cross-check every kernel offset against
the [`crate::native::kernel64::CoreDumpHeader64`] layout.
*/

use crate::format::DumpFormat;

/// Width of a fixed-offset field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FieldWidth {
    U32,
    U64,
}

impl FieldWidth {
    pub fn len(self) -> usize {
        match self {
            FieldWidth::U32 => 4,
            FieldWidth::U64 => 8,
        }
    }
}

/// Location of a single field: byte offset and declared width.
/// All dump fields are little-endian.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub offset: usize,
    pub width: FieldWidth,
}

const fn u32_at(offset: usize) -> Option<FieldSpec> {
    Some(FieldSpec {
        offset,
        width: FieldWidth::U32,
    })
}

const fn u64_at(offset: usize) -> Option<FieldSpec> {
    Some(FieldSpec {
        offset,
        width: FieldWidth::U64,
    })
}

/// Fixed field locations for one dump format.
///
/// `None` means the format does not expose the field at a fixed offset; the
/// extractor omits it rather than guessing.
#[derive(Clone, Debug)]
pub struct OffsetTable {
    pub bug_check_code: Option<FieldSpec>,
    pub bug_check_parameters: [Option<FieldSpec>; 4],
    pub machine_image_type: Option<FieldSpec>,
    pub number_processors: Option<FieldSpec>,
    pub major_version: Option<FieldSpec>,
    pub minor_version: Option<FieldSpec>,
}

/// Offsets of the "PAGEDU64" header, shared by kernel and complete dumps.
pub const KERNEL64: OffsetTable = OffsetTable {
    bug_check_code: u32_at(0x38),
    // Parameters are 64-bit. Reading them as 32-bit truncates addresses and
    // corrupts their meaning, so the declared width is authoritative.
    bug_check_parameters: [u64_at(0x40), u64_at(0x48), u64_at(0x50), u64_at(0x58)],
    machine_image_type: u32_at(0x30),
    number_processors: u32_at(0x34),
    major_version: u32_at(0x08),
    minor_version: u32_at(0x0c),
};

/// "MDMP" user dumps keep their diagnostics behind a stream directory, not at
/// fixed offsets. No field is exposed statically.
pub const MINIDUMP: OffsetTable = OffsetTable {
    bug_check_code: None,
    bug_check_parameters: [None, None, None, None],
    machine_image_type: None,
    number_processors: None,
    major_version: None,
    minor_version: None,
};

impl OffsetTable {
    /// Resolves the static table for a format, `None` for `Unknown`.
    pub fn for_format(format: DumpFormat) -> Option<&'static OffsetTable> {
        match format {
            DumpFormat::KernelPagedu64 | DumpFormat::KernelFull => Some(&KERNEL64),
            DumpFormat::MinidumpMdmp => Some(&MINIDUMP),
            DumpFormat::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::CoreDumpHeader64;

    fn offset_of<T>(header: &CoreDumpHeader64, field: &T) -> usize {
        field as *const _ as usize - header as *const _ as usize
    }

    #[test]
    fn test_kernel64_offsets_match_header_layout() {
        let header: CoreDumpHeader64 = unsafe { std::mem::zeroed() };

        assert_eq!(
            KERNEL64.bug_check_code.unwrap().offset,
            offset_of(&header, &header.bug_check_code)
        );
        assert_eq!(
            KERNEL64.bug_check_parameters[0].unwrap().offset,
            offset_of(&header, &header.bug_check_parameter1)
        );
        assert_eq!(
            KERNEL64.bug_check_parameters[1].unwrap().offset,
            offset_of(&header, &header.bug_check_parameter2)
        );
        assert_eq!(
            KERNEL64.bug_check_parameters[2].unwrap().offset,
            offset_of(&header, &header.bug_check_parameter3)
        );
        assert_eq!(
            KERNEL64.bug_check_parameters[3].unwrap().offset,
            offset_of(&header, &header.bug_check_parameter4)
        );
        assert_eq!(
            KERNEL64.machine_image_type.unwrap().offset,
            offset_of(&header, &header.machine_image_type)
        );
        assert_eq!(
            KERNEL64.number_processors.unwrap().offset,
            offset_of(&header, &header.number_processors)
        );
        assert_eq!(
            KERNEL64.major_version.unwrap().offset,
            offset_of(&header, &header.major_version)
        );
        assert_eq!(
            KERNEL64.minor_version.unwrap().offset,
            offset_of(&header, &header.minor_version)
        );
    }

    #[test]
    fn test_kernel64_parameter_widths_are_64bit() {
        for param in KERNEL64.bug_check_parameters.iter() {
            assert_eq!(param.unwrap().width, FieldWidth::U64);
        }
    }

    #[test]
    fn test_resolver() {
        assert!(OffsetTable::for_format(DumpFormat::KernelPagedu64).is_some());
        assert!(OffsetTable::for_format(DumpFormat::KernelFull).is_some());
        assert!(OffsetTable::for_format(DumpFormat::MinidumpMdmp).is_some());
        assert!(OffsetTable::for_format(DumpFormat::Unknown).is_none());
    }
}
