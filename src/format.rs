/*!
Dump format classification from the leading signature bytes.
*/

use log::info;

use crate::native::{
    kernel64::DUMP_TYPE_OFFSET, dump_type, DUMP_SIGNATURE, DUMP_VALID_DUMP64, MINIDUMP_SIGNATURE,
};

/// Minimum buffer length required for classification.
pub const MIN_SIGNATURE_LEN: usize = 8;

/// The on-disk layout family of a crash dump buffer.
///
/// Determined once per buffer from its leading bytes; `Unknown` is a valid
/// classification, not an error, and downgrades the pipeline to
/// format-independent extraction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub enum DumpFormat {
    /// User-mode minidump ("MDMP" signature).
    MinidumpMdmp,
    /// "PAGEDU64"-signed kernel dump.
    KernelPagedu64,
    /// "PAGEDU64"-signed complete memory dump.
    KernelFull,
    /// No known signature.
    Unknown,
}

impl DumpFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DumpFormat::MinidumpMdmp => "minidump (MDMP)",
            DumpFormat::KernelPagedu64 => "kernel dump (PAGEDU64)",
            DumpFormat::KernelFull => "complete dump (PAGEDU64)",
            DumpFormat::Unknown => "unknown",
        }
    }
}

fn read_u32_at(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes = buffer.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Classifies a buffer by its signature.
///
/// Buffers shorter than [`MIN_SIGNATURE_LEN`] or without a known prefix
/// classify as [`DumpFormat::Unknown`].
pub fn detect(buffer: &[u8]) -> DumpFormat {
    if buffer.len() < MIN_SIGNATURE_LEN {
        return DumpFormat::Unknown;
    }

    let sig = read_u32_at(buffer, 0).unwrap_or(0);
    let tag = read_u32_at(buffer, 4).unwrap_or(0);

    if sig == DUMP_SIGNATURE && tag == DUMP_VALID_DUMP64 {
        // The dump_type field distinguishes complete dumps from kernel dumps
        // when the full header made it into the buffer.
        let format = match read_u32_at(buffer, DUMP_TYPE_OFFSET) {
            Some(dump_type::FULL) => DumpFormat::KernelFull,
            _ => DumpFormat::KernelPagedu64,
        };
        info!("64-bit Microsoft Crash Dump signature verified: {}", format.as_str());
        return format;
    }

    if sig == MINIDUMP_SIGNATURE {
        info!("minidump signature verified");
        return DumpFormat::MinidumpMdmp;
    }

    DumpFormat::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagedu64_buffer(len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        buf[..8].copy_from_slice(b"PAGEDU64");
        buf
    }

    #[test]
    fn test_short_buffers_are_unknown() {
        for len in 0..MIN_SIGNATURE_LEN {
            assert_eq!(detect(&vec![0x50u8; len]), DumpFormat::Unknown);
        }
    }

    #[test]
    fn test_no_signature_is_unknown() {
        assert_eq!(detect(&[0xffu8; 0x40]), DumpFormat::Unknown);
        assert_eq!(detect(b"GARBAGE!"), DumpFormat::Unknown);
    }

    #[test]
    fn test_pagedu64_without_dump_type_is_kernel() {
        let buf = pagedu64_buffer(0x100);
        assert_eq!(detect(&buf), DumpFormat::KernelPagedu64);
    }

    #[test]
    fn test_pagedu64_full_dump_type() {
        let mut buf = pagedu64_buffer(0x2000);
        buf[DUMP_TYPE_OFFSET..DUMP_TYPE_OFFSET + 4]
            .copy_from_slice(&dump_type::FULL.to_le_bytes());
        assert_eq!(detect(&buf), DumpFormat::KernelFull);

        buf[DUMP_TYPE_OFFSET..DUMP_TYPE_OFFSET + 4]
            .copy_from_slice(&dump_type::KERNEL.to_le_bytes());
        assert_eq!(detect(&buf), DumpFormat::KernelPagedu64);
    }

    #[test]
    fn test_minidump_signature() {
        let mut buf = vec![0u8; 0x20];
        buf[..4].copy_from_slice(b"MDMP");
        assert_eq!(detect(&buf), DumpFormat::MinidumpMdmp);
    }
}
