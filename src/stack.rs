/*!
Best-effort stack frame recovery.

The walker scans pointer-width slots of the format's context/exception record
region and keeps values that look like canonical kernel-space code pointers.
This is heuristic: frames carry no certainty claim, and a module is attached
only when a caller-supplied address range actually contains the value.
*/

use std::ops::Range;

use crate::extract::Architecture;
use crate::format::DumpFormat;
use crate::native::kernel64::{CONTEXT_RECORD_OFFSET, EXCEPTION_RECORD_END};

/// Display bound on recovered frames. Truncation past this is silent.
pub const MAX_STACK_FRAMES: usize = 20;

/// A module address range, for associating frame addresses with an owner.
#[derive(Clone, Debug)]
pub struct ModuleRange {
    pub name: String,
    pub range: Range<u64>,
}

/// A candidate return address, innermost first.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
pub struct StackFrame {
    pub address: u64,
    /// Owning module, only when range metadata proved it. Never guessed.
    pub module: Option<String>,
}

/// The raw region a format exposes for frame recovery, if any.
pub fn stack_region(format: DumpFormat, buffer: &[u8]) -> Option<&[u8]> {
    match format {
        DumpFormat::KernelPagedu64 | DumpFormat::KernelFull => {
            buffer.get(CONTEXT_RECORD_OFFSET..EXCEPTION_RECORD_END)
        }
        DumpFormat::MinidumpMdmp | DumpFormat::Unknown => None,
    }
}

/// Does the value look like a kernel-space code pointer?
fn plausible_code_pointer(value: u64, arch: Architecture) -> bool {
    match arch {
        // Canonical kernel-space addresses on x64.
        Architecture::X64 => value >= 0xffff_8000_0000_0000,
        // Kernel half of the 32-bit address space.
        Architecture::X86 => (0x8000_0000..0x1_0000_0000).contains(&value),
    }
}

fn read_slot(region: &[u8], offset: usize, width: usize) -> Option<u64> {
    let bytes = region.get(offset..offset + width)?;
    let mut value = 0u64;
    for (i, byte) in bytes.iter().enumerate() {
        value |= (*byte as u64) << (8 * i);
    }
    Some(value)
}

/// Walks a region in pointer-width steps and collects plausible return
/// addresses, innermost outward, up to [`MAX_STACK_FRAMES`]. An absent or
/// short region yields an empty list, not an error.
pub fn reconstruct(
    region: Option<&[u8]>,
    arch: Architecture,
    modules: &[ModuleRange],
) -> Vec<StackFrame> {
    let region = match region {
        Some(region) => region,
        None => return Vec::new(),
    };

    let width = arch.ptr_width();
    let mut frames = Vec::new();

    let mut offset = 0;
    while offset + width <= region.len() && frames.len() < MAX_STACK_FRAMES {
        if let Some(value) = read_slot(region, offset, width) {
            if plausible_code_pointer(value, arch) {
                let module = modules
                    .iter()
                    .find(|m| m.range.contains(&value))
                    .map(|m| m.name.clone());

                frames.push(StackFrame {
                    address: value,
                    module,
                });
            }
        }
        offset += width;
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_with_pointers(pointers: &[u64]) -> Vec<u8> {
        let mut region = Vec::new();
        for ptr in pointers {
            region.extend_from_slice(&ptr.to_le_bytes());
        }
        region
    }

    #[test]
    fn test_absent_region_is_empty() {
        assert!(reconstruct(None, Architecture::X64, &[]).is_empty());
        assert!(reconstruct(Some(&[]), Architecture::X64, &[]).is_empty());
        assert!(reconstruct(Some(&[0u8; 5]), Architecture::X64, &[]).is_empty());
    }

    #[test]
    fn test_only_plausible_pointers_become_frames() {
        let region = region_with_pointers(&[
            0x0000_0000_0000_1000, // user-space, skipped
            0xffff_f802_1000_2000,
            0x0000_7fff_0000_0000, // user-space, skipped
            0xffff_8000_0000_0010,
        ]);
        let frames = reconstruct(Some(&region), Architecture::X64, &[]);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].address, 0xffff_f802_1000_2000);
        assert_eq!(frames[1].address, 0xffff_8000_0000_0010);
    }

    #[test]
    fn test_frame_order_is_preserved() {
        let pointers: Vec<u64> = (0..5).map(|i| 0xffff_f802_0000_0000 + i).collect();
        let frames = reconstruct(Some(&region_with_pointers(&pointers)), Architecture::X64, &[]);
        let addresses: Vec<u64> = frames.iter().map(|f| f.address).collect();
        assert_eq!(addresses, pointers);
    }

    #[test]
    fn test_frame_count_is_bounded() {
        let pointers: Vec<u64> = (0..200).map(|i| 0xffff_f802_0000_0000 + i * 0x10).collect();
        let region = region_with_pointers(&pointers);
        let frames = reconstruct(Some(&region), Architecture::X64, &[]);
        assert_eq!(frames.len(), MAX_STACK_FRAMES);
    }

    #[test]
    fn test_module_attached_only_with_range_proof() {
        let region = region_with_pointers(&[0xffff_f802_1000_2000, 0xffff_f802_9000_0000]);
        let modules = vec![ModuleRange {
            name: "storport.sys".into(),
            range: 0xffff_f802_1000_0000..0xffff_f802_1100_0000,
        }];
        let frames = reconstruct(Some(&region), Architecture::X64, &modules);

        assert_eq!(frames[0].module.as_deref(), Some("storport.sys"));
        assert_eq!(frames[1].module, None);
    }

    #[test]
    fn test_x86_pointer_plausibility() {
        let mut region = Vec::new();
        for value in [0x0040_1000u32, 0x8050_2000, 0xfffe_1234] {
            region.extend_from_slice(&value.to_le_bytes());
        }
        let frames = reconstruct(Some(&region), Architecture::X86, &[]);
        let addresses: Vec<u64> = frames.iter().map(|f| f.address).collect();
        assert_eq!(addresses, vec![0x8050_2000, 0xfffe_1234]);
    }
}
