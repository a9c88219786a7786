pub mod kernel64;
pub mod minidump;

pub use kernel64::CoreDumpHeader64;
pub use minidump::MinidumpHeader;

/// Crash dump header signature ("PAGE")
pub const DUMP_SIGNATURE: u32 = 0x4547_4150;

/// 64-bit crash dump validation tag ("DU64")
pub const DUMP_VALID_DUMP64: u32 = 0x3436_5544;

/// Minidump header signature ("MDMP")
pub const MINIDUMP_SIGNATURE: u32 = 0x504d_444d;

/// The type of the crash dump
pub mod dump_type {
    pub const FULL: u32 = 1;
    pub const KERNEL: u32 = 2;
    pub const BIT_MAP: u32 = 5;
}

pub const IMAGE_FILE_MACHINE_I386: u32 = 0x14c;
pub const IMAGE_FILE_MACHINE_AMD64: u32 = 0x8664;
