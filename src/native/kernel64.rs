use dataview::Pod;

/// A 64bit Microsoft Windows Crashdump Header
///
/// This is the on-disk layout shared by "PAGEDU64"-signed kernel and complete
/// dumps. The offset comments are authoritative; the static offset table in
/// [`crate::offsets`] is cross-checked against this struct in tests.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct CoreDumpHeader64 {
    pub signature: u32,                // 0x0000
    pub valid_dump: u32,               // 0x0004
    pub major_version: u32,            // 0x0008
    pub minor_version: u32,            // 0x000c
    pub directory_table_base: u64,     // 0x0010
    pub pfn_data_base: u64,            // 0x0018
    pub ps_loaded_module_list: u64,    // 0x0020
    pub ps_active_process_head: u64,   // 0x0028
    pub machine_image_type: u32,       // 0x0030
    pub number_processors: u32,        // 0x0034
    pub bug_check_code: u32,           // 0x0038
    pub pad0: u32,                     // 0x003c
    pub bug_check_parameter1: u64,     // 0x0040
    pub bug_check_parameter2: u64,     // 0x0048
    pub bug_check_parameter3: u64,     // 0x0050
    pub bug_check_parameter4: u64,     // 0x0058
    pub version_user: [u8; 32],        // 0x0060
    pub kd_debugger_data_block: u64,   // 0x0080
    pub physical_memory_block: [u8; 0x2c0], // 0x0088
    pub context_record: [u8; 3000],    // 0x0348
    pub exception_record: [u8; 152],   // EXCEPTION_RECORD64 - 0x0f00
    pub dump_type: u32,                // 0x0f98
    pub pad1: u32,                     // 0x0f9c
    pub required_dump_space: u64,      // 0x0fa0
    pub system_time: u64,              // 0x0fa8
    pub comment: [i8; 0x80],           // 0x0fb0 May not be present.
    pub system_up_time: u64,           // 0x1030
    pub mini_dump_fields: u32,         // 0x1038
    pub secondary_data_state: u32,     // 0x103c
    pub product_type: u32,             // 0x1040
    pub suite_mask: u32,               // 0x1044
    pub writer_status: u32,            // 0x1048
    pub unused0: u8,                   // 0x104c
    pub kd_secondary_version: u8,      // 0x104d only on W2K3 SP1 and up
    pub unused1: [u8; 2],              // 0x104e
    pub reserved0: [u8; 4016],         // 0x1050
} // size: 0x2000

unsafe impl Pod for CoreDumpHeader64 {}

/// Byte offset of the `context_record` region within the header.
pub const CONTEXT_RECORD_OFFSET: usize = 0x348;
/// Byte offset right past the `exception_record` region.
pub const EXCEPTION_RECORD_END: usize = 0xf98;
/// Byte offset of the `dump_type` field within the header.
pub const DUMP_TYPE_OFFSET: usize = 0xf98;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_struct_size_kernel64() {
        assert_eq!(size_of::<CoreDumpHeader64>(), 0x2000);
    }

    #[test]
    fn test_struct_members_kernel64() {
        let header: CoreDumpHeader64 = unsafe { std::mem::zeroed() };
        let base = &header as *const _ as usize;
        assert_eq!(&header.machine_image_type as *const _ as usize - base, 0x30);
        assert_eq!(&header.number_processors as *const _ as usize - base, 0x34);
        assert_eq!(&header.bug_check_code as *const _ as usize - base, 0x38);
        assert_eq!(&header.bug_check_parameter1 as *const _ as usize - base, 0x40);
        assert_eq!(&header.bug_check_parameter4 as *const _ as usize - base, 0x58);
        assert_eq!(
            &header.context_record as *const _ as usize - base,
            CONTEXT_RECORD_OFFSET
        );
        assert_eq!(&header.exception_record as *const _ as usize - base, 0xf00);
        assert_eq!(&header.dump_type as *const _ as usize - base, DUMP_TYPE_OFFSET);
    }
}
