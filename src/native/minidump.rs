use dataview::Pod;

/// The MINIDUMP_HEADER layout of "MDMP"-signed user dumps.
///
/// Diagnostic fields in this format live behind the stream directory rather
/// than at fixed offsets, so only the header itself is described here.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct MinidumpHeader {
    pub signature: u32,            // 0x0000
    pub version: u32,              // 0x0004
    pub number_of_streams: u32,    // 0x0008
    pub stream_directory_rva: u32, // 0x000c
    pub checksum: u32,             // 0x0010
    pub time_date_stamp: u32,      // 0x0014
    pub flags: u64,                // 0x0018
} // size: 0x20

unsafe impl Pod for MinidumpHeader {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_struct_size_minidump() {
        assert_eq!(size_of::<MinidumpHeader>(), 0x20);
    }

    #[test]
    fn test_struct_members_minidump() {
        let header: MinidumpHeader = unsafe { std::mem::zeroed() };
        let base = &header as *const _ as usize;
        assert_eq!(&header.number_of_streams as *const _ as usize - base, 0x8);
        assert_eq!(&header.flags as *const _ as usize - base, 0x18);
    }
}
