/*!
Raw byte evidence for human and downstream review: a fixed hex dump preview
and a bounded printable-strings view. Both transforms are deterministic; the
same buffer always yields the same output.
*/

use std::fmt::Write as _;

use widestring::U16Str;

/// Number of leading bytes shown in the hex dump.
pub const HEX_DUMP_LEN: usize = 1024;
/// Bytes per hex dump row.
pub const HEX_DUMP_ROW: usize = 16;
/// Upper bound on the extracted-strings view, in characters.
pub const MAX_STRINGS_LEN: usize = 25_000;
/// Minimum run length for a printable sequence to count as a string.
pub const MIN_RUN_LEN: usize = 4;

fn is_printable(byte: u8) -> bool {
    (0x20..0x7f).contains(&byte)
}

/// Formats the first [`HEX_DUMP_LEN`] bytes as `offset  hex  |ascii|` rows.
pub fn hex_dump(buffer: &[u8]) -> String {
    let preview = &buffer[..buffer.len().min(HEX_DUMP_LEN)];
    let mut out = String::new();

    for (row, chunk) in preview.chunks(HEX_DUMP_ROW).enumerate() {
        let _ = write!(out, "{:08x}  ", row * HEX_DUMP_ROW);

        for i in 0..HEX_DUMP_ROW {
            match chunk.get(i) {
                Some(byte) => {
                    let _ = write!(out, "{:02x} ", byte);
                }
                None => out.push_str("   "),
            }
        }

        out.push_str(" |");
        for byte in chunk {
            out.push(if is_printable(*byte) { *byte as char } else { '.' });
        }
        out.push_str("|\n");
    }

    out
}

fn push_bounded(out: &mut String, run: &str) -> bool {
    if out.len() + run.len() + 1 > MAX_STRINGS_LEN {
        // Deterministic truncation: take the leading part that still fits.
        let remaining = MAX_STRINGS_LEN.saturating_sub(out.len() + 1);
        if remaining >= MIN_RUN_LEN {
            out.push_str(&run[..remaining]);
            out.push('\n');
        }
        return false;
    }

    out.push_str(run);
    out.push('\n');
    true
}

fn ascii_runs(buffer: &[u8], out: &mut String) -> bool {
    let mut run = String::new();

    for byte in buffer.iter().copied() {
        if is_printable(byte) {
            run.push(byte as char);
            continue;
        }

        if run.len() >= MIN_RUN_LEN && !push_bounded(out, &run) {
            return false;
        }
        run.clear();
    }

    if run.len() >= MIN_RUN_LEN && !push_bounded(out, &run) {
        return false;
    }

    true
}

fn utf16_runs(buffer: &[u8], out: &mut String) -> bool {
    let mut units: Vec<u16> = Vec::new();

    let mut chunks = buffer.chunks_exact(2);
    loop {
        let unit = chunks
            .next()
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

        match unit {
            // Only printable-ASCII code units qualify, which keeps the decoded
            // text single-byte clean and skips the ASCII runs already found
            // (those decode as pairs with interleaved NULs, not as runs here).
            Some(unit) if (0x20..0x7f).contains(&unit) => {
                units.push(unit);
                continue;
            }
            _ => {}
        }

        if units.len() >= MIN_RUN_LEN {
            let run = U16Str::from_slice(&units).to_string_lossy();
            if !push_bounded(out, &run) {
                return false;
            }
        }
        units.clear();

        if unit.is_none() {
            return true;
        }
    }
}

/// Extracts printable ASCII and UTF-16LE runs, newline separated, bounded to
/// [`MAX_STRINGS_LEN`] characters.
pub fn extract_strings(buffer: &[u8]) -> String {
    let mut out = String::new();

    if ascii_runs(buffer, &mut out) {
        utf16_runs(buffer, &mut out);
    }

    out
}
