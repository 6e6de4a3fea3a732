use std::fmt::Write;

/// Formats bytes as a canonical hex display, one line per 16 bytes.
///
/// Each line is the address in hexadecimal (relative to `offset`), sixteen space-separated
/// two column hexadecimal bytes, then the same bytes as ASCII enclosed in `|` characters.
/// Control and non-ASCII bytes are shown as `.`.
pub fn format_hexdump(data: &[u8], offset: usize) -> String {
    let mut out = String::with_capacity(data.len() * 4 + 16);

    for (i, line) in data.chunks(16).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // `fmt::Write` for `String` never fails.
        let _ = write!(out, "{:08x}:", offset + i * 16);
        for b in line {
            let _ = write!(out, " {:02x}", b);
        }
        for _ in line.len()..16 {
            out.push_str("   ");
        }

        out.push_str("  |");
        for &b in line {
            if b.is_ascii_graphic() || b == b' ' {
                out.push(b as char);
            } else {
                out.push('.');
            }
        }
        out.push('|');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexdump_single_line() {
        let dump = format_hexdump(b"AB\x00", 0x20);
        assert_eq!(
            dump,
            "00000020: 41 42 00                                         |AB.|"
        );
    }

    #[test]
    fn test_hexdump_wraps_lines() {
        let data = [0u8; 17];
        let dump = format_hexdump(&data, 0);
        assert_eq!(dump.lines().count(), 2);
        assert!(dump.lines().nth(1).unwrap().starts_with("00000010: 00"));
    }
}
