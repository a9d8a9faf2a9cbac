// SPDX-License-Identifier: GPL-3.0-only
//! Hex dump formatting for frame diagnostics

use std::fmt::Write;

const ROW: usize = 16;

/// Format `buf` as rows of 16 hex bytes followed by an ASCII column.
///
/// Buffers longer than one row get a `0000: ` offset on each line.
pub fn hexdump(buf: &[u8]) -> String {
    let mut out = String::new();
    let with_offset = buf.len() > ROW;

    for (row, chunk) in buf.chunks(ROW).enumerate() {
        if with_offset {
            let _ = write!(out, "{:04x}: ", row * ROW);
        }

        for i in 0..ROW {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, "{b:02x} ");
                }
                None => out.push_str("   "),
            }
        }

        out.push_str("| ");

        for i in 0..ROW {
            out.push(match chunk.get(i) {
                Some(&b) if (0x20..0x7f).contains(&b) => b as char,
                Some(_) => '.',
                None => ' ',
            });
        }

        out.push('\n');
    }

    out
}
