//! Low-level TAR archive parser.
//!
//! This module handles the binary parsing of TAR structures from a fully
//! resident byte buffer (the bundle payload after gzip decompression).
//!
//! ## Parsing Strategy
//!
//! TAR archives are read front to back as a linear scan:
//! 1. Read a 512-byte header block at the current offset
//! 2. Pull the entry name (bytes 0-99) and octal size (bytes 124-135)
//! 3. Slice exactly `size` content bytes after the header
//! 4. Round the offset up to the next 512-byte boundary and repeat
//!
//! A header whose name field is entirely empty marks the logical end of
//! the archive; everything after it (the customary run of zero blocks)
//! is ignored.
//!
//! Only the minimal subset of the format needed to recover plain file
//! entries is interpreted: checksums, magic/version fields and type flags
//! are not validated.

use anyhow::{Result, bail};

use super::structures::{BLOCK_SIZE, GNU_LONG_NAME, NAME_FIELD, SIZE_FIELD, TarEntry};

/// Parse a TAR archive buffer into its file entries.
///
/// Entries are returned in archive order. Directory entries (name ending
/// in `/`), PAX extended-header entries and the GNU long-name pseudo-entry
/// are consumed but not reported; a long name is applied to the entry that
/// follows it.
///
/// # Arguments
///
/// * `buffer` - The complete decompressed archive body
///
/// # Returns
///
/// All file entries collected up to the archive's end marker (or the end
/// of the buffer, whichever comes first).
///
/// # Errors
///
/// Returns an error if a header block is cut short by the end of the
/// buffer, if a size field holds no octal digits, or if an entry's
/// declared content extends past the buffer. Truncated trailing padding
/// after complete content is tolerated.
pub fn parse_tar(buffer: &[u8]) -> Result<Vec<TarEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0usize;
    let mut long_name: Option<String> = None;

    while offset < buffer.len() {
        let remaining = buffer.len() - offset;
        if remaining < BLOCK_SIZE {
            bail!("truncated header at offset {offset}: {remaining} bytes left");
        }

        let header = &buffer[offset..offset + BLOCK_SIZE];
        let mut name = field_string(&header[NAME_FIELD]);

        // An empty name field is the archive's end marker
        if name.is_empty() {
            break;
        }

        let Some(size) = parse_octal(&header[SIZE_FIELD]) else {
            bail!("invalid size field at offset {offset}");
        };
        offset += BLOCK_SIZE;

        if buffer.len() - offset < size {
            bail!(
                "truncated entry {name} at offset {offset}: \
                 declared {size} bytes, {} left",
                buffer.len() - offset
            );
        }

        // GNU tar stores names longer than 100 bytes as a pseudo-entry
        // whose content is the real name of the entry that follows
        if name == GNU_LONG_NAME {
            long_name = Some(field_string(&buffer[offset..offset + size]));
            offset += padded(size);
            continue;
        }

        if let Some(real_name) = long_name.take() {
            name = real_name;
        }

        // PAX metadata entries and directories carry no file content we
        // care about; their blocks are still consumed
        if !name.contains("PaxHeader") && !name.ends_with('/') {
            entries.push(TarEntry {
                name,
                content: buffer[offset..offset + size].to_vec(),
            });
        }

        offset += padded(size);
    }

    Ok(entries)
}

/// Round a content length up to the next 512-byte block boundary.
fn padded(size: usize) -> usize {
    size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Decode a null-terminated header field as text.
///
/// Reads up to the first null byte and trims surrounding whitespace.
/// Non-UTF-8 bytes are replaced rather than rejected.
fn field_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).trim().to_string()
}

/// Parse an ASCII octal header field.
///
/// Leading spaces are skipped; accumulation stops at the first null or
/// non-octal byte. Returns `None` if the field holds no digits at all.
fn parse_octal(field: &[u8]) -> Option<usize> {
    let mut value = 0usize;
    let mut digits = 0usize;

    for &byte in field {
        match byte {
            b'0'..=b'7' => {
                value = value * 8 + (byte - b'0') as usize;
                digits += 1;
            }
            b' ' if digits == 0 => continue,
            _ => break,
        }
    }

    (digits > 0).then_some(value)
}
