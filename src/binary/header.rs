// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Artifact header and footer.
//!
//! The header is a fixed 46-byte prefix plus the locale string. It carries
//! `header_len`, so a reader skips whatever a newer minor version appended to
//! the header without understanding it. Four block lengths follow; blocks are
//! laid out back to back right after the header.
//!
//! The footer is 8 bytes: a CRC32 over everything before it, plus the magic
//! reversed ("TFSD"). Wrong footer magic means the file was cut short. Wrong
//! checksum means it was damaged. Either way, don't trust the data.
//!
//! `BlockOffsets` is the single source of truth for the layout. Both the writer
//! and the reader go through it.

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{Block, Error, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "DSFT" in ASCII (header)
pub const MAGIC: [u8; 4] = *b"DSFT";

/// Footer magic: "TFSD" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = *b"TFSD";

/// Format major version. Readers reject any other major.
pub const VERSION_MAJOR: u16 = 1;

/// Format minor version. Readers accept any minor of their major.
pub const VERSION_MINOR: u16 = 0;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum artifact size: 256 MB
pub const MAX_FILE_SIZE: usize = 256 * 1024 * 1024;

/// Maximum number of sections
pub const MAX_SECTION_COUNT: u32 = 10_000_000;

/// Maximum number of terms
pub const MAX_TERM_COUNT: u32 = 10_000_000;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// HEADER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub major: u16,
    pub minor: u16,
    /// Total header bytes, magic included. Blocks start here.
    pub header_len: u32,
    pub built_at: u64,
    pub dictionary_len: u32,
    pub postings_len: u32,
    pub sections_len: u32,
    pub stats_len: u32,
    pub term_count: u32,
    pub section_count: u32,
    pub locale: String,
}

impl Header {
    // 4 (magic) + 2 + 2 (version) + 4 (header_len) + 8 (built_at)
    // + 4*4 (block lengths) + 4 + 4 (counts) + 2 (locale_len) = 46
    pub const FIXED_SIZE: usize = 46;

    /// Header length for the current minor version.
    pub fn encoded_len(locale: &str) -> usize {
        Self::FIXED_SIZE + locale.len()
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.major.to_le_bytes());
        out.extend_from_slice(&self.minor.to_le_bytes());
        out.extend_from_slice(&self.header_len.to_le_bytes());
        out.extend_from_slice(&self.built_at.to_le_bytes());
        out.extend_from_slice(&self.dictionary_len.to_le_bytes());
        out.extend_from_slice(&self.postings_len.to_le_bytes());
        out.extend_from_slice(&self.sections_len.to_le_bytes());
        out.extend_from_slice(&self.stats_len.to_le_bytes());
        out.extend_from_slice(&self.term_count.to_le_bytes());
        out.extend_from_slice(&self.section_count.to_le_bytes());
        out.extend_from_slice(&(self.locale.len() as u16).to_le_bytes());
        out.extend_from_slice(self.locale.as_bytes());
    }

    /// Check magic and major version. Needs only the first 8 bytes, so it
    /// runs before anything else and reports version problems as such.
    pub fn check_version(bytes: &[u8]) -> Result<(u16, u16)> {
        let magic: [u8; 4] = bytes
            .get(0..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| Error::Truncated(format!("{} bytes, too short for magic", bytes.len())))?;
        if magic != MAGIC {
            return Err(Error::BadMagic(magic));
        }
        if bytes.len() < 8 {
            return Err(Error::Truncated("header ends before version".to_string()));
        }
        let major = u16::from_le_bytes([bytes[4], bytes[5]]);
        let minor = u16::from_le_bytes([bytes[6], bytes[7]]);
        if major != VERSION_MAJOR {
            return Err(Error::UnsupportedVersion {
                major,
                minor,
                supported: VERSION_MAJOR,
            });
        }
        Ok((major, minor))
    }

    pub fn read(bytes: &[u8]) -> Result<Self> {
        let (major, minor) = Self::check_version(bytes)?;
        if bytes.len() < Self::FIXED_SIZE {
            return Err(Error::Truncated(format!(
                "{} bytes, header needs {}",
                bytes.len(),
                Self::FIXED_SIZE
            )));
        }
        let u32_at = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        let header_len = u32_at(8);
        let mut built_at = [0u8; 8];
        built_at.copy_from_slice(&bytes[12..20]);
        let locale_len = u16::from_le_bytes([bytes[44], bytes[45]]) as usize;

        let locale_end = Self::FIXED_SIZE + locale_len;
        if (header_len as usize) < locale_end {
            return Err(Error::corrupt(
                Block::Header,
                format!("header_len {} shorter than its own fields ({})", header_len, locale_end),
            ));
        }
        let locale = bytes
            .get(Self::FIXED_SIZE..locale_end)
            .ok_or_else(|| Error::Truncated("header ends inside locale".to_string()))?;
        let locale = std::str::from_utf8(locale)
            .map_err(|e| Error::corrupt(Block::Header, format!("locale is not UTF-8: {}", e)))?
            .to_string();

        let header = Self {
            major,
            minor,
            header_len,
            built_at: u64::from_le_bytes(built_at),
            dictionary_len: u32_at(20),
            postings_len: u32_at(24),
            sections_len: u32_at(28),
            stats_len: u32_at(32),
            term_count: u32_at(36),
            section_count: u32_at(40),
            locale,
        };
        if header.term_count > MAX_TERM_COUNT {
            return Err(Error::corrupt(
                Block::Header,
                format!("term count {} exceeds limit", header.term_count),
            ));
        }
        if header.section_count > MAX_SECTION_COUNT {
            return Err(Error::corrupt(
                Block::Header,
                format!("section count {} exceeds limit", header.section_count),
            ));
        }
        Ok(header)
    }

    pub fn block_offsets(&self) -> BlockOffsets {
        BlockOffsets::from_header(self)
    }
}

// ============================================================================
// BLOCK OFFSETS (SINGLE SOURCE OF TRUTH for layout)
// ============================================================================

/// Byte ranges of each block.
///
/// Layout:
/// 1. HEADER      [header_len]     - fixed fields, locale, future extensions
/// 2. DICTIONARY  [dictionary_len] - front-coded sorted terms
/// 3. POSTINGS    [postings_len]   - one list per term, dictionary order
/// 4. SECTIONS    [sections_len]   - length-prefixed records, id order
/// 5. STATS       [stats_len]      - corpus totals and index settings
/// 6. (ignored)                    - blocks appended by newer minors
/// 7. FOOTER      [8B]             - CRC32 + reversed magic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOffsets {
    pub dictionary: (usize, usize),
    pub postings: (usize, usize),
    pub sections: (usize, usize),
    pub stats: (usize, usize),
}

impl BlockOffsets {
    pub fn from_header(h: &Header) -> Self {
        let mut pos = h.header_len as usize;
        let mut next = |len: u32| {
            let start = pos;
            pos += len as usize;
            (start, pos)
        };
        Self {
            dictionary: next(h.dictionary_len),
            postings: next(h.postings_len),
            sections: next(h.sections_len),
            stats: next(h.stats_len),
        }
    }

    /// End of the last known block.
    pub fn end(&self) -> usize {
        self.stats.1
    }

    #[inline]
    pub fn slice<'a>(&self, bytes: &'a [u8], block: (usize, usize)) -> Option<&'a [u8]> {
        bytes.get(block.0..block.1)
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    /// CRC32 of everything before the footer
    pub crc32: u32,
}

impl Footer {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.crc32.to_le_bytes());
        out.extend_from_slice(&FOOTER_MAGIC);
    }

    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Error::Truncated("file too short for footer".to_string()));
        }
        let footer_start = bytes.len() - Self::SIZE;
        if bytes[footer_start + 4..] != FOOTER_MAGIC {
            return Err(Error::Truncated("footer magic missing".to_string()));
        }
        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);
        Ok(Self { crc32 })
    }

    /// Compare the stored checksum against the content it covers.
    pub fn verify(&self, content: &[u8]) -> Result<()> {
        let actual = Self::compute_crc32(content);
        if actual != self.crc32 {
            return Err(Error::ChecksumMismatch {
                expected: self.crc32,
                actual,
            });
        }
        Ok(())
    }

    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}
