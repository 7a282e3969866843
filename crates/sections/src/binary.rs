//! Binary packing of section sequences.
//!
//! All values are little-endian. A packed buffer is a `u32` section count
//! followed by `x, y, z, radius, prev_length, alpha` as `f32` per section.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use glam::DVec3;

use crate::{DirectedSection, SectionError};

/// Bytes per packed section.
pub const SECTION_STRIDE: usize = 6 * 4;

/// A writer for building packed section buffers.
#[derive(Debug, Default)]
pub struct SectionWriter {
    buf: BytesMut,
}

impl SectionWriter {
    /// Create a new writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new writer with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Returns the current length.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    fn put_section(&mut self, section: &DirectedSection) {
        self.buf.put_f32_le(section.center.x as f32);
        self.buf.put_f32_le(section.center.y as f32);
        self.buf.put_f32_le(section.center.z as f32);
        self.buf.put_f32_le(section.radius as f32);
        self.buf.put_f32_le(section.prev_length as f32);
        self.buf.put_f32_le(section.alpha as f32);
    }

    /// Write a counted run of sections.
    ///
    /// The count is patched in after the run is written.
    pub fn put_sections<'a, I>(&mut self, sections: I)
    where
        I: IntoIterator<Item = &'a DirectedSection>,
    {
        let sections = sections.into_iter();
        self.buf.reserve(4 + sections.size_hint().0 * SECTION_STRIDE);
        let count_at = self.buf.len();
        self.buf.put_u32_le(0);
        let mut count: u32 = 0;
        for section in sections {
            self.put_section(section);
            count += 1;
        }
        self.buf[count_at..count_at + 4].copy_from_slice(&count.to_le_bytes());
    }

    /// Consume the writer and return the built buffer.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }

    /// Get current buffer as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// A reader for decoding packed section buffers.
#[derive(Debug)]
pub struct SectionReader {
    buf: Bytes,
}

impl SectionReader {
    /// Create a new reader from raw bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { buf: data.into() }
    }

    /// Returns remaining bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Read one counted run of sections.
    pub fn get_sections(&mut self) -> Result<Vec<DirectedSection>, SectionError> {
        if self.buf.remaining() < 4 {
            return Err(SectionError::UnexpectedEof);
        }
        let declared = self.buf.get_u32_le();
        let available = self.buf.remaining();
        if (declared as usize).saturating_mul(SECTION_STRIDE) > available {
            return Err(SectionError::CountMismatch {
                declared,
                available,
            });
        }

        let mut sections = Vec::with_capacity(declared as usize);
        for _ in 0..declared {
            let x = self.buf.get_f32_le() as f64;
            let y = self.buf.get_f32_le() as f64;
            let z = self.buf.get_f32_le() as f64;
            let radius = self.buf.get_f32_le() as f64;
            let prev_length = self.buf.get_f32_le() as f64;
            let alpha = self.buf.get_f32_le() as f64;
            sections.push(DirectedSection::new(
                DVec3::new(x, y, z),
                radius,
                prev_length,
                alpha,
            ));
        }
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_layout() {
        let sections = [
            DirectedSection::new(DVec3::new(1.0, 2.0, 0.0), 0.0, 0.0, 0.5),
            DirectedSection::new(DVec3::new(3.0, 2.0, 0.25), 0.25, 2.0, 0.5),
        ];
        let mut w = SectionWriter::new();
        w.put_sections(&sections);
        assert_eq!(w.len(), 4 + 2 * SECTION_STRIDE);

        let mut r = SectionReader::new(w.finish());
        let decoded = r.get_sections().unwrap();
        assert_eq!(decoded, sections);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_truncated_buffer() {
        let mut w = SectionWriter::new();
        w.put_sections(&[DirectedSection::default()]);
        let data = w.finish();

        let mut r = SectionReader::new(data.slice(..data.len() - 1));
        assert_eq!(
            r.get_sections(),
            Err(SectionError::CountMismatch {
                declared: 1,
                available: SECTION_STRIDE - 1
            })
        );

        let mut r = SectionReader::new(data.slice(..2));
        assert_eq!(r.get_sections(), Err(SectionError::UnexpectedEof));
    }
}
