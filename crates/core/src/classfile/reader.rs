use super::error::{ClassFileError, ClassFileResult};

/// Big-endian cursor over a borrowed byte slice.
///
/// Offsets reported in errors are relative to the slice the reader was
/// created from.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `len` bytes as a slice.
    pub fn take(&mut self, len: usize) -> ClassFileResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(ClassFileError::UnexpectedEof {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Advance to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) -> ClassFileResult<()> {
        let padding = (alignment - self.pos % alignment) % alignment;
        self.take(padding).map(|_| ())
    }

    pub fn u8(&mut self) -> ClassFileResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn i8(&mut self) -> ClassFileResult<i8> {
        Ok(self.u8()? as i8)
    }

    pub fn u16(&mut self) -> ClassFileResult<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn i16(&mut self) -> ClassFileResult<i16> {
        Ok(self.u16()? as i16)
    }

    pub fn u32(&mut self) -> ClassFileResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self) -> ClassFileResult<i32> {
        Ok(self.u32()? as i32)
    }

    pub fn u64(&mut self) -> ClassFileResult<u64> {
        let hi = self.u32()? as u64;
        let lo = self.u32()? as u64;
        Ok((hi << 32) | lo)
    }

    /// Read a `u16` count followed by that many items.
    pub fn counted<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> ClassFileResult<T>,
    ) -> ClassFileResult<Vec<T>> {
        let count = self.u16()? as usize;
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(item(self)?);
        }
        Ok(items)
    }
}
