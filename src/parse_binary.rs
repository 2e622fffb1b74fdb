use std::fmt;

use crate::{
    error::FontError,
    true_type::{FWord, Fixed, LongDateTime, TableTag},
};

/// Generic trait for parsing big-endian binary formats
pub trait BinaryParser {
    fn buffer(&self) -> &[u8];
    fn cursor(&self) -> usize;
    fn cursor_mut(&mut self) -> &mut usize;

    fn position(&self) -> usize {
        self.cursor()
    }

    fn set_position(&mut self, position: usize) {
        *self.cursor_mut() = position;
    }

    /// Bytes at `offset..offset + len`, independent of the cursor
    fn slice(&self, offset: usize, len: usize) -> anyhow::Result<&[u8]> {
        let buffer = self.buffer();

        match offset.checked_add(len) {
            Some(end) if end <= buffer.len() => Ok(&buffer[offset..end]),
            _ => anyhow::bail!(FontError::OutOfBounds {
                offset,
                len,
                buffer_len: buffer.len(),
            }),
        }
    }

    fn take<const N: usize>(&mut self) -> anyhow::Result<[u8; N]> {
        let mut bytes = [0; N];
        bytes.copy_from_slice(self.slice(self.cursor(), N)?);
        *self.cursor_mut() += N;

        Ok(bytes)
    }

    fn skip(&mut self, len: usize) -> anyhow::Result<()> {
        self.slice(self.cursor(), len)?;
        *self.cursor_mut() += len;

        Ok(())
    }

    fn read_u8(&mut self) -> anyhow::Result<u8> {
        let [b] = self.take()?;

        Ok(b)
    }

    fn read_u16(&mut self) -> anyhow::Result<u16> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    fn read_i16(&mut self) -> anyhow::Result<i16> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    fn read_u32(&mut self) -> anyhow::Result<u32> {
        Ok(u32::from_be_bytes(self.take()?))
    }

    fn read_i32(&mut self) -> anyhow::Result<i32> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    fn read_fixed(&mut self) -> anyhow::Result<Fixed> {
        Ok(Fixed::from_bits(self.read_u32()?))
    }

    fn read_fword(&mut self) -> anyhow::Result<FWord> {
        Ok(FWord(self.read_i16()?))
    }

    /// Two 32-bit words forming a signed count of seconds since 1904-01-01
    fn read_date(&mut self) -> anyhow::Result<LongDateTime> {
        let high = u64::from(self.read_u32()?);
        let low = u64::from(self.read_u32()?);

        Ok(LongDateTime(((high << 32) | low) as i64))
    }

    fn read_tag(&mut self) -> anyhow::Result<TableTag> {
        Ok(TableTag::new(self.take()?))
    }

    /// `len` raw bytes decoded as UTF-8, invalid sequences replaced
    fn read_string(&mut self, len: usize) -> anyhow::Result<String> {
        let string = String::from_utf8_lossy(self.slice(self.cursor(), len)?).into_owned();
        *self.cursor_mut() += len;

        Ok(string)
    }

    /// Moves the cursor to `offset`, runs `f`, and puts the cursor back where
    /// it was, whatever `f` did with it
    fn run_at<T>(&mut self, offset: usize, f: impl FnOnce(&mut Self) -> T) -> T
    where
        Self: Sized,
    {
        let saved = self.cursor();
        self.set_position(offset);
        let result = f(self);
        self.set_position(saved);

        result
    }
}

/// Sequential reader over an immutable byte buffer
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }
}

impl fmt::Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteCursor")
            .field("cursor", &self.cursor)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .finish()
    }
}

impl BinaryParser for ByteCursor<'_> {
    fn buffer(&self) -> &[u8] {
        self.buffer
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }
}
