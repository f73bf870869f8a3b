//! Bounds-checked cursor over a document.

use thiserror::Error;
use zerocopy::FromBytes;

use super::layout::{I16, I32, U16, U32};

/// A read or seek fell outside the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Offset {offset} is out of range for a document of {len} bytes (reading {hint}).")]
pub struct OutOfRange {
    /// The first offset that could not be read.
    pub offset: usize,
    /// Length of the document.
    pub len: usize,
    /// The field being read when the failure occurred.
    pub hint: &'static str,
}

/// Sequential reader over a complete document, with seeking.
///
/// Every multi-byte read goes through the wire layouts in
/// [`crate::sans::layout`], so the byte order is declared in one place.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    r: &'a [u8],
    i: usize,
}

impl<'a> Cursor<'a> {
    /// A cursor at the start of a document.
    pub fn new(r: &'a [u8]) -> Self {
        Self { r, i: 0 }
    }

    /// Current absolute offset.
    pub fn position(&self) -> usize {
        self.i
    }

    /// Length of the underlying document.
    pub fn len(&self) -> usize {
        self.r.len()
    }

    /// Whether the document has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Move to an absolute offset. Seeking to the very end is allowed.
    pub fn seek(&mut self, offset: usize, hint: &'static str) -> Result<(), OutOfRange> {
        if offset > self.r.len() {
            return Err(self.out_of_range(offset, hint));
        }

        self.i = offset;
        Ok(())
    }

    /// Advance by `n` bytes.
    pub fn skip(&mut self, n: usize, hint: &'static str) -> Result<(), OutOfRange> {
        let offset = self.i.checked_add(n).ok_or(self.out_of_range(usize::MAX, hint))?;
        self.seek(offset, hint)
    }

    /// Read a wire record at the tip, advancing past it.
    pub fn read<T: FromBytes>(&mut self, hint: &'static str) -> Result<T, OutOfRange> {
        let end = self.i + size_of::<T>();

        let bytes = self
            .r
            .get(self.i..end)
            .ok_or(self.out_of_range(self.r.len().max(self.i), hint))?;

        let (value, _) = T::read_from_prefix(bytes).map_err(|_| self.out_of_range(end, hint))?;

        self.i = end;
        Ok(value)
    }

    /// Read a wire record at an absolute offset, leaving the position as it was.
    pub fn read_at<T: FromBytes>(
        &mut self,
        offset: usize,
        hint: &'static str,
    ) -> Result<T, OutOfRange> {
        self.excursion(offset, hint, |c| c.read(hint))
    }

    /// Read a byte at the tip.
    pub fn read_u8(&mut self, hint: &'static str) -> Result<u8, OutOfRange> {
        self.read::<u8>(hint)
    }

    /// Read a 16-bit unsigned integer at the tip.
    pub fn read_u16(&mut self, hint: &'static str) -> Result<u16, OutOfRange> {
        Ok(self.read::<U16>(hint)?.get())
    }

    /// Read a 16-bit signed integer at the tip.
    pub fn read_i16(&mut self, hint: &'static str) -> Result<i16, OutOfRange> {
        Ok(self.read::<I16>(hint)?.get())
    }

    /// Read a 32-bit unsigned integer at the tip.
    pub fn read_u32(&mut self, hint: &'static str) -> Result<u32, OutOfRange> {
        Ok(self.read::<U32>(hint)?.get())
    }

    /// Read a 32-bit signed integer at the tip.
    pub fn read_i32(&mut self, hint: &'static str) -> Result<i32, OutOfRange> {
        Ok(self.read::<I32>(hint)?.get())
    }

    /// Borrow the zero-terminated byte run starting at an absolute offset,
    /// without the terminator. The position is left untouched.
    ///
    /// A run that reaches the end of the document without a terminator is out
    /// of range.
    pub fn read_zero_terminated_at(
        &self,
        offset: usize,
        hint: &'static str,
    ) -> Result<&'a [u8], OutOfRange> {
        let tail = self
            .r
            .get(offset..)
            .ok_or(self.out_of_range(offset, hint))?;

        let end = tail
            .iter()
            .position(|b| *b == 0)
            .ok_or(self.out_of_range(self.r.len(), hint))?;

        Ok(&tail[..end])
    }

    /// Read the zero-terminated string at an absolute offset, decoding it as
    /// Latin-1 (Windows-1252). The position is left untouched.
    pub fn read_string_at(&self, offset: usize, hint: &'static str) -> Result<String, OutOfRange> {
        let bytes = self.read_zero_terminated_at(offset, hint)?;
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
        Ok(text.into_owned())
    }

    /// Run `f` with the cursor moved to `offset`, then restore the previous
    /// position whether or not `f` succeeded.
    pub fn excursion<T, E: From<OutOfRange>>(
        &mut self,
        offset: usize,
        hint: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let saved = self.i;
        self.seek(offset, hint)?;
        let result = f(self);
        self.i = saved;
        result
    }

    fn out_of_range(&self, offset: usize, hint: &'static str) -> OutOfRange {
        OutOfRange {
            offset,
            len: self.r.len(),
            hint,
        }
    }
}
