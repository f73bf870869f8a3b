//! Resolution of string offsets into the shared string pool.

use encoding_rs::{Encoding, WINDOWS_1252};

use super::cursor::{Cursor, OutOfRange};

/// The string pool trailing the fixed-size records of a document.
///
/// Records refer to strings by a 16-bit offset into this pool. Offset `0` is
/// reserved for the empty string.
#[derive(Debug, Clone, Copy)]
pub struct StringTable {
    position: usize,
    encoding: &'static Encoding,
}

impl StringTable {
    /// A pool at an absolute position, decoded as Latin-1 until the document
    /// declares otherwise.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            encoding: WINDOWS_1252,
        }
    }

    /// The same pool, decoded with another encoding.
    pub fn with_encoding(self, encoding: &'static Encoding) -> Self {
        Self { encoding, ..self }
    }

    /// Absolute position of the pool.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The encoding strings are decoded with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Resolve an offset with the pool's encoding.
    pub fn resolve(&self, c: &mut Cursor, offset: u16) -> Result<String, OutOfRange> {
        self.resolve_with(c, offset, None)
    }

    /// Resolve an offset, optionally overriding the pool's encoding.
    ///
    /// The result is trimmed of surrounding whitespace. The cursor position is
    /// unchanged afterward.
    pub fn resolve_with(
        &self,
        c: &mut Cursor,
        offset: u16,
        encoding: Option<&'static Encoding>,
    ) -> Result<String, OutOfRange> {
        if offset == 0 {
            return Ok(String::new());
        }

        let encoding = encoding.unwrap_or(self.encoding);

        c.excursion(self.position + usize::from(offset), "string", |c| {
            let bytes = c.read_zero_terminated_at(c.position(), "string")?;
            let (text, _) = encoding.decode_without_bom_handling(bytes);
            Ok(text.trim().to_owned())
        })
    }

    /// Read a string offset at the tip of the cursor and resolve it.
    pub fn read_next(&self, c: &mut Cursor, hint: &'static str) -> Result<String, OutOfRange> {
        let offset = c.read_u16(hint)?;
        self.resolve(c, offset)
    }
}
