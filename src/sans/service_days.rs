//! Service-day bitmasks, anchoring journey times to a calendar day.

use super::{
    cursor::{Cursor, OutOfRange},
    strings::StringTable,
};

/// The decoded service-day entry of one journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDays {
    /// Human-readable operating days, e.g. "daily" or "not 24. Dec".
    pub text: String,
    /// Days after the document's base date on which the journey runs first.
    pub day_offset: u32,
}

/// The service-day area. Each entry is a text offset, a bit base and a bit
/// length, followed by that many bitmask bytes.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDayTable {
    position: usize,
}

impl ServiceDayTable {
    /// A service-day area at an absolute position.
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    /// Resolve the entry at an offset. The cursor position is unchanged
    /// afterward.
    ///
    /// The day offset is the index of the first set bit, counting from the
    /// most significant bit of the first byte and starting at `8 * base`.
    /// Bytes after the first non-zero one are not read.
    pub fn resolve(
        &self,
        c: &mut Cursor,
        strings: &StringTable,
        offset: u16,
    ) -> Result<ServiceDays, OutOfRange> {
        c.excursion(self.position + usize::from(offset), "service days", |c| {
            let text = strings.read_next(c, "service days text")?;
            let base = c.read_u16("service bit base")?;
            let length = c.read_u16("service bit length")?;

            let mut day_offset = 8 * u32::from(base);
            for _ in 0..length {
                match c.read_u8("service bits")? {
                    0 => day_offset += 8,
                    bits => {
                        day_offset += bits.leading_zeros();
                        break;
                    }
                }
            }

            Ok(ServiceDays { text, day_offset })
        })
    }
}
