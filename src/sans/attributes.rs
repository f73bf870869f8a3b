//! Comment blocks and key/value attribute chains.

use super::{
    cursor::{Cursor, OutOfRange},
    strings::StringTable,
};

/// Key/value pairs attached to a journey or a journey part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// The value of the first pair with a key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Key/value pairs in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the chain was empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The attribute area. Chains are addressed in units of 4 bytes.
#[derive(Debug, Clone, Copy)]
pub struct AttributeTable {
    position: usize,
}

impl AttributeTable {
    /// An attribute area at an absolute position.
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    /// Read the chain at an index, up to its terminating empty key.
    pub fn chain(
        &self,
        c: &mut Cursor,
        strings: &StringTable,
        index: u16,
    ) -> Result<Attributes, OutOfRange> {
        let offset = self.position + 4 * usize::from(index);

        c.excursion(offset, "attribute chain", |c| {
            let mut pairs = Vec::new();

            loop {
                let key = strings.read_next(c, "attribute key")?;
                if key.is_empty() {
                    break;
                }

                let value = strings.read_next(c, "attribute value")?;
                pairs.push((key, value));
            }

            Ok(Attributes(pairs))
        })
    }
}

/// The comment area. Each block is a count followed by string offsets.
#[derive(Debug, Clone, Copy)]
pub struct CommentTable {
    position: usize,
}

impl CommentTable {
    /// A comment area at an absolute position.
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    /// Read the non-empty comments of the block at an offset.
    pub fn read(
        &self,
        c: &mut Cursor,
        strings: &StringTable,
        offset: u16,
    ) -> Result<Vec<String>, OutOfRange> {
        c.excursion(self.position + usize::from(offset), "comment block", |c| {
            let count = c.read_u16("comment count")?;

            let mut comments = Vec::with_capacity(count.into());
            for _ in 0..count {
                let comment = strings.read_next(c, "comment")?;
                if !comment.is_empty() {
                    comments.push(comment);
                }
            }

            Ok(comments)
        })
    }
}
