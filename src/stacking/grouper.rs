use std::ops::Range;

use crate::error::{Error, Result};

/// Contiguous slice of the frame sequence, by enumeration index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Zero-based group number, also used for output naming
    pub index: usize,
    /// Frame indices belonging to this group
    pub range: Range<usize>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Splits a frame sequence into fixed-size groups.
///
/// Boundaries depend only on the enumeration index: a frame that later fails
/// to decode still occupies its slot.
#[derive(Debug, Clone, Copy)]
pub struct BatchGrouper {
    batch_size: usize,
}

impl BatchGrouper {
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchCount {
                input: batch_size.to_string(),
            });
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether the frame at `index` closes its group in a sequence of `len`
    pub fn closes_group(&self, index: usize, len: usize) -> bool {
        index % self.batch_size == self.batch_size - 1 || index + 1 == len
    }

    /// Group number of the frame at `index`
    pub fn group_of(&self, index: usize) -> usize {
        index / self.batch_size
    }

    pub fn group_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// Walk the sequence and emit a group each time one closes
    pub fn plan(&self, len: usize) -> Vec<Group> {
        let mut groups = Vec::with_capacity(self.group_count(len));
        let mut start = 0;
        for index in 0..len {
            if self.closes_group(index, len) {
                groups.push(Group {
                    index: groups.len(),
                    range: start..index + 1,
                });
                start = index + 1;
            }
        }
        groups
    }
}
