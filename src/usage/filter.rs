//! Result filtering by usage category.

use crate::usage::{Tag, TagSet};

/// Which categories of usages to keep.
///
/// Every tag set falls into exactly one category, checked in the order
/// declarations, writes, reads, other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageFilter {
    /// Keep occurrences tagged `Read`.
    pub reads: bool,
    /// Keep occurrences tagged `Write` or `WritableRef`.
    pub writes: bool,
    /// Keep occurrences tagged `Declaration`.
    pub declarations: bool,
    /// Keep everything else, including unclassified occurrences.
    pub other: bool,
}

impl Default for UsageFilter {
    fn default() -> Self {
        Self {
            reads: true,
            writes: true,
            declarations: true,
            other: true,
        }
    }
}

impl UsageFilter {
    /// Whether an occurrence with these tags passes the filter.
    pub fn matches(&self, tags: TagSet) -> bool {
        if tags.has(Tag::Declaration) {
            return self.declarations;
        }
        if tags.intersects(TagSet::WRITE | TagSet::WRITABLE_REF) {
            return self.writes;
        }
        if tags.has(Tag::Read) {
            return self.reads;
        }
        self.other
    }
}
