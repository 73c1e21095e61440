//! Usage tags and their classification.
//!
//! A [`TagSet`] records how one occurrence of a symbol is used: declared,
//! read, written, passed by mutable reference and so on. The empty set is
//! a legitimate answer meaning the usage could not be judged.

pub mod classify;
pub mod filter;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub use classify::{classify, is_template_context};
pub use filter::UsageFilter;

/// One atomic usage classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// The occurrence declares or defines the symbol.
    Declaration,
    /// The value is read.
    Read,
    /// The value is assigned.
    Write,
    /// The value is passed where it may be modified indirectly.
    WritableRef,
    /// The declaration overrides a virtual function.
    Override,
    /// The declaration is exposed to the Qt meta-object system.
    MocInvokable,
    /// The declaration is templated.
    Template,
}

impl Tag {
    /// All tags in bit order.
    pub const ALL: [Tag; 7] = [
        Tag::Declaration,
        Tag::Read,
        Tag::Write,
        Tag::WritableRef,
        Tag::Override,
        Tag::MocInvokable,
        Tag::Template,
    ];

    /// Tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Declaration => "Declaration",
            Tag::Read => "Read",
            Tag::Write => "Write",
            Tag::WritableRef => "WritableRef",
            Tag::Override => "Override",
            Tag::MocInvokable => "MocInvokable",
            Tag::Template => "Template",
        }
    }

    /// The single-tag set for this tag.
    pub const fn bit(self) -> TagSet {
        match self {
            Tag::Declaration => TagSet::DECLARATION,
            Tag::Read => TagSet::READ,
            Tag::Write => TagSet::WRITE,
            Tag::WritableRef => TagSet::WRITABLE_REF,
            Tag::Override => TagSet::OVERRIDE,
            Tag::MocInvokable => TagSet::MOC_INVOKABLE,
            Tag::Template => TagSet::TEMPLATE,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Set of usage tags attached to one occurrence.
    ///
    /// Bit values are stable; [`TagSet::to_int`] is the storage format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TagSet: u8 {
        /// See [`Tag::Declaration`].
        const DECLARATION = 1 << 0;
        /// See [`Tag::Read`].
        const READ = 1 << 1;
        /// See [`Tag::Write`].
        const WRITE = 1 << 2;
        /// See [`Tag::WritableRef`].
        const WRITABLE_REF = 1 << 3;
        /// See [`Tag::Override`].
        const OVERRIDE = 1 << 4;
        /// See [`Tag::MocInvokable`].
        const MOC_INVOKABLE = 1 << 5;
        /// See [`Tag::Template`].
        const TEMPLATE = 1 << 6;
    }
}

impl TagSet {
    /// Whether `tag` is in the set.
    pub fn has(self, tag: Tag) -> bool {
        self.contains(tag.bit())
    }

    /// The tags in the set, in bit order.
    pub fn tags(self) -> impl Iterator<Item = Tag> {
        Tag::ALL.into_iter().filter(move |tag| self.has(*tag))
    }

    /// Integer bit-field for storage and transport.
    pub fn to_int(self) -> u8 {
        self.bits()
    }

    /// Rebuild from a stored bit-field, dropping unknown bits.
    pub fn from_int(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Default for TagSet {
    fn default() -> Self {
        TagSet::empty()
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        tag.bit()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TagSet::empty(), |set, tag| set | tag.bit())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(tag.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_int())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(TagSet::from_int)
    }
}

/// Display style for a search result, chosen from its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageStyle {
    /// No usage information.
    Default,
    /// Read access.
    Read,
    /// Write access, writable reference or declaration.
    Write,
}

impl UsageStyle {
    /// Pick the style for a tag set. Read wins over write.
    pub fn for_tags(tags: TagSet) -> Self {
        if tags.has(Tag::Read) {
            UsageStyle::Read
        } else if tags.intersects(TagSet::WRITE | TagSet::WRITABLE_REF | TagSet::DECLARATION) {
            UsageStyle::Write
        } else {
            UsageStyle::Default
        }
    }
}
