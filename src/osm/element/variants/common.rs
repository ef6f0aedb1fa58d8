use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

use crate::error::Result;
use crate::osm::block::StringTable;

#[derive(Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
pub struct TagString(String);

impl Deref for TagString {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for TagString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for TagString {
    fn from(s: String) -> Self {
        TagString(s)
    }
}

impl From<&str> for TagString {
    fn from(s: &str) -> Self {
        TagString(s.to_string())
    }
}

impl fmt::Display for TagString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key to value mapping of an entity's tags. Keys are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags(HashMap<TagString, TagString>);

impl Tags {
    pub fn new(map: HashMap<TagString, TagString>) -> Self {
        Tags(map)
    }

    /// Takes an iterator of indices within the string table of the
    /// associated block, and recovers the strings at the specified
    /// indexes, to generate an associative hashmap of the tag keys and values.
    ///
    /// The iterator must yield in the order of (KeyIndex, ValueIndex).
    pub fn from_block(
        iter: impl Iterator<Item = (u64, u64)>,
        table: &StringTable,
    ) -> Result<Self> {
        iter.map(|(k, v)| Ok((table.resolve(k)?, table.resolve(v)?)))
            .collect::<Result<HashMap<_, _>>>()
            .map(Tags)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&TagString> {
        self.0.get(key)
    }

    /// The stored key and value for `key`.
    #[inline]
    pub fn entry(&self, key: &str) -> Option<(&TagString, &TagString)> {
        self.0.get_key_value(key)
    }
}

impl Deref for Tags {
    type Target = HashMap<TagString, TagString>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Into<TagString>, V: Into<TagString>> FromIterator<(K, V)> for Tags {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Tags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
