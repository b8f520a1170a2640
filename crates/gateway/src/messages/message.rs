//! Tag/value field maps and the FIX message envelope

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::tags;

/// FIX tag number
pub type Tag = u32;

/// Field access failures inside a single message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Missing field {tag}")]
    Missing { tag: Tag },

    #[error("Invalid value for field {tag}: {value:?}")]
    Invalid { tag: Tag, value: String },

    #[error("Group {tag} has {count} entries, no entry {index}")]
    GroupIndex { tag: Tag, index: usize, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Field(Tag, String),
    Group(Tag, Vec<FieldMap>),
}

/// Ordered set of fields, possibly holding repeating groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<Entry>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value for the tag
    pub fn set(&mut self, tag: Tag, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        for entry in &mut self.entries {
            if let Entry::Field(t, v) = entry {
                if *t == tag {
                    *v = value;
                    return self;
                }
            }
        }
        self.entries.push(Entry::Field(tag, value));
        self
    }

    /// Builder form of [`FieldMap::set`]
    pub fn with(mut self, tag: Tag, value: impl ToString) -> Self {
        self.set(tag, value);
        self
    }

    /// Append an entry to the repeating group counted by `count_tag`
    pub fn add_group(&mut self, count_tag: Tag, group: FieldMap) -> &mut Self {
        for entry in &mut self.entries {
            if let Entry::Group(t, groups) = entry {
                if *t == count_tag {
                    groups.push(group);
                    return self;
                }
            }
        }
        self.entries.push(Entry::Group(count_tag, vec![group]));
        self
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.entries.iter().any(|e| match e {
            Entry::Field(t, _) | Entry::Group(t, _) => *t == tag,
        })
    }

    /// Raw value of a field, if present
    pub fn get(&self, tag: Tag) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            Entry::Field(t, v) if *t == tag => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn get_str(&self, tag: Tag) -> Result<&str, FieldError> {
        self.get(tag).ok_or(FieldError::Missing { tag })
    }

    /// Single-character field (enumerations such as Side or ExecType)
    pub fn get_char(&self, tag: Tag) -> Result<char, FieldError> {
        let value = self.get_str(tag)?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(invalid(tag, value)),
        }
    }

    pub fn get_u64(&self, tag: Tag) -> Result<u64, FieldError> {
        let value = self.get_str(tag)?;
        value.parse().map_err(|_| invalid(tag, value))
    }

    pub fn get_decimal(&self, tag: Tag) -> Result<Decimal, FieldError> {
        let value = self.get_str(tag)?;
        Decimal::from_str(value).map_err(|_| invalid(tag, value))
    }

    /// FIX boolean (`Y` / `N`)
    pub fn get_bool(&self, tag: Tag) -> Result<bool, FieldError> {
        match self.get_char(tag)? {
            tags::YES => Ok(true),
            tags::NO => Ok(false),
            _ => Err(invalid(tag, self.get(tag).unwrap_or_default())),
        }
    }

    /// Number of entries in the repeating group counted by `count_tag`
    pub fn group_count(&self, count_tag: Tag) -> Result<usize, FieldError> {
        self.groups(count_tag)
            .map(|g| g.len())
            .ok_or(FieldError::Missing { tag: count_tag })
    }

    /// Group entry by 1-based index, the way FIX engines address groups
    pub fn group(&self, count_tag: Tag, index: usize) -> Result<&FieldMap, FieldError> {
        let groups = self
            .groups(count_tag)
            .ok_or(FieldError::Missing { tag: count_tag })?;
        index
            .checked_sub(1)
            .and_then(|i| groups.get(i))
            .ok_or(FieldError::GroupIndex {
                tag: count_tag,
                index,
                count: groups.len(),
            })
    }

    fn groups(&self, count_tag: Tag) -> Option<&[FieldMap]> {
        self.entries.iter().find_map(|e| match e {
            Entry::Group(t, groups) if *t == count_tag => Some(groups.as_slice()),
            _ => None,
        })
    }
}

fn invalid(tag: Tag, value: &str) -> FieldError {
    FieldError::Invalid {
        tag,
        value: value.to_string(),
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry {
                Entry::Field(tag, value) => write!(f, "{}={}|", tag, value)?,
                Entry::Group(tag, groups) => {
                    write!(f, "{}={}|", tag, groups.len())?;
                    for group in groups {
                        write!(f, "{}", group)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Application or admin message: header plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixMessage {
    header: FieldMap,
    body: FieldMap,
}

impl FixMessage {
    /// Create an empty message of the given MsgType
    pub fn new(msg_type: &str) -> Self {
        Self {
            header: FieldMap::new().with(tags::MSG_TYPE, msg_type),
            body: FieldMap::new(),
        }
    }

    pub fn from_parts(header: FieldMap, body: FieldMap) -> Self {
        Self { header, body }
    }

    /// MsgType from the header, empty if absent
    pub fn msg_type(&self) -> &str {
        self.header.get(tags::MSG_TYPE).unwrap_or_default()
    }

    pub fn header(&self) -> &FieldMap {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FieldMap {
        &mut self.header
    }

    pub fn body(&self) -> &FieldMap {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut FieldMap {
        &mut self.body
    }
}

impl fmt::Display for FixMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header, self.body)
    }
}
