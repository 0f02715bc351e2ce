//! The atomic unit of a delta.
//!
//! An op is one of three things:
//! - Insert: "put this text (or this embed) here, with these attributes"
//! - Retain: "keep the next N units, optionally reformatting them"
//! - Delete: "remove the next N units"
//!
//! Lengths are counted in units: one per `char` of text, exactly one per
//! embed. Ops are values; every operation here returns a new op.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::attributes::Attributes;
use crate::attributes::EMPTY_ATTRIBUTES;
use crate::error::Error;
use crate::error::Result;

/// Length of the synthetic retain an exhausted iterator yields.
pub const UNBOUNDED: usize = usize::MAX;

/// Largest count a stored retain or delete may carry. Anything larger would
/// be mistaken for [`UNBOUNDED`].
pub const MAX_LEN: usize = UNBOUNDED - 1;

/// Stand-in for an embed when a document is rendered as plain text.
pub const EMBED_CHAR: char = '!';

/// The character that terminates a line.
pub const LINE_BREAK: char = '\n';

/// An atomic, non-text insert such as an image: a single key naming the
/// embed type and an opaque payload, e.g. `{"image": {"src": "..."}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub struct Embed {
    kind: String,
    payload: serde_json::Value,
}

impl Embed {
    pub fn new(kind: impl Into<String>, payload: impl Into<serde_json::Value>) -> Embed {
        return Embed {
            kind: kind.into(),
            payload: payload.into(),
        };
    }

    /// The single key identifying the embed type.
    pub fn kind(&self) -> &str {
        return &self.kind;
    }

    pub fn payload(&self) -> &serde_json::Value {
        return &self.payload;
    }
}

impl TryFrom<serde_json::Value> for Embed {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Embed> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::InvalidEmbed(format!("expected an object, got {}", other)));
            }
        };
        if map.len() != 1 {
            return Err(Error::InvalidEmbed(format!(
                "expected exactly one key, got {}",
                map.len()
            )));
        }

        let Some((kind, payload)) = map.into_iter().next() else {
            return Err(Error::InvalidEmbed("expected exactly one key, got 0".to_string()));
        };
        return Ok(Embed { kind, payload });
    }
}

impl From<Embed> for serde_json::Value {
    fn from(embed: Embed) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(embed.kind, embed.payload);
        return serde_json::Value::Object(map);
    }
}

/// What an insert puts into the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    Embed(Embed),
}

impl fmt::Display for Insert {
    /// Plain text: the text itself, or [`EMBED_CHAR`] for an embed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Insert::Text(text) => f.write_str(text),
            Insert::Embed(_) => write!(f, "{}", EMBED_CHAR),
        };
    }
}

impl Insert {
    /// Character count for text, 1 for an embed.
    pub fn len(&self) -> usize {
        return match self {
            Insert::Text(text) => text.chars().count(),
            Insert::Embed(_) => 1,
        };
    }

    pub fn is_empty(&self) -> bool {
        return match self {
            Insert::Text(text) => text.is_empty(),
            Insert::Embed(_) => false,
        };
    }

    pub fn as_text(&self) -> Option<&str> {
        return match self {
            Insert::Text(text) => Some(text),
            Insert::Embed(_) => None,
        };
    }

    pub fn as_embed(&self) -> Option<&Embed> {
        return match self {
            Insert::Text(_) => None,
            Insert::Embed(embed) => Some(embed),
        };
    }
}

impl From<&str> for Insert {
    fn from(text: &str) -> Self {
        return Insert::Text(text.to_string());
    }
}

impl From<String> for Insert {
    fn from(text: String) -> Self {
        return Insert::Text(text);
    }
}

impl From<Embed> for Insert {
    fn from(embed: Embed) -> Self {
        return Insert::Embed(embed);
    }
}

impl TryFrom<serde_json::Value> for Insert {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Insert> {
        return match value {
            serde_json::Value::String(text) => Ok(Insert::Text(text)),
            other => Ok(Insert::Embed(Embed::try_from(other)?)),
        };
    }
}

impl From<Insert> for serde_json::Value {
    fn from(insert: Insert) -> serde_json::Value {
        return match insert {
            Insert::Text(text) => serde_json::Value::String(text),
            Insert::Embed(embed) => embed.into(),
        };
    }
}

/// Filter for [`Op::is_insert_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Embed,
}

/// The three op variants, without their payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Insert,
    Retain,
    Delete,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        return match self {
            OpKind::Insert => "insert",
            OpKind::Retain => "retain",
            OpKind::Delete => "delete",
        };
    }
}

impl TryFrom<&str> for OpKind {
    type Error = Error;

    fn try_from(kind: &str) -> Result<OpKind> {
        return match kind {
            "insert" => Ok(OpKind::Insert),
            "retain" => Ok(OpKind::Retain),
            "delete" => Ok(OpKind::Delete),
            other => Err(Error::InvalidType(other.to_string())),
        };
    }
}

/// A single operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OpRecord", into = "OpRecord")]
pub enum Op {
    Insert { value: Insert, attributes: Attributes },
    Retain { len: usize, attributes: Attributes },
    Delete { len: usize },
}

impl Op {
    pub fn insert(value: impl Into<Insert>, attributes: Attributes) -> Op {
        return Op::Insert {
            value: value.into(),
            attributes,
        };
    }

    pub fn retain(len: usize, attributes: Attributes) -> Op {
        return Op::Retain { len, attributes };
    }

    pub fn delete(len: usize) -> Op {
        return Op::Delete { len };
    }

    /// The end-of-sequence marker: a retain that never runs out.
    pub(crate) fn unbounded() -> Op {
        return Op::Retain {
            len: UNBOUNDED,
            attributes: Attributes::new(),
        };
    }

    /// Build an op from loosely-typed parts, as a parser would.
    ///
    /// Fails on an unknown `kind`, a retain or delete whose value is not an
    /// integer in `0..=MAX_LEN`, an insert value that is neither a string nor a
    /// single-key object, or attributes that are not a flat map.
    pub fn new(
        kind: &str,
        value: serde_json::Value,
        attributes: Option<serde_json::Value>,
    ) -> Result<Op> {
        let kind = OpKind::try_from(kind)?;
        let attributes = match attributes {
            Some(raw) => Attributes::try_from(raw)?,
            None => Attributes::new(),
        };

        return match kind {
            OpKind::Insert => Ok(Op::Insert {
                value: Insert::try_from(value)?,
                attributes,
            }),
            OpKind::Retain => Ok(Op::Retain {
                len: parse_len(kind, &value)?,
                attributes,
            }),
            OpKind::Delete => {
                if !attributes.is_empty() {
                    return Err(Error::InvalidAttributes(
                        "delete cannot carry attributes".to_string(),
                    ));
                }
                Ok(Op::Delete {
                    len: parse_len(kind, &value)?,
                })
            }
        };
    }

    pub fn kind(&self) -> OpKind {
        return match self {
            Op::Insert { .. } => OpKind::Insert,
            Op::Retain { .. } => OpKind::Retain,
            Op::Delete { .. } => OpKind::Delete,
        };
    }

    /// Number of units this op covers.
    pub fn len(&self) -> usize {
        return match self {
            Op::Insert { value, .. } => value.len(),
            Op::Retain { len, .. } => *len,
            Op::Delete { len } => *len,
        };
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    #[inline]
    pub fn is_insert(&self) -> bool {
        return matches!(self, Op::Insert { .. });
    }

    /// True for an insert whose content is of the requested kind.
    pub fn is_insert_of(&self, kind: ContentKind) -> bool {
        return match (self, kind) {
            (Op::Insert { value: Insert::Text(_), .. }, ContentKind::Text) => true,
            (Op::Insert { value: Insert::Embed(_), .. }, ContentKind::Embed) => true,
            _ => false,
        };
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        return self.is_insert_of(ContentKind::Text);
    }

    #[inline]
    pub fn is_embed(&self) -> bool {
        return self.is_insert_of(ContentKind::Embed);
    }

    #[inline]
    pub fn is_retain(&self) -> bool {
        return matches!(self, Op::Retain { .. });
    }

    #[inline]
    pub fn is_delete(&self) -> bool {
        return matches!(self, Op::Delete { .. });
    }

    /// The inserted content, if this is an insert.
    pub fn value(&self) -> Option<&Insert> {
        return match self {
            Op::Insert { value, .. } => Some(value),
            _ => None,
        };
    }

    /// Attributes of this op; always empty for deletes.
    pub fn attributes(&self) -> &Attributes {
        return match self {
            Op::Insert { attributes, .. } => attributes,
            Op::Retain { attributes, .. } => attributes,
            Op::Delete { .. } => &EMPTY_ATTRIBUTES,
        };
    }

    pub fn has_attributes(&self) -> bool {
        return !self.attributes().is_empty();
    }

    /// The sub-op covering units `[start, start + len)`.
    ///
    /// Text is split by character; retains and deletes clamp to what is
    /// left after `start`. An embed only admits the whole-unit slice
    /// `(0, 1)`; anything else is an error.
    pub fn slice(&self, start: usize, len: usize) -> Result<Op> {
        if self.is_embed() && !(start == 0 && len == 1) {
            return Err(Error::EmbedSlice { start, len });
        }
        return Ok(self.split(start, len));
    }

    /// Clamp a retain or delete count to [`MAX_LEN`].
    pub(crate) fn bounded(self) -> Op {
        return match self {
            Op::Retain { len, attributes } if len > MAX_LEN => Op::Retain {
                len: MAX_LEN,
                attributes,
            },
            Op::Delete { len } if len > MAX_LEN => Op::Delete { len: MAX_LEN },
            op => op,
        };
    }

    /// Infallible slice for callers that never cut an embed.
    pub(crate) fn split(&self, start: usize, len: usize) -> Op {
        return match self {
            Op::Insert { value: Insert::Text(text), attributes } => Op::Insert {
                value: Insert::Text(char_range(text, start, len).to_string()),
                attributes: attributes.clone(),
            },
            Op::Insert { value: Insert::Embed(_), .. } => {
                debug_assert!(start == 0 && len >= 1, "embeds are indivisible");
                self.clone()
            }
            Op::Retain { len: count, attributes } => Op::Retain {
                len: count.saturating_sub(start).min(len),
                attributes: attributes.clone(),
            },
            Op::Delete { len: count } => Op::Delete {
                len: count.saturating_sub(start).min(len),
            },
        };
    }
}

/// Bytes taken up by the first `chars` characters of `text`, clamped.
pub(crate) fn byte_len(text: &str, chars: usize) -> usize {
    return text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i);
}

/// The substring covering characters `[start, start + len)`, clamped.
pub(crate) fn char_range(text: &str, start: usize, len: usize) -> &str {
    let mut boundaries = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));

    let Some(begin) = boundaries.nth(start) else {
        return "";
    };
    if len == 0 {
        return &text[begin..begin];
    }
    let end = boundaries.nth(len - 1).unwrap_or(text.len());
    return &text[begin..end];
}

fn parse_len(kind: OpKind, value: &serde_json::Value) -> Result<usize> {
    return value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|&n| n <= MAX_LEN)
        .ok_or_else(|| Error::InvalidLength {
            kind: kind.as_str(),
            value: value.to_string(),
        });
}

impl fmt::Display for Op {
    /// `insert="abc" {bold: true}`, `retain=3`, `delete=4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Insert { value: Insert::Text(text), .. } => write!(f, "insert={:?}", text)?,
            Op::Insert { value: Insert::Embed(embed), .. } => {
                write!(f, "insert={}", serde_json::Value::from(embed.clone()))?
            }
            Op::Retain { len, .. } => write!(f, "retain={}", len)?,
            Op::Delete { len } => write!(f, "delete={}", len)?,
        }
        if self.has_attributes() {
            write!(f, " {}", self.attributes())?;
        }
        return Ok(());
    }
}

/// The wire record: exactly one of `insert`/`retain`/`delete`, plus
/// `attributes` when there are any.
#[derive(Serialize, Deserialize)]
struct OpRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    insert: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retain: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<serde_json::Value>,
}

impl TryFrom<OpRecord> for Op {
    type Error = Error;

    fn try_from(record: OpRecord) -> Result<Op> {
        let OpRecord { insert, retain, delete, attributes } = record;
        let (kind, value) = match (insert, retain, delete) {
            (Some(value), None, None) => (OpKind::Insert, value),
            (None, Some(value), None) => (OpKind::Retain, value),
            (None, None, Some(value)) => (OpKind::Delete, value),
            _ => return Err(Error::AmbiguousType),
        };
        return Op::new(kind.as_str(), value, attributes);
    }
}

impl From<Op> for OpRecord {
    fn from(op: Op) -> OpRecord {
        let mut record = OpRecord {
            insert: None,
            retain: None,
            delete: None,
            attributes: None,
        };

        let attributes = match op {
            Op::Insert { value, attributes } => {
                record.insert = Some(value.into());
                attributes
            }
            Op::Retain { len, attributes } => {
                record.retain = Some(serde_json::Value::from(len as u64));
                attributes
            }
            Op::Delete { len } => {
                record.delete = Some(serde_json::Value::from(len as u64));
                Attributes::new()
            }
        };

        if !attributes.is_empty() {
            let map = attributes
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
                .collect();
            record.attributes = Some(serde_json::Value::Object(map));
        }
        return record;
    }
}
