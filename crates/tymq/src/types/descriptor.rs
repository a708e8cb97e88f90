// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for the middleend wire type system.

use std::fmt;
use std::sync::Arc;

/// Scalar type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 16-bit character.
    Char,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
}

impl ScalarKind {
    /// Encoded size in bytes.
    pub fn size(&self) -> u64 {
        match self {
            Self::Char => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
            Self::Bool => 1,
        }
    }

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Char => "Char",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Bool => "Bool",
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Self::Char => tag::CHAR,
            Self::Int32 => tag::INT32,
            Self::Int64 => tag::INT64,
            Self::Float32 => tag::FLOAT32,
            Self::Float64 => tag::FLOAT64,
            Self::Bool => tag::BOOL,
        }
    }
}

/// Shape category of a descriptor or a runtime value.
///
/// Variant members are resolved by matching the value's category against
/// the member's category, so `Variant` itself has no category here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Scalar(ScalarKind),
    Record,
    Sequence,
}

impl Category {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Record => "Record",
            Self::Sequence => "Sequence",
        }
    }
}

/// A complete type descriptor.
///
/// Descriptors are recursive: records and variants hold member descriptors,
/// sequences hold an element descriptor. `Arc` allows sharing subtrees
/// between composite types without cloning.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// Fixed-width scalar.
    Scalar(ScalarKind),
    /// Positionally-ordered composite; field order is significant.
    Record(Vec<Arc<TypeDesc>>),
    /// Fixed-length homogeneous composite.
    Sequence { element: Arc<TypeDesc>, length: u64 },
    /// Union over member shapes, resolved by runtime shape.
    ///
    /// The member constraints (at most one record, at most one sequence,
    /// no nested variant) are enforced when the codec uses the descriptor,
    /// not at construction time.
    Variant(Vec<Arc<TypeDesc>>),
}

/// Wire tags for the descriptor encoding.
mod tag {
    pub const CHAR: u8 = 0x00;
    pub const INT32: u8 = 0x01;
    pub const INT64: u8 = 0x02;
    pub const FLOAT32: u8 = 0x03;
    pub const FLOAT64: u8 = 0x04;
    pub const BOOL: u8 = 0x05;
    pub const RECORD: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x07;
    pub const VARIANT: u8 = 0x08;
}

impl TypeDesc {
    /// Create a record descriptor.
    pub fn record(fields: Vec<Arc<TypeDesc>>) -> Arc<Self> {
        Arc::new(Self::Record(fields))
    }

    /// Create a sequence descriptor.
    pub fn sequence(element: Arc<TypeDesc>, length: u64) -> Arc<Self> {
        Arc::new(Self::Sequence { element, length })
    }

    /// Create a variant descriptor.
    pub fn variant(members: Vec<Arc<TypeDesc>>) -> Arc<Self> {
        Arc::new(Self::Variant(members))
    }

    /// Create a scalar descriptor.
    pub fn scalar(kind: ScalarKind) -> Arc<Self> {
        Arc::new(Self::Scalar(kind))
    }

    /// Encoded payload size in bytes.
    ///
    /// A variant occupies a fixed-size slot wide enough for its widest
    /// member; narrower members are zero-padded by the codec.
    pub fn size(&self) -> u64 {
        match self {
            Self::Scalar(kind) => kind.size(),
            Self::Record(fields) => fields.iter().map(|f| f.size()).sum(),
            Self::Sequence { element, length } => element.size() * length,
            Self::Variant(members) => members.iter().map(|m| m.size()).max().unwrap_or(0),
        }
    }

    /// Canonical type name. The prefix identifies the category
    /// (`Char`, `Int32`, ..., `Record`, `Sequence`, `Variant`).
    pub fn name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.name().to_string(),
            Self::Record(fields) => {
                format!("Record[{}]", join_names(fields))
            }
            Self::Sequence { element, length } => {
                format!("Sequence[{};{}]", element.name(), length)
            }
            Self::Variant(members) => {
                format!("Variant[{}]", join_names(members))
            }
        }
    }

    /// Shape category, or `None` for a variant.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Scalar(kind) => Some(Category::Scalar(*kind)),
            Self::Record(_) => Some(Category::Record),
            Self::Sequence { .. } => Some(Category::Sequence),
            Self::Variant(_) => None,
        }
    }

    /// Canonical self-describing byte form, sent alongside payloads so the
    /// remote side can validate shape independently.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Scalar(kind) => out.push(kind.tag()),
            Self::Record(fields) => {
                out.push(tag::RECORD);
                out.extend_from_slice(&(fields.len() as u32).to_be_bytes());
                for field in fields {
                    field.encode_into(out);
                }
            }
            Self::Sequence { element, length } => {
                out.push(tag::SEQUENCE);
                out.extend_from_slice(&length.to_be_bytes());
                element.encode_into(out);
            }
            Self::Variant(members) => {
                out.push(tag::VARIANT);
                out.extend_from_slice(&(members.len() as u32).to_be_bytes());
                for member in members {
                    member.encode_into(out);
                }
            }
        }
    }

    /// Decode a descriptor from its canonical byte form.
    ///
    /// The full input must be consumed; trailing bytes are an error.
    pub fn decode(bytes: &[u8]) -> Result<Arc<Self>, DescriptorError> {
        let (desc, consumed) = Self::decode_at(bytes, 0)?;
        if consumed != bytes.len() {
            return Err(DescriptorError::TrailingBytes(bytes.len() - consumed));
        }
        Ok(desc)
    }

    fn decode_at(bytes: &[u8], offset: usize) -> Result<(Arc<Self>, usize), DescriptorError> {
        let tag = *bytes.get(offset).ok_or(DescriptorError::Truncated)?;
        let mut pos = offset + 1;
        let desc = match tag {
            tag::CHAR => Self::scalar(ScalarKind::Char),
            tag::INT32 => Self::scalar(ScalarKind::Int32),
            tag::INT64 => Self::scalar(ScalarKind::Int64),
            tag::FLOAT32 => Self::scalar(ScalarKind::Float32),
            tag::FLOAT64 => Self::scalar(ScalarKind::Float64),
            tag::BOOL => Self::scalar(ScalarKind::Bool),
            tag::RECORD | tag::VARIANT => {
                let count = read_u32(bytes, pos)? as usize;
                pos += 4;
                let mut members = Vec::with_capacity(count);
                for _ in 0..count {
                    let (member, next) = Self::decode_at(bytes, pos)?;
                    members.push(member);
                    pos = next;
                }
                if tag == tag::RECORD {
                    Self::record(members)
                } else {
                    Self::variant(members)
                }
            }
            tag::SEQUENCE => {
                let length = read_u64(bytes, pos)?;
                pos += 8;
                let (element, next) = Self::decode_at(bytes, pos)?;
                pos = next;
                Self::sequence(element, length)
            }
            other => return Err(DescriptorError::UnknownTag(other)),
        };
        Ok((desc, pos))
    }
}

fn join_names(members: &[Arc<TypeDesc>]) -> String {
    members
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(",")
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, DescriptorError> {
    let raw: [u8; 4] = bytes
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(DescriptorError::Truncated)?;
    Ok(u32::from_be_bytes(raw))
}

fn read_u64(bytes: &[u8], offset: usize) -> Result<u64, DescriptorError> {
    let raw: [u8; 8] = bytes
        .get(offset..offset + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or(DescriptorError::Truncated)?;
    Ok(u64::from_be_bytes(raw))
}

/// Errors for descriptor decoding.
#[derive(Debug)]
pub enum DescriptorError {
    /// Input ended inside a descriptor.
    Truncated,
    /// Unrecognized type tag.
    UnknownTag(u8),
    /// Bytes left over after a complete descriptor.
    TrailingBytes(usize),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "Descriptor truncated"),
            Self::UnknownTag(t) => write!(f, "Unknown descriptor tag: {:#04x}", t),
            Self::TrailingBytes(n) => {
                write!(f, "Trailing bytes after descriptor: {} left over", n)
            }
        }
    }
}

impl std::error::Error for DescriptorError {}
