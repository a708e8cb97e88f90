// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-directed payload codec.
//!
//! Encoding walks a [`Value`] together with its [`TypeDesc`] and produces
//! the canonical big-endian wire form; decoding is driven purely by the
//! descriptor, reading exactly `desc.size()` bytes from the input.
//!
//! Variants have no discriminator on the wire: on encode, the unique member
//! whose category matches the value's shape is selected, and the result is
//! zero-padded up to the variant's slot width. On decode the caller must
//! know the concrete member shape; a bare variant descriptor cannot be
//! decoded.

use crate::types::{ScalarKind, TypeDesc, Value};
use std::fmt;
use std::io::Read;

/// Errors for codec operations.
#[derive(Debug)]
pub enum CodecError {
    /// Value shape does not match the descriptor's declared category.
    TypeMismatch { expected: String, found: String },
    /// Record field count or sequence element count differs from the
    /// descriptor.
    Arity {
        type_name: String,
        expected: u64,
        got: u64,
    },
    /// Malformed variant usage.
    Shape(ShapeViolation),
    /// I/O failure on the underlying byte stream.
    Io(std::io::Error),
}

/// The ways a variant descriptor can be unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    /// More than one record member.
    MultipleRecords,
    /// More than one sequence member.
    MultipleSequences,
    /// A member is itself a variant.
    NestedVariant,
    /// No member matches the value's shape (also covers empty variants).
    NoMatchingMember { variant: String, category: String },
    /// Decoding a variant needs a concrete member shape, which the wire
    /// does not carry.
    UndecodableVariant,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::Arity {
                type_name,
                expected,
                got,
            } => write!(
                f,
                "Arity mismatch: {} expects {} children, got {}",
                type_name, expected, got
            ),
            Self::Shape(v) => write!(f, "{}", v),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleRecords => write!(f, "Variant has more than one record member"),
            Self::MultipleSequences => write!(f, "Variant has more than one sequence member"),
            Self::NestedVariant => write!(f, "Variant member may not itself be a variant"),
            Self::NoMatchingMember { variant, category } => {
                write!(f, "Variant {} has no member matching {}", variant, category)
            }
            Self::UndecodableVariant => {
                write!(f, "Cannot decode a variant without a concrete member shape")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Encode a value against its descriptor into canonical wire bytes.
///
/// Nothing is emitted on failure: the returned buffer is complete or the
/// call errors.
pub fn encode(desc: &TypeDesc, value: &Value) -> Result<Vec<u8>, CodecError> {
    let mut encoder = Encoder::new(desc.size() as usize);
    encoder.encode_value(desc, value)?;
    Ok(encoder.into_bytes())
}

/// Decode a value of the given shape from a byte stream.
///
/// Reads exactly `desc.size()` bytes; short input surfaces as an I/O error.
pub fn decode_from<R: Read>(desc: &TypeDesc, reader: &mut R) -> Result<Value, CodecError> {
    Decoder::new(reader).decode_value(desc)
}

/// Decode a value of the given shape from a byte slice.
pub fn decode(desc: &TypeDesc, bytes: &[u8]) -> Result<Value, CodecError> {
    let mut input = bytes;
    decode_from(desc, &mut input)
}

/// Wire encoder for typed payloads.
struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn encode_value(&mut self, desc: &TypeDesc, value: &Value) -> Result<(), CodecError> {
        match desc {
            TypeDesc::Variant(members) => {
                validate_variant(members)?;
                let member = members
                    .iter()
                    .find(|m| m.category() == Some(value.category()))
                    .ok_or_else(|| {
                        CodecError::Shape(ShapeViolation::NoMatchingMember {
                            variant: desc.name(),
                            category: value.category().name().to_string(),
                        })
                    })?;
                self.encode_value(member, value)?;
                // The variant slot is as wide as its widest member.
                let padding = desc.size() - member.size();
                self.buffer
                    .extend(std::iter::repeat(0u8).take(padding as usize));
                Ok(())
            }
            TypeDesc::Scalar(kind) => self.encode_scalar(*kind, value),
            TypeDesc::Record(fields) => {
                let Value::Record(children) = value else {
                    return Err(mismatch(desc, value));
                };
                if children.len() != fields.len() {
                    return Err(CodecError::Arity {
                        type_name: desc.name(),
                        expected: fields.len() as u64,
                        got: children.len() as u64,
                    });
                }
                for (field, child) in fields.iter().zip(children) {
                    self.encode_value(field, child)?;
                }
                Ok(())
            }
            TypeDesc::Sequence { element, length } => {
                let Value::Sequence(children) = value else {
                    return Err(mismatch(desc, value));
                };
                if children.len() as u64 != *length {
                    return Err(CodecError::Arity {
                        type_name: desc.name(),
                        expected: *length,
                        got: children.len() as u64,
                    });
                }
                for child in children {
                    self.encode_value(element, child)?;
                }
                Ok(())
            }
        }
    }

    fn encode_scalar(&mut self, kind: ScalarKind, value: &Value) -> Result<(), CodecError> {
        match (kind, value) {
            (ScalarKind::Char, Value::Char(v)) => self.buffer.extend(&v.to_be_bytes()),
            (ScalarKind::Int32, Value::Int32(v)) => self.buffer.extend(&v.to_be_bytes()),
            (ScalarKind::Int64, Value::Int64(v)) => self.buffer.extend(&v.to_be_bytes()),
            (ScalarKind::Float32, Value::Float32(v)) => self.buffer.extend(&v.to_be_bytes()),
            (ScalarKind::Float64, Value::Float64(v)) => self.buffer.extend(&v.to_be_bytes()),
            (ScalarKind::Bool, Value::Bool(v)) => self.buffer.push(u8::from(*v)),
            (kind, value) => {
                return Err(CodecError::TypeMismatch {
                    expected: kind.name().to_string(),
                    found: value.category().name().to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Wire decoder for typed payloads.
struct Decoder<'a, R: Read> {
    reader: &'a mut R,
}

impl<'a, R: Read> Decoder<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self { reader }
    }

    fn decode_value(&mut self, desc: &TypeDesc) -> Result<Value, CodecError> {
        match desc {
            TypeDesc::Variant(_) => Err(CodecError::Shape(ShapeViolation::UndecodableVariant)),
            TypeDesc::Scalar(kind) => self.decode_scalar(*kind),
            TypeDesc::Record(fields) => {
                let mut children = Vec::with_capacity(fields.len());
                for field in fields {
                    children.push(self.decode_value(field)?);
                }
                Ok(Value::Record(children))
            }
            TypeDesc::Sequence { element, length } => {
                let mut children = Vec::with_capacity(*length as usize);
                for _ in 0..*length {
                    children.push(self.decode_value(element)?);
                }
                Ok(Value::Sequence(children))
            }
        }
    }

    fn decode_scalar(&mut self, kind: ScalarKind) -> Result<Value, CodecError> {
        match kind {
            ScalarKind::Char => Ok(Value::Char(u16::from_be_bytes(self.read_array()?))),
            ScalarKind::Int32 => Ok(Value::Int32(i32::from_be_bytes(self.read_array()?))),
            ScalarKind::Int64 => Ok(Value::Int64(i64::from_be_bytes(self.read_array()?))),
            ScalarKind::Float32 => Ok(Value::Float32(f32::from_be_bytes(self.read_array()?))),
            ScalarKind::Float64 => Ok(Value::Float64(f64::from_be_bytes(self.read_array()?))),
            ScalarKind::Bool => {
                let [byte] = self.read_array::<1>()?;
                Ok(Value::Bool(byte != 0))
            }
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

fn mismatch(desc: &TypeDesc, value: &Value) -> CodecError {
    CodecError::TypeMismatch {
        expected: desc.name(),
        found: value.category().name().to_string(),
    }
}

/// Check the variant member constraints: at most one record, at most one
/// sequence, no nested variant.
fn validate_variant(members: &[std::sync::Arc<TypeDesc>]) -> Result<(), CodecError> {
    let mut saw_record = false;
    let mut saw_sequence = false;
    for member in members {
        match &**member {
            TypeDesc::Record(_) => {
                if saw_record {
                    return Err(CodecError::Shape(ShapeViolation::MultipleRecords));
                }
                saw_record = true;
            }
            TypeDesc::Sequence { .. } => {
                if saw_sequence {
                    return Err(CodecError::Shape(ShapeViolation::MultipleSequences));
                }
                saw_sequence = true;
            }
            TypeDesc::Variant(_) => {
                return Err(CodecError::Shape(ShapeViolation::NestedVariant));
            }
            TypeDesc::Scalar(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordBuilder;

    #[test]
    fn test_scalar_big_endian_layout() {
        let desc = TypeDesc::scalar(ScalarKind::Int32);
        let bytes = encode(&desc, &Value::Int32(0x0102_0304)).expect("encode");
        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04]);

        let desc = TypeDesc::scalar(ScalarKind::Char);
        let bytes = encode(&desc, &Value::Char(0xBEEF)).expect("encode");
        assert_eq!(bytes, [0xBE, 0xEF]);

        let desc = TypeDesc::scalar(ScalarKind::Bool);
        assert_eq!(encode(&desc, &Value::Bool(true)).expect("encode"), [1]);
        assert_eq!(encode(&desc, &Value::Bool(false)).expect("encode"), [0]);
    }

    #[test]
    fn test_round_trip_composites() {
        let desc = RecordBuilder::new()
            .scalar(ScalarKind::Int64)
            .scalar(ScalarKind::Float64)
            .sequence(TypeDesc::scalar(ScalarKind::Char), 3)
            .build();

        let value = Value::record(vec![
            Value::Int64(-7),
            Value::Float64(std::f64::consts::PI),
            Value::sequence(vec![Value::Char(1), Value::Char(2), Value::Char(3)]),
        ]);

        let encoded = encode(&desc, &value).expect("encode");
        assert_eq!(encoded.len() as u64, desc.size());

        let decoded = decode(&desc, &encoded).expect("decode");
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_round_trip_nested_record() {
        let inner = RecordBuilder::new()
            .scalar(ScalarKind::Bool)
            .scalar(ScalarKind::Int32)
            .build();
        let desc = TypeDesc::sequence(inner, 2);

        let value = Value::sequence(vec![
            Value::record(vec![Value::Bool(true), Value::Int32(10)]),
            Value::record(vec![Value::Bool(false), Value::Int32(-10)]),
        ]);

        let encoded = encode(&desc, &value).expect("encode");
        let decoded = decode(&desc, &encoded).expect("decode");
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_variant_pads_to_slot_width() {
        // Record member of 10 bytes, scalar member of 4: encoding the scalar
        // must yield its 4 bytes plus 6 zeros.
        let record = RecordBuilder::new()
            .scalar(ScalarKind::Int64)
            .scalar(ScalarKind::Char)
            .build();
        assert_eq!(record.size(), 10);
        let desc = TypeDesc::variant(vec![record, TypeDesc::scalar(ScalarKind::Int32)]);
        assert_eq!(desc.size(), 10);

        let encoded = encode(&desc, &Value::Int32(0x01020304)).expect("encode");
        assert_eq!(encoded, [0x01, 0x02, 0x03, 0x04, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_variant_resolves_by_shape() {
        let desc = TypeDesc::variant(vec![
            TypeDesc::scalar(ScalarKind::Int32),
            RecordBuilder::new().scalar(ScalarKind::Bool).build(),
            TypeDesc::sequence(TypeDesc::scalar(ScalarKind::Int64), 2),
        ]);

        let rec = encode(&desc, &Value::record(vec![Value::Bool(true)])).expect("record");
        assert_eq!(rec.len() as u64, desc.size());
        assert_eq!(rec[0], 1);

        let seq = encode(
            &desc,
            &Value::sequence(vec![Value::Int64(1), Value::Int64(2)]),
        )
        .expect("sequence");
        assert_eq!(seq.len() as u64, desc.size());
    }

    #[test]
    fn test_variant_no_matching_member() {
        let desc = TypeDesc::variant(vec![TypeDesc::scalar(ScalarKind::Int32)]);
        let err = encode(&desc, &Value::Float64(1.0)).expect_err("no member");
        assert!(matches!(
            err,
            CodecError::Shape(ShapeViolation::NoMatchingMember { .. })
        ));

        // Empty variants are rejected the same way.
        let empty = TypeDesc::variant(vec![]);
        let err = encode(&empty, &Value::Int32(1)).expect_err("empty variant");
        assert!(matches!(
            err,
            CodecError::Shape(ShapeViolation::NoMatchingMember { .. })
        ));
    }

    #[test]
    fn test_variant_invariants_rejected_at_use() {
        let two_records = TypeDesc::variant(vec![
            RecordBuilder::new().scalar(ScalarKind::Int32).build(),
            RecordBuilder::new().scalar(ScalarKind::Bool).build(),
        ]);
        let err = encode(&two_records, &Value::record(vec![Value::Int32(1)]))
            .expect_err("two records");
        assert!(matches!(
            err,
            CodecError::Shape(ShapeViolation::MultipleRecords)
        ));

        let two_sequences = TypeDesc::variant(vec![
            TypeDesc::sequence(TypeDesc::scalar(ScalarKind::Int32), 1),
            TypeDesc::sequence(TypeDesc::scalar(ScalarKind::Bool), 2),
        ]);
        let err = encode(
            &two_sequences,
            &Value::sequence(vec![Value::Int32(1)]),
        )
        .expect_err("two sequences");
        assert!(matches!(
            err,
            CodecError::Shape(ShapeViolation::MultipleSequences)
        ));

        let nested = TypeDesc::variant(vec![TypeDesc::variant(vec![TypeDesc::scalar(
            ScalarKind::Int32,
        )])]);
        let err = encode(&nested, &Value::Int32(1)).expect_err("nested variant");
        assert!(matches!(
            err,
            CodecError::Shape(ShapeViolation::NestedVariant)
        ));
    }

    #[test]
    fn test_record_arity_mismatch() {
        let desc = RecordBuilder::new()
            .scalar(ScalarKind::Int32)
            .scalar(ScalarKind::Int32)
            .build();
        let value = Value::record(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]);
        let err = encode(&desc, &value).expect_err("arity");
        assert!(matches!(
            err,
            CodecError::Arity {
                expected: 2,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_sequence_arity_mismatch() {
        let desc = TypeDesc::sequence(TypeDesc::scalar(ScalarKind::Bool), 4);
        let value = Value::sequence(vec![Value::Bool(true)]);
        let err = encode(&desc, &value).expect_err("arity");
        assert!(matches!(
            err,
            CodecError::Arity {
                expected: 4,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let desc = TypeDesc::scalar(ScalarKind::Int32);
        let err = encode(&desc, &Value::Int64(1)).expect_err("mismatch");
        match err {
            CodecError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "Int32");
                assert_eq!(found, "Int64");
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }

        let desc = RecordBuilder::new().scalar(ScalarKind::Int32).build();
        let err = encode(&desc, &Value::Int32(1)).expect_err("mismatch");
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn test_decode_bare_variant_fails() {
        let desc = TypeDesc::variant(vec![TypeDesc::scalar(ScalarKind::Int32)]);
        let err = decode(&desc, &[0, 0, 0, 1]).expect_err("bare variant");
        assert!(matches!(
            err,
            CodecError::Shape(ShapeViolation::UndecodableVariant)
        ));
    }

    #[test]
    fn test_decode_short_input() {
        let desc = TypeDesc::scalar(ScalarKind::Int64);
        let err = decode(&desc, &[1, 2, 3]).expect_err("short");
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_decode_bool_nonzero_is_true() {
        let desc = TypeDesc::scalar(ScalarKind::Bool);
        assert_eq!(decode(&desc, &[0]).expect("decode"), Value::Bool(false));
        assert_eq!(decode(&desc, &[1]).expect("decode"), Value::Bool(true));
        assert_eq!(decode(&desc, &[7]).expect("decode"), Value::Bool(true));
    }
}
