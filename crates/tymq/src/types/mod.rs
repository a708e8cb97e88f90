// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire type system: descriptors and runtime values.
//!
//! A [`TypeDesc`] describes a message's shape out of a closed set of
//! constructors (scalars, records, sequences, variants); a [`Value`] is a
//! runtime payload whose shape mirrors a descriptor 1:1. Every descriptor
//! carries a canonical byte encoding of itself ([`TypeDesc::encode`]) that
//! travels on the wire next to each payload, so the middleend can validate
//! shape without trusting the sender.

mod builder;
mod descriptor;
mod value;

pub use builder::RecordBuilder;
pub use descriptor::{Category, DescriptorError, ScalarKind, TypeDesc};
pub use value::Value;
