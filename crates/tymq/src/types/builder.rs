// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder for composite type descriptors.

use crate::types::{ScalarKind, TypeDesc};
use std::sync::Arc;

/// Builder for record descriptors.
///
/// Fields are positional; the order of calls is the wire order.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<Arc<TypeDesc>>,
}

impl RecordBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar field.
    pub fn scalar(mut self, kind: ScalarKind) -> Self {
        self.fields.push(TypeDesc::scalar(kind));
        self
    }

    /// Append a field with an existing descriptor.
    pub fn field(mut self, desc: Arc<TypeDesc>) -> Self {
        self.fields.push(desc);
        self
    }

    /// Append a fixed-length sequence field.
    pub fn sequence(mut self, element: Arc<TypeDesc>, length: u64) -> Self {
        self.fields.push(TypeDesc::sequence(element, length));
        self
    }

    /// Build the record descriptor.
    pub fn build(self) -> Arc<TypeDesc> {
        TypeDesc::record(self.fields)
    }
}
