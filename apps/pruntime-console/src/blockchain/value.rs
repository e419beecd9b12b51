// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion of dynamically decoded storage values into JSON.
//!
//! A decoded value alone cannot tell a `Vec<u8>` from a `Vec<u32>` holding
//! small numbers, nor a one-field tuple struct from a one-element list. Each
//! node carries its type id, so the rendering asks a [`Shape`] lookup
//! (normally [`registry_shape`]) how to print composites.

use scale_info::{form::PortableForm, PortableRegistry, TypeDef, TypeDefPrimitive};
use serde_json::{json, Map, Value as Json};
use subxt::ext::scale_value::{Composite, Primitive, Value, ValueDef};

/// How an unnamed composite is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `Vec<u8>` or `[u8; N]`, printed as a `0x` hex string.
    Bytes,
    /// Any other sequence, array or tuple, always printed as a JSON array.
    List,
    /// Tuple structs. A single field is unwrapped.
    Struct,
}

/// Look up the [`Shape`] of `type_id` in the chain metadata.
///
/// Unknown ids fall back to [`Shape::Struct`].
pub fn registry_shape(types: &PortableRegistry, type_id: u32) -> Shape {
    let element_shape = |element: u32| match types.resolve(element).map(|ty| &ty.type_def) {
        Some(TypeDef::Primitive(TypeDefPrimitive::U8)) => Shape::Bytes,
        _ => Shape::List,
    };

    match types.resolve(type_id).map(|ty| &ty.type_def) {
        Some(TypeDef::<PortableForm>::Sequence(seq)) => element_shape(seq.type_param.id),
        Some(TypeDef::Array(array)) => element_shape(array.type_param.id),
        Some(TypeDef::Tuple(_)) => Shape::List,
        _ => Shape::Struct,
    }
}

/// Render a decoded SCALE value as JSON.
///
/// # Arguments
/// * `value` - Decoded value whose context identifies each node's type
/// * `shape` - Maps a node's context to its [`Shape`]
///
/// # Returns
/// JSON where:
/// - byte sequences become `0x` hex strings
/// - single-field tuple structs are unwrapped
/// - unit variants become their name, other variants `{name: fields}`
/// - integers outside the `u64`/`i64` range become decimal strings
pub fn to_json<T>(value: &Value<T>, shape: &impl Fn(&T) -> Shape) -> Json {
    match &value.value {
        ValueDef::Composite(composite) => composite_to_json(composite, shape(&value.context), shape),
        ValueDef::Variant(variant) => match &variant.values {
            Composite::Named(fields) if fields.is_empty() => Json::String(variant.name.clone()),
            Composite::Unnamed(fields) if fields.is_empty() => Json::String(variant.name.clone()),
            fields => {
                let mut object = Map::new();
                object.insert(
                    variant.name.clone(),
                    composite_to_json(fields, Shape::Struct, shape),
                );
                Json::Object(object)
            }
        },
        ValueDef::BitSequence(bits) => Json::Array(bits.iter().map(Json::Bool).collect()),
        ValueDef::Primitive(primitive) => primitive_to_json(primitive),
    }
}

fn composite_to_json<T>(
    composite: &Composite<T>,
    layout: Shape,
    shape: &impl Fn(&T) -> Shape,
) -> Json {
    match composite {
        Composite::Named(fields) => Json::Object(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), to_json(value, shape)))
                .collect::<Map<_, _>>(),
        ),
        Composite::Unnamed(fields) => match layout {
            Shape::Bytes => match as_bytes(fields) {
                Some(bytes) => Json::String(format!("0x{}", hex::encode(bytes))),
                None => list(fields, shape),
            },
            Shape::List => list(fields, shape),
            Shape::Struct => match fields.as_slice() {
                [single] => to_json(single, shape),
                _ => list(fields, shape),
            },
        },
    }
}

fn list<T>(fields: &[Value<T>], shape: &impl Fn(&T) -> Shape) -> Json {
    Json::Array(fields.iter().map(|field| to_json(field, shape)).collect())
}

fn as_bytes<T>(fields: &[Value<T>]) -> Option<Vec<u8>> {
    fields
        .iter()
        .map(|field| match &field.value {
            ValueDef::Primitive(Primitive::U128(n)) => u8::try_from(*n).ok(),
            _ => None,
        })
        .collect()
}

fn primitive_to_json(primitive: &Primitive) -> Json {
    match primitive {
        Primitive::Bool(b) => Json::Bool(*b),
        Primitive::Char(c) => Json::String(c.to_string()),
        Primitive::String(s) => Json::String(s.clone()),
        Primitive::U128(n) => match u64::try_from(*n) {
            Ok(n) => json!(n),
            Err(_) => Json::String(n.to_string()),
        },
        Primitive::I128(n) => match i64::try_from(*n) {
            Ok(n) => json!(n),
            Err(_) => Json::String(n.to_string()),
        },
        Primitive::U256(bytes) | Primitive::I256(bytes) => {
            Json::String(format!("0x{}", hex::encode(bytes)))
        }
    }
}
