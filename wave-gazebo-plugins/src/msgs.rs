//! Parameter messages exchanged between simulation components.
//!
//! A [`ParamV`] is an ordered list of named, typed values. The user-facing
//! types convert to/from the wire types for CDR serialization.

use std::fmt;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::MsgError;

/// Wire tags for [`AnyType`].
pub mod value_type {
    pub const NONE: u8 = 1;
    pub const DOUBLE: u8 = 2;
    pub const INT32: u8 = 3;
    pub const VECTOR3D: u8 = 4;
    pub const STRING: u8 = 6;
    pub const BOOLEAN: u8 = 7;
}

/// The type tag of an [`Any`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyType {
    None,
    Bool,
    Int32,
    Double,
    String,
    Vector3d,
}

impl AnyType {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::None => value_type::NONE,
            Self::Bool => value_type::BOOLEAN,
            Self::Int32 => value_type::INT32,
            Self::Double => value_type::DOUBLE,
            Self::String => value_type::STRING,
            Self::Vector3d => value_type::VECTOR3D,
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            value_type::BOOLEAN => Self::Bool,
            value_type::INT32 => Self::Int32,
            value_type::DOUBLE => Self::Double,
            value_type::STRING => Self::String,
            value_type::VECTOR3D => Self::Vector3d,
            _ => Self::None,
        }
    }
}

/// A tagged parameter value.
///
/// `String` doubles as the serialized form of every other type: a
/// `String("3")` is accepted wherever an unsigned integer is requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Any {
    #[default]
    None,
    Bool(bool),
    Int32(i32),
    Double(f64),
    String(String),
    Vector3d(DVec3),
}

impl Any {
    pub fn value_type(&self) -> AnyType {
        match self {
            Self::None => AnyType::None,
            Self::Bool(_) => AnyType::Bool,
            Self::Int32(_) => AnyType::Int32,
            Self::Double(_) => AnyType::Double,
            Self::String(_) => AnyType::String,
            Self::Vector3d(_) => AnyType::Vector3d,
        }
    }

    pub(crate) fn to_wire(&self) -> WireAny {
        let mut wire = WireAny {
            r#type: self.value_type().to_u8(),
            ..Default::default()
        };
        match self {
            Self::None => {}
            Self::Bool(v) => wire.bool_value = *v,
            Self::Int32(v) => wire.int_value = *v,
            Self::Double(v) => wire.double_value = *v,
            Self::String(v) => wire.string_value = v.clone(),
            Self::Vector3d(v) => wire.vector3d_value = v.to_array(),
        }
        wire
    }

    pub(crate) fn from_wire(wire: &WireAny) -> Self {
        match AnyType::from_u8(wire.r#type) {
            AnyType::None => Self::None,
            AnyType::Bool => Self::Bool(wire.bool_value),
            AnyType::Int32 => Self::Int32(wire.int_value),
            AnyType::Double => Self::Double(wire.double_value),
            AnyType::String => Self::String(wire.string_value.clone()),
            AnyType::Vector3d => Self::Vector3d(DVec3::from_array(wire.vector3d_value)),
        }
    }
}

/// Serialized text form, using the same conventions as SDF element values.
impl fmt::Display for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Vector3d(v) => write!(f, "{} {} {}", v.x, v.y, v.z),
        }
    }
}

impl From<bool> for Any {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Any {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<f64> for Any {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Any {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Any {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<DVec3> for Any {
    fn from(v: DVec3) -> Self {
        Self::Vector3d(v)
    }
}

/// 2-vectors travel as a `Vector3d` with `z = 0`.
impl From<DVec2> for Any {
    fn from(v: DVec2) -> Self {
        Self::Vector3d(v.extend(0.0))
    }
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: Any,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<Any>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub(crate) fn to_wire(&self) -> WireParam {
        WireParam {
            name: self.name.clone(),
            value: self.value.to_wire(),
        }
    }

    pub(crate) fn from_wire(wire: &WireParam) -> Self {
        Self {
            name: wire.name.clone(),
            value: Any::from_wire(&wire.value),
        }
    }
}

/// An ordered collection of parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamV {
    pub params: Vec<Param>,
}

impl ParamV {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping any earlier entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Any>) {
        self.params.push(Param::new(name, value));
    }

    /// Replace the first entry with this name, or append if there is none.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Any>) {
        let param = Param::new(name, value);
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => existing.value = param.value,
            None => self.params.push(param),
        }
    }

    /// First parameter with the given name, in message order.
    pub fn find(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encode as little-endian CDR with encapsulation header.
    pub fn to_cdr(&self) -> Result<Vec<u8>, MsgError> {
        let wire = WireParamV {
            param: self.params.iter().map(Param::to_wire).collect(),
        };
        Ok(cdr::serialize::<_, _, cdr::CdrLe>(&wire, cdr::Infinite)?)
    }

    pub fn from_cdr(bytes: &[u8]) -> Result<Self, MsgError> {
        let wire: WireParamV = cdr::deserialize(bytes)?;
        Ok(Self {
            params: wire.param.iter().map(Param::from_wire).collect(),
        })
    }
}

impl FromIterator<Param> for ParamV {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

// Wire format

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireAny {
    pub r#type: u8,
    pub double_value: f64,
    pub int_value: i32,
    pub string_value: String,
    pub bool_value: bool,
    pub vector3d_value: [f64; 3],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireParam {
    pub name: String,
    pub value: WireAny,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct WireParamV {
    pub param: Vec<WireParam>,
}
