//! Typed parameter extraction from SDF elements and `Param_V` messages.
//!
//! Every lookup takes a caller-supplied default. A missing parameter is not
//! an error: the default is returned. A parameter that is present but does
//! not convert to the requested type is a [`ParamError::ParseMismatch`]:
//!
//! - the `try_*` functions return it to the caller;
//! - the named accessors ([`sdf_param_double`], [`msg_param_vector2`], ...)
//!   log a warning and fall back to the default.
//!
//! ```
//! use wave_gazebo_plugins::sdf::Element;
//! use wave_gazebo_plugins::utilities::sdf_param_double;
//!
//! let sdf = Element::parse("<plugin><damping>0.5</damping></plugin>").unwrap();
//! assert_eq!(sdf_param_double(&sdf, "damping", 1.0), 0.5);
//! assert_eq!(sdf_param_double(&sdf, "drag", 1.0), 1.0);
//! ```

use std::fmt;

use glam::{DVec2, DVec3};

use crate::error::{ParamError, Result};
use crate::msgs::{Any, ParamV};
use crate::sdf::Element;

/// A value type that can be extracted from an SDF element or a message.
pub trait TypedParam: Sized + Clone + fmt::Debug {
    /// Human readable type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Parse the text form used by SDF element values.
    fn parse_text(text: &str) -> Option<Self>;

    /// Convert from the native message representation of this type.
    fn from_any(value: &Any) -> Option<Self>;
}

impl TypedParam for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_text(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn from_any(value: &Any) -> Option<Self> {
        match value {
            Any::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl TypedParam for usize {
    const TYPE_NAME: &'static str = "size_t";

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn from_any(value: &Any) -> Option<Self> {
        match value {
            Any::Int32(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// Only finite values are accepted; `nan` and `inf` are mismatches.
impl TypedParam for f64 {
    const TYPE_NAME: &'static str = "double";

    fn parse_text(text: &str) -> Option<Self> {
        parse_finite(text)
    }

    /// `Int32` widens losslessly, so integer literals work for doubles.
    fn from_any(value: &Any) -> Option<Self> {
        match value {
            Any::Double(v) if v.is_finite() => Some(*v),
            Any::Int32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

impl TypedParam for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_text(text: &str) -> Option<Self> {
        Some(text.trim().to_string())
    }

    fn from_any(value: &Any) -> Option<Self> {
        match value {
            Any::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl TypedParam for DVec2 {
    const TYPE_NAME: &'static str = "Vector2d";

    fn parse_text(text: &str) -> Option<Self> {
        parse_components::<2>(text).map(DVec2::from_array)
    }

    /// Messages carry 2-vectors as a `Vector3d`; `z` is dropped.
    fn from_any(value: &Any) -> Option<Self> {
        match value {
            Any::Vector3d(v) if v.is_finite() => Some(v.truncate()),
            _ => None,
        }
    }
}

impl TypedParam for DVec3 {
    const TYPE_NAME: &'static str = "Vector3d";

    fn parse_text(text: &str) -> Option<Self> {
        parse_components::<3>(text).map(DVec3::from_array)
    }

    fn from_any(value: &Any) -> Option<Self> {
        match value {
            Any::Vector3d(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

/// Exactly `N` whitespace separated finite doubles.
fn parse_components<const N: usize>(text: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut tokens = text.split_whitespace();
    for slot in out.iter_mut() {
        *slot = parse_finite(tokens.next()?)?;
    }
    tokens.next().is_none().then_some(out)
}

/// Look up a child element and convert its value, without defaulting.
pub fn lookup_sdf<T: TypedParam>(sdf: &Element, name: &str) -> Result<T> {
    let elem = sdf.get_element(name).ok_or_else(|| ParamError::NotFound {
        name: name.to_string(),
    })?;
    // An empty element such as `<model/>` reads as the empty string.
    let text = elem.value().unwrap_or("");
    T::parse_text(text).ok_or_else(|| ParamError::ParseMismatch {
        name: name.to_string(),
        expected: T::TYPE_NAME,
        found: text.to_string(),
    })
}

/// Look up a message entry and convert its value, without defaulting.
///
/// The native representation is tried first, then a `String` value is
/// parsed as serialized text.
pub fn lookup_msg<T: TypedParam>(msg: &ParamV, name: &str) -> Result<T> {
    let param = msg.find(name).ok_or_else(|| ParamError::NotFound {
        name: name.to_string(),
    })?;
    T::from_any(&param.value)
        .or_else(|| match &param.value {
            Any::String(text) => T::parse_text(text),
            _ => None,
        })
        .ok_or_else(|| ParamError::ParseMismatch {
            name: name.to_string(),
            expected: T::TYPE_NAME,
            found: format!("{:?}", param.value),
        })
}

fn resolve<T: TypedParam>(name: &str, lookup: Result<T>, default: T) -> Result<T> {
    match lookup {
        Ok(value) => {
            tracing::debug!("Parameter found - setting <{}> to <{:?}>", name, value);
            Ok(value)
        }
        Err(ParamError::NotFound { .. }) => {
            tracing::debug!(
                "Parameter <{}> not found: using default value of <{:?}>",
                name,
                default
            );
            Ok(default)
        }
        Err(e) => Err(e),
    }
}

fn or_default<T: TypedParam>(result: Result<T>, default: T) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("{}: using default value of <{:?}>", e, default);
        default
    })
}

/// Extract a named parameter from an SDF element, surfacing type mismatches.
pub fn try_sdf_param<T: TypedParam>(sdf: &Element, name: &str, default: T) -> Result<T> {
    resolve(name, lookup_sdf(sdf, name), default)
}

/// Extract a named parameter from a message, surfacing type mismatches.
pub fn try_msg_param<T: TypedParam>(msg: &ParamV, name: &str, default: T) -> Result<T> {
    resolve(name, lookup_msg(msg, name), default)
}

/// Extract a named parameter from an SDF element.
///
/// Returns `default` when the element is missing or its value does not
/// parse as `T`.
pub fn sdf_param<T: TypedParam>(sdf: &Element, name: &str, default: T) -> T {
    or_default(try_sdf_param(sdf, name, default.clone()), default)
}

/// Extract a named parameter from a message.
///
/// Returns `default` when the entry is missing or its value does not
/// convert to `T`.
pub fn msg_param<T: TypedParam>(msg: &ParamV, name: &str, default: T) -> T {
    or_default(try_msg_param(msg, name, default.clone()), default)
}

/// A source of named parameters: an SDF element or a message.
pub trait ParamSource {
    fn try_param<T: TypedParam>(&self, name: &str, default: T) -> Result<T>;

    fn param<T: TypedParam>(&self, name: &str, default: T) -> T {
        or_default(self.try_param(name, default.clone()), default)
    }
}

impl ParamSource for Element {
    fn try_param<T: TypedParam>(&self, name: &str, default: T) -> Result<T> {
        try_sdf_param(self, name, default)
    }
}

impl ParamSource for ParamV {
    fn try_param<T: TypedParam>(&self, name: &str, default: T) -> Result<T> {
        try_msg_param(self, name, default)
    }
}

/// Extract a named bool parameter from an SDF element.
pub fn sdf_param_bool(sdf: &Element, name: &str, default: bool) -> bool {
    sdf_param(sdf, name, default)
}

/// Extract a named size_t parameter from an SDF element.
pub fn sdf_param_size_t(sdf: &Element, name: &str, default: usize) -> usize {
    sdf_param(sdf, name, default)
}

/// Extract a named double parameter from an SDF element.
pub fn sdf_param_double(sdf: &Element, name: &str, default: f64) -> f64 {
    sdf_param(sdf, name, default)
}

/// Extract a named string parameter from an SDF element.
pub fn sdf_param_string(sdf: &Element, name: &str, default: &str) -> String {
    sdf_param(sdf, name, default.to_string())
}

/// Extract a named Vector2d parameter (`"x y"`) from an SDF element.
pub fn sdf_param_vector2(sdf: &Element, name: &str, default: DVec2) -> DVec2 {
    sdf_param(sdf, name, default)
}

/// Extract a named Vector3d parameter (`"x y z"`) from an SDF element.
pub fn sdf_param_vector3(sdf: &Element, name: &str, default: DVec3) -> DVec3 {
    sdf_param(sdf, name, default)
}

/// Extract a named bool parameter from a `Param_V` message.
pub fn msg_param_bool(msg: &ParamV, name: &str, default: bool) -> bool {
    msg_param(msg, name, default)
}

/// Extract a named size_t parameter from a `Param_V` message.
pub fn msg_param_size_t(msg: &ParamV, name: &str, default: usize) -> usize {
    msg_param(msg, name, default)
}

/// Extract a named double parameter from a `Param_V` message.
pub fn msg_param_double(msg: &ParamV, name: &str, default: f64) -> f64 {
    msg_param(msg, name, default)
}

/// Extract a named string parameter from a `Param_V` message.
pub fn msg_param_string(msg: &ParamV, name: &str, default: &str) -> String {
    msg_param(msg, name, default.to_string())
}

/// Extract a named Vector2d parameter from a `Param_V` message.
pub fn msg_param_vector2(msg: &ParamV, name: &str, default: DVec2) -> DVec2 {
    msg_param(msg, name, default)
}

/// Extract a named Vector3d parameter from a `Param_V` message.
pub fn msg_param_vector3(msg: &ParamV, name: &str, default: DVec3) -> DVec3 {
    msg_param(msg, name, default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(children: &[(&str, &str)]) -> Element {
        children.iter().fold(Element::new("plugin"), |root, (k, v)| {
            root.with_child(Element::new(*k).with_value(*v))
        })
    }

    #[test]
    fn test_bool_text_forms() {
        for (text, expected) in [
            ("true", true),
            ("TRUE", true),
            (" 1 ", true),
            ("false", false),
            ("False", false),
            ("0", false),
        ] {
            assert_eq!(bool::parse_text(text), Some(expected), "{text:?}");
        }
        assert_eq!(bool::parse_text("yes"), None);
        assert_eq!(bool::parse_text(""), None);
    }

    #[test]
    fn test_size_t_text_forms() {
        assert_eq!(usize::parse_text("3"), Some(3));
        assert_eq!(usize::parse_text(" +12\n"), Some(12));
        assert_eq!(usize::parse_text("-1"), None);
        assert_eq!(usize::parse_text("2.5"), None);
    }

    #[test]
    fn test_vector_component_count() {
        assert_eq!(DVec2::parse_text("1.0 2.0"), Some(DVec2::new(1.0, 2.0)));
        assert_eq!(DVec2::parse_text("  1\t2 \n"), Some(DVec2::new(1.0, 2.0)));
        assert_eq!(DVec2::parse_text("1.0"), None);
        assert_eq!(DVec2::parse_text("1.0 2.0 3.0"), None);
        assert_eq!(
            DVec3::parse_text("0 -1 2.5e1"),
            Some(DVec3::new(0.0, -1.0, 25.0))
        );
        assert_eq!(DVec3::parse_text("0 x 1"), None);
    }

    #[test]
    fn test_sdf_damping_present_and_absent() {
        let sdf = plugin(&[("damping", "0.5")]);
        assert_eq!(sdf_param_double(&sdf, "damping", 1.0), 0.5);

        let empty = plugin(&[]);
        assert_eq!(sdf_param_double(&empty, "damping", 1.0), 1.0);
    }

    #[test]
    fn test_sdf_string_is_trimmed() {
        let sdf = plugin(&[("model", "  PMS \n")]);
        assert_eq!(sdf_param_string(&sdf, "model", "CWR"), "PMS");
    }

    #[test]
    fn test_sdf_empty_element() {
        let sdf = Element::new("plugin").with_child(Element::new("model"));
        assert_eq!(sdf_param_string(&sdf, "model", "CWR"), "");
        assert_eq!(sdf_param_double(&sdf, "model", 2.0), 2.0);
    }

    #[test]
    fn test_sdf_mismatch_policy() {
        let sdf = plugin(&[("number", "three")]);
        assert_eq!(sdf_param_size_t(&sdf, "number", 1), 1);

        let err = try_sdf_param(&sdf, "number", 1usize).unwrap_err();
        assert_eq!(
            err,
            ParamError::ParseMismatch {
                name: "number".to_string(),
                expected: "size_t",
                found: "three".to_string(),
            }
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_lookup_reports_not_found() {
        let sdf = plugin(&[]);
        let err = lookup_sdf::<f64>(&sdf, "tau").unwrap_err();
        assert!(err.is_not_found());

        let msg = ParamV::new();
        assert!(lookup_msg::<f64>(&msg, "tau").unwrap_err().is_not_found());
    }

    #[test]
    fn test_msg_native_values() {
        let mut msg = ParamV::new();
        msg.insert("static", true);
        msg.insert("number", 3);
        msg.insert("period", 5.0);
        msg.insert("model", "PMS");
        msg.insert("direction", DVec3::new(0.6, 0.8, 1.0));

        assert!(msg_param_bool(&msg, "static", false));
        assert_eq!(msg_param_size_t(&msg, "number", 1), 3);
        assert_eq!(msg_param_double(&msg, "period", 1.0), 5.0);
        assert_eq!(msg_param_string(&msg, "model", "CWR"), "PMS");
        assert_eq!(
            msg_param_vector2(&msg, "direction", DVec2::X),
            DVec2::new(0.6, 0.8)
        );
        assert_eq!(
            msg_param_vector3(&msg, "direction", DVec3::ZERO),
            DVec3::new(0.6, 0.8, 1.0)
        );
    }

    #[test]
    fn test_msg_serialized_values() {
        let mut msg = ParamV::new();
        msg.insert("size", "3");
        msg.insert("offset", "1.0 2.0");
        msg.insert("flag", "1");

        assert_eq!(msg_param_size_t(&msg, "size", 0), 3);
        assert_eq!(
            msg_param_vector2(&msg, "offset", DVec2::ZERO),
            DVec2::new(1.0, 2.0)
        );
        assert!(msg_param_bool(&msg, "flag", false));
    }

    #[test]
    fn test_msg_type_mismatch() {
        let mut msg = ParamV::new();
        msg.insert("number", -2);
        msg.insert("period", 5);
        msg.insert("model", 1.5);

        assert_eq!(msg_param_size_t(&msg, "number", 1), 1);
        assert_eq!(msg_param_string(&msg, "model", "CWR"), "CWR");

        // Doubles do not narrow to integers.
        let err = try_msg_param(&msg, "model", 1usize).unwrap_err();
        assert!(matches!(
            err,
            ParamError::ParseMismatch { expected: "size_t", .. }
        ));
    }

    #[test]
    fn test_msg_int32_widens_to_double() {
        let mut msg = ParamV::new();
        msg.insert("period", 8);
        msg.insert("phase", i32::MIN);
        assert_eq!(msg_param_double(&msg, "period", 1.0), 8.0);
        assert_eq!(msg_param_double(&msg, "phase", 0.0), -2147483648.0);
    }

    #[test]
    fn test_non_finite_doubles_are_mismatches() {
        for text in ["nan", "NaN", "inf", "-infinity"] {
            assert_eq!(f64::parse_text(text), None, "{text:?}");
        }
        assert_eq!(DVec2::parse_text("1.0 nan"), None);
        assert_eq!(DVec3::parse_text("inf 0 0"), None);

        let sdf = plugin(&[("damping", "NaN")]);
        assert_eq!(sdf_param_double(&sdf, "damping", 1.0), 1.0);
        assert!(matches!(
            try_sdf_param(&sdf, "damping", 1.0),
            Err(ParamError::ParseMismatch { expected: "double", .. })
        ));

        let mut msg = ParamV::new();
        msg.insert("damping", f64::NAN);
        msg.insert("origin", DVec3::new(0.0, f64::INFINITY, 0.0));
        assert_eq!(msg_param_double(&msg, "damping", 1.0), 1.0);
        assert_eq!(msg_param_vector3(&msg, "origin", DVec3::ZERO), DVec3::ZERO);
        assert_eq!(msg_param_vector2(&msg, "origin", DVec2::ONE), DVec2::ONE);
    }

    #[test]
    fn test_msg_first_entry_wins() {
        let mut msg = ParamV::new();
        msg.insert("gain", 0.25);
        msg.insert("gain", 4.0);
        assert_eq!(msg_param_double(&msg, "gain", 1.0), 0.25);
    }
}
