//! YAML parameter file loading.
//!
//! Parameter files group settings by model selector:
//!
//! ```yaml
//! /**:
//!   parameters:
//!     period: 5.0
//!
//! /ocean/wavefield:
//!   parameters:
//!     number: 3
//!     direction: [1.0, 0.0]
//! ```
//!
//! Selectors support wildcards: `/**` matches every model, `/ns/**` every
//! model under `/ns`, `/ns/*` the direct children of `/ns`. Anything else
//! must equal the fully-qualified model name.

use std::path::Path;

use glam::DVec3;
use serde_yaml::Value;

use crate::error::MsgError;
use crate::msgs::{Any, ParamV};

const PARAMETERS_KEY: &str = "parameters";

/// Load the parameters that apply to `model_fqn` from a YAML file.
pub fn load_param_file(path: &Path, model_fqn: &str) -> Result<ParamV, MsgError> {
    let content = std::fs::read_to_string(path).map_err(|source| MsgError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let msg = load_param_string(&content, model_fqn)?;
    tracing::info!(
        "Loaded {} parameters for {} from {:?}",
        msg.len(),
        model_fqn,
        path
    );
    Ok(msg)
}

/// Parse a YAML string and collect the parameters that apply to `model_fqn`.
///
/// Sections are applied in document order; a later matching section
/// overrides values set by an earlier one.
pub fn load_param_string(yaml: &str, model_fqn: &str) -> Result<ParamV, MsgError> {
    let doc: Value = serde_yaml::from_str(yaml)?;

    let mapping = doc
        .as_mapping()
        .ok_or_else(|| MsgError::Shape("YAML root must be a mapping".to_string()))?;

    let mut result = ParamV::new();

    for (key, section) in mapping {
        let selector = key
            .as_str()
            .ok_or_else(|| MsgError::Shape("selectors must be strings".to_string()))?;

        if !matches_model(selector, model_fqn) {
            continue;
        }

        let section = section
            .as_mapping()
            .ok_or_else(|| MsgError::Shape(format!("value for '{}' must be a mapping", selector)))?;

        let Some(params) = section.get(PARAMETERS_KEY) else {
            continue;
        };
        let params = params.as_mapping().ok_or_else(|| {
            MsgError::Shape(format!("'{}.{}' must be a mapping", selector, PARAMETERS_KEY))
        })?;

        for (pname, pval) in params {
            let name = pname
                .as_str()
                .ok_or_else(|| MsgError::Shape("parameter names must be strings".to_string()))?;

            match yaml_value_to_any(pval) {
                Some(value) => result.set(name, value),
                None => {
                    tracing::warn!("Skipping parameter <{}>: unsupported value {:?}", name, pval)
                }
            }
        }
    }

    Ok(result)
}

/// Check whether a selector matches the fully-qualified model name.
fn matches_model(selector: &str, model_fqn: &str) -> bool {
    if selector == "/**" || selector == "**" {
        return true;
    }

    if let Some(prefix) = selector.strip_suffix("/**") {
        return model_fqn
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'));
    }

    if let Some(prefix) = selector.strip_suffix("/*") {
        let Some(rest) = model_fqn.strip_prefix(prefix) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('/') else {
            return false;
        };
        return !rest.is_empty() && !rest.contains('/');
    }

    selector == model_fqn
}

/// Convert a YAML value to a message value.
///
/// - booleans → `Bool`
/// - integers within `i32` → `Int32`, other numbers → `Double`
/// - strings → `String`
/// - numeric sequences of length 2 or 3 → `Vector3d` (`z = 0` for length 2)
/// - null → `None`
fn yaml_value_to_any(val: &Value) -> Option<Any> {
    match val {
        Value::Bool(b) => Some(Any::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(Any::Int32)
            .or_else(|| n.as_f64().map(Any::Double)),
        Value::String(s) => Some(Any::String(s.clone())),
        Value::Sequence(seq) => {
            let components: Option<Vec<f64>> = seq.iter().map(Value::as_f64).collect();
            match components?.as_slice() {
                [x, y] => Some(Any::Vector3d(DVec3::new(*x, *y, 0.0))),
                [x, y, z] => Some(Any::Vector3d(DVec3::new(*x, *y, *z))),
                _ => None,
            }
        }
        Value::Null => Some(Any::None),
        _ => None,
    }
}
