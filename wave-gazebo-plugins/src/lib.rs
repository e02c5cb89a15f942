//! Parameter handling for the wave simulation plugins.
//!
//! Plugins are configured from two sources:
//!
//! - **SDF**: the `<plugin>` element of the world file, see [`sdf::Element`];
//! - **`Param_V` messages**: ordered name/value lists exchanged at runtime,
//!   see [`msgs::ParamV`], optionally seeded from YAML files ([`yaml`]).
//!
//! [`utilities`] turns either source into typed values with caller-supplied
//! defaults, and [`wave_parameters::WaveParameters`] builds the wavefield
//! configuration on top of it.

pub mod error;
pub mod msgs;
pub mod sdf;
pub mod utilities;
pub mod wave_parameters;
pub mod yaml;

pub use error::{MsgError, ParamError, Result, SdfError};
pub use msgs::{Any, AnyType, Param, ParamV};
pub use sdf::Element;
pub use utilities::{ParamSource, TypedParam};
pub use wave_parameters::WaveParameters;
