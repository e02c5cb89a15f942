//! Wavefield configuration.
//!
//! [`WaveParameters`] holds the user settings of a wavefield and the
//! per-component values derived from them. Settings are read from the
//! `<wave>` element of a plugin or from a parameter message, and can be
//! published back as a message so that every plugin sharing the wavefield
//! sees the same configuration.

use std::f64::consts::PI;

use glam::DVec2;

use crate::msgs::ParamV;
use crate::sdf::Element;
use crate::utilities::ParamSource;

/// Gravitational acceleration used by the deep water dispersion relation.
pub const GRAVITY: f64 = 9.81;

/// Upper bound on the number of wave components.
pub const MAX_COMPONENTS: usize = 256;

/// Derived values of a single wave component.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveComponent {
    pub amplitude: f64,
    pub angular_frequency: f64,
    pub phase: f64,
    pub steepness: f64,
    pub wavenumber: f64,
    pub direction: DVec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveParameters {
    model: String,
    number: usize,
    scale: f64,
    angle: f64,
    steepness: f64,
    amplitude: f64,
    period: f64,
    phase: f64,
    direction: DVec2,
    gain: f64,
    tau: f64,

    angular_frequency: f64,
    wavenumber: f64,
    wavelength: f64,
    components: Vec<WaveComponent>,
}

impl Default for WaveParameters {
    fn default() -> Self {
        let mut params = Self {
            model: "default".to_string(),
            number: 1,
            scale: 2.0,
            angle: 2.0 * PI / 10.0,
            steepness: 1.0,
            amplitude: 0.0,
            period: 1.0,
            phase: 0.0,
            direction: DVec2::X,
            gain: 1.0,
            tau: 1.0,
            angular_frequency: 0.0,
            wavenumber: 0.0,
            wavelength: 0.0,
            components: Vec::new(),
        };
        params.recalculate();
        params
    }
}

impl WaveParameters {
    /// Read settings from the `<wave>` element of a plugin.
    pub fn from_sdf(sdf: &Element) -> Self {
        Self::from_source(sdf)
    }

    /// Read settings from a parameter message.
    pub fn from_msg(msg: &ParamV) -> Self {
        Self::from_source(msg)
    }

    /// Read every setting from `source`, keeping the default for anything
    /// missing, malformed or out of range.
    pub fn from_source<S: ParamSource>(source: &S) -> Self {
        let defaults = Self::default();
        let mut params = Self {
            model: source.param("model", defaults.model.clone()),
            number: source.param("number", defaults.number),
            scale: source.param("scale", defaults.scale),
            angle: source.param("angle", defaults.angle),
            steepness: source.param("steepness", defaults.steepness),
            amplitude: source.param("amplitude", defaults.amplitude),
            period: source.param("period", defaults.period),
            phase: source.param("phase", defaults.phase),
            direction: source.param("direction", defaults.direction),
            gain: source.param("gain", defaults.gain),
            tau: source.param("tau", defaults.tau),
            ..defaults.clone()
        };

        if !is_positive(params.period) {
            tracing::warn!(
                "Wave period must be positive, got <{}>: using <{}>",
                params.period,
                defaults.period
            );
            params.period = defaults.period;
        }
        if params.number > MAX_COMPONENTS {
            tracing::warn!(
                "Wave number must be at most {}, got <{}>: using <{}>",
                MAX_COMPONENTS,
                params.number,
                defaults.number
            );
            params.number = defaults.number;
        }
        if !is_positive(params.scale) {
            tracing::warn!(
                "Wave scale must be positive, got <{}>: using <{}>",
                params.scale,
                defaults.scale
            );
            params.scale = defaults.scale;
        }

        params.recalculate();
        params
    }

    /// Write the settings to a parameter message, using the same names as
    /// the SDF elements.
    pub fn to_msg(&self) -> ParamV {
        let mut msg = ParamV::new();
        msg.insert("model", self.model.as_str());
        // Bounded by MAX_COMPONENTS, so the conversion is exact.
        msg.insert("number", self.number as i32);
        msg.insert("scale", self.scale);
        msg.insert("angle", self.angle);
        msg.insert("steepness", self.steepness);
        msg.insert("amplitude", self.amplitude);
        msg.insert("period", self.period);
        msg.insert("phase", self.phase);
        msg.insert("direction", self.direction);
        msg.insert("gain", self.gain);
        msg.insert("tau", self.tau);
        msg
    }

    fn recalculate(&mut self) {
        self.direction = self.direction.try_normalize().unwrap_or(DVec2::X);

        self.angular_frequency = 2.0 * PI / self.period;
        self.wavenumber = self.angular_frequency * self.angular_frequency / GRAVITY;
        self.wavelength = 2.0 * PI / self.wavenumber;

        let number = self.number;
        self.components = (0..number)
            .map(|i| {
                let n = i as f64 - (number / 2) as f64;
                let scale_factor = self.scale.powf(n);
                let amplitude = scale_factor * self.amplitude;
                let wavenumber = self.wavenumber / scale_factor;
                let steepness = if amplitude != 0.0 {
                    (self.steepness / (amplitude * wavenumber * number as f64)).min(1.0)
                } else {
                    0.0
                };
                WaveComponent {
                    amplitude,
                    angular_frequency: (GRAVITY * wavenumber).sqrt(),
                    phase: self.phase,
                    steepness,
                    wavenumber,
                    direction: DVec2::from_angle(n * self.angle).rotate(self.direction),
                }
            })
            .collect();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn steepness(&self) -> f64 {
        self.steepness
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Mean direction, unit length.
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Mean angular frequency `2π / period`.
    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    /// Mean wavenumber from the deep water dispersion relation `ω² / g`.
    pub fn wavenumber(&self) -> f64 {
        self.wavenumber
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn components(&self) -> &[WaveComponent] {
        &self.components
    }

    /// Ignored with a warning above [`MAX_COMPONENTS`].
    pub fn set_number(&mut self, number: usize) {
        if number > MAX_COMPONENTS {
            tracing::warn!("Ignoring wave number <{}> above {}", number, MAX_COMPONENTS);
            return;
        }
        self.number = number;
        self.recalculate();
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
        self.recalculate();
    }

    pub fn set_steepness(&mut self, steepness: f64) {
        self.steepness = steepness;
        self.recalculate();
    }

    pub fn set_direction(&mut self, direction: DVec2) {
        self.direction = direction;
        self.recalculate();
    }

    /// Ignored with a warning unless `period` is finite and positive.
    pub fn set_period(&mut self, period: f64) {
        if !is_positive(period) {
            tracing::warn!("Ignoring non-positive wave period <{}>", period);
            return;
        }
        self.period = period;
        self.recalculate();
    }

    /// Ignored with a warning unless `scale` is finite and positive.
    pub fn set_scale(&mut self, scale: f64) {
        if !is_positive(scale) {
            tracing::warn!("Ignoring non-positive wave scale <{}>", scale);
            return;
        }
        self.scale = scale;
        self.recalculate();
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
