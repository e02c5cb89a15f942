//! Print the wavefield configuration resolved from a plugin's SDF and an
//! optional YAML override file.
//!
//! ```text
//! cargo run --example wave_params -- --sdf ocean_plugin.sdf \
//!     --params overrides.yaml --model /ocean/wavefield
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wave_gazebo_plugins::{Element, ParamV, WaveParameters, yaml::load_param_file};

#[derive(Debug, Parser)]
struct Args {
    /// SDF file holding the `<plugin>` element.
    #[arg(long)]
    sdf: Option<PathBuf>,

    /// Path of the `<wave>` element inside the plugin.
    #[arg(long, default_value = "wave")]
    element: String,

    /// YAML parameter file applied on top of the SDF settings.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Fully-qualified model name used to select YAML sections.
    #[arg(long, default_value = "/wavefield")]
    model: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut params = match &args.sdf {
        Some(path) => {
            let root = Element::load(path)?;
            match root.find_element(&args.element) {
                Some(wave) => WaveParameters::from_sdf(wave),
                None => {
                    tracing::warn!("No <{}> element in {:?}: using defaults", args.element, path);
                    WaveParameters::default()
                }
            }
        }
        None => WaveParameters::default(),
    };

    if let Some(path) = &args.params {
        // Overrides apply on top of the SDF values.
        let mut msg = params.to_msg();
        let overrides: ParamV = load_param_file(path, &args.model)?;
        for p in overrides.iter() {
            msg.set(p.name.clone(), p.value.clone());
        }
        params = WaveParameters::from_msg(&msg);
    }

    println!("model:      {}", params.model());
    println!("number:     {}", params.number());
    println!("period:     {}", params.period());
    println!("direction:  {} {}", params.direction().x, params.direction().y);
    println!("wavelength: {:.3}", params.wavelength());
    for (i, c) in params.components().iter().enumerate() {
        println!(
            "  [{i}] a={:.4} k={:.4} w={:.4} q={:.4} d=({:.3}, {:.3})",
            c.amplitude,
            c.wavenumber,
            c.angular_frequency,
            c.steepness,
            c.direction.x,
            c.direction.y
        );
    }

    Ok(())
}
