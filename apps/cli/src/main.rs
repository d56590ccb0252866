// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! meshconv - convert face-list (OBJ) meshes to binary STL.
//!
//! Reads a face-list file, builds a validated mesh, optionally transforms
//! it, prints measurements on request, and writes STL or face-list output.
//!
//! Usage:
//!   meshconv <input.obj> [output.stl] [options]

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use meshconv_core::parse_obj_bytes;
use meshconv_geometry::{
    apply_transforms_to_layout, build_octree_from_mesh_layout, create_mesh_layout_from_obj,
    is_point_inside_mesh, measure, write_obj, write_stl,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;

use config::{Config, OutputFormat};
use error::CliError;

fn main() -> ExitCode {
    // Initialize logging
    let filter = EnvFilter::try_from_env("MESHCONV_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if config.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let input = config.input.as_ref().ok_or(CliError::MissingInput)?;

    // Check the output before doing any work
    if let Some(output) = &config.output {
        if output.exists() && !config.force {
            return Err(CliError::OutputExists(output.clone()).into());
        }
    }

    let content =
        fs::read(input).with_context(|| format!("Cannot read '{}'", input.display()))?;
    let parsed = parse_obj_bytes(&content)
        .with_context(|| format!("Cannot parse '{}'", input.display()))?;
    let mut layout = create_mesh_layout_from_obj(&parsed)
        .with_context(|| format!("Invalid mesh in '{}'", input.display()))?;

    info!(
        input = %input.display(),
        vertices = layout.vertex_count(),
        faces = layout.face_count(),
        "Loaded mesh"
    );

    if let Some(transform) = config.transform() {
        layout = apply_transforms_to_layout(&layout, &transform)?;
        info!(?transform, "Applied transform");
    }

    if config.stats {
        let props = measure(&layout);
        println!("Triangles:    {}", props.triangle_count);
        println!("Surface area: {:.6}", props.surface_area);
        println!("Volume:       {:.6}", props.volume);
        println!(
            "Bounds:       ({:.6}, {:.6}, {:.6}) .. ({:.6}, {:.6}, {:.6})",
            props.bounding_box.min.x,
            props.bounding_box.min.y,
            props.bounding_box.min.z,
            props.bounding_box.max.x,
            props.bounding_box.max.y,
            props.bounding_box.max.z,
        );
    }

    if let Some(point) = config.inside {
        let verdict = if is_point_inside_mesh(point, &layout) {
            "inside"
        } else {
            "outside"
        };
        println!("Point ({}, {}, {}) is {}", point.x, point.y, point.z, verdict);
    }

    if let Some(depth) = config.voxelize {
        let octree = build_octree_from_mesh_layout(&layout, depth);
        println!(
            "Voxels:       {} leaves, filled volume {:.6}",
            octree.leaf_count(),
            octree.filled_volume()
        );
    }

    if let Some(output) = &config.output {
        let format = config.output_format();
        let bytes = match format {
            OutputFormat::Stl => write_stl(&layout)?,
            OutputFormat::Obj => write_obj(&layout)?,
        };
        fs::write(output, &bytes)
            .with_context(|| format!("Cannot write '{}'", output.display()))?;

        info!(output = %output.display(), ?format, bytes = bytes.len(), "Wrote mesh");
        println!("Wrote {} bytes to {}", bytes.len(), output.display());
    }

    Ok(())
}

fn print_usage() {
    eprintln!(
        r#"meshconv - convert face-list meshes to binary STL

Usage:
  meshconv <input.obj> [output.stl] [options]

Options:
  -i, --input <path>       Face-list file to read
  -o, --output <path>      File to write (format from extension, default STL)
  --format <stl|obj>       Force the output format
  --translate <x,y,z>      Translate every vertex
  --rotate <x,y,z>         Rotate about X, Y and Z (radians)
  --scale <x,y,z>          Scale along each axis
  --stats                  Print triangle count, area, volume and bounds
  --inside <x,y,z>         Report whether a point lies inside the mesh
  --voxelize <depth>       Voxelize with an octree (depth 0-8) and print the filled volume
  --force                  Overwrite an existing output file
  -h, --help               Show this help

Environment:
  MESHCONV_LOG / RUST_LOG  Log filter (default: info)
  MESHCONV_FORCE=1         Same as --force"#
    );
}
