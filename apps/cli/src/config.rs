// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command line configuration.
//!
//! Defaults come from environment variables, then options override them.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use meshconv_geometry::{Transform, Vec3};

use crate::error::CliError;

/// Deepest octree accepted by `--voxelize`; each level is eight times the work.
pub const MAX_VOXEL_DEPTH: usize = 8;

/// Encoding written to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Stl,
    Obj,
}

impl OutputFormat {
    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stl" => Ok(OutputFormat::Stl),
            "obj" => Ok(OutputFormat::Obj),
            _ => Err(CliError::UnknownFormat(s.to_string())),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Face-list file to read.
    pub input: Option<PathBuf>,
    /// File to write; nothing is written without one.
    pub output: Option<PathBuf>,
    /// Explicit output format; otherwise inferred from the output extension.
    pub format: Option<OutputFormat>,
    pub translate: Option<Vec3>,
    /// Euler angles in radians.
    pub rotate: Option<Vec3>,
    pub scale: Option<Vec3>,
    /// Print area, volume and bounds.
    pub stats: bool,
    /// Point to test for containment.
    pub inside: Option<Vec3>,
    /// Octree depth for a voxel volume estimate.
    pub voxelize: Option<usize>,
    /// Overwrite an existing output file.
    pub force: bool,
    pub help: bool,
}

impl Config {
    /// Defaults from environment variables.
    pub fn from_env() -> Self {
        Self {
            force: std::env::var("MESHCONV_FORCE")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            ..Self::default()
        }
    }

    /// Environment defaults overridden by `args` (program name excluded).
    pub fn from_args<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_env().with_args(args)
    }

    /// Apply command line options on top of this configuration.
    ///
    /// An empty argument list asks for help.
    pub fn with_args<I>(mut self, args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().peekable();
        if args.peek().is_none() {
            self.help = true;
            return Ok(self);
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => self.help = true,
                "-i" | "--input" => self.input = Some(PathBuf::from(value(&mut args, &arg)?)),
                "-o" | "--output" => self.output = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--format" => self.format = Some(value(&mut args, &arg)?.parse()?),
                "--translate" => self.translate = Some(parse_vec3(&arg, &value(&mut args, &arg)?)?),
                "--rotate" => self.rotate = Some(parse_vec3(&arg, &value(&mut args, &arg)?)?),
                "--scale" => self.scale = Some(parse_vec3(&arg, &value(&mut args, &arg)?)?),
                "--inside" => self.inside = Some(parse_vec3(&arg, &value(&mut args, &arg)?)?),
                "--voxelize" => {
                    let raw = value(&mut args, &arg)?;
                    let invalid = |reason: String| CliError::InvalidValue {
                        option: arg.clone(),
                        value: raw.clone(),
                        reason,
                    };
                    let depth = raw.parse::<usize>().map_err(|e| invalid(e.to_string()))?;
                    if depth > MAX_VOXEL_DEPTH {
                        return Err(invalid(format!("depth must be at most {}", MAX_VOXEL_DEPTH)));
                    }
                    self.voxelize = Some(depth);
                }
                "--stats" => self.stats = true,
                "--force" => self.force = true,
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(CliError::UnknownOption(other.to_string()));
                }
                // Bare arguments fill input, then output
                _ if self.input.is_none() => self.input = Some(PathBuf::from(arg)),
                _ if self.output.is_none() => self.output = Some(PathBuf::from(arg)),
                _ => return Err(CliError::UnexpectedArgument(arg)),
            }
        }

        Ok(self)
    }

    /// Explicit format, else the output extension, else STL.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or(OutputFormat::Stl)
    }

    /// Combined transform, or `None` when no transform option was given.
    pub fn transform(&self) -> Option<Transform> {
        if self.translate.is_none() && self.rotate.is_none() && self.scale.is_none() {
            return None;
        }
        let identity = Transform::identity();
        Some(Transform::new(
            self.translate.unwrap_or(identity.translation),
            self.rotate.unwrap_or(identity.rotation),
            self.scale.unwrap_or(identity.scale),
        ))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn value(args: &mut impl Iterator<Item = String>, option: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::MissingValue(option.to_string()))
}

/// Parse `x,y,z`
fn parse_vec3(option: &str, raw: &str) -> Result<Vec3, CliError> {
    let invalid = |reason: String| CliError::InvalidValue {
        option: option.to_string(),
        value: raw.to_string(),
        reason,
    };

    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| invalid(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(invalid(format!("expected 3 comma-separated numbers, got {}", parts.len()))),
    }
}
