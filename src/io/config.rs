// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene configuration: which solids to immerse and how to place them

use crate::geometry::{
    compute_geometry_parameters, BodyState, CollapsedDimension, Primitive, RigidTransform, Solid,
};
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::read_stl;

/// Default configuration file looked up by [`GeometryConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "ibgeom.toml";

/// Analytical sphere entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereEntry {
    pub origin: Point3<f64>,
    pub radius: f64,
    #[serde(default)]
    pub state: BodyState,
    pub transform: Option<RigidTransform>,
}

/// Polyhedron loaded from an STL file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyhedronEntry {
    /// Relative paths resolve against the configuration file's directory
    pub path: PathBuf,
    #[serde(default)]
    pub state: BodyState,
    pub transform: Option<RigidTransform>,
}

/// Polyhedron generated from a primitive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveEntry {
    pub shape: Primitive,
    #[serde(default)]
    pub state: BodyState,
    pub transform: Option<RigidTransform>,
}

/// Geometry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Space dimension collapsed by the flow solver, if any
    pub collapse: CollapsedDimension,
    #[serde(rename = "sphere")]
    pub spheres: Vec<SphereEntry>,
    #[serde(rename = "polyhedron")]
    pub polyhedra: Vec<PolyhedronEntry>,
    #[serde(rename = "primitive")]
    pub primitives: Vec<PrimitiveEntry>,
    /// Directory relative STL paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl GeometryConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GeometryConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Reads `path` when given, else `ibgeom.toml` in the working directory
    /// if present, else the defaults. `IBGEOM_COLLAPSE` overrides the
    /// collapsed dimension.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        if let Ok(collapse) = std::env::var("IBGEOM_COLLAPSE") {
            match collapse.parse() {
                Ok(collapse) => config.collapse = collapse,
                Err(err) => tracing::warn!(%err, "ignoring IBGEOM_COLLAPSE"),
            }
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn solid_count(&self) -> usize {
        self.spheres.len() + self.polyhedra.len() + self.primitives.len()
    }

    /// Build, place and measure every configured solid.
    ///
    /// Spheres come first, then STL polyhedra, then primitives, each in file
    /// order. Properties are recomputed after the transforms.
    pub fn load_solids(&self) -> Result<Vec<Solid>> {
        let mut solids = Vec::with_capacity(self.solid_count());

        for (index, entry) in self.spheres.iter().enumerate() {
            let solid = Solid::sphere(entry.origin, entry.radius, self.collapse).with_state(entry.state);
            solids.push(place(solid, entry.transform.as_ref())
                .with_context(|| format!("Failed to place sphere {}", index))?);
        }

        for entry in &self.polyhedra {
            let path = self.base_dir.join(&entry.path);
            let facets = read_stl(&path)?;
            let solid = Solid::polyhedron(facets, self.collapse)
                .with_context(|| format!("Failed to build polyhedron from {:?}", path))?
                .with_state(entry.state);
            solids.push(place(solid, entry.transform.as_ref())
                .with_context(|| format!("Failed to place polyhedron {:?}", path))?);
        }

        for (index, entry) in self.primitives.iter().enumerate() {
            let solid = Solid::polyhedron(entry.shape.to_facets(), self.collapse)
                .with_context(|| format!("Failed to build primitive {}", index))?
                .with_state(entry.state);
            solids.push(place(solid, entry.transform.as_ref())
                .with_context(|| format!("Failed to place primitive {}", index))?);
        }

        compute_geometry_parameters(self.collapse, &mut solids);
        tracing::info!(solids = solids.len(), collapse = ?self.collapse, "loaded scene");
        Ok(solids)
    }
}

fn place(mut solid: Solid, transform: Option<&RigidTransform>) -> Result<Solid> {
    if let Some(transform) = transform {
        solid.transform(transform)?;
    }
    Ok(solid)
}
