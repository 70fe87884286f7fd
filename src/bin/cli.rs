// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ibgeom CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ibgeom::classify::{cell_centres, classify_points, ClassificationSummary};
use ibgeom::geometry::{BoundingBox, CollapsedDimension, Solid, SolidKind};
use ibgeom::io::{self, GeometryConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ibgeom")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Immersed-boundary geometry engine - solid properties and point classification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a polyhedron from an STL file and report its properties
    Inspect {
        /// Input STL file
        input: PathBuf,

        /// Collapsed dimension (none, x, y, z)
        #[arg(short, long, default_value = "none")]
        collapse: CollapsedDimension,
    },

    /// Classify the cell centres of a uniform grid against a scene
    Classify {
        /// Scene configuration (TOML); defaults to ibgeom.toml if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cells along x, y and z
        #[arg(short, long, num_args = 3, default_values_t = [32, 32, 32])]
        resolution: Vec<usize>,

        /// Padding added around the scene bounding box
        #[arg(short, long, default_value = "0.1")]
        margin: f64,
    },

    /// Load a scene and list its solids
    Scene {
        /// Scene configuration (TOML); defaults to ibgeom.toml if present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write every polyhedron, as placed, to this directory
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SolidReport {
    kind: &'static str,
    vertices: usize,
    faces: usize,
    edges: usize,
    area: f64,
    volume: f64,
    centroid: [f64; 3],
    inertia: [[f64; 3]; 3],
    bounding_box: BoundingBox,
    radius: f64,
}

impl SolidReport {
    fn new(solid: &Solid) -> Self {
        let (kind, vertices, faces, edges) = match &solid.kind {
            SolidKind::Sphere => ("sphere", 0, 0, 0),
            SolidKind::Polyhedron(poly) => (
                "polyhedron",
                poly.vertex_count(),
                poly.face_count(),
                poly.edge_count(),
            ),
        };
        let i = &solid.inertia;
        Self {
            kind,
            vertices,
            faces,
            edges,
            area: solid.area,
            volume: solid.volume,
            centroid: [solid.origin.x, solid.origin.y, solid.origin.z],
            inertia: [
                [i[(0, 0)], i[(0, 1)], i[(0, 2)]],
                [i[(1, 0)], i[(1, 1)], i[(1, 2)]],
                [i[(2, 0)], i[(2, 1)], i[(2, 2)]],
            ],
            bounding_box: solid.bounding_box,
            radius: solid.radius,
        }
    }

    fn print(&self, index: usize) {
        println!("Solid {} ({})", index, self.kind);
        if self.faces > 0 {
            println!("  Vertices: {}  Faces: {}  Edges: {}", self.vertices, self.faces, self.edges);
        }
        println!("  Area:     {:.6}", self.area);
        println!("  Volume:   {:.6}", self.volume);
        println!(
            "  Centroid: ({:.6}, {:.6}, {:.6})",
            self.centroid[0], self.centroid[1], self.centroid[2]
        );
        println!("  Inertia:");
        for row in &self.inertia {
            println!("    [{:>14.6} {:>14.6} {:>14.6}]", row[0], row[1], row[2]);
        }
        let (min, max) = (self.bounding_box.min, self.bounding_box.max);
        println!(
            "  Box:      ({:.4}, {:.4}, {:.4}) - ({:.4}, {:.4}, {:.4})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        println!("  Radius:   {:.6}", self.radius);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Inspect { input, collapse } => inspect_command(input, *collapse, cli.json),
        Commands::Classify {
            config,
            resolution,
            margin,
        } => classify_command(config.as_deref(), resolution, *margin, cli.json),
        Commands::Scene { config, export } => {
            scene_command(config.as_deref(), export.as_deref(), cli.json)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    // RUST_LOG directives win over the -v level
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn inspect_command(input: &Path, collapse: CollapsedDimension, json: bool) -> Result<()> {
    let start = std::time::Instant::now();
    let facets = io::read_stl(input)?;
    let solid = Solid::polyhedron(facets, collapse)
        .with_context(|| format!("Failed to build polyhedron from {:?}", input))?;
    tracing::info!(elapsed = ?start.elapsed(), "built solid");

    let report = SolidReport::new(&solid);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print(0);
    }
    Ok(())
}

fn classify_command(config: Option<&Path>, resolution: &[usize], margin: f64, json: bool) -> Result<()> {
    let config = GeometryConfig::load(config)?;
    let solids = config.load_solids()?;
    if solids.is_empty() {
        anyhow::bail!("Scene has no solids");
    }

    let scene_box = solids
        .iter()
        .fold(BoundingBox::empty(), |acc, solid| acc.union(&solid.bounding_box));
    let domain = BoundingBox::new(
        scene_box.min - nalgebra::Vector3::repeat(margin),
        scene_box.max + nalgebra::Vector3::repeat(margin),
    );
    let resolution = [resolution[0], resolution[1], resolution[2]];
    let points = cell_centres(&domain, resolution);

    let start = std::time::Instant::now();
    let classes = classify_points(&points, &solids);
    let elapsed = start.elapsed();
    let summary = ClassificationSummary::from_classes(&classes, solids.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Classified {} cells in {:.2?}", points.len(), elapsed);
        println!("  Fluid: {}", summary.fluid);
        for (index, count) in summary.solid.iter().enumerate() {
            println!("  Solid {}: {}", index, count);
        }
    }
    Ok(())
}

fn scene_command(config: Option<&Path>, export: Option<&Path>, json: bool) -> Result<()> {
    let config = GeometryConfig::load(config)?;
    let solids = config.load_solids()?;

    if let Some(dir) = export {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory: {:?}", dir))?;
        for (index, solid) in solids.iter().enumerate() {
            if let Some(poly) = solid.polyhedron_ref() {
                let path = dir.join(format!("solid_{}.stl", index));
                io::write_stl(&path, poly)?;
                tracing::info!(path = %path.display(), "exported solid");
            }
        }
    }

    let reports: Vec<SolidReport> = solids.iter().map(SolidReport::new).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("Collapsed dimension: {:?}", config.collapse);
        for (index, report) in reports.iter().enumerate() {
            report.print(index);
        }
    }
    Ok(())
}
