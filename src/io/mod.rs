// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - STL facets and scene configuration

mod config;
mod stl;

pub use config::{GeometryConfig, PolyhedronEntry, PrimitiveEntry, SphereEntry};
pub use stl::{read_stl, read_stl_from, write_facets, write_stl};
