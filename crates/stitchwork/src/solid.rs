//! Solid generator: procedural meshes for every placed stitch.
//!
//! Each stitch becomes two meshes:
//!
//! - a **body**: a slightly wavy circular profile swept along a Catmull-Rom
//!   spine from the base width to the top width over the stitch height
//! - a **loop ring**: a thin tube around a flattened ellipse at the top of
//!   the stitch, standing in for the yarn loop
//!
//! Meshes are plain data (positions, normals, triangles, color) so any
//! renderer or exporter can consume them. Both meshes are built in the
//! stitch's local space and then moved into the scene with the same
//! placement transform.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::curve::CatmullRom;
use crate::geometry::{bounding_box_3d, DAffine3, DQuat, DVec3, Point};
use crate::layout::{RowPlacement, StitchPlacement};
use crate::model::{ConstructionMode, Pattern};
use crate::stitch::StitchKind;

/// Constants for the procedural meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidConfig {
    /// Base radius of the swept profile
    pub profile_radius: f64,
    /// Relative amplitude of the profile wave
    pub profile_wave: f64,
    /// Vertices around the profile
    pub profile_segments: usize,
    /// Control points on the stitch spine
    pub spine_points: usize,
    /// Rings along the sweep (minus one)
    pub sweep_steps: usize,
    /// Segments along the loop ellipse
    pub loop_segments: usize,
    /// Vertices around the loop tube
    pub loop_radial_segments: usize,
    /// Vertical squash of the loop ellipse
    pub loop_aspect: f64,
    pub flat_loop_radius: f64,
    pub flat_loop_thickness: f64,
    pub round_loop_radius: f64,
    pub round_loop_thickness: f64,
}

impl Default for SolidConfig {
    fn default() -> Self {
        Self {
            profile_radius: 0.08,
            profile_wave: 0.15,
            profile_segments: 16,
            spine_points: 21,
            sweep_steps: 20,
            loop_segments: 32,
            loop_radial_segments: 6,
            loop_aspect: 0.5,
            flat_loop_radius: 0.25,
            flat_loop_thickness: 0.06,
            round_loop_radius: 0.2,
            round_loop_thickness: 0.05,
        }
    }
}

impl SolidConfig {
    /// Loop (radius, thickness) for a construction mode.
    pub fn loop_size(&self, mode: ConstructionMode) -> (f64, f64) {
        match mode {
            ConstructionMode::Flat => (self.flat_loop_radius, self.flat_loop_thickness),
            ConstructionMode::Round => (self.round_loop_radius, self.round_loop_thickness),
        }
    }
}

// ============================================================================
// Mesh
// ============================================================================

/// Triangle mesh with one flat material color.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    /// One unit normal per position.
    pub normals: Vec<DVec3>,
    /// Counter-clockwise triangles indexing into `positions`.
    pub indices: Vec<[u32; 3]>,
    pub color: Color,
}

impl Mesh {
    pub fn new(color: Color) -> Self {
        Self { color, ..Default::default() }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        bounding_box_3d(&self.positions)
    }

    /// Copy of this mesh moved by a rigid transform.
    pub fn transformed(&self, transform: &DAffine3) -> Mesh {
        Mesh {
            positions: self.positions.iter().map(|p| transform.transform_point3(*p)).collect(),
            normals: self
                .normals
                .iter()
                .map(|n| transform.transform_vector3(*n).normalize_or_zero())
                .collect(),
            indices: self.indices.clone(),
            color: self.color,
        }
    }

    fn push_vertex(&mut self, position: DVec3, normal: DVec3) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }
}

// ============================================================================
// Sweeping
// ============================================================================

/// A point on a sweep path with its orthonormal frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    center: DVec3,
    tangent: DVec3,
    normal: DVec3,
    binormal: DVec3,
}

/// Frames along a path using parallel transport, so the profile doesn't
/// twist where the curvature changes sign.
fn path_frames(centers: &[DVec3], tangents: &[DVec3]) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(centers.len());
    let Some(first) = tangents.first() else {
        return frames;
    };

    // Start from the axis least aligned with the tangent
    let seed = if first.z.abs() < 0.9 { DVec3::Z } else { DVec3::X };
    let mut normal = (seed - *first * first.dot(seed)).normalize_or_zero();
    let mut previous = *first;

    for (center, tangent) in centers.iter().zip(tangents) {
        if previous.dot(*tangent) < 1.0 - 1e-12 {
            normal = (DQuat::from_rotation_arc(previous, *tangent) * normal).normalize_or_zero();
        }
        previous = *tangent;
        frames.push(Frame {
            center: *center,
            tangent: *tangent,
            normal,
            binormal: tangent.cross(normal),
        });
    }
    frames
}

/// Sample a curve into sweep frames. Falls back to the previous tangent
/// (or +Y) where the curve is degenerate.
fn curve_frames(curve: &CatmullRom, steps: usize) -> Vec<Frame> {
    let steps = steps.max(1);
    let count = if curve.is_closed() { steps } else { steps + 1 };

    let mut centers = Vec::with_capacity(count);
    let mut tangents = Vec::with_capacity(count);
    let mut last = DVec3::Y;
    for i in 0..count {
        let t = i as f64 / steps as f64;
        centers.push(curve.sample(t).extend(0.0));
        if let Some(tangent) = curve.tangent(t) {
            last = tangent.extend(0.0);
        }
        tangents.push(last);
    }
    path_frames(&centers, &tangents)
}

/// Place a 2D profile around every frame and stitch neighboring rings into
/// quads. `closed` also joins the last ring back to the first.
fn sweep(mesh: &mut Mesh, frames: &[Frame], profile: &[Point], closed: bool) -> Vec<u32> {
    let ring_size = profile.len() as u32;
    let mut ring_starts = Vec::with_capacity(frames.len());

    for frame in frames {
        ring_starts.push(mesh.positions.len() as u32);
        for p in profile {
            let offset = frame.normal * p.x + frame.binormal * p.y;
            mesh.push_vertex(frame.center + offset, offset.normalize_or_zero());
        }
    }

    let ring_pairs = if closed { frames.len() } else { frames.len().saturating_sub(1) };
    for k in 0..ring_pairs {
        let a = ring_starts[k];
        let b = ring_starts[(k + 1) % frames.len()];
        for j in 0..ring_size {
            let j2 = (j + 1) % ring_size;
            mesh.indices.push([a + j, b + j, b + j2]);
            mesh.indices.push([a + j, b + j2, a + j2]);
        }
    }
    ring_starts
}

/// Close an open sweep end with a triangle fan.
fn cap(mesh: &mut Mesh, frame: &Frame, ring_start: u32, ring_size: u32, facing_back: bool) {
    let normal = if facing_back { -frame.tangent } else { frame.tangent };
    let center = mesh.push_vertex(frame.center, normal);
    for j in 0..ring_size {
        let a = ring_start + j;
        let b = ring_start + (j + 1) % ring_size;
        if facing_back {
            mesh.indices.push([center, b, a]);
        } else {
            mesh.indices.push([center, a, b]);
        }
    }
}

/// The wavy stitch cross-section: `r = radius × (1 + wave × sin(4πt))`.
pub fn stitch_profile(config: &SolidConfig) -> Vec<Point> {
    let segments = config.profile_segments.max(3);
    (0..segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let r = config.profile_radius * (1.0 + (t * 4.0 * PI).sin() * config.profile_wave);
            Point::polar(Point::ORIGIN, r, t * TAU)
        })
        .collect()
}

/// Build the swept body of one stitch in local space.
///
/// The spine runs from `(base_width, 0, 0)` to `(top_width, height, 0)`;
/// the stitch stands on the origin. Unknown kinds get the fallback height.
pub fn build_stitch_solid(kind: &StitchKind, color: Color, config: &SolidConfig) -> Mesh {
    let height = kind.height();
    let (base_width, top_width) = kind.sweep_widths();

    let spine_points = config.spine_points.max(2);
    let spine: Vec<Point> = (0..spine_points)
        .map(|i| {
            let t = i as f64 / (spine_points - 1) as f64;
            Point::new(base_width + (top_width - base_width) * t, height * t)
        })
        .collect();

    let mut mesh = Mesh::new(color);
    let Some(curve) = CatmullRom::new(&spine, false) else {
        return mesh;
    };

    let frames = curve_frames(&curve, config.sweep_steps);
    let profile = stitch_profile(config);
    let rings = sweep(&mut mesh, &frames, &profile, false);

    let ring_size = profile.len() as u32;
    if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
        cap(&mut mesh, first, rings[0], ring_size, true);
        cap(&mut mesh, last, rings[rings.len() - 1], ring_size, false);
    }
    mesh
}

/// Build a connector loop: a tube of `thickness` around the ellipse
/// `(radius·cos θ, aspect·radius·sin θ)` centered on `center`, in the XY plane.
pub fn build_connector_loop(
    center: DVec3,
    radius: f64,
    thickness: f64,
    color: Color,
    config: &SolidConfig,
) -> Mesh {
    let segments = config.loop_segments.max(3);
    let ellipse: Vec<Point> = (0..segments)
        .map(|i| {
            let angle = i as f64 / segments as f64 * TAU;
            Point::new(angle.cos() * radius, angle.sin() * radius * config.loop_aspect)
        })
        .collect();

    let mut mesh = Mesh::new(color);
    let Some(curve) = CatmullRom::new(&ellipse, true) else {
        return mesh;
    };

    let radial = config.loop_radial_segments.max(3);
    let tube: Vec<Point> = (0..radial)
        .map(|j| Point::polar(Point::ORIGIN, thickness, j as f64 / radial as f64 * TAU))
        .collect();

    let frames = curve_frames(&curve, segments);
    sweep(&mut mesh, &frames, &tube, true);
    mesh.transformed(&DAffine3::from_translation(center))
}

/// Local-to-scene transform of a placed stitch.
///
/// FLAT stitches are only translated. ROUND stitches also turn about Y so
/// their local +Z points at the center axis at their own height.
pub fn stitch_transform(mode: ConstructionMode, placement: &StitchPlacement) -> DAffine3 {
    let position = placement.position;
    match mode {
        ConstructionMode::Flat => DAffine3::from_translation(position),
        ConstructionMode::Round => {
            let to_center = DVec3::new(-position.x, 0.0, -position.z);
            if to_center.length_squared() < 1e-18 {
                return DAffine3::from_translation(position);
            }
            let yaw = to_center.x.atan2(to_center.z);
            DAffine3::from_rotation_translation(DQuat::from_rotation_y(yaw), position)
        }
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Meshes for one placed stitch, already in scene space.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchSolid {
    pub row_index: usize,
    pub stitch_index: usize,
    pub body: Mesh,
    pub loop_ring: Mesh,
}

/// Everything the 3D view draws. Rebuilt in full on every pattern change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene3d {
    pub solids: Vec<StitchSolid>,
}

impl Scene3d {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Number of meshes (two per stitch).
    pub fn mesh_count(&self) -> usize {
        self.solids.len() * 2
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.solids.iter().flat_map(|s| [&s.body, &s.loop_ring])
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes().map(Mesh::triangle_count).sum()
    }

    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        self.meshes()
            .filter_map(Mesh::bounding_box)
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }

    /// Serialize as Wavefront OBJ.
    ///
    /// One object per mesh. Colors ride along as per-vertex `v x y z r g b`,
    /// which Blender and MeshLab both read.
    pub fn to_obj(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", name);
        let _ = writeln!(out, "# {} stitches, {} triangles", self.solids.len(), self.triangle_count());

        let mut base = 1usize;
        for solid in &self.solids {
            for (part, mesh) in [("body", &solid.body), ("loop", &solid.loop_ring)] {
                let [r, g, b] = mesh.color.to_unit_rgb();
                let _ = writeln!(out, "o r{}_s{}_{}", solid.row_index + 1, solid.stitch_index + 1, part);
                for p in &mesh.positions {
                    let _ = writeln!(out, "v {:.5} {:.5} {:.5} {:.4} {:.4} {:.4}", p.x, p.y, p.z, r, g, b);
                }
                for n in &mesh.normals {
                    let _ = writeln!(out, "vn {:.5} {:.5} {:.5}", n.x, n.y, n.z);
                }
                for tri in &mesh.indices {
                    let [a, b, c] = tri.map(|i| i as usize + base);
                    let _ = writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}");
                }
                base += mesh.vertex_count();
            }
        }
        out
    }
}

/// Build the 3D scene for a pattern from its placements.
///
/// Placements that no longer match a stitch in `pattern` are skipped.
pub fn build_scene(pattern: &Pattern, placements: &[RowPlacement], config: &SolidConfig) -> Scene3d {
    let (loop_radius, loop_thickness) = config.loop_size(pattern.mode);
    let mut solids = Vec::with_capacity(pattern.stitch_count());

    for row in placements {
        for placement in &row.stitches {
            let Some(stitch) = pattern.stitch(row.row_index, placement.stitch_index) else {
                log::debug!("no stitch at r{} s{}, skipping", row.row_index, placement.stitch_index);
                continue;
            };
            let color = pattern
                .resolved_color(row.row_index, placement.stitch_index)
                .unwrap_or_default();

            let transform = stitch_transform(pattern.mode, placement);
            let body = build_stitch_solid(&stitch.kind, color, config);
            let top = DVec3::new(0.0, stitch.kind.height(), 0.0);
            let loop_ring = build_connector_loop(top, loop_radius, loop_thickness, color, config);

            solids.push(StitchSolid {
                row_index: row.row_index,
                stitch_index: placement.stitch_index,
                body: body.transformed(&transform),
                loop_ring: loop_ring.transformed(&transform),
            });
        }
    }

    log::debug!("built {} stitch solids", solids.len());
    Scene3d { solids }
}
