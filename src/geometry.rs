//! Shape dispatch: axis semantics and the bounding-surface overlay drawn
//! under trajectory scenes.
//!
//! [`Geometry::overlay`] is a pure function of the shape parameters. It
//! returns flat quads plus whatever axis limits the shape pins down; the
//! trajectory plotter turns the quads into plotters elements with
//! [`overlay_elements`] and resolves any unpinned axis from the data.

use plotters::element::{PathElement, Polygon};
use plotters::style::{Color, RGBColor};
use plotters::style::colors::{BLACK, BLUE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::coords::Point3;

const SLAB_PLANE_HALF_WIDTH: f64 = 10.0;
const SLAB_X_MARGIN: f64 = 2.0;
const BOX_PADDING_FRACTION: f64 = 0.2;
const SPHERE_LIMIT_FACTOR: f64 = 1.2;
const SPHERE_SAMPLES: usize = 20;
const DATA_PADDING_FRACTION: f64 = 0.05;

const DEFAULT_X_INIT: f64 = 0.0;
const DEFAULT_BOX_SIDE: f64 = 1.0;
const DEFAULT_TOTAL_LENGTH: f64 = 10.0;
const DEFAULT_SCALE: f64 = 1.0;

const SURFACE_GRAY: RGBColor = RGBColor(128, 128, 128);
const SURFACE_ALPHA: f64 = 0.2;

/// Raw `geometry` block of a run descriptor. Every extent is optional; the
/// conversion into [`Geometry`] fills in fixed defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeometryParams {
    pub shape: String,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub max_scale: Option<f64>,
    #[serde(default)]
    pub x_init: Option<f64>,
    #[serde(default)]
    pub x_length: Option<f64>,
    #[serde(default)]
    pub y_length: Option<f64>,
    #[serde(default)]
    pub total_length: Option<f64>,
}

impl GeometryParams {
    /// Swept parameter: `max_scale` wins over `scale`.
    pub fn scale(&self) -> f64 {
        self.max_scale.or(self.scale).unwrap_or(DEFAULT_SCALE)
    }
}

/// Bounding shape of the simulated medium. Each variant carries only the
/// extents it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    RegularSlab {
        x_init: f64,
        length: f64,
    },
    FiniteSlab {
        x_length: f64,
        y_length: f64,
        z_length: f64,
    },
    Sphere {
        radius: f64,
    },
    /// Two slabs sharing an interface at `x_init + total_length * ratio`.
    DoubleSlab {
        x_init: f64,
        total_length: f64,
        ratio: f64,
    },
    Other {
        shape: String,
        scale: f64,
    },
}

impl Geometry {
    pub fn from_params(params: &GeometryParams) -> Self {
        let scale = params.scale();
        let shape = params.shape.trim().to_ascii_lowercase().replace('-', "_");
        match shape.as_str() {
            "regular_slab" => Geometry::RegularSlab {
                x_init: params.x_init.unwrap_or(DEFAULT_X_INIT),
                length: scale,
            },
            "finite_slab" => Geometry::FiniteSlab {
                x_length: params.x_length.unwrap_or(DEFAULT_BOX_SIDE),
                y_length: params.y_length.unwrap_or(DEFAULT_BOX_SIDE),
                z_length: scale,
            },
            "sphere" => Geometry::Sphere { radius: scale },
            "double_slab" => Geometry::DoubleSlab {
                x_init: params.x_init.unwrap_or(DEFAULT_X_INIT),
                total_length: params.total_length.unwrap_or(DEFAULT_TOTAL_LENGTH),
                ratio: scale,
            },
            _ => Geometry::Other {
                shape: params.shape.clone(),
                scale,
            },
        }
    }

    pub fn shape_name(&self) -> &str {
        match self {
            Geometry::RegularSlab { .. } => "regular_slab",
            Geometry::FiniteSlab { .. } => "finite_slab",
            Geometry::Sphere { .. } => "sphere",
            Geometry::DoubleSlab { .. } => "double_slab",
            Geometry::Other { shape, .. } => shape,
        }
    }

    /// Label of the swept parameter on probability plots.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Geometry::RegularSlab { .. } => "Slab length",
            Geometry::FiniteSlab { .. } => "Length in the z axis",
            Geometry::Sphere { .. } => "Radius",
            Geometry::DoubleSlab { .. } => "Ratio",
            Geometry::Other { .. } => "Scale",
        }
    }

    /// Only open slabs let particles leave back through the entry face.
    pub fn models_reflection(&self) -> bool {
        matches!(
            self,
            Geometry::RegularSlab { .. } | Geometry::DoubleSlab { .. }
        )
    }

    pub fn overlay(&self) -> Overlay {
        match *self {
            Geometry::RegularSlab { x_init, length } => {
                let x_end = x_init + length;
                Overlay {
                    surfaces: vec![
                        Surface::x_plane(x_init, Tone::Boundary),
                        Surface::x_plane(x_end, Tone::Boundary),
                    ],
                    limits: AxisLimits {
                        x: Some(slab_x_limits(x_init, x_end)),
                        ..AxisLimits::default()
                    },
                }
            }
            Geometry::FiniteSlab {
                x_length,
                y_length,
                z_length,
            } => box_overlay(x_length, y_length, z_length),
            Geometry::Sphere { radius } => sphere_overlay(radius),
            Geometry::DoubleSlab {
                x_init,
                total_length,
                ratio,
            } => {
                let x_middle = x_init + total_length * ratio;
                let x_end = x_init + total_length;
                Overlay {
                    surfaces: vec![
                        Surface::x_plane(x_init, Tone::Boundary),
                        Surface::x_plane(x_middle, Tone::Interface),
                        Surface::x_plane(x_end, Tone::Boundary),
                    ],
                    limits: AxisLimits {
                        x: Some(slab_x_limits(x_init, x_end)),
                        ..AxisLimits::default()
                    },
                }
            }
            Geometry::Other { .. } => Overlay::default(),
        }
    }
}

fn slab_x_limits(x_init: f64, x_end: f64) -> (f64, f64) {
    (
        x_init.min(x_end) - SLAB_X_MARGIN,
        x_init.max(x_end) + SLAB_X_MARGIN,
    )
}

fn box_overlay(x_length: f64, y_length: f64, z_length: f64) -> Overlay {
    let (x_min, x_max) = (-x_length / 2.0, x_length / 2.0);
    let (y_min, y_max) = (-y_length / 2.0, y_length / 2.0);
    let (z_min, z_max) = (0.0, z_length);

    let dx = (x_length, 0.0, 0.0);
    let dy = (0.0, y_length, 0.0);
    let dz = (0.0, 0.0, z_length);

    let surfaces = vec![
        Surface::rectangle((x_min, y_min, z_min), dx, dy),
        Surface::rectangle((x_min, y_min, z_max), dx, dy),
        Surface::rectangle((x_min, y_min, z_min), dx, dz),
        Surface::rectangle((x_min, y_max, z_min), dx, dz),
        Surface::rectangle((x_min, y_min, z_min), dy, dz),
        Surface::rectangle((x_max, y_min, z_min), dy, dz),
    ];

    let padding = x_length.max(y_length).max(z_length) * BOX_PADDING_FRACTION;
    Overlay {
        surfaces,
        limits: AxisLimits {
            x: Some((x_min - padding, x_max + padding)),
            y: Some((y_min - padding, y_max + padding)),
            z: Some((z_min - padding, z_max + padding)),
        },
    }
}

fn sphere_overlay(radius: f64) -> Overlay {
    let n = SPHERE_SAMPLES;
    let azimuth: Vec<f64> = linspace(0.0, 2.0 * PI, n);
    let polar: Vec<f64> = linspace(0.0, PI, n);
    let point = |i: usize, j: usize| {
        let (u, v) = (azimuth[i], polar[j]);
        (
            radius * u.cos() * v.sin(),
            radius * u.sin() * v.sin(),
            radius * v.cos(),
        )
    };

    let mut surfaces = Vec::with_capacity((n - 1) * (n - 1));
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            surfaces.push(Surface {
                corners: [point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1)],
                tone: Tone::Boundary,
                outlined: true,
            });
        }
    }

    let limit = radius.abs() * SPHERE_LIMIT_FACTOR;
    Overlay {
        surfaces,
        limits: AxisLimits {
            x: Some((-limit, limit)),
            y: Some((-limit, limit)),
            z: Some((-limit, limit)),
        },
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![start; n];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Boundary,
    /// Interface between the two media of a double slab.
    Interface,
}

impl Tone {
    pub fn color(self) -> RGBColor {
        match self {
            Tone::Boundary => SURFACE_GRAY,
            Tone::Interface => BLUE,
        }
    }
}

/// Flat quadrilateral, corners in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub corners: [Point3; 4],
    pub tone: Tone,
    pub outlined: bool,
}

impl Surface {
    fn x_plane(x: f64, tone: Tone) -> Self {
        let w = SLAB_PLANE_HALF_WIDTH;
        Self {
            corners: [(x, -w, -w), (x, w, -w), (x, w, w), (x, -w, w)],
            tone,
            outlined: false,
        }
    }

    fn rectangle(origin: Point3, u: Point3, v: Point3) -> Self {
        let add = |a: Point3, b: Point3| (a.0 + b.0, a.1 + b.1, a.2 + b.2);
        Self {
            corners: [origin, add(origin, u), add(add(origin, u), v), add(origin, v)],
            tone: Tone::Boundary,
            outlined: false,
        }
    }
}

/// Per-axis limits fixed by a shape; `None` leaves the axis to the data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisLimits {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
    pub z: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub surfaces: Vec<Surface>,
    pub limits: AxisLimits,
}

impl Overlay {
    pub fn extent(&self) -> Option<Extent> {
        Extent::from_points(self.surfaces.iter().flat_map(|s| s.corners.iter().copied()))
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: Point3,
    pub max: Point3,
}

impl Extent {
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.0.is_finite() && p.1.is_finite() && p.2.is_finite())
            .fold(None, |acc: Option<Extent>, p| {
                let single = Extent { min: p, max: p };
                Some(match acc {
                    Some(e) => e.union(&single),
                    None => single,
                })
            })
    }

    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min: (
                self.min.0.min(other.min.0),
                self.min.1.min(other.min.1),
                self.min.2.min(other.min.2),
            ),
            max: (
                self.max.0.max(other.max.0),
                self.max.1.max(other.max.1),
                self.max.2.max(other.max.2),
            ),
        }
    }
}

/// Final ranges of a 3D scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl SceneBounds {
    /// Pinned limits win; free axes span `extent` with a small margin, or
    /// fall back to [-1, 1] when nothing is known.
    pub fn resolve(limits: &AxisLimits, extent: Option<&Extent>) -> Self {
        let free = |lo: Option<f64>, hi: Option<f64>| match (lo, hi) {
            (Some(lo), Some(hi)) => padded(lo, hi),
            _ => (-1.0, 1.0),
        };
        let axis = |pinned: Option<(f64, f64)>, pick: fn(&Point3) -> f64| {
            let (lo, hi) = pinned.unwrap_or_else(|| {
                free(extent.map(|e| pick(&e.min)), extent.map(|e| pick(&e.max)))
            });
            usable_range(lo, hi)
        };
        Self {
            x: axis(limits.x, |p| p.0),
            y: axis(limits.y, |p| p.1),
            z: axis(limits.z, |p| p.2),
        }
    }
}

/// Chart ranges must be finite and non-empty.
fn usable_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let (lo, hi) = (lo.min(hi), lo.max(hi));
    if hi - lo <= f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = span * DATA_PADDING_FRACTION;
    (lo - pad, hi + pad)
}

/// Translucent faces and, for meshed surfaces, their edges.
pub fn overlay_elements(overlay: &Overlay) -> (Vec<Polygon<Point3>>, Vec<PathElement<Point3>>) {
    let faces = overlay
        .surfaces
        .iter()
        .map(|s| Polygon::new(s.corners.to_vec(), s.tone.color().mix(SURFACE_ALPHA).filled()))
        .collect();
    let edges = overlay
        .surfaces
        .iter()
        .filter(|s| s.outlined)
        .map(|s| {
            let mut ring = s.corners.to_vec();
            ring.push(s.corners[0]);
            PathElement::new(ring, BLACK.mix(0.35))
        })
        .collect();
    (faces, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(shape: &str) -> GeometryParams {
        GeometryParams {
            shape: shape.to_string(),
            ..GeometryParams::default()
        }
    }

    #[test]
    fn max_scale_takes_precedence() {
        let p = GeometryParams {
            scale: Some(3.0),
            max_scale: Some(7.0),
            ..params("sphere")
        };
        assert_eq!(Geometry::from_params(&p), Geometry::Sphere { radius: 7.0 });
    }

    #[test]
    fn missing_extents_fall_back_to_defaults() {
        assert_eq!(
            Geometry::from_params(&params("finite_slab")),
            Geometry::FiniteSlab {
                x_length: 1.0,
                y_length: 1.0,
                z_length: 1.0
            }
        );
        assert_eq!(
            Geometry::from_params(&params("double_slab")),
            Geometry::DoubleSlab {
                x_init: 0.0,
                total_length: 10.0,
                ratio: 1.0
            }
        );
    }

    #[test]
    fn unknown_shape_degrades_to_scale_axis() {
        let g = Geometry::from_params(&params("torus"));
        assert_eq!(g.axis_label(), "Scale");
        assert_eq!(g.shape_name(), "torus");
        let overlay = g.overlay();
        assert!(overlay.surfaces.is_empty());
        assert_eq!(overlay.limits, AxisLimits::default());
    }

    #[test]
    fn hyphenated_shape_names_are_accepted() {
        let g = Geometry::from_params(&GeometryParams {
            scale: Some(2.0),
            ..params("Regular-Slab")
        });
        assert_eq!(
            g,
            Geometry::RegularSlab {
                x_init: 0.0,
                length: 2.0
            }
        );
    }

    #[test]
    fn negative_length_slab_limits_are_ordered() {
        let overlay = Geometry::RegularSlab {
            x_init: 5.0,
            length: -3.0,
        }
        .overlay();
        assert_eq!(overlay.limits.x, Some((0.0, 7.0)));
    }

    #[test]
    fn finite_slab_box_has_six_faces_and_padding() {
        let overlay = Geometry::FiniteSlab {
            x_length: 2.0,
            y_length: 4.0,
            z_length: 10.0,
        }
        .overlay();
        assert_eq!(overlay.surfaces.len(), 6);
        let (x_lo, x_hi) = overlay.limits.x.unwrap();
        assert_relative_eq!(x_lo, -3.0);
        assert_relative_eq!(x_hi, 3.0);
        let (z_lo, z_hi) = overlay.limits.z.unwrap();
        assert_relative_eq!(z_lo, -2.0);
        assert_relative_eq!(z_hi, 12.0);
        let extent = overlay.extent().unwrap();
        assert_eq!(extent.min, (-1.0, -2.0, 0.0));
        assert_eq!(extent.max, (1.0, 2.0, 10.0));
    }

    #[test]
    fn double_slab_interface_is_tinted() {
        let overlay = Geometry::DoubleSlab {
            x_init: 1.0,
            total_length: 8.0,
            ratio: 0.25,
        }
        .overlay();
        let tones: Vec<(f64, Tone)> = overlay
            .surfaces
            .iter()
            .map(|s| (s.corners[0].0, s.tone))
            .collect();
        assert_eq!(
            tones,
            vec![
                (1.0, Tone::Boundary),
                (3.0, Tone::Interface),
                (9.0, Tone::Boundary)
            ]
        );
        assert_eq!(overlay.limits.x, Some((-1.0, 11.0)));
    }

    #[test]
    fn sphere_mesh_is_closed_at_radius() {
        let overlay = Geometry::Sphere { radius: 3.0 }.overlay();
        assert_eq!(overlay.surfaces.len(), 19 * 19);
        for s in &overlay.surfaces {
            assert!(s.outlined);
            for &(x, y, z) in &s.corners {
                assert_relative_eq!((x * x + y * y + z * z).sqrt(), 3.0, epsilon = 1e-9);
            }
        }
        let extent = overlay.extent().unwrap();
        assert_relative_eq!(extent.max.2, 3.0, epsilon = 1e-12);
        assert_relative_eq!(extent.min.2, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn free_axes_follow_extent_with_margin() {
        let limits = AxisLimits {
            x: Some((-2.0, 12.0)),
            ..AxisLimits::default()
        };
        let extent = Extent {
            min: (0.0, -10.0, 0.0),
            max: (1.0, 10.0, 0.0),
        };
        let bounds = SceneBounds::resolve(&limits, Some(&extent));
        assert_eq!(bounds.x, (-2.0, 12.0));
        assert_relative_eq!(bounds.y.0, -11.0);
        assert_relative_eq!(bounds.y.1, 11.0);
        assert_eq!(bounds.z, (-1.0, 1.0));
    }

    #[test]
    fn zero_radius_sphere_still_has_room() {
        let overlay = Geometry::Sphere { radius: 0.0 }.overlay();
        let bounds = SceneBounds::resolve(&overlay.limits, overlay.extent().as_ref());
        assert_eq!(bounds.x, (-1.0, 1.0));
        assert_eq!(bounds.z, (-1.0, 1.0));
    }

    #[test]
    fn empty_scene_uses_unit_bounds() {
        let bounds = SceneBounds::resolve(&AxisLimits::default(), None);
        assert_eq!(bounds.x, (-1.0, 1.0));
        assert_eq!(bounds.y, (-1.0, 1.0));
        assert_eq!(bounds.z, (-1.0, 1.0));
    }

    #[test]
    fn only_meshed_surfaces_get_edges() {
        let (faces, edges) = overlay_elements(&Geometry::Sphere { radius: 1.0 }.overlay());
        assert_eq!(faces.len(), 361);
        assert_eq!(edges.len(), 361);
        let slab = Geometry::RegularSlab {
            x_init: 0.0,
            length: 1.0,
        };
        let (faces, edges) = overlay_elements(&slab.overlay());
        assert_eq!(faces.len(), 2);
        assert!(edges.is_empty());
    }
}
