use drape_core::{DrapeError, Result, SurfaceId};
use drape_core::traits::Validate;
use drape_math::aabb::Aabb3;
use drape_math::{Point2, Point3, Ray, Vector3};

use crate::surface::RayHit;

const INTERSECT_EPS: f64 = 1e-12;

/// An indexed triangle mesh usable as a sketching target surface.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    pub id: SurfaceId,
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            id: SurfaceId::new(),
            positions,
            normals: Vec::new(),
            indices,
        };
        mesh.compute_normals();
        mesh
    }

    /// Tessellate a planar patch `origin + u * u_axis + v * v_axis`,
    /// `u, v` in `[0, 1]`, into an `nu x nv` grid of quads (two triangles
    /// each).
    pub fn planar_grid(
        origin: Point3,
        u_axis: Vector3,
        v_axis: Vector3,
        nu: usize,
        nv: usize,
    ) -> Self {
        let mut positions = Vec::with_capacity((nu + 1) * (nv + 1));
        for j in 0..=nv {
            for i in 0..=nu {
                let u = i as f64 / nu as f64;
                let v = j as f64 / nv as f64;
                positions.push(origin + u_axis * u + v_axis * v);
            }
        }

        let mut indices = Vec::with_capacity(nu * nv * 6);
        let stride = (nu + 1) as u32;
        for j in 0..nv as u32 {
            for i in 0..nu as u32 {
                let a = j * stride + i;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }

        Self::new(positions, indices)
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Merge another mesh into this one, offsetting indices appropriately.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Compute vertex normals from triangle indices.
    ///
    /// For shared vertices this accumulates normals from all adjacent faces
    /// and normalizes the result (smooth shading approximation).
    pub fn compute_normals(&mut self) {
        let n = self.positions.len();
        self.normals.clear();
        self.normals.resize(n, Vector3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];
            let normal = (p1 - p0).cross(p2 - p0);
            self.normals[i0] += normal;
            self.normals[i1] += normal;
            self.normals[i2] += normal;
        }

        for n in &mut self.normals {
            let len = n.length();
            if len > 1e-12 {
                *n /= len;
            }
        }
    }

    /// Compute the axis-aligned bounding box of all positions.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(&self.positions).unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }

    fn triangle(&self, face: usize) -> (Point3, Point3, Point3) {
        let i = face * 3;
        (
            self.positions[self.indices[i] as usize],
            self.positions[self.indices[i + 1] as usize],
            self.positions[self.indices[i + 2] as usize],
        )
    }

    /// Nearest forward ray intersection within `max_param`.
    pub fn intersect_ray(&self, ray: &Ray, max_param: f64) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;
        for face in 0..self.triangle_count() {
            let (p0, p1, p2) = self.triangle(face);
            if let Some((t, u, v)) = intersect_triangle(ray, p0, p1, p2) {
                if t <= max_param && nearest.as_ref().map_or(true, |h| t < h.t) {
                    nearest = Some(RayHit {
                        point: ray.at(t),
                        t,
                        face: face as u32,
                        barycentric: Point2::new(u, v),
                    });
                }
            }
        }
        nearest
    }

    /// Closest point on the mesh surface and the normal of its triangle.
    ///
    /// `None` for a mesh with no triangles.
    pub fn closest_point_and_normal(&self, point: Point3) -> Option<(Point3, Vector3)> {
        let mut best: Option<(f64, Point3, Vector3)> = None;
        for face in 0..self.triangle_count() {
            let (p0, p1, p2) = self.triangle(face);
            let candidate = closest_point_on_triangle(point, p0, p1, p2);
            let dist_sq = (candidate - point).length_squared();
            if best.as_ref().map_or(true, |(d, _, _)| dist_sq < *d) {
                let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
                best = Some((dist_sq, candidate, normal));
            }
        }
        best.map(|(_, p, n)| (p, n))
    }
}

impl Validate for TriangleMesh {
    fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(DrapeError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let n = self.positions.len() as u32;
        for &i in &self.indices {
            if i >= n {
                return Err(DrapeError::InvalidMesh(format!(
                    "index {} out of range for {} vertices",
                    i, n
                )));
            }
        }
        Ok(())
    }
}

/// Moeller-Trumbore ray/triangle intersection. Returns `(t, u, v)` for a
/// forward hit, with `(u, v)` the barycentric coordinates of `p1`, `p2`.
fn intersect_triangle(ray: &Ray, p0: Point3, p1: Point3, p2: Point3) -> Option<(f64, f64, f64)> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;

    let pvec = ray.direction.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < INTERSECT_EPS {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - p0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(qvec) * inv_det;
    if t < INTERSECT_EPS {
        return None;
    }
    Some((t, u, v))
}

/// Closest point on triangle `abc` to `p` (Voronoi-region walk).
fn closest_point_on_triangle(p: Point3, a: Point3, b: Point3, c: Point3) -> Point3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
