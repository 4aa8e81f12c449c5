use crate::Coord;

/// A non-degenerate triangle in the plane, given by its vertex coordinates.
///
/// Carries the affine map $Phi(hat(x)) = x_0 + J hat(x)$ from the
/// reference triangle $hat(K) = {hat(x) >= 0, hat(x)_1 + hat(x)_2 <= 1}$.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGeometry {
  vertices: [Coord; 3],
  jacobian: na::Matrix2<f64>,
  det: f64,
}

impl TriangleGeometry {
  pub fn new(vertices: [Coord; 3]) -> Self {
    let jacobian = na::Matrix2::from_columns(&[vertices[1] - vertices[0], vertices[2] - vertices[0]]);
    let det = jacobian.determinant();
    Self {
      vertices,
      jacobian,
      det,
    }
  }

  pub fn new_ref() -> Self {
    Self::new([Coord::zeros(), Coord::x(), Coord::y()])
  }

  pub fn vertices(&self) -> &[Coord; 3] {
    &self.vertices
  }
  pub fn jacobian(&self) -> &na::Matrix2<f64> {
    &self.jacobian
  }

  /// The determinate (signed doubled area) of the triangle.
  pub fn det(&self) -> f64 {
    self.det
  }

  /// The (unsigned) area of the triangle.
  pub fn vol(&self) -> f64 {
    0.5 * self.det.abs()
  }

  /// $J^(-T)$, maps reference gradients to physical gradients.
  ///
  /// The triangle must be non-degenerate, which [`TriangleMesh`](crate::mesh::TriangleMesh)
  /// guarantees for its cells.
  pub fn inverse_transpose_jacobian(&self) -> na::Matrix2<f64> {
    let j = &self.jacobian;
    na::Matrix2::new(j[(1, 1)], -j[(1, 0)], -j[(0, 1)], j[(0, 0)]) / self.det
  }

  pub fn ref_to_phys(&self, ref_coord: &Coord) -> Coord {
    self.vertices[0] + self.jacobian * ref_coord
  }

  pub fn phys_to_ref(&self, coord: &Coord) -> Option<Coord> {
    let inv = self.jacobian.try_inverse()?;
    Some(inv * (coord - self.vertices[0]))
  }

  /// Barycentric coordinates of `coord` with respect to the vertices.
  pub fn barycentric(&self, coord: &Coord) -> Option<[f64; 3]> {
    let r = self.phys_to_ref(coord)?;
    Some([1.0 - r.x - r.y, r.x, r.y])
  }

  /// Whether `coord` lies in the closed triangle, up to `tol` in barycentric coordinates.
  pub fn contains(&self, coord: &Coord, tol: f64) -> bool {
    self
      .barycentric(coord)
      .is_some_and(|bary| bary.iter().all(|&l| l >= -tol))
  }

  pub fn edge_lengths(&self) -> [f64; 3] {
    let [a, b, c] = &self.vertices;
    [(b - a).norm(), (c - a).norm(), (c - b).norm()]
  }

  /// The diameter of the triangle, i.e. its longest edge.
  pub fn diameter(&self) -> f64 {
    self.edge_lengths().into_iter().fold(0.0, f64::max)
  }

  pub fn centroid(&self) -> Coord {
    (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use approx::assert_relative_eq;

  #[test]
  fn ref_triangle() {
    let refgeo = TriangleGeometry::new_ref();
    assert_eq!(refgeo.det(), 1.0);
    assert_eq!(refgeo.vol(), 0.5);
    assert_eq!(*refgeo.jacobian(), na::Matrix2::identity());
  }

  #[test]
  fn affine_map_roundtrip() {
    let geo = TriangleGeometry::new([
      Coord::new(0.5, 0.25),
      Coord::new(1.0, 0.25),
      Coord::new(0.5, 1.0),
    ]);
    assert_relative_eq!(geo.vol(), 0.5 * 0.5 * 0.75);

    let x = Coord::new(0.6, 0.4);
    let r = geo.phys_to_ref(&x).unwrap();
    assert_relative_eq!(geo.ref_to_phys(&r), x, epsilon = 1e-14);

    let product = geo.inverse_transpose_jacobian() * geo.jacobian().transpose();
    assert_relative_eq!(product, na::Matrix2::identity(), epsilon = 1e-14);

    let bary = geo.barycentric(&geo.centroid()).unwrap();
    for l in bary {
      assert_relative_eq!(l, 1.0 / 3.0, epsilon = 1e-14);
    }
    assert!(geo.contains(&x, 0.0));
    assert!(!geo.contains(&Coord::new(1.0, 1.0), 1e-12));
  }

  #[test]
  fn clockwise_has_negative_det() {
    let geo = TriangleGeometry::new([Coord::zeros(), Coord::y(), Coord::x()]);
    assert_eq!(geo.det(), -1.0);
    assert_eq!(geo.vol(), 0.5);
  }
}
