//! Quadrature rules on the unit interval and the reference triangle.

use crate::{geometry::TriangleGeometry, Coord};

use std::f64::consts::PI;

/// A quadrature rule defined on the reference triangle
/// $hat(K) = {hat(x) >= 0, hat(x)_1 + hat(x)_2 <= 1}$.
///
/// Weights sum to the reference area $1/2$.
#[derive(Debug, Clone)]
pub struct QuadRule {
  nodes: Vec<Coord>,
  weights: Vec<f64>,
}

impl QuadRule {
  /// Collapsed (Duffy) tensor product Gauss-Legendre rule with `n*n` nodes.
  ///
  /// Exact for polynomials of total degree up to $2n - 2$.
  pub fn collapsed_gauss(n: usize) -> Self {
    let (points, weights1d) = gauss_legendre_unit(n);

    let mut nodes = Vec::with_capacity(n * n);
    let mut weights = Vec::with_capacity(n * n);
    for (&t, &wt) in points.iter().zip(&weights1d) {
      for (&s, &ws) in points.iter().zip(&weights1d) {
        // $(s, t) |-> (s (1 - t), t)$ with Jacobian $1 - t$.
        nodes.push(Coord::new(s * (1.0 - t), t));
        weights.push(ws * wt * (1.0 - t));
      }
    }
    Self { nodes, weights }
  }

  /// Smallest collapsed rule integrating total degree `degree` exactly.
  pub fn of_degree(degree: usize) -> Self {
    Self::collapsed_gauss(degree.div_ceil(2) + 1)
  }

  pub fn npoints(&self) -> usize {
    self.nodes.len()
  }
  pub fn nodes(&self) -> &[Coord] {
    &self.nodes
  }
  pub fn weights(&self) -> &[f64] {
    &self.weights
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Coord, f64)> + '_ {
    self.nodes.iter().zip(self.weights.iter().copied())
  }

  pub fn apply_ref<F>(&self, f: F) -> f64
  where
    F: Fn(&Coord) -> f64,
  {
    self.iter().map(|(n, w)| w * f(n)).sum()
  }

  /// Integrate `f` given in physical coordinates over `geo`.
  pub fn apply<F>(&self, f: F, geo: &TriangleGeometry) -> f64
  where
    F: Fn(&Coord) -> f64,
  {
    geo.det().abs() * self.apply_ref(|n| f(&geo.ref_to_phys(n)))
  }
}

/// Gauss-Legendre points and weights on $[0,1]$.
///
/// Roots of the Legendre polynomial are found by Newton iteration
/// starting from the Chebyshev-like initial guesses.
pub fn gauss_legendre_unit(n: usize) -> (Vec<f64>, Vec<f64>) {
  assert!(n > 0, "gauss rule needs at least one point");
  const MAX_ITER: usize = 100;

  let mut points = vec![0.0; n];
  let mut weights = vec![0.0; n];
  for i in 0..n.div_ceil(2) {
    let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
    for _ in 0..MAX_ITER {
      let (p, dp) = legendre_with_derivative(n, x);
      let dx = p / dp;
      x -= dx;
      if dx.abs() <= f64::EPSILON {
        break;
      }
    }
    let (_, dp) = legendre_with_derivative(n, x);
    let w = 2.0 / ((1.0 - x * x) * dp * dp);

    // map from $[-1,1]$ to $[0,1]$, ascending
    points[i] = 0.5 * (1.0 - x);
    points[n - 1 - i] = 0.5 * (1.0 + x);
    weights[i] = 0.5 * w;
    weights[n - 1 - i] = 0.5 * w;
  }
  (points, weights)
}

/// $P_n(x)$ and $P_n'(x)$ through the three-term recurrence.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
  let mut p0 = 1.0;
  let mut p1 = x;
  if n == 0 {
    return (1.0, 0.0);
  }
  for k in 2..=n {
    let k = k as f64;
    let p2 = ((2.0 * k - 1.0) * x * p1 - (k - 1.0) * p0) / k;
    p0 = p1;
    p1 = p2;
  }
  let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
  (p1, dp)
}

#[cfg(test)]
mod test {
  use super::*;
  use approx::assert_relative_eq;

  fn factorial(n: u32) -> f64 {
    (1..=n).map(f64::from).product()
  }

  #[test]
  fn gauss_legendre_integrates_monomials() {
    for n in 1..=8 {
      let (points, weights) = gauss_legendre_unit(n);
      assert!(points.windows(2).all(|w| w[0] < w[1]));
      for k in 0..2 * n as i32 {
        let computed: f64 = points
          .iter()
          .zip(&weights)
          .map(|(x, w)| w * x.powi(k))
          .sum();
        assert_relative_eq!(computed, 1.0 / (k + 1) as f64, epsilon = 1e-14);
      }
    }
  }

  #[test]
  fn triangle_rule_integrates_monomials() {
    // $integral_(hat(K)) x^a y^b = a! b! / (a + b + 2)!$
    for n in 1..=6 {
      let rule = QuadRule::collapsed_gauss(n);
      assert_eq!(rule.npoints(), n * n);
      let max_degree = 2 * n as u32 - 2;
      for a in 0..=max_degree {
        for b in 0..=(max_degree - a) {
          let computed = rule.apply_ref(|x| x.x.powi(a as i32) * x.y.powi(b as i32));
          let exact = factorial(a) * factorial(b) / factorial(a + b + 2);
          assert_relative_eq!(computed, exact, epsilon = 1e-14);
        }
      }
    }
  }

  #[test]
  fn physical_integration() {
    let geo = TriangleGeometry::new([
      Coord::new(1.0, 1.0),
      Coord::new(1.0, 3.0),
      Coord::new(4.0, 1.0),
    ]);
    let rule = QuadRule::of_degree(2);
    assert_relative_eq!(rule.apply(|_| 1.0, &geo), 3.0, epsilon = 1e-13);
    // centroid times area
    assert_relative_eq!(rule.apply(|x| x.x, &geo), 2.0 * 3.0, epsilon = 1e-13);
  }
}
