//! Element matrix/vector providers and the global assembly algorithms.

use crate::{
  element::LagrangeElement, expression::ScalarField, geometry::TriangleGeometry,
  quadrature::QuadRule, space::FeSpace, sparse::SparseMatrix,
};

pub trait ElmatProvider {
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DMatrix<f64>;
}

impl<F> ElmatProvider for F
where
  F: Fn(&LagrangeElement, &TriangleGeometry) -> na::DMatrix<f64>,
{
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DMatrix<f64> {
    self(element, geo)
  }
}

pub trait ElvecProvider {
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DVector<f64>;
}

impl<F> ElvecProvider for F
where
  F: Fn(&LagrangeElement, &TriangleGeometry) -> na::DVector<f64>,
{
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DVector<f64> {
    self(element, geo)
  }
}

/// Element Matrix Provider for the negative Laplacian.
///
/// $A = [integral_K nabla phi_j dot nabla phi_i dif x]_(i,j)$
///
/// Exact if the quadrature integrates degree $2(p-1)$, which is the default.
pub struct LaplaceElmat {
  qr: QuadRule,
}

impl LaplaceElmat {
  pub fn new(degree: usize) -> Self {
    Self::with_quadrature(QuadRule::of_degree(2 * degree.saturating_sub(1)))
  }
  pub fn with_quadrature(qr: QuadRule) -> Self {
    Self { qr }
  }
}

impl ElmatProvider for LaplaceElmat {
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DMatrix<f64> {
    let ndofs = element.ndofs();
    let inv_jt = geo.inverse_transpose_jacobian();
    let abs_det = geo.det().abs();

    let mut elmat = na::DMatrix::zeros(ndofs, ndofs);
    for (node, w) in self.qr.iter() {
      let grads = inv_jt * element.eval_basis_grads(node);
      elmat.gemm_tr(w * abs_det, &grads, &grads, 1.0);
    }
    elmat.fill_lower_triangle_with_upper_triangle();
    elmat
  }
}

/// Element Matrix Provider for the mass bilinear form.
///
/// $M = [integral_K phi_j phi_i dif x]_(i,j)$
pub struct MassElmat {
  qr: QuadRule,
}

impl MassElmat {
  pub fn new(degree: usize) -> Self {
    Self::with_quadrature(QuadRule::of_degree(2 * degree))
  }
  pub fn with_quadrature(qr: QuadRule) -> Self {
    Self { qr }
  }
}

impl ElmatProvider for MassElmat {
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DMatrix<f64> {
    let ndofs = element.ndofs();
    let abs_det = geo.det().abs();

    let mut elmat = na::DMatrix::zeros(ndofs, ndofs);
    for (node, w) in self.qr.iter() {
      let values = element.eval_basis(node);
      elmat.ger(w * abs_det, &values, &values, 1.0);
    }
    elmat.fill_lower_triangle_with_upper_triangle();
    elmat
  }
}

/// Element Vector Provider for a scalar source term.
///
/// $b = [integral_K f phi_i dif x]_i$
///
/// Exact for sources that are polynomials of degree up to the one
/// the quadrature was chosen for (default: degree $p + 2$).
pub struct LoadElvec<'a, F: ?Sized> {
  source: &'a F,
  qr: QuadRule,
}

impl<'a, F: ScalarField + ?Sized> LoadElvec<'a, F> {
  pub fn new(source: &'a F, degree: usize) -> Self {
    Self::with_quadrature(source, QuadRule::of_degree(degree + 2))
  }
  pub fn with_quadrature(source: &'a F, qr: QuadRule) -> Self {
    Self { source, qr }
  }
}

impl<F: ScalarField + ?Sized> ElvecProvider for LoadElvec<'_, F> {
  fn eval(&self, element: &LagrangeElement, geo: &TriangleGeometry) -> na::DVector<f64> {
    let abs_det = geo.det().abs();
    let mut elvec = na::DVector::zeros(element.ndofs());
    for (node, w) in self.qr.iter() {
      let f = self.source.eval(&geo.ref_to_phys(node));
      elvec.axpy(w * abs_det * f, &element.eval_basis(node), 1.0);
    }
    elvec
  }
}

/// Assembly algorithm for the Galerkin Matrix.
pub fn assemble_galmat(space: &FeSpace, elmat: impl ElmatProvider) -> SparseMatrix {
  let ndofs = space.ndofs();
  let mesh = space.mesh();
  let dofh = space.dof_handler();

  let mut galmat = SparseMatrix::zeros(ndofs, ndofs);
  for icell in 0..mesh.ncells() {
    let elmat = elmat.eval(space.element(), &mesh.cell_geometry(icell));
    let dofs = dofh.local2global(icell);
    for (ilocal, &iglobal) in dofs.iter().enumerate() {
      for (jlocal, &jglobal) in dofs.iter().enumerate() {
        galmat.push(iglobal, jglobal, elmat[(ilocal, jlocal)]);
      }
    }
  }
  tracing::debug!(
    "assembled galerkin matrix {ndofs}x{ndofs} from {} triplets",
    galmat.ntriplets()
  );
  galmat
}

/// Assembly algorithm for the Galerkin Vector.
pub fn assemble_galvec(space: &FeSpace, elvec: impl ElvecProvider) -> na::DVector<f64> {
  let mesh = space.mesh();
  let dofh = space.dof_handler();

  let mut galvec = na::DVector::zeros(space.ndofs());
  for icell in 0..mesh.ncells() {
    let elvec = elvec.eval(space.element(), &mesh.cell_geometry(icell));
    for (ilocal, &iglobal) in dofh.local2global(icell).iter().enumerate() {
      galvec[iglobal] += elvec[ilocal];
    }
  }
  galvec
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    expression::Constant,
    mesh::rectangle::{unit_square_mesh, Diagonal, RectangleMeshInfo},
    Coord,
  };

  use approx::assert_relative_eq;
  use std::rc::Rc;

  #[test]
  fn laplace_elmat_ref_p1() {
    // This expected element matrix is the classical one of the reference triangle.
    #[rustfmt::skip]
    let expected = 0.5 * na::DMatrix::from_row_slice(3, 3, &[
       2.0, -1.0, -1.0,
      -1.0,  1.0,  0.0,
      -1.0,  0.0,  1.0,
    ]);
    let element = LagrangeElement::new(1).unwrap();
    let computed = LaplaceElmat::new(1).eval(&element, &TriangleGeometry::new_ref());
    assert_relative_eq!(computed, expected, epsilon = 1e-14);
  }

  #[test]
  fn laplace_elmat_kernel_is_constants() {
    let geo = TriangleGeometry::new([
      Coord::new(0.1, 0.2),
      Coord::new(0.7, 0.3),
      Coord::new(0.4, 0.9),
    ]);
    for degree in 1..=4 {
      let element = LagrangeElement::new(degree).unwrap();
      let elmat = LaplaceElmat::new(degree).eval(&element, &geo);
      assert_eq!(elmat, elmat.transpose());
      for row_sum in elmat.column_sum().iter() {
        assert!(row_sum.abs() < 1e-12, "row sum {row_sum} for degree {degree}");
      }
    }
  }

  #[test]
  fn mass_matrix_sums_to_area() {
    let mesh = Rc::new(
      RectangleMeshInfo::new_unit(3, 2)
        .with_diagonal(Diagonal::Crossed)
        .to_mesh()
        .unwrap(),
    );
    for degree in 1..=3 {
      let space = FeSpace::new(mesh.clone(), degree).unwrap();
      let mass = assemble_galmat(&space, MassElmat::new(degree)).to_nalgebra_dense();
      assert_relative_eq!(mass.sum(), 1.0, epsilon = 1e-13);
    }
  }

  #[test]
  fn p1_galmat_is_five_point_stencil() {
    // On right-diagonal meshes the P1 stiffness matrix is the scaled 5-point stencil.
    let (nx, ny) = (4, 3);
    let (hx, hy) = (1.0 / nx as f64, 1.0 / ny as f64);
    let mesh = Rc::new(unit_square_mesh(nx, ny).unwrap());
    let space = FeSpace::new(mesh, 1).unwrap();
    let galmat = assemble_galmat(&space, LaplaceElmat::new(1)).to_nalgebra_dense();

    let center = (nx + 1) + 1;
    assert_relative_eq!(galmat[(center, center)], 2.0 * (hy / hx + hx / hy), epsilon = 1e-13);
    assert_relative_eq!(galmat[(center, center + 1)], -hy / hx, epsilon = 1e-13);
    assert_relative_eq!(galmat[(center, center + nx + 1)], -hx / hy, epsilon = 1e-13);
    assert_relative_eq!(galmat[(center, center + nx + 2)], 0.0, epsilon = 1e-13);
  }

  #[test]
  fn load_vector_of_constant() {
    let mesh = Rc::new(unit_square_mesh(5, 3).unwrap());
    for degree in 1..=3 {
      let space = FeSpace::new(mesh.clone(), degree).unwrap();
      let galvec = assemble_galvec(&space, LoadElvec::new(&Constant(-6.0), degree));
      assert_relative_eq!(galvec.sum(), -6.0, epsilon = 1e-12);
    }
  }
}
