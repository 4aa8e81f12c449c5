//! Essential (Dirichlet) boundary conditions.

use crate::{
  expression::ScalarField, space::FeSpace, sparse::SparseMatrix, Coord, DofIdx,
};

/// Prescribed values on a set of dofs.
#[derive(Debug, Clone, Default)]
pub struct DirichletBc {
  dof_coeffs: Vec<(DofIdx, f64)>,
}

impl DirichletBc {
  /// Fix all dofs for which `marker(x, on_boundary)` holds to the value of `g` in their coordinate.
  ///
  /// `on_boundary` tells whether the dof lies on the mesh boundary.
  pub fn new<G, M>(space: &FeSpace, g: &G, marker: M) -> Self
  where
    G: ScalarField + ?Sized,
    M: Fn(&Coord, bool) -> bool,
  {
    let boundary_flags = space.flag_boundary_dofs();
    let dof_coeffs: Vec<_> = space
      .dof_coords()
      .iter()
      .enumerate()
      .filter(|&(idof, x)| marker(x, boundary_flags[idof]))
      .map(|(idof, x)| (idof, g.eval(x)))
      .collect();

    if dof_coeffs.is_empty() {
      tracing::warn!("dirichlet condition marks no dofs");
    }
    Self { dof_coeffs }
  }

  /// Fix all dofs on the mesh boundary to the value of `g`.
  pub fn on_boundary<G>(space: &FeSpace, g: &G) -> Self
  where
    G: ScalarField + ?Sized,
  {
    Self::new(space, g, |_, on_boundary| on_boundary)
  }

  pub fn from_dof_coeffs(dof_coeffs: Vec<(DofIdx, f64)>) -> Self {
    Self { dof_coeffs }
  }

  pub fn dof_coeffs(&self) -> &[(DofIdx, f64)] {
    &self.dof_coeffs
  }
  pub fn dofs(&self) -> impl Iterator<Item = DofIdx> + '_ {
    self.dof_coeffs.iter().map(|&(idof, _)| idof)
  }
  pub fn len(&self) -> usize {
    self.dof_coeffs.len()
  }
  pub fn is_empty(&self) -> bool {
    self.dof_coeffs.is_empty()
  }

  pub fn apply(&self, galmat: &mut SparseMatrix, galvec: &mut na::DVector<f64>) {
    fix_dofs_coeff(&self.dof_coeffs, galmat, galvec);
  }
}

/// Fix DOFs of FE solution.
///
/// Used to enforce essential dirichlet boundary conditions.
///
/// Modifies the galerkin matrix and galerkin vector,
/// such that the FE solution has the given coefficients on the dofs.
/// The system stays symmetric.
/// $mat(A_0, 0; 0, I) vec(mu_0, mu_diff) = vec(phi - A_(0 diff) gamma, gamma)$
pub fn fix_dofs_coeff(
  dof_coeffs: &[(DofIdx, f64)],
  galmat: &mut SparseMatrix,
  galvec: &mut na::DVector<f64>,
) {
  let ndofs = galmat.nrows();

  let mut dof_coeffs_opt = vec![None; ndofs];
  for &(idof, v) in dof_coeffs {
    dof_coeffs_opt[idof] = Some(v);
  }
  let dof_coeffs_zeroed =
    na::DVector::from_iterator(ndofs, dof_coeffs_opt.iter().map(|v| v.unwrap_or(0.0)));

  // Modify galvec.
  *galvec -= galmat.mul_vec(&dof_coeffs_zeroed);

  // Set galvec to prescribed coefficients.
  dof_coeffs.iter().for_each(|&(i, v)| galvec[i] = v);

  // Set entries zero that share a (row or column) index with a fixed dof.
  galmat.set_zero(|r, c| dof_coeffs_opt[r].is_some() || dof_coeffs_opt[c].is_some());

  // Set galmat diagonal for dofs to one.
  for &(i, _) in dof_coeffs {
    galmat.push(i, i, 1.0);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{expression::Constant, mesh::rectangle::unit_square_mesh};

  use std::rc::Rc;

  #[test]
  fn fixes_boundary_values() {
    let mesh = Rc::new(unit_square_mesh(3, 3).unwrap());
    let space = FeSpace::new(mesh, 2).unwrap();
    let g = |x: &Coord| x.x + 10.0 * x.y;
    let bc = DirichletBc::on_boundary(&space, &g);
    assert_eq!(bc.len(), space.boundary_dofs().len());
    for &(idof, v) in bc.dof_coeffs() {
      assert_eq!(v, g(&space.dof_coord(idof)));
    }
  }

  #[test]
  fn marker_selects_subset() {
    let mesh = Rc::new(unit_square_mesh(4, 2).unwrap());
    let space = FeSpace::new(mesh, 1).unwrap();
    let left = DirichletBc::new(&space, &Constant(1.0), |x, on_boundary| {
      on_boundary && x.x < 1e-14
    });
    assert_eq!(left.len(), 3);
    assert!(left.dofs().all(|idof| space.dof_coord(idof).x == 0.0));

    let none = DirichletBc::new(&space, &Constant(1.0), |_, _| false);
    assert!(none.is_empty());
  }

  #[test]
  fn elimination_keeps_symmetry() {
    #[rustfmt::skip]
    let dense = na::DMatrix::from_row_slice(3, 3, &[
       2.0, -1.0,  0.0,
      -1.0,  2.0, -1.0,
       0.0, -1.0,  2.0,
    ]);
    let mut galmat = SparseMatrix::zeros(3, 3);
    for r in 0..3 {
      for c in 0..3 {
        galmat.push(r, c, dense[(r, c)]);
      }
    }
    let mut galvec = na::DVector::from_element(3, 1.0);

    let bc = DirichletBc::from_dof_coeffs(vec![(0, 4.0)]);
    assert_eq!(bc.dofs().collect::<Vec<_>>(), vec![0]);
    bc.apply(&mut galmat, &mut galvec);

    let fixed = galmat.to_nalgebra_dense();
    assert_eq!(fixed, fixed.transpose());
    assert_eq!(fixed.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0, 0.0]);
    assert_eq!(galvec, na::DVector::from_column_slice(&[4.0, 5.0, 1.0]));
  }
}
