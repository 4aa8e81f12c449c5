//! Verification of discrete solutions against known exact solutions.

use crate::{
  error::{Error, Result},
  expression::ScalarField,
  function::FeFunction,
  poisson::solve_poisson,
  quadrature::QuadRule,
  space::FeSpace,
};

use std::rc::Rc;

/// Nodal interpolant of `exact` in `space`.
pub fn interpolate(exact: &(impl ScalarField + ?Sized), space: &Rc<FeSpace>) -> FeFunction {
  FeFunction::interpolate(Rc::clone(space), exact)
}

/// Largest absolute difference between the dof values of `u`
/// and the nodal interpolant of `exact`.
///
/// NaN coefficients make the error NaN.
pub fn max_dof_error(u: &FeFunction, exact: &(impl ScalarField + ?Sized)) -> f64 {
  let exact = interpolate(exact, u.space());
  max_abs((exact.coeffs() - u.coeffs()).iter().copied())
}

/// Largest absolute difference on the mesh vertices only.
pub fn max_vertex_error(u: &FeFunction, exact: &(impl ScalarField + ?Sized)) -> f64 {
  let mesh = u.space().mesh();
  max_abs(
    u.vertex_values()
      .iter()
      .enumerate()
      .map(|(ivertex, &v)| v - exact.eval(&mesh.vertex(ivertex))),
  )
}

/// Maximum norm that propagates NaN, unlike `f64::max` and `amax`.
fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
  values.fold(0.0, |max, v| {
    if max.is_nan() || v.is_nan() {
      f64::NAN
    } else {
      max.max(v.abs())
    }
  })
}

/// $norm(u - u_"exact")_(L^2(Omega))$ computed by quadrature.
///
/// Uses a rule of degree $2p + 4$, so that smooth exact solutions are resolved
/// well beyond the discretization error.
pub fn l2_error(u: &FeFunction, exact: &(impl ScalarField + ?Sized)) -> f64 {
  let space = u.space();
  let mesh = space.mesh();
  let element = space.element();
  let qr = QuadRule::of_degree(2 * space.degree() + 4);

  let mut error_sq = 0.0;
  for icell in 0..mesh.ncells() {
    let geo = mesh.cell_geometry(icell);
    let dofs = space.dof_handler().local2global(icell);
    let local_coeffs = na::DVector::from_iterator(dofs.len(), dofs.iter().map(|&i| u.coeff(i)));
    error_sq += geo.det().abs()
      * qr.apply_ref(|node| {
        let uh = element.eval_basis(node).dot(&local_coeffs);
        (uh - exact.eval(&geo.ref_to_phys(node))).powi(2)
      });
  }
  error_sq.sqrt()
}

/// Solve $-Delta u = f$ with boundary data `exact` on a `nx` x `ny` unit square mesh
/// and check that the dof values match the exact solution up to `tol`.
///
/// Returns the max dof error on success.
pub fn solve_and_verify<F, G>(
  f: &F,
  exact: &G,
  nx: usize,
  ny: usize,
  degree: usize,
  tol: f64,
) -> Result<f64>
where
  F: ScalarField + ?Sized,
  G: ScalarField + ?Sized,
{
  tracing::info!("solving on 2({nx}x{ny}) mesh with P{degree} elements");
  let u = solve_poisson(f, exact, nx, ny, degree)?;
  let max_error = max_dof_error(&u, exact);
  tracing::debug!("max error: {max_error:e} for 2({nx}x{ny}) mesh and degree={degree}");

  // `!(a < b)` also rejects NaN
  if !(max_error < tol) {
    return Err(Error::ToleranceExceeded {
      max_error,
      tol,
      nx,
      ny,
      degree,
    });
  }
  Ok(max_error)
}
