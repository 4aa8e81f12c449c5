use crate::{
  error::{Error, Result},
  expression::ScalarField,
  space::FeSpace,
  Coord, DofIdx,
};

use std::rc::Rc;

/// A finite element function: basis coefficients over a [`FeSpace`].
#[derive(Debug, Clone)]
pub struct FeFunction {
  space: Rc<FeSpace>,
  coeffs: na::DVector<f64>,
  name: String,
}

impl FeFunction {
  pub fn new(space: Rc<FeSpace>, coeffs: na::DVector<f64>) -> Self {
    assert_eq!(
      coeffs.len(),
      space.ndofs(),
      "coefficient vector does not match space dimension"
    );
    Self {
      space,
      coeffs,
      name: String::from("f"),
    }
  }

  /// Nodal interpolant of `field`, i.e. `field` evaluated in all dof coordinates.
  pub fn interpolate(space: Rc<FeSpace>, field: &(impl ScalarField + ?Sized)) -> Self {
    let coeffs = na::DVector::from_iterator(
      space.ndofs(),
      space.dof_coords().iter().map(|x| field.eval(x)),
    );
    Self::new(space, coeffs)
  }

  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
  }
  pub fn coeffs(&self) -> &na::DVector<f64> {
    &self.coeffs
  }
  pub fn coeff(&self, idof: DofIdx) -> f64 {
    self.coeffs[idof]
  }

  pub fn name(&self) -> &str {
    &self.name
  }
  pub fn rename(&mut self, name: impl Into<String>) {
    self.name = name.into();
  }
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.rename(name);
    self
  }

  /// Values on the mesh vertices, in vertex order.
  pub fn vertex_values(&self) -> na::DVector<f64> {
    let nvertices = self.space.mesh().nvertices();
    na::DVector::from_iterator(
      nvertices,
      (0..nvertices).map(|ivertex| self.coeffs[self.space.vertex_dof(ivertex)]),
    )
  }

  /// Point evaluation, locating the containing cell by a linear search.
  pub fn eval(&self, x: &Coord) -> Result<f64> {
    let outside = || Error::PointOutsideMesh { x: x.x, y: x.y };
    let mesh = self.space.mesh();
    let icell = mesh.locate(x).ok_or_else(outside)?;
    let ref_x = mesh.cell_geometry(icell).phys_to_ref(x).ok_or_else(outside)?;

    let basis = self.space.element().eval_basis(&ref_x);
    let value = self
      .space
      .dof_handler()
      .local2global(icell)
      .iter()
      .zip(basis.iter())
      .map(|(&idof, &b)| self.coeffs[idof] * b)
      .sum();
    Ok(value)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{expression::Constant, mesh::rectangle::unit_square_mesh};

  use approx::assert_relative_eq;

  fn quadratic(x: &Coord) -> f64 {
    1.0 + x.x * x.x + 2.0 * x.y * x.y
  }

  #[test]
  fn interpolant_reproduces_polynomials() {
    let mesh = Rc::new(unit_square_mesh(3, 2).unwrap());
    for degree in 2..=3 {
      let space = Rc::new(FeSpace::new(mesh.clone(), degree).unwrap());
      let u = FeFunction::interpolate(space, &quadratic);
      for x in [
        Coord::new(0.1, 0.2),
        Coord::new(0.55, 0.95),
        Coord::new(1.0, 1.0),
        Coord::new(0.0, 0.5),
      ] {
        assert_relative_eq!(u.eval(&x).unwrap(), quadratic(&x), epsilon = 1e-12);
      }
    }
  }

  #[test]
  fn vertex_values_and_outside_points() {
    let mesh = Rc::new(unit_square_mesh(2, 2).unwrap());
    let space = Rc::new(FeSpace::new(mesh.clone(), 2).unwrap());
    let u = FeFunction::interpolate(space, &Constant(3.0)).with_name("u");
    assert_eq!(u.name(), "u");
    assert_eq!(u.vertex_values().len(), mesh.nvertices());
    assert!(u.vertex_values().iter().all(|&v| v == 3.0));

    let err = u.eval(&Coord::new(2.0, 0.5)).unwrap_err();
    assert!(matches!(err, Error::PointOutsideMesh { .. }));
  }
}
