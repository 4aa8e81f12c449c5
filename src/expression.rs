//! Scalar fields used as source terms, boundary data and exact solutions.

use crate::Coord;

/// A scalar function on the plane.
///
/// Implemented for every `Fn(&Coord) -> f64`, so plain closures can be passed
/// wherever a field is expected.
pub trait ScalarField {
  fn eval(&self, x: &Coord) -> f64;
}

impl<F> ScalarField for F
where
  F: Fn(&Coord) -> f64,
{
  fn eval(&self, x: &Coord) -> f64 {
    self(x)
  }
}

/// A spatially constant field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl ScalarField for Constant {
  fn eval(&self, _x: &Coord) -> f64 {
    self.0
  }
}

impl From<f64> for Constant {
  fn from(value: f64) -> Self {
    Self(value)
  }
}
