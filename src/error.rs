use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("invalid mesh resolution {nx}x{ny}: need at least one subdivision per direction")]
  InvalidResolution { nx: usize, ny: usize },

  #[error("unsupported lagrange degree {degree}: expected 1..={max}")]
  UnsupportedDegree { degree: usize, max: usize },

  #[error("invalid domain: {0}")]
  InvalidDomain(String),

  #[error("quadrature rule with {npoints} points per direction: need at least one")]
  InvalidQuadrature { npoints: usize },

  #[error("factorization of galerkin matrix failed: {0}")]
  Factorization(String),

  #[error("max error: {max_error:e} for 2({nx}x{ny}) mesh and degree={degree} (tolerance {tol:e})")]
  ToleranceExceeded {
    max_error: f64,
    tol: f64,
    nx: usize,
    ny: usize,
    degree: usize,
  },

  #[error("point ({x}, {y}) lies outside of the mesh")]
  PointOutsideMesh { x: f64, y: f64 },

  #[error("vtk export failed: {0}")]
  Vtk(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}
