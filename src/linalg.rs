//! Sparse direct solvers for the Galerkin system.

use crate::error::{Error, Result};

use faer::solvers::SpSolver;

/// Backend used to solve the linear system.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LinearSolver {
  /// Sparse Cholesky factorization from faer. Requires an SPD matrix.
  #[default]
  FaerCholesky,
  /// Sparse LU factorization from faer.
  FaerLu,
  /// Sparse Cholesky factorization from nalgebra-sparse.
  NalgebraCholesky,
}

impl LinearSolver {
  pub fn solve(
    self,
    galmat: nas::CscMatrix<f64>,
    galvec: &na::DVector<f64>,
  ) -> Result<na::DVector<f64>> {
    tracing::debug!(
      "solving {}x{} system with {} nonzeros using {self:?}",
      galmat.nrows(),
      galmat.ncols(),
      galmat.nnz()
    );
    match self {
      Self::FaerCholesky => Ok(FaerCholesky::new(galmat)?.solve(galvec)),
      Self::FaerLu => Ok(FaerLu::new(galmat)?.solve(galvec)),
      Self::NalgebraCholesky => {
        let cholesky = nas::factorization::CscCholesky::factor(&galmat)
          .map_err(|err| Error::Factorization(format!("{err:?}")))?;
        Ok(cholesky.solve(galvec).column(0).into_owned())
      }
    }
  }
}

type SparseMatrixFaer = faer::sparse::SparseColMat<usize, f64>;

pub fn nalgebra2faer(m: nas::CscMatrix<f64>) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}
impl FaerLu {
  pub fn new(a: nas::CscMatrix<f64>) -> Result<Self> {
    let raw = nalgebra2faer(a)
      .sp_lu()
      .map_err(|err| Error::Factorization(format!("{err:?}")))?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

pub struct FaerCholesky {
  raw: faer::sparse::linalg::solvers::Cholesky<usize, f64>,
}
impl FaerCholesky {
  pub fn new(a: nas::CscMatrix<f64>) -> Result<Self> {
    let raw = nalgebra2faer(a)
      .sp_cholesky(faer::Side::Upper)
      .map_err(|err| Error::Factorization(format!("{err:?}")))?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}
