//! Module for the Poisson Equation, the prototypical ellipitic PDE.
//!
//! $-Delta u = f$ in $Omega$, $u = u_0$ on $partial Omega$.

use crate::{
  assemble::{self, LaplaceElmat, LoadElvec},
  bc::DirichletBc,
  error::{Error, Result},
  expression::ScalarField,
  function::FeFunction,
  linalg::LinearSolver,
  mesh::rectangle::unit_square_mesh,
  quadrature::QuadRule,
  space::FeSpace,
};

use std::rc::Rc;

/// Optional knobs of the discrete solve.
#[derive(Debug, Default, Clone)]
pub struct SolverOptions {
  pub linear_solver: LinearSolver,
  /// Points per direction of the collapsed Gauss rule used for all integrals.
  /// Defaults to a rule exact for the stiffness matrix and for polynomial
  /// sources up to degree 2.
  pub quadrature_points: Option<usize>,
}

/// A Poisson problem on a given finite element space.
pub struct PoissonProblem<'a, F: ?Sized> {
  space: Rc<FeSpace>,
  source: &'a F,
  bcs: Vec<DirichletBc>,
  options: SolverOptions,
  name: String,
}

impl<'a, F: ScalarField + ?Sized> PoissonProblem<'a, F> {
  pub fn new(space: Rc<FeSpace>, source: &'a F) -> Self {
    Self {
      space,
      source,
      bcs: Vec::new(),
      options: SolverOptions::default(),
      name: String::from("u"),
    }
  }

  pub fn with_bc(mut self, bc: DirichletBc) -> Self {
    self.bcs.push(bc);
    self
  }
  pub fn with_options(mut self, options: SolverOptions) -> Self {
    self.options = options;
    self
  }
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn space(&self) -> &Rc<FeSpace> {
    &self.space
  }

  /// Assemble $a(u, v) = integral nabla u dot nabla v$ and $l(v) = integral f v$,
  /// enforce the boundary conditions and solve.
  pub fn solve(self) -> Result<FeFunction> {
    let space = &self.space;
    let degree = space.degree();

    let (elmat, elvec) = match self.options.quadrature_points {
      Some(0) => return Err(Error::InvalidQuadrature { npoints: 0 }),
      Some(npoints) => (
        LaplaceElmat::with_quadrature(QuadRule::collapsed_gauss(npoints)),
        LoadElvec::with_quadrature(self.source, QuadRule::collapsed_gauss(npoints)),
      ),
      None => (LaplaceElmat::new(degree), LoadElvec::new(self.source, degree)),
    };

    let mut galmat = assemble::assemble_galmat(space, elmat);
    let mut galvec = assemble::assemble_galvec(space, elvec);

    if self.bcs.is_empty() {
      tracing::warn!("poisson problem without dirichlet condition is singular");
    }
    for bc in &self.bcs {
      bc.apply(&mut galmat, &mut galvec);
    }

    let mesh = space.mesh();
    tracing::info!(
      "solving poisson problem: P{degree}, {} cells (h = {:.3e}..{:.3e}), {} dofs",
      mesh.ncells(),
      mesh.hmin(),
      mesh.hmax(),
      space.ndofs()
    );
    let galmat = galmat.to_nalgebra_csc();
    let galsol = self.options.linear_solver.solve(galmat, &galvec)?;

    Ok(FeFunction::new(Rc::clone(space), galsol).with_name(self.name))
  }
}

/// Solve $-Delta u = f$ on $[0,1]^2$ with $u = u_0$ on the boundary,
/// using `2 * nx * ny` Lagrange elements of the given degree.
pub fn solve_poisson<F, G>(f: &F, u0: &G, nx: usize, ny: usize, degree: usize) -> Result<FeFunction>
where
  F: ScalarField + ?Sized,
  G: ScalarField + ?Sized,
{
  // Create mesh and define function space
  let mesh = Rc::new(unit_square_mesh(nx, ny)?);
  let space = Rc::new(FeSpace::new(mesh, degree)?);

  let bc = DirichletBc::on_boundary(&space, u0);

  PoissonProblem::new(space, f).with_bc(bc).solve()
}
