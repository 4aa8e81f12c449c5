//! Nodal Lagrange elements on the reference triangle.

use crate::{
  error::{Error, Result},
  mesh::LOCAL_EDGES,
  Coord,
};

use itertools::Itertools;
use num_integer::binomial;

pub const MAX_DEGREE: usize = 6;

/// Where a local degree of freedom lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalDof {
  Vertex(usize),
  /// `k`-th interior node (`1 <= k < degree`) of local edge `iedge`,
  /// counted from the first local vertex of the edge.
  Edge { iedge: usize, k: usize },
  Interior(usize),
}

/// The continuous Lagrange element $cal(P)_p$ on the reference triangle.
///
/// Nodes are the points of the barycentric lattice with spacing $1/p$,
/// ordered as: vertices, edge nodes along [`LOCAL_EDGES`], interior nodes.
/// The nodal basis is computed by inverting the Vandermonde matrix
/// of the monomials $x^a y^b, a + b <= p$.
#[derive(Debug, Clone)]
pub struct LagrangeElement {
  degree: usize,
  nodes: Vec<Coord>,
  dofs: Vec<LocalDof>,
  monomials: Vec<[i32; 2]>,
  /// Column `i` holds the monomial coefficients of basis function `i`.
  coeffs: na::DMatrix<f64>,
}

impl LagrangeElement {
  pub fn new(degree: usize) -> Result<Self> {
    if !(1..=MAX_DEGREE).contains(&degree) {
      return Err(Error::UnsupportedDegree {
        degree,
        max: MAX_DEGREE,
      });
    }

    let (nodes, dofs) = reference_nodes(degree);
    let monomials: Vec<[i32; 2]> = (0..=degree)
      .flat_map(|total| (0..=total).map(move |b| [(total - b) as i32, b as i32]))
      .collect();
    assert_eq!(monomials.len(), nodes.len());

    let vandermonde = na::DMatrix::from_fn(nodes.len(), monomials.len(), |inode, imono| {
      eval_monomial(monomials[imono], &nodes[inode])
    });
    let coeffs = vandermonde.try_inverse().ok_or_else(|| {
      Error::UnsupportedDegree {
        degree,
        max: MAX_DEGREE,
      }
    })?;

    Ok(Self {
      degree,
      nodes,
      dofs,
      monomials,
      coeffs,
    })
  }

  pub fn degree(&self) -> usize {
    self.degree
  }

  /// Number of local shape functions, $(p+1)(p+2)/2$.
  pub fn ndofs(&self) -> usize {
    binomial(self.degree + 2, 2)
  }
  pub fn ndofs_per_edge(&self) -> usize {
    self.degree - 1
  }
  pub fn ndofs_interior(&self) -> usize {
    binomial(self.degree - 1, 2)
  }

  pub fn nodes(&self) -> &[Coord] {
    &self.nodes
  }
  pub fn dofs(&self) -> &[LocalDof] {
    &self.dofs
  }

  /// Values of all shape functions in `x`.
  pub fn eval_basis(&self, x: &Coord) -> na::DVector<f64> {
    let monos = na::DVector::from_iterator(
      self.monomials.len(),
      self.monomials.iter().map(|&m| eval_monomial(m, x)),
    );
    self.coeffs.tr_mul(&monos)
  }

  /// Reference gradients of all shape functions in `x`, one per column.
  pub fn eval_basis_grads(&self, x: &Coord) -> na::Matrix2xX<f64> {
    let mut mono_grads = na::Matrix2xX::zeros(self.monomials.len());
    for (imono, &m) in self.monomials.iter().enumerate() {
      mono_grads
        .column_mut(imono)
        .copy_from(&eval_monomial_grad(m, x));
    }
    mono_grads * &self.coeffs
  }
}

fn eval_monomial([a, b]: [i32; 2], x: &Coord) -> f64 {
  x.x.powi(a) * x.y.powi(b)
}

fn eval_monomial_grad([a, b]: [i32; 2], x: &Coord) -> Coord {
  let dx = if a > 0 {
    a as f64 * x.x.powi(a - 1) * x.y.powi(b)
  } else {
    0.0
  };
  let dy = if b > 0 {
    b as f64 * x.x.powi(a) * x.y.powi(b - 1)
  } else {
    0.0
  };
  Coord::new(dx, dy)
}

/// Lagrange nodes of the reference triangle in canonical dof order.
fn reference_nodes(degree: usize) -> (Vec<Coord>, Vec<LocalDof>) {
  let p = degree as f64;
  let ref_vertices = [Coord::zeros(), Coord::x(), Coord::y()];

  let mut nodes = ref_vertices.to_vec();
  let mut dofs = (0..3).map(LocalDof::Vertex).collect_vec();

  for (iedge, [a, b]) in LOCAL_EDGES.into_iter().enumerate() {
    for k in 1..degree {
      let t = k as f64 / p;
      nodes.push((1.0 - t) * ref_vertices[a] + t * ref_vertices[b]);
      dofs.push(LocalDof::Edge { iedge, k });
    }
  }

  let mut iinterior = 0;
  for j in 1..degree {
    for i in 1..degree - j {
      nodes.push(Coord::new(i as f64 / p, j as f64 / p));
      dofs.push(LocalDof::Interior(iinterior));
      iinterior += 1;
    }
  }

  (nodes, dofs)
}
