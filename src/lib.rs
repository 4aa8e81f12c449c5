//! Lagrange finite elements for the Poisson equation on the unit square.
//!
//! Solves $-Delta u = f$ on $[0,1]^2$ with $u = u_0$ on the boundary,
//! using continuous piecewise polynomials of arbitrary (small) degree
//! on a structured triangulation.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod bc;
pub mod element;
pub mod error;
pub mod expression;
pub mod function;
pub mod geometry;
pub mod io;
pub mod linalg;
pub mod mesh;
pub mod poisson;
pub mod quadrature;
pub mod space;
pub mod sparse;
pub mod verify;

pub use error::{Error, Result};

/// A point in the plane.
pub type Coord = na::Vector2<f64>;

pub type VertexIdx = usize;
pub type EdgeIdx = usize;
pub type CellIdx = usize;
pub type DofIdx = usize;
