//! Triangle meshes in the plane.

pub mod rectangle;

use crate::{
  error::{Error, Result},
  geometry::TriangleGeometry,
  CellIdx, Coord, EdgeIdx, VertexIdx,
};

use indexmap::IndexSet;
use itertools::Itertools;

/// Local edges of a triangle, as pairs of local vertex indices.
///
/// Lexicographically ordered.
pub const LOCAL_EDGES: [[usize; 2]; 3] = [[0, 1], [0, 2], [1, 2]];

/// A conforming triangulation of a polygonal domain.
///
/// Edges are stored as sorted vertex pairs, indexed in order of first appearance
/// when iterating cells and their local edges.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
  coords: na::Matrix2xX<f64>,
  cells: Vec<[VertexIdx; 3]>,
  edges: IndexSet<[VertexIdx; 2]>,
  cell_edges: Vec<[EdgeIdx; 3]>,
  edge_ncells: Vec<usize>,
}

impl TriangleMesh {
  pub fn new(coords: na::Matrix2xX<f64>, cells: Vec<[VertexIdx; 3]>) -> Result<Self> {
    let nvertices = coords.ncols();
    if cells.is_empty() {
      return Err(Error::InvalidDomain("mesh without cells".into()));
    }

    let mut edges = IndexSet::new();
    let mut cell_edges = Vec::with_capacity(cells.len());
    let mut edge_ncells = Vec::new();
    for (icell, cell) in cells.iter().enumerate() {
      if let Some(&ivertex) = cell.iter().find(|&&v| v >= nvertices) {
        return Err(Error::InvalidDomain(format!(
          "cell {icell} references vertex {ivertex}, but mesh has only {nvertices} vertices"
        )));
      }
      if !cell.iter().all_unique() {
        return Err(Error::InvalidDomain(format!(
          "cell {icell} has repeated vertices {cell:?}"
        )));
      }

      let mut local_edges = [0; 3];
      for (iedge, [a, b]) in LOCAL_EDGES.into_iter().enumerate() {
        let (a, b) = (cell[a], cell[b]);
        let (iglobal, is_new) = edges.insert_full([a.min(b), a.max(b)]);
        if is_new {
          edge_ncells.push(0);
        }
        edge_ncells[iglobal] += 1;
        local_edges[iedge] = iglobal;
      }
      cell_edges.push(local_edges);
    }

    let mut referenced = vec![false; nvertices];
    cells.iter().flatten().for_each(|&v| referenced[v] = true);
    if let Some(ivertex) = referenced.iter().position(|&r| !r) {
      return Err(Error::InvalidDomain(format!(
        "vertex {ivertex} does not belong to any cell"
      )));
    }

    if let Some(iedge) = edge_ncells.iter().position(|&n| n > 2) {
      return Err(Error::InvalidDomain(format!(
        "edge {:?} is shared by more than two cells",
        edges[iedge]
      )));
    }

    let mesh = Self {
      coords,
      cells,
      edges,
      cell_edges,
      edge_ncells,
    };

    if let Some(icell) = (0..mesh.ncells()).find(|&i| mesh.cell_geometry(i).vol() <= 0.0) {
      return Err(Error::InvalidDomain(format!("cell {icell} is degenerate")));
    }

    Ok(mesh)
  }

  pub fn nvertices(&self) -> usize {
    self.coords.ncols()
  }
  pub fn ncells(&self) -> usize {
    self.cells.len()
  }
  pub fn nedges(&self) -> usize {
    self.edges.len()
  }

  pub fn coords(&self) -> &na::Matrix2xX<f64> {
    &self.coords
  }
  pub fn vertex(&self, ivertex: VertexIdx) -> Coord {
    self.coords.column(ivertex).into_owned()
  }

  pub fn cells(&self) -> &[[VertexIdx; 3]] {
    &self.cells
  }
  pub fn cell(&self, icell: CellIdx) -> [VertexIdx; 3] {
    self.cells[icell]
  }

  /// Sorted vertex pair of each edge.
  pub fn edges(&self) -> impl ExactSizeIterator<Item = &[VertexIdx; 2]> {
    self.edges.iter()
  }
  pub fn edge(&self, iedge: EdgeIdx) -> [VertexIdx; 2] {
    self.edges[iedge]
  }
  pub fn edge_idx(&self, a: VertexIdx, b: VertexIdx) -> Option<EdgeIdx> {
    self.edges.get_index_of(&[a.min(b), a.max(b)])
  }

  /// Global edges of the cell, in the order of [`LOCAL_EDGES`].
  pub fn cell_edges(&self, icell: CellIdx) -> [EdgeIdx; 3] {
    self.cell_edges[icell]
  }

  pub fn cell_geometry(&self, icell: CellIdx) -> TriangleGeometry {
    TriangleGeometry::new(self.cells[icell].map(|v| self.vertex(v)))
  }

  pub fn is_boundary_edge(&self, iedge: EdgeIdx) -> bool {
    self.edge_ncells[iedge] == 1
  }

  /// The boundary edges are characterized by the fact that they
  /// only have 1 cell as super entity.
  pub fn boundary_edges(&self) -> Vec<EdgeIdx> {
    (0..self.nedges())
      .filter(|&iedge| self.is_boundary_edge(iedge))
      .collect()
  }

  /// The vertices that lie on the boundary of the mesh, sorted ascending.
  pub fn boundary_vertices(&self) -> Vec<VertexIdx> {
    self
      .boundary_edges()
      .into_iter()
      .flat_map(|iedge| self.edges[iedge])
      .unique()
      .sorted_unstable()
      .collect()
  }

  /// Index of a cell containing `coord`, if any.
  pub fn locate(&self, coord: &Coord) -> Option<CellIdx> {
    const TOL: f64 = 1e-12;
    (0..self.ncells()).find(|&icell| self.cell_geometry(icell).contains(coord, TOL))
  }

  /// Smallest cell diameter.
  pub fn hmin(&self) -> f64 {
    (0..self.ncells())
      .map(|icell| self.cell_geometry(icell).diameter())
      .fold(f64::INFINITY, f64::min)
  }

  /// Largest cell diameter.
  pub fn hmax(&self) -> f64 {
    (0..self.ncells())
      .map(|icell| self.cell_geometry(icell).diameter())
      .fold(0.0, f64::max)
  }
}
