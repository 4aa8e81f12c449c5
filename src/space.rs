use crate::{
  element::{LagrangeElement, LocalDof},
  error::Result,
  mesh::TriangleMesh,
  CellIdx, Coord, DofIdx, EdgeIdx, VertexIdx,
};

use std::rc::Rc;

/// A Finite Element Space of continuous piecewise polynomials of fixed degree.
///
/// Uses the nodal Lagrange basis.
#[derive(Debug)]
pub struct FeSpace {
  /// The underlying mesh of the space.
  mesh: Rc<TriangleMesh>,
  /// Reference element shared by all cells.
  element: LagrangeElement,
  /// Degrees-of-Freedom handler
  dof_handler: DofHandler,
  /// Physical position of each global dof.
  dof_coords: Vec<Coord>,
}

impl FeSpace {
  pub fn new(mesh: Rc<TriangleMesh>, degree: usize) -> Result<Self> {
    let element = LagrangeElement::new(degree)?;
    let dof_handler = DofHandler::new(&mesh, &element);

    let mut dof_coords = vec![Coord::zeros(); dof_handler.ndofs()];
    for icell in 0..mesh.ncells() {
      let geo = mesh.cell_geometry(icell);
      for (&idof, node) in dof_handler.local2global(icell).iter().zip(element.nodes()) {
        dof_coords[idof] = geo.ref_to_phys(node);
      }
    }
    // exact vertex positions, free of affine map roundoff
    for ivertex in 0..mesh.nvertices() {
      dof_coords[dof_handler.vertex_dof(ivertex)] = mesh.vertex(ivertex);
    }

    tracing::debug!(
      "created P{degree} space with {} dofs on {} cells",
      dof_handler.ndofs(),
      mesh.ncells()
    );

    Ok(Self {
      mesh,
      element,
      dof_handler,
      dof_coords,
    })
  }

  pub fn mesh(&self) -> &Rc<TriangleMesh> {
    &self.mesh
  }
  pub fn element(&self) -> &LagrangeElement {
    &self.element
  }
  pub fn degree(&self) -> usize {
    self.element.degree()
  }
  pub fn ndofs(&self) -> usize {
    self.dof_handler.ndofs()
  }
  pub fn dof_handler(&self) -> &DofHandler {
    &self.dof_handler
  }

  pub fn dof_coords(&self) -> &[Coord] {
    &self.dof_coords
  }
  pub fn dof_coord(&self, idof: DofIdx) -> Coord {
    self.dof_coords[idof]
  }

  /// The dof sitting on mesh vertex `ivertex`.
  pub fn vertex_dof(&self, ivertex: VertexIdx) -> DofIdx {
    self.dof_handler.vertex_dof(ivertex)
  }

  /// All dofs located on the boundary of the mesh, sorted ascending.
  pub fn boundary_dofs(&self) -> Vec<DofIdx> {
    let mut dofs: Vec<_> = self
      .mesh
      .boundary_vertices()
      .into_iter()
      .map(|ivertex| self.dof_handler.vertex_dof(ivertex))
      .collect();
    for iedge in self.mesh.boundary_edges() {
      dofs.extend(self.dof_handler.edge_dofs(iedge));
    }
    dofs.sort_unstable();
    dofs
  }

  pub fn flag_boundary_dofs(&self) -> Vec<bool> {
    let mut flags = vec![false; self.ndofs()];
    for idof in self.boundary_dofs() {
      flags[idof] = true;
    }
    flags
  }
}

/// Global numbering of the degrees of freedom.
///
/// Vertex dofs come first and coincide with the vertex index,
/// followed by the edge dofs edge by edge and the interior dofs cell by cell.
/// Edge dofs run from the lower to the higher global vertex of the edge,
/// such that neighbouring cells agree on them.
#[derive(Debug, Clone)]
pub struct DofHandler {
  nvertices: usize,
  ndofs_per_edge: usize,
  local2global_idx: Vec<Vec<DofIdx>>,
  ndofs: usize,
}

impl DofHandler {
  pub fn new(mesh: &TriangleMesh, element: &LagrangeElement) -> Self {
    let nvertices = mesh.nvertices();
    let ndofs_per_edge = element.ndofs_per_edge();
    let ndofs_interior = element.ndofs_interior();
    let edge_offset = nvertices;
    let interior_offset = edge_offset + mesh.nedges() * ndofs_per_edge;
    let ndofs = interior_offset + mesh.ncells() * ndofs_interior;

    let local2global_idx = (0..mesh.ncells())
      .map(|icell| {
        let cell = mesh.cell(icell);
        let cell_edges = mesh.cell_edges(icell);
        element
          .dofs()
          .iter()
          .map(|&dof| match dof {
            LocalDof::Vertex(ivertex) => cell[ivertex],
            LocalDof::Edge { iedge, k } => {
              let [a, b] = crate::mesh::LOCAL_EDGES[iedge];
              let pos = if cell[a] < cell[b] {
                k - 1
              } else {
                ndofs_per_edge - k
              };
              edge_offset + cell_edges[iedge] * ndofs_per_edge + pos
            }
            LocalDof::Interior(i) => interior_offset + icell * ndofs_interior + i,
          })
          .collect()
      })
      .collect();

    Self {
      nvertices,
      ndofs_per_edge,
      local2global_idx,
      ndofs,
    }
  }

  pub fn ndofs(&self) -> usize {
    self.ndofs
  }

  pub fn local2global(&self, icell: CellIdx) -> &[DofIdx] {
    &self.local2global_idx[icell]
  }

  pub fn vertex_dof(&self, ivertex: VertexIdx) -> DofIdx {
    ivertex
  }

  /// Dofs in the interior of the edge, ordered from lower to higher vertex.
  pub fn edge_dofs(&self, iedge: EdgeIdx) -> std::ops::Range<DofIdx> {
    let start = self.nvertices + iedge * self.ndofs_per_edge;
    start..start + self.ndofs_per_edge
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::rectangle::{Diagonal, RectangleMeshInfo};

  use approx::assert_relative_eq;
  use itertools::Itertools;

  fn space(nx: usize, ny: usize, degree: usize, diagonal: Diagonal) -> FeSpace {
    let mesh = RectangleMeshInfo::new_unit(nx, ny)
      .with_diagonal(diagonal)
      .to_mesh()
      .unwrap();
    FeSpace::new(Rc::new(mesh), degree).unwrap()
  }

  #[test]
  fn dof_count_matches_lattice() {
    for degree in 1..=4 {
      for (nx, ny) in [(1, 1), (3, 5), (6, 4)] {
        let space = space(nx, ny, degree, Diagonal::Right);
        assert_eq!(space.ndofs(), (degree * nx + 1) * (degree * ny + 1));
      }
    }
  }

  #[test]
  fn dof_coords_are_unique_lattice_points() {
    for diagonal in [Diagonal::Right, Diagonal::Left] {
      let (nx, ny, degree) = (3, 2, 3);
      let space = space(nx, ny, degree, diagonal);
      let lattice_keys = space
        .dof_coords()
        .iter()
        .map(|x| {
          let i = x.x * (degree * nx) as f64;
          let j = x.y * (degree * ny) as f64;
          assert_relative_eq!(i, i.round(), epsilon = 1e-10);
          assert_relative_eq!(j, j.round(), epsilon = 1e-10);
          (i.round() as i64, j.round() as i64)
        })
        .collect_vec();
      assert!(lattice_keys.iter().all_unique());
    }
  }

  #[test]
  fn shared_edges_agree() {
    // every cell must map its local nodes onto the same physical points as the global dofs
    let space = space(4, 3, 3, Diagonal::Crossed);
    let mesh = space.mesh();
    for icell in 0..mesh.ncells() {
      let geo = mesh.cell_geometry(icell);
      for (&idof, node) in space
        .dof_handler()
        .local2global(icell)
        .iter()
        .zip(space.element().nodes())
      {
        assert_relative_eq!(geo.ref_to_phys(node), space.dof_coord(idof), epsilon = 1e-14);
      }
    }
  }

  #[test]
  fn boundary_dofs_lie_on_boundary() {
    let (nx, ny, degree) = (3, 5, 2);
    let space = space(nx, ny, degree, Diagonal::Right);
    let boundary = space.boundary_dofs();
    assert_eq!(boundary.len(), 2 * degree * (nx + ny));
    for idof in boundary {
      let x = space.dof_coord(idof);
      let on_boundary = [x.x, x.y, 1.0 - x.x, 1.0 - x.y]
        .into_iter()
        .any(|d| d.abs() < 1e-14);
      assert!(on_boundary, "dof {idof} at {x:?} is not on the boundary");
    }
  }
}
