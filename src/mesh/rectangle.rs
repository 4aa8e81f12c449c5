use super::TriangleMesh;
use crate::{
  error::{Error, Result},
  Coord, VertexIdx,
};

/// How each box of the structured grid is split into triangles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Diagonal {
  /// Diagonal from lower-left to upper-right corner.
  #[default]
  Right,
  /// Diagonal from lower-right to upper-left corner.
  Left,
  /// Both diagonals, with an additional vertex in the box midpoint.
  Crossed,
}

/// Structured triangulation of an axis-aligned rectangle.
///
/// Grid vertices are numbered lexicographically with x running fastest,
/// such that vertex `iy * (nx + 1) + ix` sits at grid position `(ix, iy)`.
/// For [`Diagonal::Crossed`] the box midpoints follow after all grid vertices.
#[derive(Debug, Clone)]
pub struct RectangleMeshInfo {
  min: Coord,
  max: Coord,
  nx: usize,
  ny: usize,
  diagonal: Diagonal,
}

// constructors
impl RectangleMeshInfo {
  pub fn new_min_max(min: Coord, max: Coord, nx: usize, ny: usize) -> Self {
    Self {
      min,
      max,
      nx,
      ny,
      diagonal: Diagonal::default(),
    }
  }

  /// Mesh info for $[0,1]^2$ with `2 * nx * ny` triangles.
  pub fn new_unit(nx: usize, ny: usize) -> Self {
    Self::new_min_max(Coord::zeros(), Coord::new(1.0, 1.0), nx, ny)
  }

  pub fn with_diagonal(mut self, diagonal: Diagonal) -> Self {
    self.diagonal = diagonal;
    self
  }
}

// getters
impl RectangleMeshInfo {
  pub fn min(&self) -> Coord {
    self.min
  }
  pub fn max(&self) -> Coord {
    self.max
  }
  pub fn side_lengths(&self) -> Coord {
    self.max - self.min
  }
  pub fn nx(&self) -> usize {
    self.nx
  }
  pub fn ny(&self) -> usize {
    self.ny
  }
  pub fn diagonal(&self) -> Diagonal {
    self.diagonal
  }
  pub fn nboxes(&self) -> usize {
    self.nx * self.ny
  }
  pub fn ngrid_vertices(&self) -> usize {
    (self.nx + 1) * (self.ny + 1)
  }
  pub fn nvertices(&self) -> usize {
    match self.diagonal {
      Diagonal::Right | Diagonal::Left => self.ngrid_vertices(),
      Diagonal::Crossed => self.ngrid_vertices() + self.nboxes(),
    }
  }
  pub fn ncells(&self) -> usize {
    match self.diagonal {
      Diagonal::Right | Diagonal::Left => 2 * self.nboxes(),
      Diagonal::Crossed => 4 * self.nboxes(),
    }
  }

  pub fn grid_vertex_idx(&self, ix: usize, iy: usize) -> VertexIdx {
    iy * (self.nx + 1) + ix
  }

  pub fn grid_vertex_pos(&self, ix: usize, iy: usize) -> Coord {
    let rel = Coord::new(ix as f64 / self.nx as f64, iy as f64 / self.ny as f64);
    self.min + rel.component_mul(&self.side_lengths())
  }

  pub fn is_grid_vertex_on_boundary(&self, ivertex: VertexIdx) -> bool {
    let ix = ivertex % (self.nx + 1);
    let iy = ivertex / (self.nx + 1);
    ivertex < self.ngrid_vertices() && (ix == 0 || ix == self.nx || iy == 0 || iy == self.ny)
  }
}

impl RectangleMeshInfo {
  fn validate(&self) -> Result<()> {
    if self.nx == 0 || self.ny == 0 {
      return Err(Error::InvalidResolution {
        nx: self.nx,
        ny: self.ny,
      });
    }
    let lengths = self.side_lengths();
    if !(lengths.x > 0.0 && lengths.y > 0.0) {
      return Err(Error::InvalidDomain(format!(
        "rectangle [{}, {}] x [{}, {}] has no area",
        self.min.x, self.max.x, self.min.y, self.max.y
      )));
    }
    Ok(())
  }

  pub fn compute_vertex_coords(&self) -> na::Matrix2xX<f64> {
    let mut coords = na::Matrix2xX::zeros(self.nvertices());
    for iy in 0..=self.ny {
      for ix in 0..=self.nx {
        coords
          .column_mut(self.grid_vertex_idx(ix, iy))
          .copy_from(&self.grid_vertex_pos(ix, iy));
      }
    }
    if self.diagonal == Diagonal::Crossed {
      for iy in 0..self.ny {
        for ix in 0..self.nx {
          let midpoint = 0.5 * (self.grid_vertex_pos(ix, iy) + self.grid_vertex_pos(ix + 1, iy + 1));
          coords
            .column_mut(self.ngrid_vertices() + iy * self.nx + ix)
            .copy_from(&midpoint);
        }
      }
    }
    coords
  }

  pub fn compute_cells(&self) -> Vec<[VertexIdx; 3]> {
    let mut cells = Vec::with_capacity(self.ncells());

    // iterate through all boxes that make up the mesh
    for iy in 0..self.ny {
      for ix in 0..self.nx {
        let v0 = self.grid_vertex_idx(ix, iy);
        let v1 = self.grid_vertex_idx(ix + 1, iy);
        let v2 = self.grid_vertex_idx(ix, iy + 1);
        let v3 = self.grid_vertex_idx(ix + 1, iy + 1);

        match self.diagonal {
          Diagonal::Right => {
            cells.push([v0, v1, v3]);
            cells.push([v0, v2, v3]);
          }
          Diagonal::Left => {
            cells.push([v0, v1, v2]);
            cells.push([v1, v3, v2]);
          }
          Diagonal::Crossed => {
            let vm = self.ngrid_vertices() + iy * self.nx + ix;
            cells.push([v0, v1, vm]);
            cells.push([v0, v2, vm]);
            cells.push([v1, v3, vm]);
            cells.push([v2, v3, vm]);
          }
        }
      }
    }
    cells
  }

  pub fn to_mesh(&self) -> Result<TriangleMesh> {
    self.validate()?;
    let mesh = TriangleMesh::new(self.compute_vertex_coords(), self.compute_cells())?;
    tracing::debug!(
      "built {:?} rectangle mesh {}x{} with {} vertices and {} cells",
      self.diagonal,
      self.nx,
      self.ny,
      mesh.nvertices(),
      mesh.ncells()
    );
    Ok(mesh)
  }
}

/// The unit square $[0,1]^2$ divided into `nx * ny` boxes,
/// each split into two triangles by its right diagonal.
pub fn unit_square_mesh(nx: usize, ny: usize) -> Result<TriangleMesh> {
  RectangleMeshInfo::new_unit(nx, ny).to_mesh()
}
