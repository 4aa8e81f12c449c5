//! Export of finite element functions as VTK unstructured grids.
//!
//! Each written function becomes one `.vtu` file holding the triangle mesh
//! and the vertex values as point data. A `.pvd` collection file lists all
//! of them, so that ParaView can step through them as a time series.

use crate::{
  error::{Error, Result},
  function::FeFunction,
  mesh::TriangleMesh,
};

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::{Path, PathBuf},
};
use vtkio::{
  model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, ElementType,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
  },
  IOBuffer,
};

/// The triangle mesh as a VTK grid, embedded in the plane $z = 0$.
pub fn mesh_to_vtk_piece(mesh: &TriangleMesh) -> UnstructuredGridPiece {
  let points = IOBuffer::new(
    mesh
      .coords()
      .column_iter()
      .flat_map(|c| [c[0], c[1], 0.0])
      .collect(),
  );

  let connectivity = mesh.cells().iter().flatten().map(|&v| v as u64).collect();
  // vtk xml offsets point one past the last vertex of each cell
  let offsets = (1..=mesh.ncells()).map(|icell| 3 * icell as u64).collect();

  let cell_verts = VertexNumbers::XML {
    connectivity,
    offsets,
  };
  let types = vec![CellType::Triangle; mesh.ncells()];
  let cells = Cells { cell_verts, types };

  UnstructuredGridPiece {
    points,
    cells,
    data: Attributes::default(),
  }
}

/// The function as VTK grid with its vertex values attached as point data.
///
/// Higher order dofs are not representable on the linear grid and are dropped.
pub fn function_to_vtk(u: &FeFunction) -> Vtk {
  let mut grid = mesh_to_vtk_piece(u.space().mesh());
  grid.data.point.push(Attribute::DataArray(DataArray {
    name: u.name().to_owned(),
    elem: ElementType::Scalars {
      num_comp: 1,
      lookup_table: None,
    },
    data: IOBuffer::new(u.vertex_values().as_slice().to_vec()),
  }));

  Vtk {
    version: Version::new((4, 2)),
    title: format!("Poisson FEM VTK Export: {}", u.name()),
    byte_order: ByteOrder::native(),
    data: grid.into(),
    file_path: None,
  }
}

pub fn save_function_to_file(u: &FeFunction, path: impl AsRef<Path>) -> Result<()> {
  function_to_vtk(u)
    .export(path.as_ref())
    .map_err(|err| Error::Vtk(format!("{err:?}")))
}

/// A `.pvd` collection of `.vtu` files.
///
/// For `path = "out/poisson.pvd"` the n-th written function is stored in
/// `out/poisson00000n.vtu`.
#[derive(Debug)]
pub struct VtkFile {
  path: PathBuf,
  entries: Vec<(f64, PathBuf)>,
}

impl VtkFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    let mut path = path.into();
    path.set_extension("pvd");
    Self {
      path,
      entries: Vec::new(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
  pub fn nentries(&self) -> usize {
    self.entries.len()
  }
  /// Paths of the written `.vtu` files, in writing order.
  pub fn vtu_paths(&self) -> impl Iterator<Item = &Path> {
    self.entries.iter().map(|(_, path)| path.as_path())
  }

  /// Append `u` with the timestep being its index in the collection.
  pub fn write(&mut self, u: &FeFunction) -> Result<PathBuf> {
    let t = self.entries.len() as f64;
    self.write_at(u, t)
  }

  /// Append `u` at time `t`. Rewrites the collection file.
  pub fn write_at(&mut self, u: &FeFunction, t: f64) -> Result<PathBuf> {
    let stem = self
      .path
      .file_stem()
      .and_then(|s| s.to_str())
      .unwrap_or("solution");
    let vtu_path = self
      .path
      .with_file_name(format!("{stem}{:06}.vtu", self.entries.len()));

    save_function_to_file(u, &vtu_path)?;
    tracing::info!("wrote {} to {}", u.name(), vtu_path.display());
    self.entries.push((t, vtu_path.clone()));

    self.save_collection()?;
    Ok(vtu_path)
  }

  fn save_collection(&self) -> Result<()> {
    let file = File::create(&self.path)?;
    let writer = BufWriter::new(file);
    write_collection(writer, &self.entries)?;
    Ok(())
  }
}

/// Writes the `.pvd` xml. File references are relative to the collection.
pub fn write_collection<W: Write>(mut writer: W, entries: &[(f64, PathBuf)]) -> std::io::Result<()> {
  writeln!(writer, r#"<?xml version="1.0"?>"#)?;
  writeln!(writer, r#"<VTKFile type="Collection" version="0.1">"#)?;
  writeln!(writer, "  <Collection>")?;
  for (t, path) in entries {
    let file = path
      .file_name()
      .map(|f| f.to_string_lossy())
      .unwrap_or_default();
    writeln!(
      writer,
      r#"    <DataSet timestep="{t}" part="0" file="{file}"/>"#
    )?;
  }
  writeln!(writer, "  </Collection>")?;
  writeln!(writer, "</VTKFile>")?;
  writer.flush()
}
