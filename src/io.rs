pub mod vtk;

use crate::function::FeFunction;

use std::{fs::File, io::BufWriter, path::Path};

/// One line `x y value` per mesh vertex, readable by gnuplot and numpy.
pub fn save_vertex_values_to_file(u: &FeFunction, path: impl AsRef<Path>) -> std::io::Result<()> {
  let file = File::create(path)?;
  let writer = BufWriter::new(file);
  write_vertex_values(writer, u)
}

pub fn write_vertex_values<W: std::io::Write>(mut writer: W, u: &FeFunction) -> std::io::Result<()> {
  let coords = u.space().mesh().coords();
  for (coord, value) in coords.column_iter().zip(u.vertex_values().iter()) {
    writeln!(writer, "{:.6} {:.6} {value:.6}", coord[0], coord[1])?;
  }
  writer.flush()
}
