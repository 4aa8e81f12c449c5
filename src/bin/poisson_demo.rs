extern crate nalgebra as na;

use poisson_fem::{
  expression::Constant,
  io::vtk::VtkFile,
  poisson::solve_poisson,
  verify::{max_dof_error, max_vertex_error},
  Coord,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt::init();

  // Boundary data, which is also the exact solution.
  let u0 = |x: &Coord| 1.0 + x.x * x.x + 2.0 * x.y * x.y;
  let f = Constant(-6.0);

  let mut u = solve_poisson(&f, &u0, 6, 4, 1)?;
  u.rename("u");

  let mut file = VtkFile::new("poisson.pvd");
  file.write(&u)?;

  let max_error = max_dof_error(&u, &u0);
  tracing::info!("max error at dofs: {max_error:e}");
  tracing::info!("max error at vertices: {:e}", max_vertex_error(&u, &u0));

  let values = u.vertex_values();
  let mesh = u.space().mesh();
  let argmax = values.imax();
  let xmax: na::Vector2<f64> = mesh.vertex(argmax);
  tracing::info!(
    "{} vertex values in [{:.4}, {:.4}], max at ({:.3}, {:.3})",
    values.len(),
    values.min(),
    values.max(),
    xmax.x,
    xmax.y
  );

  Ok(())
}
