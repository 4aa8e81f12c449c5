use poisson_fem::{
  expression::Constant,
  io::{save_vertex_values_to_file, vtk::VtkFile},
  poisson::solve_poisson,
  Coord,
};

use std::{fs, path::PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("poisson-fem-{name}-{}", std::process::id()));
  fs::create_dir_all(&dir).unwrap();
  dir
}

#[test]
fn writes_collection_and_steps() {
  let dir = scratch_dir("vtk");
  let exact = |x: &Coord| 1.0 + x.x * x.x + 2.0 * x.y * x.y;

  let mut file = VtkFile::new(dir.join("poisson.pvd"));
  for degree in 1..=2 {
    let mut u = solve_poisson(&Constant(-6.0), &exact, 6, 4, degree).unwrap();
    u.rename("u");
    file.write(&u).unwrap();
  }
  assert_eq!(file.nentries(), 2);

  let vtu_paths: Vec<_> = file.vtu_paths().map(|p| p.to_path_buf()).collect();
  assert_eq!(vtu_paths[0], dir.join("poisson000000.vtu"));
  assert_eq!(vtu_paths[1], dir.join("poisson000001.vtu"));
  for path in &vtu_paths {
    let size = fs::metadata(path).unwrap().len();
    assert!(size > 0, "{} is empty", path.display());
  }

  let pvd = fs::read_to_string(file.path()).unwrap();
  assert!(pvd.contains(r#"file="poisson000000.vtu""#));
  assert!(pvd.contains(r#"file="poisson000001.vtu""#));

  fs::remove_dir_all(dir).unwrap();
}

#[test]
fn collection_extension_is_enforced() {
  let file = VtkFile::new("solution.vtu");
  assert_eq!(file.path(), std::path::Path::new("solution.pvd"));
  assert_eq!(file.nentries(), 0);
}

#[test]
fn writes_vertex_table() {
  let dir = scratch_dir("table");
  let path = dir.join("u.txt");
  let u = solve_poisson(&Constant(0.0), &Constant(1.0), 2, 2, 1).unwrap();
  save_vertex_values_to_file(&u, &path).unwrap();

  let table = fs::read_to_string(&path).unwrap();
  assert_eq!(table.lines().count(), 9);
  fs::remove_dir_all(dir).unwrap();
}
