//! Result output.
//!
//! Accepted steps selected for output are handed to an [`OutputSink`] as a
//! [`Snapshot`]. [`FileOutput`] writes the result files into a directory:
//!
//! | File | Contents |
//! |------|----------|
//! | `step_<n>.vtk` | legacy VTK structured grid with the nodal temperatures |
//! | `plotdata_step_<n>.txt` | copper surface temperature between the end regions |
//! | `current_densities.txt` | heater current densities, written once at the end |
//!
//! `<n>` is the 1-based number of the accepted step. [`Recorder`] keeps the
//! same data in memory.

mod format;

pub use format::{write_current_densities, write_plot_data, write_vtk};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HeatFilmError, Result};
use crate::mesh::{LayeredMesh, Node};

/// Margin around the end-region bounds when sampling the surface.
const SURFACE_MARGIN: f64 = 1e-5;

/// Converged field at an accepted step.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    /// 1-based step number
    pub step: usize,
    pub time: f64,
    pub nx: usize,
    pub ny: usize,
    pub nodes: &'a [Node],
    pub temperatures: &'a [f64],
    /// `(x - left, T)` pairs on the top surface, ascending in x
    pub surface: Vec<(f64, f64)>,
}

/// Top-surface temperatures for `left <= x <= right`, as `(x - left, T)`
/// sorted by x.
pub fn surface_profile(
    mesh: &LayeredMesh,
    temperatures: &[f64],
    left: f64,
    right: f64,
) -> Vec<(f64, f64)> {
    mesh.top_surface_nodes()
        .into_iter()
        .filter(|&n| {
            let x = mesh.nodes[n].x;
            x >= left - SURFACE_MARGIN && x <= right + SURFACE_MARGIN
        })
        .map(|n| (mesh.nodes[n].x - left, temperatures[n]))
        .collect()
}

/// Receiver of simulation results.
pub trait OutputSink {
    /// Record an accepted step.
    fn write_step(&mut self, snapshot: &Snapshot<'_>) -> Result<()>;

    /// Record the heater current densities, A/cm^2.
    fn write_current_densities(&mut self, densities: &[f64]) -> Result<()>;
}

/// Writes result files into a directory.
#[derive(Debug, Clone)]
pub struct FileOutput {
    dir: PathBuf,
}

impl FileOutput {
    /// Output into `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| HeatFilmError::output(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_file(
        &self,
        name: &str,
        write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
    ) -> Result<()> {
        let path = self.dir.join(name);
        let file = File::create(&path).map_err(|e| HeatFilmError::output(&path, e))?;
        let mut out = BufWriter::new(file);
        write(&mut out)
            .and_then(|()| out.flush())
            .map_err(|e| HeatFilmError::output(&path, e))?;
        debug!(path = %path.display(), "wrote output file");
        Ok(())
    }
}

impl OutputSink for FileOutput {
    fn write_step(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        self.write_file(&format!("step_{}.vtk", snapshot.step), |out| {
            write_vtk(out, snapshot)
        })?;
        self.write_file(&format!("plotdata_step_{}.txt", snapshot.step), |out| {
            write_plot_data(out, snapshot)
        })
    }

    fn write_current_densities(&mut self, densities: &[f64]) -> Result<()> {
        self.write_file("current_densities.txt", |out| {
            write_current_densities(out, densities)
        })
    }
}

/// Owned copy of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStep {
    pub step: usize,
    pub time: f64,
    pub temperatures: Vec<f64>,
    pub surface: Vec<(f64, f64)>,
}

/// Keeps results in memory.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub snapshots: Vec<RecordedStep>,
    pub current_densities: Vec<f64>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RecordedStep> {
        self.snapshots.last()
    }
}

impl OutputSink for Recorder {
    fn write_step(&mut self, snapshot: &Snapshot<'_>) -> Result<()> {
        self.snapshots.push(RecordedStep {
            step: snapshot.step,
            time: snapshot.time,
            temperatures: snapshot.temperatures.to_vec(),
            surface: snapshot.surface.clone(),
        });
        Ok(())
    }

    fn write_current_densities(&mut self, densities: &[f64]) -> Result<()> {
        self.current_densities = densities.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::numbering::tests::unit_grid;

    #[test]
    fn test_surface_profile_window() {
        // 5 x 2 unit grid, top row y = 1
        let mesh = unit_grid(5, 2);
        let field: Vec<f64> = (0..mesh.num_nodes()).map(|n| n as f64).collect();
        let profile = surface_profile(&mesh, &field, 1.0, 3.0);
        assert_eq!(profile, vec![(0.0, 6.0), (1.0, 7.0), (2.0, 8.0)]);
    }

    #[test]
    fn test_file_output_names() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = unit_grid(3, 2);
        let field = vec![300.0; mesh.num_nodes()];
        let snapshot = Snapshot {
            step: 4,
            time: 0.5,
            nx: mesh.nx,
            ny: mesh.ny,
            nodes: &mesh.nodes,
            temperatures: &field,
            surface: surface_profile(&mesh, &field, 0.0, 2.0),
        };

        let mut sink = FileOutput::new(dir.path().join("results")).unwrap();
        sink.write_step(&snapshot).unwrap();
        sink.write_current_densities(&[1.0, 2.0]).unwrap();

        let results = dir.path().join("results");
        let vtk = fs::read_to_string(results.join("step_4.vtk")).unwrap();
        assert!(vtk.contains("DIMENSIONS 3 2 1"));
        assert_eq!(vtk.lines().filter(|l| *l == "300.00000000").count(), 6);
        let plot = fs::read_to_string(results.join("plotdata_step_4.txt")).unwrap();
        assert_eq!(plot.lines().count(), 4);
        let densities = fs::read_to_string(results.join("current_densities.txt")).unwrap();
        assert_eq!(densities.lines().count(), 3);
    }

    #[test]
    fn test_unwritable_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = FileOutput::new(blocker.join("sub")).unwrap_err();
        assert!(matches!(err, HeatFilmError::OutputError { .. }));
    }
}
