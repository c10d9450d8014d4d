//! Structured grid generation for the heater stack.
//!
//! Columns, left to right: end region, half gap, `number_of_heaters` repeats
//! of (heater, gap) with the last gap halved, end region. Rows, bottom to
//! top: graded silicon substrate, isolator, titanium heater row, silicon
//! dioxide, copper.

use tracing::debug;

use crate::error::Result;
use crate::input::SimulationConfig;
use crate::materials::Material;

use super::{Heater, HeaterRegistry, LayeredMesh, RadiationBoundarySet};

/// Element rows across the silicon substrate.
pub const SILICON_SEEDS: usize = 5;

/// Element rows across the titanium heater film.
pub const TITANIUM_SEEDS: usize = 1;

/// Node positions across the substrate as fractions of its thickness.
/// Rows crowd towards the isolator interface.
const SILICON_GRADING: [f64; SILICON_SEEDS + 1] = [0.0, 0.4, 0.8, 0.98, 0.998, 1.0];

/// What a column of cells belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    End,
    Gap,
    Heater(usize),
}

/// Column pattern along x, one entry per cell column.
fn column_pattern(config: &SimulationConfig) -> Vec<(Column, f64)> {
    let seeds = &config.mesh;
    let geometry = &config.geometry;
    let end_dx = geometry.width_of_end / seeds.end as f64;
    let gap_dx = geometry.width_of_gap() / seeds.gap as f64;
    let heater_dx = geometry.width_of_heater / seeds.heater as f64;
    let half_gap = seeds.gap / 2;

    let mut columns = Vec::new();
    columns.extend(std::iter::repeat((Column::End, end_dx)).take(seeds.end));
    columns.extend(std::iter::repeat((Column::Gap, gap_dx)).take(half_gap));
    for h in 0..geometry.number_of_heaters {
        columns.extend(std::iter::repeat((Column::Heater(h), heater_dx)).take(seeds.heater));
        let gap = if h + 1 == geometry.number_of_heaters {
            seeds.gap - half_gap
        } else {
            seeds.gap
        };
        columns.extend(std::iter::repeat((Column::Gap, gap_dx)).take(gap));
    }
    columns.extend(std::iter::repeat((Column::End, end_dx)).take(seeds.end));
    columns
}

/// y coordinate of every node row.
fn row_coordinates(config: &SimulationConfig) -> Vec<f64> {
    let seeds = &config.mesh;
    let g = &config.geometry;

    let mut rows: Vec<f64> = SILICON_GRADING
        .iter()
        .map(|f| f * g.thickness_of_silicon)
        .collect();

    let mut base = g.thickness_of_silicon;
    let iso_dy = g.thickness_of_isolator / seeds.isolator as f64;
    rows.extend((1..=seeds.isolator).map(|i| base + i as f64 * iso_dy));

    base += g.thickness_of_isolator + g.thickness_of_titanium;
    rows.push(base);

    let ox_dy = g.thickness_of_silicon_dioxide / seeds.silicon_dioxide as f64;
    rows.extend((1..=seeds.silicon_dioxide).map(|i| base + i as f64 * ox_dy));

    base += g.thickness_of_silicon_dioxide;
    let cu_dy = g.thickness_of_copper / seeds.copper as f64;
    rows.extend((1..=seeds.copper).map(|i| base + i as f64 * cu_dy));

    rows
}

/// Generate the layered mesh described by `config`.
pub fn generate(config: &SimulationConfig) -> Result<LayeredMesh> {
    let seeds = &config.mesh;
    let columns = column_pattern(config);
    let rows = row_coordinates(config);

    let mut xs = Vec::with_capacity(columns.len() + 1);
    let mut x = 0.0;
    xs.push(x);
    for (_, dx) in &columns {
        x += dx;
        xs.push(x);
    }

    let nx = xs.len();
    let ny = rows.len();

    let coordinates: Vec<[f64; 2]> = rows
        .iter()
        .flat_map(|&y| xs.iter().map(move |&x| [x, y]))
        .collect();

    let heater_row = SILICON_SEEDS + seeds.isolator;
    let oxide_top = heater_row + TITANIUM_SEEDS + seeds.silicon_dioxide;

    let mut connectivity = Vec::with_capacity((nx - 1) * (ny - 1));
    let mut material_ids = Vec::with_capacity((nx - 1) * (ny - 1));
    let mut heater_elements = vec![Vec::new(); config.geometry.number_of_heaters];

    for j in 0..ny - 1 {
        for (i, (column, _)) in columns.iter().enumerate() {
            let n0 = j * nx + i;
            connectivity.push([n0, n0 + 1, n0 + nx + 1, n0 + nx]);

            let material = if j < SILICON_SEEDS {
                Material::Silicon
            } else if j == heater_row {
                match column {
                    Column::Heater(h) => {
                        heater_elements[*h].push(j * (nx - 1) + i);
                        Material::Titanium
                    }
                    Column::End | Column::Gap => Material::SiliconDioxide,
                }
            } else if j < oxide_top {
                Material::SiliconDioxide
            } else {
                Material::Copper
            };
            material_ids.push(material.id());
        }
    }

    let heaters = HeaterRegistry::new(
        heater_elements
            .into_iter()
            .zip(&config.heater_currents)
            .map(|(elements, &current)| Heater { elements, current })
            .collect(),
    );

    let top_row = (ny - 2) * (nx - 1);
    let radiating = RadiationBoundarySet::new((top_row..top_row + nx - 1).collect());

    debug!(nx, ny, elements = connectivity.len(), "generated layered mesh");

    LayeredMesh::from_arrays(
        nx,
        ny,
        &coordinates,
        &connectivity,
        &material_ids,
        heaters,
        radiating,
    )
}
