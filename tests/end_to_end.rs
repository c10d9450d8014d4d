//! Whole-run scenarios on a small three-heater stack.

use std::fs;

use approx::assert_relative_eq;
use heatfilm_core::{
    input,
    output::{FileOutput, Recorder},
    HeatFilmError, SimulationConfig, Simulator, Termination,
};

const DECK: &str = "\
mesh_seeds_on_end                           2
mesh_seeds_on_gap                           2
mesh_seeds_on_heater                        2
mesh_seeds_along_isolator_thickness         1
mesh_seeds_along_silicon_dioxide_thickness  1
mesh_seeds_along_copper_thickness           1

time_to_turn_off_heaters                    0
output_time_step_interval                   2
maximum_time_steps                          100
total_simulation_time                       0.02
initial_time_increment                      2m
minimum_time_increment                      1u
maximum_temperature_change_per_time_increment 50

width_of_end                  0.5
thickness_of_copper           0.01
thickness_of_silicon          0.5
thickness_of_isolator         0.002
thickness_of_silicon_dioxide  0.002
thickness_of_titanium         0.0002
width_of_heater               0.05
length_of_heated_region       1.0
number_of_heaters             3

ambient_temperature             300
boundary_condition_temperature  300
sample_initial_temperature      300

heater_currents 0 100 0
";

fn config() -> SimulationConfig {
    input::parse(DECK).unwrap()
}

#[test]
fn single_heater_profile_is_symmetric_and_peaked() {
    let mut sim = Simulator::new(&config()).unwrap();
    let mut recorder = Recorder::new();
    let summary = sim.run(&mut recorder).unwrap();

    assert_eq!(summary.termination, Termination::EndTime);
    assert!(summary.final_time > 0.02);

    let profile = &recorder.last().unwrap().surface;
    // end regions excluded: heated length 1.0 split into 12 cells
    assert_eq!(profile.len(), 13);
    assert_relative_eq!(profile[0].0, 0.0, epsilon = 1e-12);
    assert_relative_eq!(profile[12].0, 1.0, epsilon = 1e-12);

    let centre = profile.len() / 2;
    assert_relative_eq!(profile[centre].0, 0.5, epsilon = 1e-12);
    for k in 1..=centre {
        let (left, right) = (profile[centre - k].1, profile[centre + k].1);
        assert_relative_eq!(left, right, epsilon = 1e-5);
        assert!(profile[centre - k].1 < profile[centre - k + 1].1);
        assert!(profile[centre + k].1 < profile[centre + k - 1].1);
    }
    assert!(profile[centre].1 > 300.0);
}

#[test]
fn output_steps_follow_interval() {
    let mut sim = Simulator::new(&config()).unwrap();
    let mut recorder = Recorder::new();
    let summary = sim.run(&mut recorder).unwrap();

    let steps: Vec<usize> = recorder.snapshots.iter().map(|s| s.step).collect();
    assert!(steps.iter().all(|&s| s % 2 == 0 || s == summary.steps));
    assert_eq!(steps.last(), Some(&summary.steps));
    assert_eq!(recorder.current_densities.len(), 3);
    assert_eq!(recorder.current_densities[0], 0.0);
    // 100 mA over 0.05 mm x 0.0002 mm
    assert_relative_eq!(recorder.current_densities[1], 1.0e6, max_relative = 1e-12);
}

#[test]
fn uniform_quiet_stack_stops_at_steady_state() {
    let mut config = config();
    config.heater_currents = vec![0.0; 3];
    let mut sim = Simulator::new(&config).unwrap();
    let mut recorder = Recorder::new();

    let summary = sim.run(&mut recorder).unwrap();

    assert_eq!(summary.termination, Termination::SteadyState);
    assert_eq!(summary.steps, 2);
    // steady output plus the regular interval coincide on step 2
    assert_eq!(recorder.snapshots.len(), 1);
    assert!(sim.temperatures().iter().all(|t| (t - 300.0).abs() < 1e-9));
}

#[test]
fn heaters_cool_after_shutoff() {
    let mut config = config();
    config.time.shutoff_time = Some(0.005);
    config.time.total_time = 0.05;
    let mut sim = Simulator::new(&config).unwrap();

    let mut peak_at_shutoff = None;
    loop {
        let report = sim.step().unwrap();
        let surface = sim.surface_profile();
        if report.heaters_switched_off {
            assert_eq!(report.time, 0.005);
            assert!(report.output_due);
            peak_at_shutoff = Some(surface[surface.len() / 2].1);
        }
        if report.time > config.time.total_time {
            break;
        }
    }

    let peak = peak_at_shutoff.unwrap();
    let surface = sim.surface_profile();
    assert!(surface[surface.len() / 2].1 < peak);
    assert!(sim.state().heaters.is_off());
}

#[test]
fn implausible_jump_aborts_once_increment_too_small() {
    let mut config = config();
    config.time.max_temperature_change = 1e-9;
    config.time.initial_dt = 1e-3;
    config.time.min_dt = 1e-5;
    let mut sim = Simulator::new(&config).unwrap();
    let start = sim.temperatures().to_vec();

    let err = sim.run(&mut Recorder::new()).unwrap_err();

    assert!(matches!(err, HeatFilmError::TimeIncrementTooSmall { .. }));
    assert_eq!(sim.temperatures(), start.as_slice());
    assert_eq!(sim.state().current, start);
}

#[test]
fn file_output_written_for_selected_steps() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config();
    config.time.total_time = 0.005;
    let mut sim = Simulator::new(&config).unwrap();
    let mut sink = FileOutput::new(dir.path()).unwrap();

    let summary = sim.run(&mut sink).unwrap();
    let last = summary.steps;

    let vtk = fs::read_to_string(dir.path().join(format!("step_{last}.vtk"))).unwrap();
    let mesh = sim.mesh();
    assert!(vtk.starts_with("# vtk DataFile Version 2.0\n"));
    assert!(vtk.contains(&format!("DIMENSIONS {} {} 1", mesh.nx, mesh.ny)));
    assert!(vtk.contains(&format!("POINT_DATA {}", mesh.num_nodes())));

    let plot =
        fs::read_to_string(dir.path().join(format!("plotdata_step_{last}.txt"))).unwrap();
    assert!(plot.starts_with("current time is "));
    assert_eq!(plot.lines().count(), 14);

    let densities = fs::read_to_string(dir.path().join("current_densities.txt")).unwrap();
    assert_eq!(
        densities,
        "units are A/cm^2\n0.000000e+00\n1.000000e+06\n0.000000e+00\n"
    );
}

#[test]
fn deck_errors_surface_before_solving() {
    let deck = DECK.replace("heater_currents 0 100 0", "heater_currents 0 100");
    assert!(matches!(
        input::parse(&deck),
        Err(HeatFilmError::InvalidValue { .. })
    ));
}
