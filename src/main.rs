use std::env;
use std::error::Error;

use log::info;
use lunar_descent::io::{write_summary_file, CsvSink};
use lunar_descent::{presets, simulate, DescentSummary, SimConfig, TelemetrySink};

/// Usage: lunar-descent [telemetry.csv] [summary.json]
fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    // -----------------------------------------------------------------------
    // Vehicle: Apollo LM descent stage, powered descent initiation at 15 km
    // -----------------------------------------------------------------------
    let config = presets::apollo_lm();
    let sim_config = SimConfig::default();

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let (outcome, telemetry) = simulate(&config, &sim_config)?;
    let summary = DescentSummary::new(&config, &outcome);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  LUNAR POWERED DESCENT");
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Dry mass:      {:>8.0} kg    Propellant:   {:>8.0} kg",
        config.dry_mass,
        config.propellant_mass()
    );
    println!(
        "  Max thrust:    {:>8.0} N     Isp:          {:>8.0} s",
        config.max_thrust, config.isp
    );
    println!(
        "  Slew limit:    {:>8.1} deg/s Delta-v:      {:>8.0} m/s",
        config.max_slew_rate.to_degrees(),
        config.delta_v()
    );
    println!();

    println!("  Descent Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &outcome.events {
        println!(
            "  t={:>7.1}s   alt={:>9.1}m   {:?}",
            e.time,
            e.state.altitude(config.body_radius),
            e.kind
        );
    }
    println!();

    println!("  Touchdown Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Landed:        {:>8}", summary.landed);
    println!("  Flight time:   {:>8.1} s", summary.flight_time);
    println!("  Vertical vel:  {:>8.2} m/s", summary.touchdown_vertical_speed);
    println!("  Horiz. vel:    {:>8.2} m/s", summary.touchdown_horizontal_speed);
    println!("  Downrange:     {:>8.0} m", summary.downrange);
    println!(
        "  Propellant:    {:>8.0} kg used, {:.0} kg left",
        summary.propellant_used, summary.propellant_remaining
    );
    println!(
        "  Peak thrust:   {:>8.0} N    ({:.1}% of ticks saturated)",
        telemetry.peak_thrust(),
        100.0 * telemetry.saturation_ratio()
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>8}  {:>8}  {:>8}  {:>7}  {:>5}",
        "t (s)", "alt (m)", "vz (m/s)", "vx (m/s)", "mass(kg)", "pitch", "stage"
    );
    println!("  {}", "─".repeat(64));

    let records = telemetry.records();
    let sample_interval = (records.len() / 30).max(1);
    for (i, r) in records.iter().enumerate() {
        if i % sample_interval != 0 && i + 1 != records.len() {
            continue;
        }
        println!(
            "  {:>7.1}  {:>9.1}  {:>8.2}  {:>8.2}  {:>8.1}  {:>7.1}  {:>5}",
            r.t,
            r.r - config.body_radius,
            r.dr,
            r.r * r.dtheta,
            r.mass,
            r.pitch.to_degrees(),
            r.stage
        );
    }

    println!();
    println!("  Simulation: {} ticks, dt={} s", outcome.ticks, sim_config.dt);
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Optional exports
    // -----------------------------------------------------------------------
    if let Some(path) = args.first() {
        let mut sink = CsvSink::from_path(path)?;
        for r in records {
            sink.record(r)?;
        }
        sink.flush()?;
        info!("wrote {} telemetry rows to {}", sink.rows(), path);
    }
    if let Some(path) = args.get(1) {
        write_summary_file(path, &config, &summary)?;
        info!("wrote descent summary to {}", path);
    }

    Ok(())
}
