use std::io::{self, Write};

use crate::config::Config;
use crate::telemetry::DescentSummary;

fn opt(v: Option<f64>) -> String {
    match v {
        Some(t) => format!("{t:.2}"),
        None => "null".into(),
    }
}

/// Write a descent summary as JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    config: &Config,
    summary: &DescentSummary,
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"vehicle\": {{")?;
    writeln!(writer, "    \"wet_mass_kg\": {:.1},", config.wet_mass)?;
    writeln!(writer, "    \"dry_mass_kg\": {:.1},", config.dry_mass)?;
    writeln!(writer, "    \"max_thrust_n\": {:.1},", config.max_thrust)?;
    writeln!(writer, "    \"isp_s\": {:.1}", config.isp)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"descent\": {{")?;
    writeln!(writer, "    \"landed\": {},", summary.landed)?;
    writeln!(writer, "    \"flight_time_s\": {:.2},", summary.flight_time)?;
    writeln!(writer, "    \"approach_entry_s\": {},", opt(summary.approach_entry))?;
    writeln!(writer, "    \"final_entry_s\": {},", opt(summary.final_entry))?;
    writeln!(writer, "    \"touchdown_vertical_ms\": {:.3},", summary.touchdown_vertical_speed)?;
    writeln!(
        writer,
        "    \"touchdown_horizontal_ms\": {:.3},",
        summary.touchdown_horizontal_speed
    )?;
    writeln!(writer, "    \"downrange_m\": {:.1},", summary.downrange)?;
    writeln!(writer, "    \"propellant_used_kg\": {:.1},", summary.propellant_used)?;
    writeln!(writer, "    \"propellant_remaining_kg\": {:.1}", summary.propellant_remaining)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

pub fn write_summary_file<P: AsRef<std::path::Path>>(
    path: P,
    config: &Config,
    summary: &DescentSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, config, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;

    #[test]
    fn json_output_marks_missing_stages_null() {
        let cfg = presets::apollo_lm();
        let summary = DescentSummary {
            landed: false,
            flight_time: 1000.0,
            touchdown_vertical_speed: -3.5,
            touchdown_horizontal_speed: 12.0,
            downrange: 450_000.0,
            propellant_used: 7_000.0,
            propellant_remaining: 1_134.0,
            approach_entry: Some(610.5),
            final_entry: None,
        };
        let mut buf = Vec::new();
        write_summary(&mut buf, &cfg, &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"landed\": false,"));
        assert!(json.contains("\"approach_entry_s\": 610.50,"));
        assert!(json.contains("\"final_entry_s\": null,"));
        assert!(json.trim_end().ends_with('}'));
    }
}
