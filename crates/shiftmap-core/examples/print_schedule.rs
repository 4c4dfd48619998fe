use shiftmap_core::prelude::*;
use std::env;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            println!("Loading: {}", path);
            ScheduleConfig::load(path)?
        }
        None => {
            println!("Usage: print_schedule [config.json]  (using defaults)");
            ScheduleConfig::default()
        }
    };

    let (table, report) = config.build_with_report()?;
    println!(
        "Policy: {}, gears: {}, speeds: 0..={}",
        config.policy,
        table.gears(),
        table.maximum_speed()
    );
    println!(
        "Cells: {}, fallback cells: {}, merged runs: {}",
        report.cells, report.fallback_cells, report.smoothing.merged_runs
    );

    // One line per 5 speed units, one column per load bin
    print!("\nspeed |");
    for load in table.loads() {
        print!(" {:>4.1}", load);
    }
    println!();
    for speed_bin in (0..table.speed_bins()).step_by(5) {
        print!("{:>5} |", speed_bin);
        if let Some(row) = table.row(speed_bin) {
            for gear in row {
                print!(" {:>4}", gear);
            }
        }
        println!();
    }

    println!("\nSample lookups:");
    for (speed, load) in [(3.2, 0.15), (22.4, 0.35), (61.8, 0.8), (149.6, 1.0)] {
        let result = table.lookup(speed, load);
        println!(
            "  speed {:>6.1} load {:.2} -> gear {:>2} (nearest {} / {:.1}, blend {:.2})",
            speed, load, result.gear, result.nearest_speed, result.nearest_load, result.interpolated
        );
    }

    Ok(())
}
