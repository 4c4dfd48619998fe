//! Tests for shift table construction under each policy

use shiftmap_core::prelude::*;

fn stock_engine() -> TruckEngine {
    TruckEngine::new(3550.0, 400.0, 1750.0, 2100.0).expect("stock engine is valid")
}

fn stock_ratios() -> GearRatios {
    DrivetrainPreset::Standard
        .gear_ratios()
        .expect("standard drivetrain is valid")
}

/// Engine with a flat power curve and a non-zero stall RPM
struct FlatEngine;

impl EnginePerformance for FlatEngine {
    fn characteristics(&self) -> EngineCharacteristics {
        EngineCharacteristics {
            stall_rpm: 300.0,
            idle_rpm: 400.0,
            peak_rpm: 1500.0,
            maximum_rpm: 2000.0,
        }
    }

    fn power(&self, rpm: f64, load: f64) -> f64 {
        rpm * load
    }

    fn fuel_consumption(&self, rpm: f64, load: f64) -> f64 {
        1.0 + rpm * load
    }

    fn throttle_for_power(&self, rpm: f64, power: f64) -> f64 {
        power / rpm
    }
}

#[test]
fn test_all_policies_stay_in_gear_range() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    for policy in ShiftPolicy::ALL {
        for dwell in [0, 3] {
            let table = build_schedule(policy, &ratios, &engine, 150, dwell);
            assert_eq!(table.speed_bins(), 151);
            assert_eq!(table.load_bins(), 11);
            for s in 0..table.speed_bins() {
                for l in 0..table.load_bins() {
                    let gear = table.gear(s, l).expect("every cell is present");
                    assert!(
                        (1..=12).contains(&gear),
                        "{policy} dwell {dwell}: gear {gear} at speed {s}, load bin {l}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_peak_rpm_stationary_selects_first_gear() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    let choice = ShiftPolicy::PeakRpm.select_gear(&engine, &ratios, 0.0, 0.0);
    assert_eq!(choice.gear, 1);
    assert!(!choice.fallback);

    let table = build_schedule(ShiftPolicy::PeakRpm, &ratios, &engine, 150, 0);
    assert_eq!(table.gear(0, 0), Some(1));
}

#[test]
fn test_peak_rpm_is_monotonic_in_speed() {
    let engine = stock_engine();
    let ratios = stock_ratios();
    let (table, _) = ScheduleBuilder::new(&engine, &ratios, 150).build_raw(ShiftPolicy::PeakRpm);

    for load_bin in 0..table.load_bins() {
        let column: Vec<u8> = table.column(load_bin).collect();
        for pair in column.windows(2) {
            assert!(
                pair[0] <= pair[1],
                "load bin {load_bin}: gear drops from {} to {}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn test_peak_rpm_upshifts_later_under_load() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    // 20 speed units: first gear alone is ~2830 RPM
    let light = ShiftPolicy::PeakRpm.select_gear(&engine, &ratios, 20.0, 0.0);
    let heavy = ShiftPolicy::PeakRpm.select_gear(&engine, &ratios, 20.0, 1.0);
    assert!(heavy.gear < light.gear);

    // Ceiling at full load is 2100 RPM; gear 3 is ~1799 RPM, gear 2 ~2265 RPM
    assert_eq!(heavy.gear, 3);
}

#[test]
fn test_peak_rpm_skips_stalled_gears() {
    let ratios = GearRatios::new(vec![100.0, 50.0, 25.0]).unwrap();

    // Every gear is under stall: top gear
    let crawl = ShiftPolicy::PeakRpm.select_gear(&FlatEngine, &ratios, 2.0, 0.0);
    assert_eq!(crawl.gear, 3);
    assert!(crawl.fallback);

    let launch = ShiftPolicy::PeakRpm.select_gear(&FlatEngine, &ratios, 4.0, 0.0);
    assert_eq!(launch.gear, 1);

    // Gears 1 and 2 over the ceiling, gear 3 under stall
    let gap = ShiftPolicy::PeakRpm.select_gear(&FlatEngine, &ratios, 10.0, 0.0);
    assert_eq!(gap.gear, 3);
    assert!(gap.fallback);
}

#[test]
fn test_search_policies_never_pick_first_two_gears() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    for policy in [
        ShiftPolicy::Performance,
        ShiftPolicy::Efficiency,
        ShiftPolicy::Economy,
    ] {
        let table = build_schedule(policy, &ratios, &engine, 150, 3);
        for load_bin in 0..table.load_bins() {
            assert!(
                table.column(load_bin).all(|g| g >= 3),
                "{policy} picked gear 1 or 2 at load bin {load_bin}"
            );
        }
    }
}

#[test]
fn test_performance_picks_maximum_power_gear() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    for speed in [5.0, 20.0, 45.0, 80.0] {
        for load in [0.0, 0.5, 1.0] {
            let throttle = f64::max(load, 0.2);
            let expected = ratios
                .iter()
                .skip(2)
                .fold(None::<(u8, f64)>, |best, (gear, ratio)| {
                    let power = engine.power(ratio * speed, throttle);
                    match best {
                        Some((_, p)) if p >= power => best,
                        _ => Some((gear, power)),
                    }
                })
                .map(|(gear, _)| gear)
                .unwrap();

            let choice = ShiftPolicy::Performance.select_gear(&engine, &ratios, speed, load);
            assert_eq!(choice.gear, expected, "speed {speed}, load {load}");
        }
    }

    // Peak power sits near 1800 RPM, which gear 3 reaches at 20 speed units
    let choice = ShiftPolicy::Performance.select_gear(&engine, &ratios, 20.0, 1.0);
    assert_eq!(choice.gear, 3);
}

#[test]
fn test_efficiency_falls_back_when_every_gear_over_redline() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    // Top gear alone is ~12.4 RPM per speed unit: 200 units is ~2470 RPM
    let choice = ShiftPolicy::Efficiency.select_gear(&engine, &ratios, 200.0, 0.5);
    assert_eq!(choice.gear, 3);
    assert!(choice.fallback);
}

#[test]
fn test_efficiency_picks_best_power_per_fuel() {
    let engine = stock_engine();
    let ratios = stock_ratios();
    let limits = engine.characteristics();

    for speed in [10.0, 30.0, 60.0] {
        for load in [0.0, 0.3, 0.9] {
            let throttle = f64::max(load, 0.1);
            let expected = ratios
                .iter()
                .skip(2)
                .filter(|(_, ratio)| {
                    let rpm = ratio * speed;
                    rpm >= limits.stall_rpm && rpm <= limits.maximum_rpm
                })
                .map(|(gear, ratio)| {
                    let rpm = ratio * speed;
                    (gear, engine.power(rpm, throttle) / engine.fuel_consumption(rpm, throttle))
                })
                .fold(None::<(u8, f64)>, |best, (gear, eff)| match best {
                    Some((_, e)) if e >= eff => best,
                    _ => Some((gear, eff)),
                })
                .map(|(gear, _)| gear)
                .unwrap();

            let choice = ShiftPolicy::Efficiency.select_gear(&engine, &ratios, speed, load);
            assert_eq!(choice.gear, expected, "speed {speed}, load {load}");
            assert!(!choice.fallback);
        }
    }
}

#[test]
fn test_economy_zero_load_picks_minimum_fuel_gear() {
    let engine = stock_engine();
    let ratios = stock_ratios();
    let limits = engine.characteristics();

    for speed in [5.0, 12.0, 20.0, 40.0, 90.0] {
        let qualifying: Vec<(u8, f64)> = ratios
            .iter()
            .skip(2)
            .filter_map(|(gear, ratio)| {
                let rpm = ratio * speed;
                if rpm < limits.stall_rpm || rpm > limits.maximum_rpm {
                    return None;
                }
                let throttle = engine.throttle_for_power(rpm, 0.0);
                (throttle.is_finite() && (0.0..=1.0).contains(&throttle))
                    .then(|| (gear, engine.fuel_consumption(rpm, throttle)))
            })
            .collect();
        assert!(!qualifying.is_empty(), "speed {speed} has candidates");

        let min_fuel = qualifying
            .iter()
            .map(|&(_, fuel)| fuel)
            .fold(f64::INFINITY, f64::min);
        let expected = qualifying
            .iter()
            .find(|&&(_, fuel)| fuel == min_fuel)
            .map(|&(gear, _)| gear)
            .unwrap();

        let choice = ShiftPolicy::Economy.select_gear(&engine, &ratios, speed, 0.0);
        assert_eq!(choice.gear, expected, "speed {speed}");
        assert!(!choice.fallback);
    }

    // With no power demanded, the lowest-RPM gear wins
    let cruise = ShiftPolicy::Economy.select_gear(&engine, &ratios, 20.0, 0.0);
    assert_eq!(cruise.gear, 12);
}

#[test]
fn test_economy_stationary_falls_back() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    // At standstill the throttle solve is 0/0
    let choice = ShiftPolicy::Economy.select_gear(&engine, &ratios, 0.0, 0.0);
    assert_eq!(choice.gear, 3);
    assert!(choice.fallback);
}

#[test]
fn test_economy_rejects_unreachable_power() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    // 600 kW is beyond the stock engine's ~545 kW peak
    let choice = ShiftPolicy::Economy.select_gear(&engine, &ratios, 25.0, 1.0);
    assert_eq!(choice.gear, 3);
    assert!(choice.fallback);
}

#[test]
fn test_builder_report_counts_fallbacks() {
    let engine = stock_engine();
    let ratios = stock_ratios();

    let (_, report) = ScheduleBuilder::new(&engine, &ratios, 150).build(ShiftPolicy::Economy, 3);
    assert_eq!(report.cells, 151 * 11);
    // Standstill row always falls back
    assert!(report.fallback_cells >= 11);
    assert!(report.fallback_cells < report.cells);
}

#[test]
fn test_build_is_deterministic() {
    let engine = stock_engine();
    let ratios = DrivetrainPreset::LowGeared.gear_ratios().unwrap();

    let a = build_schedule(ShiftPolicy::Efficiency, &ratios, &engine, 120, 4);
    let b = build_schedule(ShiftPolicy::Efficiency, &ratios, &engine, 120, 4);
    assert_eq!(a, b);
}

#[test]
fn test_builder_accepts_trait_objects() {
    let engine: Box<dyn EnginePerformance> = Box::new(stock_engine());
    let ratios = stock_ratios();

    let table = build_schedule(ShiftPolicy::Performance, &ratios, &*engine, 60, 3);
    assert_eq!(table.maximum_speed(), 60);
    assert_eq!(table.gears(), 12);
}
