use super::model::{PlantDataset, Reading, SensorRow};
use crate::config::PlantConfig;

/// Efficiency proxy: AC output over the power the nameplate rating implies
/// at the measured irradiance.
///
/// Clipped to zero when irradiance is not strictly above the threshold,
/// where output is dominated by sensor noise.  NaN irradiance also clips.
pub fn efficiency(ac_power: f64, irradiance: f64, config: &PlantConfig) -> f64 {
    if irradiance > config.irradiance_threshold {
        ac_power / (irradiance * config.rated_capacity_watts)
    } else {
        0.0
    }
}

/// Append `temp_delta` and `efficiency` to every row, in a single pass.
pub fn derive_metrics(rows: Vec<SensorRow>, config: &PlantConfig) -> PlantDataset {
    let readings = rows
        .into_iter()
        .map(|sensor| Reading {
            temp_delta: sensor.module_temp - sensor.ambient_temp,
            efficiency: efficiency(sensor.ac_power, sensor.irradiance, config),
            sensor,
        })
        .collect();
    PlantDataset { readings }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn row(module_temp: f64, ambient_temp: f64, irradiance: f64, ac_power: f64) -> SensorRow {
        SensorRow {
            timestamp: NaiveDateTime::default(),
            module_temp,
            ambient_temp,
            wind_speed: 2.0,
            irradiance,
            ac_power,
            dc_current: 0.0,
            phase_r_current: 0.0,
            phase_y_current: 0.0,
            phase_b_current: 0.0,
        }
    }

    #[test]
    fn low_light_efficiency_is_clipped() {
        let ds = derive_metrics(vec![row(30.0, 25.0, 0.0, 500.0)], &PlantConfig::default());
        assert_eq!(ds.readings[0].efficiency, 0.0);
    }

    #[test]
    fn full_sun_reading() {
        let ds = derive_metrics(
            vec![row(45.0, 25.0, 1000.0, 1_000_000.0)],
            &PlantConfig::default(),
        );
        let r = &ds.readings[0];
        assert_eq!(r.temp_delta, 20.0);
        assert_eq!(r.efficiency, 1_000_000.0 / (1000.0 * 2_000_000.0));
        assert!((r.efficiency - 0.0005).abs() < 1e-15);
    }

    #[test]
    fn threshold_itself_clips() {
        let cfg = PlantConfig::default();
        assert_eq!(efficiency(1000.0, 10.0, &cfg), 0.0);
        assert!(efficiency(1000.0, 10.5, &cfg) > 0.0);
        assert_eq!(efficiency(1000.0, f64::NAN, &cfg), 0.0);
    }

    #[test]
    fn efficiency_properties_hold_over_a_sweep() {
        let cfg = PlantConfig::default();
        let rows: Vec<SensorRow> = (0..200)
            .map(|i| {
                let irr = i as f64 * 0.75;
                row(20.0 + i as f64 * 0.1, 18.5, irr, i as f64 * 137.0)
            })
            .collect();
        let ds = derive_metrics(rows.clone(), &cfg);
        assert_eq!(ds.len(), rows.len());
        for (r, raw) in ds.readings.iter().zip(&rows) {
            assert_eq!(r.sensor, *raw);
            assert_eq!(r.temp_delta, raw.module_temp - raw.ambient_temp);
            if raw.ac_power >= 0.0 {
                assert!(r.efficiency >= 0.0);
            }
            if raw.irradiance <= 10.0 {
                assert_eq!(r.efficiency, 0.0);
            }
        }
    }

    #[test]
    fn temp_delta_may_be_negative() {
        let ds = derive_metrics(vec![row(12.0, 15.5, 0.0, 0.0)], &PlantConfig::default());
        assert_eq!(ds.readings[0].temp_delta, -3.5);
    }

    #[test]
    fn rated_capacity_comes_from_config() {
        let cfg = PlantConfig {
            rated_capacity_watts: 1_000_000.0,
            ..PlantConfig::default()
        };
        assert_eq!(efficiency(1_000_000.0, 1000.0, &cfg), 0.001);
    }
}
