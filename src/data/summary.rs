use super::error::DataError;
use super::model::{Column, PlantDataset};

/// Headline statistics over the whole table (never a window).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Highest AC output (W).
    pub peak_ac_power: f64,
    /// Mean wind speed (m/s).
    pub avg_wind_speed: f64,
    /// Highest module temperature (°C).
    pub max_module_temp: f64,
    /// Mean irradiance (W/m²).
    pub avg_irradiance: f64,
}

impl Summary {
    /// Aggregate the full dataset.
    ///
    /// Max and mean have no value over zero rows, so an empty dataset is an
    /// error rather than a row of zeros.  Missing (NaN) cells are skipped
    /// by both maxima and means; a mean over a column with no finite value
    /// left is an error too.
    pub fn compute(dataset: &PlantDataset) -> Result<Self, DataError> {
        if dataset.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        let max = |col: Column| dataset.column(col).fold(f64::NEG_INFINITY, f64::max);
        let mean = |col: Column| {
            let (sum, count) = dataset
                .column(col)
                .filter(|v| v.is_finite())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 {
                return Err(DataError::NoFiniteValues {
                    column: col.header(),
                });
            }
            Ok(sum / count as f64)
        };

        Ok(Summary {
            peak_ac_power: max(Column::AcPower),
            avg_wind_speed: mean(Column::WindSpeed)?,
            max_module_temp: max(Column::ModuleTemp),
            avg_irradiance: mean(Column::Irradiance)?,
        })
    }

    /// Label/value pairs for the metric cards, formatted for display.
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Peak AC Power", format!("{:.2} kW", self.peak_ac_power / 1000.0)),
            ("Avg Wind Speed", format!("{:.2} m/s", self.avg_wind_speed)),
            ("Max Module Temp", format!("{:.1} °C", self.max_module_temp)),
            ("Avg Irradiance", format!("{:.1} W/m²", self.avg_irradiance)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlantConfig;
    use crate::data::derive::derive_metrics;
    use crate::data::loader::timestamp_at;
    use crate::data::model::SensorRow;

    fn dataset(rows: &[[f64; 9]]) -> PlantDataset {
        let cfg = PlantConfig::default();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, raw)| SensorRow::from_raw(timestamp_at(&cfg, i).unwrap(), *raw))
            .collect();
        derive_metrics(rows, &cfg)
    }

    #[test]
    fn aggregates_over_all_rows() {
        //          mod   amb  wind  irr     ac
        let ds = dataset(&[
            [45.0, 25.0, 2.0, 1000.0, 1_500_000.0, 0.0, 0.0, 0.0, 0.0],
            [52.5, 27.0, 4.0, 800.0, 1_234_567.0, 0.0, 0.0, 0.0, 0.0],
            [20.0, 18.0, 6.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ]);
        let s = Summary::compute(&ds).unwrap();
        assert_eq!(s.peak_ac_power, 1_500_000.0);
        assert_eq!(s.avg_wind_speed, 4.0);
        assert_eq!(s.max_module_temp, 52.5);
        assert_eq!(s.avg_irradiance, 600.0);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let empty = PlantDataset { readings: vec![] };
        assert!(matches!(
            Summary::compute(&empty),
            Err(DataError::EmptyDataset)
        ));
    }

    #[test]
    fn cards_match_dashboard_formatting() {
        let s = Summary {
            peak_ac_power: 1_834_567.0,
            avg_wind_speed: 3.456,
            max_module_temp: 61.26,
            avg_irradiance: 412.04,
        };
        let cards = s.cards();
        assert_eq!(cards[0], ("Peak AC Power", "1834.57 kW".to_string()));
        assert_eq!(cards[1], ("Avg Wind Speed", "3.46 m/s".to_string()));
        assert_eq!(cards[2], ("Max Module Temp", "61.3 °C".to_string()));
        assert_eq!(cards[3], ("Avg Irradiance", "412.0 W/m²".to_string()));
    }

    #[test]
    fn nan_cells_are_skipped() {
        let ds = dataset(&[
            [f64::NAN, 25.0, 2.0, 10.0, 5.0, 0.0, 0.0, 0.0, 0.0],
            [30.0, 25.0, f64::NAN, f64::NAN, 7.0, 0.0, 0.0, 0.0, 0.0],
            [20.0, 25.0, 4.0, 30.0, 6.0, 0.0, 0.0, 0.0, 0.0],
        ]);
        let s = Summary::compute(&ds).unwrap();
        assert_eq!(s.max_module_temp, 30.0);
        assert_eq!(s.peak_ac_power, 7.0);
        assert_eq!(s.avg_wind_speed, 3.0);
        assert_eq!(s.avg_irradiance, 20.0);
        assert_eq!(s.cards()[1].1, "3.00 m/s");
    }

    #[test]
    fn blank_csv_cell_keeps_the_mean_defined() {
        let text = "MODULE_TEMP,Amb_Temp,WIND_Speed,IRR (W/m2),AC Power in Watts,\
                    DC Current in Amps,AC Ir in Amps,AC Iy in Amps,AC Ib in Amps\n\
                    40,25,2,500,1000,1,1,1,1\n\
                    41,25,,500,1000,1,1,1,1\n\
                    42,25,4,500,1000,1,1,1,1\n";
        let cfg = PlantConfig::default();
        let rows = crate::data::loader::read_csv(text.as_bytes(), &cfg).unwrap();
        let s = Summary::compute(&derive_metrics(rows, &cfg)).unwrap();
        assert_eq!(s.cards()[1], ("Avg Wind Speed", "3.00 m/s".to_string()));
    }

    #[test]
    fn column_without_finite_values_is_an_error() {
        let ds = dataset(&[[30.0, 25.0, f64::NAN, 10.0, 5.0, 0.0, 0.0, 0.0, 0.0]]);
        assert!(matches!(
            Summary::compute(&ds),
            Err(DataError::NoFiniteValues { column: "WIND_Speed" })
        ));
    }
}
