use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Column – every addressable field of a reading
// ---------------------------------------------------------------------------

/// A named column of the plant table.
///
/// Raw columns carry the header names used by the plant's export files;
/// `Timestamp`, `TempDelta` and `Efficiency` are produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Timestamp,
    ModuleTemp,
    AmbientTemp,
    WindSpeed,
    Irradiance,
    AcPower,
    DcCurrent,
    PhaseRCurrent,
    PhaseYCurrent,
    PhaseBCurrent,
    TempDelta,
    Efficiency,
}

impl Column {
    /// The nine columns read from the input file, in canonical order.
    pub const RAW: [Column; 9] = [
        Column::ModuleTemp,
        Column::AmbientTemp,
        Column::WindSpeed,
        Column::Irradiance,
        Column::AcPower,
        Column::DcCurrent,
        Column::PhaseRCurrent,
        Column::PhaseYCurrent,
        Column::PhaseBCurrent,
    ];

    /// Every column, synthesized timestamp first and derived metrics last.
    pub const ALL: [Column; 12] = [
        Column::Timestamp,
        Column::ModuleTemp,
        Column::AmbientTemp,
        Column::WindSpeed,
        Column::Irradiance,
        Column::AcPower,
        Column::DcCurrent,
        Column::PhaseRCurrent,
        Column::PhaseYCurrent,
        Column::PhaseBCurrent,
        Column::TempDelta,
        Column::Efficiency,
    ];

    /// Header name as it appears in input files and on chart axes.
    pub fn header(self) -> &'static str {
        match self {
            Column::Timestamp => "Timestamp",
            Column::ModuleTemp => "MODULE_TEMP",
            Column::AmbientTemp => "Amb_Temp",
            Column::WindSpeed => "WIND_Speed",
            Column::Irradiance => "IRR (W/m2)",
            Column::AcPower => "AC Power in Watts",
            Column::DcCurrent => "DC Current in Amps",
            Column::PhaseRCurrent => "AC Ir in Amps",
            Column::PhaseYCurrent => "AC Iy in Amps",
            Column::PhaseBCurrent => "AC Ib in Amps",
            Column::TempDelta => "Temp_Delta",
            Column::Efficiency => "Efficiency",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Column::Timestamp => "",
            Column::ModuleTemp | Column::AmbientTemp | Column::TempDelta => "°C",
            Column::WindSpeed => "m/s",
            Column::Irradiance => "W/m²",
            Column::AcPower => "W",
            Column::DcCurrent
            | Column::PhaseRCurrent
            | Column::PhaseYCurrent
            | Column::PhaseBCurrent => "A",
            Column::Efficiency => "",
        }
    }

    /// Resolve a header name back to its column.
    pub fn from_header(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// SensorRow – one row as read from disk
// ---------------------------------------------------------------------------

/// One row of the input file plus its synthesized timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRow {
    pub timestamp: NaiveDateTime,
    pub module_temp: f64,
    pub ambient_temp: f64,
    pub wind_speed: f64,
    pub irradiance: f64,
    pub ac_power: f64,
    pub dc_current: f64,
    pub phase_r_current: f64,
    pub phase_y_current: f64,
    pub phase_b_current: f64,
}

impl SensorRow {
    /// Build a row from raw values given in [`Column::RAW`] order.
    pub fn from_raw(timestamp: NaiveDateTime, raw: [f64; 9]) -> Self {
        let [module_temp, ambient_temp, wind_speed, irradiance, ac_power, dc_current, phase_r_current, phase_y_current, phase_b_current] =
            raw;
        SensorRow {
            timestamp,
            module_temp,
            ambient_temp,
            wind_speed,
            irradiance,
            ac_power,
            dc_current,
            phase_r_current,
            phase_y_current,
            phase_b_current,
        }
    }
}

// ---------------------------------------------------------------------------
// Reading – one row of the derived table
// ---------------------------------------------------------------------------

/// A sensor row together with the metrics derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub sensor: SensorRow,
    /// `module_temp - ambient_temp` (°C).
    pub temp_delta: f64,
    /// AC output over the irradiance-implied plant maximum; 0 in low light.
    pub efficiency: f64,
}

impl Reading {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.sensor.timestamp
    }

    /// Numeric value of `column`. Timestamps map to Unix seconds so they
    /// can share a plot axis with other columns.
    pub fn value(&self, column: Column) -> f64 {
        let s = &self.sensor;
        match column {
            Column::Timestamp => s.timestamp.and_utc().timestamp() as f64,
            Column::ModuleTemp => s.module_temp,
            Column::AmbientTemp => s.ambient_temp,
            Column::WindSpeed => s.wind_speed,
            Column::Irradiance => s.irradiance,
            Column::AcPower => s.ac_power,
            Column::DcCurrent => s.dc_current,
            Column::PhaseRCurrent => s.phase_r_current,
            Column::PhaseYCurrent => s.phase_y_current,
            Column::PhaseBCurrent => s.phase_b_current,
            Column::TempDelta => self.temp_delta,
            Column::Efficiency => self.efficiency,
        }
    }
}

// ---------------------------------------------------------------------------
// PlantDataset – the complete derived table
// ---------------------------------------------------------------------------

/// The full derived table. Built once per input file and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantDataset {
    pub readings: Vec<Reading>,
}

impl PlantDataset {
    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate one column over the whole table.
    pub fn column(&self, column: Column) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(move |r| r.value(column))
    }
}
