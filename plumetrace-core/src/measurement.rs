//! Measurement model
//!
//! ## Overview
//!
//! Every sensor reports against a fixed enumeration of 15 measurement kinds.
//! A [`MeasurementSet`] is the per-sensor snapshot of those kinds: one
//! `Option<f32>` slot each, where `None` means "missing or invalid" and is
//! never coerced to zero for classification purposes.
//!
//! A separate, smaller enumeration, [`Pollutant`], names the 8 gas and
//! particulate species checked against their own dedicated cut table. The
//! two enumerations overlap (O3 appears in both) but are evaluated
//! independently; both outcomes are retained on the status record.
//!
//! ## Key casing
//!
//! Upstream feeds historically used two casing conventions for the same
//! field ("O3" vs "o3", "PM25" vs "pm25"). Normalization happens exactly
//! once, at ingestion, via the case-insensitive `from_key` constructors;
//! downstream code only ever sees enum values.

/// Number of measurement kinds in the fixed enumeration
pub const MEASUREMENT_KIND_COUNT: usize = 15;

/// Number of pollutant species with dedicated cut points
pub const POLLUTANT_COUNT: usize = 8;

/// Fixed enumeration of measurement kinds
///
/// The discriminant doubles as the [`MeasurementSet`] slot index, and the
/// enumeration order is the canonical display/classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MeasurementKind {
    /// Air temperature
    Temp = 0,
    /// Relative humidity
    Humidity = 1,
    /// Illuminance
    Light = 2,
    /// Noise level
    Noise = 3,
    /// Vibration (max over axes)
    Vibration = 4,
    /// UV index
    Uv = 5,
    /// Wind direction (never threshold-classified)
    WindDir = 6,
    /// Wind speed
    WindSpeed = 7,
    /// Ozone
    O3 = 8,
    /// Ammonia
    Nh3 = 9,
    /// Hydrogen sulfide
    H2s = 10,
    /// Carbon monoxide
    Co = 11,
    /// Nitrogen dioxide
    No2 = 12,
    /// Sulfur dioxide
    So2 = 13,
    /// Black globe temperature
    BlackGlobe = 14,
}

impl MeasurementKind {
    /// All kinds in canonical order
    pub const ALL: [Self; MEASUREMENT_KIND_COUNT] = [
        Self::Temp,
        Self::Humidity,
        Self::Light,
        Self::Noise,
        Self::Vibration,
        Self::Uv,
        Self::WindDir,
        Self::WindSpeed,
        Self::O3,
        Self::Nh3,
        Self::H2s,
        Self::Co,
        Self::No2,
        Self::So2,
        Self::BlackGlobe,
    ];

    /// Canonical field name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Temp => "temp",
            Self::Humidity => "humidity",
            Self::Light => "light",
            Self::Noise => "noise",
            Self::Vibration => "vibration",
            Self::Uv => "uv",
            Self::WindDir => "windDir",
            Self::WindSpeed => "windSpeed",
            Self::O3 => "o3",
            Self::Nh3 => "nh3",
            Self::H2s => "h2s",
            Self::Co => "co",
            Self::No2 => "no2",
            Self::So2 => "so2",
            Self::BlackGlobe => "blackGlobe",
        }
    }

    /// Unit of measurement for display
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Temp | Self::BlackGlobe => "°C",
            Self::Humidity => "%",
            Self::Light => "lux",
            Self::Noise => "dB",
            Self::Vibration => "mm/s",
            Self::Uv => "UV index",
            Self::WindDir => "°",
            Self::WindSpeed => "m/s",
            Self::O3 | Self::Nh3 | Self::H2s | Self::Co | Self::No2 | Self::So2 => "ppm",
        }
    }

    /// Parse a field key, tolerating either historical casing convention
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| key.eq_ignore_ascii_case(kind.name()))
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Pollutant species with a dedicated exceed/not-exceed cut point
///
/// PM2.5 and PM10 have no slot in the 15-kind measurement set; when a feed
/// does not deliver them they read as absent and therefore never exceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Pollutant {
    /// Fine particulate matter (µg/m³)
    Pm25 = 0,
    /// Coarse particulate matter (µg/m³)
    Pm10 = 1,
    /// Ozone (ppm)
    O3 = 2,
    /// Ammonia (ppm)
    Nh3 = 3,
    /// Hydrogen sulfide (ppm)
    H2s = 4,
    /// Carbon monoxide (ppm)
    Co = 5,
    /// Nitrogen dioxide (ppm)
    No2 = 6,
    /// Sulfur dioxide (ppm)
    So2 = 7,
}

impl Pollutant {
    /// All pollutants in cut-table order
    pub const ALL: [Self; POLLUTANT_COUNT] = [
        Self::Pm25,
        Self::Pm10,
        Self::O3,
        Self::Nh3,
        Self::H2s,
        Self::Co,
        Self::No2,
        Self::So2,
    ];

    /// Canonical field name (lowercase convention)
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::O3 => "o3",
            Self::Nh3 => "nh3",
            Self::H2s => "h2s",
            Self::Co => "co",
            Self::No2 => "no2",
            Self::So2 => "so2",
        }
    }

    /// The measurement-set slot this pollutant reads from, if it has one
    pub const fn measurement_kind(&self) -> Option<MeasurementKind> {
        match self {
            Self::Pm25 | Self::Pm10 => None,
            Self::O3 => Some(MeasurementKind::O3),
            Self::Nh3 => Some(MeasurementKind::Nh3),
            Self::H2s => Some(MeasurementKind::H2s),
            Self::Co => Some(MeasurementKind::Co),
            Self::No2 => Some(MeasurementKind::No2),
            Self::So2 => Some(MeasurementKind::So2),
        }
    }

    /// Parse a pollutant key, tolerating either historical casing convention
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| key.eq_ignore_ascii_case(p.name()))
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

/// Snapshot of one sensor's current measurements
///
/// Absent and non-finite values are both stored as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementSet {
    values: [Option<f32>; MEASUREMENT_KIND_COUNT],
}

impl MeasurementSet {
    /// Create an empty set (all kinds missing)
    pub const fn new() -> Self {
        Self {
            values: [None; MEASUREMENT_KIND_COUNT],
        }
    }

    /// Read one kind; `None` when missing
    pub fn get(&self, kind: MeasurementKind) -> Option<f32> {
        self.values[kind.slot()]
    }

    /// Store one kind; NaN and infinities degrade to missing
    pub fn set(&mut self, kind: MeasurementKind, value: f32) {
        self.values[kind.slot()] = value.is_finite().then_some(value);
    }

    /// Mark one kind as missing
    pub fn clear(&mut self, kind: MeasurementKind) {
        self.values[kind.slot()] = None;
    }

    /// Number of present values
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// True when every kind is missing
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }

    /// Merge only the present fields of `partial` into this set
    ///
    /// Fields absent from the partial update retain their previous value.
    pub fn merge_from(&mut self, partial: &MeasurementSet) {
        for kind in MeasurementKind::ALL {
            if let Some(value) = partial.get(kind) {
                self.values[kind.slot()] = Some(value);
            }
        }
    }

    /// Iterate present values in canonical kind order
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementKind, f32)> + '_ {
        MeasurementKind::ALL
            .iter()
            .filter_map(move |&kind| self.get(kind).map(|v| (kind, v)))
    }

    /// Build a set from raw `(key, value)` fields
    ///
    /// Keys are matched case-insensitively; unknown keys are ignored. The
    /// three vibration axis fields (`vibrationX`/`Y`/`Z`) fold into the
    /// single vibration kind via max, matching the upstream feed.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut set = Self::new();
        for (key, value) in fields {
            if !value.is_finite() {
                continue;
            }
            if is_vibration_axis(key) {
                let folded = match set.get(MeasurementKind::Vibration) {
                    Some(prior) => prior.max(value),
                    None => value,
                };
                set.set(MeasurementKind::Vibration, folded);
            } else if let Some(kind) = MeasurementKind::from_key(key) {
                set.set(kind, value);
            }
        }
        set
    }
}

fn is_vibration_axis(key: &str) -> bool {
    key.eq_ignore_ascii_case("vibrationX")
        || key.eq_ignore_ascii_case("vibrationY")
        || key.eq_ignore_ascii_case("vibrationZ")
}
