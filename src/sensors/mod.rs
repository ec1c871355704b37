//! Sensor configuration for the MPU-6050
//!
//! This module provides the types that describe how the sensor is set up
//! during initialization and how raw readings map to physical units:
//! - Accelerometer (3-axis)
//! - Gyroscope (3-axis)
//! - Shared digital low pass filter and sample rate
//! - Die temperature
//!
//! The defaults reproduce the plotter configuration: 200 Hz sample rate,
//! 44 Hz filter, ±500°/s and ±4g.

pub mod accelerometer;
pub mod gyroscope;

// Re-export main types
pub use accelerometer::{AccelDataG, AccelFullScale};
pub use gyroscope::{GyroDataDps, GyroFullScale};

use crate::power::ClockSource;

/// Gyroscope output rate with the low pass filter bypassed
const GYRO_RATE_UNFILTERED_HZ: f32 = 8000.0;

/// Gyroscope output rate with the low pass filter enabled
const GYRO_RATE_FILTERED_HZ: f32 = 1000.0;

/// Digital Low Pass Filter configuration (`CONFIG.DLPF_CFG`)
///
/// The filter is shared by accelerometer and gyroscope; each variant is named
/// after the accelerometer bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dlpf {
    /// Accel 260 Hz, gyro 256 Hz (filter bypassed, 8 kHz gyro rate)
    Hz260 = 0,
    /// Accel 184 Hz, gyro 188 Hz
    Hz184 = 1,
    /// Accel 94 Hz, gyro 98 Hz
    Hz94 = 2,
    /// Accel 44 Hz, gyro 42 Hz
    #[default]
    Hz44 = 3,
    /// Accel 21 Hz, gyro 20 Hz
    Hz21 = 4,
    /// Accel 10 Hz, gyro 10 Hz
    Hz10 = 5,
    /// Accel 5 Hz, gyro 5 Hz
    Hz5 = 6,
}

impl Dlpf {
    /// Get register value for `DLPF_CFG`
    #[must_use]
    pub const fn dlpf_cfg(self) -> u8 {
        self as u8
    }

    /// Accelerometer 3dB bandwidth in Hz
    #[must_use]
    pub const fn accel_bandwidth_hz(self) -> u16 {
        match self {
            Self::Hz260 => 260,
            Self::Hz184 => 184,
            Self::Hz94 => 94,
            Self::Hz44 => 44,
            Self::Hz21 => 21,
            Self::Hz10 => 10,
            Self::Hz5 => 5,
        }
    }

    /// Gyroscope 3dB bandwidth in Hz
    #[must_use]
    pub const fn gyro_bandwidth_hz(self) -> u16 {
        match self {
            Self::Hz260 => 256,
            Self::Hz184 => 188,
            Self::Hz94 => 98,
            Self::Hz44 => 42,
            Self::Hz21 => 20,
            Self::Hz10 => 10,
            Self::Hz5 => 5,
        }
    }

    /// Gyroscope output rate that the sample rate divider divides
    #[must_use]
    pub fn gyro_output_rate_hz(self) -> f32 {
        match self {
            Self::Hz260 => GYRO_RATE_UNFILTERED_HZ,
            _ => GYRO_RATE_FILTERED_HZ,
        }
    }
}

/// Complete sensor configuration written during initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Clock source; initialization also clears `SLEEP`
    pub clock_source: ClockSource,
    /// Sample rate divider (`SMPLRT_DIV`)
    pub sample_rate_div: u8,
    /// Digital low pass filter
    pub dlpf: Dlpf,
    /// Gyroscope full-scale range
    pub gyro_full_scale: GyroFullScale,
    /// Accelerometer full-scale range
    pub accel_full_scale: AccelFullScale,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::plotter()
    }
}

impl SensorConfig {
    /// The plotter configuration
    ///
    /// `PWR_MGMT_1=0x02`, `SMPLRT_DIV=0x04`, `CONFIG=0x03`,
    /// `GYRO_CONFIG=0x08`, `ACCEL_CONFIG=0x08`
    #[must_use]
    pub const fn plotter() -> Self {
        Self {
            clock_source: ClockSource::PllGyroY,
            sample_rate_div: 4,
            dlpf: Dlpf::Hz44,
            gyro_full_scale: GyroFullScale::Dps500,
            accel_full_scale: AccelFullScale::G4,
        }
    }

    /// Calculate the effective sample rate in Hz
    #[must_use]
    pub fn sample_rate_hz(&self) -> f32 {
        self.dlpf.gyro_output_rate_hz() / (1.0 + f32::from(self.sample_rate_div))
    }

    /// `(register, value)` pairs in initialization order
    #[must_use]
    pub const fn register_values(&self) -> [(u8, u8); 5] {
        [
            (0x6B, self.clock_source.clksel()),
            (0x19, self.sample_rate_div),
            (0x1A, self.dlpf.dlpf_cfg()),
            (0x1B, self.gyro_full_scale.fs_sel() << 3),
            (0x1C, self.accel_full_scale.afs_sel() << 3),
        ]
    }
}

/// Convert a raw `TEMP_OUT` reading to degrees Celsius
#[must_use]
pub fn temperature_celsius(raw: i16) -> f32 {
    f32::from(raw) / 340.0 + 36.53
}
