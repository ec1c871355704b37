//! Sample decoding
//!
//! One burst read returns the 14-byte sensor data block in register order:
//!
//! | Offset | Register pair |
//! |---|---|
//! | 0..2 | `ACCEL_XOUT_H/L` |
//! | 2..4 | `ACCEL_YOUT_H/L` |
//! | 4..6 | `ACCEL_ZOUT_H/L` |
//! | 6..8 | `TEMP_OUT_H/L` |
//! | 8..10 | `GYRO_XOUT_H/L` |
//! | 10..12 | `GYRO_YOUT_H/L` |
//! | 12..14 | `GYRO_ZOUT_H/L` |
//!
//! Every pair is big-endian two's complement.

use crate::registers::SENSOR_DATA_LEN;
use crate::sensors::{self, AccelDataG, AccelFullScale, GyroDataDps, GyroFullScale};

/// Reinterpret a big-endian byte pair as a signed 16-bit value
///
/// Used for the temperature field.
#[must_use]
pub const fn as_signed_16(msb: u8, lsb: u8) -> i16 {
    i16::from_be_bytes([msb, lsb])
}

/// Decode a big-endian byte pair by explicit two's complement arithmetic
///
/// Computes `msb * 256 + lsb` and subtracts 65536 when the result lies in
/// the upper half of the unsigned range. For 16-bit inputs this is the same
/// value [`as_signed_16`] produces; it is kept for the motion axes.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn as_twos_complement(msb: u8, lsb: u8) -> i16 {
    let unsigned = (msb as i32) * 256 + (lsb as i32);
    let signed = if unsigned >= 32768 {
        unsigned - 65536
    } else {
        unsigned
    };
    // In range by construction: -32768..=32767
    signed as i16
}

/// Raw sensor data block as read from the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample(pub [u8; SENSOR_DATA_LEN]);

impl RawSample {
    /// Mutable view for the burst read to fill
    pub fn as_mut_bytes(&mut self) -> &mut [u8; SENSOR_DATA_LEN] {
        &mut self.0
    }

    /// Raw bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SENSOR_DATA_LEN] {
        &self.0
    }

    const fn pair(&self, offset: usize) -> (u8, u8) {
        (self.0[offset], self.0[offset + 1])
    }
}

/// One decoded measurement frame (raw signed counts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// X-axis acceleration (raw)
    pub accel_x: i16,
    /// Y-axis acceleration (raw)
    pub accel_y: i16,
    /// Z-axis acceleration (raw)
    pub accel_z: i16,
    /// Die temperature (raw)
    pub temperature: i16,
    /// X-axis rotation (raw)
    pub gyro_x: i16,
    /// Y-axis rotation (raw)
    pub gyro_y: i16,
    /// Z-axis rotation (raw)
    pub gyro_z: i16,
}

impl Sample {
    /// Decode a complete sensor data block
    #[must_use]
    pub const fn decode(raw: &RawSample) -> Self {
        let (ax_h, ax_l) = raw.pair(0);
        let (ay_h, ay_l) = raw.pair(2);
        let (az_h, az_l) = raw.pair(4);
        let (t_h, t_l) = raw.pair(6);
        let (gx_h, gx_l) = raw.pair(8);
        let (gy_h, gy_l) = raw.pair(10);
        let (gz_h, gz_l) = raw.pair(12);

        Self {
            accel_x: as_twos_complement(ax_h, ax_l),
            accel_y: as_twos_complement(ay_h, ay_l),
            accel_z: as_twos_complement(az_h, az_l),
            temperature: as_signed_16(t_h, t_l),
            gyro_x: as_twos_complement(gx_h, gx_l),
            gyro_y: as_twos_complement(gy_h, gy_l),
            gyro_z: as_twos_complement(gz_h, gz_l),
        }
    }

    /// Acceleration in g for the configured full-scale range
    #[must_use]
    pub fn accel_g(&self, full_scale: AccelFullScale) -> AccelDataG {
        AccelDataG::from_raw(
            self.accel_x,
            self.accel_y,
            self.accel_z,
            full_scale.sensitivity(),
        )
    }

    /// Rotation rate in °/s for the configured full-scale range
    #[must_use]
    pub fn gyro_dps(&self, full_scale: GyroFullScale) -> GyroDataDps {
        GyroDataDps::from_raw(
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            full_scale.sensitivity(),
        )
    }

    /// Die temperature in degrees Celsius
    #[must_use]
    pub fn temperature_celsius(&self) -> f32 {
        sensors::temperature_celsius(self.temperature)
    }
}

impl From<&RawSample> for Sample {
    fn from(raw: &RawSample) -> Self {
        Self::decode(raw)
    }
}
