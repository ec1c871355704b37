//! High-level driver API for the MPU-6050
//!
//! This module wraps the register map with the two operations the plotter
//! needs: writing the configuration registers once, and reading the full
//! sensor data block as a single burst.

use device_driver::RegisterInterface;

use crate::registers::{RegisterDevice, SENSOR_DATA_LEN, SENSOR_DATA_START};
use crate::sample::{RawSample, Sample};
use crate::sensors::SensorConfig;
use crate::{Error, WHO_AM_I_VALUE};

/// Burst length in bits, as `device-driver` counts register sizes
#[allow(clippy::cast_possible_truncation)]
const SENSOR_DATA_BITS: u32 = (SENSOR_DATA_LEN * 8) as u32;

/// Main driver for the MPU-6050
pub struct Mpu6050Driver<I> {
    device: RegisterDevice<I>,
    config: SensorConfig,
}

impl<I> Mpu6050Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new MPU-6050 driver instance
    ///
    /// No bus traffic happens here. Call [`init()`](Self::init) or
    /// [`configure()`](Self::configure) before reading samples.
    pub fn new(interface: I) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            config: SensorConfig::default(),
        }
    }

    /// Initialize the device with the default (plotter) configuration
    ///
    /// # Errors
    ///
    /// Returns the first bus error; see [`configure()`](Self::configure).
    pub fn init(&mut self) -> Result<(), Error<I::Error>> {
        self.configure(&SensorConfig::default())
    }

    /// Write the five configuration registers
    ///
    /// Each register is written in its own transaction, in this order:
    /// `PWR_MGMT_1`, `SMPLRT_DIV`, `CONFIG`, `GYRO_CONFIG`, `ACCEL_CONFIG`.
    /// The first failure aborts the sequence; registers already written keep
    /// their new values and nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure(&mut self, config: &SensorConfig) -> Result<(), Error<I::Error>> {
        // Wake from sleep and select the clock source
        self.device.pwr_mgmt_1().write(|w| {
            w.set_clksel(config.clock_source.clksel());
            w.set_sleep(false);
        })?;

        self.device.smplrt_div().write(|w| {
            w.set_smplrt_div(config.sample_rate_div);
        })?;

        self.device.filter_config().write(|w| {
            w.set_dlpf_cfg(config.dlpf.dlpf_cfg());
        })?;

        self.device.gyro_config().write(|w| {
            w.set_fs_sel(config.gyro_full_scale.fs_sel());
        })?;

        self.device.accel_config().write(|w| {
            w.set_afs_sel(config.accel_full_scale.afs_sel());
        })?;

        self.config = *config;

        #[cfg(feature = "defmt")]
        defmt::info!("MPU-6050 configured: {}", config);

        Ok(())
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        let value = self.device.who_am_i().read()?;
        Ok(value.who_am_i())
    }

    /// Check that the device on the bus is an MPU-6050
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the value read if `WHO_AM_I`
    /// does not match, or a bus error.
    pub fn verify_identity(&mut self) -> Result<(), Error<I::Error>> {
        let who_am_i = self.read_who_am_i()?;
        if who_am_i != WHO_AM_I_VALUE {
            #[cfg(feature = "defmt")]
            defmt::warn!("Unexpected WHO_AM_I: 0x{:02X}", who_am_i);

            return Err(Error::InvalidDevice(who_am_i));
        }
        Ok(())
    }

    /// Read the 14-byte sensor data block in one burst
    ///
    /// `raw` is overwritten; on error its contents are unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_raw(&mut self, raw: &mut RawSample) -> Result<(), Error<I::Error>> {
        self.device.interface.read_register(
            SENSOR_DATA_START,
            SENSOR_DATA_BITS,
            raw.as_mut_bytes(),
        )?;
        Ok(())
    }

    /// Read and decode one sample
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_sample(&mut self) -> Result<Sample, Error<I::Error>> {
        let mut raw = RawSample::default();
        self.read_raw(&mut raw)?;
        Ok(Sample::decode(&raw))
    }

    /// Configuration written by the last successful [`configure()`](Self::configure)
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Consume the driver and return the register interface
    pub fn release(self) -> I {
        self.device.interface
    }
}
