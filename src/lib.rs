#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod acquisition;
pub mod device;
pub mod interface;
pub mod interrupt;
pub mod platform;
pub mod power;
pub mod registers;
pub mod sample;
pub mod sensors;
pub mod sequencer;
pub mod status;
pub mod usci;

// Re-export main types
pub use acquisition::{Acquisition, RestartPolicy, SampleSink, SampleSlot};
pub use device::Mpu6050Driver;
pub use interface::I2cInterface;
pub use power::ClockSource;
pub use sample::{RawSample, Sample, as_signed_16, as_twos_complement};
pub use sensors::{
    AccelDataG, AccelFullScale, Dlpf, GyroDataDps, GyroFullScale, SensorConfig,
};
pub use sequencer::{BusError, Phase, Sequencer, SequencerConfig};
pub use status::{StatusFlags, StatusWord};
pub use usci::{BusConfig, InterruptFlags, Role, UsciPeripheral};

/// MPU-6050 I2C address when AD0 pin is low (default: 0x68)
///
/// This is the address the sensor answers on when the AD0 pin is tied to
/// ground, which is how most breakout boards ship. Use
/// [`I2cInterface::default()`] for this configuration.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// MPU-6050 I2C address when AD0 pin is high (alternative: 0x69)
///
/// Use [`I2cInterface::alternative()`] for this configuration.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Expected value of `WHO_AM_I` register
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `WHO_AM_I` register value (contains the actual value read)
    InvalidDevice(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
