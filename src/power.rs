//! Power management
//!
//! The MPU-6050 powers up asleep and clocked from its internal 8 MHz
//! oscillator. Initialization clears `SLEEP` and switches to one of the
//! gyroscope-referenced PLLs, which the datasheet recommends for stability.

/// Clock source selection (`PWR_MGMT_1.CLKSEL`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal 8 MHz oscillator
    Internal8MHz = 0,
    /// PLL with X-axis gyroscope reference
    PllGyroX = 1,
    /// PLL with Y-axis gyroscope reference
    #[default]
    PllGyroY = 2,
    /// PLL with Z-axis gyroscope reference
    PllGyroZ = 3,
    /// PLL with external 32.768 kHz reference
    PllExternal32kHz = 4,
    /// PLL with external 19.2 MHz reference
    PllExternal19MHz = 5,
    /// Stop the clock and keep the timing generator in reset
    Stop = 7,
}

impl ClockSource {
    /// Get register value for `CLKSEL`
    #[must_use]
    pub const fn clksel(self) -> u8 {
        self as u8
    }

    /// Decode a `CLKSEL` field value (6 is reserved)
    #[must_use]
    pub const fn from_clksel(value: u8) -> Option<Self> {
        match value & 0x07 {
            0 => Some(Self::Internal8MHz),
            1 => Some(Self::PllGyroX),
            2 => Some(Self::PllGyroY),
            3 => Some(Self::PllGyroZ),
            4 => Some(Self::PllExternal32kHz),
            5 => Some(Self::PllExternal19MHz),
            7 => Some(Self::Stop),
            _ => None,
        }
    }

    /// Whether the source keeps the sensor running
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Stop)
    }
}
