//! USCI bus peripheral abstraction
//!
//! The sequencer and the interrupt handlers do not touch registers directly.
//! Firmware implements [`UsciPeripheral`] for the foreground control path
//! (`UCBxCTL1`, `UCBxI2CSA`, `UCBxTXBUF`, `UCBxRXBUF`) and [`InterruptFlags`]
//! for the interrupt path (`UCBxSTAT`, `IFG2`). Both traits speak in
//! [`StatusFlags`]; the `from_*`/`to_*` helpers below translate the raw
//! MSP430 register bits.

use crate::status::StatusFlags;

/// `UCBxSTAT` arbitration-lost flag
pub const UCALIFG: u8 = 0x01;
/// `UCBxSTAT` start-condition flag
pub const UCSTTIFG: u8 = 0x02;
/// `UCBxSTAT` stop-condition flag
pub const UCSTPIFG: u8 = 0x04;
/// `UCBxSTAT` not-acknowledge flag
pub const UCNACKIFG: u8 = 0x08;
/// `IFG2` receive flag for USCI_B0
pub const UCB0RXIFG: u8 = 0x04;
/// `IFG2` transmit flag for USCI_B0
pub const UCB0TXIFG: u8 = 0x08;

/// Offset between the `IFG2` transfer flags and their status word bits
const TRANSFER_SHIFT: u32 = 4;

impl StatusFlags {
    /// Translate raw `UCBxSTAT` bits into bus-state flags
    #[must_use]
    pub const fn from_usci_stat(stat: u8) -> Self {
        Self::from_bits_truncate(stat & Self::BUS_STATE.bits())
    }

    /// Raw `UCBxSTAT` bits for the bus-state flags in `self`
    #[must_use]
    pub const fn to_usci_stat(self) -> u8 {
        self.bits() & Self::BUS_STATE.bits()
    }

    /// Translate raw `IFG2` bits into transfer flags
    ///
    /// Bits belonging to other peripherals sharing `IFG2` are dropped.
    #[must_use]
    pub const fn from_ifg2(ifg2: u8) -> Self {
        let usci_bits = ifg2 & (UCB0RXIFG | UCB0TXIFG);
        Self::from_bits_truncate(usci_bits << TRANSFER_SHIFT)
    }

    /// Raw `IFG2` bits for the transfer flags in `self`
    #[must_use]
    pub const fn to_ifg2(self) -> u8 {
        (self.bits() & Self::TRANSFER.bits()) >> TRANSFER_SHIFT
    }
}

/// Master role for the next START condition (`UCTR`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Master transmitter (`UCTR` set)
    Transmitter,
    /// Master receiver (`UCTR` cleared)
    Receiver,
}

/// Bus clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Frequency of the clock feeding the bit-rate generator (SMCLK)
    pub source_clock_hz: u32,
    /// Target SCL frequency
    pub bus_frequency_hz: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            source_clock_hz: 16_000_000,
            bus_frequency_hz: 400_000,
        }
    }
}

impl BusConfig {
    /// Bit-rate prescaler (`UCBxBR1:UCBxBR0`)
    ///
    /// Rounded up so the bus never runs faster than requested. Saturates to
    /// `u16::MAX` and never returns zero.
    #[must_use]
    pub fn prescaler(&self) -> u16 {
        let divisor = if self.bus_frequency_hz == 0 {
            u32::from(u16::MAX)
        } else {
            self.source_clock_hz.div_ceil(self.bus_frequency_hz)
        };
        u16::try_from(divisor.max(1)).unwrap_or(u16::MAX)
    }

    /// SCL frequency actually produced by [`prescaler()`](Self::prescaler)
    #[must_use]
    pub fn effective_frequency_hz(&self) -> u32 {
        self.source_clock_hz / u32::from(self.prescaler())
    }
}

/// Foreground control of a USCI peripheral in I2C master mode
///
/// Implementations are thin register accessors; all protocol ordering lives
/// in the [`Sequencer`](crate::Sequencer).
pub trait UsciPeripheral {
    /// Put the module in I2C master mode with 7-bit addressing
    ///
    /// Holds `UCSWRST` while programming mode, clock source and prescaler,
    /// enables the start/stop/arbitration/NACK and transmit/receive
    /// interrupts, then releases reset.
    fn configure(&mut self, config: &BusConfig);

    /// Program the target address (`UCBxI2CSA`)
    fn set_slave_address(&mut self, address: u8);

    /// Select transmitter or receiver for the next START (`UCTR`)
    fn set_role(&mut self, role: Role);

    /// Request a START (or repeated START) condition (`UCTXSTT`)
    fn generate_start(&mut self);

    /// `true` while the START/address phase is in progress (`UCTXSTT` still set)
    fn start_pending(&self) -> bool;

    /// Request a STOP condition (`UCTXSTP`)
    fn generate_stop(&mut self);

    /// `true` until the STOP condition has been generated (`UCTXSTP` still set)
    fn stop_pending(&self) -> bool;

    /// Load the transmit buffer
    fn write_tx_buffer(&mut self, byte: u8);

    /// Read the receive buffer
    fn read_rx_buffer(&mut self) -> u8;
}

/// Interrupt-side view of the peripheral's condition flags
pub trait InterruptFlags {
    /// Active bus-state flags (start, stop, arbitration lost, NACK)
    fn bus_state_flags(&self) -> StatusFlags;

    /// Clear hardware bus-state flags so the interrupt does not re-fire
    fn clear_bus_state_flags(&mut self, flags: StatusFlags);

    /// Active transfer flags (transmit ready, byte received)
    fn transfer_flags(&self) -> StatusFlags;

    /// Clear hardware transfer flags so the interrupt does not re-fire
    fn clear_transfer_flags(&mut self, flags: StatusFlags);
}
