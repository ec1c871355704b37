//! Shared bus status word
//!
//! The status word is the only channel from interrupt context to the
//! foreground [`Sequencer`](crate::Sequencer). The interrupt handlers in
//! [`interrupt`](crate::interrupt) only ever set bits; the sequencer only ever
//! clears them. Every clear the sequencer performs is an atomic
//! test-and-clear, so an event published between the test and the clear
//! cannot be lost.
//!
//! The word lives in a `static` in firmware:
//!
//! ```
//! use mpu6050_usci::{StatusFlags, StatusWord};
//!
//! static STATUS: StatusWord = StatusWord::new();
//!
//! STATUS.publish(StatusFlags::TRANSMIT_READY);
//! assert!(STATUS.take(StatusFlags::TRANSMIT_READY));
//! assert!(!STATUS.take(StatusFlags::TRANSMIT_READY));
//! ```

use bitflags::bitflags;
use portable_atomic::{AtomicU8, Ordering};

bitflags! {
    /// Pending bus events
    ///
    /// The low nibble mirrors the USCI `UCBxSTAT` interrupt flags; the two
    /// transfer flags sit in the high bits, shifted left by four from their
    /// `IFG2` positions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Another master won the bus (`UCALIFG`)
        const ARBITRATION_LOST = 0x01;
        /// START condition detected (`UCSTTIFG`)
        const START_SEEN = 0x02;
        /// STOP condition detected (`UCSTPIFG`)
        const STOP_SEEN = 0x04;
        /// Expected acknowledge was not received (`UCNACKIFG`)
        const NOT_ACKNOWLEDGED = 0x08;
        /// A complete byte is waiting in the receive buffer
        const BYTE_RECEIVED = 0x40;
        /// The transmit buffer is empty and can take the next byte
        const TRANSMIT_READY = 0x80;

        /// Flags delivered by the bus-state interrupt
        const BUS_STATE = Self::ARBITRATION_LOST.bits()
            | Self::START_SEEN.bits()
            | Self::STOP_SEEN.bits()
            | Self::NOT_ACKNOWLEDGED.bits();
        /// Flags delivered by the byte-transfer interrupt
        const TRANSFER = Self::BYTE_RECEIVED.bits() | Self::TRANSMIT_READY.bits();
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "StatusFlags({=u8:#010b})", self.bits());
    }
}

/// Atomic status word shared between interrupt and foreground context
///
/// Single producer (interrupt handlers, set-only) and single consumer (the
/// sequencer, clear-only). Backed by [`portable_atomic::AtomicU8`] so the
/// read-modify-write operations stay atomic on targets without native
/// atomic RMW instructions.
#[derive(Debug)]
pub struct StatusWord {
    bits: AtomicU8,
}

impl StatusWord {
    /// Create an empty status word
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// OR `flags` into the word (producer side)
    pub fn publish(&self, flags: StatusFlags) {
        self.bits.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    /// Test-and-clear
    ///
    /// Atomically clears the requested bits and returns `true` if all of
    /// them were set. Bits outside `flags` are left untouched.
    pub fn take(&self, flags: StatusFlags) -> bool {
        let previous = self.bits.fetch_and(!flags.bits(), Ordering::AcqRel);
        StatusFlags::from_bits_retain(previous).contains(flags)
    }

    /// Clear `flags` without observing them
    pub fn discard(&self, flags: StatusFlags) {
        self.bits.fetch_and(!flags.bits(), Ordering::AcqRel);
    }

    /// Current value of the word
    #[must_use]
    pub fn snapshot(&self) -> StatusFlags {
        StatusFlags::from_bits_retain(self.bits.load(Ordering::Acquire))
    }

    /// Returns `true` if all of `flags` are currently set
    #[must_use]
    pub fn contains(&self, flags: StatusFlags) -> bool {
        self.snapshot().contains(flags)
    }
}

impl Default for StatusWord {
    fn default() -> Self {
        Self::new()
    }
}
