//! Interrupt service entry points
//!
//! The USCI module raises two interrupt vectors:
//! - the bus-state vector (`USCIAB0RX` on MSP430G2xx3) carrying start, stop,
//!   arbitration-lost and not-acknowledge flags
//! - the transfer vector (`USCIAB0TX`) carrying transmit-ready and
//!   byte-received flags
//!
//! Each handler absorbs every active hardware flag into the shared
//! [`StatusWord`] and then clears it in hardware so the vector does not
//! re-fire for the same event. Publishing always happens before clearing, so
//! an event is visible to the sequencer before its hardware trace is gone.
//! Handlers never clear status word bits; that belongs to the sequencer.
//!
//! # Example
//!
//! ```ignore
//! #[interrupt]
//! fn USCIAB0RX() {
//!     mpu6050_usci::interrupt::on_bus_state_interrupt(&mut board::usci_flags(), &STATUS);
//! }
//!
//! #[interrupt]
//! fn USCIAB0TX() {
//!     mpu6050_usci::interrupt::on_transfer_interrupt(&mut board::usci_flags(), &STATUS);
//! }
//! ```

use crate::status::{StatusFlags, StatusWord};
use crate::usci::InterruptFlags;

/// Service the bus-state interrupt
///
/// Returns the flags absorbed by this call. Delivery with no active hardware
/// flag is a no-op and returns an empty set.
pub fn on_bus_state_interrupt<H>(hw: &mut H, status: &StatusWord) -> StatusFlags
where
    H: InterruptFlags + ?Sized,
{
    let pending = hw.bus_state_flags() & StatusFlags::BUS_STATE;
    if !pending.is_empty() {
        status.publish(pending);
        hw.clear_bus_state_flags(pending);
    }
    pending
}

/// Service the byte-transfer interrupt
///
/// Returns the flags absorbed by this call. Delivery with no active hardware
/// flag is a no-op and returns an empty set.
pub fn on_transfer_interrupt<H>(hw: &mut H, status: &StatusWord) -> StatusFlags
where
    H: InterruptFlags + ?Sized,
{
    let pending = hw.transfer_flags() & StatusFlags::TRANSFER;
    if !pending.is_empty() {
        status.publish(pending);
        hw.clear_transfer_flags(pending);
    }
    pending
}
