//! Platform bring-up
//!
//! Clock, pin and watchdog setup have no protocol logic of their own; the
//! driver only needs them done, once, before the [`Sequencer`](crate::Sequencer)
//! is created.

/// One-time board setup the driver depends on
pub trait Platform {
    /// Stop the watchdog so the endless read loop is not reset
    fn disable_watchdog(&mut self);

    /// Bring the core and the bus source clock (SMCLK) to their final frequency
    ///
    /// The frequency must match [`BusConfig::source_clock_hz`](crate::BusConfig::source_clock_hz).
    fn configure_clocks(&mut self);

    /// Route SDA/SCL to the USCI module and park unused pins
    fn configure_pins(&mut self);
}

/// Run the platform setup in order: watchdog, clocks, pins
pub fn bring_up<P>(platform: &mut P)
where
    P: Platform + ?Sized,
{
    platform.disable_watchdog();
    platform.configure_clocks();
    platform.configure_pins();

    #[cfg(feature = "defmt")]
    defmt::debug!("Platform ready");
}
