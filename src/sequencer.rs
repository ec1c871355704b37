//! Bus transaction sequencer
//!
//! The sequencer drives one I2C transaction at a time through explicit
//! [`Phase`]s. It never blocks on anything but the shared [`StatusWord`]:
//! each step issues a peripheral command and then polls the status word
//! until the interrupt handlers publish the matching event.
//!
//! ## Transmitter (register write)
//! 1. `UCTR` set, START requested; wait for transmit-ready (START generated,
//!    address on the wire, first byte may be loaded)
//! 2. For each byte: load `TXBUF`, wait for transmit-ready to re-arm
//! 3. STOP requested; wait for the peripheral to drop `UCTXSTP`
//!
//! ## Receiver (burst read)
//! 1. `UCTR` cleared, START requested; poll until `UCTXSTT` clears. A
//!    not-acknowledge in this window is answered with a repeated START.
//! 2. For each byte: wait for byte-received, copy `RXBUF`
//! 3. STOP as above
//!
//! Arbitration loss is checked first in every wait and aborts the transaction
//! without touching the bus again. Every wait is bounded by
//! [`SequencerConfig::max_polls`]; running out of polls reports
//! [`BusError::Timeout`] with the phase that stalled.
//!
//! The sequencer implements [`embedded_hal::i2c::I2c`], so register writes
//! and write-then-read bursts come from the trait's provided methods.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::status::{StatusFlags, StatusWord};
use crate::usci::{BusConfig, Role, UsciPeripheral};

/// Position of the sequencer within the current transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No transaction in flight
    Idle,
    /// START requested, not yet generated
    StartIssued,
    /// Slave address on the wire, waiting for acknowledge
    AddressPhase,
    /// Byte `n` of the current operation is being transferred
    DataPhase(usize),
    /// STOP requested, not yet generated
    StopPending,
}

/// Transaction-level bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Another master won arbitration; the peripheral has dropped to slave mode
    ArbitrationLost,
    /// The slave did not acknowledge (phase in which the NACK was seen)
    NotAcknowledged(Phase),
    /// An expected event never arrived within the polling budget
    Timeout(Phase),
}

impl i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        match *self {
            Self::ArbitrationLost => ErrorKind::ArbitrationLoss,
            Self::NotAcknowledged(Phase::StartIssued | Phase::AddressPhase) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            Self::NotAcknowledged(Phase::DataPhase(_)) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
            }
            Self::NotAcknowledged(_) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            Self::Timeout(_) => ErrorKind::Other,
        }
    }
}

/// Sequencer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencerConfig {
    /// Bus clock settings applied when the sequencer is created
    pub bus: BusConfig,
    /// Delay between two polls of the status word
    pub poll_interval_ns: u32,
    /// Polls allowed per wait before reporting [`BusError::Timeout`]
    pub max_polls: u32,
    /// Repeated STARTs allowed when the receiver address is not acknowledged
    pub max_restarts: u8,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        // One byte at 400 kHz takes ~23 us; 2 ms covers clock stretching
        Self {
            bus: BusConfig::default(),
            poll_interval_ns: 1_000,
            max_polls: 2_000,
            max_restarts: 8,
        }
    }
}

impl SequencerConfig {
    /// Upper bound on the time a single wait can take
    #[must_use]
    pub fn wait_budget_us(&self) -> u64 {
        u64::from(self.poll_interval_ns) * u64::from(self.max_polls) / 1_000
    }
}

/// Interrupt-synchronized I2C master
pub struct Sequencer<'a, P, D> {
    peripheral: P,
    delay: D,
    status: &'a StatusWord,
    config: SequencerConfig,
    phase: Phase,
    restarts: u32,
}

impl<'a, P, D> Sequencer<'a, P, D>
where
    P: UsciPeripheral,
    D: DelayNs,
{
    /// Configure the peripheral and create the sequencer
    ///
    /// Any bits left in `status` from before are discarded.
    pub fn new(
        mut peripheral: P,
        delay: D,
        status: &'a StatusWord,
        config: SequencerConfig,
    ) -> Self {
        peripheral.configure(&config.bus);
        status.discard(StatusFlags::all());

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "I2C master configured: prescaler={=u16}, {=u32} Hz",
            config.bus.prescaler(),
            config.bus.effective_frequency_hz()
        );

        Self {
            peripheral,
            delay,
            status,
            config,
            phase: Phase::Idle,
            restarts: 0,
        }
    }

    /// Current transaction phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Active configuration
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Repeated STARTs issued for not-acknowledge recovery since creation
    pub fn restart_count(&self) -> u32 {
        self.restarts
    }

    /// Consume the sequencer and return the peripheral and delay
    pub fn release(self) -> (P, D) {
        (self.peripheral, self.delay)
    }

    fn execute(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), BusError> {
        if operations.is_empty() {
            return Ok(());
        }

        self.status.discard(StatusFlags::all());
        self.peripheral.set_slave_address(address);

        let mut role = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if role != Some(Role::Transmitter) {
                        self.start_transmitter()?;
                        role = Some(Role::Transmitter);
                    }
                    self.transmit(bytes)?;
                }
                Operation::Read(buffer) => {
                    if role != Some(Role::Receiver) {
                        self.start_receiver()?;
                        role = Some(Role::Receiver);
                    }
                    self.receive(buffer)?;
                }
            }
        }

        self.stop()
    }

    fn start_transmitter(&mut self) -> Result<(), BusError> {
        self.peripheral.set_role(Role::Transmitter);
        self.peripheral.generate_start();
        self.phase = Phase::StartIssued;

        self.wait_for(StatusFlags::TRANSMIT_READY)?;
        self.phase = Phase::AddressPhase;
        Ok(())
    }

    fn start_receiver(&mut self) -> Result<(), BusError> {
        self.peripheral.set_role(Role::Receiver);
        self.peripheral.generate_start();
        // The peripheral sends the address right after the START
        self.phase = Phase::AddressPhase;

        let mut restarts: u8 = 0;
        for _ in 0..self.config.max_polls {
            if self.status.take(StatusFlags::ARBITRATION_LOST) {
                return Err(self.arbitration_lost());
            }

            if self.status.take(StatusFlags::NOT_ACKNOWLEDGED) {
                if restarts >= self.config.max_restarts {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("I2C address not acknowledged after {=u8} restarts", restarts);

                    return Err(BusError::NotAcknowledged(Phase::AddressPhase));
                }

                #[cfg(feature = "defmt")]
                defmt::debug!("I2C address NACK, repeating START");

                restarts += 1;
                self.restarts = self.restarts.wrapping_add(1);
                self.peripheral.generate_start();
                continue;
            }

            if !self.peripheral.start_pending() {
                return Ok(());
            }

            self.delay.delay_ns(self.config.poll_interval_ns);
        }

        Err(self.timed_out())
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        for (index, &byte) in bytes.iter().enumerate() {
            self.phase = Phase::DataPhase(index);
            self.peripheral.write_tx_buffer(byte);
            self.wait_for(StatusFlags::TRANSMIT_READY)?;
        }
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<(), BusError> {
        for (index, byte) in buffer.iter_mut().enumerate() {
            self.phase = Phase::DataPhase(index);
            self.wait_for(StatusFlags::BYTE_RECEIVED)?;
            *byte = self.peripheral.read_rx_buffer();
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BusError> {
        self.peripheral.generate_stop();
        self.phase = Phase::StopPending;

        for _ in 0..self.config.max_polls {
            if self.status.take(StatusFlags::ARBITRATION_LOST) {
                return Err(self.arbitration_lost());
            }
            if !self.peripheral.stop_pending() {
                self.finish();
                return Ok(());
            }
            self.delay.delay_ns(self.config.poll_interval_ns);
        }

        Err(self.timed_out())
    }

    /// Spin until `flag` is published, consuming it
    fn wait_for(&mut self, flag: StatusFlags) -> Result<(), BusError> {
        for _ in 0..self.config.max_polls {
            if self.status.take(StatusFlags::ARBITRATION_LOST) {
                return Err(self.arbitration_lost());
            }
            if self.status.take(StatusFlags::NOT_ACKNOWLEDGED) {
                // UCTXSTT stays set until the address is acknowledged
                let phase = if self.peripheral.start_pending() {
                    Phase::AddressPhase
                } else {
                    self.phase
                };
                return Err(BusError::NotAcknowledged(phase));
            }
            if self.status.take(flag) {
                return Ok(());
            }
            self.delay.delay_ns(self.config.poll_interval_ns);
        }

        Err(self.timed_out())
    }

    fn arbitration_lost(&self) -> BusError {
        #[cfg(feature = "defmt")]
        defmt::error!("I2C arbitration lost during {}", self.phase);

        BusError::ArbitrationLost
    }

    fn timed_out(&self) -> BusError {
        #[cfg(feature = "defmt")]
        defmt::warn!("I2C timeout during {}", self.phase);

        BusError::Timeout(self.phase)
    }

    /// Release the bus after a failed transaction
    fn recover(&mut self, error: BusError) {
        match error {
            // Lost arbitration leaves us a slave; the bus belongs to the winner
            BusError::ArbitrationLost => {}
            BusError::NotAcknowledged(_) | BusError::Timeout(_) => {
                self.peripheral.generate_stop();
            }
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.status.discard(StatusFlags::all());
        self.phase = Phase::Idle;
    }
}

impl<P, D> i2c::ErrorType for Sequencer<'_, P, D> {
    type Error = BusError;
}

impl<P, D> i2c::I2c<SevenBitAddress> for Sequencer<'_, P, D>
where
    P: UsciPeripheral,
    D: DelayNs,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let result = self.execute(address, operations);
        if let Err(error) = result {
            self.recover(error);
        }
        result
    }
}
