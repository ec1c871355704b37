//! Continuous acquisition
//!
//! [`Acquisition`] is the long-running procedure of the plotter firmware:
//! configure the sensor once, then read, decode and publish one sample per
//! iteration for ever.
//!
//! Initialization failures are fatal and never retried; the sensor is left
//! in whatever state the last successful write produced. Steady-state read
//! failures are retried on the next iteration until
//! [`RestartPolicy::max_consecutive_failures`] is exceeded.
//!
//! Decoded samples go to a [`SampleSink`]. [`SampleSlot`] is the usual sink:
//! a single slot that each new sample overwrites, readable from any context.

use core::cell::Cell;
use core::convert::Infallible;

use critical_section::Mutex;
use device_driver::RegisterInterface;

use crate::Error;
use crate::device::Mpu6050Driver;
use crate::sample::{RawSample, Sample};

/// Consumer of decoded samples
pub trait SampleSink {
    /// Hand over the newest sample
    fn publish(&mut self, sample: Sample);
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn publish(&mut self, sample: Sample) {
        (**self).publish(sample);
    }
}

/// Single-slot sample buffer
///
/// Holds only the newest sample; there is no history. Safe to share between
/// the acquisition loop and an interrupt or another task.
///
/// ```
/// use mpu6050_usci::{Sample, SampleSlot};
///
/// static LATEST: SampleSlot = SampleSlot::new();
///
/// LATEST.publish(Sample { accel_x: 1, ..Default::default() });
/// LATEST.publish(Sample { accel_x: 2, ..Default::default() });
/// assert_eq!(LATEST.latest().map(|s| s.accel_x), Some(2));
/// ```
pub struct SampleSlot {
    slot: Mutex<Cell<Option<Sample>>>,
}

impl SampleSlot {
    /// Create an empty slot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Overwrite the slot
    pub fn publish(&self, sample: Sample) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(sample)));
    }

    /// Copy of the newest sample, if any
    #[must_use]
    pub fn latest(&self) -> Option<Sample> {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }

    /// Remove and return the newest sample
    pub fn take(&self) -> Option<Sample> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }
}

impl Default for SampleSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSink for SampleSlot {
    fn publish(&mut self, sample: Sample) {
        SampleSlot::publish(self, sample);
    }
}

impl SampleSink for &SampleSlot {
    fn publish(&mut self, sample: Sample) {
        SampleSlot::publish(self, sample);
    }
}

/// Steady-state failure handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RestartPolicy {
    /// Failed reads tolerated in a row before the loop gives up
    pub max_consecutive_failures: u8,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 3,
        }
    }
}

/// Initialization followed by an endless read loop
pub struct Acquisition<I, S> {
    driver: Mpu6050Driver<I>,
    sink: S,
    policy: RestartPolicy,
    raw: RawSample,
    consecutive_failures: u8,
    samples_published: u32,
}

impl<I, S> Acquisition<I, S>
where
    I: RegisterInterface<AddressType = u8>,
    S: SampleSink,
{
    /// Create the acquisition loop around an unconfigured driver
    pub fn new(driver: Mpu6050Driver<I>, sink: S, policy: RestartPolicy) -> Self {
        Self {
            driver,
            sink,
            policy,
            raw: RawSample::default(),
            consecutive_failures: 0,
            samples_published: 0,
        }
    }

    /// Configure the sensor
    ///
    /// # Errors
    ///
    /// Any bus error is fatal: the caller must not start reading.
    pub fn start(&mut self) -> Result<(), Error<I::Error>> {
        let result = self.driver.init();

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!("Sensor initialization aborted");
        }

        result
    }

    /// One burst read, decode and publish
    ///
    /// The restart policy is not applied; see [`step()`](Self::step).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails. Nothing is
    /// published in that case.
    pub fn poll_once(&mut self) -> Result<Sample, Error<I::Error>> {
        self.driver.read_raw(&mut self.raw)?;
        let sample = Sample::decode(&self.raw);
        self.sink.publish(sample);
        self.samples_published = self.samples_published.wrapping_add(1);
        Ok(sample)
    }

    /// One loop iteration with the restart policy applied
    ///
    /// Returns `Ok(None)` for a failed read that the policy tolerates.
    ///
    /// # Errors
    ///
    /// Returns the read error once more than
    /// [`max_consecutive_failures`](RestartPolicy::max_consecutive_failures)
    /// reads have failed in a row.
    pub fn step(&mut self) -> Result<Option<Sample>, Error<I::Error>> {
        match self.poll_once() {
            Ok(sample) => {
                self.consecutive_failures = 0;
                Ok(Some(sample))
            }
            Err(error) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures > self.policy.max_consecutive_failures {
                    #[cfg(feature = "defmt")]
                    defmt::error!(
                        "Giving up after {=u8} failed reads",
                        self.consecutive_failures
                    );

                    return Err(error);
                }

                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "Sensor read failed ({=u8} in a row), restarting transaction",
                    self.consecutive_failures
                );

                Ok(None)
            }
        }
    }

    /// Configure the sensor and read for ever
    ///
    /// # Errors
    ///
    /// Only returns on a fatal error: any initialization failure, or
    /// steady-state failures beyond the restart policy.
    pub fn run(&mut self) -> Result<Infallible, Error<I::Error>> {
        self.start()?;
        loop {
            self.step()?;
        }
    }

    /// Like [`run()`](Self::run), waiting `period_us` between iterations
    ///
    /// # Errors
    ///
    /// Same as [`run()`](Self::run).
    pub fn run_periodic<D>(
        &mut self,
        delay: &mut D,
        period_us: u32,
    ) -> Result<Infallible, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.start()?;
        loop {
            self.step()?;
            delay.delay_us(period_us);
        }
    }

    /// Periodic acquisition for cooperative executors
    ///
    /// Bus transactions still run to completion; the executor gets control
    /// back during the delay between iterations.
    ///
    /// # Errors
    ///
    /// Same as [`run()`](Self::run).
    #[cfg(feature = "async")]
    pub async fn run_periodic_async<D>(
        &mut self,
        delay: &mut D,
        period_us: u32,
    ) -> Result<Infallible, Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.start()?;
        loop {
            self.step()?;
            delay.delay_us(period_us).await;
        }
    }

    /// Samples published since creation (wrapping)
    pub fn samples_published(&self) -> u32 {
        self.samples_published
    }

    /// Failed reads since the last successful one
    pub fn consecutive_failures(&self) -> u8 {
        self.consecutive_failures
    }

    /// Raw bytes of the most recent burst
    pub fn raw(&self) -> &RawSample {
        &self.raw
    }

    /// Borrow the driver
    pub fn driver(&self) -> &Mpu6050Driver<I> {
        &self.driver
    }

    /// Consume the loop and return driver and sink
    pub fn release(self) -> (Mpu6050Driver<I>, S) {
        (self.driver, self.sink)
    }
}
