//! Unit tests for configuration types

use crate::common::test_utils::assert_float_eq;
use mpu6050_usci::{
    AccelFullScale, BusConfig, ClockSource, Dlpf, GyroFullScale, SensorConfig, SequencerConfig,
};

#[test]
fn test_plotter_register_values() {
    let config = SensorConfig::default();

    assert_eq!(config, SensorConfig::plotter());
    assert_eq!(
        config.register_values(),
        [
            (0x6B, 0x02),
            (0x19, 0x04),
            (0x1A, 0x03),
            (0x1B, 0x08),
            (0x1C, 0x08),
        ]
    );
}

#[test]
fn test_plotter_sample_rate() {
    // 1 kHz gyro output with the DLPF on, divided by 1 + 4
    assert_float_eq(SensorConfig::plotter().sample_rate_hz(), 200.0, 0.001);
}

#[test]
fn test_unfiltered_sample_rate() {
    let config = SensorConfig {
        dlpf: Dlpf::Hz260,
        sample_rate_div: 7,
        ..SensorConfig::plotter()
    };
    assert_float_eq(config.sample_rate_hz(), 1000.0, 0.001);
}

#[test]
fn test_full_scale_register_fields() {
    for (scale, bits) in [
        (GyroFullScale::Dps250, 0x00),
        (GyroFullScale::Dps500, 0x08),
        (GyroFullScale::Dps1000, 0x10),
        (GyroFullScale::Dps2000, 0x18),
    ] {
        let config = SensorConfig {
            gyro_full_scale: scale,
            ..SensorConfig::plotter()
        };
        assert_eq!(config.register_values()[3], (0x1B, bits));
    }

    for (scale, bits) in [
        (AccelFullScale::G2, 0x00),
        (AccelFullScale::G4, 0x08),
        (AccelFullScale::G8, 0x10),
        (AccelFullScale::G16, 0x18),
    ] {
        let config = SensorConfig {
            accel_full_scale: scale,
            ..SensorConfig::plotter()
        };
        assert_eq!(config.register_values()[4], (0x1C, bits));
    }
}

#[test]
fn test_clock_source_round_trip() {
    for source in [
        ClockSource::Internal8MHz,
        ClockSource::PllGyroX,
        ClockSource::PllGyroY,
        ClockSource::PllGyroZ,
        ClockSource::PllExternal32kHz,
        ClockSource::PllExternal19MHz,
        ClockSource::Stop,
    ] {
        assert_eq!(ClockSource::from_clksel(source.clksel()), Some(source));
    }
    assert_eq!(ClockSource::from_clksel(6), None);
    assert!(!ClockSource::Stop.is_running());
}

#[test]
fn test_bus_prescaler() {
    let config = BusConfig::default();
    assert_eq!(config.prescaler(), 40);
    assert_eq!(config.effective_frequency_hz(), 400_000);

    // Rounds the divider up so the bus never runs faster than requested
    let config = BusConfig {
        source_clock_hz: 1_000_000,
        bus_frequency_hz: 300_000,
    };
    assert_eq!(config.prescaler(), 4);
    assert!(config.effective_frequency_hz() <= 300_000);
}

#[test]
fn test_bus_prescaler_never_zero() {
    let config = BusConfig {
        source_clock_hz: 100_000,
        bus_frequency_hz: 400_000,
    };
    assert_eq!(config.prescaler(), 1);
}

#[test]
fn test_sequencer_budget() {
    let config = SequencerConfig {
        poll_interval_ns: 500,
        max_polls: 100,
        ..SequencerConfig::default()
    };
    assert_eq!(config.wait_budget_us(), 50);
}
