//! Driver tests against the mock register interface

use crate::common::mock_interface::MockError;
use crate::common::{Operation, create_mock_driver, sample_bytes};
use mpu6050_usci::{
    AccelFullScale, ClockSource, Dlpf, Error, GyroFullScale, RawSample, SensorConfig,
};

#[test]
fn test_new_does_no_bus_traffic() {
    let (_driver, interface) = create_mock_driver();

    assert!(interface.operations().is_empty());
}

#[test]
fn test_init_writes_plotter_configuration_in_order() {
    let (mut driver, interface) = create_mock_driver();

    driver.init().expect("init should succeed");

    assert_eq!(
        interface.writes(),
        vec![
            (0x6B, 0x02),
            (0x19, 0x04),
            (0x1A, 0x03),
            (0x1B, 0x08),
            (0x1C, 0x08),
        ]
    );
    assert_eq!(*driver.config(), SensorConfig::plotter());
}

#[test]
fn test_init_clears_sleep() {
    let (mut driver, interface) = create_mock_driver();
    assert_eq!(interface.get_register(0x6B) & 0x40, 0x40);

    driver.init().unwrap();

    assert_eq!(interface.get_register(0x6B) & 0x40, 0x00);
}

#[test]
fn test_configure_matches_register_values() {
    let (mut driver, interface) = create_mock_driver();
    let config = SensorConfig {
        clock_source: ClockSource::PllGyroX,
        sample_rate_div: 9,
        dlpf: Dlpf::Hz10,
        gyro_full_scale: GyroFullScale::Dps2000,
        accel_full_scale: AccelFullScale::G16,
    };

    driver.configure(&config).unwrap();

    assert_eq!(interface.writes(), config.register_values().to_vec());
    assert_eq!(*driver.config(), config);
}

#[test]
fn test_configure_aborts_on_first_failure() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_write_to(0x1A);

    let result = driver.init();

    assert_eq!(result, Err(Error::Bus(MockError::Communication)));
    // Registers before the failure keep their new values, nothing after is written
    assert_eq!(interface.writes(), vec![(0x6B, 0x02), (0x19, 0x04)]);
}

#[test]
fn test_failed_configure_keeps_previous_config() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_write();

    let config = SensorConfig {
        sample_rate_div: 0,
        ..SensorConfig::plotter()
    };
    assert!(driver.configure(&config).is_err());
    assert_eq!(*driver.config(), SensorConfig::plotter());
}

#[test]
fn test_verify_identity() {
    let (mut driver, interface) = create_mock_driver();

    assert_eq!(driver.read_who_am_i(), Ok(0x68));
    assert!(driver.verify_identity().is_ok());

    interface.set_who_am_i(0x72);
    assert_eq!(driver.verify_identity(), Err(Error::InvalidDevice(0x72)));
}

#[test]
fn test_read_raw_is_one_burst_from_accel_xout_h() {
    let (mut driver, interface) = create_mock_driver();
    let bytes: [u8; 14] = core::array::from_fn(|i| i as u8 * 3);
    interface.set_sample_bytes(bytes);

    let mut raw = RawSample::default();
    driver.read_raw(&mut raw).unwrap();

    assert_eq!(raw.0, bytes);
    let addresses: Vec<u8> = interface
        .operations()
        .iter()
        .map(|op| match op {
            Operation::ReadRegister { address, .. } | Operation::WriteRegister { address, .. } => {
                *address
            }
        })
        .collect();
    assert_eq!(addresses, (0x3B..=0x48).collect::<Vec<u8>>());
}

#[test]
fn test_read_sample_decodes_every_field() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_sample_bytes(sample_bytes([1000, -2000, 8192], -521, [131, -65, 32767]));

    let sample = driver.read_sample().unwrap();

    assert_eq!(sample.accel_x, 1000);
    assert_eq!(sample.accel_y, -2000);
    assert_eq!(sample.accel_z, 8192);
    assert_eq!(sample.temperature, -521);
    assert_eq!(sample.gyro_x, 131);
    assert_eq!(sample.gyro_y, -65);
    assert_eq!(sample.gyro_z, 32767);
}

#[test]
fn test_read_failure_is_reported() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_read();

    assert_eq!(
        driver.read_sample(),
        Err(Error::Bus(MockError::Communication))
    );
    assert!(driver.read_sample().is_ok());
}

#[test]
fn test_release_returns_interface() {
    let (mut driver, interface) = create_mock_driver();
    driver.init().unwrap();
    interface.clear_operations();

    let released = driver.release();
    drop(released);

    assert!(interface.operations().is_empty());
}
