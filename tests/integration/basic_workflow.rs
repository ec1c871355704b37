//! Integration tests for the complete acquisition workflow
//!
//! Everything below the register interface is real: the sequencer drives the
//! simulated USCI peripheral and waits on the status word that the interrupt
//! handlers fill.

use crate::common::{BusOp, create_sim_driver, sample_bytes};
use mpu6050_usci::{
    Acquisition, BusError, Error, I2C_ADDRESS_AD0_LOW, Phase, RestartPolicy, Role, SampleSlot,
    SensorConfig,
};

fn start(role: Role) -> BusOp {
    BusOp::Start {
        address: I2C_ADDRESS_AD0_LOW,
        role,
    }
}

/// Wire trace of the plotter initialization
fn init_trace() -> Vec<BusOp> {
    let mut trace = Vec::new();
    for (register, value) in SensorConfig::plotter().register_values() {
        trace.extend([
            start(Role::Transmitter),
            BusOp::Write(register),
            BusOp::Write(value),
            BusOp::Stop,
        ]);
    }
    trace
}

#[test]
fn test_initialization_bus_trace() {
    let (mut driver, bus) = create_sim_driver();
    bus.clear_log();

    driver.init().expect("init should succeed");

    assert_eq!(bus.log(), init_trace());
    assert!(bus.status().snapshot().is_empty());
}

#[test]
fn test_steady_state_iteration() {
    let (driver, bus) = create_sim_driver();
    let slot = SampleSlot::new();
    let mut acquisition = Acquisition::new(driver, &slot, RestartPolicy::default());
    acquisition.start().unwrap();
    bus.clear_log();

    let bytes = sample_bytes([-4096, 512, 8192], -3920, [131, -131, 0]);
    bus.queue_read_bytes(&bytes);

    let sample = acquisition
        .step()
        .unwrap()
        .expect("iteration should produce a sample");

    assert_eq!(sample.accel_x, -4096);
    assert_eq!(sample.accel_y, 512);
    assert_eq!(sample.accel_z, 8192);
    assert_eq!(sample.temperature, -3920);
    assert_eq!(sample.gyro_x, 131);
    assert_eq!(sample.gyro_y, -131);
    assert_eq!(sample.gyro_z, 0);
    assert_eq!(slot.latest(), Some(sample));
    assert_eq!(acquisition.raw().0, bytes);

    let log = bus.log();
    assert_eq!(
        log[..3],
        [
            start(Role::Transmitter),
            BusOp::Write(0x3B),
            start(Role::Receiver)
        ]
    );
    assert_eq!(bus.bytes_read(), bytes.to_vec());
    assert_eq!(log.last(), Some(&BusOp::Stop));
}

#[test]
fn test_slot_holds_newest_sample_only() {
    let (driver, bus) = create_sim_driver();
    let slot = SampleSlot::new();
    let mut acquisition = Acquisition::new(driver, &slot, RestartPolicy::default());
    acquisition.start().unwrap();

    for accel_x in [1, 2, 3] {
        bus.queue_read_bytes(&sample_bytes([accel_x, 0, 0], 0, [0; 3]));
        acquisition.step().unwrap();
    }

    assert_eq!(slot.latest().map(|s| s.accel_x), Some(3));
    assert_eq!(acquisition.samples_published(), 3);
}

#[test]
fn test_arbitration_lost_during_initialization_aborts() {
    let trace = init_trace();
    let write_count = trace
        .iter()
        .filter(|op| matches!(op, BusOp::Write(_)))
        .count();

    for failing_write in 0..write_count {
        let (driver, bus) = create_sim_driver();
        bus.lose_arbitration_at_write(failing_write);
        bus.clear_log();
        bus.queue_read_bytes(&[0u8; 14]);
        let slot = SampleSlot::new();
        let mut acquisition = Acquisition::new(driver, &slot, RestartPolicy::default());

        let result = acquisition.run();

        assert_eq!(
            result.unwrap_err(),
            Error::Bus(BusError::ArbitrationLost),
            "write {failing_write}"
        );

        // The trace stops right after the byte that lost arbitration
        let mut writes_seen = 0;
        let expected: Vec<BusOp> = trace
            .iter()
            .copied()
            .take_while(|op| {
                if writes_seen > failing_write {
                    return false;
                }
                if matches!(op, BusOp::Write(_)) {
                    writes_seen += 1;
                }
                true
            })
            .collect();
        assert_eq!(bus.log(), expected, "write {failing_write}");
        assert_eq!(bus.start_count(Role::Receiver), 0);
        assert!(bus.bytes_read().is_empty());
        assert_eq!(slot.latest(), None);
    }
}

#[test]
fn test_receiver_nack_recovered_in_steady_state() {
    let (driver, bus) = create_sim_driver();
    let mut acquisition = Acquisition::new(driver, SampleSlot::new(), RestartPolicy::default());
    acquisition.start().unwrap();
    bus.clear_log();

    let bytes = sample_bytes([7, 8, 9], 10, [11, 12, 13]);
    bus.queue_read_bytes(&bytes);
    bus.nack_receive_starts(1);

    let sample = acquisition.step().unwrap().expect("NACK should be recovered");

    assert_eq!(sample.accel_z, 9);
    assert_eq!(sample.gyro_z, 13);
    assert_eq!(bus.start_count(Role::Receiver), 2);
    assert_eq!(bus.bytes_read().len(), 14);
    assert_eq!(acquisition.consecutive_failures(), 0);
}

#[test]
fn test_truncated_burst_retried_on_next_iteration() {
    let (driver, bus) = create_sim_driver();
    let slot = SampleSlot::new();
    let mut acquisition = Acquisition::new(driver, &slot, RestartPolicy::default());
    acquisition.start().unwrap();

    bus.queue_read_bytes(&[0x11; 6]);
    assert_eq!(acquisition.step(), Ok(None));
    assert_eq!(acquisition.consecutive_failures(), 1);
    assert_eq!(slot.latest(), None);

    bus.queue_read_bytes(&sample_bytes([42, 0, 0], 0, [0; 3]));
    let sample = acquisition.step().unwrap().expect("retry should succeed");

    assert_eq!(sample.accel_x, 42);
    assert_eq!(acquisition.consecutive_failures(), 0);
}

#[test]
fn test_initialization_timeout_is_fatal() {
    let (driver, bus) = create_sim_driver();
    let mut acquisition = Acquisition::new(driver, SampleSlot::new(), RestartPolicy::default());
    acquisition.start().unwrap();
    bus.set_silent(true);
    bus.clear_log();

    let result = acquisition.run_periodic(&mut crate::common::test_utils::MockDelay::default(), 1);

    // run_periodic configures the sensor first; that is where it stalls
    assert_eq!(
        result.unwrap_err(),
        Error::Bus(BusError::Timeout(Phase::StartIssued))
    );
    assert_eq!(
        bus.log(),
        vec![start(Role::Transmitter), BusOp::Stop],
        "initialization is never retried"
    );
}

#[test]
fn test_read_timeouts_exhaust_restart_policy() {
    let (driver, bus) = create_sim_driver();
    let policy = RestartPolicy::default();
    let mut acquisition = Acquisition::new(driver, SampleSlot::new(), policy);
    acquisition.start().unwrap();
    bus.set_silent(true);

    for _ in 0..policy.max_consecutive_failures {
        assert_eq!(acquisition.step(), Ok(None));
    }
    assert_eq!(
        acquisition.step(),
        Err(Error::Bus(BusError::Timeout(Phase::StartIssued)))
    );
    assert_eq!(
        bus.start_count(Role::Transmitter),
        5 + usize::from(policy.max_consecutive_failures) + 1
    );
    assert_eq!(bus.start_count(Role::Receiver), 0);
}

#[test]
fn test_early_transmit_ready_end_to_end() {
    let (driver, bus) = create_sim_driver();
    bus.set_immediate_transmit_ready(true);
    let mut acquisition = Acquisition::new(driver, SampleSlot::new(), RestartPolicy::default());

    acquisition.start().expect("init should succeed");
    bus.queue_read_bytes(&sample_bytes([1, 1, 1], 1, [1, 1, 1]));
    let sample = acquisition.step().unwrap().unwrap();

    assert_eq!(sample.gyro_y, 1);
}

#[test]
fn test_who_am_i_over_the_bus() {
    let (mut driver, bus) = create_sim_driver();
    bus.queue_read_bytes(&[0x68]);

    driver.verify_identity().expect("identity should match");

    bus.queue_read_bytes(&[0x98]);
    assert_eq!(driver.verify_identity(), Err(Error::InvalidDevice(0x98)));
}
