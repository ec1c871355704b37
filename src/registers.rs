//! Register definitions for the MPU-6050
//!
//! Only the registers this driver touches are described. The sensor data
//! block (`ACCEL_XOUT_H` .. `GYRO_ZOUT_L`) is read as one raw burst rather
//! than through individual register accessors, see [`SENSOR_DATA_START`].

/// First register of the sensor data block (`ACCEL_XOUT_H`)
pub const SENSOR_DATA_START: u8 = 0x3B;

/// Length of the sensor data block: accel XYZ, temperature, gyro XYZ
pub const SENSOR_DATA_LEN: usize = 14;

device_driver::create_device!(
    device_name: Mpu6050,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// SMPLRT_DIV - Sample Rate Divider (0x19)
        /// Sample rate = gyro output rate / (1 + divider)
        register SmplrtDiv {
            const ADDRESS = 0x19;
            const SIZE_BITS = 8;

            /// Sample rate divider
            smplrt_div: uint = 0..8,
        },

        /// CONFIG - Frame sync and digital low pass filter (0x1A)
        register FilterConfig {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// Digital low pass filter setting (0-6, 7 reserved)
            dlpf_cfg: uint = 0..3,
            /// FSYNC pin sampling location (0 = disabled)
            ext_sync_set: uint = 3..6,
            reserved_7_6: uint = 6..8,
        },

        /// GYRO_CONFIG - Gyroscope configuration (0x1B)
        register GyroConfig {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Full scale select (0=±250, 1=±500, 2=±1000, 3=±2000 dps)
            fs_sel: uint = 3..5,
            /// Z-axis self-test
            zg_st: bool = 5,
            /// Y-axis self-test
            yg_st: bool = 6,
            /// X-axis self-test
            xg_st: bool = 7,
        },

        /// ACCEL_CONFIG - Accelerometer configuration (0x1C)
        register AccelConfig {
            const ADDRESS = 0x1C;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Full scale select (0=±2g, 1=±4g, 2=±8g, 3=±16g)
            afs_sel: uint = 3..5,
            /// Z-axis self-test
            za_st: bool = 5,
            /// Y-axis self-test
            ya_st: bool = 6,
            /// X-axis self-test
            xa_st: bool = 7,
        },

        /// PWR_MGMT_1 - Power Management 1 (0x6B)
        register PwrMgmt1 {
            const ADDRESS = 0x6B;
            const SIZE_BITS = 8;

            /// Clock source select (see `ClockSource`)
            clksel: uint = 0..3,
            /// Temperature sensor disable
            temp_dis: bool = 3,
            reserved_4: uint = 4..5,
            /// Cycle between sleep and single samples
            cycle: bool = 5,
            /// Sleep mode enable (set after power-up)
            sleep: bool = 6,
            /// Device reset
            device_reset: bool = 7,
        },

        /// WHO_AM_I - Device ID Register (0x75)
        /// Expected value: 0x68
        register WhoAmI {
            const ADDRESS = 0x75;
            const SIZE_BITS = 8;

            /// Device ID (should read 0x68)
            who_am_i: uint = 0..8,
        }
    }
);

// Re-export commonly used types for convenience
pub use Mpu6050 as RegisterDevice;
