//! VL53L1X time-of-flight distance sensor
//!
//! Async I2C driver covering the subset of the ST ultra-lite driver the rig
//! needs: boot, default configuration, distance mode and timing budget,
//! start/stop ranging and polled reads. Register indices are 16 bits, sent
//! big-endian ahead of the data.
//!
//! # Usage
//!
//! ```ignore
//! let mut tof = Vl53l1x::new(i2c, DEFAULT_ADDRESS);
//! tof.init(&mut delay).await?;
//! tof.set_distance_mode(DistanceMode::Short).await?;
//! tof.set_timing_budget_ms(50).await?;
//! tof.start_ranging().await?;
//! loop {
//!     if tof.data_ready().await? {
//!         let mm = tof.distance_mm().await?;
//!         tof.clear_interrupt().await?;
//!     }
//! }
//! ```

use arcscan_core::traits::{DistanceMode, RangeReading, SensorError};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Factory 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x29;

/// Value of the model id register
pub const MODEL_ID: u16 = 0xEACC;

mod reg {
    pub const SOFT_RESET: u16 = 0x0000;
    pub const VHV_CONFIG_TIMEOUT_MACROP_LOOP_BOUND: u16 = 0x0008;
    pub const VHV_CONFIG_INIT: u16 = 0x000B;
    pub const CONFIG_BLOCK_START: u16 = 0x002D;
    pub const GPIO_HV_MUX_CTRL: u16 = 0x0030;
    pub const GPIO_TIO_HV_STATUS: u16 = 0x0031;
    pub const PHASECAL_CONFIG_TIMEOUT_MACROP: u16 = 0x004B;
    pub const RANGE_CONFIG_TIMEOUT_MACROP_A_HI: u16 = 0x005E;
    pub const RANGE_CONFIG_VCSEL_PERIOD_A: u16 = 0x0060;
    pub const RANGE_CONFIG_TIMEOUT_MACROP_B_HI: u16 = 0x0061;
    pub const RANGE_CONFIG_VCSEL_PERIOD_B: u16 = 0x0063;
    pub const RANGE_CONFIG_VALID_PHASE_HIGH: u16 = 0x0069;
    pub const SD_CONFIG_WOI_SD0: u16 = 0x0078;
    pub const SD_CONFIG_INITIAL_PHASE_SD0: u16 = 0x007A;
    pub const SYSTEM_INTERRUPT_CLEAR: u16 = 0x0086;
    pub const SYSTEM_MODE_START: u16 = 0x0087;
    pub const RESULT_RANGE_STATUS: u16 = 0x0089;
    pub const RESULT_FINAL_RANGE_MM: u16 = 0x0096;
    pub const FIRMWARE_SYSTEM_STATUS: u16 = 0x00E5;
    pub const IDENTIFICATION_MODEL_ID: u16 = 0x010F;
}

const MODE_START: u8 = 0x40;
const MODE_STOP: u8 = 0x00;

/// Boot status polls before giving up, 2 ms apart
const BOOT_POLLS: u32 = 100;

/// Data ready polls during the calibration cycle, 1 ms apart
const CALIBRATION_POLLS: u32 = 1000;

/// Default configuration for registers 0x2D..=0x87
///
/// Interrupt on new sample, active-high GPIO, 14.2 sigma threshold 90 mm,
/// full 16x16 ROI, ranging stopped.
const DEFAULT_CONFIG: [u8; 91] = [
    0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x02, 0x08, // 0x2D
    0x00, 0x08, 0x10, 0x01, 0x01, 0x00, 0x00, 0x00, // 0x35
    0x00, 0xFF, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x00, // 0x3D
    0x00, 0x20, 0x0B, 0x00, 0x00, 0x02, 0x0A, 0x21, // 0x45
    0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0xC8, // 0x4D
    0x00, 0x00, 0x38, 0xFF, 0x01, 0x00, 0x08, 0x00, // 0x55
    0x00, 0x01, 0xCC, 0x0F, 0x01, 0xF1, 0x0D, 0x01, // 0x5D
    0x68, 0x00, 0x80, 0x08, 0xB8, 0x00, 0x00, 0x00, // 0x65
    0x00, 0x0F, 0x89, 0x00, 0x00, 0x00, 0x00, 0x00, // 0x6D
    0x00, 0x00, 0x01, 0x0F, 0x0D, 0x0E, 0x0E, 0x00, // 0x75
    0x00, 0x02, 0xC7, 0xFF, 0x9B, 0x00, 0x00, 0x00, // 0x7D
    0x01, 0x00, 0x00, // 0x85
];

/// Register values that differ between distance modes
struct ModeSettings {
    phasecal_timeout: u8,
    vcsel_period_a: u8,
    vcsel_period_b: u8,
    valid_phase_high: u8,
    woi_sd0: u16,
    initial_phase_sd0: u16,
}

const SHORT_MODE: ModeSettings = ModeSettings {
    phasecal_timeout: 0x14,
    vcsel_period_a: 0x07,
    vcsel_period_b: 0x05,
    valid_phase_high: 0x38,
    woi_sd0: 0x0705,
    initial_phase_sd0: 0x0606,
};

const LONG_MODE: ModeSettings = ModeSettings {
    phasecal_timeout: 0x0A,
    vcsel_period_a: 0x0F,
    vcsel_period_b: 0x0D,
    valid_phase_high: 0xB8,
    woi_sd0: 0x0F0D,
    initial_phase_sd0: 0x0E0E,
};

/// Timing budgets as (ms, timeout A, timeout B) in short mode
const SHORT_BUDGETS: [(u16, u16, u16); 7] = [
    (15, 0x001D, 0x0027),
    (20, 0x0051, 0x006E),
    (33, 0x00D6, 0x006E),
    (50, 0x01AE, 0x01E8),
    (100, 0x02E1, 0x0388),
    (200, 0x03E1, 0x0496),
    (500, 0x0591, 0x05C1),
];

/// Timing budgets in long mode; 15 ms is short mode only
const LONG_BUDGETS: [(u16, u16, u16); 6] = [
    (20, 0x001E, 0x0022),
    (33, 0x0060, 0x006E),
    (50, 0x00AD, 0x00C6),
    (100, 0x01CC, 0x01EA),
    (200, 0x02D9, 0x02F8),
    (500, 0x048F, 0x04A4),
];

/// VL53L1X driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vl53l1xError<E> {
    /// Underlying bus error
    I2c(E),
    /// Model id register held something other than [`MODEL_ID`]
    WrongModel(u16),
    /// Firmware boot bit never set
    BootTimeout,
    /// No sample arrived during the calibration cycle
    Timeout,
    /// Timing budget not in the table for the current distance mode
    InvalidTimingBudget(u16),
}

impl<E> From<Vl53l1xError<E>> for SensorError {
    fn from(e: Vl53l1xError<E>) -> Self {
        match e {
            Vl53l1xError::I2c(_) => SensorError::Bus,
            Vl53l1xError::WrongModel(_) => SensorError::NotFound,
            Vl53l1xError::BootTimeout => SensorError::BootTimeout,
            Vl53l1xError::Timeout => SensorError::Timeout,
            Vl53l1xError::InvalidTimingBudget(_) => SensorError::Unsupported,
        }
    }
}

/// VL53L1X on an async I2C bus
pub struct Vl53l1x<I2C> {
    i2c: I2C,
    address: u8,
    mode: DistanceMode,
}

impl<I2C: I2c> Vl53l1x<I2C> {
    /// Create a driver for the sensor at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            mode: DistanceMode::Long,
        }
    }

    /// Distance mode last written to the sensor
    pub fn distance_mode(&self) -> DistanceMode {
        self.mode
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Bring the sensor from power-on to a configured, stopped state
    ///
    /// Waits for firmware boot, checks the model id, loads the default
    /// configuration and runs one ranging cycle to calibrate the VHV loop.
    pub async fn init<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Vl53l1xError<I2C::Error>> {
        self.wait_for_boot(delay).await?;

        let id = self.model_id().await.map_err(Vl53l1xError::I2c)?;
        if id != MODEL_ID {
            return Err(Vl53l1xError::WrongModel(id));
        }

        self.write_block(reg::CONFIG_BLOCK_START, &DEFAULT_CONFIG)
            .await
            .map_err(Vl53l1xError::I2c)?;
        self.mode = DistanceMode::Long;

        self.calibrate(delay).await?;

        self.write_u8(reg::VHV_CONFIG_TIMEOUT_MACROP_LOOP_BOUND, 0x09)
            .await
            .map_err(Vl53l1xError::I2c)?;
        self.write_u8(reg::VHV_CONFIG_INIT, 0x00)
            .await
            .map_err(Vl53l1xError::I2c)
    }

    async fn wait_for_boot<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Vl53l1xError<I2C::Error>> {
        for _ in 0..BOOT_POLLS {
            if self.is_booted().await.map_err(Vl53l1xError::I2c)? {
                return Ok(());
            }
            delay.delay_ms(2).await;
        }
        Err(Vl53l1xError::BootTimeout)
    }

    /// One throwaway ranging cycle, leaves ranging stopped
    async fn calibrate<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Vl53l1xError<I2C::Error>> {
        self.start_ranging().await.map_err(Vl53l1xError::I2c)?;

        let mut ready = false;
        for _ in 0..CALIBRATION_POLLS {
            if self.data_ready().await.map_err(Vl53l1xError::I2c)? {
                ready = true;
                break;
            }
            delay.delay_ms(1).await;
        }
        if !ready {
            let _ = self.stop_ranging().await;
            return Err(Vl53l1xError::Timeout);
        }

        self.clear_interrupt().await.map_err(Vl53l1xError::I2c)?;
        self.stop_ranging().await.map_err(Vl53l1xError::I2c)
    }

    /// Check whether the sensor firmware has finished booting
    pub async fn is_booted(&mut self) -> Result<bool, I2C::Error> {
        Ok(self.read_u8(reg::FIRMWARE_SYSTEM_STATUS).await? & 0x01 != 0)
    }

    /// Read the model id register
    pub async fn model_id(&mut self) -> Result<u16, I2C::Error> {
        self.read_u16(reg::IDENTIFICATION_MODEL_ID).await
    }

    /// Pulse the soft reset line
    pub async fn soft_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I2C::Error> {
        self.write_u8(reg::SOFT_RESET, 0x00).await?;
        delay.delay_us(100).await;
        self.write_u8(reg::SOFT_RESET, 0x01).await
    }

    /// Switch between short and long distance mode
    ///
    /// Changing mode invalidates the timing budget, so set the budget again
    /// afterwards.
    pub async fn set_distance_mode(&mut self, mode: DistanceMode) -> Result<(), I2C::Error> {
        let settings = match mode {
            DistanceMode::Short => &SHORT_MODE,
            DistanceMode::Long => &LONG_MODE,
        };
        self.write_u8(reg::PHASECAL_CONFIG_TIMEOUT_MACROP, settings.phasecal_timeout)
            .await?;
        self.write_u8(reg::RANGE_CONFIG_VCSEL_PERIOD_A, settings.vcsel_period_a)
            .await?;
        self.write_u8(reg::RANGE_CONFIG_VCSEL_PERIOD_B, settings.vcsel_period_b)
            .await?;
        self.write_u8(reg::RANGE_CONFIG_VALID_PHASE_HIGH, settings.valid_phase_high)
            .await?;
        self.write_u16(reg::SD_CONFIG_WOI_SD0, settings.woi_sd0).await?;
        self.write_u16(reg::SD_CONFIG_INITIAL_PHASE_SD0, settings.initial_phase_sd0)
            .await?;
        self.mode = mode;
        Ok(())
    }

    /// Set the ranging timing budget
    ///
    /// Supported budgets are 20, 33, 50, 100, 200 and 500 ms, plus 15 ms in
    /// short mode. Anything else is rejected without touching the sensor.
    pub async fn set_timing_budget_ms(
        &mut self,
        budget_ms: u16,
    ) -> Result<(), Vl53l1xError<I2C::Error>> {
        let table: &[(u16, u16, u16)] = match self.mode {
            DistanceMode::Short => &SHORT_BUDGETS,
            DistanceMode::Long => &LONG_BUDGETS,
        };
        let Some(&(_, a, b)) = table.iter().find(|(ms, _, _)| *ms == budget_ms) else {
            return Err(Vl53l1xError::InvalidTimingBudget(budget_ms));
        };
        self.write_u16(reg::RANGE_CONFIG_TIMEOUT_MACROP_A_HI, a)
            .await
            .map_err(Vl53l1xError::I2c)?;
        self.write_u16(reg::RANGE_CONFIG_TIMEOUT_MACROP_B_HI, b)
            .await
            .map_err(Vl53l1xError::I2c)
    }

    /// Start continuous ranging
    pub async fn start_ranging(&mut self) -> Result<(), I2C::Error> {
        self.write_u8(reg::SYSTEM_MODE_START, MODE_START).await
    }

    /// Stop ranging
    pub async fn stop_ranging(&mut self) -> Result<(), I2C::Error> {
        self.write_u8(reg::SYSTEM_MODE_START, MODE_STOP).await
    }

    /// Interrupt level that signals a new sample
    async fn interrupt_polarity(&mut self) -> Result<u8, I2C::Error> {
        let mux = self.read_u8(reg::GPIO_HV_MUX_CTRL).await?;
        Ok(((mux & 0x10) >> 4) ^ 0x01)
    }

    /// Non-blocking check for a new sample
    pub async fn data_ready(&mut self) -> Result<bool, I2C::Error> {
        let polarity = self.interrupt_polarity().await?;
        let status = self.read_u8(reg::GPIO_TIO_HV_STATUS).await?;
        Ok(status & 0x01 == polarity)
    }

    /// Distance of the latest sample in millimetres
    pub async fn distance_mm(&mut self) -> Result<u16, I2C::Error> {
        self.read_u16(reg::RESULT_FINAL_RANGE_MM).await
    }

    /// Raw range status code of the latest sample (0 = valid)
    pub async fn range_status(&mut self) -> Result<u8, I2C::Error> {
        Ok(self.read_u8(reg::RESULT_RANGE_STATUS).await? & 0x1F)
    }

    /// Acknowledge the sample so the next one can be signalled
    pub async fn clear_interrupt(&mut self) -> Result<(), I2C::Error> {
        self.write_u8(reg::SYSTEM_INTERRUPT_CLEAR, 0x01).await
    }

    /// Read the latest distance, mapping a bus failure to the sentinel
    pub async fn reading(&mut self) -> RangeReading {
        RangeReading::from(self.distance_mm().await.map_err(|_| SensorError::Bus))
    }

    async fn write_u8(&mut self, index: u16, value: u8) -> Result<(), I2C::Error> {
        let [hi, lo] = index.to_be_bytes();
        self.i2c.write(self.address, &[hi, lo, value]).await
    }

    async fn write_u16(&mut self, index: u16, value: u16) -> Result<(), I2C::Error> {
        let [hi, lo] = index.to_be_bytes();
        let [vh, vl] = value.to_be_bytes();
        self.i2c.write(self.address, &[hi, lo, vh, vl]).await
    }

    async fn write_block(&mut self, index: u16, data: &[u8; 91]) -> Result<(), I2C::Error> {
        let mut buf = [0u8; 93];
        buf[..2].copy_from_slice(&index.to_be_bytes());
        buf[2..].copy_from_slice(data);
        self.i2c.write(self.address, &buf).await
    }

    async fn read_u8(&mut self, index: u16) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &index.to_be_bytes(), &mut buf)
            .await?;
        Ok(buf[0])
    }

    async fn read_u16(&mut self, index: u16) -> Result<u16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &index.to_be_bytes(), &mut buf)
            .await?;
        Ok(u16::from_be_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, Operation};
    use std::vec::Vec;

    /// Register-file model of the sensor
    struct MockSensor {
        regs: [u8; 0x200],
        /// Reads of the boot register before it reports booted
        boot_delay: u32,
        writes: Vec<(u16, Vec<u8>)>,
        last_address: u8,
        fail: bool,
    }

    impl MockSensor {
        fn new() -> Self {
            let mut regs = [0u8; 0x200];
            regs[0x010F] = 0xEA;
            regs[0x0110] = 0xCC;
            regs[0x00E5] = 0x01;
            Self {
                regs,
                boot_delay: 0,
                writes: Vec::new(),
                last_address: 0,
                fail: false,
            }
        }

        fn wrote(&self, index: u16, value: u8) -> bool {
            self.writes
                .iter()
                .any(|(i, data)| *i == index && data.as_slice() == [value])
        }

        fn reg_u16(&self, index: u16) -> u16 {
            u16::from_be_bytes([self.regs[index as usize], self.regs[index as usize + 1]])
        }

        fn on_write(&mut self, index: u16, data: &[u8]) {
            for (offset, byte) in data.iter().enumerate() {
                self.regs[index as usize + offset] = *byte;
            }
            // A started sensor produces a sample, clearing the interrupt consumes it
            if index == 0x0087 && data == [0x40] {
                self.regs[0x0031] |= 0x01;
            }
            if index == 0x0086 && data == [0x01] {
                self.regs[0x0031] &= !0x01;
            }
            self.writes.push((index, data.to_vec()));
        }

        fn on_read(&mut self, index: u16, buf: &mut [u8]) {
            if index == 0x00E5 && self.boot_delay > 0 {
                self.boot_delay -= 1;
                buf[0] = 0;
                return;
            }
            for (offset, byte) in buf.iter_mut().enumerate() {
                *byte = self.regs[index as usize + offset];
            }
        }
    }

    impl ErrorType for MockSensor {
        type Error = ErrorKind;
    }

    impl I2c for MockSensor {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Bus);
            }
            self.last_address = address;
            let mut index = 0u16;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        index = u16::from_be_bytes([bytes[0], bytes[1]]);
                        if bytes.len() > 2 {
                            self.on_write(index, &bytes[2..]);
                        }
                    }
                    Operation::Read(buf) => self.on_read(index, buf),
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_us: u64,
    }

    impl DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_us += ns as u64 / 1000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_us += ms as u64 * 1000;
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        let mut delay = CountingDelay::default();
        block_on(tof.init(&mut delay)).unwrap();

        let mock = tof.release();
        assert_eq!(mock.last_address, 0x29);

        // Config block lands in one write at 0x2D
        let (index, block) = &mock.writes[0];
        assert_eq!(*index, 0x002D);
        assert_eq!(block.len(), 91);
        assert_eq!(block[0x46 - 0x2D], 0x20);

        // Calibration cycle then VHV setup
        let tail: Vec<(u16, Vec<u8>)> = mock.writes[1..].to_vec();
        assert_eq!(
            tail,
            [
                (0x0087, [0x40].to_vec()),
                (0x0086, [0x01].to_vec()),
                (0x0087, [0x00].to_vec()),
                (0x0008, [0x09].to_vec()),
                (0x000B, [0x00].to_vec()),
            ]
        );
    }

    #[test]
    fn test_init_waits_for_boot() {
        let mut mock = MockSensor::new();
        mock.boot_delay = 3;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        let mut delay = CountingDelay::default();
        block_on(tof.init(&mut delay)).unwrap();
        assert_eq!(delay.total_us, 3 * 2000);
    }

    #[test]
    fn test_init_boot_timeout() {
        let mut mock = MockSensor::new();
        mock.boot_delay = u32::MAX;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        let mut delay = CountingDelay::default();
        assert_eq!(
            block_on(tof.init(&mut delay)),
            Err(Vl53l1xError::BootTimeout)
        );
    }

    #[test]
    fn test_init_rejects_wrong_model() {
        let mut mock = MockSensor::new();
        mock.regs[0x0110] = 0xCD;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        let mut delay = CountingDelay::default();
        let err = block_on(tof.init(&mut delay)).unwrap_err();
        assert_eq!(err, Vl53l1xError::WrongModel(0xEACD));
        assert_eq!(SensorError::from(err), SensorError::NotFound);
    }

    #[test]
    fn test_init_bus_error() {
        let mut mock = MockSensor::new();
        mock.fail = true;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        let mut delay = CountingDelay::default();
        let err = block_on(tof.init(&mut delay)).unwrap_err();
        assert_eq!(err, Vl53l1xError::I2c(ErrorKind::Bus));
        assert_eq!(SensorError::from(err), SensorError::Bus);
    }

    #[test]
    fn test_data_ready_honours_polarity() {
        let mut mock = MockSensor::new();
        // Active-high: bit 4 of GPIO_HV_MUX clear
        mock.regs[0x0030] = 0x01;
        mock.regs[0x0031] = 0x01;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        assert!(block_on(tof.data_ready()).unwrap());

        // Active-low: bit 4 set, ready when the line reads 0
        let mut mock = tof.release();
        mock.regs[0x0030] = 0x11;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        assert!(!block_on(tof.data_ready()).unwrap());
        let mut mock = tof.release();
        mock.regs[0x0031] = 0x00;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        assert!(block_on(tof.data_ready()).unwrap());
    }

    #[test]
    fn test_distance_and_status() {
        let mut mock = MockSensor::new();
        mock.regs[0x0096] = 0x02;
        mock.regs[0x0097] = 0xDE;
        mock.regs[0x0089] = 0xE9;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        assert_eq!(block_on(tof.distance_mm()).unwrap(), 734);
        assert_eq!(block_on(tof.range_status()).unwrap(), 0x09);
        assert_eq!(block_on(tof.reading()), RangeReading::Distance(734));
    }

    #[test]
    fn test_failed_reading_is_sentinel() {
        let mut mock = MockSensor::new();
        mock.fail = true;
        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        assert_eq!(block_on(tof.reading()), RangeReading::Failed);
    }

    #[test]
    fn test_ranging_control() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        block_on(tof.start_ranging()).unwrap();
        block_on(tof.clear_interrupt()).unwrap();
        block_on(tof.stop_ranging()).unwrap();
        let mock = tof.release();
        assert!(mock.wrote(0x0087, 0x40));
        assert!(mock.wrote(0x0086, 0x01));
        assert!(mock.wrote(0x0087, 0x00));
    }

    #[test]
    fn test_soft_reset() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        let mut delay = CountingDelay::default();
        block_on(tof.soft_reset(&mut delay)).unwrap();
        let mock = tof.release();
        assert_eq!(
            mock.writes,
            [(0x0000, [0x00].to_vec()), (0x0000, [0x01].to_vec())]
        );
        assert_eq!(delay.total_us, 100);
    }

    #[test]
    fn test_default_config_is_long_mode() {
        // The config block already holds the long mode settings
        let at = |index: u16| DEFAULT_CONFIG[(index - 0x002D) as usize];
        assert_eq!(at(0x004B), LONG_MODE.phasecal_timeout);
        assert_eq!(at(0x0060), LONG_MODE.vcsel_period_a);
        assert_eq!(at(0x0063), LONG_MODE.vcsel_period_b);
        assert_eq!(at(0x0069), LONG_MODE.valid_phase_high);

        let tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        assert_eq!(tof.distance_mode(), DistanceMode::Long);
    }

    #[test]
    fn test_short_distance_mode() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        block_on(tof.set_distance_mode(DistanceMode::Short)).unwrap();
        assert_eq!(tof.distance_mode(), DistanceMode::Short);

        let mock = tof.release();
        assert_eq!(mock.regs[0x004B], 0x14);
        assert_eq!(mock.regs[0x0060], 0x07);
        assert_eq!(mock.regs[0x0063], 0x05);
        assert_eq!(mock.regs[0x0069], 0x38);
        assert_eq!(mock.reg_u16(0x0078), 0x0705);
        assert_eq!(mock.reg_u16(0x007A), 0x0606);
    }

    #[test]
    fn test_back_to_long_mode() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        block_on(tof.set_distance_mode(DistanceMode::Short)).unwrap();
        block_on(tof.set_distance_mode(DistanceMode::Long)).unwrap();

        let mock = tof.release();
        assert_eq!(mock.regs[0x004B], 0x0A);
        assert_eq!(mock.regs[0x0069], 0xB8);
        assert_eq!(mock.reg_u16(0x0078), 0x0F0D);
        assert_eq!(mock.reg_u16(0x007A), 0x0E0E);
    }

    #[test]
    fn test_timing_budget_follows_mode() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        block_on(tof.set_timing_budget_ms(50)).unwrap();
        let mock = tof.release();
        assert_eq!(mock.reg_u16(0x005E), 0x00AD);
        assert_eq!(mock.reg_u16(0x0061), 0x00C6);

        let mut tof = Vl53l1x::new(mock, DEFAULT_ADDRESS);
        block_on(tof.set_distance_mode(DistanceMode::Short)).unwrap();
        block_on(tof.set_timing_budget_ms(50)).unwrap();
        let mock = tof.release();
        assert_eq!(mock.reg_u16(0x005E), 0x01AE);
        assert_eq!(mock.reg_u16(0x0061), 0x01E8);
    }

    #[test]
    fn test_unsupported_timing_budget() {
        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        // 15 ms only exists in short mode
        let err = block_on(tof.set_timing_budget_ms(15)).unwrap_err();
        assert_eq!(err, Vl53l1xError::InvalidTimingBudget(15));
        assert_eq!(SensorError::from(err), SensorError::Unsupported);
        assert_eq!(
            block_on(tof.set_timing_budget_ms(42)),
            Err(Vl53l1xError::InvalidTimingBudget(42))
        );
        assert!(tof.release().writes.is_empty());

        let mut tof = Vl53l1x::new(MockSensor::new(), DEFAULT_ADDRESS);
        block_on(tof.set_distance_mode(DistanceMode::Short)).unwrap();
        block_on(tof.set_timing_budget_ms(15)).unwrap();
    }
}
