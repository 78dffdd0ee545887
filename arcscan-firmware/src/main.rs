//! ArcScan - Servo/TOF Arc Scanner Firmware
//!
//! Main firmware binary for RP2040-based inspection rigs. A hobby servo
//! sweeps a VL53L1X time-of-flight sensor across an arc while a 28BYJ-48
//! stepper turns the assembly one slice at a time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, UART0};
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use arcscan_core::config::{ScanMode, TofConfig};
use arcscan_core::console::ConsoleLine;
use arcscan_core::traits::{SensorError, ServoDriver};
use arcscan_drivers::sensor::Vl53l1x;
use arcscan_drivers::servo::PwmServo;
use arcscan_drivers::stepper::HalfStepMotor;
use arcscan_hal_rp2040::{channel_b, coil_bank, servo_pwm_config};

use crate::board::{RigSensor, RigServo, RigStepper};
use crate::console::emit;
use crate::tasks::halt;

mod board;
mod channels;
mod config;
mod console;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ArcScan firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();
    info!(
        "Mode: {:?}, profile: {:?}, arc {}..{}",
        config.scan.mode, config.sweep.kind, config.servo.min_angle, config.servo.max_angle
    );
    let mismatches = board::check_wiring(&config);
    if mismatches > 0 {
        warn!("{} configured pins differ from the board pin map", mismatches);
    }

    // Serial console on UART0
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.console.baud;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, _rx) = uart.split();
    spawner.spawn(tasks::console_tx_task(tx)).unwrap();
    info!("Console UART initialized at {} baud", config.console.baud);

    // Give the host terminal time to attach
    Timer::after_secs(1).await;
    emit(ConsoleLine::ControllerStarting).await;

    // TOF sensor on I2C1
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.tof.frequency_hz;
    let bus = I2c::new_async(p.I2C1, p.PIN_15, p.PIN_14, Irqs, i2c_config);
    let sensor = match start_sensor(Vl53l1x::new(bus, config.tof.address), &config.tof).await {
        Ok(sensor) => sensor,
        Err(e) => {
            error!("TOF sensor unavailable: {:?}", e);
            halt().await
        }
    };

    // Servo on PWM slice 0 channel B
    let pwm = Pwm::new_output_b(
        p.PWM_SLICE0,
        p.PIN_17,
        servo_pwm_config(clk_sys_freq(), config.servo.period_us),
    );
    let Some(output) = channel_b(pwm) else {
        error!("Servo PWM channel unavailable");
        halt().await
    };
    let mut servo: RigServo = PwmServo::new(output, &config.servo);
    if let Err(e) = servo.write_angle(config.servo.min_angle) {
        warn!("Servo home failed: {:?}", e);
    }
    Timer::after_secs(1).await;

    emit(ConsoleLine::ControllerReady).await;
    emit(ConsoleLine::Wiring {
        sda: board::TOF_SDA_PIN,
        scl: board::TOF_SCL_PIN,
        servo: board::SERVO_PIN,
    })
    .await;
    emit(ConsoleLine::SweepPattern {
        min: config.servo.min_angle,
        max: config.servo.max_angle,
        hold_ms: config.sweep.timing.far_hold_ms,
        countdown_secs: config.sweep.timing.countdown_secs,
    })
    .await;

    // Turntable stepper on GPIO 10-13
    let coils = match coil_bank([
        p.PIN_10.into(),
        p.PIN_11.into(),
        p.PIN_12.into(),
        p.PIN_13.into(),
    ]) {
        Ok(coils) => coils,
        Err(e) => {
            error!("Stepper coil setup failed: {:?}", e);
            halt().await
        }
    };
    let stepper: RigStepper = HalfStepMotor::new(
        coils,
        config.stepper.steps_per_degree(),
        config.stepper.step_delay_ms,
    );
    info!(
        "Stepper: {} steps/degree, {} ms/step",
        config.stepper.steps_per_degree(),
        config.stepper.step_delay_ms
    );

    match config.scan.mode {
        ScanMode::Bench => {
            spawner
                .spawn(tasks::sweep_task(servo, sensor, config))
                .unwrap();
            spawner
                .spawn(tasks::turntable_task(stepper, config))
                .unwrap();
        }
        ScanMode::Coordinated => {
            spawner
                .spawn(tasks::scanner_task(servo, sensor, stepper, config))
                .unwrap();
        }
    }

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    let mut reported_drops = 0;
    loop {
        Timer::after_secs(10).await;
        trace!("Main loop heartbeat");

        if let Some(progress) = channels::SCAN_PROGRESS.try_take() {
            debug!(
                "Scan {}%: cycle {}/{}, {} points",
                progress.percent(),
                progress.current_cycle,
                progress.total_cycles,
                progress.points_collected
            );
        }

        let dropped = console::dropped_lines();
        if dropped != reported_drops {
            warn!("Console dropped {} lines", dropped - reported_drops);
            reported_drops = dropped;
        }
    }
}

/// Initialize the sensor and start continuous ranging
///
/// Prints the matching console error before returning a failure.
async fn start_sensor(mut sensor: RigSensor, tof: &TofConfig) -> Result<RigSensor, SensorError> {
    if let Err(e) = sensor.init(&mut Delay).await {
        emit(ConsoleLine::SensorNotFound).await;
        return Err(e.into());
    }
    emit(ConsoleLine::SensorReady).await;

    // Tuning failures leave the power-on settings in place
    if tof.distance_mode != sensor.distance_mode() {
        match sensor.set_distance_mode(tof.distance_mode).await {
            Ok(()) => info!("TOF distance mode {:?}", tof.distance_mode),
            Err(_) => warn!("TOF distance mode change failed"),
        }
    }
    if let Some(ms) = tof.timing_budget_ms {
        match sensor.set_timing_budget_ms(ms).await {
            Ok(()) => info!("TOF timing budget {} ms", ms),
            Err(e) => warn!("TOF timing budget rejected: {:?}", SensorError::from(e)),
        }
    }

    if sensor.start_ranging().await.is_err() {
        emit(ConsoleLine::RangingFailed).await;
        return Err(SensorError::StartFailed);
    }
    emit(ConsoleLine::RangingStarted).await;

    Ok(sensor)
}
