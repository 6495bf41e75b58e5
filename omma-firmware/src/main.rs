//! Omma - Animated Eyes Display Firmware
//!
//! Main firmware binary for RP2040-based eye display modules. Receives
//! animation and sound requests from a host over UART, renders blink
//! sequences to an SSD1306 OLED, and reports touch input back.
//!
//! Named after the Greek "omma" (ὄμμα) meaning "eye".

#![no_std]
#![no_main]

mod channels;
mod ssd1306;
mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, UART0};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::ssd1306::Ssd1306;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Omma firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup I2C for the OLED (GPIO14=SDA, GPIO15=SCL)
    let i2c = I2c::new_async(p.I2C1, p.PIN_15, p.PIN_14, Irqs, i2c::Config::default());

    // Initialize the OLED display
    let mut display = Ssd1306::new(i2c);
    match display.init().await {
        Ok(()) => {
            info!("OLED initialized");
            display.clear();
            display.flush().await.ok();
        }
        Err(e) => error!("Failed to initialize display: {:?}", e),
    }

    // Setup UART for the host link
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host link");

    // Buzzer PWM on GPIO6 (PWM slice 3, output A)
    let buzzer = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, PwmConfig::default());

    // Touch pad input on GPIO16
    let touch = Input::new(p.PIN_16, Pull::Up);

    // Spawn tasks
    spawner.spawn(tasks::host_rx_task(rx)).unwrap();
    spawner.spawn(tasks::host_tx_task(tx)).unwrap();
    spawner.spawn(tasks::animation_task(display)).unwrap();
    spawner.spawn(tasks::sound_task(buzzer)).unwrap();
    spawner.spawn(tasks::touch_task(touch)).unwrap();

    info!("All tasks spawned, firmware running");
}
