//! Fault recorder demo - Main Entry Point
//!
//! Hardware-only entry point for the STM32H743ZI Nucleo board. Prints the
//! record left by the previous fault over RTT and USART3 (the ST-LINK virtual
//! COM port), clears it, and with `fault-demo` provokes a new fault.

#![no_std]
#![no_main]

use core::fmt::Write as _;

use embassy_executor::Spawner;
use embassy_stm32::dma::NoDma;
use embassy_stm32::usart::{Config as UartConfig, UartTx};
use embassy_time::{Duration, Timer};

use firmware::fault::{clear_last_fault, enable_fault_handlers, print_last_fault};
use firmware::{defmt_sink, IoWriter, RECORDER_VERSION};

// Logging transport
use defmt_rtt as _;
// Panic handler
use panic_probe as _;

/// Time the demo runs before faulting, long enough to attach a terminal.
#[cfg(feature = "fault-demo")]
const FAULT_DELAY: Duration = Duration::from_secs(5);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    defmt::info!("Fault recorder demo v{=str}", RECORDER_VERSION);

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // Route faults to their own vectors (all handled by the recorder).
    if let Some(mut core) = cortex_m::Peripherals::take() {
        enable_fault_handlers(&mut core.SCB);
    }

    // Step 1: report the previous fault over RTT.
    let mut rtt = defmt_sink();
    match print_last_fault(&mut rtt) {
        Ok(outcome) => {
            rtt.finish();
            defmt::info!("previous fault: {}", outcome);
        }
        Err(_) => defmt::error!("RTT report failed"),
    }

    // Step 2: and over USART3 (PD8, 115200 8N1).
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;
    match UartTx::new(p.USART3, p.PD8, NoDma, uart_config) {
        Ok(tx) => {
            let mut uart = IoWriter::new(tx).crlf();
            if print_last_fault(&mut uart).and_then(|_| uart.write_str("\n")).is_err() {
                defmt::warn!("UART report failed");
            }
        }
        Err(_) => defmt::error!("USART3 init failed"),
    }

    // Step 3: the record has been reported, erase it.
    clear_last_fault();

    #[cfg(feature = "fault-demo")]
    provoke_fault().await;

    // Main loop - heartbeat
    defmt::info!("Entering main loop");
    let mut counter = 0u32;

    loop {
        Timer::after(Duration::from_secs(1)).await;
        counter = counter.wrapping_add(1);
        defmt::debug!("Heartbeat tick={=u32}", counter);
    }
}

/// Execute a permanently undefined instruction: UsageFault (UNDEFINSTR), or
/// HardFault on cores without configurable faults.
#[cfg(feature = "fault-demo")]
async fn provoke_fault() {
    defmt::warn!("faulting in {=u64} s", FAULT_DELAY.as_secs());
    Timer::after(FAULT_DELAY).await;
    cortex_m::asm::udf();
}
