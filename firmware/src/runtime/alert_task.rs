//! Blinks the board LED once the baked-in script finishes.

use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use crate::status;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[embassy_executor::task]
pub async fn run(mut led: Output<'static>) -> ! {
    while !status::is_done() {
        Timer::after(POLL_INTERVAL).await;
    }

    defmt::info!("alert: script finished after {=u32} ticks", status::snapshot().ticks_elapsed);

    loop {
        led.toggle();
        Timer::after(BLINK_INTERVAL).await;
    }
}
