use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Level, Output, Speed};
use static_cell::StaticCell;

use crate::player::Player;
use crate::usb;

mod alert_task;
mod usb_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

static USB_STORAGE: StaticCell<usb::UsbDeviceStorage> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA5,
        USB,
        PA11,
        PA12,
        ..
    } = hal::init(config);

    let player = match Player::from_active_script() {
        Ok(player) => player,
        Err(err) => {
            defmt::error!("runtime: script rejected: {}", defmt::Display2Format(&err));
            core::future::pending::<()>().await;
            unreachable!()
        }
    };
    defmt::info!("runtime: playing script {=str}", player.script_name());

    let storage = USB_STORAGE.init(usb::UsbDeviceStorage::new());

    spawner
        .spawn(usb_task::run(USB, PA12, PA11, storage, player))
        .expect("failed to spawn USB pad task");

    let done_led = Output::new(PA5, Level::Low, Speed::Low);
    spawner
        .spawn(alert_task::run(done_led))
        .expect("failed to spawn alert task");

    core::future::pending::<()>().await;
}
