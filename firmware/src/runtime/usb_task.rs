//! USB device task: enumerates the pad and pumps one report per poll.
//!
//! The host clocks the schedule. Each interrupt IN opportunity advances the
//! engine by exactly one tick, so a missed poll stretches real time without
//! ever reordering or dropping a frame.

use crate::player::Player;
use crate::usb::{self, UsbDeviceStrings};
use embassy_futures::join::join3;
use embassy_stm32 as hal;
use embassy_stm32::Peri;
use embassy_usb::class::hid::{ReportId, RequestHandler};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::EndpointError;

embassy_stm32::bind_interrupts!(struct UsbIrqs {
    USB_UCPD1_2 => embassy_stm32::usb::InterruptHandler<hal::peripherals::USB>;
});

#[embassy_executor::task]
pub async fn run(
    usb: Peri<'static, hal::peripherals::USB>,
    dp: Peri<'static, hal::peripherals::PA12>,
    dm: Peri<'static, hal::peripherals::PA11>,
    storage: &'static mut usb::UsbDeviceStorage,
    mut player: Player,
) {
    let driver = embassy_stm32::usb::Driver::new(usb, UsbIrqs, dp, dm);

    let mut pad = usb::UsbHidPad::new(driver, storage, UsbDeviceStrings::default());
    let (reader, mut writer) = pad
        .take_endpoints()
        .expect("HID pad interface unavailable");
    let mut device = pad.device;

    let pump = async {
        writer.ready().await;
        defmt::info!("usb: pad interface polled, starting playback");
        let mut done_logged = false;

        loop {
            writer.ready().await;
            let frame = player.tick();
            match writer.write(&frame.as_bytes()).await {
                Ok(()) => {}
                Err(EndpointError::Disabled) => {
                    defmt::warn!("usb: pad endpoint disabled");
                }
                Err(_) => {
                    defmt::warn!("usb: pad report write error");
                }
            }
            if player.is_done() && !done_logged {
                defmt::info!("usb: script complete, holding neutral");
                done_logged = true;
            }
        }
    };

    // The console occasionally sends vendor OUT reports; drain and drop them.
    let mut out_handler = DiscardOutReports;
    let drain = reader.run(false, &mut out_handler);

    join3(device.run(), pump, drain).await;
}

struct DiscardOutReports;

impl RequestHandler for DiscardOutReports {
    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }
}
