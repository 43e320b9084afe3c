//! USB HID gamepad builder scaffolding.
//!
//! The device enumerates as a HORI Pokken Tournament Pro Pad, the controller
//! the console accepts as a wired pro controller without authentication. One
//! interrupt IN endpoint streams 8-byte pad reports at the host's polling
//! cadence; the OUT endpoint exists only because the descriptor declares it,
//! and its traffic is drained and discarded. A small wrapper owns the Embassy
//! builder bookkeeping so the runtime tasks only deal in handles.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use autopad_core::report::Report;

/// Vendor ID of the emulated pad (HORI).
pub const PAD_VENDOR_ID: u16 = 0x0f0d;
/// Product ID of the emulated pad (Pokken Tournament Pro Pad).
pub const PAD_PRODUCT_ID: u16 = 0x0092;
/// Interrupt endpoint polling interval; this is the engine's tick period.
pub const POLL_INTERVAL_MS: u8 = 8;
/// Size of one pad report on the wire.
pub const REPORT_LEN: usize = Report::LEN;

/// HID report descriptor of the Pokken pad: 16 buttons, an 8-way hat with a
/// null state, four 8-bit axes, and a vendor byte, plus the 8-byte vendor
/// OUT report the console never uses.
pub const PAD_REPORT_DESCRIPTOR: [u8; 86] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Game Pad)
    0xA1, 0x01, // Collection (Application)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x35, 0x00, //   Physical Minimum (0)
    0x45, 0x01, //   Physical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (1)
    0x29, 0x10, //   Usage Maximum (16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x25, 0x07, //   Logical Maximum (7)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x65, 0x14, //   Unit (Degrees)
    0x09, 0x39, //   Usage (Hat Switch)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x46, 0xFF, 0x00, //   Physical Maximum (255)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x06, 0x00, 0xFF, //   Usage Page (Vendor Defined)
    0x09, 0x20, //   Usage (0x20)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x0A, 0x21, 0x26, //   Usage (0x2621)
    0x95, 0x08, //   Report Count (8)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0xC0, // End Collection
];

#[cfg(target_os = "none")]
pub const MAX_PACKET_SIZE: u16 = 64;

#[cfg(target_os = "none")]
const CONTROL_BUFFER_LEN: usize = 64;
#[cfg(target_os = "none")]
const CONFIG_DESCRIPTOR_LEN: usize = 256;
#[cfg(target_os = "none")]
const BOS_DESCRIPTOR_LEN: usize = 256;
#[cfg(target_os = "none")]
const MSOS_DESCRIPTOR_LEN: usize = 256;

/// User-visible strings advertised in the USB descriptors.
#[derive(Clone, Copy, Debug)]
pub struct UsbDeviceStrings {
    pub manufacturer: &'static str,
    pub product: &'static str,
    pub serial_number: Option<&'static str>,
}

impl Default for UsbDeviceStrings {
    fn default() -> Self {
        // The console matches on VID/PID, but keep the strings consistent.
        Self {
            manufacturer: "HORI CO.,LTD.",
            product: "POKKEN CONTROLLER",
            serial_number: None,
        }
    }
}

/// Backing storage for the Embassy USB builder and the HID class.
#[cfg(target_os = "none")]
pub struct UsbDeviceStorage {
    control_buf: [u8; CONTROL_BUFFER_LEN],
    config_descriptor: [u8; CONFIG_DESCRIPTOR_LEN],
    bos_descriptor: [u8; BOS_DESCRIPTOR_LEN],
    msos_descriptor: [u8; MSOS_DESCRIPTOR_LEN],
    hid_state: embassy_usb::class::hid::State<'static>,
}

#[cfg(target_os = "none")]
impl UsbDeviceStorage {
    /// Creates a fresh storage bundle for the USB device.
    #[must_use]
    pub fn new() -> Self {
        Self {
            control_buf: [0; CONTROL_BUFFER_LEN],
            config_descriptor: [0; CONFIG_DESCRIPTOR_LEN],
            bos_descriptor: [0; BOS_DESCRIPTOR_LEN],
            msos_descriptor: [0; MSOS_DESCRIPTOR_LEN],
            hid_state: embassy_usb::class::hid::State::new(),
        }
    }
}

/// Split HID endpoint handles for the pad interface.
#[cfg(target_os = "none")]
pub type PadReader<D> = embassy_usb::class::hid::HidReader<'static, D, REPORT_LEN>;
#[cfg(target_os = "none")]
pub type PadWriter<D> = embassy_usb::class::hid::HidWriter<'static, D, REPORT_LEN>;

/// Wrapper that owns the HID pad interface and the resulting USB device.
#[cfg(target_os = "none")]
pub struct UsbHidPad<D>
where
    D: embassy_usb::driver::Driver<'static>,
{
    pub device: embassy_usb::UsbDevice<'static, D>,
    endpoints: Option<(PadReader<D>, PadWriter<D>)>,
}

#[cfg(target_os = "none")]
impl<D> UsbHidPad<D>
where
    D: embassy_usb::driver::Driver<'static>,
{
    /// Creates the USB device exposing the pad's HID interface.
    pub fn new(driver: D, storage: &'static mut UsbDeviceStorage, strings: UsbDeviceStrings) -> Self {
        let mut config = embassy_usb::Config::new(PAD_VENDOR_ID, PAD_PRODUCT_ID);
        config.manufacturer = Some(strings.manufacturer);
        config.product = Some(strings.product);
        config.serial_number = strings.serial_number;
        config.max_packet_size_0 = 64;
        config.max_power = 250;
        config.device_release = 0x0100;

        let mut builder = embassy_usb::Builder::new(
            driver,
            config,
            &mut storage.config_descriptor,
            &mut storage.bos_descriptor,
            &mut storage.msos_descriptor,
            &mut storage.control_buf,
        );

        let hid_config = embassy_usb::class::hid::Config {
            report_descriptor: &PAD_REPORT_DESCRIPTOR,
            request_handler: None,
            poll_ms: POLL_INTERVAL_MS,
            max_packet_size: MAX_PACKET_SIZE,
        };
        let hid = embassy_usb::class::hid::HidReaderWriter::<_, REPORT_LEN, REPORT_LEN>::new(
            &mut builder,
            &mut storage.hid_state,
            hid_config,
        );
        let endpoints = Some(hid.split());

        let device = builder.build();

        Self { device, endpoints }
    }

    /// Takes ownership of the HID reader/writer pair.
    pub fn take_endpoints(&mut self) -> Option<(PadReader<D>, PadWriter<D>)> {
        self.endpoints.take()
    }
}

/// Host-side stub so `cargo test` builds without pulling in Embassy USB.
#[cfg(not(target_os = "none"))]
pub struct UsbDeviceStorage;

#[cfg(not(target_os = "none"))]
impl UsbDeviceStorage {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "none"))]
impl Default for UsbDeviceStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-side stub representing the pad's USB device.
#[cfg(not(target_os = "none"))]
pub struct UsbHidPad<D> {
    pub device: (),
    endpoints: Option<((), ())>,
    _marker: core::marker::PhantomData<D>,
}

#[cfg(not(target_os = "none"))]
impl<D> UsbHidPad<D> {
    pub fn new(_: D, _: &'static mut UsbDeviceStorage, _: UsbDeviceStrings) -> Self {
        Self {
            device: (),
            endpoints: Some(((), ())),
            _marker: core::marker::PhantomData,
        }
    }

    pub fn take_endpoints(&mut self) -> Option<((), ())> {
        self.endpoints.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_declares_an_eight_byte_report() {
        // 16 one-bit buttons + 4-bit hat + 4-bit pad + four axes + vendor
        // byte = 8 bytes, matching the serialized report.
        assert_eq!(PAD_REPORT_DESCRIPTOR.len(), 86);
        assert_eq!(REPORT_LEN, 8);
        assert_eq!(PAD_REPORT_DESCRIPTOR[0..4], [0x05, 0x01, 0x09, 0x05]);
        assert_eq!(PAD_REPORT_DESCRIPTOR[85], 0xC0);
    }

    #[test]
    fn identity_matches_the_pokken_pad() {
        assert_eq!(PAD_VENDOR_ID, 0x0f0d);
        assert_eq!(PAD_PRODUCT_ID, 0x0092);
        assert_eq!(POLL_INTERVAL_MS, 8);
    }
}
