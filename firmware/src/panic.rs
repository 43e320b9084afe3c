//! Panic handler for the firmware target.
//!
//! The pad has no recovery path once an invariant breaks; log the panic over
//! RTT and trap so a debugger lands on the fault.

use core::panic::PanicInfo;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    defmt::error!("PANIC: {}", defmt::Display2Format(info));
    cortex_m::asm::udf();
}
