#![no_std]
#![no_main]

use arduino_hal::default_serial;
use arduino_hal::spi;
use panic_halt as _;
use rc522_typea::registers::MAX_REGISTER;
use rc522_typea::rfid_rc522::MODE;
use rc522_typea::{CardFamily, RfidRc522, Status};
use ufmt::uwriteln;

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);

    let mut serial = default_serial!(dp, pins, 9600);

    let settings = spi::Settings {
        data_order: spi::DataOrder::MostSignificantFirst,
        mode: MODE,
        clock: spi::SerialClockRate::OscfOver64,
    };

    let sclk = pins.d13.into_output();
    let mosi = pins.d11.into_output();
    let miso = pins.d12.into_pull_up_input();
    let cs = pins.d10.into_output();
    let (spi, cs_pin) = spi::Spi::new(dp.SPI, sclk, mosi, miso, cs, settings);

    let mut rfid = RfidRc522::new(spi, cs_pin, arduino_hal::Delay::new());
    if !matches!(rfid.init(CardFamily::A), Ok(Status::Ok)) {
        uwriteln!(&mut serial, "Reader not responding").ok();
    }

    // Register map after init
    for reg in 0x01..=MAX_REGISTER {
        match rfid.read_register(reg) {
            Ok(value) => uwriteln!(&mut serial, "0x{:X}: 0x{:X}", reg, value).ok(),
            Err(e) => uwriteln!(&mut serial, "0x{:X}: {:?}", reg, e).ok(),
        };
    }

    loop {
        match rfid.wait_for_present(200) {
            Ok(true) => {
                uwriteln!(&mut serial, "Card entered the field").ok();
            }
            Ok(false) => continue,
            Err(e) => {
                uwriteln!(&mut serial, "Bus error: {:?}", e).ok();
                arduino_hal::delay_ms(1000);
                continue;
            }
        }

        while let Ok(false) = rfid.wait_for_removed(1000) {}
        uwriteln!(&mut serial, "Card left the field").ok();
    }
}
