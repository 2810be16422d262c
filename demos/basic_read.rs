#![no_std]
#![no_main]

use arduino_hal::default_serial;
use arduino_hal::spi;
use panic_halt as _;
use rc522_typea::commands::PICC_REQIDL;
use rc522_typea::rfid_rc522::MODE;
use rc522_typea::{classify, CardFamily, RfidRc522, Status};
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
    match rfid.init(CardFamily::A) {
        Ok(Status::Ok) => uwriteln!(&mut serial, "Reader ready").ok(),
        Ok(status) => uwriteln!(&mut serial, "Reader not responding: {:?}", status).ok(),
        Err(e) => uwriteln!(&mut serial, "Bus error during init: {:?}", e).ok(),
    };

    loop {
        arduino_hal::delay_ms(500);

        let present = match rfid.is_card_present(PICC_REQIDL) {
            Ok(response) => response.status,
            Err(e) => {
                uwriteln!(&mut serial, "Bus error: {:?}", e).ok();
                continue;
            }
        };
        if present != Status::Ok {
            continue;
        }

        let uid = match rfid.read_uid() {
            Ok((Status::Ok, Some(uid))) => uid,
            Ok((status, _)) => {
                uwriteln!(&mut serial, "Anticollision failed: {:?}", status).ok();
                continue;
            }
            Err(e) => {
                uwriteln!(&mut serial, "Bus error: {:?}", e).ok();
                continue;
            }
        };
        uwriteln!(&mut serial, "Card UID: {:?}", uid).ok();

        match rfid.select_card(&uid) {
            Ok(0) => {
                uwriteln!(&mut serial, "Select failed").ok();
            }
            Ok(sak) => {
                uwriteln!(&mut serial, "Card type: {}", classify(sak)).ok();
            }
            Err(e) => {
                uwriteln!(&mut serial, "Bus error: {:?}", e).ok();
            }
        }

        rfid.halt().ok();
        arduino_hal::delay_ms(1000);
    }
}
