//! Reads a scanned PDF417 payload from standard input and prints the driver
//! license it holds as JSON.
//!
//! ```text
//! printf '@\n\x1e\rANSI 636000090001DL00310020DLDAQD1234578\nDCSSMITH\n' \
//!     | RUST_LOG=debug cargo run --example scan
//! ```
use std::io::{self, Read};

use us_dl_scanner::{ScanError, Scanner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut payload = String::new();
    io::stdin().read_to_string(&mut payload)?;

    let scanner = Scanner::new();
    match scanner.try_scan(&payload) {
        Ok(license) => {
            println!("{}", serde_json::to_string_pretty(&license)?);
            eprintln!("{license}");
            Ok(())
        }
        Err(ScanError::NoRecognizedElements) => {
            eprintln!("driver license barcode without any known field");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
