//! AAMVA DL/ID Card Design Standard.
//!
//! See: <https://www.aamva.org/assets/best-practices,-guides,-standards,-manuals,-whitepapers/aamva-dl-id-card-design-standard-(2020)>
mod macros;
pub(crate) use macros::*;

pub mod types;

mod fields;
pub use fields::*;

mod dl;
pub use dl::*;

pub mod pdf_417;
pub use pdf_417::File;
