//! Address Data

use crate::domain::addresses::records::AddressUuid;

/// New Address Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub recipient: String,
    pub line_1: String,
    pub line_2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub phone: Option<String>,
    /// Replaces any existing default address of the user.
    pub is_default: bool,
}
