//! Address Records

use jiff::Timestamp;

use crate::{auth::UserUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<AddressRecord>;

/// Address Record
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRecord {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    pub recipient: String,
    pub line_1: String,
    pub line_2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
