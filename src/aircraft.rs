use crate::leg::AirportId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type AircraftId = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub ident: AircraftId,
    #[serde(rename = "type")]
    pub kind: String,
    pub economy_seats: u32,
    pub base: AirportId,
}
