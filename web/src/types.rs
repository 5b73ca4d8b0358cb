use address_checker::{AssetKind, UserId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Menu {
    pub prompt: String,
    pub options: Vec<MenuOption>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Reply {
    pub ok: bool,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub user_id: UserId,
    pub asset: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub user_id: UserId,
    pub text: String,
}

#[derive(Deserialize, Debug)]
pub struct CheckRequest {
    pub asset: AssetKind,
    pub address: String,
}
