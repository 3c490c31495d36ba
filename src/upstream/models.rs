//! Upstream Models
//!
//! Wire shapes exchanged with the upstream API, and the fixed projections
//! handed to the presentation layer.

use serde::{Deserialize, Serialize};

/// Login/registration payload, also accepted from the browser form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login body. Only the token is of interest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Error body returned alongside a non-success status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// User as listed by upstream. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Appliance as listed by upstream. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAppliance {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub precio: Option<f64>,
    #[serde(default)]
    pub clase_energetica: Option<String>,
    #[serde(default)]
    pub en_stock: Option<bool>,
}

/// User row shown on the users page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Option<i64>,
    pub username: Option<String>,
}

/// Appliance row shown on the appliances page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceRecord {
    pub id: Option<i64>,
    #[serde(rename = "marca")]
    pub brand: Option<String>,
    #[serde(rename = "modelo")]
    pub model: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: Option<String>,
    #[serde(rename = "precio")]
    pub price: Option<f64>,
    #[serde(rename = "clase_energetica")]
    pub energy_class: Option<String>,
    #[serde(rename = "en_stock")]
    pub in_stock: bool,
}

impl From<RawUser> for UserRecord {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            username: raw.username,
        }
    }
}

impl From<RawAppliance> for ApplianceRecord {
    fn from(raw: RawAppliance) -> Self {
        Self {
            id: raw.id,
            brand: raw.marca,
            model: raw.modelo,
            kind: raw.tipo,
            price: raw.precio,
            energy_class: raw.clase_energetica,
            in_stock: raw.en_stock.unwrap_or(false),
        }
    }
}
