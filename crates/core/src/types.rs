use serde::{Deserialize, Serialize};

/// An establishment as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Establishment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    pub location: String,
    #[serde(default = "default_true")]
    pub has_internet_sales: bool,
    #[serde(default)]
    pub has_courier: bool,
    #[serde(default)]
    pub code: Option<String>,
}

/// Payload for creating an establishment: everything but the id, plus the
/// optional administrative division the location picker produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentCreate {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    pub location: String,
    pub has_internet_sales: bool,
    pub has_courier: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

impl Default for EstablishmentCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            email: None,
            telephone: None,
            location: String::new(),
            has_internet_sales: true,
            has_courier: false,
            code: None,
            department: None,
            province: None,
            district: None,
        }
    }
}

/// Partial update for an establishment. Absent fields are left untouched by
/// the backend and are skipped on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_internet_sales: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_courier: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One node of the location tree served by the environments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LocationNode>,
}

/// Login form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Standard paginated list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

fn default_true() -> bool {
    true
}
