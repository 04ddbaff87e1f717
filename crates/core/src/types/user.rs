//! User records.
//!
//! Users live in the resource store's `users` collection. The session
//! cookie carries the user's record ID verbatim, so [`User::id`] is an
//! [`OwnerId`]. The store keeps passwords in plain text; that is a
//! property of the backing store, not something this layer can fix.

use serde::{Deserialize, Serialize};

use super::id::OwnerId;

/// A user record as persisted in the resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned ID; absent until the record is first created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OwnerId>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: UserName,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
}

/// First and last name, as split in the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
}

/// Postal address with the store's legacy geolocation fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub geolocation: Geolocation,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub zipcode: String,
}

/// Coordinates stored as strings, matching legacy catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: String,
    pub long: String,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self {
            lat: "0".to_owned(),
            long: "0".to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_record() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 3,
            "email": "a@b.co",
            "password": "pw"
        }))
        .unwrap();
        assert_eq!(user.id.unwrap().as_str(), "3");
        assert!(user.name.first_name.is_empty());
        assert_eq!(user.address.geolocation.lat, "0");
    }

    #[test]
    fn name_uses_camel_case_keys() {
        let user = User {
            id: None,
            email: "a@b.co".into(),
            password: "pw".into(),
            name: UserName {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
            },
            phone: String::new(),
            address: Address::default(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"]["firstName"], "Ada");
        assert_eq!(json["name"]["lastName"], "Lovelace");
    }
}
