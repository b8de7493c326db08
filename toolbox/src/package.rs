//! Describes the Navigator package.

use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    pub email: String,
    pub description: String,
    pub license: String,
}

impl PackageInfo {
    /// Returns the information shown on the Navigator help page.
    pub fn navigator() -> Self {
        PackageInfo {
            name: "Navigator Plugin".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            author: "System".to_owned(),
            email: "Remaining@2925.com".to_owned(),
            description: "Navigator package for system navigation tasks".to_owned(),
            license: "MIT".to_owned(),
        }
    }
}
