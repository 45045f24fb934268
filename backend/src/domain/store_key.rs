//! Backing-store references.
//!
//! A [`StoreKey`] names one backing store by package type, store type and
//! store name. It serialises as the composed `"<package>:<type>:<name>"`
//! string so one key can be used verbatim in logs, URLs and payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Package type for Maven repositories.
pub const PKG_TYPE_MAVEN: &str = "maven";
/// Package type for NPM registries.
pub const PKG_TYPE_NPM: &str = "npm";
/// Package type for generic HTTP content.
pub const PKG_TYPE_GENERIC_HTTP: &str = "generic-http";

const SEPARATOR: char = ':';

/// Validation errors returned by [`StoreKey::new`] and [`StoreKey::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKeyValidationError {
    /// The package type was empty.
    EmptyPackageType,
    /// The package type contained the `:` separator.
    InvalidPackageType {
        /// Rejected value.
        value: String,
    },
    /// The store type was not one of `group`, `remote` or `hosted`.
    UnknownStoreType {
        /// Rejected value.
        value: String,
    },
    /// The store name was empty.
    EmptyName,
    /// The composed key did not have two or three `:`-separated parts.
    Malformed {
        /// Rejected value.
        value: String,
    },
}

impl fmt::Display for StoreKeyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPackageType => write!(f, "package type must not be empty"),
            Self::InvalidPackageType { value } => {
                write!(f, "package type must not contain ':' (got {value:?})")
            }
            Self::UnknownStoreType { value } => write!(
                f,
                "store type must be one of group, remote or hosted (got {value:?})"
            ),
            Self::EmptyName => write!(f, "store name must not be empty"),
            Self::Malformed { value } => write!(
                f,
                "store key must look like <package>:<type>:<name> (got {value:?})"
            ),
        }
    }
}

impl std::error::Error for StoreKeyValidationError {}

/// Kind of backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    /// Ordered aggregation of other stores.
    Group,
    /// Proxy of an upstream repository.
    Remote,
    /// Store accepting direct uploads.
    Hosted,
}

impl StoreType {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Remote => "remote",
            Self::Hosted => "hosted",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = StoreKeyValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "group" => Ok(Self::Group),
            "remote" => Ok(Self::Remote),
            "hosted" => Ok(Self::Hosted),
            _ => Err(StoreKeyValidationError::UnknownStoreType {
                value: s.to_owned(),
            }),
        }
    }
}

/// Composite reference to one backing store.
///
/// # Examples
/// ```
/// use tracking_backend::domain::{PKG_TYPE_MAVEN, StoreKey, StoreType};
///
/// let key = StoreKey::new(PKG_TYPE_MAVEN, StoreType::Remote, "central").expect("valid key");
/// assert_eq!(key.to_string(), "maven:remote:central");
/// assert_eq!("remote:central".parse::<StoreKey>(), Ok(key));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreKey {
    package_type: String,
    store_type: StoreType,
    name: String,
}

impl StoreKey {
    /// Validate and construct a [`StoreKey`].
    pub fn new(
        package_type: impl Into<String>,
        store_type: StoreType,
        name: impl Into<String>,
    ) -> Result<Self, StoreKeyValidationError> {
        let package_type = package_type.into();
        let name = name.into();
        if package_type.trim().is_empty() {
            return Err(StoreKeyValidationError::EmptyPackageType);
        }
        if package_type.contains(SEPARATOR) {
            return Err(StoreKeyValidationError::InvalidPackageType {
                value: package_type,
            });
        }
        if name.trim().is_empty() {
            return Err(StoreKeyValidationError::EmptyName);
        }
        Ok(Self {
            package_type,
            store_type,
            name,
        })
    }

    /// Package type, for example [`PKG_TYPE_MAVEN`].
    pub fn package_type(&self) -> &str {
        self.package_type.as_str()
    }

    /// Kind of store.
    pub const fn store_type(&self) -> StoreType {
        self.store_type
    }

    /// Store name, unique within its package and store type.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.package_type, self.store_type, self.name
        )
    }
}

impl FromStr for StoreKey {
    type Err = StoreKeyValidationError;

    /// Parse `pkg:type:name`, or the legacy `type:name` form which implies
    /// the Maven package type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, SEPARATOR).collect();
        match parts.as_slice() {
            [package_type, store_type, name] => {
                Self::new(*package_type, store_type.parse()?, *name)
            }
            [store_type, name] => Self::new(PKG_TYPE_MAVEN, store_type.parse()?, *name),
            _ => Err(StoreKeyValidationError::Malformed {
                value: s.to_owned(),
            }),
        }
    }
}

impl From<StoreKey> for String {
    fn from(value: StoreKey) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for StoreKey {
    type Error = StoreKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
