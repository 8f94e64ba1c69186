//! Caller authorization.
//!
//! How a caller came to hold a tier (sessions, tokens, role tables) is
//! decided outside this crate. Operations only ask an [`Authorize`]
//! implementation whether the tier they need is held, before touching
//! storage.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Access tiers, ordered from least to most privileged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Describe the schema, select, count, preview key changes
    Read,

    /// Insert, update, delete, cascade key changes
    Write,

    /// Snapshot and restore table contents
    Admin,
}

pub trait Authorize {
    /// Returns `true` if the caller holds `permission`.
    fn holds(&self, permission: Permission) -> bool;
}

/// A caller granted a single tier holds that tier and every tier below it.
impl Authorize for Permission {
    fn holds(&self, permission: Permission) -> bool {
        *self >= permission
    }
}

impl<T: Authorize + ?Sized> Authorize for &T {
    fn holds(&self, permission: Permission) -> bool {
        (**self).holds(permission)
    }
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "admin" => Ok(Permission::Admin),
            _ => Err(crate::err!("unknown permission `{s}`; expected read, write or admin")),
        }
    }
}

pub(crate) fn require(caller: &(impl Authorize + ?Sized), permission: Permission) -> Result<()> {
    if caller.holds(permission) {
        Ok(())
    } else {
        tracing::warn!(required = %permission, "permission denied");
        Err(Error::permission_denied(permission.as_str()))
    }
}
