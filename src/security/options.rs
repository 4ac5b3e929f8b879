//! Protection options: raw user input normalized into a canonical request.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::security::permissions::{Permissions, PrintPermission};

/// Checkbox-style permission input as collected from the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPermissions {
    pub allow_print: bool,
    pub allow_copy: bool,
}

impl From<RawPermissions> for Permissions {
    fn from(raw: RawPermissions) -> Self {
        Permissions::new(PrintPermission::from_allowed(raw.allow_print), raw.allow_copy)
    }
}

/// Unvalidated protection options. Empty strings mean "not provided".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOptions {
    #[serde(default)]
    pub open_password: String,
    #[serde(default)]
    pub owner_password: String,
    #[serde(default)]
    pub permissions: RawPermissions,
}

impl RawOptions {
    pub fn normalize(&self) -> Result<ProtectionRequest, ValidationError> {
        normalize(&self.open_password, &self.owner_password, self.permissions)
    }
}

impl std::fmt::Debug for RawOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawOptions")
            .field("open_password", &redact(&self.open_password))
            .field("owner_password", &redact(&self.owner_password))
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Canonical, validated protection intent.
///
/// At least one of the two passwords is present and non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct ProtectionRequest {
    open_password: Option<String>,
    owner_password: Option<String>,
    permissions: Permissions,
}

/// Normalize raw user input into a [`ProtectionRequest`].
pub fn normalize(
    raw_open: &str,
    raw_owner: &str,
    raw_permissions: RawPermissions,
) -> Result<ProtectionRequest, ValidationError> {
    let open_password = non_empty(raw_open);
    let owner_password = non_empty(raw_owner);

    if open_password.is_none() && owner_password.is_none() {
        return Err(ValidationError::NoPasswordProvided);
    }

    Ok(ProtectionRequest {
        open_password,
        owner_password,
        permissions: raw_permissions.into(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl ProtectionRequest {
    pub fn open_password(&self) -> Option<&str> {
        self.open_password.as_deref()
    }

    pub fn owner_password(&self) -> Option<&str> {
        self.owner_password.as_deref()
    }

    pub fn has_open_password(&self) -> bool {
        self.open_password.is_some()
    }

    /// Owner password handed to native encryption. Falls back to the open
    /// password when no explicit owner password was given.
    pub fn effective_owner_password(&self) -> &str {
        self.owner_password
            .as_deref()
            .or(self.open_password.as_deref())
            .unwrap_or_default()
    }

    /// User (open) password handed to native encryption; empty means the
    /// document opens without a password and only permissions are locked.
    pub fn user_password(&self) -> &str {
        self.open_password.as_deref().unwrap_or_default()
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Overlay operator-level permission settings onto the request.
    pub fn with_extra_permissions(mut self, modify: bool, annotate: bool) -> Self {
        self.permissions.modify = modify;
        self.permissions.annotate = annotate;
        self
    }
}

impl std::fmt::Debug for ProtectionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectionRequest")
            .field("open_password", &self.open_password.as_ref().map(|_| "<redacted>"))
            .field("owner_password", &self.owner_password.as_ref().map(|_| "<redacted>"))
            .field("permissions", &self.permissions)
            .finish()
    }
}
