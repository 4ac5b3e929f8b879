//! PDF permission management
//! Author: kartik4091
//! Created: 2025-06-05

use serde::{Deserialize, Serialize};

/// Printing level granted to the user of a protected document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintPermission {
    #[default]
    None,
    Full,
}

impl PrintPermission {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            PrintPermission::Full
        } else {
            PrintPermission::None
        }
    }
}

/// Document permission restrictions applied by native encryption.
///
/// `print` and `copy` come from the request; `modify` and `annotate` are
/// operator settings from the configuration file and default to allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub print: PrintPermission,
    pub copy: bool,
    #[serde(default = "allowed")]
    pub modify: bool,
    #[serde(default = "allowed")]
    pub annotate: bool,
}

fn allowed() -> bool {
    true
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            print: PrintPermission::None,
            copy: false,
            modify: true,
            annotate: true,
        }
    }
}

impl Permissions {
    pub fn new(print: PrintPermission, copy: bool) -> Self {
        Self {
            print,
            copy,
            ..Self::default()
        }
    }

    /// Translate into the `/P` flag set written into the encryption dictionary.
    /// Extraction for accessibility is always granted.
    pub fn to_pdf_flags(&self) -> lopdf::Permissions {
        let mut flags = lopdf::Permissions::COPYABLE_FOR_ACCESSIBILITY;

        if self.print == PrintPermission::Full {
            flags |= lopdf::Permissions::PRINTABLE | lopdf::Permissions::PRINTABLE_IN_HIGH_QUALITY;
        }
        if self.copy {
            flags |= lopdf::Permissions::COPYABLE;
        }
        if self.modify {
            flags |= lopdf::Permissions::MODIFIABLE | lopdf::Permissions::ASSEMBLABLE;
        }
        if self.annotate {
            flags |= lopdf::Permissions::ANNOTABLE | lopdf::Permissions::FILLABLE;
        }

        flags
    }
}
