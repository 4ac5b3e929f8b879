//! Security module: protection options, strategy selection and the two
//! protection backends.
//! Author: kartik4091

pub mod archive;
pub mod availability;
pub mod encryption;
pub mod options;
pub mod permissions;
pub mod strategy;

pub use archive::{ArchiveCipher, ZipArchiver, STORE_ONLY};
pub use availability::BackendAvailability;
pub use encryption::{LopdfEncryptor, NativeEncryptor, UnavailableEncryptor};
pub use options::{normalize, ProtectionRequest, RawOptions, RawPermissions};
pub use permissions::{Permissions, PrintPermission};
pub use strategy::{select, Strategy};
