//! Fixed directory names of the store layout.

use std::path::Path;

/// Subdirectories created under the base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreDir {
    /// Whole attachments and per-GUID chunk directories
    Attachments,
    /// Contact exports
    Contacts,
    /// Provisioned helper scripts
    Scripts,
    /// Push-notification credential documents
    Fcm,
}

impl StoreDir {
    /// Every fixed subdirectory, in creation order.
    pub const ALL: [StoreDir; 4] = [
        StoreDir::Attachments,
        StoreDir::Contacts,
        StoreDir::Scripts,
        StoreDir::Fcm,
    ];

    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachments => "Attachments",
            Self::Contacts => "Contacts",
            Self::Scripts => "Scripts",
            Self::Fcm => "FCM",
        }
    }
}

impl AsRef<Path> for StoreDir {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for StoreDir {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for StoreDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
