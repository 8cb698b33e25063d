use serde::Serialize;

/// OCS status code signalling success on `/apps/...` endpoints.
pub const APPS_SUCCESS: u64 = 100;

/// OCS status code signalling success on the v2 share endpoints.
pub const SHARE_SUCCESS: u64 = 200;

/// Share permission bits as understood by the files_sharing app.
pub mod permissions {
    pub const READ: u32 = 1;
    pub const UPDATE: u32 = 2;
    pub const CREATE: u32 = 4;
    pub const DELETE: u32 = 8;
    pub const SHARE: u32 = 16;
    pub const ALL: u32 = READ | UPDATE | CREATE | DELETE | SHARE;
}

/// Share types accepted by `shareType`.
pub mod share_type {
    pub const USER: u32 = 0;
    pub const GROUP: u32 = 1;
    pub const PUBLIC_LINK: u32 = 3;
}

/// One existing share of a path, as listed by `GetShare`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareElement {
    pub id: u64,
    pub url: String,
}

/// Decoded `<ocs>` envelope returned by the share and apps endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareResult {
    pub status: String,
    pub status_code: u64,
    pub message: String,
    pub id: u64,
    pub url: String,
    pub elements: Vec<ShareElement>,
}

impl ShareResult {
    pub fn is_success(&self, expected: u64) -> bool {
        self.status_code == expected
    }
}

/// Error body of a failed WebDAV request (`<d:error>` from Sabre).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestError {
    pub exception: String,
    pub message: String,
}

impl RequestError {
    pub fn is_error(&self) -> bool {
        !self.exception.is_empty()
    }
}
