//! Upload progress events.

/// Transport progress for a running upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadProgress {
    /// `sent` of `total` body bytes have been handed to the transport.
    Sent { sent: u64, total: u64 },
    /// The transfer finished and the server responded.
    Complete,
}

/// One point in an upload's event stream.
///
/// While the transfer is running, `instance` carries the pre-upload instance;
/// on the [`UploadProgress::Complete`] event it is replaced by the server
/// response body.
#[derive(Debug, Clone)]
pub struct UploadEvent<MD> {
    pub instance: Option<MD>,
    pub progress: UploadProgress,
}

impl<MD> UploadEvent<MD> {
    pub fn is_complete(&self) -> bool {
        matches!(self.progress, UploadProgress::Complete)
    }
}
