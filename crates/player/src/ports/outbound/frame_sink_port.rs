//! Frame Sink Port - outbound half of the socket

use crate::error::ClientError;

/// Port for writing text frames to the server.
///
/// Writing must not block: the frame is queued and the call returns.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait FrameSink: Send {
    fn send_text(&mut self, frame: String) -> Result<(), ClientError>;
}
