//! Device geometry errors.

/// Errors raised when describing a device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// The device has no logic cells.
    #[error("device must be at least 1x1 logic cells, got {width}x{height}")]
    Empty {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The channel count is outside what switch blocks support.
    #[error("switch blocks support 1 to {max} channels, got {channels}")]
    Channels {
        /// Requested channel count.
        channels: u32,
        /// The largest supported count.
        max: u32,
    },
}
