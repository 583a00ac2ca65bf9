use thiserror::Error;

/// Errors reported by the strip driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StripError {
    /// Pixel, auxiliary or symbol buffer could not be allocated
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure { bytes: usize },
    /// Transmit channel could not be created or enabled, even without DMA
    #[error("failed to set up transmit channel on pin {pin}")]
    ChannelSetupFailure { pin: u8 },
    /// Previous frame is still being transmitted
    #[error("transmit channel busy")]
    ChannelBusy,
    /// Transmit peripheral rejected the frame
    #[error("transmit failed with code {0}")]
    HardwareFault(i32),
}

impl StripError {
    /// Whether the driver can keep running after this error
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::ChannelBusy | Self::HardwareFault(_))
    }
}

/// Errors reported by a transmit channel implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TxError {
    /// Bounded wait elapsed with the transmission still running
    #[error("transmit wait timed out")]
    Timeout,
    /// Peripheral driver error code
    #[error("transmit driver error {0}")]
    Driver(i32),
}

impl From<TxError> for StripError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Timeout => Self::ChannelBusy,
            TxError::Driver(code) => Self::HardwareFault(code),
        }
    }
}
