//! Transmit peripheral abstraction
//!
//! The driver is generic over these traits. A platform crate implements them
//! on top of its remote-control / pulse peripheral; tests implement them with
//! recording mocks.

use embassy_time::Duration;

use crate::encoder::StreamEncoder;
use crate::error::TxError;
use crate::timing::Symbol;

/// Symbol memory per channel on chips with large transmit memory
pub const LARGE_MEM_BLOCK_SYMBOLS: usize = 192;
/// Symbol memory per channel on the single-core RISC-V chips
pub const SMALL_MEM_BLOCK_SYMBOLS: usize = 96;

/// Chip family the transmit peripheral belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HardwareVariant {
    #[default]
    Esp32,
    Esp32S2,
    Esp32S3,
    Esp32P4,
    Esp32C3,
    Esp32C5,
    Esp32C6,
    Esp32H2,
}

impl HardwareVariant {
    /// Symbol memory used when the configuration asks for auto-selection
    pub const fn default_mem_block_symbols(self) -> usize {
        match self {
            Self::Esp32 | Self::Esp32S2 | Self::Esp32S3 | Self::Esp32P4 => {
                LARGE_MEM_BLOCK_SYMBOLS
            }
            Self::Esp32C3 | Self::Esp32C5 | Self::Esp32C6 | Self::Esp32H2 => {
                SMALL_MEM_BLOCK_SYMBOLS
            }
        }
    }

    pub const fn supports_dma(self) -> bool {
        matches!(self, Self::Esp32S3 | Self::Esp32P4)
    }
}

/// How the peripheral turns pixel bytes into symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncoderKind {
    /// Peripheral calls a [`StreamEncoder`] as its memory drains
    #[default]
    Streaming,
    /// Peripheral copies a fully expanded symbol buffer
    Bulk,
}

/// Parameters for creating a transmit channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub pin: u8,
    pub resolution_hz: u32,
    pub mem_block_symbols: usize,
    pub with_dma: bool,
}

/// One frame handed to the peripheral
#[derive(Debug, Clone, Copy)]
pub enum TxFrame<'a> {
    /// Raw pixel bytes, encoded on the fly
    Bytes {
        data: &'a [u8],
        encoder: StreamEncoder,
    },
    /// Pre-encoded symbols
    Symbols(&'a [Symbol]),
}

/// A transmit channel owned by the driver
pub trait TxChannel {
    /// Start the channel
    fn enable(&mut self) -> Result<(), TxError>;

    /// Wait at most `timeout` for every queued transmission to finish
    fn wait_all_done(&mut self, timeout: Duration) -> Result<(), TxError>;

    /// Queue a frame and return without waiting for it to go out
    ///
    /// The implementation copies whatever it needs out of `frame`.
    fn transmit(&mut self, frame: TxFrame<'_>) -> Result<(), TxError>;
}

/// Creates transmit channels for the driver
pub trait TxChannelFactory {
    type Channel: TxChannel;

    /// Tick rate of the created channels
    fn resolution_hz(&self) -> u32;

    fn create(&mut self, config: &ChannelConfig) -> Result<Self::Channel, TxError>;
}
