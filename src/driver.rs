//! Transmission engine
//!
//! Owns the pixel buffer and the transmit channel. At most one frame is in
//! flight at a time: every [`StripDriver::fire`] first confirms with a bounded
//! wait that the previous frame has left the peripheral.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::encoder::{StreamEncoder, bulk_symbol_count, encode_bulk};
use crate::error::StripError;
use crate::layout::{ByteOrder, ChannelLayout, PixelBuffer, WhiteChannel};
use crate::timing::{Chipset, LedTimings, Symbol};
use crate::tx::{ChannelConfig, EncoderKind, HardwareVariant, TxChannel, TxChannelFactory, TxFrame};

/// Upper bound of the wait for the previous frame before firing
pub const TX_WAIT_TIMEOUT: Duration = Duration::from_millis(15);

/// Setup-time strip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    pub pin: u8,
    pub num_leds: usize,
    pub chipset: Chipset,
    /// Wire byte order, chipset default when unset
    pub order: Option<ByteOrder>,
    /// White channel position, chipset default when unset
    pub white: Option<WhiteChannel>,
    /// Symbol memory per channel, 0 selects by hardware variant
    pub mem_block_symbols: usize,
    /// Minimum time between two accepted frames, 0 disables throttling
    pub min_refresh_interval: Duration,
    pub variant: HardwareVariant,
    pub encoder: EncoderKind,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            pin: 0,
            num_leds: 0,
            chipset: Chipset::Ws2812x,
            order: None,
            white: None,
            mem_block_symbols: 0,
            min_refresh_interval: Duration::from_millis(0),
            variant: HardwareVariant::Esp32,
            encoder: EncoderKind::Streaming,
        }
    }
}

impl StripConfig {
    /// Channel layout after applying chipset defaults
    pub fn layout(&self) -> ChannelLayout {
        ChannelLayout::new(
            self.order.unwrap_or(self.chipset.default_order()),
            self.white.unwrap_or(self.chipset.default_white()),
        )
    }

    /// Symbol memory after auto-selection
    pub const fn resolved_mem_block_symbols(&self) -> usize {
        if self.mem_block_symbols == 0 {
            self.variant.default_mem_block_symbols()
        } else {
            self.mem_block_symbols
        }
    }
}

/// State of the single transmission slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Idle,
    InFlight,
}

/// Origin of a frame write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// Owning light framework
    Host,
    /// Effect rendering and the transition controller
    Internal,
}

/// Result of a frame write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Frame handed to the peripheral
    Shown,
    /// Refresh interval not yet elapsed, retried on the next service tick
    Deferred,
    /// Frame lost to a recoverable error
    Dropped(StripError),
    /// Host frame ignored while the outro owns the strip
    Discarded,
}

/// Component health as seen by the host
///
/// Fatal errors are returned by [`StripDriver::setup`], so a live driver only
/// ever reports recoverable trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    /// Last frame hit a recoverable error
    pub warning: bool,
}

/// Driver for one strip on one transmit channel
pub struct StripDriver<C: TxChannel> {
    channel: C,
    pixels: PixelBuffer,
    /// Copy of the pixel bytes handed to the streaming encoder
    staging: Vec<u8>,
    /// Expanded frame for bulk transmission
    symbols: Vec<Symbol>,
    timings: LedTimings,
    encoder: EncoderKind,
    slot: SlotState,
    min_refresh_interval: Duration,
    last_refresh: Option<Instant>,
    /// Source of the frame deferred by the refresh throttle
    pending: Option<FrameSource>,
    intercepting: bool,
    status: Status,
    frames_sent: u32,
}

impl<C: TxChannel> StripDriver<C> {
    /// Allocate buffers, resolve timings and create the transmit channel
    ///
    /// DMA is tried first on variants that support it, followed by a single
    /// retry without DMA.
    pub fn setup<F>(config: &StripConfig, factory: &mut F) -> Result<Self, StripError>
    where
        F: TxChannelFactory<Channel = C>,
    {
        let layout = config.layout();
        let pixels = PixelBuffer::new(config.num_leds, layout)?;
        let resolution_hz = factory.resolution_hz();
        let timings = LedTimings::for_chipset(config.chipset, resolution_hz);

        let frame_bytes = pixels.as_bytes().len();
        let mut staging = Vec::new();
        let mut symbols = Vec::new();
        match config.encoder {
            EncoderKind::Streaming => {
                staging
                    .try_reserve_exact(frame_bytes)
                    .map_err(|_| StripError::AllocationFailure { bytes: frame_bytes })?;
                staging.resize(frame_bytes, 0);
            }
            EncoderKind::Bulk => {
                let count = bulk_symbol_count(frame_bytes, &timings);
                symbols
                    .try_reserve_exact(count)
                    .map_err(|_| StripError::AllocationFailure {
                        bytes: count * core::mem::size_of::<Symbol>(),
                    })?;
            }
        }

        let mut channel_config = ChannelConfig {
            pin: config.pin,
            resolution_hz,
            mem_block_symbols: config.resolved_mem_block_symbols(),
            with_dma: config.variant.supports_dma(),
        };
        let mut channel = match factory.create(&channel_config) {
            Ok(channel) => channel,
            Err(_) if channel_config.with_dma => {
                #[cfg(feature = "esp32-log")]
                println!("[StripDriver.setup] DMA channel failed, falling back to non-DMA");
                channel_config.with_dma = false;
                factory
                    .create(&channel_config)
                    .map_err(|_| StripError::ChannelSetupFailure { pin: config.pin })?
            }
            Err(_) => return Err(StripError::ChannelSetupFailure { pin: config.pin }),
        };
        channel
            .enable()
            .map_err(|_| StripError::ChannelSetupFailure { pin: config.pin })?;

        #[cfg(feature = "esp32-log")]
        println!(
            "[StripDriver.setup] {} LEDs on pin {} ({} bytes, {} symbols, dma: {})",
            config.num_leds,
            config.pin,
            frame_bytes,
            channel_config.mem_block_symbols,
            channel_config.with_dma
        );

        Ok(Self {
            channel,
            pixels,
            staging,
            symbols,
            timings,
            encoder: config.encoder,
            slot: SlotState::Idle,
            min_refresh_interval: config.min_refresh_interval,
            last_refresh: None,
            pending: None,
            intercepting: false,
            status: Status::default(),
            frames_sent: 0,
        })
    }

    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    pub const fn timings(&self) -> &LedTimings {
        &self.timings
    }

    pub const fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn slot(&self) -> SlotState {
        self.slot
    }

    /// Frames handed to the peripheral since setup
    pub const fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Whether a deferred frame waits for the refresh interval
    pub const fn show_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time until a deferred frame can be retried, `None` when nothing waits
    pub fn time_until_retry(&self, now: Instant) -> Option<Duration> {
        if self.pending.is_none() {
            return None;
        }
        let due = self
            .last_refresh
            .map_or(now, |last| last + self.min_refresh_interval);
        Some(due.saturating_duration_since(now))
    }

    /// Bytes held by the pixel, auxiliary and transmit buffers
    pub fn buffer_bytes(&self) -> usize {
        self.pixels.allocated_bytes()
            + self.staging.capacity()
            + self.symbols.capacity() * core::mem::size_of::<Symbol>()
    }

    pub const fn is_intercepting(&self) -> bool {
        self.intercepting
    }

    /// Route host frames to the bin while the outro owns the strip
    ///
    /// A host frame still waiting for the refresh interval is dropped as well.
    pub fn set_intercepting(&mut self, intercepting: bool) {
        self.intercepting = intercepting;
        if intercepting && self.pending == Some(FrameSource::Host) {
            self.pending = None;
        }
    }

    /// Bounded wait for the in-flight frame to complete
    pub fn is_idle(&mut self, timeout: Duration) -> bool {
        if self.slot == SlotState::Idle {
            return true;
        }
        match self.channel.wait_all_done(timeout) {
            Ok(()) => {
                self.slot = SlotState::Idle;
                true
            }
            Err(_) => false,
        }
    }

    /// Hand the current pixel buffer to the peripheral without waiting for it
    pub fn fire(&mut self) -> Result<(), StripError> {
        if !self.is_idle(TX_WAIT_TIMEOUT) {
            #[cfg(feature = "esp32-log")]
            println!("[StripDriver.fire] transmit wait timed out");
            self.status.warning = true;
            return Err(StripError::ChannelBusy);
        }

        let frame = match self.encoder {
            EncoderKind::Streaming => {
                self.staging.copy_from_slice(self.pixels.as_bytes());
                TxFrame::Bytes {
                    data: &self.staging,
                    encoder: StreamEncoder::new(self.timings),
                }
            }
            EncoderKind::Bulk => {
                encode_bulk(self.pixels.as_bytes(), &self.timings, &mut self.symbols)?;
                TxFrame::Symbols(&self.symbols)
            }
        };

        match self.channel.transmit(frame) {
            Ok(()) => {
                self.slot = SlotState::InFlight;
                self.status.warning = false;
                self.frames_sent = self.frames_sent.wrapping_add(1);
                Ok(())
            }
            Err(error) => {
                #[cfg(feature = "esp32-log")]
                println!("[StripDriver.fire] transmit failed: {:?}", error);
                self.status.warning = true;
                Err(StripError::from(error))
            }
        }
    }

    /// Show the current pixel buffer, honoring interception and throttling
    pub fn write_state(&mut self, source: FrameSource, now: Instant) -> WriteOutcome {
        if source == FrameSource::Host && self.intercepting {
            return WriteOutcome::Discarded;
        }

        if self.min_refresh_interval.as_ticks() != 0 {
            if let Some(last) = self.last_refresh {
                if now.saturating_duration_since(last) < self.min_refresh_interval {
                    self.pending = Some(source);
                    return WriteOutcome::Deferred;
                }
            }
        }
        self.last_refresh = Some(now);
        self.pending = None;

        match self.fire() {
            Ok(()) => WriteOutcome::Shown,
            Err(error) => WriteOutcome::Dropped(error),
        }
    }

    /// Retry a deferred frame once the refresh interval has passed
    ///
    /// The retry keeps the source of the deferred frame, so a host frame is
    /// still discarded if interception started in the meantime.
    pub fn service(&mut self, now: Instant) -> Option<WriteOutcome> {
        let source = self.pending.take()?;
        Some(self.write_state(source, now))
    }
}
