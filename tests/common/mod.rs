#![allow(dead_code)]

use myrtio_strip_composer::encoder::StreamEncoder;
use myrtio_strip_composer::{ChannelConfig, Symbol, TxChannel, TxChannelFactory, TxError, TxFrame};
use embassy_time::Duration;

/// Tick rate used by the mocks, 100 ns per tick
pub const RESOLUTION_HZ: u32 = 10_000_000;

/// Transmit channel that records every frame
#[derive(Debug, Default)]
pub struct MockChannel {
    pub config: Option<ChannelConfig>,
    pub enabled: bool,
    pub fail_enable: bool,
    pub in_flight: bool,
    /// Keep the current frame in flight past any wait
    pub stuck: bool,
    pub fail_transmit: Option<i32>,
    /// Raw bytes of streamed frames
    pub frames: Vec<Vec<u8>>,
    /// Symbols of every frame, streamed or bulk
    pub symbols: Vec<Vec<Symbol>>,
}

impl TxChannel for MockChannel {
    fn enable(&mut self) -> Result<(), TxError> {
        if self.fail_enable {
            return Err(TxError::Driver(-3));
        }
        self.enabled = true;
        Ok(())
    }

    fn wait_all_done(&mut self, _timeout: Duration) -> Result<(), TxError> {
        if self.in_flight && self.stuck {
            return Err(TxError::Timeout);
        }
        self.in_flight = false;
        Ok(())
    }

    fn transmit(&mut self, frame: TxFrame<'_>) -> Result<(), TxError> {
        if let Some(code) = self.fail_transmit {
            return Err(TxError::Driver(code));
        }
        match frame {
            TxFrame::Bytes { data, encoder } => {
                let block = self.config.map_or(64, |c| c.mem_block_symbols).max(8);
                self.symbols.push(stream(data, &encoder, block));
                self.frames.push(data.to_vec());
            }
            TxFrame::Symbols(symbols) => {
                self.symbols.push(symbols.to_vec());
            }
        }
        self.in_flight = true;
        Ok(())
    }
}

/// Channel factory with switchable failures
#[derive(Debug)]
pub struct MockFactory {
    pub resolution_hz: u32,
    pub fail_dma: bool,
    pub fail_all: bool,
    pub fail_enable: bool,
    pub attempts: Vec<ChannelConfig>,
}

impl Default for MockFactory {
    fn default() -> Self {
        Self {
            resolution_hz: RESOLUTION_HZ,
            fail_dma: false,
            fail_all: false,
            fail_enable: false,
            attempts: Vec::new(),
        }
    }
}

impl TxChannelFactory for MockFactory {
    type Channel = MockChannel;

    fn resolution_hz(&self) -> u32 {
        self.resolution_hz
    }

    fn create(&mut self, config: &ChannelConfig) -> Result<MockChannel, TxError> {
        self.attempts.push(*config);
        if self.fail_all || (config.with_dma && self.fail_dma) {
            return Err(TxError::Driver(-1));
        }
        Ok(MockChannel {
            config: Some(*config),
            fail_enable: self.fail_enable,
            ..MockChannel::default()
        })
    }
}

/// Drive a streaming encoder the way the peripheral does, `block` symbols at a time
pub fn stream(data: &[u8], encoder: &StreamEncoder, block: usize) -> Vec<Symbol> {
    let mut out = Vec::new();
    let mut buffer = vec![Symbol::ZERO; block];
    let mut written = 0;
    loop {
        let step = encoder.encode(data, written, &mut buffer);
        out.extend_from_slice(&buffer[..step.written]);
        written += step.written;
        if step.done {
            return out;
        }
        assert!(step.written > 0, "encoder stalled");
    }
}
