//! Byte to symbol expansion
//!
//! Every byte expands to eight bit symbols, most significant bit first,
//! followed by one reset symbol per frame. Two strategies exist: a streaming
//! encoder called by the transmit peripheral whenever its symbol memory has
//! room, and a bulk encoder that expands a whole frame up front. Both emit
//! the same sequence for the same timings.

use alloc::vec::Vec;

use crate::error::StripError;
use crate::timing::{LedTimings, Symbol};

/// Symbols emitted per data byte
pub const SYMBOLS_PER_BYTE: usize = 8;

/// Result of one streaming encoder call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStep {
    /// Symbols written into the output slice
    pub written: usize,
    /// Whether the frame is complete
    pub done: bool,
}

/// Streaming encoder state shared with the transmit callback
#[derive(Debug, Clone, Copy)]
pub struct StreamEncoder {
    timings: LedTimings,
}

impl StreamEncoder {
    pub const fn new(timings: LedTimings) -> Self {
        Self { timings }
    }

    pub const fn timings(&self) -> &LedTimings {
        &self.timings
    }

    /// Fill `out` with the next symbols of `data`
    ///
    /// `symbols_written` is the number of symbols already emitted for this
    /// frame. At most one byte is encoded per call; the peripheral calls back
    /// until `done` is reported.
    pub fn encode(&self, data: &[u8], symbols_written: usize, out: &mut [Symbol]) -> EncodeStep {
        let index = symbols_written / SYMBOLS_PER_BYTE;

        if let Some(&byte) = data.get(index) {
            if out.len() < SYMBOLS_PER_BYTE {
                return EncodeStep {
                    written: 0,
                    done: false,
                };
            }

            encode_byte(byte, &self.timings, &mut out[..SYMBOLS_PER_BYTE]);
            let last = index + 1 == data.len();
            return EncodeStep {
                written: SYMBOLS_PER_BYTE,
                done: last && self.timings.reset.is_zero(),
            };
        }

        if self.timings.reset.is_zero() {
            return EncodeStep {
                written: 0,
                done: true,
            };
        }

        let Some(slot) = out.first_mut() else {
            return EncodeStep {
                written: 0,
                done: false,
            };
        };
        *slot = self.timings.reset;
        EncodeStep {
            written: 1,
            done: true,
        }
    }
}

#[inline]
fn encode_byte(byte: u8, timings: &LedTimings, out: &mut [Symbol]) {
    for (bit, symbol) in out.iter_mut().enumerate() {
        *symbol = timings.bit(byte & (0x80 >> bit) != 0);
    }
}

/// Number of symbols a bulk-encoded frame of `bytes` needs
pub fn bulk_symbol_count(bytes: usize, timings: &LedTimings) -> usize {
    bytes * SYMBOLS_PER_BYTE + usize::from(!timings.reset.is_zero())
}

/// Expand `data` into `out`, replacing its previous contents
///
/// The reset symbol is appended only when it is non-zero.
pub fn encode_bulk(
    data: &[u8],
    timings: &LedTimings,
    out: &mut Vec<Symbol>,
) -> Result<(), StripError> {
    let needed = bulk_symbol_count(data.len(), timings);
    out.clear();
    out.try_reserve_exact(needed)
        .map_err(|_| StripError::AllocationFailure {
            bytes: needed * core::mem::size_of::<Symbol>(),
        })?;

    for &byte in data {
        for bit in 0..SYMBOLS_PER_BYTE {
            out.push(timings.bit(byte & (0x80 >> bit) != 0));
        }
    }
    if !timings.reset.is_zero() {
        out.push(timings.reset);
    }
    Ok(())
}
