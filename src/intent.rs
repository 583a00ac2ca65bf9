//! Control intents
//!
//! The control layer queues intents from any context. The light drains the
//! queue at the top of every service tick and applies the intents in the
//! order they were sent.

use crate::bounds::SegmentBounds;
use crate::channel::{Channel, Receiver, Sender};
use crate::color::Rgb;
use crate::transition::TransitionOverride;

/// Requested change of the light state, unset fields are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StripStateIntent {
    pub power: Option<bool>,
    pub brightness: Option<u8>,
    pub color: Option<Rgb>,
    pub white: Option<u8>,
    /// Raw effect id
    pub effect: Option<u8>,
    pub speed: Option<u8>,
    pub intensity: Option<u8>,
    pub palette: Option<u8>,
    pub mirror: Option<bool>,
    pub autotune: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlIntent {
    /// Change the light state
    State(StripStateIntent),
    /// Move the segment, `None` covers the whole strip
    Bounds(Option<SegmentBounds>),
    /// Replace the segment intro override
    IntroOverride(TransitionOverride),
    /// Replace the segment outro override
    OutroOverride(TransitionOverride),
}

pub type IntentSender<'a, const SIZE: usize> = Sender<'a, ControlIntent, SIZE>;

pub type IntentReceiver<'a, const SIZE: usize> = Receiver<'a, ControlIntent, SIZE>;

pub type IntentChannel<const SIZE: usize> = Channel<ControlIntent, SIZE>;

/// Intents drained from the queue in one tick, in arrival order
pub type PendingIntents<const SIZE: usize> = heapless::Vec<ControlIntent, SIZE>;

pub struct IntentProcessor<'a, const SIZE: usize> {
    intents: IntentReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> IntentProcessor<'a, SIZE> {
    pub const fn new(intents: IntentReceiver<'a, SIZE>) -> Self {
        Self { intents }
    }

    /// Drain at most one queue's worth of intents
    ///
    /// Intents keep their arrival order, so applying them one by one lets a
    /// later intent override an earlier one. Anything queued while draining
    /// waits for the next tick.
    pub fn process_pending(&mut self) -> PendingIntents<SIZE> {
        let mut pending = PendingIntents::new();
        while !pending.is_full() {
            let Ok(intent) = self.intents.try_receive() else {
                break;
            };
            // Cannot fail, fullness checked above
            let _ = pending.push(intent);
        }
        pending
    }
}
