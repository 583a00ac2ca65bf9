#![no_std]

extern crate alloc;

pub mod autotune;
pub mod bounds;
pub mod canvas;
pub mod channel;
pub mod color;
pub mod driver;
pub mod effect;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod filter;
pub mod frame_scheduler;
pub mod intent;
pub mod layout;
pub mod light;
pub mod math8;
pub mod palette;
pub mod timing;
pub mod transition;
pub mod tx;

pub use autotune::{AutotuneMode, EffectPresets};
pub use bounds::SegmentBounds;
pub use driver::{FrameSource, SlotState, Status, StripConfig, StripDriver, WriteOutcome};
pub use effect::{EffectId, EffectSlot};
pub use engine::{EffectEngine, EngineConfig, SegmentParams};
pub use error::{StripError, TxError};
pub use filter::BrightnessRange;
pub use frame_scheduler::FrameScheduler;
pub use intent::{
    ControlIntent, IntentChannel, IntentProcessor, IntentReceiver, IntentSender, StripStateIntent,
};
pub use layout::{ByteOrder, ChannelLayout, PixelBuffer, WhiteChannel};
pub use light::{Diagnostics, Light, LightConfig};
pub use timing::{Chipset, LedTimings, Symbol};
pub use transition::{TransitionDefaults, TransitionOverride, TransitionSpec, TransitionStyle};
pub use tx::{ChannelConfig, EncoderKind, HardwareVariant, TxChannel, TxChannelFactory, TxFrame};

pub use color::{Hsv, Rgb};
pub use math8::{U8Adjuster, ease_in_out_quad};
pub use embassy_time::{Duration, Instant};
