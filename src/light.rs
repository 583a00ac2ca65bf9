//! Light orchestrator
//!
//! Owns the strip driver, the effect engine, the transition controller and
//! the brightness filter. The host framework drives it with
//! [`Light::service`] from its control loop, and may submit its own frames
//! through [`SmartLedsWrite`].

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;
use smart_leds::SmartLedsWrite;

use crate::bounds::SegmentBounds;
use crate::color::Rgb;
use crate::driver::{FrameSource, Status, StripConfig, StripDriver, WriteOutcome};
use crate::engine::{EffectEngine, EngineConfig, SegmentParams};
use crate::error::StripError;
use crate::filter::{BrightnessFilter, BrightnessRange, Filter};
use crate::frame_scheduler::{DEFAULT_FRAME_DURATION, FrameScheduler};
use crate::intent::{ControlIntent, IntentProcessor, IntentReceiver, StripStateIntent};
use crate::layout::PixelBuffer;
use crate::transition::{
    PowerOnAction, TransitionController, TransitionDefaults, TransitionOverride, TransitionPhase,
};
use crate::tx::{TxChannel, TxChannelFactory};

/// Reports free heap memory for diagnostics
pub type FreeMemoryProbe = fn() -> usize;

/// Configuration for the light
#[derive(Debug, Clone, Copy)]
pub struct LightConfig {
    pub strip: StripConfig,
    pub engine: EngineConfig,
    pub transitions: TransitionDefaults,
    /// User brightness at startup
    pub brightness: u8,
    pub brightness_range: BrightnessRange,
    /// Ramp length of user brightness changes
    pub brightness_duration: Duration,
    /// Effect update interval
    pub frame_duration: Duration,
    pub free_memory: Option<FreeMemoryProbe>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            strip: StripConfig::default(),
            engine: EngineConfig::default(),
            transitions: TransitionDefaults::default(),
            brightness: 255,
            brightness_range: BrightnessRange::default(),
            brightness_duration: Duration::from_millis(300),
            frame_duration: DEFAULT_FRAME_DURATION,
            free_memory: None,
        }
    }
}

/// Runtime health and timing snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    /// Mean interval between rendered frames
    pub frame_time_mean: Duration,
    /// Mean deviation from the configured interval
    pub jitter: Duration,
    /// Frames rendered since setup
    pub frames: u32,
    /// Frames handed to the peripheral since setup
    pub frames_sent: u32,
    /// Bytes held by the strip buffers
    pub buffer_bytes: usize,
    /// Free heap, when a probe is configured
    pub free_bytes: Option<usize>,
    pub status: Status,
}

pub struct Light<'a, C: TxChannel, const N: usize> {
    driver: StripDriver<C>,
    engine: EffectEngine,
    transition: TransitionController,
    brightness: BrightnessFilter,
    scheduler: FrameScheduler,
    intents: Option<IntentProcessor<'a, N>>,
    powered: bool,
    user_brightness: u8,
    brightness_duration: Duration,
    free_memory: Option<FreeMemoryProbe>,
}

impl<'a, C: TxChannel, const N: usize> Light<'a, C, N> {
    /// Set up the strip and the rendering pipeline
    ///
    /// The light starts powered off.
    pub fn setup<F>(
        config: &LightConfig,
        factory: &mut F,
        intents: Option<IntentReceiver<'a, N>>,
    ) -> Result<Self, StripError>
    where
        F: TxChannelFactory<Channel = C>,
    {
        let driver = StripDriver::setup(&config.strip, factory)?;
        let mut brightness = BrightnessFilter::new(0, config.brightness_range);
        brightness.set(config.brightness, Duration::from_ticks(0), Instant::from_ticks(0));

        Ok(Self {
            driver,
            engine: EffectEngine::new(&config.engine),
            transition: TransitionController::new(config.transitions),
            brightness,
            scheduler: FrameScheduler::new(config.frame_duration),
            intents: intents.map(IntentProcessor::new),
            powered: false,
            user_brightness: config.brightness,
            brightness_duration: config.brightness_duration,
            free_memory: config.free_memory,
        })
    }

    /// Run one control loop iteration
    ///
    /// Applies queued intents, retries a deferred frame and renders the next
    /// frame when one is due. Returns the outcome of any frame written.
    pub fn service(&mut self, now: Instant) -> Option<WriteOutcome> {
        self.process_intents(now);

        if let Some(outcome) = self.driver.service(now) {
            self.handle_outcome(outcome);
            return Some(outcome);
        }

        if !(self.powered || self.transition.is_active()) || !self.scheduler.is_due(now) {
            return None;
        }
        self.scheduler.tick(now);

        let pixels = self.driver.pixels_mut();
        self.transition.render(now, &mut self.engine, pixels);
        self.brightness.tick(now);
        self.brightness.apply(pixels);

        let outcome = self.driver.write_state(FrameSource::Internal, now);
        self.handle_outcome(outcome);
        Some(outcome)
    }

    /// How long the host may sleep before the next [`Light::service`]
    ///
    /// Zero when a frame is already due. While the light is off and idle there
    /// is nothing to render, so the result is the frame interval unless a
    /// deferred frame waits.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        let frame = if self.powered || self.transition.is_active() {
            self.scheduler.time_until_next(now)
        } else {
            self.scheduler.frame_duration()
        };
        self.driver
            .time_until_retry(now)
            .map_or(frame, |retry| retry.min(frame))
    }

    fn handle_outcome(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Shown if self.transition.phase() == TransitionPhase::OutroFlush => {
                self.transition.complete_flush();
                self.driver.set_intercepting(false);
            }
            #[cfg(feature = "esp32-log")]
            WriteOutcome::Dropped(error) => {
                println!("[Light.service] frame dropped: {:?}", error);
            }
            _ => {}
        }
    }

    fn process_intents(&mut self, now: Instant) {
        let Some(processor) = self.intents.as_mut() else {
            return;
        };
        for intent in processor.process_pending() {
            self.apply_intent(intent, now);
        }
    }

    fn apply_intent(&mut self, intent: ControlIntent, now: Instant) {
        match intent {
            ControlIntent::State(state) => self.apply_state(&state, now),
            ControlIntent::Bounds(bounds) => self.engine.set_bounds(bounds),
            ControlIntent::IntroOverride(value) => self.transition.set_intro_override(value),
            ControlIntent::OutroOverride(value) => self.transition.set_outro_override(value),
        }
    }

    /// Apply one state intent
    ///
    /// Autotune goes after the effect parameters, so enabling it in the same
    /// intent as a manual value snaps back to the effect defaults.
    fn apply_state(&mut self, state: &StripStateIntent, now: Instant) {
        if let Some(effect) = state.effect {
            self.engine.activate(effect);
        }
        if let Some(speed) = state.speed {
            self.engine.set_speed(speed);
        }
        if let Some(intensity) = state.intensity {
            self.engine.set_intensity(intensity);
        }
        if let Some(palette) = state.palette {
            self.engine.set_palette(palette);
        }
        if let Some(mirror) = state.mirror {
            self.engine.set_mirror(mirror);
        }
        if let Some(autotune) = state.autotune {
            self.engine.set_autotune(autotune);
        }
        if let Some(color) = state.color {
            self.engine.set_color(color);
        }
        if let Some(white) = state.white {
            self.engine.set_white(white);
        }
        if let Some(brightness) = state.brightness {
            self.set_brightness(brightness, now);
        }
        match state.power {
            Some(true) => self.power_on(now),
            Some(false) => self.power_off(),
            None => {}
        }
    }

    /// Show the pixel buffer as written by the host
    ///
    /// Discarded while the outro owns the strip.
    pub fn write_state(&mut self, now: Instant) -> WriteOutcome {
        self.driver.write_state(FrameSource::Host, now)
    }

    /// Turn on, starting the intro or the brightness fade-in
    pub fn power_on(&mut self, now: Instant) {
        if self.powered && !self.transition.is_intercepting() {
            return;
        }
        self.powered = true;
        self.driver.set_intercepting(false);

        match self.transition.power_on(now) {
            PowerOnAction::FadeIn(duration) => {
                self.brightness
                    .set_uncorrected(0, Duration::from_ticks(0), now);
                self.brightness.set(self.user_brightness, duration, now);
            }
            PowerOnAction::Intro | PowerOnAction::Immediate => {
                self.brightness
                    .set(self.user_brightness, Duration::from_ticks(0), now);
            }
        }
        #[cfg(feature = "esp32-log")]
        println!("[Light.power_on] {:?}", self.transition.phase());
    }

    /// Turn off through the outro
    ///
    /// Host frames are discarded until the final black frame is transmitted.
    pub fn power_off(&mut self) {
        if !self.powered {
            return;
        }
        self.powered = false;
        self.transition.power_off();
        self.driver.set_intercepting(true);
    }

    /// Copy host colors into the strip and show them at `now`
    ///
    /// Extra colors beyond the strip length are ignored. Frames submitted
    /// while the outro runs are dropped silently.
    pub fn write_colors<T, I>(&mut self, iterator: T, now: Instant) -> Result<(), StripError>
    where
        T: IntoIterator<Item = I>,
        I: Into<Rgb>,
    {
        if self.driver.is_intercepting() {
            return Ok(());
        }
        let pixels = self.driver.pixels_mut();
        let len = pixels.len();
        for (i, color) in iterator.into_iter().take(len).enumerate() {
            pixels.pixel(i).set(color.into());
        }

        match self.driver.write_state(FrameSource::Host, now) {
            WriteOutcome::Dropped(error) => Err(error),
            WriteOutcome::Shown | WriteOutcome::Deferred | WriteOutcome::Discarded => Ok(()),
        }
    }

    pub const fn is_on(&self) -> bool {
        self.powered
    }

    pub fn set_brightness(&mut self, brightness: u8, now: Instant) {
        self.user_brightness = brightness;
        self.brightness.set(brightness, self.brightness_duration, now);
    }

    pub const fn brightness(&self) -> u8 {
        self.user_brightness
    }

    pub fn set_effect(&mut self, effect: u8) {
        self.engine.activate(effect);
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.engine.set_speed(speed);
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.engine.set_intensity(intensity);
    }

    pub fn set_palette(&mut self, palette: u8) {
        self.engine.set_palette(palette);
    }

    pub fn set_mirror(&mut self, mirror: bool) {
        self.engine.set_mirror(mirror);
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.engine.set_color(color);
    }

    pub fn set_white(&mut self, white: u8) {
        self.engine.set_white(white);
    }

    pub fn set_autotune(&mut self, enabled: bool) {
        self.engine.set_autotune(enabled);
    }

    pub fn set_bounds(&mut self, bounds: Option<SegmentBounds>) {
        self.engine.set_bounds(bounds);
    }

    pub fn set_intro_override(&mut self, value: TransitionOverride) {
        self.transition.set_intro_override(value);
    }

    pub fn set_outro_override(&mut self, value: TransitionOverride) {
        self.transition.set_outro_override(value);
    }

    pub fn set_transition_defaults(&mut self, defaults: TransitionDefaults) {
        self.transition.set_defaults(defaults);
    }

    pub const fn params(&self) -> &SegmentParams {
        self.engine.params()
    }

    pub const fn engine(&self) -> &EffectEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EffectEngine {
        &mut self.engine
    }

    pub const fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub const fn driver(&self) -> &StripDriver<C> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut StripDriver<C> {
        &mut self.driver
    }

    pub const fn pixels(&self) -> &PixelBuffer {
        self.driver.pixels()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let stats = self.scheduler.stats();
        Diagnostics {
            frame_time_mean: Duration::from_micros(u64::from(stats.mean_us)),
            jitter: Duration::from_micros(u64::from(stats.jitter_us)),
            frames: stats.frames,
            frames_sent: self.driver.frames_sent(),
            buffer_bytes: self.driver.buffer_bytes(),
            free_bytes: self.free_memory.map(|probe| probe()),
            status: self.driver.status(),
        }
    }
}

impl<C: TxChannel, const N: usize> SmartLedsWrite for Light<'_, C, N> {
    type Error = StripError;
    type Color = Rgb;

    /// Copy host colors into the strip and show them, throttled against the
    /// current time
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.write_colors(iterator, Instant::now())
    }
}
