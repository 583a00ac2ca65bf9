//! Power transitions
//!
//! [`ValueTransition`] interpolates a single value over time and drives the
//! brightness filter. [`TransitionController`] plays the intro on power-on,
//! dissolves it into the running effect, and plays the outro on power-off.
//! While the outro runs the controller owns the strip: host frames are
//! discarded until a final black frame has been transmitted.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::canvas::Canvas;
use crate::color::{BLACK, Rgb, WHITE, blend_colors, scale_color};
use crate::effect::spread8;
use crate::engine::EffectEngine;
use crate::layout::PixelBuffer;
use crate::math8::{blend8, hash32, progress8, scale8};
use crate::palette::ResolvedPalette;

/// Blends two values of type `T` using a progress value (0-255)
pub type ValueBlender<T> = fn(T, T, u8) -> T;

/// Transition for values of type `T`
#[derive(Debug, Clone)]
pub struct ValueTransition<T: Copy> {
    blend: ValueBlender<T>,
    current: T,
    /// Value at the start of transition
    source: T,
    /// Target value (None if no transition in progress)
    target: Option<T>,
    duration: Duration,
    start_time: Instant,
}

impl<T: Copy> ValueTransition<T> {
    pub const fn new(initial: T, blend: ValueBlender<T>) -> Self {
        Self {
            blend,
            current: initial,
            source: initial,
            target: None,
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
        }
    }

    pub const fn current(&self) -> T {
        self.current
    }

    pub const fn target(&self) -> T {
        match self.target {
            Some(target) => target,
            None => self.current,
        }
    }

    pub const fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Move to `value`, immediately when `duration` is zero
    pub fn set(&mut self, value: T, duration: Duration, now: Instant) {
        self.start_time = now;
        if duration.as_ticks() == 0 {
            self.current = value;
            self.source = value;
            self.target = None;
            self.duration = duration;
        } else {
            self.source = self.current;
            self.target = Some(value);
            self.duration = duration;
        }
    }

    /// Advance the interpolation to `now`
    pub fn tick(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            self.current = target;
            self.source = target;
            self.target = None;
            return;
        }

        let progress = progress8(elapsed, self.duration);
        self.current = (self.blend)(self.source, target, progress);
    }
}

impl ValueTransition<u8> {
    pub const fn new_u8(initial: u8) -> Self {
        Self::new(initial, blend8)
    }
}

impl ValueTransition<Rgb> {
    pub const fn new_rgb(initial: Rgb) -> Self {
        Self::new(initial, blend_colors)
    }
}

/// Raw style id meaning "inherit the root default"
pub const STYLE_INHERIT: u8 = 0;

const STYLE_ID_NONE: u8 = 1;
const STYLE_ID_WIPE: u8 = 2;
const STYLE_ID_FADE: u8 = 3;
const STYLE_ID_CENTER: u8 = 4;
const STYLE_ID_GLITTER: u8 = 5;

/// Default intro and outro length
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(1000);
/// Default length of the intro to effect crossfade
pub const DEFAULT_DISSOLVE_DURATION: Duration = Duration::from_millis(1500);

/// Width of the per-pixel crossfade window, as a share of the dissolve
const DISSOLVE_SOFTNESS: f32 = 0.2;

/// Intro / outro animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TransitionStyle {
    /// No animation
    #[default]
    None = STYLE_ID_NONE,
    /// Directional reveal with a soft edge
    Wipe = STYLE_ID_WIPE,
    /// Whole segment brightens together
    Fade = STYLE_ID_FADE,
    /// Reveal from both ends toward the middle
    Center = STYLE_ID_CENTER,
    /// Pixels appear in a fixed scattered order
    Glitter = STYLE_ID_GLITTER,
}

impl TransitionStyle {
    /// Map a raw style id; [`STYLE_INHERIT`] and unknown ids give `None`
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            STYLE_ID_NONE => Self::None,
            STYLE_ID_WIPE => Self::Wipe,
            STYLE_ID_FADE => Self::Fade,
            STYLE_ID_CENTER => Self::Center,
            STYLE_ID_GLITTER => Self::Glitter,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wipe => "wipe",
            Self::Fade => "fade",
            Self::Center => "center",
            Self::Glitter => "glitter",
        }
    }
}

/// Fully resolved transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub style: TransitionStyle,
    pub duration: Duration,
    /// Paint with the active palette instead of the segment color
    pub use_palette: bool,
}

impl TransitionSpec {
    pub const fn is_animated(&self) -> bool {
        !matches!(self.style, TransitionStyle::None) && self.duration.as_ticks() != 0
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            style: TransitionStyle::None,
            duration: DEFAULT_TRANSITION_DURATION,
            use_palette: false,
        }
    }
}

/// Per-segment transition settings
///
/// A style of [`STYLE_INHERIT`] or a duration of `0.0` seconds leaves the
/// root default in effect. Overrides are resolved on every frame, so root
/// defaults changed later still reach segments that never overrode them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionOverride {
    pub style: u8,
    pub duration_secs: f32,
    pub use_palette: Option<bool>,
}

impl TransitionOverride {
    pub const UNSET: Self = Self {
        style: STYLE_INHERIT,
        duration_secs: 0.0,
        use_palette: None,
    };

    pub const fn style(&self) -> Option<TransitionStyle> {
        TransitionStyle::from_raw(self.style)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn duration(&self) -> Option<Duration> {
        if self.duration_secs > 0.0 {
            Some(Duration::from_millis(
                libm::roundf(self.duration_secs * 1000.0) as u64,
            ))
        } else {
            None
        }
    }

    /// Apply this override on top of `root`
    pub fn resolve(&self, root: TransitionSpec) -> TransitionSpec {
        TransitionSpec {
            style: self.style().unwrap_or(root.style),
            duration: self.duration().unwrap_or(root.duration),
            use_palette: self.use_palette.unwrap_or(root.use_palette),
        }
    }
}

impl Default for TransitionOverride {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Root transition settings shared by every segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDefaults {
    pub intro: TransitionSpec,
    /// Outro style, the intro played backward when unset
    pub outro_style: Option<TransitionStyle>,
    pub outro_duration: Duration,
    /// Crossfade from the final intro frame into the effect
    pub dissolve: Duration,
    /// Brightness ramp on power-on when no intro is configured
    pub fade_in: Duration,
}

impl Default for TransitionDefaults {
    fn default() -> Self {
        Self {
            intro: TransitionSpec::default(),
            outro_style: None,
            outro_duration: DEFAULT_TRANSITION_DURATION,
            dissolve: DEFAULT_DISSOLVE_DURATION,
            fade_in: DEFAULT_TRANSITION_DURATION,
        }
    }
}

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Intro,
    Dissolve,
    Outro,
    /// Outro finished, black frame waiting to be transmitted
    OutroFlush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Intro { start: Instant },
    Dissolve { start: Instant },
    /// Start is taken from the first rendered outro frame
    Outro { start: Option<Instant> },
    OutroFlush,
}

/// What the caller has to do after a power-on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerOnAction {
    /// Intro animation started
    Intro,
    /// Ramp brightness from zero over the given time
    FadeIn(Duration),
    /// Show the effect right away
    Immediate,
}

pub struct TransitionController {
    defaults: TransitionDefaults,
    intro_override: TransitionOverride,
    outro_override: TransitionOverride,
    state: State,
    /// Last intro frame, crossfaded into the effect
    snapshot: Vec<u8>,
}

impl TransitionController {
    pub const fn new(defaults: TransitionDefaults) -> Self {
        Self {
            defaults,
            intro_override: TransitionOverride::UNSET,
            outro_override: TransitionOverride::UNSET,
            state: State::Idle,
            snapshot: Vec::new(),
        }
    }

    pub const fn defaults(&self) -> &TransitionDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: TransitionDefaults) {
        self.defaults = defaults;
    }

    pub fn set_intro_override(&mut self, value: TransitionOverride) {
        self.intro_override = value;
    }

    pub fn set_outro_override(&mut self, value: TransitionOverride) {
        self.outro_override = value;
    }

    /// Intro as it applies right now
    pub fn resolved_intro(&self) -> TransitionSpec {
        self.intro_override.resolve(self.defaults.intro)
    }

    /// Outro as it applies right now
    ///
    /// Without an explicit outro style anywhere, the intro style is used.
    pub fn resolved_outro(&self) -> TransitionSpec {
        let intro = self.resolved_intro();
        let root = TransitionSpec {
            style: self.defaults.outro_style.unwrap_or(intro.style),
            duration: self.defaults.outro_duration,
            use_palette: intro.use_palette,
        };
        self.outro_override.resolve(root)
    }

    pub const fn phase(&self) -> TransitionPhase {
        match self.state {
            State::Idle => TransitionPhase::Idle,
            State::Intro { .. } => TransitionPhase::Intro,
            State::Dissolve { .. } => TransitionPhase::Dissolve,
            State::Outro { .. } => TransitionPhase::Outro,
            State::OutroFlush => TransitionPhase::OutroFlush,
        }
    }

    pub const fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Whether host frames must be discarded
    pub const fn is_intercepting(&self) -> bool {
        matches!(self.state, State::Outro { .. } | State::OutroFlush)
    }

    /// Start the intro, abandoning a running outro
    pub fn power_on(&mut self, now: Instant) -> PowerOnAction {
        if self.is_intercepting() {
            #[cfg(feature = "esp32-log")]
            println!("[TransitionController.power_on] outro aborted");
        }
        self.abort();

        let intro = self.resolved_intro();
        if intro.is_animated() {
            #[cfg(feature = "esp32-log")]
            println!("[TransitionController.power_on] intro {}", intro.style.as_str());
            self.state = State::Intro { start: now };
            return PowerOnAction::Intro;
        }
        if self.defaults.fade_in.as_ticks() != 0 {
            return PowerOnAction::FadeIn(self.defaults.fade_in);
        }
        PowerOnAction::Immediate
    }

    /// Start the outro
    ///
    /// Without an outro animation the controller goes straight to the final
    /// black frame.
    pub fn power_off(&mut self) {
        self.release_snapshot();
        self.state = if self.resolved_outro().is_animated() {
            State::Outro { start: None }
        } else {
            State::OutroFlush
        };
        #[cfg(feature = "esp32-log")]
        println!("[TransitionController.power_off] {:?}", self.phase());
    }

    /// Drop any running transition
    pub fn abort(&mut self) {
        self.release_snapshot();
        self.state = State::Idle;
    }

    /// The black frame went out, hand the strip back to the host
    pub fn complete_flush(&mut self) {
        if self.state == State::OutroFlush {
            #[cfg(feature = "esp32-log")]
            println!("[TransitionController.complete_flush] outro finished");
            self.state = State::Idle;
        }
    }

    fn release_snapshot(&mut self) {
        self.snapshot.clear();
        self.snapshot.shrink_to_fit();
    }

    /// Produce the next frame into `pixels`
    pub fn render(&mut self, now: Instant, engine: &mut EffectEngine, pixels: &mut PixelBuffer) {
        match self.state {
            State::Idle => engine.render(now, pixels),
            State::Intro { start } => self.render_intro(now, start, engine, pixels),
            State::Dissolve { start } => {
                engine.render(now, pixels);
                self.blend_snapshot(now, start, pixels);
            }
            State::Outro { start } => {
                let start = start.unwrap_or(now);
                self.state = State::Outro { start: Some(start) };
                self.render_outro(now, start, engine, pixels);
            }
            State::OutroFlush => pixels.fill_black(),
        }
    }

    fn render_intro(
        &mut self,
        now: Instant,
        start: Instant,
        engine: &EffectEngine,
        pixels: &mut PixelBuffer,
    ) {
        let spec = self.resolved_intro();
        let elapsed = now.saturating_duration_since(start);
        let progress = progress_of(elapsed, spec.duration);

        let params = engine.params();
        let paint = if spec.use_palette {
            engine.palette()
        } else if params.color == BLACK {
            ResolvedPalette::Solid(WHITE)
        } else {
            ResolvedPalette::Solid(params.color)
        };
        let segment = engine.segment(pixels.len());
        let mut canvas = Canvas::new(pixels, segment, params.mirror);
        let len = canvas.len();
        for i in 0..len {
            let alpha = mask_alpha(spec.style, i, len, progress, params.intensity);
            let color = paint.color_at(spread8(i, len), 255);
            canvas.set(i, scale_color(color, alpha));
            canvas.set_white(i, scale8(params.white, alpha));
        }

        if elapsed < spec.duration {
            return;
        }

        let dissolve = self.defaults.dissolve;
        let bytes = pixels.as_bytes();
        self.snapshot.clear();
        let captured = dissolve.as_ticks() != 0
            && self.snapshot.try_reserve_exact(bytes.len()).is_ok();
        if captured {
            self.snapshot.extend_from_slice(bytes);
            self.state = State::Dissolve { start: now };
        } else {
            self.state = State::Idle;
        }
        #[cfg(feature = "esp32-log")]
        println!("[TransitionController.render_intro] intro done, {:?}", self.phase());
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn blend_snapshot(&mut self, now: Instant, start: Instant, pixels: &mut PixelBuffer) {
        let window = self.defaults.dissolve.as_millis().max(1) as f32;
        let elapsed = now.saturating_duration_since(start).as_millis() as f32;
        let progress = elapsed / window * (1.0 + DISSOLVE_SOFTNESS);
        let seed = start.as_millis() as u32;
        let stride = pixels.bytes_per_pixel();
        let bytes = pixels.as_bytes_mut();

        for (i, (pixel, intro)) in bytes
            .chunks_exact_mut(stride)
            .zip(self.snapshot.chunks_exact(stride))
            .enumerate()
        {
            let threshold = (hash32((i as u32).wrapping_add(seed)) & 0xFF) as f32 / 255.0;
            let mix = ((progress - threshold) / DISSOLVE_SOFTNESS).clamp(0.0, 1.0);
            let amount = (mix * 255.0) as u8;
            for (byte, &from) in pixel.iter_mut().zip(intro) {
                *byte = blend8(from, *byte, amount);
            }
        }

        if progress >= 1.0 + DISSOLVE_SOFTNESS {
            self.release_snapshot();
            self.state = State::Idle;
        }
    }

    fn render_outro(
        &mut self,
        now: Instant,
        start: Instant,
        engine: &mut EffectEngine,
        pixels: &mut PixelBuffer,
    ) {
        let spec = self.resolved_outro();
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= spec.duration {
            pixels.fill_black();
            self.state = State::OutroFlush;
            return;
        }

        engine.render(now, pixels);
        let progress = 1.0 - progress_of(elapsed, spec.duration);
        let params = *engine.params();
        let segment = engine.segment(pixels.len());
        let mut canvas = Canvas::new(pixels, segment, params.mirror);
        let len = canvas.len();
        for i in 0..len {
            let alpha = mask_alpha(spec.style, i, len, progress, params.intensity);
            if alpha == 255 {
                continue;
            }
            let color = canvas.get(i);
            canvas.set(i, scale_color(color, alpha));
            let white = canvas.white(i);
            canvas.set_white(i, scale8(white, alpha));
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn progress_of(elapsed: Duration, duration: Duration) -> f32 {
    let total = duration.as_millis();
    if total == 0 {
        return 1.0;
    }
    (elapsed.as_millis() as f32 / total as f32).min(1.0)
}

/// Visibility (0-255) of logical pixel `i` at `progress` through a reveal
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn mask_alpha(style: TransitionStyle, i: usize, len: usize, progress: f32, intensity: u8) -> u8 {
    match style {
        TransitionStyle::None => 255,
        TransitionStyle::Fade => (progress * 255.0) as u8,
        TransitionStyle::Glitter => {
            let threshold = (progress * 255.0) as u8;
            let order = (i.wrapping_mul(33).wrapping_add(i.wrapping_mul(i)) & 0xFF) as u8;
            if threshold >= order { 255 } else { 0 }
        }
        TransitionStyle::Wipe => wipe_alpha(i, len, progress, intensity),
        TransitionStyle::Center => {
            let distance = i.min(len - 1 - i);
            wipe_alpha(distance, len.div_ceil(2), progress, intensity)
        }
    }
}

/// Soft-edged wipe, `intensity` widens the edge up to half the length
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn wipe_alpha(i: usize, len: usize, progress: f32, intensity: u8) -> u8 {
    let blur = (len as f32 * (f32::from(intensity) / 255.0) * 0.5) as usize;
    let exact_lead = progress * (len + blur) as f32;
    let position = i as f32;

    if position < exact_lead - blur as f32 {
        255
    } else if position < exact_lead && blur > 0 {
        let alpha = ((exact_lead - position) / blur as f32).clamp(0.0, 1.0);
        (alpha * 255.0) as u8
    } else {
        0
    }
}
