mod tests {
    use embassy_time::Instant;
    use myrtio_strip_composer::palette::{PALETTE_FIRE, PALETTE_ICE, PALETTE_RAINBOW, ResolvedPalette, table};
    use myrtio_strip_composer::{
        ByteOrder, ChannelLayout, EffectEngine, EffectId, EngineConfig, PixelBuffer, Rgb,
        SegmentBounds, SegmentParams, WhiteChannel,
    };

    const LEN: usize = 23;

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(LEN, ChannelLayout::new(ByteOrder::Grb, WhiteChannel::None)).unwrap()
    }

    fn engine(effect: EffectId, mirror: bool, bounds: Option<SegmentBounds>) -> EffectEngine {
        EffectEngine::new(&EngineConfig {
            params: SegmentParams {
                effect: effect as u8,
                mirror,
                color: Rgb::new(200, 40, 10),
                ..SegmentParams::default()
            },
            bounds,
            ..EngineConfig::default()
        })
    }

    fn assert_mirrored(effect: EffectId, bounds: SegmentBounds) {
        let mut plain = engine(effect, false, Some(bounds));
        let mut mirrored = engine(effect, true, Some(bounds));
        let mut plain_pixels = buffer();
        let mut mirrored_pixels = buffer();

        for frame in 0..40 {
            let now = Instant::from_millis(frame * 24);
            plain.render(now, &mut plain_pixels);
            mirrored.render(now, &mut mirrored_pixels);

            for i in 0..bounds.len() {
                let a = plain_pixels.color(bounds.start + i);
                let b = mirrored_pixels.color(bounds.start + bounds.len() - 1 - i);
                assert_eq!(a, b, "{effect:?} frame {frame} pixel {i}");
            }
            for outside in (0..bounds.start).chain(bounds.stop..LEN) {
                assert_eq!(mirrored_pixels.color(outside), Rgb::default());
            }
        }
    }

    #[test]
    fn test_mirror_reflects_every_effect() {
        for effect in EffectId::ALL {
            assert_mirrored(effect, SegmentBounds::full(LEN));
            assert_mirrored(effect, SegmentBounds::new(3, 17));
        }
    }

    #[test]
    fn test_unknown_effect_renders_static() {
        let mut engine = engine(EffectId::Blink, false, None);
        engine.activate(4);
        assert_eq!(engine.effect_id(), EffectId::Static);
        assert_eq!(engine.params().effect, 4);

        let mut pixels = buffer();
        engine.render(Instant::from_millis(0), &mut pixels);
        for i in 0..LEN {
            assert_eq!(pixels.color(i), Rgb::new(200, 40, 10));
        }
    }

    #[test]
    fn test_aux_cleared_on_switch_only() {
        let mut engine = engine(EffectId::Dissolve, false, None);
        let mut pixels = buffer();
        for frame in 0..4 {
            engine.render(Instant::from_millis(frame * 24), &mut pixels);
        }
        let lit = |pixels: &PixelBuffer| (0..LEN).filter(|&i| pixels.aux(i) != 0).count();
        let before = lit(&pixels);
        assert!(before > 0);

        engine.activate(EffectId::Dissolve as u8);
        engine.render(Instant::from_millis(96), &mut pixels);
        assert!(lit(&pixels) >= before);

        engine.activate(EffectId::Static as u8);
        engine.render(Instant::from_millis(120), &mut pixels);
        assert_eq!(lit(&pixels), 0);
    }

    #[test]
    fn test_dissolve_keeps_cycling_after_segment_shrinks() {
        let mut engine = engine(EffectId::Dissolve, false, None);
        engine.set_speed(255);
        let mut pixels = buffer();
        engine.render(Instant::from_millis(0), &mut pixels);
        assert!((0..LEN).any(|i| pixels.aux(i) != 0));

        engine.set_bounds(Some(SegmentBounds::new(0, 4)));
        let lit = |pixels: &PixelBuffer| (0..4).filter(|&i| pixels.aux(i) != 0).count();
        let mut filled = false;
        let mut cleared = false;
        for frame in 1..100 {
            engine.render(Instant::from_millis(frame * 24), &mut pixels);
            assert!((4..LEN).all(|i| pixels.aux(i) == 0));
            match lit(&pixels) {
                4 => filled = true,
                0 if filled => cleared = true,
                _ => {}
            }
        }
        assert!(filled && cleared);
    }

    #[test]
    fn test_bounds_change_clears_aux() {
        let mut engine = engine(EffectId::Dissolve, false, None);
        let mut pixels = buffer();
        engine.render(Instant::from_millis(0), &mut pixels);
        let lit = |pixels: &PixelBuffer| (0..LEN).filter(|&i| pixels.aux(i) != 0).count();
        let before = lit(&pixels);
        assert!(before > 0);

        // Same bounds keep the effect state
        engine.set_bounds(None);
        engine.render(Instant::from_millis(24), &mut pixels);
        assert!(lit(&pixels) >= before);

        engine.set_bounds(Some(SegmentBounds::new(10, 12)));
        engine.render(Instant::from_millis(48), &mut pixels);
        assert!(lit(&pixels) <= 2);
    }

    #[test]
    fn test_palette_locked_effect_ignores_palette() {
        let mut engine = engine(EffectId::Rainbow, false, None);
        engine.set_palette(PALETTE_ICE);
        assert_eq!(engine.palette(), ResolvedPalette::Table(table(PALETTE_RAINBOW)));

        let mut engine = self::engine(EffectId::RainbowCycle, false, None);
        engine.set_palette(PALETTE_ICE);
        assert_eq!(engine.palette(), ResolvedPalette::Table(table(PALETTE_ICE)));
    }

    #[test]
    fn test_effect_default_palette() {
        let mut engine = engine(EffectId::Fire, false, None);
        engine.set_autotune(false);
        engine.set_palette(0);
        assert_eq!(engine.palette(), ResolvedPalette::Table(table(PALETTE_FIRE)));

        engine.activate(EffectId::Static as u8);
        assert!(engine.palette().is_solid());
    }

    #[test]
    fn test_static_fills_white_channel() {
        let mut engine = engine(EffectId::Static, false, None);
        engine.set_white(77);
        let mut pixels =
            PixelBuffer::new(4, ChannelLayout::new(ByteOrder::Grb, WhiteChannel::Back)).unwrap();
        engine.render(Instant::from_millis(0), &mut pixels);
        for i in 0..4 {
            assert_eq!(pixels.white(i), 77);
        }
    }

    #[test]
    fn test_blink_duty_cycle() {
        let mut engine = engine(EffectId::Blink, false, None);
        engine.set_speed(255);
        engine.set_intensity(127);
        let mut pixels = buffer();

        engine.render(Instant::from_millis(1000), &mut pixels);
        assert_ne!(pixels.color(0), Rgb::default());
        engine.render(Instant::from_millis(1075), &mut pixels);
        assert_eq!(pixels.color(0), Rgb::default());
    }
}
