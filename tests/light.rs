mod common;

mod tests {
    use super::common::{MockChannel, MockFactory};
    use embassy_time::{Duration, Instant};
    use myrtio_strip_composer::transition::TransitionPhase;
    use myrtio_strip_composer::{
        ControlIntent, EffectId, EngineConfig, IntentChannel, Light, LightConfig, Rgb,
        SegmentParams, StripConfig, StripStateIntent, TransitionDefaults, TransitionSpec,
        TransitionStyle, WriteOutcome,
    };
    use smart_leds::SmartLedsWrite;

    const LEDS: usize = 8;
    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    fn config(transitions: TransitionDefaults) -> LightConfig {
        LightConfig {
            strip: StripConfig {
                num_leds: LEDS,
                ..StripConfig::default()
            },
            engine: EngineConfig {
                params: SegmentParams {
                    effect: EffectId::Static as u8,
                    color: RED,
                    ..SegmentParams::default()
                },
                ..EngineConfig::default()
            },
            transitions,
            ..LightConfig::default()
        }
    }

    fn fade_outro() -> TransitionDefaults {
        TransitionDefaults {
            outro_style: Some(TransitionStyle::Fade),
            outro_duration: Duration::from_millis(100),
            fade_in: Duration::from_millis(0),
            ..TransitionDefaults::default()
        }
    }

    fn setup(transitions: TransitionDefaults) -> Light<'static, MockChannel, 4> {
        let mut factory = MockFactory::default();
        Light::setup(&config(transitions), &mut factory, None).unwrap()
    }

    fn is_black(frame: &[u8]) -> bool {
        frame.iter().all(|&b| b == 0)
    }

    #[test]
    fn test_starts_off() {
        let mut light = setup(fade_outro());
        assert!(!light.is_on());
        assert_eq!(light.service(Instant::from_millis(0)), None);
        assert!(light.driver().channel().frames.is_empty());
    }

    #[test]
    fn test_renders_when_on() {
        let mut light = setup(fade_outro());
        light.power_on(Instant::from_millis(0));
        assert_eq!(light.service(Instant::from_millis(0)), Some(WriteOutcome::Shown));
        assert_eq!(light.driver().channel().frames[0][..3], [0, 255, 0]);

        // Next frame is not due yet
        assert_eq!(light.service(Instant::from_millis(10)), None);
        assert_eq!(light.service(Instant::from_millis(24)), Some(WriteOutcome::Shown));
        assert_eq!(light.diagnostics().frames, 2);
    }

    #[test]
    fn test_outro_owns_strip_until_black_frame() {
        let mut light = setup(fade_outro());
        light.power_on(Instant::from_millis(0));
        light.service(Instant::from_millis(0));

        light.power_off();
        assert!(light.driver().is_intercepting());

        let before = light.pixels().as_bytes().to_vec();
        assert_eq!(light.write_state(Instant::from_millis(10)), WriteOutcome::Discarded);
        light.write([Rgb::new(1, 2, 3); LEDS]).unwrap();
        assert_eq!(light.pixels().as_bytes(), &before[..]);

        let mut now = 24;
        while light.transition().phase() != TransitionPhase::Idle {
            light.service(Instant::from_millis(now));
            now += 24;
            assert!(now < 1000, "outro never finished");
        }
        assert!(!light.driver().is_intercepting());

        let frames = &light.driver().channel().frames;
        let black: Vec<usize> = frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| is_black(frame))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(black, vec![frames.len() - 1]);
        assert!(frames.iter().all(|frame| frame[..3] != [1, 2, 3]));

        // Strip stays dark and belongs to the host again
        let sent = frames.len();
        assert_eq!(light.service(Instant::from_millis(now + 100)), None);
        assert_eq!(light.write_state(Instant::from_millis(now + 100)), WriteOutcome::Shown);
        assert_eq!(light.driver().channel().frames.len(), sent + 1);
    }

    #[test]
    fn test_black_frame_retried_while_busy() {
        let mut light = setup(TransitionDefaults {
            fade_in: Duration::from_millis(0),
            ..TransitionDefaults::default()
        });
        light.power_on(Instant::from_millis(0));
        light.service(Instant::from_millis(0));

        light.power_off();
        assert_eq!(light.transition().phase(), TransitionPhase::OutroFlush);

        light.driver_mut().channel_mut().stuck = true;
        let outcome = light.service(Instant::from_millis(24));
        assert!(matches!(outcome, Some(WriteOutcome::Dropped(_))));
        assert!(light.driver().is_intercepting());
        assert_eq!(light.write_state(Instant::from_millis(30)), WriteOutcome::Discarded);

        light.driver_mut().channel_mut().stuck = false;
        assert_eq!(light.service(Instant::from_millis(48)), Some(WriteOutcome::Shown));
        assert!(!light.driver().is_intercepting());
        assert_eq!(light.transition().phase(), TransitionPhase::Idle);
        let frames = &light.driver().channel().frames;
        assert_eq!(frames.len(), 2);
        assert!(is_black(&frames[1]));
    }

    #[test]
    fn test_fade_in_without_intro() {
        let mut light = setup(TransitionDefaults {
            fade_in: Duration::from_millis(100),
            ..TransitionDefaults::default()
        });
        light.power_on(Instant::from_millis(0));
        light.service(Instant::from_millis(0));
        light.service(Instant::from_millis(48));
        light.service(Instant::from_millis(120));

        let frames = &light.driver().channel().frames;
        assert_eq!(frames.len(), 3);
        assert!(is_black(&frames[0]));
        assert!(frames[1][1] > 0 && frames[1][1] < 255);
        assert_eq!(frames[2][1], 255);
    }

    #[test]
    fn test_intro_plays_on_power_on() {
        let mut light = setup(TransitionDefaults {
            intro: TransitionSpec {
                style: TransitionStyle::Wipe,
                duration: Duration::from_millis(200),
                use_palette: false,
            },
            ..TransitionDefaults::default()
        });
        light.power_on(Instant::from_millis(0));
        assert_eq!(light.transition().phase(), TransitionPhase::Intro);
        light.service(Instant::from_millis(0));
        assert!(is_black(&light.driver().channel().frames[0]));
    }

    #[test]
    fn test_intents_are_applied_on_service() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let sender = channel.sender();
        let mut factory = MockFactory::default();
        let mut light = Light::setup(&config(fade_outro()), &mut factory, Some(channel.receiver()))
            .unwrap();

        sender
            .try_send(ControlIntent::State(StripStateIntent {
                effect: Some(EffectId::Fire as u8),
                color: Some(Rgb::new(0, 0, 255)),
                ..StripStateIntent::default()
            }))
            .unwrap();
        sender
            .try_send(ControlIntent::State(StripStateIntent {
                power: Some(true),
                speed: Some(90),
                ..StripStateIntent::default()
            }))
            .unwrap();

        assert!(!light.is_on());
        light.service(Instant::from_millis(0));
        assert!(light.is_on());
        assert!(channel.is_empty());
        assert_eq!(light.engine().effect_id(), EffectId::Fire);
        assert_eq!(light.params().speed, 90);
        assert!(!light.params().autotune);
        assert_eq!(light.params().color, Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_later_autotune_wins_over_earlier_speed() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let sender = channel.sender();
        let mut factory = MockFactory::default();
        let mut light = Light::setup(&config(fade_outro()), &mut factory, Some(channel.receiver()))
            .unwrap();
        light.set_effect(EffectId::Fire as u8);
        light.set_speed(10);
        assert!(!light.params().autotune);

        for intent in [
            StripStateIntent {
                speed: Some(20),
                ..StripStateIntent::default()
            },
            StripStateIntent {
                autotune: Some(true),
                ..StripStateIntent::default()
            },
        ] {
            sender.try_send(ControlIntent::State(intent)).unwrap();
        }
        light.service(Instant::from_millis(0));
        assert!(light.params().autotune);
        assert_eq!(light.params().speed, EffectId::Fire.defaults().speed);
    }

    #[test]
    fn test_later_speed_wins_over_earlier_autotune() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let sender = channel.sender();
        let mut factory = MockFactory::default();
        let mut light = Light::setup(&config(fade_outro()), &mut factory, Some(channel.receiver()))
            .unwrap();
        light.set_effect(EffectId::Fire as u8);
        light.set_speed(10);

        for intent in [
            StripStateIntent {
                autotune: Some(true),
                ..StripStateIntent::default()
            },
            StripStateIntent {
                speed: Some(20),
                ..StripStateIntent::default()
            },
        ] {
            sender.try_send(ControlIntent::State(intent)).unwrap();
        }
        light.service(Instant::from_millis(0));
        assert!(!light.params().autotune);
        assert_eq!(light.params().speed, 20);
    }

    fn throttled(transitions: TransitionDefaults) -> Light<'static, MockChannel, 4> {
        let mut factory = MockFactory::default();
        let mut config = config(transitions);
        config.strip.min_refresh_interval = Duration::from_millis(24);
        Light::setup(&config, &mut factory, None).unwrap()
    }

    #[test]
    fn test_deferred_host_frame_dropped_by_power_off() {
        let mut light = throttled(fade_outro());
        light.power_on(Instant::from_millis(0));
        assert_eq!(light.service(Instant::from_millis(0)), Some(WriteOutcome::Shown));

        light
            .write_colors([Rgb::new(1, 2, 3); LEDS], Instant::from_millis(5))
            .unwrap();
        assert!(light.driver().show_pending());
        light.power_off();
        assert!(!light.driver().show_pending());

        let mut now = 30;
        while light.transition().phase() != TransitionPhase::Idle {
            light.service(Instant::from_millis(now));
            now += 24;
            assert!(now < 1000, "outro never finished");
        }
        let frames = &light.driver().channel().frames;
        assert!(frames.iter().all(|frame| frame[..3] != [2, 1, 3]));
        assert!(is_black(&frames[frames.len() - 1]));
    }

    #[test]
    fn test_host_writes_throttled_at_their_own_time() {
        let mut light = throttled(fade_outro());
        light
            .write_colors([Rgb::new(1, 2, 3); LEDS], Instant::from_millis(100))
            .unwrap();
        light
            .write_colors([Rgb::new(4, 5, 6); LEDS], Instant::from_millis(110))
            .unwrap();
        assert_eq!(light.driver().channel().frames.len(), 1);
        assert_eq!(
            light.time_until_next(Instant::from_millis(110)),
            Duration::from_millis(14)
        );

        assert_eq!(light.service(Instant::from_millis(124)), Some(WriteOutcome::Shown));
        let frames = &light.driver().channel().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1][..3], [5, 4, 6]);
    }

    #[test]
    fn test_time_until_next_frame() {
        let mut light = setup(fade_outro());
        assert_eq!(light.time_until_next(Instant::from_millis(0)), Duration::from_millis(24));
        light.power_on(Instant::from_millis(0));
        assert_eq!(light.time_until_next(Instant::from_millis(0)), Duration::from_millis(0));
        light.service(Instant::from_millis(0));
        assert_eq!(light.time_until_next(Instant::from_millis(10)), Duration::from_millis(14));
        assert_eq!(light.time_until_next(Instant::from_millis(30)), Duration::from_millis(0));
    }

    #[test]
    fn test_host_frames_pass_through() {
        let mut light = setup(fade_outro());
        light.write([Rgb::new(1, 2, 3); LEDS]).unwrap();
        let frames = &light.driver().channel().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][..3], [2, 1, 3]);
    }

    #[test]
    fn test_diagnostics() {
        let mut factory = MockFactory::default();
        let mut light: Light<'static, MockChannel, 4> = Light::setup(
            &LightConfig {
                free_memory: Some(|| 4096),
                ..config(fade_outro())
            },
            &mut factory,
            None,
        )
        .unwrap();
        light.power_on(Instant::from_millis(0));
        for frame in 0..5 {
            light.service(Instant::from_millis(frame * 24));
        }

        let diagnostics = light.diagnostics();
        assert_eq!(diagnostics.frames, 5);
        assert_eq!(diagnostics.frames_sent, 5);
        assert_eq!(diagnostics.frame_time_mean, Duration::from_millis(24));
        assert_eq!(diagnostics.jitter, Duration::from_millis(0));
        assert_eq!(diagnostics.free_bytes, Some(4096));
        assert!(diagnostics.buffer_bytes >= LEDS * 3 * 2 + LEDS);
        assert!(!diagnostics.status.warning);
    }
}
