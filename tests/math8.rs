mod tests {
    use embassy_time::Duration;
    use myrtio_strip_composer::math8::{Prng, blend8, hash32, progress8, quadwave8, scale8, triwave8};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_progress8() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(100)),
            0
        );
        assert_eq!(
            progress8(Duration::from_millis(50), Duration::from_millis(100)),
            127
        );
        assert_eq!(
            progress8(Duration::from_millis(100), Duration::from_millis(100)),
            255
        );
    }

    #[test]
    fn test_progress8_zero_duration() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(0)),
            255
        );
    }

    #[test]
    fn test_triwave8() {
        assert_eq!(triwave8(0), 0);
        assert_eq!(triwave8(64), 128);
        assert_eq!(triwave8(127), 254);
        assert_eq!(triwave8(255), 0);
        assert_eq!(quadwave8(0), 0);
    }

    #[test]
    fn test_hash32_is_stable() {
        assert_eq!(hash32(0), 0);
        assert_eq!(hash32(12345), hash32(12345));
        assert_ne!(hash32(1), hash32(2));
    }

    #[test]
    fn test_prng_is_deterministic() {
        let mut a = Prng::new(42);
        let mut b = Prng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }

        let mut rng = Prng::new(0);
        assert_ne!(rng.next_u32(), 0);
        for _ in 0..100 {
            assert!(rng.below(10) < 10);
            let value = rng.range8(20, 30);
            assert!((20..30).contains(&value));
        }
        assert_eq!(rng.below(0), 0);
        assert_eq!(rng.range8(5, 5), 5);
    }
}
