mod common;

mod tests {
    use super::common::stream;
    use myrtio_strip_composer::encoder::{StreamEncoder, bulk_symbol_count, encode_bulk};
    use myrtio_strip_composer::math8::Prng;
    use myrtio_strip_composer::timing::PulseProfile;
    use myrtio_strip_composer::{Chipset, LedTimings, Symbol};

    const CHIPSETS: [Chipset; 4] = [
        Chipset::Ws2812x,
        Chipset::Ws2813,
        Chipset::Sk6812,
        Chipset::Ws2811,
    ];

    fn sample_frame() -> Vec<u8> {
        let mut rng = Prng::new(7);
        let mut data: Vec<u8> = (0..=255).collect();
        data.extend((0..61).map(|_| rng.next_u8()));
        data
    }

    #[test]
    fn test_stream_matches_bulk() {
        let data = sample_frame();
        for chipset in CHIPSETS {
            for resolution_hz in [10_000_000, 40_000_000, 80_000_000] {
                let timings = LedTimings::for_chipset(chipset, resolution_hz);
                let mut bulk = Vec::new();
                encode_bulk(&data, &timings, &mut bulk).unwrap();
                assert_eq!(bulk.len(), bulk_symbol_count(data.len(), &timings));

                for block in [8, 48, 96, 192] {
                    let streamed = stream(&data, &StreamEncoder::new(timings), block);
                    assert_eq!(streamed, bulk, "{chipset:?} at {resolution_hz} Hz, block {block}");
                }
            }
        }
    }

    #[test]
    fn test_bits_are_msb_first() {
        let timings = LedTimings::for_chipset(Chipset::Ws2812x, 10_000_000);
        let mut out = Vec::new();
        encode_bulk(&[0b1000_0001], &timings, &mut out).unwrap();

        assert_eq!(out.len(), 9);
        assert_eq!(out[0], timings.bit1);
        for symbol in &out[1..7] {
            assert_eq!(*symbol, timings.bit0);
        }
        assert_eq!(out[7], timings.bit1);
        assert_eq!(out[8], timings.reset);
    }

    #[test]
    fn test_zero_reset_is_not_emitted() {
        let profile = PulseProfile {
            reset: 0,
            ..Chipset::Ws2812x.profile()
        };
        let timings = LedTimings::from_profile(profile, 10_000_000);
        let data = [0xAA, 0x55];

        let mut bulk = Vec::new();
        encode_bulk(&data, &timings, &mut bulk).unwrap();
        assert_eq!(bulk.len(), 16);
        assert_eq!(stream(&data, &StreamEncoder::new(timings), 16), bulk);
    }

    #[test]
    fn test_stream_waits_for_room() {
        let timings = LedTimings::for_chipset(Chipset::Ws2812x, 10_000_000);
        let encoder = StreamEncoder::new(timings);
        let mut small = [Symbol::ZERO; 7];

        let step = encoder.encode(&[0xFF], 0, &mut small);
        assert_eq!(step.written, 0);
        assert!(!step.done);

        let step = encoder.encode(&[0xFF], 8, &mut small);
        assert_eq!(step.written, 1);
        assert!(step.done);
        assert_eq!(small[0], timings.reset);
    }

    #[test]
    fn test_empty_frame_is_only_reset() {
        let timings = LedTimings::for_chipset(Chipset::Sk6812, 10_000_000);
        let mut bulk = vec![Symbol::ZERO; 3];
        encode_bulk(&[], &timings, &mut bulk).unwrap();
        assert_eq!(bulk, vec![timings.reset]);
        assert_eq!(stream(&[], &StreamEncoder::new(timings), 8), bulk);
    }
}
