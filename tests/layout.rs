mod tests {
    use myrtio_strip_composer::{ByteOrder, ChannelLayout, Chipset, PixelBuffer, Rgb, WhiteChannel};

    const WHITE_CHANNELS: [WhiteChannel; 3] =
        [WhiteChannel::None, WhiteChannel::Back, WhiteChannel::Front];

    #[test]
    fn test_offsets_do_not_overlap() {
        for order in ByteOrder::ALL {
            for white in WHITE_CHANNELS {
                let layout = ChannelLayout::new(order, white);
                let buffer = PixelBuffer::new(7, layout).unwrap();
                let stride = layout.bytes_per_pixel();
                let mut used = vec![false; buffer.as_bytes().len()];

                for index in 0..buffer.len() {
                    let o = buffer.offsets(index);
                    assert_eq!(o.aux, index);
                    let mut channels = vec![o.red, o.green, o.blue];
                    channels.extend(o.white);
                    assert_eq!(channels.len(), stride, "{order:?} {white:?}");
                    for offset in channels {
                        assert!(offset / stride == index, "{order:?} {white:?} pixel {index}");
                        assert!(!used[offset], "{order:?} {white:?} offset {offset} reused");
                        used[offset] = true;
                    }
                }
                assert!(used.iter().all(|&u| u));
            }
        }
    }

    #[test]
    fn test_grb_strip_of_sixty() {
        let layout = ChannelLayout::new(
            Chipset::Ws2812x.default_order(),
            Chipset::Ws2812x.default_white(),
        );
        let mut buffer = PixelBuffer::new(60, layout).unwrap();
        assert_eq!(buffer.as_bytes().len(), 180);

        for i in 0..buffer.len() {
            buffer.pixel(i).set(Rgb::new(1, 2, 3));
        }
        for chunk in buffer.as_bytes().chunks(3) {
            assert_eq!(chunk, &[2, 1, 3]);
        }
    }

    #[test]
    fn test_white_position() {
        let mut back = PixelBuffer::new(1, ChannelLayout::new(ByteOrder::Rgb, WhiteChannel::Back)).unwrap();
        let mut pixel = back.pixel(0);
        pixel.set(Rgb::new(1, 2, 3));
        pixel.set_white(4);
        assert_eq!(back.as_bytes(), &[1, 2, 3, 4]);

        let mut front = PixelBuffer::new(1, ChannelLayout::new(ByteOrder::Grb, WhiteChannel::Front)).unwrap();
        let mut pixel = front.pixel(0);
        pixel.set(Rgb::new(1, 2, 3));
        pixel.set_white(4);
        assert_eq!(front.as_bytes(), &[4, 2, 1, 3]);
        assert_eq!(front.white(0), 4);
        assert_eq!(front.color(0), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_white_ignored_without_channel() {
        let mut buffer = PixelBuffer::new(2, ChannelLayout::new(ByteOrder::Bgr, WhiteChannel::None)).unwrap();
        buffer.pixel(1).set_white(200);
        assert_eq!(buffer.white(1), 0);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_aux_is_separate_from_color() {
        let mut buffer = PixelBuffer::new(3, ChannelLayout::new(ByteOrder::Grb, WhiteChannel::None)).unwrap();
        buffer.pixel(1).set_aux(9);
        assert_eq!(buffer.aux(1), 9);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));

        buffer.pixel(1).set(Rgb::new(5, 5, 5));
        buffer.clear_effect_data();
        assert_eq!(buffer.aux(1), 0);
        assert_eq!(buffer.color(1), Rgb::new(5, 5, 5));
    }

    #[test]
    fn test_byte_order_names() {
        assert_eq!(ByteOrder::parse_from_str("grb"), Some(ByteOrder::Grb));
        assert_eq!(ByteOrder::parse_from_str("BRG"), Some(ByteOrder::Brg));
        assert_eq!(ByteOrder::parse_from_str("rgbw"), None);
    }

    #[test]
    fn test_chipset_defaults() {
        assert_eq!(Chipset::Ws2811.default_order(), ByteOrder::Rgb);
        assert_eq!(Chipset::Sk6812.default_white(), WhiteChannel::Back);
        assert_eq!(Chipset::from_name("ws2812b"), Chipset::Ws2812x);
    }
}
