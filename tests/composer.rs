mod common;

mod tests {
    use rgbcw_light_composer::ports::{LightFlag, SavedLightState};
    use rgbcw_light_composer::{
        ChannelMapping, ChannelTopology, ChipKind, ChipSet, ColorMode, ExponentialMode,
        LightConfig, LightController, Rgb, TOPIC_BASE_COLOR_RGB, TOPIC_FINAL_COLOR_RGBCW,
    };

    use crate::common::{MockPorts, Value, assert_close};

    fn linear_config() -> LightConfig {
        LightConfig {
            exponential_mode: ExponentialMode::Off,
            ..LightConfig::DEFAULT
        }
    }

    fn enabled_controller(ports: &mut MockPorts) -> LightController {
        let mut controller = LightController::new(linear_config());
        controller.set_enabled(true, ports);
        ports.clear();
        controller
    }

    #[test]
    fn test_topology_resolution() {
        let topology = ChannelTopology::resolve(&MockPorts::rgbcw(), &MockPorts::rgbcw());
        assert_eq!(topology.pwm_count(), 5);
        assert_eq!(topology.first_channel_index(), 0);
        assert_eq!(topology.max_composable_index(), 5);
        assert_eq!(topology.mapping(), ChannelMapping::Direct);
        assert!(topology.should_broadcast_rgb());

        let shifted = MockPorts::with_pwm(3, 1);
        assert_eq!(
            ChannelTopology::resolve(&shifted, &shifted).first_channel_index(),
            1
        );

        let cw = MockPorts::with_pwm(2, 0);
        let topology = ChannelTopology::resolve(&cw, &cw);
        assert!(topology.is_cw_mode());
        assert!(!topology.should_broadcast_rgb());
        assert_eq!(topology.mapping(), ChannelMapping::ColdWarm);

        let cw = MockPorts::with_pwm(2, 0)
            .with_flag(LightFlag::AlternateCwMode)
            .with_flag(LightFlag::ForceShowRgbcwController);
        let topology = ChannelTopology::resolve(&cw, &cw);
        assert_eq!(topology.mapping(), ChannelMapping::AlternateColdWarm);
        assert!(topology.should_broadcast_rgb());

        let forced = MockPorts::rgbcw().with_flag(LightFlag::ForceRgbMode);
        assert_eq!(
            ChannelTopology::resolve(&forced, &forced).max_composable_index(),
            3
        );
    }

    #[test]
    fn test_led_running() {
        let none = MockPorts::with_pwm(0, 0);
        let topology = ChannelTopology::resolve(&none, &none);
        assert!(!topology.is_led_running(&ChipSet::new()));

        let mut chips = ChipSet::new();
        chips.insert(ChipKind::Bp5758d);
        chips.insert(ChipKind::Bp5758d);
        assert!(topology.is_led_running(&chips));
        assert_eq!(chips.iter().count(), 1);
        assert_eq!(ChipKind::parse_from_str("sm2135"), Some(ChipKind::Sm2135));
    }

    #[test]
    fn test_running_driver() {
        let none = MockPorts::with_pwm(0, 0);
        assert!(!ChannelTopology::resolve(&none, &none).is_running_driver());

        let forced = MockPorts::with_pwm(0, 0).with_flag(LightFlag::ForceShowRgbcwController);
        assert!(ChannelTopology::resolve(&forced, &forced).is_running_driver());

        let cw = MockPorts::with_pwm(2, 0);
        assert!(ChannelTopology::resolve(&cw, &cw).is_running_driver());
    }

    #[test]
    fn test_hex_color_on_rgb_only_device() {
        let mut ports = MockPorts::with_pwm(3, 0).with_flag(LightFlag::ForceRgbMode);
        let mut controller = enabled_controller(&mut ports);

        assert_eq!(controller.set_base_color_hex("FF8000", false, &mut ports), 3);

        assert_eq!(controller.state().final_color(), &[255.0, 128.0, 0.0, 0.0, 0.0]);
        let written = ports.written();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0], (0, 100.0));
        assert_eq!(written[1].0, 1);
        assert_close(written[1].1, 50.196, 1e-3);
        assert_eq!(written[2], (2, 0.0));
        assert_eq!(
            ports.announced(TOPIC_BASE_COLOR_RGB),
            vec![Value::Str("FF8000".into())]
        );
    }

    #[test]
    fn test_channel_writes_are_quiet() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = enabled_controller(&mut ports);
        controller.apply(&mut ports);

        assert_eq!(ports.channel_writes.len(), 5);
        for (_, _, flags) in &ports.channel_writes {
            assert!(flags.skip_publish);
            assert!(flags.silent);
        }
    }

    #[test]
    fn test_rgb_mode_masks_white_channels() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = enabled_controller(&mut ports);

        controller.set_base_color_hex("10203040", false, &mut ports);
        assert_eq!(controller.mode(), ColorMode::Rgb);
        assert_eq!(controller.state().final_color(), &[16.0, 32.0, 48.0, 0.0, 0.0]);
    }

    #[test]
    fn test_temperature_mode_masks_rgb_channels() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = enabled_controller(&mut ports);

        controller.set_temperature(327, true, &mut ports);
        assert_eq!(controller.mode(), ColorMode::Temperature);
        let final_color = controller.state().final_color();
        assert_eq!(&final_color[..3], &[0.0, 0.0, 0.0]);
        assert_close(final_color[3], 127.5, 1e-3);
        assert_close(final_color[4], 127.5, 1e-3);
    }

    #[test]
    fn test_all_mode_keeps_every_channel() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = enabled_controller(&mut ports);

        controller.set_base_color_hex("#0102030405", true, &mut ports);
        assert_eq!(controller.mode(), ColorMode::All);
        assert_eq!(controller.state().final_color(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_first_channel_offset() {
        let mut ports = MockPorts::with_pwm(5, 1);
        let mut controller = enabled_controller(&mut ports);
        controller.apply(&mut ports);

        let channels: Vec<u8> = ports.written().iter().map(|(channel, _)| *channel).collect();
        assert_eq!(channels, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_cold_warm_mapping() {
        let mut ports = MockPorts::with_pwm(2, 0);
        let mut controller = LightController::new(linear_config());
        controller.init(&mut ports);
        assert_eq!(controller.mode(), ColorMode::Temperature);

        controller.set_enabled(true, &mut ports);
        ports.clear();
        controller.set_temperature(500, true, &mut ports);

        // only the white channels are driven, cold on the first PWM
        assert_eq!(ports.written(), vec![(0, 0.0), (1, 100.0)]);
    }

    #[test]
    fn test_alternate_cold_warm_mapping() {
        let mut ports = MockPorts::with_pwm(2, 0).with_flag(LightFlag::AlternateCwMode);
        let mut controller = enabled_controller(&mut ports);

        controller.set_temperature(327, true, &mut ports);
        assert_eq!(ports.written(), vec![(0, 50.0), (1, 100.0)]);

        ports.clear();
        controller.set_dimmer(50, &mut ports);
        assert_eq!(ports.written(), vec![(0, 50.0), (1, 50.0)]);

        ports.clear();
        controller.set_enabled(false, &mut ports);
        assert_eq!(ports.written(), vec![(0, 0.0), (1, 0.0)]);
        assert_eq!(controller.state().final_color(), &[0.0; 5]);
    }

    #[test]
    fn test_zero_brightness_is_black_in_every_mode() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = LightController::default();
        controller.set_enabled(true, &mut ports);
        controller.set_dimmer(0, &mut ports);

        for text in ["FFFFFF", "FF00FF"] {
            controller.set_base_color_hex(text, false, &mut ports);
            assert_eq!(controller.state().final_color(), &[0.0; 5]);
        }
        controller.set_base_color_hex("FFFFFFFFFF", true, &mut ports);
        assert_eq!(controller.state().final_color(), &[0.0; 5]);
        controller.set_temperature(200, true, &mut ports);
        assert_eq!(controller.state().final_color(), &[0.0; 5]);
    }

    #[test]
    fn test_enable_cycle_restores_final_color() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = enabled_controller(&mut ports);
        controller.set_dimmer(60, &mut ports);
        controller.set_base_color_hex("4080C0", false, &mut ports);
        let before = *controller.state().final_color();

        controller.set_enabled(false, &mut ports);
        assert_eq!(controller.state().final_color(), &[0.0; 5]);
        assert_eq!(controller.dimmer(), 60);

        controller.set_enabled(true, &mut ports);
        assert_eq!(controller.state().final_color(), &before);
    }

    #[test]
    fn test_channels_are_clamped() {
        let mut ports = MockPorts::rgbcw();
        let mut controller = enabled_controller(&mut ports);
        controller.set_channel_scale(1.0);
        controller.set_base_color_hex("FFFFFFFFFF", true, &mut ports);

        assert_eq!(ports.written().len(), 5);
        assert!(ports.written().iter().all(|(_, value)| *value == 100.0));
    }

    #[test]
    fn test_chips_receive_frame() {
        let mut ports = MockPorts::with_pwm(0, 0);
        let mut config = linear_config();
        config.chips.insert(ChipKind::Sm2135);
        config.chips.insert(ChipKind::Bp1658cj);
        let mut controller = LightController::new(config);

        controller.set_enabled(true, &mut ports);
        controller.set_base_color_hex("FF8000", false, &mut ports);

        assert_eq!(
            &ports.chip_writes[ports.chip_writes.len() - 2..],
            &[
                (ChipKind::Sm2135, [255, 128, 0, 0, 0]),
                (ChipKind::Bp1658cj, [255, 128, 0, 0, 0]),
            ]
        );
        assert_eq!(ports.group_frames.last(), Some(&[255, 128, 0, 0, 0]));
    }

    #[test]
    fn test_smooth_transitions_defer_hardware_writes() {
        let mut ports = MockPorts::rgbcw().with_flag(LightFlag::SmoothTransitions);
        let mut config = linear_config();
        config.chips.insert(ChipKind::Sm2135);
        let mut controller = LightController::new(config);

        controller.set_enabled(true, &mut ports);
        assert!(ports.channel_writes.is_empty());
        assert!(ports.chip_writes.is_empty());
        assert_eq!(controller.state().final_color(), &[255.0, 255.0, 255.0, 0.0, 0.0]);
    }

    #[test]
    fn test_remember_last_state_saves_every_composition() {
        let mut ports = MockPorts::rgbcw().with_flag(LightFlag::RememberLastState);
        let mut controller = enabled_controller(&mut ports);

        controller.set_dimmer(30, &mut ports);
        assert_eq!(
            ports.saved.last(),
            Some(&SavedLightState {
                mode: 2,
                dimmer: 30,
                temperature: 154,
                rgb: Rgb::new(255, 255, 255),
                enabled: true,
            })
        );
    }

    #[test]
    fn test_broadcast_full_rgbcw() {
        let mut ports = MockPorts::rgbcw().with_flag(LightFlag::BroadcastFullRgbcw);
        let mut controller = enabled_controller(&mut ports);

        controller.set_base_color_hex("FF8000", false, &mut ports);
        assert_eq!(
            ports.announced(TOPIC_FINAL_COLOR_RGBCW),
            vec![Value::Str("FF80000000".into())]
        );
    }
}
