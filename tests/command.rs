mod tests {
    use rgbcw_light_composer::command::{ColorText, parse_float, parse_int};
    use rgbcw_light_composer::{Command, CommandError, DimmerUpdate, PowerChange};

    #[test]
    fn test_numeric_arguments() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("  -7 rest"), -7);
        assert_eq!(parse_int("+3"), 3);
        assert_eq!(parse_int("12.9"), 12);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("-"), 0);

        assert_eq!(parse_float("0.5"), 0.5);
        assert_eq!(parse_float("-1.25x"), -1.25);
        assert_eq!(parse_float("7"), 7.0);
        assert_eq!(parse_float("1.2.3"), 1.2);
        assert_eq!(parse_float("."), 0.0);
    }

    #[test]
    fn test_parse_dimmer() {
        assert_eq!(
            Command::parse("led_dimmer", "75"),
            Ok(Command::Dimmer(DimmerUpdate {
                dimmer: Some(75),
                enabled: None
            }))
        );
        assert_eq!(
            Command::parse("LED_DIMMER", r#"{"state":"off"}"#),
            Ok(Command::Dimmer(DimmerUpdate {
                dimmer: None,
                enabled: Some(false)
            }))
        );
        assert_eq!(
            Command::parse("led_dimmer", r#"{"brightness":12.7,"state":"blink"}"#),
            Ok(Command::Dimmer(DimmerUpdate {
                dimmer: Some(12),
                enabled: None
            }))
        );
    }

    #[test]
    fn test_json_payload() {
        let update = DimmerUpdate::from_json(r#"{"brightness":52,"state":"ON"}"#).unwrap();
        assert_eq!(update.dimmer, Some(52));
        assert_eq!(update.enabled, Some(true));

        let update = DimmerUpdate::from_json(r#"{"state":"OFF","brightness":"52"}"#).unwrap();
        assert_eq!(update.dimmer, None);
        assert_eq!(update.enabled, Some(false));

        assert!(DimmerUpdate::from_json("{brightness}").is_err());
    }

    #[test]
    fn test_parse_power() {
        assert_eq!(
            Command::parse("led_enableAll", "toggle"),
            Ok(Command::Power(PowerChange::Toggle))
        );
        assert_eq!(
            Command::parse("led_enableAll", "1"),
            Ok(Command::Power(PowerChange::Set(true)))
        );
        assert_eq!(
            Command::parse("led_enableAll", "0"),
            Ok(Command::Power(PowerChange::Set(false)))
        );
    }

    #[test]
    fn test_parse_add_dimmer() {
        assert_eq!(
            Command::parse("add_dimmer", "-10 1"),
            Ok(Command::AddDimmer {
                delta: -10,
                wrap: true
            })
        );
        assert_eq!(
            Command::parse("add_dimmer", "5"),
            Ok(Command::AddDimmer {
                delta: 5,
                wrap: false
            })
        );
    }

    #[test]
    fn test_parse_colors() {
        let expected = ColorText::try_from("#FF8000").unwrap();
        assert_eq!(
            Command::parse("led_basecolor_rgb", " #FF8000 "),
            Ok(Command::BaseColorRgb(expected))
        );
        let expected = ColorText::try_from("rand").unwrap();
        assert_eq!(
            Command::parse("led_basecolor_rgbcw", "rand"),
            Ok(Command::BaseColorRgbcw(expected))
        );
        let expected = ColorText::try_from("#FF8000FF00ABCDE").unwrap();
        assert_eq!(
            Command::parse("led_basecolor_rgbcw", "#FF8000FF00ABCDEF01"),
            Ok(Command::BaseColorRgbcw(expected))
        );
    }

    #[test]
    fn test_parse_hsb() {
        let expected = Ok(Command::HsbColor {
            hue: 90.0,
            sat: 100.0,
            bri: 50.0,
        });
        assert_eq!(Command::parse("HSBColor", "90,100,50"), expected);
        assert_eq!(Command::parse("hsbcolor", "90 100 50"), expected);
        assert_eq!(
            Command::parse("HSBColor", "90"),
            Ok(Command::HsbColor {
                hue: 90.0,
                sat: 0.0,
                bri: 0.0
            })
        );

        assert_eq!(Command::parse("HSBColor1", "200"), Ok(Command::Hue(200.0)));
        assert_eq!(Command::parse("HSBColor2", "40"), Ok(Command::Saturation(40.0)));
        assert_eq!(Command::parse("HSBColor3", "60"), Ok(Command::HsvBrightness(60.0)));
        assert_eq!(Command::parse("led_hue", "10"), Ok(Command::Hue(10.0)));
        assert_eq!(Command::parse("led_saturation", "20"), Ok(Command::Saturation(20.0)));
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!(Command::parse("led_temperature", "250"), Ok(Command::Temperature(250)));
        assert_eq!(
            Command::parse("led_brightnessMult", "0.02"),
            Ok(Command::BrightnessMultiplier(0.02))
        );
        assert_eq!(Command::parse("led_colorMult", "1"), Ok(Command::ChannelScale(1.0)));
        assert_eq!(Command::parse("led_lerpSpeed", "150.5"), Ok(Command::LerpSpeed(150.5)));
        assert_eq!(Command::parse("led_expoMode", "4"), Ok(Command::ExponentialMode(4)));
        assert_eq!(Command::parse("led_nextColor", ""), Ok(Command::NextColor));
        assert_eq!(Command::parse("LED_NEXTCOLOR", "ignored"), Ok(Command::NextColor));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(Command::parse("led_nope", "1"), Err(CommandError::Unknown));
        assert_eq!(Command::parse("", ""), Err(CommandError::Unknown));
    }
}
