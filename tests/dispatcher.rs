mod common;

mod tests {
    use neo_matrix::dispatcher::COLOR_NAME_CAPACITY;
    use neo_matrix::{
        CommandChannel, FrameTransmitter, LightCommand, LightController, LightState, Matrix4x4,
        MigrationEngine, Rgb, SharedBus, StatusReport,
    };

    use super::common::{RecordingBus, RecordingDelay};

    const FRAME_WORDS: usize = 16 * 3 * 8;

    #[test]
    fn test_brightness_scaling() {
        let state = LightState::new(true, 10, 0x00FF00);
        assert_eq!(state.effective_target(), Rgb::new(0, 25, 0));

        let state = LightState::new(true, 50, 0xFF8001);
        assert_eq!(state.effective_target(), Rgb::new(127, 64, 0));

        let state = LightState::new(true, 100, 0x123456);
        assert_eq!(state.effective_target(), Rgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_off_is_black() {
        let state = LightState::new(false, 100, 0xFFFFFF);
        assert_eq!(state.effective_target(), Rgb::new(0, 0, 0));
        assert_eq!(LightState::default().effective_target(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_default_state() {
        let state = LightState::default();
        assert!(!state.on);
        assert_eq!(state.brightness, 10);
        assert_eq!(state.color, 0x00FF00);
        assert!(state.name.is_empty());
    }

    #[test]
    fn test_apply_only_present_fields() {
        let mut state = LightState::default();
        state.apply(&LightCommand::default().with_toggle(true));
        assert!(state.on);
        assert_eq!(state.brightness, 10);
        assert_eq!(state.color, 0x00FF00);

        state.apply(&LightCommand::default().with_color(0x0000FF).with_name("blue"));
        assert!(state.on);
        assert_eq!(state.color, 0x0000FF);
        assert_eq!(state.name.as_str(), "blue");

        state.apply(&LightCommand::default());
        assert_eq!(state.name.as_str(), "blue");
    }

    #[test]
    fn test_brightness_is_clamped() {
        let mut state = LightState::default();
        state.apply(&LightCommand::default().with_toggle(true).with_brightness(250));
        assert_eq!(state.brightness, 100);
        assert_eq!(LightState::new(true, 101, 0).brightness, 100);
    }

    #[test]
    fn test_long_name_is_truncated() {
        let long = "x".repeat(COLOR_NAME_CAPACITY + 10);
        let command = LightCommand::default().with_name(&long);
        assert_eq!(command.name.map(|name| name.len()), Some(COLOR_NAME_CAPACITY));
    }

    #[test]
    fn test_status_json() {
        let status = LightState::new(true, 10, 0x00FF00).status();
        assert_eq!(
            status.to_json().as_str(),
            r#"{"on":true,"brightness":10,"color":65280}"#
        );

        let status = StatusReport {
            on: false,
            brightness: 100,
            color: u32::MAX,
        };
        assert_eq!(
            status.to_json().as_str(),
            r#"{"on":false,"brightness":100,"color":4294967295}"#
        );

        let longest = StatusReport {
            on: false,
            brightness: u8::MAX,
            color: u32::MAX,
        };
        assert_eq!(
            longest.to_json().as_str(),
            r#"{"on":false,"brightness":255,"color":4294967295}"#
        );
    }

    #[test]
    fn test_controller_apply() {
        let bus = SharedBus::new(RecordingBus::default());
        let mut delay = RecordingDelay::default();
        let engine = MigrationEngine::new(FrameTransmitter::new(&bus, &mut delay));
        let mut controller: LightController<'_, _, _, 4, 4> =
            LightController::new(engine, LightState::default());

        let status = controller.apply(&LightCommand::default().with_toggle(true));
        assert_eq!(
            status,
            StatusReport {
                on: true,
                brightness: 10,
                color: 0x00FF00
            }
        );
        assert_eq!(controller.buffer(), &Matrix4x4::filled(Rgb::new(0, 25, 0)));

        controller.apply(&LightCommand::default().with_toggle(false));
        assert_eq!(controller.buffer(), &Matrix4x4::new());
        assert_eq!(controller.state().color, 0x00FF00);
    }

    #[test]
    fn test_controller_start() {
        let bus = SharedBus::new(RecordingBus::default());
        let mut delay = RecordingDelay::default();
        {
            let engine = MigrationEngine::new(FrameTransmitter::new(&bus, &mut delay));
            let mut controller: LightController<'_, _, _, 4, 4> =
                LightController::new(engine, LightState::default());
            controller.start();
            assert_eq!(controller.buffer(), &Matrix4x4::new());
        }
        assert_eq!(bus.into_inner().words.len(), 400 * FRAME_WORDS);
    }

    #[test]
    fn test_controller_start_when_on() {
        let bus = SharedBus::new(RecordingBus::default());
        let mut delay = RecordingDelay::default();
        let engine = MigrationEngine::new(FrameTransmitter::new(&bus, &mut delay));
        let mut controller: LightController<'_, _, _, 4, 4> =
            LightController::new(engine, LightState::new(true, 100, 0xFF0000));

        controller.start();
        assert_eq!(controller.buffer(), &Matrix4x4::filled(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_controller_engine_access() {
        let bus = SharedBus::new(RecordingBus::default());
        let mut delay = RecordingDelay::default();
        {
            let engine = MigrationEngine::new(FrameTransmitter::new(&bus, &mut delay));
            let mut controller: LightController<'_, _, _, 4, 4> =
                LightController::new(engine, LightState::new(true, 100, 0x0000FF));
            assert_eq!(controller.engine_mut().config().steps, 100);

            // Redraw without animation
            let buffer = controller.buffer().clone();
            controller.engine_mut().show(&buffer);
            assert_eq!(controller.buffer(), &Matrix4x4::new());
        }
        assert_eq!(bus.into_inner().words.len(), FRAME_WORDS);
        assert_eq!(delay.waits_ns, vec![500_000]);
    }

    #[test]
    fn test_process_pending() {
        static COMMANDS: CommandChannel<4> = CommandChannel::new();

        let bus = SharedBus::new(RecordingBus::default());
        let mut delay = RecordingDelay::default();
        let engine = MigrationEngine::new(FrameTransmitter::new(&bus, &mut delay));
        let mut controller: LightController<'_, _, _, 4, 4> =
            LightController::new(engine, LightState::default());

        COMMANDS
            .try_send(LightCommand::default().with_toggle(true).with_brightness(100))
            .unwrap();
        COMMANDS
            .try_send(LightCommand::default().with_color(0x0000FF))
            .unwrap();

        let mut published = Vec::new();
        let applied = controller.process_pending(&COMMANDS, |status| {
            published.push(status.to_json().as_str().to_owned());
        });

        assert_eq!(applied, 2);
        assert!(COMMANDS.is_empty());
        assert_eq!(
            published,
            [
                r#"{"on":true,"brightness":100,"color":65280}"#,
                r#"{"on":true,"brightness":100,"color":255}"#,
            ]
        );
        assert_eq!(controller.buffer(), &Matrix4x4::filled(Rgb::new(0, 0, 255)));
        assert_eq!(controller.process_pending(&COMMANDS, |_| {}), 0);
    }
}
