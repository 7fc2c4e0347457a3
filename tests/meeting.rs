use moderator_wheel::render::WheelGeometry;
use moderator_wheel::{
    render_wheel, target_angle, AppState, Canvas, FrameRequest, Participant, SelectionSession,
    SpinPhysics, WheelConfig, PALETTE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SIZE: usize = 240;

#[test]
fn every_participant_is_picked_once_and_revealed_under_the_pointer() {
    let roster = Participant::roster(["Ada", "Brian", "Cleo", "Dev", "Eve", "Farah", "Gus"]);
    let config = WheelConfig::builder().canvas_size(SIZE).build();
    let mut state = AppState::new(SelectionSession::new(roster.clone()), SpinPhysics::default());
    let mut rng = StdRng::seed_from_u64(2024);
    let mut buffer = vec![0u8; SIZE * SIZE * 4];

    for round in 0..roster.len() {
        state.spin_random(&mut rng).expect("pool is not empty");
        let chosen = state.session().pending().cloned().expect("pending choice");
        let snapshot = state.visible_layout().clone();
        assert_eq!(snapshot.sector_count(), roster.len() - round);
        let index = snapshot.index_of(chosen.id).expect("chosen is on the wheel");

        let mut frames = 0;
        loop {
            let request = state.update();
            if request == FrameRequest::Release {
                break;
            }
            // render strictly after the frame's update, against the frozen wheel
            if frames % 16 == 0 {
                let mut canvas = Canvas::new(&mut buffer, SIZE, SIZE);
                render_wheel(&mut canvas, state.visible_layout(), state.angle(), None, &config, None);
                assert_eq!(state.visible_layout(), &snapshot);
            }
            frames += 1;
            assert!(frames < 10_000);
        }

        assert_eq!(state.angle(), target_angle(index, snapshot.sector_count(), 5));
        assert_eq!(state.session().selected().last(), Some(&chosen));
        assert_eq!(
            state.caption().map(str::to_string),
            Some(format!("Selected: {}", chosen.name))
        );

        // the settled angle, painted on the wheel that was spun
        let mut canvas = Canvas::new(&mut buffer, SIZE, SIZE);
        render_wheel(&mut canvas, &snapshot, state.angle(), None, &config, None);
        let wheel = WheelGeometry::new(SIZE, SIZE, &config);
        let under_pointer = canvas.pixel(wheel.cx as usize, (wheel.cy - wheel.r / 2) as usize);
        assert_eq!(
            under_pointer,
            Some(PALETTE[snapshot.sectors()[index].color_index].as_tuple())
        );
    }

    assert!(state.session().is_exhausted());
    assert!(state.visible_layout().is_empty());
    let mut picked: Vec<_> = state.session().selected().iter().map(|p| p.id).collect();
    picked.sort();
    let mut expected: Vec<_> = roster.iter().map(|p| p.id).collect();
    expected.sort();
    assert_eq!(picked, expected);
}

#[test]
fn same_seed_gives_same_order() {
    let order = |seed| {
        let roster = Participant::roster(["A", "B", "C", "D", "E"]);
        let mut state = AppState::new(SelectionSession::new(roster), SpinPhysics::default());
        let mut rng = StdRng::seed_from_u64(seed);
        while state.spin_random(&mut rng).is_ok() {
            while state.update() == FrameRequest::NextFrame {}
        }
        state
            .session()
            .selected()
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(order(9), order(9));
    assert_eq!(order(9).len(), 5);
}
