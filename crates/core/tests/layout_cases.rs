use arcana_core::{angle_step, layout};

macro_rules! fan_case {
    ($name:ident, $count:expr, $arc:expr) => {
        #[test]
        fn $name() {
            let positions = layout($count, $arc);
            assert_eq!(positions.len(), $count);
            let step = angle_step($count, $arc);
            let spanned: f64 = (1..$count).map(|_| step).sum();
            assert!((spanned - $arc).abs() < 1e-9);
            for (idx, pos) in positions.iter().enumerate() {
                let mirror = &positions[$count - 1 - idx];
                assert!((pos.angle_deg + mirror.angle_deg).abs() < 1e-9);
                assert!((pos.vertical_offset - mirror.vertical_offset).abs() < 1e-9);
                assert!((pos.vertical_offset - pos.angle_deg.abs() * 2.5).abs() < 1e-9);
            }
            assert!((positions[0].angle_deg + $arc / 2.0).abs() < 1e-9);
        }
    };
}

fan_case!(fan_two_cards, 2, 170.0);
fan_case!(fan_three_cards, 3, 170.0);
fan_case!(fan_ten_cards, 10, 170.0);
fan_case!(fan_full_tarot, 78, 170.0);
fan_case!(fan_narrow_arc, 22, 60.0);
fan_case!(fan_wide_arc, 56, 300.0);
