use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ArcPosition {
    pub angle_deg: f64,
    pub vertical_offset: f64,
}

pub const DEFAULT_CURVATURE: f64 = 2.5;

/// Angular distance between neighbouring cards. Zero when there is nothing to
/// spread across.
pub fn angle_step(count: usize, arc_width_deg: f64) -> f64 {
    if count < 2 {
        0.0
    } else {
        arc_width_deg / (count - 1) as f64
    }
}

pub fn layout(count: usize, arc_width_deg: f64) -> Vec<ArcPosition> {
    layout_with_curvature(count, arc_width_deg, DEFAULT_CURVATURE)
}

/// Fan layout centred on zero: card `i` sits at `(i - (count-1)/2) * step`
/// and is pushed out by `|angle| * curvature`.
pub fn layout_with_curvature(count: usize, arc_width_deg: f64, curvature: f64) -> Vec<ArcPosition> {
    let step = angle_step(count, arc_width_deg);
    let mid = count.saturating_sub(1) as f64 / 2.0;
    (0..count)
        .map(|idx| {
            let angle_deg = (idx as f64 - mid) * step;
            ArcPosition {
                angle_deg,
                vertical_offset: angle_deg.abs() * curvature,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_card_sits_at_center() {
        assert_eq!(
            layout(1, 170.0),
            vec![ArcPosition {
                angle_deg: 0.0,
                vertical_offset: 0.0
            }]
        );
        assert!(layout(0, 170.0).is_empty());
    }

    #[test]
    fn ten_card_fan_spans_the_arc() {
        let positions = layout(10, 170.0);
        assert!((angle_step(10, 170.0) - 170.0 / 9.0).abs() < 1e-9);
        assert!((positions[0].angle_deg + 85.0).abs() < 1e-9);
        assert!((positions[9].angle_deg - 85.0).abs() < 1e-9);
        assert!((positions[0].vertical_offset - 212.5).abs() < 1e-9);
    }

    #[test]
    fn odd_count_has_a_flat_middle_card() {
        let positions = layout(5, 100.0);
        assert_eq!(positions[2].angle_deg, 0.0);
        assert_eq!(positions[2].vertical_offset, 0.0);
        assert_eq!(positions[1].vertical_offset, positions[3].vertical_offset);
    }
}
