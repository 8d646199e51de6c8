use serde::{Deserialize, Serialize};

/// Tunables for one draw. Every field has a default so partial JSON files load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrawConfig {
    pub max_selection: usize,
    pub arc_width_deg: f64,
    pub curvature: f64,
    pub deal_stagger_ms: u64,
    pub travel_ms: u64,
    pub reveal_delay_ms: u64,
    pub seat_fade_ms: u64,
    pub card_width: f64,
    pub card_height: f64,
    pub spread_origin_percent: f64,
    pub spread_center_percent: f64,
    pub extremal_slot_raise: f64,
    pub slot_area_padding_px: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_selection: 5,
            arc_width_deg: 170.0,
            curvature: 2.5,
            deal_stagger_ms: 20,
            travel_ms: 1200,
            reveal_delay_ms: 50,
            seat_fade_ms: 200,
            card_width: 100.0,
            card_height: 170.0,
            spread_origin_percent: 10.0,
            spread_center_percent: 50.0,
            extremal_slot_raise: 0.30,
            slot_area_padding_px: 60.0,
        }
    }
}

impl DrawConfig {
    /// Offset of the Reveal step from Depart.
    pub fn reveal_at_ms(&self) -> u64 {
        self.travel_ms + self.reveal_delay_ms
    }
}
