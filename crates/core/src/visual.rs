//! Values handed to the presentation layer. The core never draws; it only
//! produces positions, transforms, opacities and face flags.

use crate::{DrawConfig, Slot, SpreadCard};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Absolute position plus transform of a visual.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub rotation_deg: f64,
    pub scale: f64,
}

impl Placement {
    pub fn lerp(self, to: Placement, t: f64) -> Placement {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Placement {
            left: mix(self.left, to.left),
            top: mix(self.top, to.top),
            rotation_deg: mix(self.rotation_deg, to.rotation_deg),
            scale: mix(self.scale, to.scale),
        }
    }

    /// Where a card leaves from: its on-screen box with its fan rotation.
    pub fn departure(rect: Rect, card: &SpreadCard) -> Placement {
        Placement {
            left: rect.left,
            top: rect.top,
            rotation_deg: if card.placed { card.angle } else { 0.0 },
            scale: 1.0,
        }
    }

    /// Card-sized box centred in `slot`, upright, scaled to the slot width.
    pub fn slot_center(slot: Rect, config: &DrawConfig) -> Placement {
        Placement {
            left: slot.left + (slot.width - config.card_width) / 2.0,
            top: slot.top + (slot.height - config.card_height) / 2.0,
            rotation_deg: 0.0,
            scale: slot.width / config.card_width,
        }
    }
}

/// Fan position of a spread card: horizontal anchor in percent of the spread
/// area, then `translateX(-50%) rotate(angle) translateY(-lift)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpreadTransform {
    pub left_percent: f64,
    pub angle_deg: f64,
    pub lift_px: f64,
    pub centered: bool,
}

impl SpreadTransform {
    pub fn for_card(card: &SpreadCard, config: &DrawConfig) -> Self {
        if card.placed {
            Self {
                left_percent: config.spread_center_percent,
                angle_deg: card.angle,
                lift_px: card.vertical_offset,
                centered: true,
            }
        } else {
            Self {
                left_percent: config.spread_origin_percent,
                angle_deg: 0.0,
                lift_px: 0.0,
                centered: false,
            }
        }
    }
}

/// Screen geometry supplied by the front end. Queried once per selection, at
/// departure time.
pub trait Viewport {
    fn spread_card_rect(&self, card: &SpreadCard) -> Rect;
    fn slot_rect(&self, slot: &Slot, capacity: usize) -> Rect;
}

/// A plain viewport: fan centred over a row of evenly spaced slots.
#[derive(Debug, Clone, PartialEq)]
pub struct FanViewport {
    pub width: f64,
    pub spread_top: f64,
    pub fan_radius: f64,
    pub slot_top: f64,
    pub slot_width: f64,
    pub slot_height: f64,
    pub slot_gap: f64,
    pub card_width: f64,
    pub spread_origin_percent: f64,
    pub spread_center_percent: f64,
}

impl FanViewport {
    pub fn new(width: f64, config: &DrawConfig) -> Self {
        Self {
            width,
            spread_top: 320.0,
            fan_radius: 260.0,
            slot_top: 620.0,
            slot_width: 120.0,
            slot_height: 180.0,
            slot_gap: 24.0,
            card_width: config.card_width,
            spread_origin_percent: config.spread_origin_percent,
            spread_center_percent: config.spread_center_percent,
        }
    }
}

impl Viewport for FanViewport {
    fn spread_card_rect(&self, card: &SpreadCard) -> Rect {
        let height = self.card_width * 1.7;
        if !card.placed {
            return Rect {
                left: self.width * self.spread_origin_percent / 100.0,
                top: self.spread_top,
                width: self.card_width,
                height,
            };
        }
        let center = self.width * self.spread_center_percent / 100.0;
        let sweep = self.fan_radius * card.angle.to_radians().sin();
        Rect {
            left: center - self.card_width / 2.0 + sweep,
            top: self.spread_top - card.vertical_offset,
            width: self.card_width,
            height,
        }
    }

    fn slot_rect(&self, slot: &Slot, capacity: usize) -> Rect {
        let count = capacity.max(1) as f64;
        let row = count * self.slot_width + (count - 1.0) * self.slot_gap;
        let start = (self.width - row) / 2.0;
        Rect {
            left: start + slot.index as f64 * (self.slot_width + self.slot_gap),
            top: self.slot_top - slot.raise * self.slot_height,
            width: self.slot_width,
            height: self.slot_height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum VisualCommand {
    SpreadCleared,
    SlotsReset {
        capacity: usize,
        padding_top_px: Option<f64>,
    },
    SpreadCardPlaced {
        card_id: u32,
        arc_index: usize,
        transform: SpreadTransform,
    },
    SpreadCardSelected { card_id: u32 },
    InFlightSpawned {
        card_id: u32,
        slot: usize,
        at: Placement,
    },
    InFlightMoved {
        card_id: u32,
        slot: usize,
        to: Placement,
        duration_ms: u64,
    },
    InFlightRemoved { card_id: u32, slot: usize },
    SeatedShown {
        card_id: u32,
        slot: usize,
        opacity: f64,
    },
    SeatedFade {
        slot: usize,
        opacity: f64,
        duration_ms: u64,
    },
    SeatedFace { slot: usize, face_up: bool },
}

#[derive(Debug, Default)]
pub struct VisualBus {
    queue: Vec<VisualCommand>,
}

impl VisualBus {
    pub fn push(&mut self, command: VisualCommand) {
        self.queue.push(command);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = VisualCommand> + '_ {
        self.queue.drain(..)
    }
}
