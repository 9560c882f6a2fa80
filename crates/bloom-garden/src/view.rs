#![forbid(unsafe_code)]

//! Presentation-free view model for rendering the garden.

use chrono::Datelike;
use rand::Rng;

use crate::flower::Flower;
use crate::session::{GardenSession, Notice, Phase};

/// Text of the success notice.
pub const NOTICE_TEXT: &str = "planted ✿";

const BASE_SIZE_PX: f64 = 44.0;
const SCALE_SIZE_PX: f64 = 16.0;
const STEM_RATIO: f64 = 0.45;
const SPROUT_STAGGER_SECS: f64 = 0.04;
const SPROUT_CYCLE_SECS: f64 = 0.8;

/// Header line summarizing the collection.
#[must_use]
pub fn count_label(phase: Phase, count: usize) -> String {
    if phase == Phase::Loading {
        return "opening...".to_string();
    }
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} flower{plural} planted")
}

/// Whether the commit action should be enabled.
#[must_use]
pub fn publish_enabled<R: Rng>(session: &GardenSession<R>) -> bool {
    session.can_publish()
}

/// The text to show for the current notice, if any.
#[must_use]
pub fn notice_text(notice: &Notice) -> &str {
    match notice {
        Notice::Planted { .. } => NOTICE_TEXT,
        Notice::PublishFailed(message) => message,
    }
}

/// Layout for one planted flower.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantedFlowerView<'a> {
    pub flower: &'a Flower,
    /// CSS-style `left`, percent.
    pub left_pct: f64,
    /// CSS-style `bottom`, percent.
    pub bottom_pct: f64,
    pub size_px: f64,
    pub stem_height_px: f64,
    /// Lower flowers stack in front.
    pub z_index: i32,
    pub sprout_delay_secs: f64,
    pub title: String,
}

impl<'a> PlantedFlowerView<'a> {
    /// `index` is the flower's position in the collection.
    #[must_use]
    pub fn new(flower: &'a Flower, index: usize) -> Self {
        let size_px = BASE_SIZE_PX + flower.scale * SCALE_SIZE_PX;
        let date = flower.created_at.date_naive();
        Self {
            flower,
            left_pct: flower.x,
            bottom_pct: flower.y,
            size_px,
            stem_height_px: size_px * STEM_RATIO,
            z_index: (100.0 - flower.y).round() as i32,
            sprout_delay_secs: (index as f64 * SPROUT_STAGGER_SECS) % SPROUT_CYCLE_SECS,
            title: format!("Planted {}/{}/{}", date.month(), date.day(), date.year()),
        }
    }
}

/// Views for the whole collection in display order.
#[must_use]
pub fn planted_flowers(flowers: &[Flower]) -> Vec<PlantedFlowerView<'_>> {
    flowers
        .iter()
        .enumerate()
        .map(|(index, flower)| PlantedFlowerView::new(flower, index))
        .collect()
}
