//! Bar chart geometry and painting.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Vec2};
use shared::domain::ElementState;
use stepper::Board;

pub const MIN_BAR_PX: f32 = 5.0;
pub const BAR_GAP_PX: f32 = 2.0;
const CONTAINER_PADDING_X: f32 = 20.0;
const LABEL_HEIGHT: f32 = 30.0;

/// `max(5, value / max(max_value, 1) * available)`; negatives clamp to the minimum.
pub fn bar_height(value: i64, max_value: i64, available: f32) -> f32 {
    let max_value = max_value.max(1) as f32;
    (value as f32 / max_value * available).max(MIN_BAR_PX)
}

/// Evenly splits the container between `count` bars after gaps and padding.
pub fn bar_width(count: usize, container_width: f32) -> f32 {
    if count == 0 {
        return MIN_BAR_PX;
    }
    let total_gap = (count + 1) as f32 * BAR_GAP_PX * 2.0;
    let available = container_width - total_gap - CONTAINER_PADDING_X;
    (available / count as f32).floor().max(MIN_BAR_PX)
}

pub fn state_color(state: Option<ElementState>) -> Color32 {
    match state {
        Some(ElementState::Shifting) => Color32::from_rgb(231, 76, 60),
        Some(ElementState::Comparing) => Color32::from_rgb(241, 196, 15),
        Some(ElementState::KeySelected) => Color32::from_rgb(230, 126, 34),
        Some(ElementState::Sorted) => Color32::from_rgb(46, 204, 113),
        None => Color32::from_rgb(52, 152, 219),
    }
}

pub fn paint_board(ui: &mut egui::Ui, board: &Board) {
    let size = ui.available_size();
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    if board.is_empty() {
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Enter numbers and press Sort",
            FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let max_value = board.max_value().unwrap_or(1);
    let width = bar_width(board.len(), rect.width());
    let available_height = (rect.height() - LABEL_HEIGHT).max(MIN_BAR_PX);
    let stride = width + BAR_GAP_PX * 2.0;
    let total = stride * board.len() as f32;
    let left = rect.center().x - total / 2.0 + BAR_GAP_PX;
    let baseline = rect.bottom() - LABEL_HEIGHT;
    let painter = ui.painter_at(rect);

    for (index, bar) in board.bars().iter().enumerate() {
        let height = bar_height(bar.value, max_value, available_height);
        let x = left + stride * index as f32;
        let bar_rect = Rect::from_min_size(Pos2::new(x, baseline - height), Vec2::new(width, height));
        painter.rect_filled(bar_rect, 2.0, state_color(bar.primary_state()));
        painter.text(
            Pos2::new(bar_rect.center().x, baseline + 4.0),
            Align2::CENTER_TOP,
            bar.value.to_string(),
            FontId::monospace(12.0),
            ui.visuals().text_color(),
        );
    }
}
