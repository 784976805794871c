use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration};
use egui::{Align2, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::engine::viewport::Viewport;
use crate::engine::{Layout, PlacedTask};
use crate::ui::theme;

/// What happened inside the chart this frame.
#[derive(Debug, Clone)]
pub struct ChartResponse {
    pub selection_changed: bool,
    /// Screen rect of the chart area, for anchoring button zoom.
    pub rect: Rect,
}

/// Render the timeline and wire pointer input into the viewport.
///
/// All geometry comes from the engine's layout; this function only applies
/// the viewport transform and paints. Grid lines and bars both go through
/// `layout.grid`, so they cannot drift apart.
pub fn show_chart(
    layout: &Layout,
    viewport: &mut Viewport,
    selected: &mut Option<String>,
    blast: Option<&HashSet<String>>,
    ui: &mut Ui,
) -> ChartResponse {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let origin = response.rect.min;
    let mut selection_changed = false;

    let to_screen = |world: Pos2, vp: &Viewport| -> Pos2 { origin + vp.to_screen(world).to_vec2() };

    // Screen rects for hit testing, before input mutates the viewport; one
    // frame of lag on a zoom is imperceptible.
    let bar_screen_rects: Vec<(usize, Rect)> = layout
        .tasks
        .iter()
        .enumerate()
        .map(|(i, placed)| {
            let min = to_screen(Pos2::new(placed.rect.x, placed.rect.y), viewport);
            let size = Vec2::new(placed.rect.w, placed.rect.h) * viewport.scale;
            (i, Rect::from_min_size(min, size))
        })
        .collect();
    let bar_at = |pos: Pos2| -> Option<usize> {
        bar_screen_rects
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(i, _)| *i)
    };

    // Wheel zoom, anchored at the pointer.
    if let Some(hover) = response.hover_pos() {
        let scroll = ui.input(|i| i.smooth_scroll_delta);
        if ui.input(|i| i.modifiers.ctrl) && scroll.y != 0.0 {
            let local = Pos2::new(hover.x - origin.x, hover.y - origin.y);
            if scroll.y > 0.0 {
                viewport.zoom_in(local);
            } else {
                viewport.zoom_out(local);
            }
        }
    }

    // Drag-pan lifecycle. A drag that starts on a bar is the bar's gesture,
    // not a pan; the viewport is told so and ignores it.
    if let Some(pointer) = response.interact_pointer_pos() {
        let local = Pos2::new(pointer.x - origin.x, pointer.y - origin.y);
        if response.drag_started() {
            viewport.begin_pan(local, bar_at(pointer).is_some());
        } else if response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
            viewport.continue_pan(local);
        }
    }
    if response.drag_stopped() || ui.input(|i| i.pointer.any_released()) {
        viewport.end_pan();
    }

    // Click selection: a bar selects it, empty canvas clears.
    if response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let next = bar_at(pointer).map(|i| layout.tasks[i].task.id.clone());
            if *selected != next {
                *selected = next;
                selection_changed = true;
            }
        }
    }

    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
    let clipped = painter.with_clip_rect(response.rect);

    draw_lane_stripes(&clipped, layout, viewport, origin, response.rect);
    draw_grid(&clipped, layout, viewport, origin, response.rect);
    draw_dependency_arrows(&clipped, layout, viewport, origin);

    for placed in &layout.tasks {
        draw_task_bar(&clipped, placed, viewport, origin, selected, blast);
    }

    // Tooltip for the hovered bar.
    if let Some(hover) = response.hover_pos() {
        if let Some(i) = bar_at(hover) {
            let placed = &layout.tasks[i];
            egui::show_tooltip_at_pointer(
                ui.ctx(),
                ui.layer_id(),
                egui::Id::new(("bar-tip", &placed.task.id)),
                |ui| {
                    ui.strong(&placed.task.name);
                    let start = layout.grid_start_date
                        + Duration::days(layout.day0_offset + placed.span.start_day_offset);
                    let end = start + Duration::days(placed.span.duration_days - 1);
                    ui.label(format!(
                        "{} → {} ({}d)",
                        start.format("%d/%m/%Y"),
                        end.format("%d/%m/%Y"),
                        placed.span.duration_days
                    ));
                    ui.label(format!(
                        "{} · {}",
                        placed.task.status.label(),
                        placed.task.owner_key
                    ));
                },
            );
        }
    }

    ChartResponse {
        selection_changed,
        rect: response.rect,
    }
}

fn draw_lane_stripes(
    painter: &egui::Painter,
    layout: &Layout,
    viewport: &Viewport,
    origin: Pos2,
    bounds: Rect,
) {
    let cfg = layout.grid.config();
    for lane in 0..layout.lane_count {
        if lane % 2 != 0 {
            continue;
        }
        let y = cfg.padding + lane as f32 * cfg.lane_height;
        let top = origin + viewport.to_screen(Pos2::new(0.0, y)).to_vec2();
        let stripe = Rect::from_min_max(
            Pos2::new(bounds.left(), top.y),
            Pos2::new(bounds.right(), top.y + cfg.lane_height * viewport.scale),
        );
        painter.rect_filled(stripe, 0.0, theme::BG_LANE_EVEN);
    }
}

fn draw_grid(
    painter: &egui::Painter,
    layout: &Layout,
    viewport: &Viewport,
    origin: Pos2,
    bounds: Rect,
) {
    let grid = &layout.grid;
    let scaled_day = grid.config().day_width * viewport.scale;
    for index in 0..=grid.day_count() {
        let world_x = grid.x_of_day(index);
        let x = origin.x + viewport.to_screen(Pos2::new(world_x, 0.0)).x;
        if x < bounds.left() - scaled_day || x > bounds.right() + scaled_day {
            continue;
        }
        let is_today = index == grid.day0_offset;
        let stroke = if is_today {
            Stroke::new(1.5, theme::TODAY_LINE)
        } else {
            Stroke::new(0.5, theme::GRID_LINE)
        };
        painter.line_segment(
            [Pos2::new(x, bounds.top()), Pos2::new(x, bounds.bottom())],
            stroke,
        );

        let date = grid.grid_start_date + Duration::days(index);
        if scaled_day >= 18.0 {
            let color = if is_today {
                theme::TODAY_LINE
            } else {
                theme::TEXT_DIM
            };
            painter.text(
                Pos2::new(x + 3.0, bounds.top() + 16.0),
                Align2::LEFT_CENTER,
                date.format("%d").to_string(),
                theme::font_small(),
                color,
            );
        }
        if date.day() == 1 || index == 0 {
            painter.text(
                Pos2::new(x + 3.0, bounds.top() + 5.0),
                Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_dependency_arrows(
    painter: &egui::Painter,
    layout: &Layout,
    viewport: &Viewport,
    origin: Pos2,
) {
    let by_id: HashMap<&str, &PlacedTask> = layout
        .tasks
        .iter()
        .map(|p| (p.task.id.as_str(), p))
        .collect();
    let stroke = Stroke::new(1.0, theme::ARROW);

    for edge in &layout.dependencies {
        let (Some(from), Some(to)) = (by_id.get(edge.from.as_str()), by_id.get(edge.to.as_str()))
        else {
            continue;
        };
        let start_world = Pos2::new(from.rect.x + 6.0, from.rect.y + from.rect.h);
        let mid_world = Pos2::new(from.rect.x + 6.0, to.rect.y + to.rect.h / 2.0);
        let end_world = Pos2::new(to.rect.x, to.rect.y + to.rect.h / 2.0);

        let start = origin + viewport.to_screen(start_world).to_vec2();
        let mid = origin + viewport.to_screen(mid_world).to_vec2();
        let end = origin + viewport.to_screen(end_world).to_vec2();

        painter.line_segment([start, mid], stroke);
        painter.line_segment([mid, end], stroke);

        // Arrowhead pointing into the child bar.
        let size = (4.0 * viewport.scale).clamp(2.0, 6.0);
        let dir = if end.x >= mid.x { 1.0 } else { -1.0 };
        painter.add(egui::Shape::convex_polygon(
            vec![
                end,
                Pos2::new(end.x - dir * size, end.y - size * 0.6),
                Pos2::new(end.x - dir * size, end.y + size * 0.6),
            ],
            theme::ARROW,
            Stroke::NONE,
        ));
    }
}

fn draw_task_bar(
    painter: &egui::Painter,
    placed: &PlacedTask,
    viewport: &Viewport,
    origin: Pos2,
    selected: &Option<String>,
    blast: Option<&HashSet<String>>,
) {
    let min = origin + viewport.to_screen(Pos2::new(placed.rect.x, placed.rect.y)).to_vec2();
    let size = Vec2::new(placed.rect.w, placed.rect.h) * viewport.scale;
    let bar = Rect::from_min_size(min, size);
    let rounding = Rounding::same(4.0);

    let mut fill = theme::status_color(placed.task.status);
    let dimmed = blast.is_some_and(|set| !set.contains(&placed.task.id));
    if dimmed {
        fill = fill.gamma_multiply(0.3);
    }
    painter.rect_filled(bar, rounding, fill);

    if let Some(tick) = theme::priority_color(placed.task.priority) {
        let tick_rect = Rect::from_min_size(bar.min, Vec2::new(3.0, bar.height()));
        let color = if dimmed { tick.gamma_multiply(0.3) } else { tick };
        painter.rect_filled(tick_rect, Rounding::ZERO, color);
    }

    if selected.as_deref() == Some(placed.task.id.as_str()) {
        painter.rect_stroke(
            bar.expand(1.5),
            Rounding::same(5.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar.width() > 30.0 {
        let text = if dimmed {
            theme::TEXT_DIM
        } else {
            theme::TEXT_ON_BAR
        };
        let galley = painter.layout_no_wrap(placed.task.name.clone(), theme::font_bar(), text);
        let clipped = painter.with_clip_rect(bar);
        let text_y = bar.min.y + (bar.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar.left() + 6.0, text_y),
            galley,
            egui::Color32::TRANSPARENT,
        );
    }
}
