use egui::{Pos2, Vec2};

use super::config::LayoutConfig;

const ZOOM_IN_FACTOR: f32 = 1.2;
const ZOOM_OUT_FACTOR: f32 = 0.8;

/// Fit leaves a margin so content doesn't touch the container edges.
const FIT_MARGIN: f32 = 0.9;

#[derive(Debug, Clone, Copy)]
struct PanDrag {
    start_pointer: Pos2,
    start_pan: Vec2,
}

/// Pan/zoom state for one timeline view.
///
/// Owned by exactly one view and mutated only from its pointer/wheel
/// handlers, so no interior locking is needed. The scale is clamped on
/// every path that writes it; it can never reach 0 or grow without bound.
/// Screen position of a world point is `world * scale + pan`.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub scale: f32,
    pub pan: Vec2,
    drag: Option<PanDrag>,
    min_zoom: f32,
    max_zoom: f32,
    default_zoom: f32,
}

impl Viewport {
    pub fn new(cfg: &LayoutConfig) -> Self {
        Self {
            scale: cfg.default_zoom.clamp(cfg.min_zoom, cfg.max_zoom),
            pan: Vec2::ZERO,
            drag: None,
            min_zoom: cfg.min_zoom,
            max_zoom: cfg.max_zoom,
            default_zoom: cfg.default_zoom,
        }
    }

    /// Scale by `factor`, keeping the world point under `pointer` fixed on
    /// screen (the anchor invariant).
    pub fn zoom_to_point(&mut self, factor: f32, pointer: Pos2) {
        let new_scale = (self.scale * factor).clamp(self.min_zoom, self.max_zoom);
        let p = pointer.to_vec2();
        self.pan = p - ((p - self.pan) / self.scale) * new_scale;
        self.scale = new_scale;
    }

    /// Step zoom anchored at `anchor` (the shell passes its viewport
    /// center so button zoom and wheel zoom stay anchor-consistent).
    pub fn zoom_in(&mut self, anchor: Pos2) {
        self.zoom_to_point(ZOOM_IN_FACTOR, anchor);
    }

    pub fn zoom_out(&mut self, anchor: Pos2) {
        self.zoom_to_point(ZOOM_OUT_FACTOR, anchor);
    }

    /// Start a drag-pan. A gesture that begins over an interactive child
    /// (the shell knows, the engine doesn't) is ignored so bar clicks don't
    /// also move the canvas.
    pub fn begin_pan(&mut self, pointer: Pos2, over_interactive: bool) {
        if over_interactive {
            return;
        }
        self.drag = Some(PanDrag {
            start_pointer: pointer,
            start_pan: self.pan,
        });
    }

    /// Advance an active pan; no-op when none is active.
    pub fn continue_pan(&mut self, pointer: Pos2) {
        if let Some(drag) = self.drag {
            self.pan = drag.start_pan + (pointer - drag.start_pointer);
        }
    }

    /// End the pan. Idempotent, and also the handler for pointer-cancel, so
    /// an interrupted drag always terminates deterministically.
    pub fn end_pan(&mut self) {
        self.drag = None;
    }

    pub fn is_panning(&self) -> bool {
        self.drag.is_some()
    }

    /// Scale the content to fit the container (with a margin) and center it.
    /// Degenerate sizes fall back to the default view instead of producing
    /// NaN or a zero scale.
    pub fn fit_to_view(&mut self, container: Vec2, content: Vec2) {
        if container.x <= 0.0 || container.y <= 0.0 || content.x <= 0.0 || content.y <= 0.0 {
            self.reset_view();
            return;
        }
        let scale = ((container.x / content.x).min(container.y / content.y) * FIT_MARGIN)
            .clamp(self.min_zoom, self.max_zoom);
        self.scale = scale;
        self.pan = (container - content * scale) * 0.5;
    }

    pub fn reset_view(&mut self) {
        self.scale = self.default_zoom.clamp(self.min_zoom, self.max_zoom);
        self.pan = Vec2::ZERO;
        self.drag = None;
    }

    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.scale + self.pan).to_pos2()
    }

    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.scale).to_pos2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(&LayoutConfig::default())
    }

    #[test]
    fn zoom_preserves_the_anchor_point() {
        for factor in [0.5_f32, 0.8, 1.0, 1.2, 2.0] {
            let mut vp = viewport();
            vp.pan = Vec2::new(40.0, -15.0);
            let pointer = Pos2::new(123.0, 77.0);
            let before = vp.to_world(pointer);
            vp.zoom_to_point(factor, pointer);
            let after = vp.to_world(pointer);
            assert!((before.x - after.x).abs() < 1e-3, "factor {factor}");
            assert!((before.y - after.y).abs() < 1e-3, "factor {factor}");
        }
    }

    #[test]
    fn repeated_zoom_stays_clamped() {
        let mut vp = viewport();
        let anchor = Pos2::new(50.0, 50.0);
        for _ in 0..100 {
            vp.zoom_in(anchor);
        }
        assert_eq!(vp.scale, 4.0);
        for _ in 0..200 {
            vp.zoom_out(anchor);
        }
        assert_eq!(vp.scale, 0.25);
    }

    #[test]
    fn pan_lifecycle_tracks_pointer_delta() {
        let mut vp = viewport();
        vp.begin_pan(Pos2::new(10.0, 10.0), false);
        vp.continue_pan(Pos2::new(25.0, 4.0));
        assert_eq!(vp.pan, Vec2::new(15.0, -6.0));
        vp.end_pan();
        vp.continue_pan(Pos2::new(100.0, 100.0));
        assert_eq!(vp.pan, Vec2::new(15.0, -6.0));
    }

    #[test]
    fn pan_over_interactive_child_is_ignored() {
        let mut vp = viewport();
        vp.begin_pan(Pos2::new(10.0, 10.0), true);
        assert!(!vp.is_panning());
        vp.continue_pan(Pos2::new(50.0, 50.0));
        assert_eq!(vp.pan, Vec2::ZERO);
    }

    #[test]
    fn end_pan_is_idempotent() {
        let mut vp = viewport();
        vp.end_pan();
        vp.end_pan();
        assert!(!vp.is_panning());
    }

    #[test]
    fn fit_scales_and_centers_the_content() {
        let mut vp = viewport();
        vp.fit_to_view(Vec2::new(400.0, 400.0), Vec2::new(800.0, 400.0));
        assert!((vp.scale - 0.45).abs() < 1e-6);
        // Scaled content: 360 x 180, centered in 400 x 400.
        assert!((vp.pan.x - 20.0).abs() < 1e-3);
        assert!((vp.pan.y - 110.0).abs() < 1e-3);
        // Containment: content corners map inside the container.
        let min = vp.to_screen(Pos2::ZERO);
        let max = vp.to_screen(Pos2::new(800.0, 400.0));
        assert!(min.x >= 0.0 && min.y >= 0.0);
        assert!(max.x <= 400.0 && max.y <= 400.0);
    }

    #[test]
    fn fit_with_degenerate_content_resets() {
        let mut vp = viewport();
        vp.pan = Vec2::new(99.0, 99.0);
        vp.fit_to_view(Vec2::new(400.0, 400.0), Vec2::ZERO);
        assert_eq!(vp.scale, 1.0);
        assert_eq!(vp.pan, Vec2::ZERO);
    }

    #[test]
    fn reset_restores_defaults_and_ends_any_drag() {
        let mut vp = viewport();
        vp.begin_pan(Pos2::new(0.0, 0.0), false);
        vp.zoom_to_point(2.0, Pos2::new(30.0, 30.0));
        vp.reset_view();
        assert_eq!(vp.scale, 1.0);
        assert_eq!(vp.pan, Vec2::ZERO);
        assert!(!vp.is_panning());
    }
}
