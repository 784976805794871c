use std::collections::HashSet;

use chrono::{Duration, Local, NaiveDate, Utc};
use egui::{Pos2, RichText, Vec2};

use crate::engine::blockers::{self, Blocker};
use crate::engine::config::LayoutConfig;
use crate::engine::graph::DependencyGraphIndex;
use crate::engine::viewport::Viewport;
use crate::engine::{self, Layout};
use crate::model::{build_snapshot, GroupBy, RawTask, Task};
use crate::ui;
use crate::ui::toolbar::ToolbarAction;

/// Main application state: one raw snapshot, one derived layout, one
/// viewport. The layout is rebuilt whenever the snapshot or grouping
/// changes; the viewport deliberately survives those rebuilds.
pub struct TimelineApp {
    raw: Vec<RawTask>,
    tasks: Vec<Task>,
    layout: Layout,
    layout_dirty: bool,

    group_by: GroupBy,
    propagate: bool,
    config: LayoutConfig,
    viewport: Viewport,
    today: NaiveDate,

    selected: Option<String>,
    blast: Option<HashSet<String>>,
    blockers: Vec<Blocker>,

    status_message: String,
    warning_count: usize,
    chart_size: Vec2,
}

impl TimelineApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = LayoutConfig::default();
        let viewport = Viewport::new(&config);
        let today = Local::now().date_naive();

        let mut app = Self {
            raw: Self::sample_snapshot(today),
            tasks: Vec::new(),
            layout: engine::compute_layout(&[], today, GroupBy::Owner, &config),
            layout_dirty: false,
            group_by: GroupBy::Owner,
            propagate: false,
            config,
            viewport,
            today,
            selected: None,
            blast: None,
            blockers: Vec::new(),
            status_message: "Ready".to_string(),
            warning_count: 0,
            chart_size: Vec2::new(800.0, 600.0),
        };
        app.rebuild();
        app
    }

    /// Replace the current snapshot wholesale, the way a remote fetch
    /// would. The viewport is left alone.
    pub fn set_snapshot(&mut self, raw: Vec<RawTask>) {
        self.raw = raw;
        self.layout_dirty = true;
    }

    fn rebuild(&mut self) {
        let (mut tasks, ingest_warnings) = build_snapshot(&self.raw);
        if self.propagate {
            let graph = DependencyGraphIndex::build(&tasks);
            tasks = blockers::propagate_statuses(&tasks, &graph);
        }
        self.layout = engine::compute_layout(&tasks, self.today, self.group_by, &self.config);
        self.warning_count = ingest_warnings.len() + self.layout.warnings.len();
        self.tasks = tasks;
        self.refresh_selection();
    }

    /// Recompute blast radius and blockers for the current selection.
    fn refresh_selection(&mut self) {
        let Some(id) = self.selected.clone() else {
            self.blast = None;
            self.blockers.clear();
            return;
        };
        if !self.tasks.iter().any(|t| t.id == id) {
            self.selected = None;
            self.blast = None;
            self.blockers.clear();
            return;
        }
        let graph = DependencyGraphIndex::build(&self.tasks);
        self.blast = Some(graph.blast_radius(&id));
        self.blockers = blockers::blockers_of(&id, &graph, &self.tasks, Utc::now());
    }

    fn chart_center(&self) -> Pos2 {
        Pos2::new(self.chart_size.x / 2.0, self.chart_size.y / 2.0)
    }

    fn apply_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::ZoomIn => self.viewport.zoom_in(self.chart_center()),
            ToolbarAction::ZoomOut => self.viewport.zoom_out(self.chart_center()),
            ToolbarAction::FitToView => {
                let (w, h) = self.layout.content_size;
                self.viewport.fit_to_view(self.chart_size, Vec2::new(w, h));
                self.status_message = "Fit to content".to_string();
            }
            ToolbarAction::ResetView => {
                self.viewport.reset_view();
                self.status_message = "View reset".to_string();
            }
            ToolbarAction::LayoutChanged => {
                self.layout_dirty = true;
            }
        }
    }

    /// Demo snapshot in the raw wire shape, exercising hierarchy, blocked
    /// children, a due-before-start anomaly and a dateless fallback task.
    fn sample_snapshot(today: NaiveDate) -> Vec<RawTask> {
        let day = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();
        let raw = |id: &str, name: &str, owner: &str| RawTask {
            id: id.to_string(),
            name: name.to_string(),
            owner_key: owner.to_string(),
            ..Default::default()
        };

        let mut planning = raw("plan", "Planning", "alice");
        planning.start_timestamp = Some(day(-5));
        planning.due_timestamp = Some(day(3));
        planning.status = Some("in-progress".to_string());

        let mut kickoff = raw("kickoff", "Project Kickoff", "alice");
        kickoff.parent_id = Some("plan".to_string());
        kickoff.start_timestamp = Some(day(-5));
        kickoff.due_timestamp = Some(day(-2));
        kickoff.status = Some("in-progress".to_string());

        let mut reqs = raw("reqs", "Requirements Gathering", "alice");
        reqs.parent_id = Some("plan".to_string());
        reqs.start_timestamp = Some(day(-2));
        reqs.due_timestamp = Some(day(3));
        reqs.status = Some("blocked".to_string());
        reqs.priority = Some("high".to_string());
        reqs.updated_at = Some(format!("{}T09:00:00Z", day(-1)));

        let mut build = raw("build", "Execution", "bob");
        build.start_timestamp = Some(day(2));
        build.due_timestamp = Some(day(20));

        let mut ui_design = raw("ui", "UI Design", "alice");
        ui_design.parent_id = Some("build".to_string());
        ui_design.start_timestamp = Some(day(2));
        ui_design.due_timestamp = Some(day(9));
        ui_design.priority = Some("high".to_string());

        let mut api = raw("api", "Backend API", "bob");
        api.parent_id = Some("build".to_string());
        api.start_timestamp = Some(day(4));
        api.due_timestamp = Some(day(16));
        api.status = Some("in-progress".to_string());

        let mut launch = raw("launch", "Launch", "bob");
        launch.due_timestamp = Some(day(22));
        launch.priority = Some("urgent".to_string());

        // Intentionally inverted dates; shows up as a warning, not a crash.
        let mut cleanup = raw("cleanup", "Data Cleanup", "bob");
        cleanup.start_timestamp = Some(day(6));
        cleanup.due_timestamp = Some(day(3));
        cleanup.priority = Some("low".to_string());

        let retro = raw("retro", "Retrospective", "alice");

        vec![
            planning, kickoff, reqs, build, ui_design, api, launch, cleanup, retro,
        ]
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        if self.layout_dirty {
            self.rebuild();
            self.layout_dirty = false;
        }

        let mut toolbar_action = ToolbarAction::None;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar_action = ui::toolbar::show_toolbar(&mut self.group_by, &mut self.propagate, ui);
        });
        self.apply_toolbar_action(toolbar_action);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(&self.status_message)
                        .size(10.5)
                        .color(ui::theme::TEXT_SECONDARY),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("Zoom: {:.0}%", self.viewport.scale * 100.0))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                    );
                    ui.label(
                        RichText::new(format!(" · Tasks: {}", self.layout.tasks.len()))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                    );
                    if self.warning_count > 0 {
                        ui.label(
                            RichText::new(format!(" · Warnings: {}", self.warning_count))
                                .size(10.5)
                                .color(ui::theme::STATUS_BLOCKED),
                        );
                    }
                });
            });
        });

        egui::SidePanel::left("detail_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.show_detail_panel(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                let response = ui::chart::show_chart(
                    &self.layout,
                    &mut self.viewport,
                    &mut self.selected,
                    self.blast.as_ref(),
                    ui,
                );
                self.chart_size = response.rect.size();
                if response.selection_changed {
                    self.refresh_selection();
                    self.status_message = match &self.selected {
                        Some(id) => format!("Selected '{id}'"),
                        None => "Selection cleared".to_string(),
                    };
                }
            });
    }
}

impl TimelineApp {
    fn show_detail_panel(&self, ui: &mut egui::Ui) {
        let Some(id) = &self.selected else {
            ui.add_space(8.0);
            ui.label(RichText::new("Click a bar to inspect it.").color(ui::theme::TEXT_DIM));
            return;
        };
        let Some(task) = self.tasks.iter().find(|t| &t.id == id) else {
            return;
        };

        ui.add_space(8.0);
        ui.strong(&task.name);
        ui.label(
            RichText::new(format!("{} · {}", task.owner_key, task.status.label()))
                .color(ui::theme::TEXT_SECONDARY),
        );
        ui.label(
            RichText::new(format!("priority: {}", task.priority.label()))
                .color(ui::theme::TEXT_DIM),
        );

        if let Some(blast) = &self.blast {
            ui.add_space(6.0);
            ui.separator();
            ui.label(
                RichText::new(format!("Impact: {} task(s) highlighted", blast.len()))
                    .color(ui::theme::TEXT_SECONDARY),
            );
        }

        ui.add_space(6.0);
        ui.separator();
        if self.blockers.is_empty() {
            ui.label(RichText::new("No blocked children.").color(ui::theme::TEXT_DIM));
        } else {
            ui.label(RichText::new("Blocked by").color(ui::theme::TEXT_SECONDARY));
            for blocker in &self.blockers {
                ui.label(
                    RichText::new(format!(
                        "{} — {} (since {})",
                        blocker.blocker_id,
                        blocker.owner_key,
                        blocker.since.format("%Y-%m-%d")
                    ))
                    .color(ui::theme::STATUS_BLOCKED),
                );
            }
        }
    }
}
