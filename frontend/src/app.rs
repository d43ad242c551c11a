use std::time::Duration;

use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};
use log::{debug, warn};
use pathfind::{Algorithm, CellKind, Grid, Point, SearchState, Session, SessionError};

use crate::settings::Settings;

enum Screen {
    Menu,
    /// A grid being edited or searched. Dropped when going back to the menu.
    Grid(Session),
}

pub struct App {
    settings: Settings,
    screen: Screen,
    status: String,
}

impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let settings: Settings = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        App {
            settings,
            screen: Screen::Menu,
            status: String::new(),
        }
    }

    fn start_session(&mut self, algorithm: Algorithm) {
        self.settings.last_algorithm = algorithm;
        match Session::new(algorithm, self.settings.grid_rows(), self.settings.width) {
            Ok(session) => {
                self.status = "Place the start, the end, then barriers. Space runs.".to_owned();
                self.screen = Screen::Grid(session);
            }
            Err(err) => {
                warn!("could not create a grid: {}", err);
                self.status = err.to_string();
            }
        }
    }

    fn menu(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Which algorithm?");
                ui.add_space(30.0);

                for algorithm in Algorithm::ALL {
                    let mut label = egui::RichText::new(algorithm.to_string()).size(32.0);
                    if algorithm == self.settings.last_algorithm {
                        label = label.strong();
                    }
                    if ui.button(label).clicked() {
                        self.start_session(algorithm);
                    }
                    ui.add_space(10.0);
                }

                // NOTE: no Quit on web pages!
                if !cfg!(target_arch = "wasm32")
                    && ui
                        .button(egui::RichText::new("Quit").size(32.0))
                        .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }

                ui.add_space(30.0);
                ui.add(
                    egui::Slider::new(
                        &mut self.settings.rows,
                        Settings::MIN_ROWS..=Settings::MAX_ROWS,
                    )
                    .text("Grid rows"),
                );
                if !self.status.is_empty() {
                    ui.label(&self.status);
                }
            });
        });
    }

    fn grid_view(&mut self, ctx: &egui::Context) {
        let Screen::Grid(session) = &mut self.screen else {
            return;
        };
        let settings = &mut self.settings;
        let status = &mut self.status;
        let mut back_to_menu = false;

        let (run, clear, back) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::C),
                i.key_pressed(egui::Key::B),
            )
        });

        if run {
            begin(session, status);
        }
        if clear {
            session.clear();
            *status = "Grid cleared".to_owned();
        }
        if back {
            back_to_menu = true;
        }

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            ui.heading(session.algorithm().to_string());
            ui.label(describe(session.state()));
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Run").clicked() {
                    begin(session, status);
                }
                if ui.button("Step").clicked() {
                    session.step(&mut |_: &Grid| {});
                }
                if ui.button("Finish").clicked() {
                    while let Some(SearchState::Computing) = session.step(&mut |_: &Grid| {}) {}
                }
                if ui.button("Stop").clicked() {
                    session.cancel();
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    session.clear();
                }
                if ui.button("Menu").clicked() {
                    back_to_menu = true;
                }
            });

            ui.separator();
            ui.checkbox(&mut settings.auto_step, "Auto Step");
            ui.add(egui::Slider::new(&mut settings.steps_per_frame, 1..=200).text("steps/frame"));
            ui.add(egui::Slider::new(&mut settings.frame_delay_ms, 0..=200).text("delay (ms)"));
            ui.checkbox(&mut settings.show_grid_lines, "Draw grid lines");

            ui.separator();
            ui.label("Left click: start, end, barriers");
            ui.label("Right click: erase");
            ui.label("Space: run   C: clear   B: menu");
            ui.separator();
            ui.label(status.as_str());
        });

        if settings.auto_step && session.is_searching() {
            for _ in 0..settings.steps_per_frame {
                match session.step(&mut |_: &Grid| {}) {
                    Some(SearchState::Computing) => {}
                    _ => break,
                }
            }
            ctx.request_repaint_after(Duration::from_millis(settings.frame_delay_ms));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let side = ui.available_width().min(ui.available_height());
            let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::click_and_drag());
            let rect = response.rect;

            let grid = session.grid();
            let cell = side / grid.rows() as f32;

            for c in grid.cells() {
                let p = c.point();
                let min = rect.min + Vec2::new(p.col as f32 * cell, p.row as f32 * cell);
                painter.rect_filled(
                    Rect::from_min_size(min, Vec2::splat(cell)),
                    0.0,
                    cell_color(c.kind()),
                );
            }

            if settings.show_grid_lines {
                let stroke = Stroke::new(1.0, Color32::GRAY);
                for i in 0..=grid.rows() {
                    let offset = i as f32 * cell;
                    painter.line_segment(
                        [
                            Pos2::new(rect.min.x, rect.min.y + offset),
                            Pos2::new(rect.max.x, rect.min.y + offset),
                        ],
                        stroke,
                    );
                    painter.line_segment(
                        [
                            Pos2::new(rect.min.x + offset, rect.min.y),
                            Pos2::new(rect.min.x + offset, rect.max.y),
                        ],
                        stroke,
                    );
                }
            }

            let rows = grid.rows();
            let (primary, secondary, pos) = ui.input(|i| {
                (
                    i.pointer.primary_down(),
                    i.pointer.secondary_down(),
                    i.pointer.interact_pos(),
                )
            });
            let Some(point) = pos.and_then(|pos| point_at(rect, rows, pos)) else {
                return;
            };

            let edit = if primary {
                session.paint(point).map(|_| ())
            } else if secondary {
                session.erase(point)
            } else {
                Ok(())
            };
            match edit {
                Ok(()) => {}
                Err(SessionError::SearchInProgress) => {
                    *status = "Wait for the search to end before editing".to_owned();
                }
                Err(err) => debug!("edit at {} rejected: {}", point, err),
            }
        });

        if back_to_menu {
            self.status.clear();
            self.screen = Screen::Menu;
        }
    }
}

fn begin(session: &mut Session, status: &mut String) {
    match session.begin() {
        Ok(()) => status.clear(),
        Err(err) => {
            debug!("search not started: {}", err);
            *status = err.to_string();
        }
    }
}

fn describe(state: Option<&SearchState>) -> String {
    match state {
        None => "Idle".to_owned(),
        Some(SearchState::Computing) => "Searching...".to_owned(),
        Some(SearchState::Found(result)) => format!(
            "Path of length {} ({} cells expanded)",
            result.edges(),
            result.expanded
        ),
        Some(SearchState::Exhausted) => "No path exists".to_owned(),
        Some(SearchState::Cancelled) => "Stopped".to_owned(),
    }
}

/// Map a screen position inside `rect` to the cell under it
fn point_at(rect: Rect, rows: usize, pos: Pos2) -> Option<Point> {
    if !rect.contains(pos) || rows == 0 {
        return None;
    }
    let cell = rect.width() / rows as f32;
    let row = ((pos.y - rect.min.y) / cell) as usize;
    let col = ((pos.x - rect.min.x) / cell) as usize;

    // the max edge of the rect belongs to the last cell
    Some(Point {
        row: row.min(rows - 1),
        col: col.min(rows - 1),
    })
}

fn cell_color(kind: CellKind) -> Color32 {
    match kind {
        CellKind::Empty => Color32::WHITE,
        CellKind::Barrier => Color32::BLACK,
        CellKind::Start => Color32::from_rgb(255, 165, 0),
        CellKind::End => Color32::from_rgb(64, 224, 208),
        CellKind::Open => Color32::from_rgb(0, 255, 0),
        CellKind::Closed => Color32::from_rgb(255, 0, 0),
        CellKind::Path => Color32::from_rgb(128, 0, 128),
    }
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.screen {
            Screen::Menu => self.menu(ctx),
            Screen::Grid(_) => self.grid_view(ctx),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_point_at() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::splat(500.0));

        assert_eq!(
            point_at(rect, 50, Pos2::new(100.0, 50.0)),
            Some(Point { row: 0, col: 0 })
        );
        assert_eq!(
            point_at(rect, 50, Pos2::new(125.0, 75.0)),
            Some(Point { row: 2, col: 2 })
        );
        // x selects the column, y the row
        assert_eq!(
            point_at(rect, 50, Pos2::new(105.0, 545.0)),
            Some(Point { row: 49, col: 0 })
        );
        assert_eq!(
            point_at(rect, 50, Pos2::new(600.0, 550.0)),
            Some(Point { row: 49, col: 49 })
        );
        assert_eq!(point_at(rect, 50, Pos2::new(99.0, 60.0)), None);
    }

    #[test]
    fn test_every_kind_has_its_own_color() {
        let kinds = [
            CellKind::Empty,
            CellKind::Barrier,
            CellKind::Start,
            CellKind::End,
            CellKind::Open,
            CellKind::Closed,
            CellKind::Path,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(cell_color(*a), cell_color(*b), "{} and {}", a, b);
            }
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(None), "Idle");
        assert_eq!(describe(Some(&SearchState::Exhausted)), "No path exists");
    }
}
