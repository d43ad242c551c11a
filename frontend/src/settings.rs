use pathfind::Algorithm;

/// User preferences, persisted between runs through eframe's storage.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    /// Rows (and columns) of new grids
    pub rows: usize,
    /// Pixel width the grid geometry is derived from
    pub width: usize,
    /// Advance the search automatically every frame
    pub auto_step: bool,
    pub steps_per_frame: usize,
    pub frame_delay_ms: u64,
    pub show_grid_lines: bool,
    /// The algorithm picked last time, highlighted in the menu
    pub last_algorithm: Algorithm,
}

impl Settings {
    pub const MIN_ROWS: usize = 2;
    pub const MAX_ROWS: usize = 200;

    /// Row count clamped to what the grid view can draw
    pub fn grid_rows(&self) -> usize {
        self.rows.clamp(Self::MIN_ROWS, Self::MAX_ROWS)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: 50,
            width: 800,
            auto_step: true,
            steps_per_frame: 1,
            frame_delay_ms: 10,
            show_grid_lines: true,
            last_algorithm: Algorithm::AStar,
        }
    }
}
