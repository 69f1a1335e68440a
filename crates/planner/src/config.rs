/// Configuration for catalog access, search paging and grid geometry
use crate::error::PlannerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub grid: GridConfig,
}

/// Where the two catalog sources live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub majors_path: String,
    pub liberal_arts_path: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of lectures revealed per page of the result list
    pub page_size: usize,
}

/// Timetable grid geometry, used to turn drag deltas into cell offsets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_width: f64,
    pub cell_height: f64,
    /// Number of day columns (starting at Monday)
    pub days: usize,
    /// Number of period rows, numbered from 1
    pub periods: u8,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173/".to_string(),
            majors_path: "schedules-majors.json".to_string(),
            liberal_arts_path: "schedules-liberal-arts.json".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { page_size: 100 }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: 80.0,
            cell_height: 30.0,
            days: 6,
            periods: 24,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            search: SearchConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Loads a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON configuration file
    ///
    /// # Returns
    /// * `Ok(PlannerConfig)` - Loaded and validated configuration
    /// * `Err` - If the file can't be read, parsed, or fails validation
    pub fn load_from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = fs::read_to_string(path)?;
        let config: PlannerConfig =
            serde_json::from_str(&content).map_err(|e| PlannerError::Config {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make paging or drag conversion meaningless
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.search.page_size == 0 {
            return Err(PlannerError::Config {
                message: "search.page_size must be positive".to_string(),
            });
        }
        if !(self.grid.cell_width > 0.0 && self.grid.cell_height > 0.0) {
            return Err(PlannerError::Config {
                message: "grid cell sizes must be positive".to_string(),
            });
        }
        if self.grid.days == 0 || self.grid.days > 6 || self.grid.periods == 0 {
            return Err(PlannerError::Config {
                message: "grid must have 1-6 days and at least one period".to_string(),
            });
        }
        url::Url::parse(&self.catalog.base_url)?;
        Ok(())
    }
}
