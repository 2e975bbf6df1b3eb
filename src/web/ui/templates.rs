use askama::Template;
use askama_web::WebTemplate;

use crate::countdown::CountdownView;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub station: String,
    pub satellite: String,
    pub pass_time: String,
    pub max_elevation: String,
    pub phase: String,
    pub display: String,
    pub refresh_ms: u64,
}

impl DashboardTemplate {
    pub fn new(view: &CountdownView, station: String, refresh_ms: u64) -> Self {
        Self {
            station,
            satellite: view.satellite.clone().unwrap_or_else(|| "-".to_string()),
            pass_time: view
                .pass_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
            max_elevation: view
                .max_elevation_deg
                .map(|el| format!("{:.1}°", el))
                .unwrap_or_else(|| "-".to_string()),
            phase: view.phase.to_string(),
            display: view.display.clone(),
            refresh_ms,
        }
    }
}
