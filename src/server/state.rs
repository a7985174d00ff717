use crate::weather::WeatherOrchestrator;

pub struct AppState {
    pub orchestrator: WeatherOrchestrator,
}
