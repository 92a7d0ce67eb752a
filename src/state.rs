use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::travel::TravelProvider;

/// Source of "today" for resolving relative dates like "tomorrow".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub travel: Box<dyn TravelProvider>,
    pub clock: Box<dyn Clock>,
}
