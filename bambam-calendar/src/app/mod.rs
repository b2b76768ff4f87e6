mod calendar_app;
mod calendar_app_config;
mod calendar_app_error;

pub use calendar_app::CalendarApp;
pub use calendar_app_config::{CalendarAppConfig, ENV_PREFIX};
pub use calendar_app_error::CalendarAppError;
