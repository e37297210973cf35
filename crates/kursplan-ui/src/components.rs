mod calendar_header;
mod popover;
mod settings;

pub use calendar_header::CalendarHeader;
pub use popover::Popover;
pub use settings::Settings;
