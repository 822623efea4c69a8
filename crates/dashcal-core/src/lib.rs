pub mod adapter;
pub mod config;
pub mod dashboard;
pub mod date;
pub mod detail;
pub mod fetcher;
pub mod index;
pub mod kinds;
pub mod locale;
pub mod range;
pub mod rows;
pub mod session;
pub mod signals;
pub mod summary;

pub use adapter::{
  CalendarAdapter,
  CalendarWidget,
  MemoryWidget,
  Navigation,
  ViewTransition
};
pub use config::CalendarConfig;
pub use dashboard::{
  Dashboard,
  load_month
};
pub use date::DateInput;
pub use detail::DayDetail;
pub use fetcher::{
  EventSource,
  FetchError,
  FetchOutcome,
  FetchTicket
};
pub use index::EventIndex;
pub use locale::{
  Language,
  LocaleFormatter
};
pub use range::{
  MonthKey,
  MonthRange
};
pub use rows::PanelRow;
pub use session::CalendarSession;
pub use signals::{
  Signal,
  SignalBus,
  SignalKind
};
