pub mod element;
pub mod host;
mod settings_view;

pub use element::{Element, SelectOption, UiEvent};
pub use host::{HotKey, Mode, ModeContext, ModeHost, dispatch_key};
pub use settings_view::SettingsView;
