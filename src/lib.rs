pub mod layout;
pub mod logging;
pub mod settings;
