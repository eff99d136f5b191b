// Shared view components
pub mod buttons;
pub mod forms;
pub mod layout;
pub mod notifications;
