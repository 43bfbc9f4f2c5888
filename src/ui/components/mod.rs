pub mod avatar;
pub mod chat_area;
pub mod header;
pub mod input_bar;
pub mod profile_form;
pub mod sidebar;
pub mod toasts;
