pub mod drawer;
pub mod footer;
pub mod help_overlay;
pub mod label_chips;
pub mod lines_view;
pub mod popover;
pub mod tab_bar;
pub mod table;
pub mod text_input;
pub mod timeline;
pub mod truncate;
