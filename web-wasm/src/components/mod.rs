pub mod annotated_image;
pub mod result_panel;
pub mod sidebar;
pub mod spinner;
pub mod toast_stack;
pub mod upload_area;
