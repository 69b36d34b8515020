pub mod dashboard;
pub mod diagnostics_lab;
pub mod text_task;
