pub mod choice_select;
pub mod copy_button;
pub mod history_panel;
pub mod model_picker;
pub mod sidebar;
