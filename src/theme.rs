use egui::Color32;

// Buttons
pub const PRIMARY_BUTTON_BG: Color32 = Color32::from_rgb(46, 160, 67); // Green download action
pub const SECONDARY_BUTTON_BG: Color32 = Color32::LIGHT_GRAY;
pub const BUTTON_MAIN_TEXT: Color32 = Color32::WHITE;
pub const BUTTON_SECONDARY_TEXT: Color32 = Color32::DARK_GRAY;

// Surfaces
pub const INPUT_FRAME_BG: Color32 = Color32::from_rgb(250, 250, 250);
pub const STATUS_FRAME_BG: Color32 = Color32::from_rgb(248, 248, 248);

// Text
pub const STATUS_TEXT: Color32 = Color32::DARK_GRAY;
pub const TEXT_ERROR: Color32 = Color32::from_rgb(200, 30, 30);
pub const TEXT_SUCCESS: Color32 = Color32::from_rgb(30, 140, 60);

// Sizing
pub const ROUNDING_FRAME: f32 = 4.0;
pub const ROUNDING_BUTTON: f32 = 6.0;
pub const MIN_SIZE_BUTTON: egui::Vec2 = egui::Vec2::new(200.0, 50.0);
pub const BUTTON_FONT_SIZE: f32 = 16.0;
