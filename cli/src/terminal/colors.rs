use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 190, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 200, b: 90 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 220 };

pub const FOUND: Color = Color::Green;
pub const NOT_FOUND: Color = Color::TrueColor { r: 150, g: 150, b: 150 };
pub const FAILED: Color = Color::Red;
pub const ACTIVE: Color = Color::Yellow;
pub const QUIET: Color = Color::Cyan;
