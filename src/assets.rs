pub const APP_JS: &str = include_str!("../frontend/app.js");
pub const STYLE_CSS: &str = include_str!("../frontend/style.css");
