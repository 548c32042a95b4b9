pub mod bounds;
pub mod html;
pub mod overlay;
pub mod popup;
pub mod style;
pub mod widget;
