pub mod button;
pub mod color;

pub use button::Button;
pub use color::Color;
