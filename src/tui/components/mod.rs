pub mod keypad;
pub mod landing;
pub mod phone;
pub mod title_bar;

pub use landing::Landing;
pub use phone::Phone;
pub use title_bar::TitleBar;
