pub mod image;
pub mod laptop;
pub mod user;

pub use image::Image;
pub use laptop::{LaptopFilter, Rating};
pub use user::User;
