pub mod image_store;
pub mod laptop_store;
pub mod rating_store;
pub mod user_store;

pub use image_store::{ImageStore, InMemoryImageStore};
pub use laptop_store::{InMemoryLaptopStore, LaptopStore};
pub use rating_store::{InMemoryRatingStore, RatingStore};
pub use user_store::{InMemoryUserStore, UserStore};
