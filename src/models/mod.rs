pub mod application;
pub mod course;
mod lenient;

pub use application::Application;
pub use course::Course;
