pub mod controller;
pub mod views;

pub use controller::{AppController, UiCommand};
