pub mod practice;
pub mod text;
pub mod tracker;
pub mod view;
