pub mod health;
pub mod paths;
