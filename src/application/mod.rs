pub mod dto;
pub mod error;
pub mod use_cases;
pub mod view_model;
