pub mod background_pass;
pub mod chair_pass;
pub mod pass;
