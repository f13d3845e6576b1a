pub mod initialize;
pub mod register_address;
pub mod submit_message;
