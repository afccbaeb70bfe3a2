pub mod host;
pub mod type_to_value;
pub mod typescript;
