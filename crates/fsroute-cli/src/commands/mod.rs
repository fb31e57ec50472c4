pub mod manifest;
pub mod matcher;
pub mod tree;
