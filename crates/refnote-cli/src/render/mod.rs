pub mod console;
pub mod latex;
pub mod plain;
