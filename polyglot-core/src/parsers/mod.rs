pub mod descriptor;
pub mod translation;
