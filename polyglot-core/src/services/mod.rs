pub mod catalog;
pub mod corpus;
pub mod discovery;
pub mod encoding;
pub mod persistence;
pub mod pipeline;
pub mod qa;
pub mod rebuild;
pub mod workspace;
