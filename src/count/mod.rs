pub mod bounded;
pub mod connected;
