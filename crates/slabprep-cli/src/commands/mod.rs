pub mod export;
pub mod generate;
pub mod remote;
pub mod restart;
pub mod status;
