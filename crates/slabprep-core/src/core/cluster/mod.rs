//! Static knowledge about the batch cluster and the checkpoints runs leave behind.

pub mod checkpoints;
pub mod queues;
