pub mod discovery;
pub mod qualification;
