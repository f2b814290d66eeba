//! Members of this module deal with the network.

pub mod network;
