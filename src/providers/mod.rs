//! Capture provider implementations

pub mod memory;
pub mod pcap;

pub use memory::MemoryProvider;
pub use pcap::PcapProvider;
