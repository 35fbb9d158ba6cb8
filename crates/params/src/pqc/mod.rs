//! Constants for post-quantum key encapsulation

pub mod mlkem;
