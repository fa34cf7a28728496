//! LR11xx command set
//!
//! Every command the radio session needs, as typed [`regiface`] commands.
//! Opcodes are 16 bits wide and sent most significant byte first.
//!
//! # Command Groups
//! - [`system`]: power modes, regulator, oscillators, calibration,
//!   RF switch table and interrupt routing
//! - [`radio`]: frequency, packet type, modulation and packet framing,
//!   PA setup, TX/RX triggers and packet status
//! - [`regmem`]: radio buffer access
//! - [`status`]: status words, version and latched errors
//!
//! # BUSY Handling
//! The chip holds BUSY high while it processes a command. A new command
//! may only be sent once BUSY is low, and a response may only be read
//! after the command that produced it has completed. [`Device`](crate::Device)
//! takes care of both.

pub mod radio;
pub mod regmem;
pub mod status;
pub mod system;

pub use radio::*;
pub use regmem::*;
pub use status::*;
pub use system::*;
