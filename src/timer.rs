use core::fmt::Debug;

/// Receive window timer, started by the protocol stack before
/// [`Session::receive`](crate::Session::receive).
pub trait Timer {
    type Error: Debug;

    fn has_elapsed(&mut self) -> Result<bool, Self::Error>;
}
