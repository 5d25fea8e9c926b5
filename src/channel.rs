//! Command channel between the network callback and the main loop.
//!
//! Commands may arrive from interrupt or network-stack context while a
//! migration is running. They are queued here and applied one at a time by
//! the main loop, so migrations never overlap.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::dispatcher::LightCommand;

/// Error returned when the channel has no free slot.
///
/// Carries the rejected command back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFull<T>(pub T);

/// Bounded command queue guarded by critical sections.
pub struct CommandChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<LightCommand, SIZE>>>,
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    /// Create an empty channel.
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Queue a command.
    ///
    /// Returns `Err(ChannelFull(command))` if the channel is full.
    pub fn try_send(&self, command: LightCommand) -> Result<(), ChannelFull<LightCommand>> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(ChannelFull)
        })
    }

    /// Take the oldest queued command, if any.
    pub fn try_receive(&self) -> Option<LightCommand> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            queue.pop_front()
        })
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        critical_section::with(|cs| {
            let queue = self.queue.borrow(cs).borrow();
            queue.len()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
