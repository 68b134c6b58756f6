//! Command mailbox for `no_std` environments
//!
//! Button handlers, MQTT callbacks and interrupts run outside the context
//! that owns the light state. They post commands here; the owner drains the
//! mailbox between compositions, so state changes never interleave.
//!
//! Built on `critical-section` and `heapless::Deque`, safe to use from
//! interrupts.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::command::Command;

/// Error returned when posting to a full mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Bounded multi-producer mailbox.
pub struct Mailbox<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Mailbox<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for posting messages; any number may exist.
    pub const fn sender(&self) -> MailboxSender<'_, T, SIZE> {
        MailboxSender { mailbox: self }
    }

    /// Handle for draining messages; meant for the state owner.
    pub const fn receiver(&self) -> MailboxReceiver<'_, T, SIZE> {
        MailboxReceiver { mailbox: self }
    }

    /// Post a message, handing it back when the mailbox is full.
    pub fn try_send(&self, message: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(message).map_err(TrySendError)
        })
    }

    /// Take the oldest message.
    pub fn try_receive(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for Mailbox<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting side of a [`Mailbox`].
pub struct MailboxSender<'a, T, const SIZE: usize> {
    mailbox: &'a Mailbox<T, SIZE>,
}

impl<T, const SIZE: usize> Clone for MailboxSender<'_, T, SIZE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SIZE: usize> Copy for MailboxSender<'_, T, SIZE> {}

impl<T, const SIZE: usize> MailboxSender<'_, T, SIZE> {
    pub fn try_send(&self, message: T) -> Result<(), TrySendError<T>> {
        self.mailbox.try_send(message)
    }
}

/// Draining side of a [`Mailbox`].
pub struct MailboxReceiver<'a, T, const SIZE: usize> {
    mailbox: &'a Mailbox<T, SIZE>,
}

impl<T, const SIZE: usize> Clone for MailboxReceiver<'_, T, SIZE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SIZE: usize> Copy for MailboxReceiver<'_, T, SIZE> {}

impl<T, const SIZE: usize> MailboxReceiver<'_, T, SIZE> {
    pub fn try_receive(&self) -> Option<T> {
        self.mailbox.try_receive()
    }
}

/// Mailbox carrying light commands.
pub type CommandMailbox<const SIZE: usize> = Mailbox<Command, SIZE>;

pub type CommandSender<'a, const SIZE: usize> = MailboxSender<'a, Command, SIZE>;

pub type CommandReceiver<'a, const SIZE: usize> = MailboxReceiver<'a, Command, SIZE>;
