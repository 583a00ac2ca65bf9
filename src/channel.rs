//! Bounded control queue for `no_std` targets
//!
//! Built on `critical-section` and `heapless::Deque`, so producers may run in
//! interrupt handlers or other tasks while the control loop drains the queue.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Value rejected because the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// The queue is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Fixed-capacity multi-producer queue
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Queue `value`, evicting the oldest entry when full
    ///
    /// Returns the evicted entry.
    pub fn force_send(&self, value: T) -> Option<T> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let evicted = if queue.is_full() { queue.pop_front() } else { None };
            // Cannot fail, a slot was freed above
            let _ = queue.push_back(value);
            evicted
        })
    }

    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle of a [`Channel`]
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }

    pub fn force_send(&self, value: T) -> Option<T> {
        self.channel.force_send(value)
    }
}

/// Consumer handle of a [`Channel`]
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
