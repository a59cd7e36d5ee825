// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The render context: a fixed-capacity command buffer filled concurrently.
//!
//! Any number of threads may call [`RenderContext::reserve`] or
//! [`RenderContext::queue`] on a shared reference. Each call claims a unique
//! slot with one atomic operation and records a 64-bit sort key next to it.
//! Sorting and consumption need exclusive access, which the borrow checker
//! turns into the "all producers finished" barrier.

use crate::renderer::api::command::RenderCommand;
use crate::renderer::api::resource::RenderTarget;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// A pre-sized buffer of render commands paired with sort keys.
pub struct RenderContext {
    commands: Box<[UnsafeCell<RenderCommand>]>,
    keys: Box<[AtomicU64]>,
    reserved: AtomicUsize,
    order: Vec<u32>,
    target: Option<RenderTarget>,
}

// SAFETY: slots are only handed out through `claim`, which returns each index
// at most once until `reset`. `reset` and `sort` take `&mut self`, so no slot
// reference handed to a producer can outlive them, and `sorted` only reads
// indices claimed before the last `sort`.
unsafe impl Sync for RenderContext {}

impl RenderContext {
    /// Allocates a context able to hold `capacity` commands.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity < u32::MAX as usize,
            "Render context capacity {capacity} exceeds the sortable index range"
        );
        Self {
            commands: (0..capacity)
                .map(|_| UnsafeCell::new(RenderCommand::Null))
                .collect(),
            keys: (0..capacity).map(|_| AtomicU64::new(0)).collect(),
            reserved: AtomicUsize::new(0),
            order: Vec::with_capacity(capacity),
            target: None,
        }
    }

    /// Maximum number of commands per dispatch.
    pub fn capacity(&self) -> usize {
        self.commands.len()
    }

    /// Number of slots claimed since the last dispatch.
    pub fn reserved(&self) -> usize {
        self.reserved.load(Ordering::Acquire)
    }

    /// The target this context renders into.
    pub fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    /// Replaces the target, releasing the previous one.
    pub fn set_target(&mut self, target: Option<RenderTarget>) {
        self.target = target;
    }

    fn claim(&self) -> usize {
        let capacity = self.capacity();
        match self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < capacity).then_some(count + 1)
            }) {
            Ok(index) => index,
            Err(_) => panic!("Render command overallocation (capacity {capacity})"),
        }
    }

    /// Claims a slot, records `key` for it and returns the slot for in-place filling.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already claimed.
    #[allow(clippy::mut_from_ref)]
    pub fn reserve(&self, key: u64) -> &mut RenderCommand {
        let index = self.claim();
        self.keys[index].store(key, Ordering::Relaxed);
        // SAFETY: `claim` returned `index` to this caller alone.
        unsafe { &mut *self.commands[index].get() }
    }

    /// Claims a slot and copies `command` into it.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already claimed.
    pub fn queue(&self, key: u64, command: RenderCommand) {
        *self.reserve(key) = command;
    }

    /// Orders the claimed slots by ascending key. Ties keep claim order.
    pub fn sort(&mut self) {
        let count = *self.reserved.get_mut();
        let keys = &mut self.keys;
        self.order.clear();
        self.order.extend(0..count as u32);
        self.order
            .sort_by_key(|&index| *keys[index as usize].get_mut());
    }

    /// Commands in key order, as of the last [`sort`](Self::sort).
    pub fn sorted(&self) -> impl Iterator<Item = (u64, &RenderCommand)> + '_ {
        self.order.iter().map(move |&index| {
            let index = index as usize;
            // SAFETY: indices in `order` were claimed and filled before `sort`,
            // and no producer reference to them can still be alive.
            let command = unsafe { &*self.commands[index].get() };
            (self.keys[index].load(Ordering::Relaxed), command)
        })
    }

    /// Number of commands visible through [`sorted`](Self::sorted).
    pub fn sorted_len(&self) -> usize {
        self.order.len()
    }

    /// Hands the context back to producers after its commands were consumed.
    ///
    /// [`RenderBackend::dispatch`](crate::renderer::RenderBackend::dispatch)
    /// calls this for every context it consumed.
    pub fn reset(&mut self) {
        self.order.clear();
        self.reserved.store(0, Ordering::Release);
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("capacity", &self.capacity())
            .field("reserved", &self.reserved())
            .field("target", &self.target)
            .finish()
    }
}
