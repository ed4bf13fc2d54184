//! Charger pool: a fixed number of DC charging slots shared by all vehicles.
//!
//! Requests that cannot be served immediately wait in FIFO order. A release
//! hands the freed slot straight to the longest waiter, so the in-use count
//! never dips between holders.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};

use crate::error::ChargerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargerRequest {
    /// A slot was free and now belongs to the requester.
    Granted,
    /// The requester waits; `position` is 0 for the head of the queue.
    Queued { position: usize },
}

#[derive(Debug, Resource)]
pub struct ChargerPool {
    capacity: usize,
    holders: Vec<Entity>,
    waiting: VecDeque<Entity>,
    peak_in_use: usize,
    total_grants: u64,
}

impl ChargerPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            holders: Vec::with_capacity(capacity),
            waiting: VecDeque::new(),
            peak_in_use: 0,
            total_grants: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.holders.len()
    }

    pub fn available(&self) -> usize {
        self.capacity - self.holders.len()
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Highest simultaneous slot usage observed.
    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }

    pub fn total_grants(&self) -> u64 {
        self.total_grants
    }

    pub fn is_holding(&self, vehicle: Entity) -> bool {
        self.holders.contains(&vehicle)
    }

    pub fn is_waiting(&self, vehicle: Entity) -> bool {
        self.waiting.contains(&vehicle)
    }

    pub fn request(&mut self, vehicle: Entity) -> Result<ChargerRequest, ChargerError> {
        if self.is_holding(vehicle) || self.is_waiting(vehicle) {
            return Err(ChargerError::AlreadyRequested(vehicle));
        }
        if self.holders.len() < self.capacity {
            self.grant(vehicle);
            return Ok(ChargerRequest::Granted);
        }
        self.waiting.push_back(vehicle);
        Ok(ChargerRequest::Queued {
            position: self.waiting.len() - 1,
        })
    }

    /// Frees `vehicle`'s slot. If a request is waiting, the slot passes to
    /// the oldest one, which is returned so the caller can resume it.
    pub fn release(&mut self, vehicle: Entity) -> Result<Option<Entity>, ChargerError> {
        let index = self
            .holders
            .iter()
            .position(|h| *h == vehicle)
            .ok_or(ChargerError::NotHolding(vehicle))?;
        self.holders.swap_remove(index);

        let next = self.waiting.pop_front();
        if let Some(next) = next {
            self.grant(next);
        }
        Ok(next)
    }

    fn grant(&mut self, vehicle: Entity) {
        debug_assert!(self.holders.len() < self.capacity);
        self.holders.push(vehicle);
        self.total_grants += 1;
        self.peak_in_use = self.peak_in_use.max(self.holders.len());
    }
}
