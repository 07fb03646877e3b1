//! Shuffled endpoint pool with a rotation cursor.
//!
//! # Responsibilities
//! - Parse the configured endpoint list
//! - Shuffle it once so clients sharing a list spread out
//! - Rotate through candidates on connection failure

use rand::seq::SliceRandom;
use rand::Rng;

use crate::endpoint::Endpoint;
use crate::error::ConfigurationError;

/// Ordered, shuffled endpoint candidates plus the rotation cursor.
///
/// The set of endpoints never changes after construction; only the
/// cursor moves.
#[derive(Debug, Clone)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
    index: usize,
}

impl EndpointPool {
    /// Build a pool from `host:port` entries, shuffled with the thread-local RNG.
    pub fn build<S: AsRef<str>>(raw: &[S]) -> Result<Self, ConfigurationError> {
        Self::build_with_rng(raw, &mut rand::thread_rng())
    }

    /// Build a pool from `host:port` entries, shuffled with the given RNG.
    pub fn build_with_rng<S, R>(raw: &[S], rng: &mut R) -> Result<Self, ConfigurationError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if raw.is_empty() {
            return Err(ConfigurationError::Empty);
        }

        let mut endpoints = raw
            .iter()
            .map(|entry| entry.as_ref().parse())
            .collect::<Result<Vec<Endpoint>, _>>()?;

        // Fisher-Yates, uniform over all permutations.
        endpoints.shuffle(rng);

        Ok(Self {
            endpoints,
            index: 0,
        })
    }

    /// Parse a comma separated `host1:port1,host2:port2` list.
    pub fn parse(list: &str) -> Result<Self, ConfigurationError> {
        Self::parse_with_rng(list, &mut rand::thread_rng())
    }

    /// Parse a comma separated list, shuffled with the given RNG.
    pub fn parse_with_rng<R: Rng + ?Sized>(list: &str, rng: &mut R) -> Result<Self, ConfigurationError> {
        if list.trim().is_empty() {
            return Err(ConfigurationError::Empty);
        }
        let entries: Vec<&str> = list.split(',').collect();
        Self::build_with_rng(&entries, rng)
    }

    /// The endpoint under the cursor.
    pub fn current(&self) -> &Endpoint {
        &self.endpoints[self.index]
    }

    /// Move the cursor to the next endpoint, wrapping around.
    pub fn advance(&mut self) -> &Endpoint {
        self.index = (self.index + 1) % self.endpoints.len();
        self.current()
    }

    /// True once the cursor is back where a sweep started.
    pub fn cycled_back_to_start(&self, start_index: usize) -> bool {
        self.index == start_index
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false; a pool holds at least one endpoint.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints in rotation order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }
}
