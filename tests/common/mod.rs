//! Shared utilities for integration testing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use failover_sink::{Connection, ConnectionError, ConnectionFactory, Endpoint, EndpointPool, WriteError};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Observable state behind a [`ScriptedFactory`].
#[derive(Debug, Default)]
pub struct Script {
    pub reachable: HashSet<String>,
    /// Refuse this many upcoming opens regardless of `reachable`.
    pub refuse_next: usize,
    /// Fail this many upcoming writes.
    pub fail_next_writes: usize,
    pub open_delay: Duration,
    /// Host of every open attempt, in order.
    pub opens: Vec<String>,
    pub closes: usize,
    pub live: usize,
    pub max_live: usize,
    pub written: Vec<(String, Vec<u8>)>,
}

/// Connection factory driven by a shared [`Script`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedFactory {
    script: Arc<Mutex<Script>>,
}

#[allow(dead_code)]
impl ScriptedFactory {
    pub fn reaching(hosts: &[&str]) -> Self {
        let factory = Self::default();
        factory.set_reachable(hosts);
        factory
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub fn set_reachable(&self, hosts: &[&str]) {
        self.script().reachable = hosts.iter().map(|h| h.to_string()).collect();
    }

    pub fn opens(&self) -> Vec<String> {
        self.script().opens.clone()
    }

    pub fn open_count(&self) -> usize {
        self.script().opens.len()
    }

    pub fn close_count(&self) -> usize {
        self.script().closes
    }
}

pub struct ScriptedConnection {
    host: String,
    script: Arc<Mutex<Script>>,
}

impl Connection for ScriptedConnection {
    async fn write(&mut self, record: &[u8]) -> Result<(), WriteError> {
        let mut script = self.script.lock().unwrap();
        if script.fail_next_writes > 0 {
            script.fail_next_writes -= 1;
            return Err(WriteError::Rejected(format!("{} went away", self.host)));
        }
        script.written.push((self.host.clone(), record.to_vec()));
        Ok(())
    }

    async fn close(self) {
        let mut script = self.script.lock().unwrap();
        script.closes += 1;
        script.live -= 1;
    }
}

impl ConnectionFactory for ScriptedFactory {
    type Connection = ScriptedConnection;

    async fn open(&self, endpoint: &Endpoint) -> Result<ScriptedConnection, ConnectionError> {
        let delay = {
            let mut script = self.script();
            script.opens.push(endpoint.host().to_string());
            script.open_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut script = self.script();
        let refused = if script.refuse_next > 0 {
            script.refuse_next -= 1;
            true
        } else {
            !script.reachable.contains(endpoint.host())
        };
        if refused {
            return Err(ConnectionError::Refused {
                endpoint: endpoint.clone(),
                reason: "scripted".into(),
            });
        }

        script.live += 1;
        script.max_live = script.max_live.max(script.live);
        Ok(ScriptedConnection {
            host: endpoint.host().to_string(),
            script: self.script.clone(),
        })
    }
}

/// A reproducibly shuffled pool and its host order.
#[allow(dead_code)]
pub fn seeded_pool(list: &str, seed: u64) -> (EndpointPool, Vec<String>) {
    let pool = EndpointPool::parse_with_rng(list, &mut StdRng::seed_from_u64(seed)).unwrap();
    let order = pool.endpoints().iter().map(|e| e.host().to_string()).collect();
    (pool, order)
}
