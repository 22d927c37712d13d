//! Deferred model imports
//!
//! A model request is validated synchronously, then parsed on a later frame.
//! Each request carries a token; when a newer request for the same id
//! arrives first, the older one is dropped on completion instead of
//! overwriting the newer result.

use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use crate::factory::PendingModel;
use crate::object::ObjectId;

/// Identity of one model import request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImportToken(Uuid);

impl ImportToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// FIFO of pending imports with latest-request-wins per id
#[derive(Debug, Default)]
pub struct ImportQueue {
    pending: VecDeque<(ImportToken, PendingModel)>,
    latest: HashMap<ObjectId, ImportToken>,
}

impl ImportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, model: PendingModel) -> ImportToken {
        let token = ImportToken::new();
        self.latest.insert(model.id.clone(), token);
        self.pending.push_back((token, model));
        token
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// True while a request for `id` is waiting
    pub fn is_pending(&self, id: &ObjectId) -> bool {
        self.latest.contains_key(id)
    }

    /// Take the next request. The boolean is false if a newer request for
    /// the same id has superseded it.
    pub fn next(&mut self) -> Option<(ImportToken, PendingModel, bool)> {
        let (token, model) = self.pending.pop_front()?;
        let current = self.latest.get(&model.id) == Some(&token);
        if current {
            self.latest.remove(&model.id);
        }
        Some((token, model, current))
    }
}
