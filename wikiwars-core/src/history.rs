//! Recently searched articles
//!
//! [`RecentArticles`] is a bounded, insertion-ordered list of summaries keyed
//! by article name. [`HistoryHandle`] puts one behind a tokio task so that
//! concurrent searches serialize through a single owner instead of racing on
//! eviction order.

use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};

use crate::analytics::ArticleStatsSummary;
use crate::error::{Error, Result};

/// Result of adding a summary to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Added without eviction
    Added,
    /// Added; the oldest entry was evicted to make room
    Evicted(ArticleStatsSummary),
    /// An entry with the same article name exists; nothing changed
    Duplicate,
}

/// Bounded history of article summaries, oldest first.
#[derive(Debug, Clone)]
pub struct RecentArticles {
    capacity: usize,
    entries: VecDeque<ArticleStatsSummary>,
}

impl RecentArticles {
    /// Create an empty history holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, article_name: &str) -> bool {
        self.entries.iter().any(|s| s.article_name == article_name)
    }

    /// Append a summary, evicting the oldest entry when full.
    ///
    /// Duplicate article names are rejected.
    pub fn add(&mut self, summary: ArticleStatsSummary) -> AddOutcome {
        if self.contains(&summary.article_name) {
            return AddOutcome::Duplicate;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(summary);

        match evicted {
            Some(old) => AddOutcome::Evicted(old),
            None => AddOutcome::Added,
        }
    }

    /// Remove an entry by article name, returning it if present.
    pub fn remove(&mut self, article_name: &str) -> Option<ArticleStatsSummary> {
        let index = self
            .entries
            .iter()
            .position(|s| s.article_name == article_name)?;
        self.entries.remove(index)
    }

    /// Entries, oldest first.
    pub fn list(&self) -> Vec<ArticleStatsSummary> {
        self.entries.iter().cloned().collect()
    }
}

enum Command {
    Add(ArticleStatsSummary, oneshot::Sender<AddOutcome>),
    Remove(String, oneshot::Sender<Option<ArticleStatsSummary>>),
    List(oneshot::Sender<Vec<ArticleStatsSummary>>),
}

/// Cloneable handle to a history owned by a background task.
///
/// The task exits once every handle is dropped. Must be created inside a
/// tokio runtime.
#[derive(Debug, Clone)]
pub struct HistoryHandle {
    sender: mpsc::Sender<Command>,
}

impl HistoryHandle {
    /// Spawn the owning task.
    pub fn spawn(capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Command>(32);
        let mut history = RecentArticles::new(capacity);

        tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                match command {
                    Command::Add(summary, reply) => {
                        let name = summary.article_name.clone();
                        let outcome = history.add(summary);
                        if let AddOutcome::Evicted(old) = &outcome {
                            tracing::debug!(added = %name, evicted = %old.article_name, "History full; evicted oldest");
                        }
                        let _ = reply.send(outcome);
                    }
                    Command::Remove(name, reply) => {
                        let _ = reply.send(history.remove(&name));
                    }
                    Command::List(reply) => {
                        let _ = reply.send(history.list());
                    }
                }
            }
            tracing::debug!("History task stopped");
        });

        Self { sender }
    }

    pub async fn add(&self, summary: ArticleStatsSummary) -> Result<AddOutcome> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Add(summary, reply)).await?;
        response.await.map_err(|_| closed())
    }

    pub async fn remove(&self, article_name: &str) -> Result<Option<ArticleStatsSummary>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Remove(article_name.to_string(), reply))
            .await?;
        response.await.map_err(|_| closed())
    }

    pub async fn list(&self) -> Result<Vec<ArticleStatsSummary>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::List(reply)).await?;
        response.await.map_err(|_| closed())
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.sender.send(command).await.map_err(|_| closed())
    }
}

fn closed() -> Error {
    Error::History("history task is not running".to_string())
}
