//! Remote ranking oracle strategy.
//!
//! The catalog is summarized into a bounded listing, the oracle is asked for up to N
//! comma-separated names, and the reply is mapped back onto catalog records by exact name.
//! Transport failures surface as [`MatchError::Oracle`]; a reply that names nothing usable is an
//! empty, successful result.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, warn};

use super::error::{MatchError, MatchResult};
use super::types::{MatchOptions, Query};
use crate::catalog::{Catalog, Record};
use crate::citation::CitationSorter;
use crate::constants::{DEFAULT_ORACLE_LISTING_LIMIT, ORACLE_AREA_TEXT_LIMIT};

/// Default chat model queried by [`GenaiOracle`].
pub const DEFAULT_ORACLE_MODEL: &str = "deepseek-chat";

const SYSTEM_PROMPT: &str = "You match research queries to faculty members. \
Answer only with names copied exactly from the provided listing, separated by commas.";

/// The two messages sent to the oracle for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OraclePrompt {
    pub system: String,
    pub user: String,
}

/// A remote text-completion service that ranks catalog entries.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Sends `prompt` and returns the raw reply text.
    async fn complete(&self, prompt: &OraclePrompt) -> MatchResult<String>;
}

/// [`RankingOracle`] backed by a `genai` chat client.
///
/// Provider credentials are resolved by `genai` from the environment (e.g. `DEEPSEEK_API_KEY`).
pub struct GenaiOracle {
    client: Client,
    model: String,
}

impl GenaiOracle {
    /// Oracle backed by a default `genai` client.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    /// Oracle backed by an existing `genai` client.
    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GenaiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiOracle")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RankingOracle for GenaiOracle {
    async fn complete(&self, prompt: &OraclePrompt) -> MatchResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompt.system.clone()),
            ChatMessage::user(prompt.user.clone()),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| MatchError::Oracle {
                reason: e.to_string(),
            })?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}

/// Strategy that delegates ranking to a [`RankingOracle`].
#[derive(Clone)]
pub struct OracleMatcher {
    catalog: Arc<Catalog>,
    oracle: Arc<dyn RankingOracle>,
    listing_limit: usize,
    sorter: CitationSorter,
}

impl std::fmt::Debug for OracleMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleMatcher")
            .field("records", &self.catalog.len())
            .field("listing_limit", &self.listing_limit)
            .finish_non_exhaustive()
    }
}

impl OracleMatcher {
    /// Matcher asking `oracle` to rank records from `catalog`.
    pub fn new(catalog: Arc<Catalog>, oracle: Arc<dyn RankingOracle>) -> Self {
        Self {
            catalog,
            oracle,
            listing_limit: DEFAULT_ORACLE_LISTING_LIMIT,
            sorter: CitationSorter::new(),
        }
    }

    /// Caps how many records are listed in the prompt.
    pub fn with_listing_limit(mut self, limit: usize) -> Self {
        self.listing_limit = limit;
        self
    }

    /// Replaces the citation sorter.
    pub fn with_sorter(mut self, sorter: CitationSorter) -> Self {
        self.sorter = sorter;
        self
    }

    /// Catalog the oracle picks from.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Maximum number of records listed in the prompt.
    pub fn listing_limit(&self) -> usize {
        self.listing_limit
    }

    /// Prompt sent for `query`. Lists at most `listing_limit` records in catalog order.
    pub fn build_prompt(&self, query: &str, top_n: usize) -> OraclePrompt {
        let listing: Vec<String> = self
            .catalog
            .iter()
            .take(self.listing_limit)
            .map(|record| {
                let areas: String = record
                    .research_text()
                    .chars()
                    .take(ORACLE_AREA_TEXT_LIMIT)
                    .collect();
                format!("{}: {}", record.name, areas)
            })
            .collect();

        let user = format!(
            "Research query: {query}\n\n\
             Faculty listing (name: research areas):\n{}\n\n\
             Return up to {top_n} names from the listing that best match the query, \
             most relevant first, as a single comma-separated line.",
            listing.join("\n")
        );

        OraclePrompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    /// Asks the oracle for a ranking and maps the reply onto the catalog.
    pub async fn find_matches(
        &self,
        query: &Query,
        options: &MatchOptions,
    ) -> MatchResult<Vec<Record>> {
        if query.is_empty() {
            return Ok(super::finish(
                self.catalog.head(options.top_n),
                options,
                &self.sorter,
            ));
        }
        if options.top_n == 0 {
            return Ok(Vec::new());
        }

        let prompt = self.build_prompt(&query.canonical(), options.top_n);
        let reply = self.oracle.complete(&prompt).await?;

        let ranked = parse_reply(&reply, &self.catalog, options.top_n);
        if ranked.is_empty() {
            warn!(reply_len = reply.len(), "Oracle reply named no catalog records");
        } else {
            debug!(matches = ranked.len(), "Oracle reply parsed");
        }

        Ok(super::finish(ranked, options, &self.sorter))
    }
}

/// Maps an oracle reply onto catalog records.
///
/// Names are split on commas and newlines, stripped of bullets and quotes, and looked up
/// exactly. Unknown and repeated names are dropped; at most `top_n` records are returned.
pub fn parse_reply(reply: &str, catalog: &Catalog, top_n: usize) -> Vec<Record> {
    let mut seen = HashSet::new();
    reply
        .split([',', '\n'])
        .map(|part| {
            part.trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, '-' | '*' | '•' | '"' | '\'' | '`')
            })
        })
        .filter(|name| !name.is_empty())
        .filter_map(|name| catalog.index_of(name))
        .filter(|&i| seen.insert(i))
        .take(top_n)
        .filter_map(|i| catalog.get(i).cloned())
        .collect()
}

/// Scripted oracle for tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockOracle {
    reply: parking_lot::Mutex<Option<String>>,
    prompts: parking_lot::Mutex<Vec<OraclePrompt>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockOracle {
    /// Oracle that always answers `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: parking_lot::Mutex::new(Some(reply.into())),
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Oracle whose every call fails with a transport error.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Sets the next reply; `None` makes calls fail.
    pub fn set_reply(&self, reply: Option<String>) {
        *self.reply.lock() = reply;
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<OraclePrompt> {
        self.prompts.lock().last().cloned()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl RankingOracle for MockOracle {
    async fn complete(&self, prompt: &OraclePrompt) -> MatchResult<String> {
        self.prompts.lock().push(prompt.clone());
        self.reply.lock().clone().ok_or_else(|| MatchError::Oracle {
            reason: "mock oracle unavailable".to_string(),
        })
    }
}
