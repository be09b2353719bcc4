//! Generation pipeline.
//!
//! [`GenerationPipeline`] owns the [`BuildingBlockStore`], the completion
//! backend and the operator. Asking for a category first resolves which
//! prerequisites are missing, then runs each procedure in dependency order.
//! A category is written to the store only once its procedure has finished
//! and every batch in it was accepted. With a checkpoint path set, the store
//! is saved after every completed step, so a later failure never loses work
//! the operator already reviewed.

use crate::category::{resolve_plan, Category};
use crate::completion::CompletionBackend;
use crate::error::{BlockError, Result};
use crate::prompts;
use crate::providers::Operator;
use crate::sampler::{sample_until_accepted, GenerationRequest, DEFAULT_MAX_TOKENS};
use crate::store::BuildingBlockStore;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct GenerationPipeline {
    store: BuildingBlockStore,
    backend: Box<dyn CompletionBackend>,
    operator: Box<dyn Operator>,
    default_max_tokens: u32,
    checkpoint: Option<PathBuf>,
}

impl GenerationPipeline {
    pub fn new(
        store: BuildingBlockStore,
        backend: Box<dyn CompletionBackend>,
        operator: Box<dyn Operator>,
    ) -> Self {
        Self {
            store,
            backend,
            operator,
            default_max_tokens: DEFAULT_MAX_TOKENS,
            checkpoint: None,
        }
    }

    /// Token budget for list-style categories (names, occupations, hobbies).
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    /// Saves the store to `path` after every category the pipeline completes.
    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    pub fn store(&self) -> &BuildingBlockStore {
        &self.store
    }

    pub fn into_store(self) -> BuildingBlockStore {
        self.store
    }

    /// Generates `target`, generating missing prerequisites first.
    ///
    /// `target` itself is always regenerated, replacing any stored list.
    /// Prerequisites that completed before a later failure stay in the store.
    pub async fn generate(&mut self, target: Category) -> Result<&[String]> {
        let plan = resolve_plan(target, |c| self.store.contains(c))?;
        info!(
            "Generating '{}' (plan: {})",
            target,
            plan.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(" -> ")
        );

        for category in plan {
            if category != target {
                self.operator
                    .announce(&format!("Need to generate {} first.", category))?;
            }

            let items = match self.run_procedure(category).await {
                Ok(items) => items,
                Err(source) if category != target => {
                    return Err(BlockError::PrerequisiteUnavailable {
                        category: target,
                        prerequisite: category,
                        source: Box::new(source),
                    });
                }
                Err(e) => return Err(e),
            };

            info!("Generated {} item(s) for '{}'", items.len(), category);
            self.store.set(category, items);

            if let Some(path) = &self.checkpoint {
                self.store.save(path)?;
                debug!("Checkpointed store to {}", path.display());
            }
        }

        Ok(self.store.get(target).unwrap_or_default())
    }

    async fn run_procedure(&mut self, category: Category) -> Result<Vec<String>> {
        let max_tokens = self.default_max_tokens;
        match category {
            Category::Names => self.sample(&prompts::names_request(max_tokens)?).await,
            Category::Occupations => {
                self.sample(&prompts::occupations_request(max_tokens)?).await
            }
            Category::Hobbies => {
                self.fan_out(Category::Occupations, |occupation| {
                    prompts::hobby_request(occupation, max_tokens)
                })
                .await
            }
            Category::Descriptions => {
                self.fan_out(Category::Hobbies, prompts::description_request)
                    .await
            }
        }
    }

    async fn sample(&mut self, request: &GenerationRequest) -> Result<Vec<String>> {
        sample_until_accepted(&*self.backend, &mut *self.operator, request).await
    }

    /// One batch per upstream item, keeping the first cleaned candidate of each.
    ///
    /// A batch accepted with no candidates contributes nothing, so the result
    /// can be shorter than `upstream`. Renderers detect that through
    /// `ConjunctionFallacy::check_alignment`.
    async fn fan_out<F>(&mut self, upstream: Category, build_request: F) -> Result<Vec<String>>
    where
        F: Fn(&str) -> Result<GenerationRequest>,
    {
        let upstream_items = self
            .store
            .get(upstream)
            .ok_or(BlockError::NotGenerated(upstream))?
            .to_vec();

        let mut results = Vec::with_capacity(upstream_items.len());
        for item in &upstream_items {
            let request = build_request(item)?;
            match self.sample(&request).await?.into_iter().next() {
                Some(first) => results.push(first),
                None => warn!("No candidate accepted for {} '{}'; skipping it", upstream, item),
            }
        }

        if results.len() < upstream_items.len() {
            warn!(
                "{} of {} {} produced no result; lists are no longer index-aligned",
                upstream_items.len() - results.len(),
                upstream_items.len(),
                upstream
            );
        }
        Ok(results)
    }
}
