//! Cogbias - building-block generation for cognitive-bias experiments.
//!
//! This library generates the lexical pieces used to populate experiment
//! templates (names, occupations, hobbies and descriptions) by chaining calls
//! to a text-completion service. It supports:
//!
//! - **Rejection sampling** with a human reviewing every batch
//! - **Dependency-ordered generation** (hobbies need occupations, descriptions need hobbies)
//! - **Persistent storage** so accepted categories are never generated twice
//! - **Headless operation** through an injected operator for tests and scripts
//!
//! # Architecture
//!
//! - [`category`] - Category enum, prerequisite graph and dependency resolver
//! - [`store`] - Persisted building blocks
//! - [`sampler`] - Generation requests and the rejection-sampling loop
//! - [`prompts`] - Category-specific prompts and candidate cleaning
//! - [`pipeline`] - Runs procedures in dependency order and fills the store
//! - [`completion`] - Completion backends (HTTP service and mock)
//! - [`http_client`] - HTTP client abstraction
//! - [`providers`] - Operator trait and scripted operator
//! - [`operator_ui`] - Console operator
//! - [`experiment`] - Experiment items rendered from a template
//! - [`config`] - Configuration management (API key, endpoint, paths)
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use cogbias::category::Category;
//! use cogbias::completion::MockCompletionBackend;
//! use cogbias::pipeline::GenerationPipeline;
//! use cogbias::providers::ScriptedOperator;
//! use cogbias::store::BuildingBlockStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut pipeline = GenerationPipeline::new(
//!         BuildingBlockStore::new(),
//!         Box::new(MockCompletionBackend::new()),
//!         Box::new(ScriptedOperator::accepting()),
//!     );
//!
//!     // Generates occupations, then one hobby per occupation, then one
//!     // description per hobby.
//!     pipeline.generate(Category::Descriptions).await?;
//!     pipeline.store().save("building_blocks.bin")?;
//!
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod completion;
pub mod config;
pub mod error;
pub mod experiment;
pub mod http_client;
pub mod operator_ui;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod sampler;
pub mod store;
