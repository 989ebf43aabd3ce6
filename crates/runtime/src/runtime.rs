//! Runtime assembly.
//!
//! [`Runtime`] owns the registry, the script evaluator and the content
//! factory, and hands out a cloneable [`Dispatcher`] to transports.

use std::sync::Arc;

use calc_content::ContentFactory;
use calc_core::BonusEvaluator;
use tracing::info;

use crate::api::{ReplySink, Result, RuntimeError};
use crate::commands::Dispatcher;
use crate::config::RuntimeConfig;
use crate::registry::Registry;
use crate::script::FormulaEvaluator;

pub struct Runtime {
    config: RuntimeConfig,
    dispatcher: Dispatcher,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Cloneable command entry point for transports.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.dispatcher.registry()
    }

    /// Handles one inbound message, sending any reply to `sink`.
    pub async fn handle_message(&self, scope: &str, text: &str, sink: &dyn ReplySink) -> Result<()> {
        self.dispatcher.serve(scope, text, sink).await
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    evaluator: Option<Arc<dyn BonusEvaluator>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            evaluator: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default [`FormulaEvaluator`].
    pub fn evaluator(mut self, evaluator: impl BonusEvaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Builds the runtime, loading the data directory first when
    /// `load_on_start` is set.
    ///
    /// A failed initial load is an error; the caller decides whether to
    /// continue with built-in sides only.
    pub async fn build(self) -> Result<Runtime> {
        let registry = Arc::new(Registry::new());
        let factory = Arc::new(ContentFactory::new(&self.config.data_dir));
        let evaluator: Arc<dyn BonusEvaluator> = match self.evaluator {
            Some(evaluator) => evaluator,
            None => Arc::new(FormulaEvaluator::new()),
        };

        if self.config.load_on_start {
            let registry = Arc::clone(&registry);
            let factory = Arc::clone(&factory);
            let evaluator = Arc::clone(&evaluator);
            let summary =
                tokio::task::spawn_blocking(move || registry.reload(&factory, evaluator.as_ref()))
                .await
                .map_err(RuntimeError::WorkerJoin)?
                .map_err(RuntimeError::InitialLoad)?;
            info!(
                generation = summary.generation,
                files = summary.files,
                "initial data load complete"
            );
        }

        let dispatcher = Dispatcher::new(
            registry,
            evaluator,
            factory,
            self.config.command_prefix.clone(),
        );

        Ok(Runtime {
            config: self.config,
            dispatcher,
        })
    }
}
