//! Command dispatch against the registry.
//!
//! One [`Dispatcher`] serves every inbound message. Calculations and reloads
//! run on the blocking pool because script evaluation and file reads may
//! block; each request works on its own [`calc_core::SideView`] snapshot.

use std::fmt::Write as _;
use std::sync::Arc;

use calc_content::ContentFactory;
use calc_core::{BonusEvaluator, CalcError, PatternReport, Price};
use tracing::{debug, warn};

use super::help;
use super::parse::{Command, HelpTopic};
use crate::api::{ReplySink, Result, RuntimeError};
use crate::registry::{Registry, ReloadSummary};

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    evaluator: Arc<dyn BonusEvaluator>,
    factory: Arc<ContentFactory>,
    prefix: String,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Registry>,
        evaluator: Arc<dyn BonusEvaluator>,
        factory: Arc<ContentFactory>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            evaluator,
            factory,
            prefix: prefix.into(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Handles one message and returns the reply text, if any.
    ///
    /// Command failures become user-facing replies; `Err` is reserved for
    /// runtime faults such as a panicked worker.
    pub async fn handle(&self, scope: &str, text: &str) -> Result<Option<String>> {
        let Some(command) = Command::parse(&self.prefix, text) else {
            return Ok(None);
        };
        debug!(scope, ?command, "dispatching command");

        let side = self.registry.side(scope);
        let reply = match command {
            Command::Help(HelpTopic::Short) => Some(help::short(&self.prefix)),
            Command::Help(HelpTopic::Full) => Some(help::full(&self.prefix)),
            Command::Help(HelpTopic::Ids) => Some(help::ids(&side)),
            Command::Reload => Some(self.reload().await?),
            Command::ListSpires => Some(side.enabled_spires().join(", ")),
            Command::SetSpires(ids) => match side.set_spire_list(&ids) {
                Ok(()) => None,
                Err(err) => Some(format!("{}. Spire list unchanged.", user_message(&err))),
            },
            Command::AdjustSpires { enable, ids } => {
                let rejected = side.adjust_spire_list(enable, &ids);
                if rejected.is_empty() {
                    None
                } else {
                    warn!(scope, ?rejected, "rejected spire IDs");
                    Some(
                        rejected
                            .iter()
                            .map(|id| format!("Invalid spire ID: {id} Ignoring."))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    )
                }
            }
            Command::Pattern(request) => {
                let view = side.view();
                let evaluator = Arc::clone(&self.evaluator);
                let result = tokio::task::spawn_blocking(move || {
                    calc_core::calculate(&view, evaluator.as_ref(), &request)
                })
                .await
                .map_err(RuntimeError::WorkerJoin)?;
                Some(match result {
                    Ok(report) => render_report(&report),
                    Err(err) => {
                        debug!(scope, code = err.error_code(), "pattern rejected");
                        user_message(&err)
                    }
                })
            }
            Command::Tweak(literal) => match literal.parse::<Price>() {
                Ok(production) => {
                    side.set_tweak(production);
                    None
                }
                Err(err) => Some(user_message(&err)),
            },
            Command::Debug(None) => Some(format!(
                "Debug output is {}.",
                if side.debug_enabled() { "on" } else { "off" }
            )),
            Command::Debug(Some(enabled)) => {
                side.set_debug(enabled);
                None
            }
            Command::Literal(literal) => Some(
                match calc_core::calculate_literal(&side.view(), &literal) {
                    Ok(scaled) => scaled.to_string(),
                    Err(CalcError::InvalidCowsLiteral(_)) => "Invalid input.".to_string(),
                    Err(err) => user_message(&err),
                },
            ),
            Command::Invalid => Some("Invalid input.".to_string()),
        };

        Ok(reply)
    }

    /// Handles one message and delivers the reply through `sink`.
    pub async fn serve(&self, scope: &str, text: &str, sink: &dyn ReplySink) -> Result<()> {
        if let Some(reply) = self.handle(scope, text).await? {
            sink.send(scope, &reply).await?;
        }
        Ok(())
    }

    /// Reloads the registry on the blocking pool.
    pub async fn reload(&self) -> Result<String> {
        let registry = Arc::clone(&self.registry);
        let factory = Arc::clone(&self.factory);
        let evaluator = Arc::clone(&self.evaluator);
        let result =
            tokio::task::spawn_blocking(move || registry.reload(&factory, evaluator.as_ref()))
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(match result {
            Ok(summary) => render_summary(&summary),
            Err(err) => format!("{}. Previous configuration kept.", user_message(&err)),
        })
    }
}

fn render_report(report: &PatternReport) -> String {
    let mut out = format!("Raw Cost:\n\t{}", report.raw);
    for step in &report.steps {
        let _ = write!(out, "\nAfter Bonus: {}\n\t{}", step.name, step.cost);
    }
    let _ = write!(out, "\nFinal COWS Score:\n\t{}", report.scaled);
    out
}

fn render_summary(summary: &ReloadSummary) -> String {
    let mut out = format!(
        "Reloaded {} data files (generation {}).",
        summary.files, summary.generation
    );
    for (name, spires, parts, bonuses) in &summary.sides {
        let _ = write!(
            out,
            "\n{name}: {spires} spires, {parts} parts, {bonuses} bonuses"
        );
    }
    if !summary.skipped.is_empty() {
        let _ = write!(out, "\nSkipped: {}", summary.skipped.join(", "));
    }
    if summary.superseded {
        out.push_str("\nA newer reload finished first; its configuration is active.");
    }
    out
}

/// User-facing text for a failed command.
pub fn user_message(err: &CalcError) -> String {
    match err {
        CalcError::PartNotFound(id) => format!("Invalid pattern or part ID: {id}"),
        CalcError::BonusNotFound(id) => format!("Invalid bonus ID: {id}"),
        CalcError::SpireNotFound(id) if id.is_empty() => "Invalid spire ID: (empty)".to_string(),
        CalcError::SpireNotFound(id) => format!("Invalid spire ID: {id}"),
        CalcError::InvalidCount(count) => format!("Invalid count: {count}"),
        CalcError::InvalidCowsLiteral(_) => "Invalid COWS specifier.".to_string(),
        CalcError::InvalidSpireList(id) => {
            format!("Invalid spire list: {id} is no longer defined")
        }
        CalcError::CompositionCycle(id) => format!("Part {id} contains itself"),
        CalcError::ConfigLoad(message) => format!("Reload failed: {message}"),
        CalcError::BonusScript { bonus, message } => {
            format!("Bonus {bonus} failed: {message}")
        }
    }
}
