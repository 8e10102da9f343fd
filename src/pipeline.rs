//! Stage registry and runner.
//!
//! A [`Pipeline`] owns an ordered list of named stages. `run` computes the
//! language guess once, then folds the text through every enabled stage in
//! registration order. There is no short-circuiting and no skip-on-error:
//! a failing stage aborts the whole run and no partial output is returned.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lang::LanguageGuess;

/// Stage transformation function. Stages that cannot fail simply always
/// return `Ok`; an `Err` aborts the run (see [`Error::Stage`]).
pub type StageFn = Box<dyn Fn(String, &LanguageGuess) -> anyhow::Result<String> + Send + Sync>;

struct Stage {
    name: String,
    enabled: bool,
    run: StageFn,
}

/// Ordered, toggleable list of text transformation stages.
///
/// Construction is explicit: build with [`Pipeline::new`] and attach stages
/// with [`register`](Pipeline::register), or use
/// [`base_pipeline`](crate::base_pipeline) for the built-in stage set.
/// After construction the pipeline is immutable on the run path (`run`
/// takes `&self`), so one instance can serve concurrent callers.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "stages",
                &self
                    .stages
                    .iter()
                    .map(|s| (s.name.as_str(), s.enabled))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage, or replace the stage of the same name **in place**
    /// (same position in the order) if one is already registered. Stage
    /// order is fixed by first registration and never changes afterwards.
    pub fn register<F>(&mut self, name: &str, enabled: bool, f: F)
    where
        F: Fn(String, &LanguageGuess) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        let stage = Stage {
            name: name.to_string(),
            enabled,
            run: Box::new(f),
        };
        match self.stages.iter().position(|s| s.name == name) {
            Some(pos) => self.stages[pos] = stage,
            None => self.stages.push(stage),
        }
    }

    /// Enable or disable a registered stage. Returns `false` when no stage
    /// of that name exists.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.stages.iter_mut().find(|s| s.name == name) {
            Some(stage) => {
                stage.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Registered stage names, in execution order (disabled stages included).
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.stages.iter().find(|s| s.name == name).map(|s| s.enabled)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run the full pipeline on `text`.
    ///
    /// The [`LanguageGuess`] is computed once and passed unchanged to every
    /// stage. Disabled stages are skipped entirely — not invoked, not
    /// logged. A stage error aborts the run with [`Error::Stage`] naming
    /// the failing stage.
    pub fn run(&self, text: &str) -> Result<String> {
        let guess = LanguageGuess::of(text);
        trace!(lang = ?guess.lang, cjk = guess.cjk, latin = guess.latin, "language guess");

        let mut out = text.to_string();
        for stage in &self.stages {
            if !stage.enabled {
                continue;
            }
            out = (stage.run)(out, &guess).map_err(|reason| Error::Stage {
                stage: stage.name.clone(),
                reason,
            })?;
            debug!(stage = %stage.name, out_len = out.len(), "stage applied");
        }
        Ok(out)
    }
}
