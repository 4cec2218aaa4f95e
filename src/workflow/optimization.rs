//! Optimize a query, then optionally prepend the expert persona and append
//! the emotional stimulus the backend suggested, each at most once.
//!
//! Augmentations are applied optimistically in three phases.
//! [`OptimizationRecord::begin_augmentation`] patches local state and sets the
//! flag before any await. [`persist_augmentation`] saves the composed text.
//! [`OptimizationRecord::finish_augmentation`] settles the outcome, undoing the
//! local patch if the save failed.

use std::ops::RangeInclusive;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{require_range, require_text};
use crate::api::types::{OptimizationRequest, OptimizationResponse, OptimizationUpdate};
use crate::api::Backend;
use crate::error::ClientResult;

pub const ITERATION_RANGE: RangeInclusive<u8> = 3..=5;
pub const DEFAULT_ITERATIONS: u8 = 3;
pub const HISTORY_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationInput {
    pub user_query: String,
    pub provider: String,
    pub model: String,
    pub technique: String,
    pub iterations: u8,
}

impl OptimizationInput {
    pub fn validate(&self) -> ClientResult<()> {
        require_text("user_query", &self.user_query, "Please enter some text to optimize.")?;
        require_range(
            "iterations",
            self.iterations,
            ITERATION_RANGE,
            "Please set the number of iterations from 3 to 5.",
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augmentation {
    ExpertPersona,
    EmotionalStimulus,
}

impl Augmentation {
    pub fn label(self) -> &'static str {
        match self {
            Augmentation::ExpertPersona => "expert persona",
            Augmentation::EmotionalStimulus => "emotional stimulus",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRecord {
    pub id: Option<String>,
    pub user_query: String,
    pub provider: String,
    pub model: String,
    pub technique: String,
    pub iterations: u8,
    pub final_optimized_query: String,
    pub raw_output: Option<Value>,
    pub expert_persona_text: String,
    pub emotional_stimulus_text: String,
    pub expert_added: bool,
    pub emotional_added: bool,
    in_flight: Option<Augmentation>,
}

/// An augmentation applied locally whose persistence has not resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAugmentation {
    pub kind: Augmentation,
    pub id: String,
    /// Full text to persist.
    pub text: String,
    /// The fragment this augmentation added, newline included.
    fragment: String,
}

impl OptimizationRecord {
    fn from_response(input: &OptimizationInput, resp: OptimizationResponse) -> Self {
        Self {
            id: resp.id.filter(|id| !id.is_empty()),
            user_query: input.user_query.clone(),
            provider: input.provider.clone(),
            model: input.model.clone(),
            technique: input.technique.clone(),
            iterations: input.iterations,
            final_optimized_query: resp.final_optimized_query.unwrap_or_default(),
            raw_output: resp.raw_output,
            expert_persona_text: resp.expert_persona_text.unwrap_or_default(),
            emotional_stimulus_text: resp.emotional_stimuli_text.unwrap_or_default(),
            expert_added: false,
            emotional_added: false,
            in_flight: None,
        }
    }

    pub fn is_added(&self, kind: Augmentation) -> bool {
        match kind {
            Augmentation::ExpertPersona => self.expert_added,
            Augmentation::EmotionalStimulus => self.emotional_added,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    fn augmentation_text(&self, kind: Augmentation) -> &str {
        match kind {
            Augmentation::ExpertPersona => &self.expert_persona_text,
            Augmentation::EmotionalStimulus => &self.emotional_stimulus_text,
        }
    }

    /// Whether `begin_augmentation` would do anything. Drives button state.
    pub fn can_augment(&self, kind: Augmentation) -> bool {
        !self.is_added(kind)
            && self.id.is_some()
            && self.in_flight.is_none()
            && !self.augmentation_text(kind).trim().is_empty()
    }

    /// Phase one: compose the new text, patch it in and set the flag.
    /// Returns `None` (leaving the record untouched) when the augmentation was
    /// already applied, the record has no server id, or another augmentation
    /// is still being persisted.
    pub fn begin_augmentation(&mut self, kind: Augmentation) -> Option<PendingAugmentation> {
        if !self.can_augment(kind) {
            debug!("Skipping {}: not applicable", kind.label());
            return None;
        }
        let id = self.id.clone()?;

        let (text, fragment) = match kind {
            Augmentation::ExpertPersona => {
                let fragment = format!("{}\n", self.expert_persona_text);
                (format!("{}{}", fragment, self.final_optimized_query), fragment)
            }
            Augmentation::EmotionalStimulus => {
                let fragment = format!("\n{}", self.emotional_stimulus_text);
                (format!("{}{}", self.final_optimized_query, fragment), fragment)
            }
        };

        self.final_optimized_query = text.clone();
        match kind {
            Augmentation::ExpertPersona => self.expert_added = true,
            Augmentation::EmotionalStimulus => self.emotional_added = true,
        }
        self.in_flight = Some(kind);

        Some(PendingAugmentation {
            kind,
            id,
            text,
            fragment,
        })
    }

    /// Phase three. Returns `false` and leaves the record alone when the
    /// pending augmentation belongs to a record that has since been replaced.
    /// A failed save removes exactly the fragment it added and frees the flag
    /// so the user can try again.
    pub fn finish_augmentation(&mut self, pending: &PendingAugmentation, saved: bool) -> bool {
        if self.id.as_deref() != Some(pending.id.as_str()) || self.in_flight != Some(pending.kind) {
            debug!("Ignoring stale {} result for {}", pending.kind.label(), pending.id);
            return false;
        }
        self.in_flight = None;
        if !saved {
            self.rollback(pending);
        }
        true
    }

    fn rollback(&mut self, pending: &PendingAugmentation) {
        warn!("Rolling back {} on record {}", pending.kind.label(), pending.id);
        let restored = match pending.kind {
            Augmentation::ExpertPersona => self
                .final_optimized_query
                .strip_prefix(pending.fragment.as_str())
                .map(str::to_string),
            Augmentation::EmotionalStimulus => self
                .final_optimized_query
                .strip_suffix(pending.fragment.as_str())
                .map(str::to_string),
        };
        if let Some(text) = restored {
            self.final_optimized_query = text;
        }
        match pending.kind {
            Augmentation::ExpertPersona => self.expert_added = false,
            Augmentation::EmotionalStimulus => self.emotional_added = false,
        }
    }
}

/// Phase two: save the composed text as the record's final query.
pub async fn persist_augmentation<B: Backend + ?Sized>(
    backend: &B,
    pending: &PendingAugmentation,
) -> ClientResult<()> {
    info!("Persisting {} for {}", pending.kind.label(), pending.id);
    backend
        .update_optimization(
            &pending.id,
            &OptimizationUpdate {
                final_optimized_query: pending.text.clone(),
            },
        )
        .await
}

pub async fn optimize<B: Backend + ?Sized>(
    backend: &B,
    input: &OptimizationInput,
) -> ClientResult<OptimizationRecord> {
    input.validate()?;

    info!(
        "Optimizing with {} / {} using {} ({} iterations)",
        input.provider, input.model, input.technique, input.iterations
    );
    let resp = backend
        .create_optimization(&OptimizationRequest {
            user_query: input.user_query.clone(),
            provider: input.provider.clone(),
            model: input.model.clone(),
            technique: input.technique.clone(),
            number_of_iterations: input.iterations,
        })
        .await?;

    Ok(OptimizationRecord::from_response(input, resp))
}

/// A past optimization for the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationSummary {
    pub id: Option<String>,
    pub user_query: String,
    pub technique: String,
    pub final_optimized_query: String,
}

pub async fn recent<B: Backend + ?Sized>(
    backend: &B,
    limit: u32,
) -> ClientResult<Vec<OptimizationSummary>> {
    let items = backend.list_optimizations(limit).await?;
    Ok(items
        .into_iter()
        .map(|item| OptimizationSummary {
            id: item.id,
            user_query: item.user_query.unwrap_or_default(),
            technique: item.technique.unwrap_or_default(),
            final_optimized_query: item.final_optimized_query.unwrap_or_default(),
        })
        .collect())
}
