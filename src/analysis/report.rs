//! Whole-game static analysis.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::diagnostics::Diagnostics;
use super::invariant::static_violations;
use crate::context::RegisterEffects;
use crate::core::GameMetadata;
use crate::error::{Error, Result};
use crate::ludeme::{ConceptSet, GameFlags, Ludeme};

/// Everything static analysis knows about a compiled game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Capabilities the rules need.
    pub flags: GameFlags,
    /// Concepts the rules express.
    pub concepts: ConceptSet,
    /// Registers the rules read and write.
    pub effects: RegisterEffects,
    pub diagnostics: Diagnostics,
    /// Nodes flagged static above a non-static descendant.
    pub static_violations: Vec<String>,
}

impl AnalysisReport {
    /// Whether the rules need something the game does not provide.
    #[must_use]
    pub fn missing_requirement(&self) -> bool {
        self.diagnostics.has_missing()
    }

    /// Whether the game is predicted to fail at runtime.
    #[must_use]
    pub fn will_crash(&self) -> bool {
        self.diagnostics.has_crash()
    }

    #[must_use]
    pub fn missing_requirement_report(&self) -> String {
        self.diagnostics.missing_report()
    }

    #[must_use]
    pub fn will_crash_report(&self) -> String {
        self.diagnostics.crash_report()
    }

    /// Refuse games that would fail during play.
    pub fn ensure_playable(&self) -> Result<()> {
        if self.will_crash() {
            return Err(Error::WillCrash {
                report: self.will_crash_report(),
            });
        }
        if self.missing_requirement() {
            return Err(Error::MissingRequirement {
                report: self.missing_requirement_report(),
            });
        }
        Ok(())
    }
}

/// Analyse the preprocessed rule trees of one game.
///
/// Runs the per-node checks (missing requirements, predicted crashes), then
/// the whole-game ones: every register the rules touch is provided by the
/// engine, every capability the rules need is declared by the game, and
/// every static node has only static descendants.
pub fn analyse(game: &GameMetadata, roots: &[&dyn Ludeme]) -> AnalysisReport {
    let mut diagnostics = Diagnostics::new();
    let mut flags = GameFlags::empty();
    let mut concepts = ConceptSet::empty();
    let mut effects = RegisterEffects::NONE;
    let mut violations = Vec::new();

    for root in roots {
        flags |= root.game_flags(game);
        concepts |= root.concepts(game);
        effects = effects.union(root.effects());
        root.missing_requirement(game, &mut diagnostics);
        root.will_crash(game, &mut diagnostics);
        violations.extend(static_violations(*root));
    }

    let unprovided = (effects.reads | effects.writes) - game.provided_registers();
    for register in unprovided.registers() {
        diagnostics.add_missing(format!(
            "rules use the `{register}` register but the engine does not provide it"
        ));
    }

    let undeclared = (flags & GameFlags::DECLARED) - game.capabilities();
    for flag in undeclared.iter() {
        diagnostics.add_missing(format!(
            "rules need {} support but the game does not declare it",
            flag.label()
        ));
    }

    for violation in &violations {
        diagnostics.add_crash(violation.clone());
    }

    info!(
        game = game.name(),
        flags = ?flags,
        missing = diagnostics.missing().len(),
        crashes = diagnostics.crashes().len(),
        "static analysis complete"
    );

    AnalysisReport {
        flags,
        concepts,
        effects,
        diagnostics,
        static_violations: violations,
    }
}
