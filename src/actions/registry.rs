//! Action registry - maps action identifiers to action implementations

use crate::actions::{Action, ActionContext, ActionKind, CompileAction, DeployAction, VerifyAction};
use crate::core::{JobOutput, Params};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

/// Fixed table from action kind to implementation, built once per runner
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<ActionKind, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// A registry with no actions bound
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in compile/deploy/verify actions
    pub fn builtin() -> Self {
        Self::empty()
            .with_action(ActionKind::Compile, CompileAction)
            .with_action(ActionKind::Deploy, DeployAction)
            .with_action(ActionKind::Verify, VerifyAction)
    }

    /// Bind an implementation to an action kind, replacing any previous one
    pub fn with_action<A: Action + 'static>(mut self, kind: ActionKind, action: A) -> Self {
        self.actions.insert(kind, Arc::new(action));
        self
    }

    /// Whether an identifier maps to a bound action
    pub fn supports(&self, action_id: &str) -> bool {
        ActionKind::from_id(action_id).is_some_and(|kind| self.actions.contains_key(&kind))
    }

    /// Dispatch to the action bound to `action_id`
    ///
    /// Returns `None` for an unrecognized identifier. Action errors are
    /// converted into failed outputs and never returned as errors.
    pub async fn dispatch(
        &self,
        action_id: &str,
        params: &Params,
        ctx: &mut ActionContext<'_>,
    ) -> Option<JobOutput> {
        let Some(action) = ActionKind::from_id(action_id).and_then(|kind| self.actions.get(&kind)) else {
            warn!("Unknown action: {}", action_id);
            return None;
        };

        match action.run(params, ctx).await {
            Ok(output) => Some(output),
            Err(e) => {
                match e.exit_code() {
                    Some(code) => error!("Action {} failed with exit code {}: {}", action_id, code, e),
                    None => error!("Action {} failed: {}", action_id, e),
                }
                Some(JobOutput::failure(e.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.actions.keys().map(|kind| kind.id()).collect();
        kinds.sort_unstable();
        f.debug_struct("ActionRegistry").field("actions", &kinds).finish()
    }
}
