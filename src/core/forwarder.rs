use crate::core::{AllocationCalculator, AllocationForm, AllocationRequest, AllocationResult, RatingKind};
use crate::utils::error::ForwardError;

pub struct AllocationForwarder<C: AllocationCalculator> {
    calculator: C,
    kind: RatingKind,
    enabled: bool,
}

impl<C: AllocationCalculator> AllocationForwarder<C> {
    pub fn new(calculator: C, kind: RatingKind) -> Self {
        Self {
            calculator,
            kind,
            enabled: true,
        }
    }

    /// With the calculator disabled, valid submissions come back `pending` and nothing is sent.
    pub fn with_calculator_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn rating_kind(&self) -> RatingKind {
        self.kind
    }

    /// Validates, forwards and maps every outcome into a single result record.
    pub async fn forward(&self, form: &AllocationForm) -> AllocationResult {
        match self.try_forward(form).await {
            Ok(Some(reply)) => AllocationResult::from_reply(form, reply),
            Ok(None) => AllocationResult::pending(form),
            Err(e) => {
                if e.was_sent() {
                    tracing::warn!("⚠️ Allocation request failed: {}", e);
                } else {
                    tracing::debug!("Rejected submission: {}", e);
                }
                AllocationResult::from_error(form, e)
            }
        }
    }

    /// `Ok(None)` means the submission was valid but the calculator is disabled.
    pub async fn try_forward(
        &self,
        form: &AllocationForm,
    ) -> Result<Option<serde_json::Value>, ForwardError> {
        validate_form(form, self.kind)?;

        if !self.enabled {
            tracing::info!(
                "Calculator disabled, holding {} agents / {} chores as pending",
                form.agents.len(),
                form.chores.len()
            );
            return Ok(None);
        }

        let request = AllocationRequest::from_form(form, self.kind);
        tracing::info!(
            "📡 Forwarding {} agents / {} chores to the Allocation Calculator",
            form.agents.len(),
            form.chores.len()
        );

        let reply = self.calculator.allocate(&request).await?;
        Ok(Some(reply))
    }
}

/// Collects every violated precondition; an empty list means the form can be sent.
pub fn validate_form(form: &AllocationForm, kind: RatingKind) -> Result<(), ForwardError> {
    let mut errors = Vec::new();

    if form.agents.is_empty() {
        errors.push("At least one agent is required".to_string());
    }
    if form.chores.is_empty() {
        errors.push("At least one chore is required".to_string());
    }
    if kind.requires_ratings() && form.ratings.as_ref().is_none_or(|m| m.is_empty()) {
        errors.push(format!("Please enter {} values for all agents", kind.label()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ForwardError::Validation(errors))
    }
}
