//! Wizard state machine for configuring one product.

use crate::cart::ConfiguredItem;
use crate::catalog::{Category, ProductCatalog};
use crate::config::EngineConfig;
use crate::engine::{
    availability_for_category, price, quote_option, resolve, validate, Availability,
    ConfigurationResult, OptionAvailability, OptionQuote, PriceBreakdown, Selection,
    UnavailabilityReason,
};
use crate::error::ConfiguratorError;
use crate::ids::{CategoryId, OptionId, SessionId};
use std::sync::Arc;

/// What happened to a selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The option is now the category's choice.
    Applied,
    /// The category no longer has a choice.
    Cleared,
    /// The option was not available; the selection is unchanged.
    Rejected(UnavailabilityReason),
}

impl SelectionOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SelectionOutcome::Rejected(_))
    }
}

/// One shopper walking through a product's categories.
///
/// Steps are zero-based indices into the catalog's ordered categories.
#[derive(Debug, Clone)]
pub struct ConfigurationSession {
    id: SessionId,
    catalog: Arc<ProductCatalog>,
    config: EngineConfig,
    selection: Selection,
    step: usize,
}

impl ConfigurationSession {
    /// Start a session at step 0 with nothing selected.
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        Self {
            id: SessionId::generate(),
            catalog,
            config: EngineConfig::default(),
            selection: Selection::new(),
            step: 0,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Category at the current step; `None` for a product without categories.
    pub fn current_category(&self) -> Option<&Category> {
        self.catalog.category_at(self.step)
    }

    /// Choose or clear the option for a category.
    ///
    /// Clearing always succeeds. Choosing succeeds only when the option
    /// resolves as available against the current selection.
    pub fn select_option(&mut self, category_id: &CategoryId, option_id: Option<OptionId>) -> SelectionOutcome {
        let Some(option_id) = option_id else {
            self.selection.clear(category_id);
            return SelectionOutcome::Cleared;
        };

        match resolve(&self.catalog, &self.selection, category_id, &option_id, &self.config) {
            Availability::Available => {
                self.selection.set(category_id.clone(), option_id);
                SelectionOutcome::Applied
            }
            Availability::Unavailable(reason) => {
                tracing::debug!(
                    session = %self.id,
                    category = %category_id,
                    option = %option_id,
                    reason = reason.code(),
                    "Selection rejected"
                );
                SelectionOutcome::Rejected(reason)
            }
        }
    }

    pub fn availability(&self, category_id: &CategoryId, option_id: &OptionId) -> Availability {
        resolve(&self.catalog, &self.selection, category_id, option_id, &self.config)
    }

    /// Availability of every option in the current category.
    pub fn current_category_availability(&self) -> Vec<OptionAvailability> {
        match self.current_category() {
            Some(category) => {
                availability_for_category(&self.catalog, &self.selection, &category.id, &self.config)
            }
            None => Vec::new(),
        }
    }

    /// Price an option would contribute next to the current choices.
    pub fn quote(&self, option_id: &OptionId) -> Option<OptionQuote> {
        quote_option(&self.catalog, &self.selection, option_id, &self.config)
    }

    /// Whether the current step's category allows moving on.
    fn current_step_satisfied(&self) -> bool {
        match self.current_category() {
            Some(category) => !category.is_required || self.selection.get(&category.id).is_some(),
            None => true,
        }
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_at_last_step() && self.current_step_satisfied()
    }

    pub fn can_go_previous(&self) -> bool {
        self.step > 0
    }

    /// Advance one step. Stays put at the last step.
    pub fn go_to_next_step(&mut self) -> Result<usize, ConfiguratorError> {
        if !self.current_step_satisfied() {
            let category = self
                .current_category()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            return Err(ConfiguratorError::StepIncomplete { category });
        }
        if !self.is_at_last_step() {
            self.step += 1;
            tracing::debug!(session = %self.id, step = self.step, "Advanced");
        }
        Ok(self.step)
    }

    /// Step back once, clearing every choice after the new step.
    pub fn go_to_previous_step(&mut self) -> Result<usize, ConfiguratorError> {
        if self.step == 0 {
            return Err(ConfiguratorError::InvalidStepTransition { from: 0, to: 0 });
        }
        let target = self.step - 1;
        self.step_back_to(target);
        Ok(target)
    }

    /// Jump to a step.
    ///
    /// Any earlier step may be revisited, with the same clearing as stepping
    /// back. Forward moves are one step at a time.
    pub fn go_to_step(&mut self, step: usize) -> Result<usize, ConfiguratorError> {
        if step == self.step {
            return Ok(step);
        }
        if step < self.step {
            self.step_back_to(step);
            return Ok(step);
        }
        if step == self.step + 1 && step < self.catalog.category_count() {
            return self.go_to_next_step();
        }
        Err(ConfiguratorError::InvalidStepTransition {
            from: self.step,
            to: step,
        })
    }

    fn step_back_to(&mut self, step: usize) {
        let cleared = self.clear_after(step);
        self.step = step;
        tracing::debug!(session = %self.id, step, cleared, "Stepped back");
    }

    /// Clear every category strictly after `step`. Returns how many choices were dropped.
    fn clear_after(&mut self, step: usize) -> usize {
        let later: Vec<CategoryId> = self
            .catalog
            .categories()
            .iter()
            .skip(step + 1)
            .map(|c| c.id.clone())
            .collect();
        later
            .iter()
            .filter_map(|id| self.selection.clear(id))
            .count()
    }

    /// Clear everything and return to step 0.
    pub fn reset(&mut self) {
        self.selection.clear_all();
        self.step = 0;
        tracing::debug!(session = %self.id, "Reset");
    }

    /// Every required category has a choice.
    pub fn is_configuration_complete(&self) -> bool {
        self.catalog
            .categories()
            .iter()
            .filter(|c| c.is_required)
            .all(|c| self.selection.get(&c.id).is_some())
    }

    pub fn is_at_last_step(&self) -> bool {
        self.step + 1 >= self.catalog.category_count()
    }

    /// At the last step with every required choice made.
    pub fn is_terminal(&self) -> bool {
        self.is_at_last_step() && self.is_configuration_complete()
    }

    /// Position through the wizard, 0 to 100.
    pub fn progress_percent(&self) -> u8 {
        let count = self.catalog.category_count();
        if count == 0 {
            return 100;
        }
        (((self.step + 1) * 100) / count).min(100) as u8
    }

    pub fn price(&self) -> PriceBreakdown {
        price(&self.catalog, &self.selection, &self.config)
    }

    pub fn validate(&self) -> ConfigurationResult {
        validate(&self.catalog, &self.selection, &self.config)
    }

    /// Turn the current configuration into a cart line.
    pub fn to_cart_item(&self, quantity: u32) -> Result<ConfiguredItem, ConfiguratorError> {
        ConfiguredItem::from_selection(&self.catalog, &self.selection, &self.config, quantity)
    }
}
