//! Property tests over the mountain bike fixture.

use configurator::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

const MOUNTAIN_BIKE: &str = include_str!("fixtures/mountain_bike.json");

fn mountain_bike() -> Arc<ProductCatalog> {
    Arc::new(ProductCatalog::from_json(MOUNTAIN_BIKE).unwrap())
}

/// Turn one index per category into a selection; an index past the last
/// option leaves the category empty. Rules are not consulted.
fn raw_selection(catalog: &ProductCatalog, picks: &[usize]) -> Selection {
    catalog
        .categories()
        .iter()
        .zip(picks)
        .filter_map(|(category, pick)| {
            category
                .options
                .get(*pick)
                .map(|option| (category.id.clone(), option.id.clone()))
        })
        .collect()
}

fn picks() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..4, 6)
}

fn config() -> impl Strategy<Value = EngineConfig> {
    (
        prop_oneof![Just(IncompatibilityPolicy::AnyPair), Just(IncompatibilityPolicy::FullSet)],
        prop_oneof![Just(OverridePrecedence::LastDeclared), Just(OverridePrecedence::LowestPrice)],
    )
        .prop_map(|(incompatibility, precedence)| {
            EngineConfig::default()
                .with_incompatibility(incompatibility)
                .with_override_precedence(precedence)
        })
}

/// Wizard actions replayed against a session.
#[derive(Debug, Clone)]
enum Action {
    Select(usize, usize),
    Clear(usize),
    Next,
    Previous,
    Jump(usize),
    Reset,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0usize..6, 0usize..3).prop_map(|(c, o)| Action::Select(c, o)),
        1 => (0usize..6).prop_map(Action::Clear),
        3 => Just(Action::Next),
        2 => Just(Action::Previous),
        1 => (0usize..7).prop_map(Action::Jump),
        1 => Just(Action::Reset),
    ]
}

fn apply(session: &mut ConfigurationSession, action: &Action) {
    match action {
        Action::Select(c, o) => {
            let category = &session.catalog().categories()[*c];
            let category_id = category.id.clone();
            let option_id = category.options.get(*o).map(|opt| opt.id.clone());
            session.select_option(&category_id, option_id);
        }
        Action::Clear(c) => {
            let category_id = session.catalog().categories()[*c].id.clone();
            session.select_option(&category_id, None);
        }
        Action::Next => {
            let _ = session.go_to_next_step();
        }
        Action::Previous => {
            let _ = session.go_to_previous_step();
        }
        Action::Jump(step) => {
            let _ = session.go_to_step(*step);
        }
        Action::Reset => session.reset(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Out-of-stock options only resolve as available when already chosen.
    #[test]
    fn out_of_stock_never_available_unless_current(picks in picks(), config in config()) {
        let catalog = mountain_bike();
        let selection = raw_selection(&catalog, &picks);

        for category in catalog.categories() {
            for option in category.options.iter().filter(|o| !o.is_in_stock()) {
                let availability = resolve(&catalog, &selection, &category.id, &option.id, &config);
                let current = selection.get(&category.id) == Some(&option.id);
                prop_assert!(!availability.is_available() || current);
            }
        }
    }

    /// Pricing is a pure function of its inputs.
    #[test]
    fn price_is_idempotent(picks in picks(), config in config()) {
        let catalog = mountain_bike();
        let selection = raw_selection(&catalog, &picks);

        let first = price(&catalog, &selection, &config);
        let second = price(&catalog, &selection, &config);
        prop_assert_eq!(&first, &second);
        prop_assert!(!first.total.is_negative());
    }

    /// The order options are submitted in does not change the verdict or the price.
    #[test]
    fn submission_order_is_irrelevant(
        (ids, shuffled) in picks().prop_flat_map(|picks| {
            let catalog = mountain_bike();
            let ids: Vec<OptionId> = raw_selection(&catalog, &picks)
                .iter()
                .map(|(_, option_id)| option_id.clone())
                .collect();
            (Just(ids.clone()), Just(ids).prop_shuffle())
        }),
        config in config(),
    ) {
        let catalog = mountain_bike();
        prop_assert_eq!(
            validate_option_ids(&catalog, &ids, &config),
            validate_option_ids(&catalog, &shuffled, &config)
        );

        let (forward, _) = Selection::from_option_ids(&catalog, &ids);
        let (backward, _) = Selection::from_option_ids(&catalog, &shuffled);
        prop_assert_eq!(price(&catalog, &forward, &config), price(&catalog, &backward, &config));
    }

    /// Stepping back never leaves a choice beyond the current step.
    #[test]
    fn stepping_back_clears_downstream(actions in prop::collection::vec(action(), 1..40)) {
        let catalog = mountain_bike();
        let mut session = ConfigurationSession::new(catalog.clone());

        for action in &actions {
            let before = session.step();
            apply(&mut session, action);
            if session.step() < before {
                for category in catalog.categories().iter().skip(session.step() + 1) {
                    prop_assert!(session.selection().get(&category.id).is_none());
                }
            }
        }
    }

    /// Completeness tracks exactly the required categories.
    #[test]
    fn completeness_matches_required_categories(actions in prop::collection::vec(action(), 1..40)) {
        let catalog = mountain_bike();
        let mut session = ConfigurationSession::new(catalog.clone());
        for action in &actions {
            apply(&mut session, action);
        }

        let expected = catalog
            .categories()
            .iter()
            .filter(|c| c.is_required)
            .all(|c| session.selection().get(&c.id).is_some());
        prop_assert_eq!(session.is_configuration_complete(), expected);
    }

    /// Whatever the wizard accepts, the validator never flags as a rule violation
    /// under the default policy.
    #[test]
    fn wizard_selections_pass_rule_checks(actions in prop::collection::vec(action(), 1..40)) {
        let mut session = ConfigurationSession::new(mountain_bike());
        for action in &actions {
            apply(&mut session, action);
        }
        let result = session.validate();
        prop_assert!(result.incompatibilities.is_empty());
        prop_assert!(result.unavailable_options.is_empty());
    }
}
