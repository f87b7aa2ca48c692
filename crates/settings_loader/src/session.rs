use forecasting::Forecaster;
use models::{
    ComprehensiveResults, CustomerInput, ModelError, PriceComponent, PriceEntry, PricingCatalog,
    Scenario, ScenarioCatalog, ServiceQuantities, SubscriptionCount, SubscriptionKey,
    SubscriptionTier,
};
use tracing::{debug, warn};

use crate::import::{ImportError, parse_pricing};

/// Editable planning state: one pricing catalog, one customer input and one
/// scenario catalog. Calculations read it through [`Session::forecaster`];
/// nothing derived is stored here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pricing: PricingCatalog,
    inputs: CustomerInput,
    scenarios: ScenarioCatalog,
}

impl Session {
    pub fn new(pricing: PricingCatalog, inputs: CustomerInput, scenarios: ScenarioCatalog) -> Self {
        Self {
            pricing,
            inputs,
            scenarios,
        }
    }

    pub fn pricing(&self) -> &PricingCatalog {
        &self.pricing
    }

    pub fn inputs(&self) -> &CustomerInput {
        &self.inputs
    }

    pub fn scenarios(&self) -> &ScenarioCatalog {
        &self.scenarios
    }

    pub fn forecaster(&self) -> Forecaster<'_> {
        Forecaster::new(&self.pricing, &self.inputs, &self.scenarios)
    }

    pub fn results(&self) -> ComprehensiveResults {
        self.forecaster().base_results()
    }

    /// Replaces the whole pricing catalog from a JSON document. A rejected
    /// document leaves the current catalog as it was.
    pub fn import_pricing(&mut self, json: &str) -> Result<(), ImportError> {
        match parse_pricing(json) {
            Ok(catalog) => {
                self.pricing = catalog;
                debug!("pricing catalog imported");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "pricing import rejected");
                Err(e)
            }
        }
    }

    /// Pretty-printed JSON of the current catalog, profits included.
    pub fn export_pricing(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.pricing)
    }

    pub fn reset_pricing_to_defaults(&mut self) {
        self.pricing = PricingCatalog::default();
    }

    pub fn reset_inputs_to_defaults(&mut self) {
        self.inputs = CustomerInput::default();
    }

    pub fn reset_scenarios_to_defaults(&mut self) {
        self.scenarios = ScenarioCatalog::default();
    }

    pub fn update_price(
        &mut self,
        tier: SubscriptionTier,
        component: PriceComponent,
        entry: PriceEntry,
    ) -> models::error::Result<()> {
        self.pricing.set_price(tier, component, entry)
    }

    pub fn update_digital_profit(&mut self, tier: SubscriptionTier, amount: f64) -> models::error::Result<()> {
        self.pricing.set_digital_profit(tier, amount)
    }

    /// Merges subscription counts; combinations not named keep their counts.
    pub fn update_inputs<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (SubscriptionKey, SubscriptionCount)>,
    {
        self.inputs.update_counts(updates);
    }

    pub fn update_services(&mut self, services: ServiceQuantities) {
        self.inputs.services = services;
    }

    /// Multiplies every price in the catalog, e.g. `1.1` for +10%.
    pub fn apply_percentage_change(&mut self, multiplier: f64) -> models::error::Result<()> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ModelError::InvalidPrice(format!(
                "price multiplier must be a finite value >= 0, got {multiplier}"
            )));
        }
        self.pricing = self.pricing.scaled(multiplier);
        debug!(multiplier, "applied price change");
        Ok(())
    }

    /// Adds or replaces a scenario by name.
    pub fn upsert_scenario(&mut self, scenario: Scenario) -> models::error::Result<()> {
        self.scenarios.insert(scenario)
    }

    pub fn remove_scenario(&mut self, name: &str) -> Option<Scenario> {
        self.scenarios.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::PackageDuration;
    use serde_json::Value;

    #[test]
    fn test_rejected_import_keeps_state() {
        let mut session = Session::default();
        session.apply_percentage_change(1.2).unwrap();
        let before = session.clone();

        let mut doc: Value = serde_json::from_str(&session.export_pricing().unwrap()).unwrap();
        doc.as_object_mut().unwrap().remove("Custom");
        let err = session.import_pricing(&doc.to_string()).unwrap_err();

        assert!(matches!(err, ImportError::MissingTier(SubscriptionTier::Custom)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_import_replaces_catalog() {
        let mut source = Session::default();
        source.apply_percentage_change(2.0).unwrap();
        let exported = source.export_pricing().unwrap();

        let mut session = Session::default();
        session.import_pricing(&exported).unwrap();
        assert_eq!(session.pricing(), source.pricing());
    }

    #[test]
    fn test_export_includes_profit() {
        let exported: Value = serde_json::from_str(&Session::default().export_pricing().unwrap()).unwrap();
        let bracelet = &exported["VIP"]["bracelet"];
        assert_eq!(bracelet["profit"].as_f64().unwrap(), 800.0 - 315.0);
    }

    #[test]
    fn test_percentage_change_and_reset() {
        let mut session = Session::default();
        session.apply_percentage_change(1.1).unwrap();
        let bracelet = session.pricing().vip.bracelet;
        assert!((bracelet.cost - 315.0 * 1.1).abs() < 1e-9);
        assert!((bracelet.profit() - 485.0 * 1.1).abs() < 1e-9);

        assert!(session.apply_percentage_change(-0.5).is_err());
        assert!(session.apply_percentage_change(f64::NAN).is_err());

        session.reset_pricing_to_defaults();
        assert_eq!(session.pricing(), &PricingCatalog::default());
    }

    #[test]
    fn test_update_price_respects_tier_kind() {
        let mut session = Session::default();
        session
            .update_price(SubscriptionTier::Normal, PriceComponent::Bracelet, PriceEntry::new(100.0, 300.0))
            .unwrap();
        assert_eq!(session.pricing().normal.bracelet.profit(), 200.0);

        let err = session
            .update_price(SubscriptionTier::Custom, PriceComponent::Bracelet, PriceEntry::new(1.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, ModelError::ComponentNotOnTier { .. }));
        assert!(session.update_digital_profit(SubscriptionTier::Custom, 10.0).is_err());
    }

    #[test]
    fn test_update_inputs_changes_results() {
        let mut session = Session::default();
        let before = session.results().totals.total_customers;
        let key = SubscriptionKey::new(SubscriptionTier::Vip, PackageDuration::OneMonth);
        session.update_inputs([(key, SubscriptionCount::new(40, 10))]);

        assert_eq!(session.results().totals.total_customers, before + 10);
        session.reset_inputs_to_defaults();
        assert_eq!(session.results().totals.total_customers, before);
    }

    #[test]
    fn test_update_services_changes_service_revenue() {
        let mut session = Session::default();
        let before = session.results();
        let services = ServiceQuantities {
            challenge_participants: 50,
            ..session.inputs().services.clone()
        };
        session.update_services(services);

        let after = session.results();
        assert_eq!(session.inputs().services.challenge_participants, 50);
        assert!(after.totals.total_revenue > before.totals.total_revenue);
        assert_eq!(after.totals.total_customers, before.totals.total_customers);
        assert_eq!(after.subscriptions, before.subscriptions);
    }

    #[test]
    fn test_scenario_maintenance() {
        let mut session = Session::default();
        session
            .upsert_scenario(Scenario::new("Moderate", 0.2, 0.9).unwrap())
            .unwrap();
        assert_eq!(session.scenarios().len(), 4);
        assert_eq!(session.scenarios().get("Moderate").unwrap().growth_rate, 0.2);

        assert!(session.remove_scenario("Conservative").is_some());
        assert!(session.remove_scenario("Conservative").is_none());
        session.reset_scenarios_to_defaults();
        assert_eq!(session.scenarios(), &ScenarioCatalog::default());
    }
}
