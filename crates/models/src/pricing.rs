use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// Flat renewal price charged per one-month renewal, whatever the tier.
pub const RENEWAL_PRICE_ONE_MONTH: f64 = 1500.0;
/// Flat renewal price charged per three-month renewal, whatever the tier.
pub const RENEWAL_PRICE_THREE_MONTHS: f64 = 4500.0;

/// Cost and selling price of one priced component.
///
/// Profit is never stored; it is always `selling - cost`. The serialized form
/// still carries a `profit` field so exported price lists read naturally, but
/// that field is ignored on import.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PriceEntry {
    pub cost: f64,
    pub selling: f64,
}

impl PriceEntry {
    pub const fn new(cost: f64, selling: f64) -> Self {
        Self { cost, selling }
    }

    pub fn profit(&self) -> f64 {
        self.selling - self.cost
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        Self::new(self.cost * multiplier, self.selling * multiplier)
    }

    pub fn validate(&self) -> Result<()> {
        for (label, v) in [("cost", self.cost), ("selling", self.selling)] {
            if !v.is_finite() || v < 0.0 {
                return Err(ModelError::InvalidPrice(format!(
                    "{} must be a finite value >= 0, got {}",
                    label, v
                )));
            }
        }
        Ok(())
    }
}

impl Serialize for PriceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PriceEntry", 3)?;
        s.serialize_field("cost", &self.cost)?;
        s.serialize_field("selling", &self.selling)?;
        s.serialize_field("profit", &self.profit())?;
        s.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubscriptionTier {
    #[serde(rename = "VIP")]
    Vip,
    Normal,
    Custom,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 3] = [Self::Vip, Self::Normal, Self::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Normal => "Normal",
            Self::Custom => "Custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    /// Custom packages carry no flat digital profit.
    pub fn earns_digital_profit(&self) -> bool {
        !matches!(self, Self::Custom)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length of a subscription package. One- and three-month packages are priced
/// from separate components, not by scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PackageDuration {
    OneMonth,
    ThreeMonths,
}

impl PackageDuration {
    pub const ALL: [PackageDuration; 2] = [Self::OneMonth, Self::ThreeMonths];

    pub fn months(&self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
        }
    }

    pub fn renewal_price(&self) -> f64 {
        match self {
            Self::OneMonth => RENEWAL_PRICE_ONE_MONTH,
            Self::ThreeMonths => RENEWAL_PRICE_THREE_MONTHS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
        }
    }
}

impl TryFrom<u32> for PackageDuration {
    type Error = String;

    fn try_from(months: u32) -> std::result::Result<Self, Self::Error> {
        match months {
            1 => Ok(Self::OneMonth),
            3 => Ok(Self::ThreeMonths),
            other => Err(format!("unsupported package duration: {} months", other)),
        }
    }
}

impl From<PackageDuration> for u32 {
    fn from(d: PackageDuration) -> u32 {
        d.months()
    }
}

/// Every named price line found in any tier's price list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceComponent {
    MealsPerMonth,
    #[serde(rename = "meals3Months")]
    Meals3Months,
    DeliveryPerMonth,
    #[serde(rename = "delivery3Months")]
    Delivery3Months,
    Bracelet,
    #[serde(rename = "pointsX10")]
    PointsX10,
    CarOneMonth,
    CarThreeMonths,
    #[serde(rename = "braceletVIP")]
    BraceletVip,
    BraceletNormal,
    CbyiOneMonth,
    CbyiThreeMonths,
    #[serde(rename = "cbyiBraceletVIP")]
    CbyiBraceletVip,
    CbyiBraceletNormal,
}

impl PriceComponent {
    pub const ALL: [PriceComponent; 14] = [
        Self::MealsPerMonth,
        Self::Meals3Months,
        Self::DeliveryPerMonth,
        Self::Delivery3Months,
        Self::Bracelet,
        Self::PointsX10,
        Self::CarOneMonth,
        Self::CarThreeMonths,
        Self::BraceletVip,
        Self::BraceletNormal,
        Self::CbyiOneMonth,
        Self::CbyiThreeMonths,
        Self::CbyiBraceletVip,
        Self::CbyiBraceletNormal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::MealsPerMonth => "mealsPerMonth",
            Self::Meals3Months => "meals3Months",
            Self::DeliveryPerMonth => "deliveryPerMonth",
            Self::Delivery3Months => "delivery3Months",
            Self::Bracelet => "bracelet",
            Self::PointsX10 => "pointsX10",
            Self::CarOneMonth => "carOneMonth",
            Self::CarThreeMonths => "carThreeMonths",
            Self::BraceletVip => "braceletVIP",
            Self::BraceletNormal => "braceletNormal",
            Self::CbyiOneMonth => "cbyiOneMonth",
            Self::CbyiThreeMonths => "cbyiThreeMonths",
            Self::CbyiBraceletVip => "cbyiBraceletVIP",
            Self::CbyiBraceletNormal => "cbyiBraceletNormal",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for PriceComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Price list shared by the VIP and Normal tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardTierPricing {
    #[serde(rename = "mealsPerMonth")]
    pub meals_per_month: PriceEntry,
    #[serde(rename = "meals3Months")]
    pub meals_3_months: PriceEntry,
    #[serde(rename = "deliveryPerMonth")]
    pub delivery_per_month: PriceEntry,
    #[serde(rename = "delivery3Months")]
    pub delivery_3_months: PriceEntry,
    pub bracelet: PriceEntry,
    #[serde(rename = "pointsX10")]
    pub points_x10: PriceEntry,
    /// Pure margin added to every package revenue, no cost attached.
    #[serde(rename = "digitalProfit")]
    pub digital_profit: f64,
    #[serde(rename = "carOneMonth")]
    pub car_one_month: PriceEntry,
    #[serde(rename = "carThreeMonths")]
    pub car_three_months: PriceEntry,
}

impl StandardTierPricing {
    pub fn entry(&self, component: PriceComponent) -> Option<PriceEntry> {
        self.slot(component).copied()
    }

    fn slot(&self, component: PriceComponent) -> Option<&PriceEntry> {
        match component {
            PriceComponent::MealsPerMonth => Some(&self.meals_per_month),
            PriceComponent::Meals3Months => Some(&self.meals_3_months),
            PriceComponent::DeliveryPerMonth => Some(&self.delivery_per_month),
            PriceComponent::Delivery3Months => Some(&self.delivery_3_months),
            PriceComponent::Bracelet => Some(&self.bracelet),
            PriceComponent::PointsX10 => Some(&self.points_x10),
            PriceComponent::CarOneMonth => Some(&self.car_one_month),
            PriceComponent::CarThreeMonths => Some(&self.car_three_months),
            _ => None,
        }
    }

    fn slot_mut(&mut self, component: PriceComponent) -> Option<&mut PriceEntry> {
        match component {
            PriceComponent::MealsPerMonth => Some(&mut self.meals_per_month),
            PriceComponent::Meals3Months => Some(&mut self.meals_3_months),
            PriceComponent::DeliveryPerMonth => Some(&mut self.delivery_per_month),
            PriceComponent::Delivery3Months => Some(&mut self.delivery_3_months),
            PriceComponent::Bracelet => Some(&mut self.bracelet),
            PriceComponent::PointsX10 => Some(&mut self.points_x10),
            PriceComponent::CarOneMonth => Some(&mut self.car_one_month),
            PriceComponent::CarThreeMonths => Some(&mut self.car_three_months),
            _ => None,
        }
    }

    /// Components that make up a package of the given length.
    pub fn package_entries(&self, duration: PackageDuration) -> [PriceEntry; 4] {
        match duration {
            PackageDuration::OneMonth => [
                self.meals_per_month,
                self.delivery_per_month,
                self.bracelet,
                self.points_x10,
            ],
            PackageDuration::ThreeMonths => [
                self.meals_3_months,
                self.delivery_3_months,
                self.bracelet,
                self.points_x10,
            ],
        }
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            meals_per_month: self.meals_per_month.scaled(multiplier),
            meals_3_months: self.meals_3_months.scaled(multiplier),
            delivery_per_month: self.delivery_per_month.scaled(multiplier),
            delivery_3_months: self.delivery_3_months.scaled(multiplier),
            bracelet: self.bracelet.scaled(multiplier),
            points_x10: self.points_x10.scaled(multiplier),
            digital_profit: self.digital_profit * multiplier,
            car_one_month: self.car_one_month.scaled(multiplier),
            car_three_months: self.car_three_months.scaled(multiplier),
        }
    }
}

/// Price list of the Custom tier. It has no single bracelet line, no digital
/// profit and no car rental, but carries the CBYI service lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTierPricing {
    #[serde(rename = "mealsPerMonth")]
    pub meals_per_month: PriceEntry,
    #[serde(rename = "meals3Months")]
    pub meals_3_months: PriceEntry,
    #[serde(rename = "deliveryPerMonth")]
    pub delivery_per_month: PriceEntry,
    #[serde(rename = "delivery3Months")]
    pub delivery_3_months: PriceEntry,
    #[serde(rename = "braceletVIP")]
    pub bracelet_vip: PriceEntry,
    #[serde(rename = "braceletNormal")]
    pub bracelet_normal: PriceEntry,
    #[serde(rename = "pointsX10")]
    pub points_x10: PriceEntry,
    #[serde(rename = "cbyiOneMonth")]
    pub cbyi_one_month: PriceEntry,
    #[serde(rename = "cbyiThreeMonths")]
    pub cbyi_three_months: PriceEntry,
    #[serde(rename = "cbyiBraceletVIP")]
    pub cbyi_bracelet_vip: PriceEntry,
    #[serde(rename = "cbyiBraceletNormal")]
    pub cbyi_bracelet_normal: PriceEntry,
}

impl CustomTierPricing {
    pub fn entry(&self, component: PriceComponent) -> Option<PriceEntry> {
        self.slot(component).copied()
    }

    fn slot(&self, component: PriceComponent) -> Option<&PriceEntry> {
        match component {
            PriceComponent::MealsPerMonth => Some(&self.meals_per_month),
            PriceComponent::Meals3Months => Some(&self.meals_3_months),
            PriceComponent::DeliveryPerMonth => Some(&self.delivery_per_month),
            PriceComponent::Delivery3Months => Some(&self.delivery_3_months),
            PriceComponent::BraceletVip => Some(&self.bracelet_vip),
            PriceComponent::BraceletNormal => Some(&self.bracelet_normal),
            PriceComponent::PointsX10 => Some(&self.points_x10),
            PriceComponent::CbyiOneMonth => Some(&self.cbyi_one_month),
            PriceComponent::CbyiThreeMonths => Some(&self.cbyi_three_months),
            PriceComponent::CbyiBraceletVip => Some(&self.cbyi_bracelet_vip),
            PriceComponent::CbyiBraceletNormal => Some(&self.cbyi_bracelet_normal),
            _ => None,
        }
    }

    fn slot_mut(&mut self, component: PriceComponent) -> Option<&mut PriceEntry> {
        match component {
            PriceComponent::MealsPerMonth => Some(&mut self.meals_per_month),
            PriceComponent::Meals3Months => Some(&mut self.meals_3_months),
            PriceComponent::DeliveryPerMonth => Some(&mut self.delivery_per_month),
            PriceComponent::Delivery3Months => Some(&mut self.delivery_3_months),
            PriceComponent::BraceletVip => Some(&mut self.bracelet_vip),
            PriceComponent::BraceletNormal => Some(&mut self.bracelet_normal),
            PriceComponent::PointsX10 => Some(&mut self.points_x10),
            PriceComponent::CbyiOneMonth => Some(&mut self.cbyi_one_month),
            PriceComponent::CbyiThreeMonths => Some(&mut self.cbyi_three_months),
            PriceComponent::CbyiBraceletVip => Some(&mut self.cbyi_bracelet_vip),
            PriceComponent::CbyiBraceletNormal => Some(&mut self.cbyi_bracelet_normal),
            _ => None,
        }
    }

    /// Custom packages are meals, delivery and points only; the bracelet is
    /// chosen separately by the customer.
    pub fn package_entries(&self, duration: PackageDuration) -> [PriceEntry; 3] {
        match duration {
            PackageDuration::OneMonth => [
                self.meals_per_month,
                self.delivery_per_month,
                self.points_x10,
            ],
            PackageDuration::ThreeMonths => [
                self.meals_3_months,
                self.delivery_3_months,
                self.points_x10,
            ],
        }
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            meals_per_month: self.meals_per_month.scaled(multiplier),
            meals_3_months: self.meals_3_months.scaled(multiplier),
            delivery_per_month: self.delivery_per_month.scaled(multiplier),
            delivery_3_months: self.delivery_3_months.scaled(multiplier),
            bracelet_vip: self.bracelet_vip.scaled(multiplier),
            bracelet_normal: self.bracelet_normal.scaled(multiplier),
            points_x10: self.points_x10.scaled(multiplier),
            cbyi_one_month: self.cbyi_one_month.scaled(multiplier),
            cbyi_three_months: self.cbyi_three_months.scaled(multiplier),
            cbyi_bracelet_vip: self.cbyi_bracelet_vip.scaled(multiplier),
            cbyi_bracelet_normal: self.cbyi_bracelet_normal.scaled(multiplier),
        }
    }
}

/// Borrowed view of one tier's price list, selected by tier.
#[derive(Debug, Clone, Copy)]
pub enum TierPricing<'a> {
    Standard(&'a StandardTierPricing),
    Custom(&'a CustomTierPricing),
}

impl TierPricing<'_> {
    pub fn entry(&self, component: PriceComponent) -> Option<PriceEntry> {
        match self {
            TierPricing::Standard(p) => p.entry(component),
            TierPricing::Custom(p) => p.entry(component),
        }
    }

    pub fn digital_profit(&self) -> f64 {
        match self {
            TierPricing::Standard(p) => p.digital_profit,
            TierPricing::Custom(_) => 0.0,
        }
    }

    pub fn package_entries(&self, duration: PackageDuration) -> Vec<PriceEntry> {
        match self {
            TierPricing::Standard(p) => p.package_entries(duration).to_vec(),
            TierPricing::Custom(p) => p.package_entries(duration).to_vec(),
        }
    }

    /// Every price on the list and the digital profit must be finite and >= 0.
    pub fn validate(&self) -> Result<()> {
        for component in PriceComponent::ALL {
            if let Some(entry) = self.entry(component) {
                entry.validate().map_err(|e| match e {
                    ModelError::InvalidPrice(reason) => {
                        ModelError::InvalidPrice(format!("{component}: {reason}"))
                    }
                    other => other,
                })?;
            }
        }
        let digital = self.digital_profit();
        if !digital.is_finite() || digital < 0.0 {
            return Err(ModelError::InvalidPrice(format!(
                "digital profit must be a finite value >= 0, got {}",
                digital
            )));
        }
        Ok(())
    }
}

/// Cost and selling prices for every tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCatalog {
    #[serde(rename = "VIP")]
    pub vip: StandardTierPricing,
    #[serde(rename = "Normal")]
    pub normal: StandardTierPricing,
    #[serde(rename = "Custom")]
    pub custom: CustomTierPricing,
}

impl PricingCatalog {
    pub fn tier(&self, tier: SubscriptionTier) -> TierPricing<'_> {
        match tier {
            SubscriptionTier::Vip => TierPricing::Standard(&self.vip),
            SubscriptionTier::Normal => TierPricing::Standard(&self.normal),
            SubscriptionTier::Custom => TierPricing::Custom(&self.custom),
        }
    }

    pub fn price(&self, tier: SubscriptionTier, component: PriceComponent) -> Option<PriceEntry> {
        self.tier(tier).entry(component)
    }

    pub fn validate(&self) -> Result<()> {
        for tier in SubscriptionTier::ALL {
            self.tier(tier).validate().map_err(|e| ModelError::InvalidTierPricing {
                tier,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Replaces one component's prices. Fails when the tier kind has no such
    /// component or the prices are negative.
    pub fn set_price(
        &mut self,
        tier: SubscriptionTier,
        component: PriceComponent,
        entry: PriceEntry,
    ) -> Result<()> {
        entry.validate()?;
        let slot = match tier {
            SubscriptionTier::Vip => self.vip.slot_mut(component),
            SubscriptionTier::Normal => self.normal.slot_mut(component),
            SubscriptionTier::Custom => self.custom.slot_mut(component),
        };
        match slot {
            Some(s) => {
                *s = entry;
                Ok(())
            }
            None => Err(ModelError::ComponentNotOnTier { tier, component }),
        }
    }

    pub fn set_digital_profit(&mut self, tier: SubscriptionTier, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ModelError::InvalidPrice(format!(
                "digital profit must be a finite value >= 0, got {}",
                amount
            )));
        }
        match tier {
            SubscriptionTier::Vip => self.vip.digital_profit = amount,
            SubscriptionTier::Normal => self.normal.digital_profit = amount,
            SubscriptionTier::Custom => return Err(ModelError::NoDigitalProfit(tier)),
        }
        Ok(())
    }

    /// Every cost, selling price and digital profit multiplied by `multiplier`.
    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            vip: self.vip.scaled(multiplier),
            normal: self.normal.scaled(multiplier),
            custom: self.custom.scaled(multiplier),
        }
    }
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self {
            vip: StandardTierPricing {
                meals_per_month: PriceEntry::new(1000.0, 1500.0),
                meals_3_months: PriceEntry::new(3000.0, 4500.0),
                delivery_per_month: PriceEntry::new(200.0, 200.0),
                delivery_3_months: PriceEntry::new(600.0, 600.0),
                bracelet: PriceEntry::new(315.0, 800.0),
                points_x10: PriceEntry::new(300.0, 250.0),
                digital_profit: 500.0,
                car_one_month: PriceEntry::new(5512.5, 5512.5),
                car_three_months: PriceEntry::new(16537.5, 16537.5),
            },
            normal: StandardTierPricing {
                meals_per_month: PriceEntry::new(900.0, 1306.67),
                meals_3_months: PriceEntry::new(2700.0, 3920.0),
                delivery_per_month: PriceEntry::new(200.0, 200.0),
                delivery_3_months: PriceEntry::new(600.0, 600.0),
                bracelet: PriceEntry::new(315.0, 600.0),
                points_x10: PriceEntry::new(50.0, 30.0),
                digital_profit: 500.0,
                car_one_month: PriceEntry::new(6500.0, 6500.0),
                car_three_months: PriceEntry::new(19500.0, 19500.0),
            },
            custom: CustomTierPricing {
                meals_per_month: PriceEntry::new(1000.0, 1500.0),
                meals_3_months: PriceEntry::new(3000.0, 4500.0),
                delivery_per_month: PriceEntry::new(200.0, 200.0),
                delivery_3_months: PriceEntry::new(600.0, 600.0),
                bracelet_vip: PriceEntry::new(315.0, 800.0),
                bracelet_normal: PriceEntry::new(315.0, 600.0),
                points_x10: PriceEntry::new(0.0, 0.0),
                cbyi_one_month: PriceEntry::new(1700.0, 1700.0),
                cbyi_three_months: PriceEntry::new(5100.0, 5100.0),
                cbyi_bracelet_vip: PriceEntry::new(0.0, 800.0),
                cbyi_bracelet_normal: PriceEntry::new(0.0, 600.0),
            },
        }
    }
}
