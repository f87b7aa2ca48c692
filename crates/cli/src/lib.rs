//! Pieces shared by the `calculate` and `forecast` binaries.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, ensure};
use clap::Args;
use forecasting::MAX_HORIZON_MONTHS;
use models::{PriceComponent, ServiceQuantities, SubscriptionTier, VolumeAdjustment};
use settings_loader::{PlannerSettings, Session};

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Settings file; defaults to planner_settings.json when present
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// More log output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Sets up logging and loads the settings.
    pub fn start(&self) -> Result<PlannerSettings> {
        logger::init(logger::filter_for_verbosity(self.verbose))?;
        settings_loader::load_settings_or_default(self.settings.as_ref()).context("loading settings")
    }

    /// Where settings changes are written back.
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| PathBuf::from(settings_loader::DEFAULT_SETTINGS_FILE))
    }

    /// Writes the session's pricing, inputs and scenarios into the settings
    /// file, keeping its other sections.
    pub fn save_session(&self, mut settings: PlannerSettings, session: &Session, what: &str) -> Result<()> {
        settings.store_session(session);
        let path = self.settings_path();
        settings_loader::save_settings(&settings, &path)?;
        println!("{what} saved to {}", path.display());
        Ok(())
    }
}

/// Service quantity flags; anything not given keeps its current value.
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    #[arg(long)]
    pub additional_bracelets: Option<u32>,
    #[arg(long)]
    pub challenge_participants: Option<u32>,
    #[arg(long)]
    pub adventure_participants: Option<u32>,
    #[arg(long)]
    pub competition_participants: Option<u32>,
    #[arg(long)]
    pub cbyi_non_subscribers: Option<u32>,
    #[arg(long)]
    pub bracelets_non_subscribers: Option<u32>,
    #[arg(long)]
    pub car_rental_customers: Option<u32>,
    #[arg(long)]
    pub challenge_fee: Option<f64>,
    #[arg(long)]
    pub adventure_fee: Option<f64>,
    #[arg(long)]
    pub competition_fee: Option<f64>,
}

impl ServiceArgs {
    pub fn apply(&self, current: &ServiceQuantities) -> Result<ServiceQuantities> {
        for (label, fee) in [
            ("challenge fee", self.challenge_fee),
            ("adventure fee", self.adventure_fee),
            ("competition fee", self.competition_fee),
        ] {
            if let Some(fee) = fee {
                ensure!(fee.is_finite() && fee >= 0.0, "{label} must be a finite value >= 0, got {fee}");
            }
        }
        Ok(ServiceQuantities {
            additional_bracelets: self.additional_bracelets.unwrap_or(current.additional_bracelets),
            challenge_participants: self.challenge_participants.unwrap_or(current.challenge_participants),
            adventure_participants: self.adventure_participants.unwrap_or(current.adventure_participants),
            competition_participants: self
                .competition_participants
                .unwrap_or(current.competition_participants),
            cbyi_non_subscribers: self.cbyi_non_subscribers.unwrap_or(current.cbyi_non_subscribers),
            bracelets_non_subscribers: self
                .bracelets_non_subscribers
                .unwrap_or(current.bracelets_non_subscribers),
            car_rental_customers: self.car_rental_customers.unwrap_or(current.car_rental_customers),
            challenge_fee: self.challenge_fee.unwrap_or(current.challenge_fee),
            adventure_fee: self.adventure_fee.unwrap_or(current.adventure_fee),
            competition_fee: self.competition_fee.unwrap_or(current.competition_fee),
        })
    }
}

/// `1234567.8` -> `1,234,568 AED`
pub fn money(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped} {currency}")
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Parses `NAME=CUSTOMERS[:RENEWALS]`, e.g. `Boom=1.5:1.2`. Renewals default
/// to the customer multiplier.
pub fn parse_volume_adjustment(raw: &str) -> Result<(String, VolumeAdjustment)> {
    let (name, multipliers) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=CUSTOMERS[:RENEWALS], got {raw:?}"))?;
    if name.trim().is_empty() {
        return Err(anyhow!("volume scenario name is empty in {raw:?}"));
    }
    let (customers, renewals) = match multipliers.split_once(':') {
        Some((c, r)) => (c, Some(r)),
        None => (multipliers, None),
    };
    let customer_multiplier: f64 = customers
        .trim()
        .parse()
        .with_context(|| format!("customer multiplier in {raw:?}"))?;
    let renewal_multiplier: f64 = match renewals {
        Some(r) => r.trim().parse().with_context(|| format!("renewal multiplier in {raw:?}"))?,
        None => customer_multiplier,
    };
    for m in [customer_multiplier, renewal_multiplier] {
        if !m.is_finite() || m < 0.0 {
            return Err(anyhow!("multipliers must be finite and >= 0, got {m} in {raw:?}"));
        }
    }
    Ok((
        name.trim().to_string(),
        VolumeAdjustment {
            customer_multiplier,
            renewal_multiplier,
        },
    ))
}

/// A forecast horizon in months, 1 to `MAX_HORIZON_MONTHS`.
pub fn parse_horizon(raw: &str) -> Result<u32> {
    let months: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("horizon {raw:?} is not a whole number of months"))?;
    ensure!(
        (1..=MAX_HORIZON_MONTHS).contains(&months),
        "horizon must be between 1 and {MAX_HORIZON_MONTHS} months, got {months}"
    );
    Ok(months)
}

/// `VIP`, `Normal` or `Custom`, case-insensitive.
pub fn parse_tier(raw: &str) -> Result<SubscriptionTier> {
    SubscriptionTier::ALL
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| anyhow!("unknown tier {raw:?}, expected VIP, Normal or Custom"))
}

/// A price list key such as `mealsPerMonth` or `braceletVIP`.
pub fn parse_component(raw: &str) -> Result<PriceComponent> {
    PriceComponent::ALL
        .into_iter()
        .find(|c| c.key().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            let keys: Vec<&str> = PriceComponent::ALL.iter().map(|c| c.key()).collect();
            anyhow!("unknown price component {raw:?}, expected one of {}", keys.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_groups_thousands() {
        assert_eq!(money(1_234_567.8, "AED"), "1,234,568 AED");
        assert_eq!(money(999.4, "AED"), "999 AED");
        assert_eq!(money(-12_500.0, "USD"), "-12,500 USD");
        assert_eq!(money(0.0, "AED"), "0 AED");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(33.333), "33.3%");
    }

    #[test]
    fn test_parse_volume_adjustment() {
        let (name, adj) = parse_volume_adjustment("Boom=1.5:1.2").unwrap();
        assert_eq!(name, "Boom");
        assert_eq!(adj.customer_multiplier, 1.5);
        assert_eq!(adj.renewal_multiplier, 1.2);

        let (_, adj) = parse_volume_adjustment("Dip=0.8").unwrap();
        assert_eq!(adj.renewal_multiplier, 0.8);

        assert!(parse_volume_adjustment("nope").is_err());
        assert!(parse_volume_adjustment("=1.0").is_err());
        assert!(parse_volume_adjustment("Bad=-1").is_err());
        assert!(parse_volume_adjustment("Bad=x").is_err());
    }

    #[test]
    fn test_parse_horizon_bounds() {
        assert_eq!(parse_horizon("12").unwrap(), 12);
        assert_eq!(parse_horizon(&MAX_HORIZON_MONTHS.to_string()).unwrap(), MAX_HORIZON_MONTHS);
        assert!(parse_horizon("0").is_err());
        assert!(parse_horizon(&(MAX_HORIZON_MONTHS + 1).to_string()).is_err());
        assert!(parse_horizon("4294967295").is_err());
        assert!(parse_horizon("-3").is_err());
    }

    #[test]
    fn test_parse_tier_and_component() {
        assert_eq!(parse_tier("vip").unwrap(), SubscriptionTier::Vip);
        assert_eq!(parse_tier("Custom").unwrap(), SubscriptionTier::Custom);
        assert!(parse_tier("Gold").is_err());

        assert_eq!(parse_component("mealsPerMonth").unwrap(), PriceComponent::MealsPerMonth);
        assert_eq!(parse_component("braceletvip").unwrap(), PriceComponent::BraceletVip);
        assert!(parse_component("espresso").is_err());
    }

    #[test]
    fn test_service_args_keep_unset_fields() {
        let current = ServiceQuantities::default();
        let args = ServiceArgs {
            challenge_participants: Some(12),
            adventure_fee: Some(55.0),
            ..Default::default()
        };
        let updated = args.apply(&current).unwrap();
        assert_eq!(updated.challenge_participants, 12);
        assert_eq!(updated.adventure_fee, 55.0);
        assert_eq!(updated.additional_bracelets, current.additional_bracelets);
        assert_eq!(updated.competition_fee, current.competition_fee);

        let negative = ServiceArgs {
            challenge_fee: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.apply(&current).is_err());
        assert_eq!(ServiceArgs::default().apply(&current).unwrap(), current);
    }
}
