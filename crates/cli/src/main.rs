mod command;

use anyhow::Context;
use clap::Parser;
use serde_json::{Value, json};

use coopbill_infra::{AppConfig, InMemoryStore, InvoiceRepository, InvoiceService};
use coopbill_invoicing::InvoiceOptions;

use crate::command::{Cli, Commands, SurchargeArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("invalid configuration")?;
    coopbill_observability::init(&config.log);

    let path = config
        .snapshot_path
        .as_ref()
        .context("COOPBILL_SNAPSHOT is not set")?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let store = InMemoryStore::from_json(&json)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    tracing::info!(snapshot = %path.display(), "snapshot loaded");

    let service = InvoiceService::new(store);
    let output = run(&service, cli.command, config.include_surcharge_default)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run<R: InvoiceRepository>(
    service: &InvoiceService<R>,
    command: Commands,
    surcharge_default: bool,
) -> anyhow::Result<Value> {
    let options = |surcharge: SurchargeArgs| InvoiceOptions {
        include_surcharge: surcharge.include(surcharge_default),
    };

    let value = match command {
        Commands::Invoice {
            family_id,
            surcharge,
        } => {
            let invoice = service
                .calculate_family_invoice(family_id, options(surcharge))
                .with_context(|| format!("cannot compute invoice for family {family_id}"))?;
            serde_json::to_value(invoice)?
        }
        Commands::Public { token, surcharge } => {
            let invoice = service
                .calculate_invoice_for_token(&token, options(surcharge))
                .with_context(|| format!("no invoice for token {token:?}"))?;
            serde_json::to_value(invoice)?
        }
        Commands::Token { family_id } => {
            let token = service
                .token_for_family(family_id)
                .with_context(|| format!("unknown family {family_id}"))?;
            json!({ "familyId": family_id, "token": token })
        }
        Commands::Schedule { family_id } => {
            let schedule = service
                .family_schedule(family_id)
                .with_context(|| format!("cannot build schedule for family {family_id}"))?;
            serde_json::to_value(schedule)?
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coopbill_core::FamilyId;

    const SNAPSHOT: &str = r#"{
        "families": [{"id": 7, "lastName": "Example", "needsBackgroundCheck": true}],
        "students": [{"id": 1, "familyId": 7, "firstName": "Sam", "lastName": "Example",
                      "gradYear": "2030", "mathHour": "Algebra"}],
        "courses": [{"courseName": "Algebra", "fee": "50", "bookRental": "10"}],
        "hourLabels": {},
        "grades": {"7": "7th"},
        "settings": {"FamilyFee": "20", "StudentFee": "20", "BackgroundFee": "35",
                     "PayPalPercentage": "2", "PayPalFixedRate": "0.30", "SchoolYear": "2024"},
        "payments": [{"familyId": 7, "amount": "100.00", "paymentDate": "2024-09-01"}]
    }"#;

    fn service() -> InvoiceService<InMemoryStore> {
        InvoiceService::new(InMemoryStore::from_json(SNAPSHOT).unwrap())
    }

    #[test]
    fn invoice_uses_configured_surcharge_default() {
        let command = Commands::Invoice {
            family_id: FamilyId::new(7),
            surcharge: SurchargeArgs::default(),
        };
        let out = run(&service(), command.clone(), true).unwrap();
        assert_eq!(out["balance"], json!("35.00"));
        assert_eq!(out["surcharge"], json!("1.00"));

        let out = run(&service(), command, false).unwrap();
        assert!(out.get("surcharge").is_none());
    }

    #[test]
    fn token_then_public_lookup() {
        let service = service();
        let out = run(&service, Commands::Token { family_id: FamilyId::new(7) }, false).unwrap();
        assert_eq!(out["token"], json!("7902699b"));

        let public = Commands::Public {
            token: "7902699b".to_string(),
            surcharge: SurchargeArgs {
                surcharge: false,
                no_surcharge: true,
            },
        };
        let out = run(&service, public, true).unwrap();
        assert_eq!(out["paymentStatus"], json!("partial"));
    }

    #[test]
    fn unknown_token_is_an_error() {
        let public = Commands::Public {
            token: "deadbeef".to_string(),
            surcharge: SurchargeArgs::default(),
        };
        let err = run(&service(), public, false).unwrap_err();
        assert!(err.to_string().contains("deadbeef"));
    }

    #[test]
    fn schedule_output() {
        let out = run(&service(), Commands::Schedule { family_id: FamilyId::new(7) }, false).unwrap();
        assert_eq!(out["familyName"], json!("Example Family"));
        assert_eq!(out["students"][0]["grade"], json!("7th"));
    }
}
