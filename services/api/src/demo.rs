use crate::infra::{write_record, InMemoryHouseholdRepository};
use benefit_screener::config::AppConfig;
use benefit_screener::error::AppError;
use benefit_screener::workflows::screening::{
    Asset, Client, ClientId, Expense, Frequency, HouseholdMember, HouseholdRecord,
    HouseholdScreening, HousingCostKind, Income, IncomeKind, MaritalStatus, MemberId,
    PriorYearHousingCost, Program, RelationshipDeclared, RelationshipKind, RepositoryError,
    ScreeningConfig, ScreeningService, UtilityType, YearType,
};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// Household record file (JSON)
    #[arg(long)]
    pub(crate) household: PathBuf,
    /// Screening date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Write the updated verdicts back into the household file
    #[arg(long)]
    pub(crate) write: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Screening date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Skip the relationship update portion of the demo.
    #[arg(long)]
    pub(crate) skip_relationship: bool,
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let ScreenArgs {
        household,
        as_of,
        write,
    } = args;

    let config = AppConfig::load()?;
    let rules = config.screening_rules()?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

    let record = HouseholdRecord::from_reader(BufReader::new(File::open(&household)?))?;
    let client_id = record.client.id.clone();
    let store = InMemoryHouseholdRepository::default();
    store.insert(record).map_err(screening_error)?;

    let service = ScreeningService::new(Arc::new(store.clone()), rules);
    let screening = service.screen(&client_id, as_of)?;
    render_screening(&screening);

    if write {
        let updated = store.record(&client_id).map_err(screening_error)?;
        write_record(&household, &updated).map_err(screening_error)?;
        println!("\nVerdicts written to {}", household.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        as_of,
        skip_relationship,
    } = args;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

    println!("Household screening demo");
    let record = demo_household(as_of);
    let client_id = record.client.id.clone();
    let store = InMemoryHouseholdRepository::default();
    store.insert(record).map_err(screening_error)?;

    let service = ScreeningService::new(Arc::new(store), ScreeningConfig::default());
    let screening = service.screen(&client_id, as_of)?;
    render_screening(&screening);

    if skip_relationship {
        return Ok(());
    }

    println!("\nDeclaring Marisol as Teresa's grandchild, then as Hector's ward");
    let grandchild = RelationshipDeclared {
        member_id: MemberId("teresa".to_string()),
        related_id: MemberId("marisol".to_string()),
        kind: RelationshipKind::Grandchild,
    };
    let screening = service.declare_relationship(&client_id, &grandchild, as_of)?;
    println!(
        "  Meal group after grandchild declaration: {} member(s)",
        meal_group_size(&screening)
    );

    let ward = RelationshipDeclared {
        member_id: MemberId("hector".to_string()),
        related_id: MemberId("marisol".to_string()),
        kind: RelationshipKind::Ward,
    };
    let screening = service.declare_relationship(&client_id, &ward, as_of)?;
    println!(
        "  Meal group after ward declaration: {} member(s)",
        meal_group_size(&screening)
    );
    render_screening(&screening);

    Ok(())
}

fn screening_error(err: RepositoryError) -> AppError {
    AppError::Screening(err.into())
}

fn meal_group_size(screening: &HouseholdScreening) -> usize {
    screening
        .snap
        .as_ref()
        .map(|snap| snap.household_size)
        .unwrap_or(0)
}

pub(crate) fn render_screening(screening: &HouseholdScreening) {
    println!(
        "\nHousehold {} (screened {})",
        screening.client_id, screening.as_of
    );

    match &screening.snap {
        Some(snap) => {
            println!("\nSNAP meal group");
            println!("- Size: {}", snap.household_size);
            println!("- Gross monthly income: ${:.2}", snap.gross_income);
            println!("- Net monthly income: ${:.2}", snap.net_income);
            println!("- Countable assets: ${:.2}", snap.assets);
            println!("- Verdict: {}", snap.verdict.label());
            if let Some(benefit) = snap.benefit {
                println!("- Estimated monthly benefit: ${:.2}", benefit);
            }
            if let Some(expedited) = snap.expedited {
                println!(
                    "- Expedited processing: {}",
                    if expedited { "likely" } else { "not indicated" }
                );
            }
        }
        None => println!("\nSNAP meal group: nobody shares meals"),
    }

    println!("\nVerdicts by member");
    for member in &screening.members {
        println!(
            "- {} ({}){}",
            member.name,
            member.member_id,
            if member.shares_meal { ", shares meals" } else { "" }
        );
        for program in Program::ALL {
            if let Some(label) = member.verdicts.get(&program) {
                println!("    {:<13} {}", program.label(), label);
            }
        }
    }
}

/// A married pair of retirees and a teenage relative who has not joined the meal group yet.
fn demo_household(as_of: NaiveDate) -> HouseholdRecord {
    let born = |years: i32, month: u32| {
        NaiveDate::from_ymd_opt(as_of.year() - years, month, 1).unwrap_or(as_of)
    };

    let mut teresa = HouseholdMember::new("teresa", "Teresa");
    teresa.date_of_birth = Some(born(71, 1));
    teresa.marital_status = MaritalStatus::Married;
    teresa.shares_meal = true;
    teresa.incomes = vec![
        Income::new(1_150.0, Frequency::Monthly, IncomeKind::Other, YearType::Current),
        Income::new(13_800.0, Frequency::Yearly, IncomeKind::Other, YearType::Previous),
    ];
    teresa.assets = vec![Asset {
        value: 2_400.0,
        description: Some("Credit union savings".to_string()),
    }];
    teresa.expenses = vec![
        Expense::Shelter { value: 640.0 },
        Expense::Utility {
            utility_type: UtilityType::HeatingCooling,
            value: 0.0,
        },
        Expense::Medical {
            value: 174.70,
            frequency: Frequency::Monthly,
            medical_type: "Medicare Part B".to_string(),
        },
    ];
    teresa.prior_year_housing_costs = vec![PriorYearHousingCost {
        kind: HousingCostKind::PropertyTax,
        value: 1_420.0,
    }];
    teresa
        .relationships
        .insert(MemberId("hector".to_string()), RelationshipKind::Spouse);

    let mut hector = HouseholdMember::new("hector", "Hector");
    hector.date_of_birth = Some(born(67, 9));
    hector.marital_status = MaritalStatus::Married;
    hector.shares_meal = true;
    hector.incomes = vec![
        Income::new(260.0, Frequency::Weekly, IncomeKind::Employment, YearType::Current),
        Income::new(11_200.0, Frequency::Yearly, IncomeKind::Employment, YearType::Previous),
    ];
    hector
        .relationships
        .insert(MemberId("teresa".to_string()), RelationshipKind::Spouse);

    let mut marisol = HouseholdMember::new("marisol", "Marisol");
    marisol.date_of_birth = Some(born(16, 4));

    HouseholdRecord::new(
        Client {
            id: ClientId("demo-household".to_string()),
            ..Client::default()
        },
        vec![teresa, hector, marisol],
    )
}
