use crate::entities::prelude::*;
use crate::entities::{banks, projects, users};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seed admin credentials. Meant to be rotated after first login.
const ADMIN_EMAIL: &str = "admin@voltfund.local";
const ADMIN_PASSWORD: &str = "admin123";

/// Hash the seed admin password using Argon2id
fn hash_seed_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
        .expect("Failed to hash seed admin password")
        .to_string()
}

fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..12])
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Projects)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Portfolios)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Transactions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Notifications)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Banks)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(KycDocuments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now().to_rfc3339();

        // Seed admin account
        let insert_admin = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                users::Column::Id,
                users::Column::Email,
                users::Column::PasswordHash,
                users::Column::Name,
                users::Column::Phone,
                users::Column::Picture,
                users::Column::Role,
                users::Column::KycStatus,
                users::Column::Balance,
                users::Column::CreatedAt,
            ])
            .values_panic([
                new_id("admin").into(),
                ADMIN_EMAIL.into(),
                hash_seed_password().into(),
                "Admin".into(),
                "".into(),
                "".into(),
                "admin".into(),
                "approved".into(),
                0i64.into(),
                now.clone().into(),
            ])
            .to_owned();
        manager.exec_stmt(insert_admin).await?;

        // Seed sample projects
        let sample_projects: [(&str, &str, &str, &str, &str, f64, i64, i64, i32); 4] = [
            (
                "Izmir Solar Power Plant",
                "GES",
                "15 MW solar plant on 175 acres in Torbali, targeting 22,000 MWh per year.",
                "Izmir, Torbali",
                "15 MW",
                7.0,
                5_000_000,
                3_250_000,
                342,
            ),
            (
                "Antalya Solar Power Plant",
                "GES",
                "Large-scale 25 MW solar plant in Manavgat, one of the sunniest regions.",
                "Antalya, Manavgat",
                "25 MW",
                7.5,
                8_000_000,
                5_600_000,
                518,
            ),
            (
                "Istanbul Wind Power Plant",
                "RES",
                "20-turbine wind farm on the high-wind ridges of Catalca.",
                "Istanbul, Catalca",
                "50 MW",
                7.0,
                12_000_000,
                8_400_000,
                876,
            ),
            (
                "Canakkale Wind Power Plant",
                "RES",
                "Modern wind farm in Biga powered by Aegean coastal winds.",
                "Canakkale, Biga",
                "35 MW",
                6.5,
                9_000_000,
                4_500_000,
                423,
            ),
        ];

        for (name, kind, description, location, capacity, rate, target, funded, investors) in
            sample_projects
        {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Projects)
                .columns([
                    projects::Column::Id,
                    projects::Column::Name,
                    projects::Column::ProjectType,
                    projects::Column::Description,
                    projects::Column::Location,
                    projects::Column::Capacity,
                    projects::Column::ReturnRate,
                    projects::Column::TotalTarget,
                    projects::Column::FundedAmount,
                    projects::Column::InvestorsCount,
                    projects::Column::ImageUrl,
                    projects::Column::Details,
                    projects::Column::Status,
                    projects::Column::CreatedAt,
                ])
                .values_panic([
                    new_id("proj").into(),
                    name.into(),
                    kind.into(),
                    description.into(),
                    location.into(),
                    capacity.into(),
                    rate.into(),
                    target.into(),
                    funded.into(),
                    investors.into(),
                    "".into(),
                    "".into(),
                    "active".into(),
                    now.clone().into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        // Seed platform bank accounts
        let sample_banks = [
            ("Ziraat Bankasi", "TR33 0001 0000 0000 0000 0000 01"),
            ("Is Bankasi", "TR62 0006 4000 0011 2340 0001 01"),
            ("Garanti BBVA", "TR76 0006 2000 0000 0006 2960 01"),
            ("Yapi Kredi", "TR86 0006 7010 0000 0012 3456 78"),
        ];

        for (name, iban) in sample_banks {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Banks)
                .columns([
                    banks::Column::Id,
                    banks::Column::Name,
                    banks::Column::Iban,
                    banks::Column::AccountHolder,
                    banks::Column::LogoUrl,
                    banks::Column::IsActive,
                    banks::Column::CreatedAt,
                ])
                .values_panic([
                    new_id("bank").into(),
                    name.into(),
                    iban.into(),
                    "Voltfund Energy Investments".into(),
                    "".into(),
                    true.into(),
                    now.clone().into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KycDocuments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Portfolios).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
