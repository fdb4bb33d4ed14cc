use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // File numbers are assigned by the ledger, not by the database
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(integer(Files::Id).primary_key())
                    .col(string(Files::PersonName))
                    .col(string(Files::PersonMobile))
                    .col(string(Files::ReferenceMobile))
                    .col(string(Files::Address))
                    .col(string(Files::BusinessName))
                    .col(string(Files::BusinessAddress))
                    .col(big_integer(Files::PrincipalAmount))
                    .col(big_integer(Files::Installment))
                    .col(date(Files::StartDate))
                    .col(date(Files::EndDate))
                    .col(string_len(Files::Status, 10).default("ACTIVE"))
                    .col(string_len(Files::Frequency, 10).default("DAILY"))
                    .col(big_integer(Files::TotalReceived).default(0))
                    .col(big_integer(Files::BounceCount).default(0))
                    .col(big_integer(Files::TransactionCount).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::FileId))
                    .col(date(Transactions::Date))
                    .col(big_integer(Transactions::Amount))
                    .col(string(Transactions::Mode))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_file")
                            .from(Transactions::Table, Transactions::FileId)
                            .to(Files::Table, Files::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One repayment per file and day
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_file_date")
                    .table(Transactions::Table)
                    .col(Transactions::FileId)
                    .col(Transactions::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    PersonName,
    PersonMobile,
    ReferenceMobile,
    Address,
    BusinessName,
    BusinessAddress,
    PrincipalAmount,
    Installment,
    StartDate,
    EndDate,
    Status,
    Frequency,
    TotalReceived,
    BounceCount,
    TransactionCount,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    FileId,
    Date,
    Amount,
    Mode,
}
